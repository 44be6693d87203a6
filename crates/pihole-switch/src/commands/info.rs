//! `info`: the accessory as registered with the host. No network.

use serde::Serialize;
use tabled::Tabled;

use pihole_core::{AccessoryInfo, AccessoryPlugin, PiholeSwitch, Service};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct InfoView<'a> {
    name: &'a str,
    api: &'a str,
    reversed: bool,
    time: u64,
    services: Vec<Service>,
}

#[derive(Tabled)]
struct ServiceRow {
    #[tabled(rename = "Service")]
    kind: &'static str,
    #[tabled(rename = "Detail")]
    detail: String,
}

impl From<&Service> for ServiceRow {
    fn from(service: &Service) -> Self {
        match service {
            Service::AccessoryInformation(AccessoryInfo {
                manufacturer,
                model,
                serial_number,
            }) => Self {
                kind: "AccessoryInformation",
                detail: format!("{manufacturer} {model} ({serial_number})"),
            },
            Service::Switch { name } => Self {
                kind: "Switch",
                detail: name.clone(),
            },
        }
    }
}

fn detail(view: &InfoView<'_>) -> String {
    let disable = if view.time > 0 {
        format!("{}s", view.time)
    } else {
        "indefinite".into()
    };
    let head = output::detail_lines(&[
        ("Name", view.name.to_owned()),
        ("API", view.api.to_owned()),
        ("Reversed", view.reversed.to_string()),
        ("Disable for", disable),
    ]);
    let rows: Vec<ServiceRow> = view.services.iter().map(ServiceRow::from).collect();
    format!("{head}\n{}", output::render_table(&rows))
}

pub fn show(switch: &PiholeSwitch, global: &GlobalOpts) -> Result<(), CliError> {
    let view = InfoView {
        name: switch.name(),
        api: switch.client().api_base(),
        reversed: switch.is_reversed(),
        time: switch.time(),
        services: switch.services(),
    };
    let out = output::render_single(&global.output, &view, detail, |v| v.name.to_owned())?;
    output::print_output(&out, global.quiet)
}
