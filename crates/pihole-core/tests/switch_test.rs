#![allow(clippy::unwrap_used)]
// Integration tests for `PiholeSwitch` against a mocked appliance.

use std::time::Duration;

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pihole_core::{
    AccessoryInfo, AccessoryPlugin, ClientConfig, CoreError, LogLevel, PiholeSwitch, Service,
    SessionStore, SwitchConfig, TlsMode,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn switch_config(server: &MockServer) -> SwitchConfig {
    SwitchConfig::new(
        "Pi-hole",
        ClientConfig {
            log_level: LogLevel::Info,
            ..ClientConfig::new(Url::parse(&server.uri()).unwrap())
        },
    )
}

fn switch(server: &MockServer) -> PiholeSwitch {
    PiholeSwitch::new(switch_config(server)).unwrap()
}

fn reversed_switch(server: &MockServer, time: u64) -> PiholeSwitch {
    PiholeSwitch::new(SwitchConfig {
        reversed: true,
        time,
        ..switch_config(server)
    })
    .unwrap()
}

/// An appliance without a password: every session check reports a valid session.
async fn mock_open_appliance(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/auth"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "session": { "valid": true, "totp": false, "validity": -1 } })),
        )
        .mount(server)
        .await;
}

async fn mock_status(server: &MockServer, blocking: &str) {
    Mock::given(method("GET"))
        .and(path("/api/dns/blocking"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "blocking": blocking, "timer": null })),
        )
        .mount(server)
        .await;
}

async fn mock_set(server: &MockServer, expected_body: Value, answer: &str) {
    Mock::given(method("POST"))
        .and(path("/api/dns/blocking"))
        .and(body_json(expected_body))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "blocking": answer, "timer": null })),
        )
        .expect(1)
        .mount(server)
        .await;
}

// ── Reading ─────────────────────────────────────────────────────────

#[tokio::test]
async fn enabled_reads_on() {
    let server = MockServer::start().await;
    mock_open_appliance(&server).await;
    mock_status(&server, "enabled").await;

    let switch = switch(&server);
    assert_eq!(switch.last_known_on(), None);
    assert!(switch.get_on().await.unwrap());
    assert_eq!(switch.last_known_on(), Some(true));
}

#[tokio::test]
async fn disabled_reads_off() {
    let server = MockServer::start().await;
    mock_open_appliance(&server).await;
    mock_status(&server, "disabled").await;

    assert!(!switch(&server).get_on().await.unwrap());
}

#[tokio::test]
async fn reversed_disabled_reads_on() {
    let server = MockServer::start().await;
    mock_open_appliance(&server).await;
    mock_status(&server, "disabled").await;

    assert!(reversed_switch(&server, 0).get_on().await.unwrap());
}

#[tokio::test]
async fn failed_and_unknown_read_off_in_both_polarities() {
    for word in ["failed", "unknown"] {
        let server = MockServer::start().await;
        mock_open_appliance(&server).await;
        mock_status(&server, word).await;

        assert!(!switch(&server).get_on().await.unwrap(), "{word}");
        assert!(!reversed_switch(&server, 0).get_on().await.unwrap(), "reversed {word}");
    }
}

#[tokio::test]
async fn failed_read_keeps_last_known_value() {
    let server = MockServer::start().await;
    mock_open_appliance(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/dns/blocking"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "blocking": "enabled" })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/dns/blocking"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(json!({ "error": { "key": "database_error", "message": "FTL busy" } })),
        )
        .mount(&server)
        .await;

    let switch = switch(&server);
    assert!(switch.get_on().await.unwrap());

    let err = switch.get_on().await.unwrap_err();
    match err {
        CoreError::Protocol { key, .. } => assert_eq!(key.as_deref(), Some("database_error")),
        other => panic!("expected Protocol, got: {other:?}"),
    }
    assert_eq!(switch.last_known_on(), Some(true));
}

// ── Writing ─────────────────────────────────────────────────────────

#[tokio::test]
async fn turning_on_enables_blocking_without_timer() {
    let server = MockServer::start().await;
    mock_open_appliance(&server).await;
    mock_set(&server, json!({ "blocking": true }), "enabled").await;

    let switch = PiholeSwitch::new(SwitchConfig {
        time: 300,
        ..switch_config(&server)
    })
    .unwrap();
    assert!(switch.set_on(true).await.unwrap());
    assert_eq!(switch.last_known_on(), Some(true));
}

#[tokio::test]
async fn turning_off_sends_configured_timer() {
    let server = MockServer::start().await;
    mock_open_appliance(&server).await;
    mock_set(&server, json!({ "blocking": false, "timer": 300 }), "disabled").await;

    let switch = PiholeSwitch::new(SwitchConfig {
        time: 300,
        ..switch_config(&server)
    })
    .unwrap();
    assert!(!switch.set_on(false).await.unwrap());
}

#[tokio::test]
async fn zero_time_disables_indefinitely() {
    let server = MockServer::start().await;
    mock_open_appliance(&server).await;
    mock_set(&server, json!({ "blocking": false }), "disabled").await;

    assert!(!switch(&server).set_on(false).await.unwrap());
}

#[tokio::test]
async fn reversed_on_disables_blocking_with_timer() {
    let server = MockServer::start().await;
    mock_open_appliance(&server).await;
    mock_set(&server, json!({ "blocking": false, "timer": 60 }), "disabled").await;

    let switch = reversed_switch(&server, 60);
    assert!(switch.set_on(true).await.unwrap());
    assert_eq!(switch.last_known_on(), Some(true));
}

#[tokio::test]
async fn reversed_off_enables_blocking_without_timer() {
    let server = MockServer::start().await;
    mock_open_appliance(&server).await;
    mock_set(&server, json!({ "blocking": true }), "enabled").await;

    assert!(!reversed_switch(&server, 60).set_on(false).await.unwrap());
}

#[tokio::test]
async fn set_returns_the_confirmed_state() {
    let server = MockServer::start().await;
    mock_open_appliance(&server).await;
    mock_set(&server, json!({ "blocking": true }), "failed").await;

    let switch = switch(&server);
    assert!(!switch.set_on(true).await.unwrap());
    assert_eq!(switch.last_known_on(), Some(false));
}

#[tokio::test]
async fn subscribers_see_confirmed_values() {
    let server = MockServer::start().await;
    mock_open_appliance(&server).await;
    mock_set(&server, json!({ "blocking": false }), "disabled").await;

    let switch = switch(&server);
    let mut rx = switch.subscribe();
    assert_eq!(*rx.borrow(), None);

    switch.set_on(false).await.unwrap();
    assert!(rx.has_changed().unwrap());
    assert_eq!(*rx.borrow_and_update(), Some(false));
}

// ── Authentication ──────────────────────────────────────────────────

#[tokio::test]
async fn rejected_password_surfaces_as_authentication_failed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "session": { "valid": false } })),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({ "session": { "valid": false, "message": "password incorrect" } }),
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/dns/blocking"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "blocking": "enabled" })))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = switch_config(&server);
    config.client.password = Some(SecretString::from("wrong".to_owned()));
    let switch = PiholeSwitch::new(config).unwrap();

    let err = switch.get_on().await.unwrap_err();
    assert!(matches!(err, CoreError::AuthenticationFailed { .. }), "{err:?}");
    assert_eq!(switch.last_known_on(), None);
}

#[tokio::test]
async fn missing_password_surfaces_as_authentication_required() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "session": { "valid": false } })),
        )
        .mount(&server)
        .await;

    let err = switch(&server).get_on().await.unwrap_err();
    assert!(matches!(err, CoreError::AuthenticationRequired), "{err:?}");
}

#[tokio::test]
async fn persisted_session_is_named_after_serial() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    Mock::given(method("GET"))
        .and(path("/api/auth"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "session": { "valid": false } })),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({ "session": { "valid": true, "sid": "sid-1", "validity": 300 } }),
        ))
        .expect(1)
        .mount(&server)
        .await;
    mock_status(&server, "enabled").await;

    let info = AccessoryInfo {
        serial_number: "den/pi".into(),
        ..AccessoryInfo::default()
    };
    let mut config = SwitchConfig {
        info: info.clone(),
        ..switch_config(&server)
    };
    config.client.password = Some(SecretString::from("secret".to_owned()));
    config.client.session_store = Some(SessionStore::new(dir.path(), &info.serial_number));

    assert!(PiholeSwitch::new(config).unwrap().get_on().await.unwrap());
    assert!(dir.path().join("pihole-session-den_pi.json").exists());
}

// ── Construction and host surface ───────────────────────────────────

#[test]
fn services_lead_with_information() {
    let server_url = Url::parse("http://pi.hole").unwrap();
    let switch = PiholeSwitch::new(SwitchConfig::new("Ad Blocker", ClientConfig::new(server_url)))
        .unwrap();

    assert_eq!(switch.name(), "Ad Blocker");
    assert_eq!(
        switch.services(),
        vec![
            Service::AccessoryInformation(AccessoryInfo {
                manufacturer: "Raspberry Pi".into(),
                model: "Pi-hole".into(),
                serial_number: "123-456-789".into(),
            }),
            Service::Switch {
                name: "Ad Blocker".into(),
            },
        ]
    );
}

#[test]
fn missing_ca_file_is_a_connection_error() {
    let url = Url::parse("https://pi.hole").unwrap();
    let mut config = SwitchConfig::new("Pi-hole", ClientConfig::new(url));
    config.client.transport.tls = TlsMode::CustomCa("/nonexistent/ca.pem".into());

    let err = PiholeSwitch::new(config).err().unwrap();
    assert!(matches!(err, CoreError::ConnectionFailed { .. }), "{err:?}");
}

#[tokio::test]
async fn configured_timeout_applies_to_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "session": { "valid": true, "validity": -1 } }))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;
    let mut config = switch_config(&server);
    config.client.transport.timeout = Duration::from_secs(1);
    let switch = PiholeSwitch::new(config).unwrap();

    let err = switch.get_on().await.unwrap_err();

    assert!(matches!(err, CoreError::Timeout { timeout_secs: 1 }), "{err:?}");
}
