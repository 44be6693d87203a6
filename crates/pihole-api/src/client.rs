// Pi-hole HTTP client and session manager
//
// Wraps `reqwest::Client` with API-prefix URL construction, the
// `X-FTL-SID` session header, response classification, and the
// validate → login → persist session flow. The blocking endpoints live in
// `blocking.rs` as inherent methods so this module stays focused on
// transport and session mechanics.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use reqwest::{Method, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, error, info};
use url::Url;

use crate::config::{ClientConfig, LogLevel};
use crate::error::{Error, preview};
use crate::session::{Session, SessionResponse, SessionStore};

/// Header carrying the session id on authenticated requests.
pub const SESSION_HEADER: &str = "X-FTL-SID";

/// Session-authenticated client for one Pi-hole appliance.
///
/// Every public operation first runs [`ensure_session`](Self::ensure_session),
/// so callers never deal with login themselves. The held session is
/// replaced wholesale, never patched, and concurrent calls may each
/// re-validate (and at worst each log in) independently.
pub struct PiholeClient {
    http: reqwest::Client,
    api_base: String,
    password: Option<SecretString>,
    log_level: LogLevel,
    store: Option<SessionStore>,
    session: ArcSwapOption<Session>,
}

impl PiholeClient {
    /// Create a client, building the HTTP client from `config.transport`.
    ///
    /// The transport is the only way in, so every request carries the
    /// fixed `User-Agent`, `Content-Type` and timeout.
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        let http = config.transport.build_client()?;
        let api_base = config.api_base()?;
        Ok(Self {
            http,
            api_base,
            password: config.password,
            log_level: config.log_level,
            store: config.session_store,
            session: ArcSwapOption::empty(),
        })
    }

    /// The normalized API prefix, e.g. `http://pi.hole/api`.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// The session currently held in memory.
    pub fn session(&self) -> Option<Arc<Session>> {
        self.session.load_full()
    }

    /// Where the session is mirrored on disk, if anywhere.
    pub fn session_store(&self) -> Option<&SessionStore> {
        self.store.as_ref()
    }

    pub fn log_level(&self) -> LogLevel {
        self.log_level
    }

    // ── Session management ───────────────────────────────────────────

    /// Make sure the held session is valid, logging in if it is not.
    ///
    /// 1. With nothing in memory, try the session file.
    /// 2. Always validate with `GET /auth`; a stored session may have expired on
    ///    the appliance side.
    /// 3. Valid: adopt the returned session, no password is sent.
    /// 4. Invalid: drop the held session, then `POST /auth` with the
    ///    password (`Error::AuthRequired` if none is configured).
    /// 5. Login still invalid: `Error::AuthRejected`.
    /// 6. Login valid: adopt and persist (persistence is best effort).
    pub async fn ensure_session(&self) -> Result<(), Error> {
        if self.session.load().is_none() {
            self.load_stored_session().await;
        }

        let check: SessionResponse = self.get("/auth", false).await?;
        if check.session.valid {
            debug!("session is valid");
            let mut session = check.session;
            // The check may answer without echoing the sid back.
            if session.sid.is_none() {
                session.sid = self.session().and_then(|held| held.sid.clone());
            }
            self.session.store(Some(Arc::new(session)));
            return Ok(());
        }

        self.session.store(None);

        let Some(password) = self.password.as_ref() else {
            return Err(Error::AuthRequired);
        };

        debug!("session invalid, logging in");
        let body = json!({ "password": password.expose_secret() });
        let login: SessionResponse = self.post("/auth", &body, true).await?;

        if !login.session.valid {
            return Err(Error::AuthRejected {
                message: login
                    .session
                    .message
                    .unwrap_or_else(|| "credential rejected by appliance".into()),
            });
        }

        let session = Arc::new(login.session);
        self.session.store(Some(Arc::clone(&session)));
        self.persist_session(&session).await;
        debug!("login successful");
        Ok(())
    }

    /// Seed the in-memory session from the store. Never fails: every
    /// problem degrades to "no prior session".
    async fn load_stored_session(&self) {
        let Some(store) = self.store.as_ref() else {
            return;
        };

        match store.load().await {
            Ok(Some(session)) => {
                if self.log_level >= LogLevel::Info {
                    info!(path = %store.path().display(), "Session loaded from disk");
                }
                self.session.store(Some(Arc::new(session)));
            }
            Ok(None) => debug!(path = %store.path().display(), "no stored session"),
            Err(e) => {
                if self.log_level >= LogLevel::Error {
                    error!(path = %store.path().display(), error = %e, "Failed to load session");
                }
            }
        }
    }

    async fn persist_session(&self, session: &Session) {
        let Some(store) = self.store.as_ref() else {
            return;
        };

        match store.save(session).await {
            Ok(()) => debug!(path = %store.path().display(), "session saved"),
            Err(e) => {
                if self.log_level >= LogLevel::Error {
                    error!(path = %store.path().display(), error = %e, "Failed to save session");
                }
            }
        }
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// `{api_base}{path}`; `path` starts with `/`.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(Url::parse(&format!("{}{path}", self.api_base))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and classify the response.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        check_errors: bool,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        let builder = self.http.get(url.clone());
        self.send(Method::GET, url, builder, check_errors).await
    }

    /// Send a POST request with a JSON body and classify the response.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &(impl Serialize + Sync),
        check_errors: bool,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        let builder = self.http.post(url.clone()).json(body);
        self.send(Method::POST, url, builder, check_errors).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        builder: RequestBuilder,
        check_errors: bool,
    ) -> Result<T, Error> {
        if self.log_level >= LogLevel::Info {
            info!(%method, %url, "Request");
        }

        let builder = self.apply_session(builder);
        let resp = builder.send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        if self.log_level >= LogLevel::Info {
            info!(%method, %url, status = status.as_u16(), "Response");
        }

        classify(&body, check_errors)
    }

    /// Attach `X-FTL-SID` when a usable session is held.
    fn apply_session(&self, builder: RequestBuilder) -> RequestBuilder {
        let guard = self.session.load();
        match guard.as_deref().and_then(Session::credential) {
            Some(sid) => builder.header(SESSION_HEADER, sid),
            None => builder,
        }
    }
}

/// Classify a response body.
///
/// The HTTP status is not consulted: the appliance answers an
/// unauthenticated `/auth` check with 401 and a perfectly usable body.
pub(crate) fn classify<T: DeserializeOwned>(body: &str, check_errors: bool) -> Result<T, Error> {
    let invalid = || Error::InvalidResponse {
        preview: preview(body),
    };

    let value: Value = serde_json::from_str(body).map_err(|_| invalid())?;
    let Value::Object(map) = value else {
        return Err(invalid());
    };

    if check_errors {
        if let Some(err) = map.get("error") {
            return Err(api_error(err));
        }
    }

    serde_json::from_value(Value::Object(map)).map_err(|e| Error::Deserialization {
        message: e.to_string(),
        body: body.to_owned(),
    })
}

/// Pi-hole reports `{"error": {"key", "message", "hint"}}`; anything else
/// under `error` is kept verbatim.
fn api_error(err: &Value) -> Error {
    let field = |name: &str| err.get(name).and_then(Value::as_str).map(str::to_owned);
    match err {
        Value::Object(_) => Error::Api {
            key: field("key").unwrap_or_else(|| "unknown".into()),
            message: field("message").unwrap_or_default(),
        },
        Value::String(message) => Error::Api {
            key: "unknown".into(),
            message: message.clone(),
        },
        other => Error::Api {
            key: "unknown".into(),
            message: other.to_string(),
        },
    }
}
