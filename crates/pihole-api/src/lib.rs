// pihole-api: Async session-authenticated client for the Pi-hole v6 API

//! Talks to one Pi-hole appliance over its JSON API.
//!
//! - **[`PiholeClient`]**: owns the HTTP client and the current
//!   [`Session`]. Every operation validates the session first
//!   (`GET /auth`), logs in with the configured password when the
//!   appliance says it is stale (`POST /auth`), and mirrors fresh sessions
//!   to a [`SessionStore`] file so restarts skip the login.
//! - **Blocking endpoints**: [`PiholeClient::get_blocking`] and
//!   [`PiholeClient::set_blocking`] over `/dns/blocking`, returning the raw
//!   [`BlockingResponse`].

pub mod blocking;
pub mod client;
pub mod config;
pub mod error;
pub mod session;
pub mod transport;

pub use blocking::{BlockingResponse, BlockingStatus, SetBlockingRequest};
pub use client::{PiholeClient, SESSION_HEADER};
pub use config::{ClientConfig, DEFAULT_API_PATH, LogLevel};
pub use error::Error;
pub use session::{Session, SessionResponse, SessionStore, SessionStoreError};
pub use transport::{TlsMode, TransportConfig, USER_AGENT};
