// crates/factory-client/src/lib.rs

//! factory-client
//!
//! Live view of the server's unit collection, with create/edit/delete
//! forms. The library holds everything except terminal setup, so the
//! binary stays thin and the event path can be tested without a TTY:
//!
//! - [`transport`]  : connection, reconnect and heartbeat task
//! - [`connection`] : lifecycle state and inbound dispatch
//! - [`controller`] : replica + open form + outbound intents
//! - [`app`], [`ui`], [`components`] : terminal front-end

pub mod app;
pub mod components;
pub mod config;
pub mod connection;
pub mod controller;
pub mod error;
pub mod transport;
pub mod ui;

pub use config::ClientConfig;
pub use connection::{BusinessError, ConnectionManager, ConnectionState};
pub use controller::{AppController, ControllerError};
pub use error::ClientError;
pub use transport::{TransportDriver, TransportMode, TransportPreference};
