//! SQLite backend for the AgroStudy gateway contract.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated
//! thread without blocking the async runtime. Rows are stored as JSON
//! payloads keyed by (collection, id); object payloads live in a blob
//! table so an in-memory store needs no filesystem.

mod config;
mod encode;
mod schema;
mod store;

pub mod error;

pub use config::GatewayConfig;
pub use error::{Error, Result};
pub use store::SqliteGateway;

#[cfg(test)]
mod tests;
