//! Core types and trait definitions for the AgroStudy data layer.
//!
//! This crate is deliberately free of database and I/O dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod error;
pub mod event;
pub mod gateway;
pub mod identity;
pub mod library;
pub mod note;
pub mod priority;
pub mod record;
pub mod semester;
pub mod stats;
pub mod subject;
pub mod visit;

pub use error::{Error, Result};
