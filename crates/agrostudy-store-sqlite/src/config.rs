//! Store configuration, deserialised with the `config` crate.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::Result;

fn default_base_url() -> String { "local://agrostudy".to_string() }

/// Runtime configuration for [`crate::SqliteGateway`].
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
  /// Path of the SQLite database file.
  pub db_path:         PathBuf,
  /// Prefix for public object URLs, e.g. `https://files.example.com`.
  #[serde(default = "default_base_url")]
  pub object_base_url: String,
}

impl GatewayConfig {
  /// Load from a TOML file (if present) layered under `AGROSTUDY_`-prefixed
  /// environment variables.
  pub fn load(path: impl AsRef<Path>) -> Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path.as_ref()).required(false))
      .add_source(config::Environment::with_prefix("AGROSTUDY"))
      .build()?;
    Ok(settings.try_deserialize()?)
  }
}
