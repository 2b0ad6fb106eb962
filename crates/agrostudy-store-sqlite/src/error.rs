//! Error type for `agrostudy-store-sqlite`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("config error: {0}")]
  Config(#[from] config::ConfigError),

  /// An insert row missing its `id` or `owner_id` key, or a patch that is
  /// not a JSON object.
  #[error("invalid row: {0}")]
  InvalidRow(String),

  /// No row matched both the id and the owner predicate.
  #[error("row not found: {0}")]
  RowNotFound(Uuid),

  #[error("object not found: {0}")]
  ObjectNotFound(String),

  #[error("email already registered: {0}")]
  EmailTaken(String),

  #[error("invalid email or password")]
  InvalidCredentials,

  #[error("password hash error: {0}")]
  PasswordHash(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
