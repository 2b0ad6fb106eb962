//! Error types for `agrostudy-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  /// A required field was missing or malformed. Caught before any remote
  /// call; no partial state change has happened.
  #[error("validation failed: {0}")]
  Validation(String),

  /// A domain rule was violated (e.g. deleting a semester that still has
  /// subjects). Caught locally, no remote round-trip.
  #[error("conflict: {0}")]
  Conflict(String),

  /// An operation was invoked with no authenticated identity.
  #[error("no authenticated identity")]
  NoIdentity,

  /// The same intent is already in flight on this hook; the re-entrant
  /// call was dropped without issuing a gateway request.
  #[error("operation already in flight: {0}")]
  InFlight(&'static str),

  #[error("record not found: {0}")]
  NotFound(Uuid),

  /// A gateway response row failed schema validation and was rejected
  /// before entering the in-memory collection.
  #[error("malformed row: {0}")]
  MalformedRow(#[from] serde_json::Error),

  /// The gateway rejected the call. Local state is left at the last known
  /// good collection.
  #[error("remote error: {0}")]
  Remote(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn remote<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Remote(Box::new(err))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
