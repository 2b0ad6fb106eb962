//! The `Resource` and `Draft` traits — the per-entity configuration
//! consumed by the generic CRUD engine.
//!
//! Each owner-scoped entity implements [`Resource`] once: its collection
//! name, id/owner accessors, and the ordering of its in-memory collection.
//! Its creation input implements [`Draft`]: local required-field validation
//! and construction of the full record from the draft plus the ambient
//! identity and timestamp.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

use crate::Result;

/// An owner-scoped record persisted through the gateway.
pub trait Resource:
  Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
  /// The creation input accepted by `create`.
  type Draft: Draft<Resource = Self>;
  /// The partial-update input accepted by `update`. Serialised to a JSON
  /// object whose present keys are merged into the stored row; `None`
  /// fields must not serialise.
  type Patch: Serialize + Send + Sync;

  /// Collection name on the gateway (e.g. `"notes"`).
  const COLLECTION: &'static str;
  /// Human-readable singular label used in notifications (e.g. `"note"`).
  const LABEL: &'static str;

  fn id(&self) -> Uuid;
  fn owner_id(&self) -> Uuid;

  /// Total order of the in-memory collection (type-specific sort key).
  fn order(a: &Self, b: &Self) -> Ordering;

  /// Copy fetch-resolved fields (relations attached by the entity hook,
  /// never persisted) from the record this one replaces after an update.
  /// Default: nothing to carry.
  fn carry_resolved(&mut self, _previous: &Self) {}
}

/// Creation input for a [`Resource`].
pub trait Draft: Send + Sync {
  type Resource;

  /// Reject locally (no remote round-trip) if any required field is empty
  /// or an invariant between fields is violated.
  fn validate(&self) -> Result<()>;

  /// Build the full record. `id` is assigned by the caller; `created_at`
  /// and `updated_at` are overwritten by the store on insert.
  fn into_resource(
    self,
    id: Uuid,
    owner_id: Uuid,
    now: DateTime<Utc>,
  ) -> Self::Resource;
}

/// Shared helper: a required text field must be non-empty after trimming.
pub fn require(field: &'static str, value: &str) -> Result<()> {
  if value.trim().is_empty() {
    return Err(crate::Error::Validation(format!("{field} is required")));
  }
  Ok(())
}
