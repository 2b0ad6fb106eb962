//! The `Gateway` and `AuthGateway` traits.
//!
//! The gateway is the remote persistence collaborator: authenticated CRUD
//! over named collections plus object storage. Rows travel as loosely-typed
//! JSON; the typed schema-validation boundary sits in the hook layer,
//! immediately after each response.
//!
//! Implemented by storage backends (e.g. `agrostudy-store-sqlite`). Higher
//! layers depend on this abstraction, not on any concrete backend.
//!
//! All methods return `Send` futures so the traits can be used in
//! multi-threaded async runtimes.

use std::future::Future;

use serde_json::Value;
use uuid::Uuid;

use crate::identity::{Identity, NewIdentity};

/// Abstraction over the remote data store.
///
/// Every data operation is scoped by `owner`; a conforming backend also
/// enforces the scope server-side, but callers must never issue a query
/// lacking it.
pub trait Gateway: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Rows ──────────────────────────────────────────────────────────────

  /// Fetch every row of `collection` owned by `owner`.
  fn fetch_all<'a>(
    &'a self,
    collection: &'a str,
    owner: Uuid,
  ) -> impl Future<Output = Result<Vec<Value>, Self::Error>> + Send + 'a;

  /// Insert `row` (a JSON object carrying at least `id` and `owner_id`)
  /// and return the stored row with store-assigned timestamps.
  fn insert<'a>(
    &'a self,
    collection: &'a str,
    row: Value,
  ) -> impl Future<Output = Result<Value, Self::Error>> + Send + 'a;

  /// Merge the top-level keys of `patch` into the row matching both `id`
  /// and `owner`, bump `updated_at`, and return the updated row.
  fn update<'a>(
    &'a self,
    collection: &'a str,
    id: Uuid,
    owner: Uuid,
    patch: Value,
  ) -> impl Future<Output = Result<Value, Self::Error>> + Send + 'a;

  /// Delete the row matching both `id` and `owner`. Deleting a row that
  /// does not exist is an error.
  fn delete<'a>(
    &'a self,
    collection: &'a str,
    id: Uuid,
    owner: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  // ── Objects ───────────────────────────────────────────────────────────

  /// Store a binary payload under `bucket`/`path`.
  fn upload_object<'a>(
    &'a self,
    bucket: &'a str,
    path: &'a str,
    bytes: Vec<u8>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Remove the payload at `bucket`/`path`.
  fn delete_object<'a>(
    &'a self,
    bucket: &'a str,
    path: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Resolve the publicly-addressable URL for `bucket`/`path`. Pure
  /// string derivation; does not check existence.
  fn public_url(&self, bucket: &str, path: &str) -> String;
}

/// Abstraction over the authentication half of the backend.
pub trait AuthGateway: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Register a new identity. Fails if the email is already taken.
  fn sign_up(
    &self,
    input: NewIdentity,
  ) -> impl Future<Output = Result<Identity, Self::Error>> + Send + '_;

  /// Verify credentials and return the identity.
  fn sign_in<'a>(
    &'a self,
    email: &'a str,
    password: &'a str,
  ) -> impl Future<Output = Result<Identity, Self::Error>> + Send + 'a;
}
