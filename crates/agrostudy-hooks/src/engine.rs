//! The generic owner-scoped CRUD engine.
//!
//! One [`ResourceHook`] instance owns the in-memory collection for one
//! entity type. Every gateway response passes through a schema-validation
//! boundary before touching the collection, and the collection only ever
//! reflects acknowledged server state: a failed mutation leaves it at the
//! last known good contents.
//!
//! Phase machine, per instance:
//!
//! - `Uninitialized` — identity unknown; no gateway call may be issued.
//! - `Loading` — a fetch-all request is outstanding.
//! - `Ready` — collection reflects last known server state.
//! - `ErrorIdle` — the fetch failed; the collection remains whatever it
//!   was, and only a manual `refresh` retries.
//!
//! Identity loss (sign-out) resets the hook to `Uninitialized` with an
//! empty collection. Every read reconciles the collection against the
//! current identity first, so a signed-out or switched session never
//! observes the previous identity's records.

use std::{
  cmp::Ordering,
  collections::HashSet,
  sync::{Arc, Mutex as StdMutex},
};

use chrono::Utc;
use serde_json::Value;
use tokio::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use agrostudy_core::{
  Error, Result,
  gateway::Gateway,
  identity::Identity,
  record::{Draft as _, Resource},
};

use crate::{notify::Notifier, session::IdentityWatch};

/// Lifecycle phase of a hook instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
  Uninitialized,
  Loading,
  Ready,
  ErrorIdle,
}

/// One in-flight guard slot per intent. A re-entrant call with the same
/// intent fails fast instead of issuing a second overlapping request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Intent {
  List,
  Create,
  Update,
  Delete,
}

impl Intent {
  fn name(self) -> &'static str {
    match self {
      Self::List => "list",
      Self::Create => "create",
      Self::Update => "update",
      Self::Delete => "delete",
    }
  }
}

struct State<R> {
  phase: Phase,
  owner: Option<Uuid>,
  items: Vec<R>,
}

/// Generic CRUD engine for one entity type `R`, scoped to the current
/// identity and backed by gateway `G`.
pub struct ResourceHook<R: Resource, G: Gateway> {
  gateway:   Arc<G>,
  notifier:  Arc<dyn Notifier>,
  identity:  IdentityWatch,
  state:     Mutex<State<R>>,
  in_flight: StdMutex<HashSet<Intent>>,
}

impl<R: Resource, G: Gateway> ResourceHook<R, G> {
  pub fn new(
    gateway: Arc<G>,
    identity: IdentityWatch,
    notifier: Arc<dyn Notifier>,
  ) -> Self {
    Self {
      gateway,
      notifier,
      identity,
      state: Mutex::new(State {
        phase: Phase::Uninitialized,
        owner: None,
        items: Vec::new(),
      }),
      in_flight: StdMutex::new(HashSet::new()),
    }
  }

  pub async fn phase(&self) -> Phase { self.current_state().await.phase }

  /// Snapshot of the current collection, in sort order.
  pub async fn items(&self) -> Vec<R> {
    self.current_state().await.items.clone()
  }

  /// Run `f` against the live collection. Used by the entity hooks for
  /// relation enrichment and derived statistics.
  pub async fn with_items<T>(&self, f: impl FnOnce(&mut Vec<R>) -> T) -> T {
    f(&mut self.current_state().await.items)
  }

  /// Lock the state, discarding it first when the session identity no
  /// longer matches the owner it was loaded for. A signed-out or switched
  /// session never observes the previous identity's records, even before
  /// the next [`Self::sync`].
  async fn current_state(&self) -> MutexGuard<'_, State<R>> {
    let mut state = self.state.lock().await;
    let current = self.identity.current().map(|i| i.id);
    if state.owner != current {
      state.owner = None;
      state.items.clear();
      state.phase = Phase::Uninitialized;
    }
    state
  }

  /// Lock the state for an operation on behalf of `owner`, discarding any
  /// collection still belonging to a previous identity.
  async fn state_for(&self, owner: Uuid) -> MutexGuard<'_, State<R>> {
    let mut state = self.state.lock().await;
    if state.owner != Some(owner) {
      state.owner = Some(owner);
      state.items.clear();
      state.phase = Phase::Uninitialized;
    }
    state
  }

  // ── Identity gating ───────────────────────────────────────────────────

  fn require_identity(&self) -> Result<Identity> {
    self.identity.current().ok_or(Error::NoIdentity)
  }

  /// Reconcile with the session: a newly available identity triggers a
  /// fetch, a lost identity resets to `Uninitialized` with an empty
  /// collection, an unchanged identity is a no-op.
  pub async fn sync(&self) -> Result<()> {
    let current = self.identity.current();
    {
      let mut state = self.state.lock().await;
      match (&state.owner, &current) {
        (Some(owner), Some(identity)) if *owner == identity.id => {
          return Ok(());
        }
        (_, Some(identity)) => {
          state.owner = Some(identity.id);
          state.items.clear();
        }
        (_, None) => {
          state.owner = None;
          state.items.clear();
          state.phase = Phase::Uninitialized;
          return Ok(());
        }
      }
    }
    self.list().await
  }

  // ── Operations ────────────────────────────────────────────────────────

  /// Fetch the full collection for the current identity. On failure the
  /// collection is left at its last good contents and no retry is
  /// scheduled; call [`Self::refresh`] to try again.
  pub async fn list(&self) -> Result<()> {
    let _guard = self.acquire(Intent::List)?;
    let identity = self.require_identity()?;

    self.state_for(identity.id).await.phase = Phase::Loading;

    match self.gateway.fetch_all(R::COLLECTION, identity.id).await {
      Ok(rows) => {
        let items = decode_rows::<R>(rows, identity.id);
        let mut state = self.state_for(identity.id).await;
        state.items = items;
        state.phase = Phase::Ready;
        Ok(())
      }
      Err(e) => {
        tracing::warn!(collection = R::COLLECTION, error = %e, "fetch failed");
        self
          .notifier
          .error(&format!("failed to load {}s", R::LABEL));
        self.state_for(identity.id).await.phase = Phase::ErrorIdle;
        Err(Error::remote(e))
      }
    }
  }

  /// Manual re-fetch, exposed for reconciliation after external changes.
  pub async fn refresh(&self) -> Result<()> { self.list().await }

  /// Validate locally, insert remotely, and merge the acknowledged record
  /// into the collection at its sort position. Returns the created record
  /// for immediate use.
  pub async fn create(&self, draft: R::Draft) -> Result<R> {
    let guard = self.acquire(Intent::Create)?;
    self.create_with(draft, guard).await
  }

  /// As [`Self::create`], with the intent guard already held by the
  /// caller. Entity hooks that upload a payload before inserting its row
  /// hold the guard across both steps, so a re-entrant call fails before
  /// transferring any bytes.
  pub(crate) async fn create_with(
    &self,
    draft: R::Draft,
    _guard: IntentGuard<'_>,
  ) -> Result<R> {
    let identity = self.require_identity()?;

    if let Err(e) = draft.validate() {
      self.notifier.error(&e.to_string());
      return Err(e);
    }

    let record = draft.into_resource(Uuid::new_v4(), identity.id, Utc::now());
    let row = serde_json::to_value(&record)?;

    let stored = match self.gateway.insert(R::COLLECTION, row).await {
      Ok(stored) => stored,
      Err(e) => {
        tracing::warn!(collection = R::COLLECTION, error = %e, "insert failed");
        self
          .notifier
          .error(&format!("failed to create {}", R::LABEL));
        return Err(Error::remote(e));
      }
    };

    let record = decode_row::<R>(stored)?;
    {
      let mut state = self.state_for(identity.id).await;
      let at = state
        .items
        .partition_point(|x| R::order(x, &record) != Ordering::Greater);
      state.items.insert(at, record.clone());
    }
    self.notifier.success(&format!("{} created", R::LABEL));
    Ok(record)
  }

  /// Apply a partial update remotely and replace the local record with the
  /// server-returned row (picking up server-computed fields), re-sorting
  /// if the sort key changed.
  pub async fn update(&self, id: Uuid, patch: R::Patch) -> Result<R> {
    let _guard = self.acquire(Intent::Update)?;
    let identity = self.require_identity()?;

    let patch = serde_json::to_value(&patch)?;
    let stored = match self
      .gateway
      .update(R::COLLECTION, id, identity.id, patch)
      .await
    {
      Ok(stored) => stored,
      Err(e) => {
        tracing::warn!(collection = R::COLLECTION, %id, error = %e, "update failed");
        self
          .notifier
          .error(&format!("failed to update {}", R::LABEL));
        return Err(Error::remote(e));
      }
    };

    let mut record = decode_row::<R>(stored)?;
    {
      let mut state = self.state_for(identity.id).await;
      match state.items.iter_mut().find(|x| x.id() == id) {
        Some(slot) => {
          record.carry_resolved(slot);
          *slot = record.clone();
        }
        None => state.items.push(record.clone()),
      }
      state.items.sort_by(R::order);
    }
    self.notifier.success(&format!("{} updated", R::LABEL));
    Ok(record)
  }

  /// Delete remotely, then drop the record from the collection.
  pub async fn delete(&self, id: Uuid) -> Result<()> {
    let _guard = self.acquire(Intent::Delete)?;
    let identity = self.require_identity()?;

    if let Err(e) = self.gateway.delete(R::COLLECTION, id, identity.id).await {
      tracing::warn!(collection = R::COLLECTION, %id, error = %e, "delete failed");
      self
        .notifier
        .error(&format!("failed to delete {}", R::LABEL));
      return Err(Error::remote(e));
    }

    self
      .state_for(identity.id)
      .await
      .items
      .retain(|x| x.id() != id);
    self.notifier.success(&format!("{} deleted", R::LABEL));
    Ok(())
  }

  // ── In-flight guard ───────────────────────────────────────────────────

  fn acquire(&self, intent: Intent) -> Result<IntentGuard<'_>> {
    let mut set = lock_poison_free(&self.in_flight);
    if !set.insert(intent) {
      return Err(Error::InFlight(intent.name()));
    }
    Ok(IntentGuard { set: &self.in_flight, intent })
  }

  /// Claim the create slot ahead of time, for hooks that do work (payload
  /// uploads) before the row insert.
  pub(crate) fn begin_create(&self) -> Result<IntentGuard<'_>> {
    self.acquire(Intent::Create)
  }

  pub(crate) fn gateway(&self) -> &Arc<G> { &self.gateway }

  pub(crate) fn notifier(&self) -> &Arc<dyn Notifier> { &self.notifier }

  pub(crate) fn identity(&self) -> &IdentityWatch { &self.identity }
}

pub(crate) struct IntentGuard<'a> {
  set:    &'a StdMutex<HashSet<Intent>>,
  intent: Intent,
}

impl Drop for IntentGuard<'_> {
  fn drop(&mut self) {
    lock_poison_free(self.set).remove(&self.intent);
  }
}

fn lock_poison_free<'a>(
  mutex: &'a StdMutex<HashSet<Intent>>,
) -> std::sync::MutexGuard<'a, HashSet<Intent>> {
  mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// ─── Validation boundary ─────────────────────────────────────────────────────

/// Decode a fetched collection, rejecting malformed rows and rows owned by
/// anyone other than `owner` before they can enter the collection.
fn decode_rows<R: Resource>(rows: Vec<Value>, owner: Uuid) -> Vec<R> {
  let mut items = Vec::with_capacity(rows.len());
  for row in rows {
    match serde_json::from_value::<R>(row) {
      Ok(record) if record.owner_id() == owner => items.push(record),
      Ok(record) => {
        tracing::warn!(
          collection = R::COLLECTION,
          id = %record.id(),
          "dropping row with foreign owner"
        );
      }
      Err(e) => {
        tracing::warn!(
          collection = R::COLLECTION,
          error = %e,
          "dropping malformed row"
        );
      }
    }
  }
  items.sort_by(R::order);
  items
}

/// Decode a single mutation echo; a malformed echo is an error, not a
/// silent skip.
fn decode_row<R: Resource>(row: Value) -> Result<R> {
  Ok(serde_json::from_value(row)?)
}
