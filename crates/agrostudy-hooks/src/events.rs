//! Events hook — the academic agenda.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use agrostudy_core::{
  Result,
  event::{Event, EventPatch, NewEvent},
  gateway::Gateway,
  stats::{EventStats, event_stats},
};

use crate::{
  ResourceHook, notify::Notifier, session::IdentityWatch,
  subjects::subject_refs,
};

pub struct EventsHook<G: Gateway> {
  inner: ResourceHook<Event, G>,
}

impl<G: Gateway> EventsHook<G> {
  pub fn new(
    gateway: Arc<G>,
    identity: IdentityWatch,
    notifier: Arc<dyn Notifier>,
  ) -> Self {
    Self { inner: ResourceHook::new(gateway, identity, notifier) }
  }

  pub async fn sync(&self) -> Result<()> {
    self.inner.sync().await?;
    self.resolve_subjects().await
  }

  /// Fetch all events, soonest first, with subjects resolved inline.
  pub async fn list(&self) -> Result<()> {
    self.inner.list().await?;
    self.resolve_subjects().await
  }

  pub async fn refresh(&self) -> Result<()> { self.list().await }

  pub async fn items(&self) -> Vec<Event> { self.inner.items().await }

  /// Origin is always stamped "manual"; imported events arrive elsewhere.
  pub async fn create(&self, draft: NewEvent) -> Result<Event> {
    self.inner.create(draft).await
  }

  pub async fn update(&self, id: Uuid, patch: EventPatch) -> Result<Event> {
    self.inner.update(id, patch).await
  }

  pub async fn delete(&self, id: Uuid) -> Result<()> {
    self.inner.delete(id).await
  }

  /// Derived statistics over the current collection, as of `now`.
  pub async fn stats(&self, now: DateTime<Utc>) -> EventStats {
    self.inner.with_items(|events| event_stats(events, now)).await
  }

  async fn resolve_subjects(&self) -> Result<()> {
    let Some(identity) = self.inner.identity().current() else {
      return Ok(());
    };
    let refs = subject_refs(self.inner.gateway().as_ref(), identity.id).await?;
    self
      .inner
      .with_items(|events| {
        for event in events {
          event.subject =
            event.subject_id.and_then(|id| refs.get(&id).cloned());
        }
      })
      .await;
    Ok(())
  }
}
