//! Notes hook — the digital notebook.

use std::{collections::HashMap, sync::Arc};

use tokio::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use agrostudy_core::{
  Result,
  gateway::Gateway,
  note::{NewNote, Note, NoteAttachment, NotePatch},
};

use crate::{
  ResourceHook, notify::Notifier, session::IdentityWatch,
  subjects::subject_refs,
};

/// Preview-only attachments keyed by note id, scoped to the identity that
/// attached them.
#[derive(Default)]
struct AttachmentStore {
  owner:   Option<Uuid>,
  by_note: HashMap<Uuid, Vec<NoteAttachment>>,
}

pub struct NotesHook<G: Gateway> {
  inner:       ResourceHook<Note, G>,
  /// Never uploaded; the blobs vanish with the hook or with the identity
  /// that attached them.
  attachments: Mutex<AttachmentStore>,
}

impl<G: Gateway> NotesHook<G> {
  pub fn new(
    gateway: Arc<G>,
    identity: IdentityWatch,
    notifier: Arc<dyn Notifier>,
  ) -> Self {
    Self {
      inner:       ResourceHook::new(gateway, identity, notifier),
      attachments: Mutex::new(AttachmentStore::default()),
    }
  }

  /// Lock the attachment store, dropping a previous identity's blobs
  /// first.
  async fn attachment_store(&self) -> MutexGuard<'_, AttachmentStore> {
    let mut store = self.attachments.lock().await;
    let current = self.inner.identity().current().map(|i| i.id);
    if store.owner != current {
      store.owner = current;
      store.by_note.clear();
    }
    store
  }

  pub async fn sync(&self) -> Result<()> {
    self.inner.sync().await?;
    self.resolve_subjects().await
  }

  /// Fetch all notes and resolve each referenced subject inline. A note
  /// whose subject no longer exists keeps `subject: None` rather than
  /// erroring.
  pub async fn list(&self) -> Result<()> {
    self.inner.list().await?;
    self.resolve_subjects().await
  }

  pub async fn refresh(&self) -> Result<()> { self.list().await }

  pub async fn items(&self) -> Vec<Note> { self.inner.items().await }

  pub async fn create(&self, draft: NewNote) -> Result<Note> {
    self.inner.create(draft).await
  }

  pub async fn update(&self, id: Uuid, patch: NotePatch) -> Result<Note> {
    self.inner.update(id, patch).await
  }

  pub async fn delete(&self, id: Uuid) -> Result<()> {
    self.attachment_store().await.by_note.remove(&id);
    self.inner.delete(id).await
  }

  async fn resolve_subjects(&self) -> Result<()> {
    let Some(identity) = self.inner.identity().current() else {
      return Ok(());
    };
    let refs = subject_refs(self.inner.gateway().as_ref(), identity.id).await?;
    self
      .inner
      .with_items(|notes| {
        for note in notes {
          note.subject =
            note.subject_id.and_then(|id| refs.get(&id).cloned());
        }
      })
      .await;
    Ok(())
  }

  // ── Ephemeral attachments ─────────────────────────────────────────────

  pub async fn attach_file(&self, note_id: Uuid, attachment: NoteAttachment) {
    self
      .attachment_store()
      .await
      .by_note
      .entry(note_id)
      .or_default()
      .push(attachment);
  }

  pub async fn attachments_for(&self, note_id: Uuid) -> Vec<NoteAttachment> {
    self
      .attachment_store()
      .await
      .by_note
      .get(&note_id)
      .cloned()
      .unwrap_or_default()
  }

  pub async fn clear_attachments(&self, note_id: Uuid) {
    self.attachment_store().await.by_note.remove(&note_id);
  }
}
