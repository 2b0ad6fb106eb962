//! Subjects and semesters — one hook managing both collections, because
//! the semester-delete rule depends on the loaded subjects.

use std::{collections::HashMap, sync::Arc};

use uuid::Uuid;

use agrostudy_core::{
  Error, Result,
  gateway::Gateway,
  record::Resource as _,
  semester::{NewSemester, Semester, SemesterPatch},
  subject::{NewSubject, Subject, SubjectPatch, SubjectRef},
};

use crate::{ResourceHook, notify::Notifier, session::IdentityWatch};

pub struct SubjectsHook<G: Gateway> {
  semesters: ResourceHook<Semester, G>,
  subjects:  ResourceHook<Subject, G>,
}

impl<G: Gateway> SubjectsHook<G> {
  pub fn new(
    gateway: Arc<G>,
    identity: IdentityWatch,
    notifier: Arc<dyn Notifier>,
  ) -> Self {
    Self {
      semesters: ResourceHook::new(
        gateway.clone(),
        identity.clone(),
        notifier.clone(),
      ),
      subjects:  ResourceHook::new(gateway, identity, notifier),
    }
  }

  pub async fn sync(&self) -> Result<()> {
    self.semesters.sync().await?;
    self.subjects.sync().await
  }

  pub async fn list(&self) -> Result<()> {
    self.semesters.list().await?;
    self.subjects.list().await
  }

  pub async fn semesters(&self) -> Vec<Semester> {
    self.semesters.items().await
  }

  pub async fn subjects(&self) -> Vec<Subject> { self.subjects.items().await }

  // ── Semesters ─────────────────────────────────────────────────────────

  pub async fn create_semester(&self, draft: NewSemester) -> Result<Semester> {
    self.semesters.create(draft).await
  }

  pub async fn update_semester(
    &self,
    id: Uuid,
    patch: SemesterPatch,
  ) -> Result<Semester> {
    self.semesters.update(id, patch).await
  }

  /// Rejected locally — no gateway call — while any loaded subject still
  /// references the semester.
  pub async fn delete_semester(&self, id: Uuid) -> Result<()> {
    let referenced = self
      .subjects
      .with_items(|subjects| subjects.iter().any(|s| s.semester_id == id))
      .await;
    if referenced {
      let err =
        Error::Conflict("semester still has subjects; delete them first".into());
      self.semesters.notifier().error(&err.to_string());
      return Err(err);
    }
    self.semesters.delete(id).await
  }

  // ── Subjects ──────────────────────────────────────────────────────────

  /// The referenced semester must already be loaded for the current
  /// identity; a dangling reference is rejected locally.
  pub async fn create_subject(&self, draft: NewSubject) -> Result<Subject> {
    let known = self
      .semesters
      .with_items(|semesters| {
        semesters.iter().any(|s| s.id == draft.semester_id)
      })
      .await;
    if !known {
      let err = Error::Conflict("semester not found for this subject".into());
      self.subjects.notifier().error(&err.to_string());
      return Err(err);
    }
    self.subjects.create(draft).await
  }

  pub async fn update_subject(
    &self,
    id: Uuid,
    patch: SubjectPatch,
  ) -> Result<Subject> {
    self.subjects.update(id, patch).await
  }

  /// Unconditional; cascading consequences are the gateway's concern.
  pub async fn delete_subject(&self, id: Uuid) -> Result<()> {
    self.subjects.delete(id).await
  }
}

/// Fetch the current identity's subjects and index them for inline
/// resolution on notes, events, and visits. Malformed rows are dropped at
/// the same validation boundary as everywhere else.
pub(crate) async fn subject_refs<G: Gateway>(
  gateway: &G,
  owner: Uuid,
) -> Result<HashMap<Uuid, SubjectRef>> {
  let rows = gateway
    .fetch_all(Subject::COLLECTION, owner)
    .await
    .map_err(Error::remote)?;

  let mut refs = HashMap::with_capacity(rows.len());
  for row in rows {
    match serde_json::from_value::<Subject>(row) {
      Ok(subject) => {
        refs.insert(subject.id, SubjectRef::from(&subject));
      }
      Err(e) => {
        tracing::warn!(error = %e, "dropping malformed subject row");
      }
    }
  }
  Ok(refs)
}
