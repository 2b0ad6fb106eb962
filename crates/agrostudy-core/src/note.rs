//! Note — a markdown notebook entry, optionally linked to a subject.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Result,
  record::{Draft, Resource, require},
  subject::SubjectRef,
};

/// A notebook entry. Tags are logically a set; insertion order is not
/// significant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
  pub id:         Uuid,
  pub owner_id:   Uuid,
  pub title:      String,
  /// Markdown body.
  pub content:    String,
  pub subject_id: Option<Uuid>,
  pub tags:       Vec<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,

  /// Resolved inline on fetch; never persisted.
  #[serde(skip)]
  pub subject: Option<SubjectRef>,
}

impl Resource for Note {
  type Draft = NewNote;
  type Patch = NotePatch;

  const COLLECTION: &'static str = "notes";
  const LABEL: &'static str = "note";

  fn id(&self) -> Uuid { self.id }

  fn owner_id(&self) -> Uuid { self.owner_id }

  /// Newest created first.
  fn order(a: &Self, b: &Self) -> Ordering {
    b.created_at.cmp(&a.created_at)
  }

  fn carry_resolved(&mut self, previous: &Self) {
    self.subject = previous.subject.clone();
  }
}

#[derive(Debug, Clone)]
pub struct NewNote {
  pub title:      String,
  pub content:    String,
  pub subject_id: Option<Uuid>,
  pub tags:       Vec<String>,
}

impl Draft for NewNote {
  type Resource = Note;

  fn validate(&self) -> Result<()> {
    require("title", &self.title)?;
    require("content", &self.content)
  }

  fn into_resource(
    self,
    id: Uuid,
    owner_id: Uuid,
    now: DateTime<Utc>,
  ) -> Note {
    Note {
      id,
      owner_id,
      title: self.title,
      content: self.content,
      subject_id: self.subject_id,
      tags: self.tags,
      created_at: now,
      updated_at: now,
      subject: None,
    }
  }
}

/// Partial update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NotePatch {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub title:      Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub content:    Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub subject_id: Option<Uuid>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub tags:       Option<Vec<String>>,
}

/// An in-memory file handle shown alongside a note while it is being
/// edited. Explicitly ephemeral: the bytes are never uploaded and vanish
/// with the hook.
#[derive(Debug, Clone)]
pub struct NoteAttachment {
  pub file_name:  String,
  pub media_type: String,
  pub bytes:      Vec<u8>,
}
