//! Visit — a field-visit journal entry and its photos.
//!
//! A photo is a composition child: it cannot outlive its visit. The binary
//! payload lives in object storage; the row is metadata plus the resolved
//! public URL.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Result,
  record::{Draft, Resource, require},
  subject::SubjectRef,
};

/// The category of a field visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisitKind {
  TechnicalVisit,
  FieldClass,
  Research,
  Other,
}

/// Whether the entry has been reconciled with the remote store. Entries
/// captured offline carry `Pending` until their next successful sync.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
  #[default]
  Synced,
  Pending,
}

/// A field-visit journal entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Visit {
  pub id:           Uuid,
  pub owner_id:     Uuid,
  /// Free-text location, e.g. "Fazenda Santa Rita".
  pub location:     String,
  pub date:         DateTime<Utc>,
  pub kind:         VisitKind,
  /// Markdown field notes.
  pub observations: Option<String>,
  pub subject_id:   Option<Uuid>,
  /// Opaque GPS payload captured by the device, if any.
  pub gps:          Option<serde_json::Value>,
  pub sync_status:  SyncStatus,
  pub created_at:   DateTime<Utc>,
  pub updated_at:   DateTime<Utc>,

  /// Resolved inline on fetch; never persisted.
  #[serde(skip)]
  pub subject: Option<SubjectRef>,
  /// Child photos, grouped onto the visit on fetch; never persisted on
  /// this row.
  #[serde(skip)]
  pub photos:  Vec<VisitPhoto>,
}

impl Resource for Visit {
  type Draft = NewVisit;
  type Patch = VisitPatch;

  const COLLECTION: &'static str = "visits";
  const LABEL: &'static str = "visit";

  fn id(&self) -> Uuid { self.id }

  fn owner_id(&self) -> Uuid { self.owner_id }

  /// Newest date first.
  fn order(a: &Self, b: &Self) -> Ordering { b.date.cmp(&a.date) }

  fn carry_resolved(&mut self, previous: &Self) {
    self.subject = previous.subject.clone();
    self.photos = previous.photos.clone();
  }
}

#[derive(Debug, Clone)]
pub struct NewVisit {
  pub location:     String,
  pub date:         DateTime<Utc>,
  pub kind:         VisitKind,
  pub observations: Option<String>,
  pub subject_id:   Option<Uuid>,
  pub gps:          Option<serde_json::Value>,
}

impl Draft for NewVisit {
  type Resource = Visit;

  fn validate(&self) -> Result<()> { require("location", &self.location) }

  fn into_resource(
    self,
    id: Uuid,
    owner_id: Uuid,
    now: DateTime<Utc>,
  ) -> Visit {
    Visit {
      id,
      owner_id,
      location: self.location,
      date: self.date,
      kind: self.kind,
      observations: self.observations,
      subject_id: self.subject_id,
      gps: self.gps,
      sync_status: SyncStatus::default(),
      created_at: now,
      updated_at: now,
      subject: None,
      photos: Vec::new(),
    }
  }
}

/// Partial update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize)]
pub struct VisitPatch {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub location:     Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub date:         Option<DateTime<Utc>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub kind:         Option<VisitKind>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub observations: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub subject_id:   Option<Uuid>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub sync_status:  Option<SyncStatus>,
}

// ─── Photos ──────────────────────────────────────────────────────────────────

/// A photo taken during a visit. The row is metadata only; the bytes live
/// in object storage under `storage_path`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisitPhoto {
  pub id:           Uuid,
  pub owner_id:     Uuid,
  pub visit_id:     Uuid,
  pub storage_path: String,
  /// Resolved public URL for the stored object.
  pub url:          String,
  pub caption:      Option<String>,
  pub captured_at:  DateTime<Utc>,
  /// Opaque EXIF blob, if the capturing device supplied one.
  pub exif:         Option<serde_json::Value>,
  pub created_at:   DateTime<Utc>,
  pub updated_at:   DateTime<Utc>,
}

impl Resource for VisitPhoto {
  type Draft = NewVisitPhoto;
  type Patch = VisitPhotoPatch;

  const COLLECTION: &'static str = "visit_photos";
  const LABEL: &'static str = "photo";

  fn id(&self) -> Uuid { self.id }

  fn owner_id(&self) -> Uuid { self.owner_id }

  /// Oldest capture first, i.e. the order the photos were taken.
  fn order(a: &Self, b: &Self) -> Ordering {
    a.captured_at.cmp(&b.captured_at)
  }
}

/// Built by the visits hook after the object upload has succeeded.
#[derive(Debug, Clone)]
pub struct NewVisitPhoto {
  pub visit_id:     Uuid,
  pub storage_path: String,
  pub url:          String,
  pub caption:      Option<String>,
  pub captured_at:  DateTime<Utc>,
  pub exif:         Option<serde_json::Value>,
}

impl Draft for NewVisitPhoto {
  type Resource = VisitPhoto;

  fn validate(&self) -> Result<()> {
    require("storage_path", &self.storage_path)
  }

  fn into_resource(
    self,
    id: Uuid,
    owner_id: Uuid,
    now: DateTime<Utc>,
  ) -> VisitPhoto {
    VisitPhoto {
      id,
      owner_id,
      visit_id: self.visit_id,
      storage_path: self.storage_path,
      url: self.url,
      caption: self.caption,
      captured_at: self.captured_at,
      exif: self.exif,
      created_at: now,
      updated_at: now,
    }
  }
}

/// Partial update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize)]
pub struct VisitPhotoPatch {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub caption: Option<String>,
}
