//! Subject — a course within a semester.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Result,
  record::{Draft, Resource, require},
};

/// A course. `semester_id` must reference a semester owned by the same
/// identity; the subjects hook checks this against its loaded semesters
/// before issuing the insert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
  pub id:          Uuid,
  pub owner_id:    Uuid,
  pub name:        String,
  pub code:        Option<String>,
  /// Display token, e.g. `"#f59e0b"`.
  pub color:       String,
  pub semester_id: Uuid,
  pub created_at:  DateTime<Utc>,
  pub updated_at:  DateTime<Utc>,
}

impl Resource for Subject {
  type Draft = NewSubject;
  type Patch = SubjectPatch;

  const COLLECTION: &'static str = "subjects";
  const LABEL: &'static str = "subject";

  fn id(&self) -> Uuid { self.id }

  fn owner_id(&self) -> Uuid { self.owner_id }

  /// Name ascending.
  fn order(a: &Self, b: &Self) -> Ordering { a.name.cmp(&b.name) }
}

/// The slice of a subject attached inline to notes, events, and visits
/// when their collections are fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectRef {
  pub id:    Uuid,
  pub name:  String,
  pub color: String,
}

impl From<&Subject> for SubjectRef {
  fn from(s: &Subject) -> Self {
    Self { id: s.id, name: s.name.clone(), color: s.color.clone() }
  }
}

#[derive(Debug, Clone)]
pub struct NewSubject {
  pub name:        String,
  pub code:        Option<String>,
  pub color:       String,
  pub semester_id: Uuid,
}

impl Draft for NewSubject {
  type Resource = Subject;

  fn validate(&self) -> Result<()> {
    require("name", &self.name)?;
    require("color", &self.color)
  }

  fn into_resource(
    self,
    id: Uuid,
    owner_id: Uuid,
    now: DateTime<Utc>,
  ) -> Subject {
    Subject {
      id,
      owner_id,
      name: self.name,
      code: self.code,
      color: self.color,
      semester_id: self.semester_id,
      created_at: now,
      updated_at: now,
    }
  }
}

/// Partial update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SubjectPatch {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub name:        Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub code:        Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub color:       Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub semester_id: Option<Uuid>,
}
