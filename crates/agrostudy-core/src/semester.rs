//! Semester — an academic term that groups subjects.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  record::{Draft, Resource, require},
};

/// An academic term. Deleted only when no subject references it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Semester {
  pub id:         Uuid,
  pub owner_id:   Uuid,
  pub title:      String,
  pub start_date: NaiveDate,
  pub end_date:   NaiveDate,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Resource for Semester {
  type Draft = NewSemester;
  type Patch = SemesterPatch;

  const COLLECTION: &'static str = "semesters";
  const LABEL: &'static str = "semester";

  fn id(&self) -> Uuid { self.id }

  fn owner_id(&self) -> Uuid { self.owner_id }

  /// Newest start date first.
  fn order(a: &Self, b: &Self) -> Ordering {
    b.start_date.cmp(&a.start_date)
  }
}

/// Input to `create` on the subjects hook.
#[derive(Debug, Clone)]
pub struct NewSemester {
  pub title:      String,
  pub start_date: NaiveDate,
  pub end_date:   NaiveDate,
}

impl Draft for NewSemester {
  type Resource = Semester;

  fn validate(&self) -> Result<()> {
    require("title", &self.title)?;
    if self.end_date < self.start_date {
      return Err(Error::Validation(
        "end date must not precede start date".into(),
      ));
    }
    Ok(())
  }

  fn into_resource(
    self,
    id: Uuid,
    owner_id: Uuid,
    now: DateTime<Utc>,
  ) -> Semester {
    Semester {
      id,
      owner_id,
      title: self.title,
      start_date: self.start_date,
      end_date: self.end_date,
      created_at: now,
      updated_at: now,
    }
  }
}

/// Partial update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SemesterPatch {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub title:      Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub start_date: Option<NaiveDate>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub end_date:   Option<NaiveDate>,
}
