//! Event — an agenda entry (exam, assignment, class, or other).

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  record::{Draft, Resource, require},
  subject::SubjectRef,
};

/// The category of an agenda entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
  Exam,
  Assignment,
  Class,
  Other,
}

/// Display tier for an event; either declared by the user or derived from
/// the kind and days-until-start (see [`crate::priority`]).
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
  Low,
  Medium,
  High,
}

/// How the event entered the store.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum EventOrigin {
  /// Created through the agenda form.
  #[default]
  Manual,
  /// Ingested from an external calendar.
  Imported,
}

/// An agenda entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
  pub id:          Uuid,
  pub owner_id:    Uuid,
  pub title:       String,
  pub description: Option<String>,
  pub kind:        EventKind,
  pub starts_at:   DateTime<Utc>,
  pub ends_at:     Option<DateTime<Utc>>,
  pub location:    Option<String>,
  pub subject_id:  Option<Uuid>,
  /// Declared priority; absent means "derive from kind and date".
  pub priority:    Option<Priority>,
  /// Reminder lead-times in minutes before `starts_at`.
  pub reminders:   Vec<i64>,
  pub origin:      EventOrigin,
  pub created_at:  DateTime<Utc>,
  pub updated_at:  DateTime<Utc>,

  /// Resolved inline on fetch; never persisted.
  #[serde(skip)]
  pub subject: Option<SubjectRef>,
}

impl Resource for Event {
  type Draft = NewEvent;
  type Patch = EventPatch;

  const COLLECTION: &'static str = "events";
  const LABEL: &'static str = "event";

  fn id(&self) -> Uuid { self.id }

  fn owner_id(&self) -> Uuid { self.owner_id }

  /// Soonest start first.
  fn order(a: &Self, b: &Self) -> Ordering {
    a.starts_at.cmp(&b.starts_at)
  }

  fn carry_resolved(&mut self, previous: &Self) {
    self.subject = previous.subject.clone();
  }
}

/// Input to `create` on the events hook. The origin is always stamped
/// [`EventOrigin::Manual`]; imported events arrive through a separate path.
#[derive(Debug, Clone)]
pub struct NewEvent {
  pub title:       String,
  pub description: Option<String>,
  pub kind:        EventKind,
  pub starts_at:   DateTime<Utc>,
  pub ends_at:     Option<DateTime<Utc>>,
  pub location:    Option<String>,
  pub subject_id:  Option<Uuid>,
  pub priority:    Option<Priority>,
  pub reminders:   Vec<i64>,
}

impl Draft for NewEvent {
  type Resource = Event;

  fn validate(&self) -> Result<()> {
    require("title", &self.title)?;
    if let Some(ends_at) = self.ends_at
      && ends_at < self.starts_at
    {
      return Err(Error::Validation(
        "end time must not precede start time".into(),
      ));
    }
    Ok(())
  }

  fn into_resource(
    self,
    id: Uuid,
    owner_id: Uuid,
    now: DateTime<Utc>,
  ) -> Event {
    Event {
      id,
      owner_id,
      title: self.title,
      description: self.description,
      kind: self.kind,
      starts_at: self.starts_at,
      ends_at: self.ends_at,
      location: self.location,
      subject_id: self.subject_id,
      priority: self.priority,
      reminders: self.reminders,
      origin: EventOrigin::Manual,
      created_at: now,
      updated_at: now,
      subject: None,
    }
  }
}

/// Partial update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EventPatch {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub title:       Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub kind:        Option<EventKind>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub starts_at:   Option<DateTime<Utc>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub ends_at:     Option<DateTime<Utc>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub location:    Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub subject_id:  Option<Uuid>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub priority:    Option<Priority>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub reminders:   Option<Vec<i64>>,
}
