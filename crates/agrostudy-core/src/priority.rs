//! Priority-tier mapping for agenda events.
//!
//! Deterministic and side-effect free; independent of the hook layer. A
//! declared priority always wins. Otherwise the tier is derived from the
//! event kind and the number of whole days until it starts:
//!
//! - exam due within 7 days → high
//! - assignment due within 3 days → high
//! - anything due within 1 day → high
//! - due within 7 days → medium
//! - otherwise → low

use chrono::{DateTime, Utc};

use crate::event::{Event, EventKind, Priority};

/// Derive a tier from the kind and start time alone.
pub fn derived_priority(
  kind: EventKind,
  starts_at: DateTime<Utc>,
  now: DateTime<Utc>,
) -> Priority {
  let days = (starts_at - now).num_days();

  if kind == EventKind::Exam && days <= 7 {
    Priority::High
  } else if kind == EventKind::Assignment && days <= 3 {
    Priority::High
  } else if days <= 1 {
    Priority::High
  } else if days <= 7 {
    Priority::Medium
  } else {
    Priority::Low
  }
}

/// The tier to display for `event`: its declared priority if present,
/// otherwise the derived one.
pub fn display_priority(event: &Event, now: DateTime<Utc>) -> Priority {
  event
    .priority
    .unwrap_or_else(|| derived_priority(event.kind, event.starts_at, now))
}

#[cfg(test)]
mod tests {
  use chrono::Duration;

  use super::*;

  fn now() -> DateTime<Utc> {
    "2024-04-08T12:00:00Z".parse().unwrap()
  }

  #[test]
  fn exam_within_seven_days_is_high() {
    let at = now() + Duration::days(3);
    assert_eq!(derived_priority(EventKind::Exam, at, now()), Priority::High);
  }

  #[test]
  fn exam_beyond_seven_days_falls_through() {
    let at = now() + Duration::days(10);
    assert_eq!(derived_priority(EventKind::Exam, at, now()), Priority::Low);
  }

  #[test]
  fn assignment_within_three_days_is_high() {
    let at = now() + Duration::days(2);
    assert_eq!(
      derived_priority(EventKind::Assignment, at, now()),
      Priority::High
    );
  }

  #[test]
  fn assignment_in_five_days_is_medium() {
    let at = now() + Duration::days(5);
    assert_eq!(
      derived_priority(EventKind::Assignment, at, now()),
      Priority::Medium
    );
  }

  #[test]
  fn anything_due_tomorrow_is_high() {
    let at = now() + Duration::hours(30);
    assert_eq!(
      derived_priority(EventKind::Class, at, now()),
      Priority::High
    );
  }

  #[test]
  fn class_next_week_is_medium() {
    let at = now() + Duration::days(6);
    assert_eq!(
      derived_priority(EventKind::Class, at, now()),
      Priority::Medium
    );
  }

  #[test]
  fn far_future_is_low() {
    let at = now() + Duration::days(30);
    assert_eq!(
      derived_priority(EventKind::Other, at, now()),
      Priority::Low
    );
  }
}
