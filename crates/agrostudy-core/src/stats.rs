//! Derived statistics — pure functions over the current collections,
//! recomputed on demand, never stored.

use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc};

use crate::{
  event::{Event, EventKind},
  library::PdfDocument,
  visit::{Visit, VisitKind},
};

// ─── Events ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventStats {
  /// Events whose start falls within the current calendar week.
  pub this_week:   usize,
  pub exams:       usize,
  pub assignments: usize,
  pub classes:     usize,
}

/// Start of the calendar week containing `now`: Monday 00:00 UTC.
pub fn week_start(now: DateTime<Utc>) -> DateTime<Utc> {
  let date = now.date_naive();
  let monday =
    date - Duration::days(date.weekday().num_days_from_monday() as i64);
  monday.and_time(NaiveTime::MIN).and_utc()
}

/// Compute event statistics as of `now`. The week window is half-open:
/// the week-start boundary itself is included, the next one is not.
pub fn event_stats(events: &[Event], now: DateTime<Utc>) -> EventStats {
  let start = week_start(now);
  let end = start + Duration::days(7);

  let mut stats = EventStats::default();
  for event in events {
    if event.starts_at >= start && event.starts_at < end {
      stats.this_week += 1;
    }
    match event.kind {
      EventKind::Exam => stats.exams += 1,
      EventKind::Assignment => stats.assignments += 1,
      EventKind::Class => stats.classes += 1,
      EventKind::Other => {}
    }
  }
  stats
}

// ─── Visits ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VisitStats {
  /// Visits dated at or before `now`.
  pub completed:        usize,
  /// Visits dated after `now`.
  pub scheduled:        usize,
  pub total_photos:     usize,
  pub technical_visits: usize,
  pub field_classes:    usize,
  pub research:         usize,
  pub other:            usize,
}

pub fn visit_stats(visits: &[Visit], now: DateTime<Utc>) -> VisitStats {
  let mut stats = VisitStats::default();
  for visit in visits {
    if visit.date <= now {
      stats.completed += 1;
    } else {
      stats.scheduled += 1;
    }
    stats.total_photos += visit.photos.len();
    match visit.kind {
      VisitKind::TechnicalVisit => stats.technical_visits += 1,
      VisitKind::FieldClass => stats.field_classes += 1,
      VisitKind::Research => stats.research += 1,
      VisitKind::Other => stats.other += 1,
    }
  }
  stats
}

// ─── PDF library ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PdfStats {
  pub total_pdfs: usize,
  pub favorites:  usize,
  /// Human-readable sum of all document sizes.
  pub total_size: String,
  /// Documents created in the current calendar month.
  pub this_month: usize,
}

/// Format a byte count as megabytes with one decimal place, switching to
/// gigabytes once the total reaches 1024 MB.
pub fn format_size(bytes: u64) -> String {
  let mb = bytes as f64 / (1024.0 * 1024.0);
  if mb >= 1024.0 {
    format!("{:.1} GB", mb / 1024.0)
  } else {
    format!("{mb:.1} MB")
  }
}

pub fn pdf_stats(documents: &[PdfDocument], now: DateTime<Utc>) -> PdfStats {
  let total_bytes: u64 = documents.iter().map(|d| d.size_bytes).sum();
  PdfStats {
    total_pdfs: documents.len(),
    favorites:  documents.iter().filter(|d| d.favorite).count(),
    total_size: format_size(total_bytes),
    this_month: documents
      .iter()
      .filter(|d| {
        d.created_at.year() == now.year() && d.created_at.month() == now.month()
      })
      .count(),
  }
}

#[cfg(test)]
mod tests {
  use chrono::Duration;

  use super::*;
  use crate::event::{EventOrigin, Priority};

  fn now() -> DateTime<Utc> {
    // A Wednesday.
    "2024-04-10T15:30:00Z".parse().unwrap()
  }

  fn event_at(starts_at: DateTime<Utc>, kind: EventKind) -> Event {
    Event {
      id: uuid::Uuid::new_v4(),
      owner_id: uuid::Uuid::new_v4(),
      title: "e".into(),
      description: None,
      kind,
      starts_at,
      ends_at: None,
      location: None,
      subject_id: None,
      priority: Some(Priority::Low),
      reminders: vec![],
      origin: EventOrigin::Manual,
      created_at: now(),
      updated_at: now(),
      subject: None,
    }
  }

  #[test]
  fn week_starts_on_monday_midnight() {
    let monday: DateTime<Utc> = "2024-04-08T00:00:00Z".parse().unwrap();
    assert_eq!(week_start(now()), monday);
  }

  #[test]
  fn week_boundary_is_inclusive_at_start() {
    let start = week_start(now());
    let on_boundary = event_at(start, EventKind::Class);
    let just_before =
      event_at(start - Duration::seconds(1), EventKind::Class);

    let stats = event_stats(&[on_boundary, just_before], now());
    assert_eq!(stats.this_week, 1);
  }

  #[test]
  fn counts_by_kind() {
    let events = vec![
      event_at(now(), EventKind::Exam),
      event_at(now(), EventKind::Exam),
      event_at(now(), EventKind::Assignment),
      event_at(now(), EventKind::Class),
      event_at(now(), EventKind::Other),
    ];
    let stats = event_stats(&events, now());
    assert_eq!(stats.exams, 2);
    assert_eq!(stats.assignments, 1);
    assert_eq!(stats.classes, 1);
  }

  #[test]
  fn size_below_a_gigabyte_formats_as_mb() {
    assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
  }

  #[test]
  fn size_at_or_above_1024_mb_formats_as_gb() {
    // 2 MB + 3 MB + 1100 MB = 1105 MB, which crosses the GB threshold.
    assert_eq!(format_size(1105 * 1024 * 1024), "1.1 GB");
  }
}
