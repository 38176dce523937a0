//! Wedding Timeline
//!
//! Static, ordered event windows used to group gallery media by
//! wedding-related sub-event. Windows are declared once and read-only at
//! runtime; photos fall into the first window containing their capture
//! timestamp, or into the trailing "Outros momentos" bucket.

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// One named event window with inclusive bounds.
#[derive(Debug, Clone, Serialize)]
pub struct TimelineEvent {
    /// Stable identifier.
    pub id: &'static str,
    /// Display label.
    pub label: &'static str,
    /// Display emoji.
    pub emoji: &'static str,
    /// Inclusive start. `None` only for the unclassified bucket.
    pub start: Option<NaiveDateTime>,
    /// Inclusive end. `None` only for the unclassified bucket.
    pub end: Option<NaiveDateTime>,
}

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .expect("valid timeline date")
        .and_hms_opt(hour, minute, 0)
        .expect("valid timeline time")
}

/// A whole-day window: 00:00:00 through 23:59:59.
fn day_bounds(
    start: (i32, u32, u32),
    end: (i32, u32, u32),
) -> (NaiveDateTime, NaiveDateTime) {
    let start = NaiveDate::from_ymd_opt(start.0, start.1, start.2)
        .expect("valid timeline date")
        .and_hms_opt(0, 0, 0)
        .expect("valid timeline time");
    let end = NaiveDate::from_ymd_opt(end.0, end.1, end.2)
        .expect("valid timeline date")
        .and_hms_opt(23, 59, 59)
        .expect("valid timeline time");
    (start, end)
}

/// The wedding timeline, in display order. Adjust dates to the real
/// events. Cerimônia and Festa split the wedding day at 18:00.
pub static TIMELINE_EVENTS: LazyLock<Vec<TimelineEvent>> = LazyLock::new(|| {
    let (cha_start, cha_end) = day_bounds((2026, 10, 1), (2026, 10, 1));
    let (solteira_start, solteira_end) = day_bounds((2026, 11, 1), (2026, 11, 1));
    let (solteiro_start, solteiro_end) = day_bounds((2026, 11, 2), (2026, 11, 2));
    let (carnaval_start, carnaval_end) = day_bounds((2026, 2, 16), (2026, 2, 17));

    vec![
        TimelineEvent {
            id: "cha-panela",
            label: "Chá de Panela",
            emoji: "🏠",
            start: Some(cha_start),
            end: Some(cha_end),
        },
        TimelineEvent {
            id: "despedida-solteira",
            label: "Despedida de Solteira",
            emoji: "👰",
            start: Some(solteira_start),
            end: Some(solteira_end),
        },
        TimelineEvent {
            id: "despedida-solteiro",
            label: "Despedida de Solteiro",
            emoji: "🤵",
            start: Some(solteiro_start),
            end: Some(solteiro_end),
        },
        TimelineEvent {
            id: "cerimonia",
            label: "Cerimônia",
            emoji: "💍",
            // Wedding day from midnight until 18:00
            start: Some(at(2026, 12, 19, 0, 0)),
            end: Some(at(2026, 12, 19, 18, 0)),
        },
        TimelineEvent {
            id: "festa",
            label: "Festa",
            emoji: "🎉",
            // From 18:00 into the small hours of the next day
            start: Some(at(2026, 12, 19, 18, 0)),
            end: Some(at(2026, 12, 20, 6, 0)),
        },
        TimelineEvent {
            id: "carnaval",
            label: "Carnaval - 2026",
            emoji: "🎉🎭🪅🥳",
            start: Some(carnaval_start),
            end: Some(carnaval_end),
        },
    ]
});

/// Bucket for media without a capture date or outside every window.
pub static UNCLASSIFIED_EVENT: TimelineEvent = TimelineEvent {
    id: "outros",
    label: "Outros momentos",
    emoji: "📷",
    start: None,
    end: None,
};

/// The timeline event a capture timestamp belongs to: the first window
/// (in declaration order) whose inclusive interval contains it, or `None`
/// for absent/unmatched timestamps.
#[must_use]
pub fn event_for_date(date_taken: Option<NaiveDateTime>) -> Option<&'static TimelineEvent> {
    let date_taken = date_taken?;

    TIMELINE_EVENTS.iter().find(|event| {
        matches!(
            (event.start, event.end),
            (Some(start), Some(end)) if date_taken >= start && date_taken <= end
        )
    })
}

/// Partition items into per-window buckets, preserving window declaration
/// order, with a trailing unclassified bucket. Empty buckets are omitted.
pub fn group_by_timeline<T, F>(items: Vec<T>, date_of: F) -> Vec<(&'static TimelineEvent, Vec<T>)>
where
    F: Fn(&T) -> Option<NaiveDateTime>,
{
    let mut buckets: Vec<(&'static TimelineEvent, Vec<T>)> = TIMELINE_EVENTS
        .iter()
        .map(|event| (event, Vec::new()))
        .collect();
    let mut unclassified: Vec<T> = Vec::new();

    for item in items {
        match event_for_date(date_of(&item)) {
            Some(event) => {
                let bucket = buckets
                    .iter_mut()
                    .find(|(candidate, _)| candidate.id == event.id)
                    .expect("classified event is always in the bucket list");
                bucket.1.push(item);
            }
            None => unclassified.push(item),
        }
    }

    let mut groups: Vec<(&'static TimelineEvent, Vec<T>)> = buckets
        .into_iter()
        .filter(|(_, items)| !items.is_empty())
        .collect();
    if !unclassified.is_empty() {
        groups.push((&UNCLASSIFIED_EVENT, unclassified));
    }
    groups
}
