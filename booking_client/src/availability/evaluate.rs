use chrono::{Datelike, Duration, NaiveDate, Utc};
use std::collections::BTreeSet;

use super::config::MIN_BOOKING_LEAD_DAYS;
use super::types::{Availability, TourSchedule};

/// Evaluate bookability against today's date.
pub fn evaluate_availability(tour: &TourSchedule) -> Availability {
    evaluate_availability_on(tour, Utc::now().date_naive())
}

/// Evaluate bookability against an explicit "today".
///
/// Candidates from all three sources are normalized to calendar dates,
/// filtered by the minimum lead time, deduplicated and ordered. Malformed
/// entries are dropped; a day-of-month entry without season context is
/// skipped, never defaulted.
pub fn evaluate_availability_on(tour: &TourSchedule, today: NaiveDate) -> Availability {
    let cutoff = today + Duration::days(*MIN_BOOKING_LEAD_DAYS);
    let mut dates: BTreeSet<NaiveDate> = BTreeSet::new();

    for raw in &tour.available_dates {
        if let Some(date) = parse_calendar_date(raw) {
            if date >= cutoff {
                dates.insert(date);
            }
        }
    }

    for block in &tour.seasonal_pricing {
        let season = season_range(block.start_date.as_deref(), block.end_date.as_deref());
        for raw in &block.dates {
            if let Some(date) = resolve_candidate(raw, season) {
                if date >= cutoff {
                    dates.insert(date);
                }
            }
        }
    }

    for detail in &tour.pricing_details {
        let season = season_range(detail.season_start.as_deref(), detail.season_end.as_deref());
        if let Some(raw) = &detail.date {
            if let Some(date) = resolve_candidate(raw, season) {
                if date >= cutoff {
                    dates.insert(date);
                }
            }
        }
    }

    match dates.iter().next().copied() {
        None => Availability {
            available: false,
            message: "No departure dates are currently open for booking.".to_string(),
            next_available_date: None,
        },
        Some(next) => Availability {
            available: true,
            message: format!(
                "{} departure date{} available, next on {}",
                dates.len(),
                if dates.len() == 1 { "" } else { "s" },
                next
            ),
            next_available_date: Some(next),
        },
    }
}

/// Parse a full calendar date. Accepts `YYYY-MM-DD`, with or without a
/// trailing time component.
fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    raw.get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

/// Normalize one candidate: a full date stands on its own; a bare
/// day-of-month number resolves to the first matching day inside the season.
fn resolve_candidate(raw: &str, season: Option<(NaiveDate, NaiveDate)>) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Some(date) = parse_calendar_date(raw) {
        return Some(date);
    }

    let day: u32 = raw.parse().ok().filter(|d| (1..=31).contains(d))?;
    let (start, end) = season?;

    let mut cursor = start;
    while cursor <= end {
        if cursor.day() == day {
            return Some(cursor);
        }
        cursor = cursor.succ_opt()?;
    }
    None
}

fn season_range(start: Option<&str>, end: Option<&str>) -> Option<(NaiveDate, NaiveDate)> {
    let start = parse_calendar_date(start?)?;
    let end = parse_calendar_date(end?)?;
    (start <= end).then_some((start, end))
}
