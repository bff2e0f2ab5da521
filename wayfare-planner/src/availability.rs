//! Availability batch: one open/closed verdict per place activity.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use chrono::NaiveDateTime;
use serde::Serialize;
use wayfare_core::{
    Activity, AvailabilityStatus, BusyLevel, LocationCatalog, NextOpening, OpenStatus,
    OperatingHours, Period, PlaceActivity, is_open_now,
};

use crate::conflicts::reservation_reason;

/// Verdict for one activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResult {
    /// Activity the verdict is for.
    pub activity_id: String,
    /// Status at the checked instant.
    pub status: AvailabilityStatus,
    /// Human-readable explanation.
    pub message: String,
    /// Set when the venue should be booked ahead.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reservation_required: Option<bool>,
    /// Crowd level from the catalog.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub busy_level: Option<BusyLevel>,
}

/// Check every place activity in `activities` against a single instant.
///
/// Results follow input order; notes are skipped. Hours come from the
/// catalog entry, or from the activity's own operating window when the
/// catalog lists no periods. With the `parallel` feature the checks fan out over
/// rayon.
///
/// # Examples
/// ```rust
/// use chrono::NaiveDate;
/// use wayfare_core::{Activity, AvailabilityStatus, LocationCatalog, PlaceActivity};
/// use wayfare_planner::check_availability;
///
/// let now = NaiveDate::from_ymd_opt(2026, 3, 2).and_then(|d| d.and_hms_opt(12, 0, 0)).unwrap();
/// let results = check_availability(
///     &[Activity::from(PlaceActivity::new("a", "Somewhere"))],
///     &LocationCatalog::new(),
///     now,
/// );
/// assert_eq!(results[0].status, AvailabilityStatus::Unknown);
/// ```
#[must_use]
pub fn check_availability(
    activities: &[Activity],
    catalog: &LocationCatalog,
    now: NaiveDateTime,
) -> Vec<AvailabilityResult> {
    let places: Vec<&PlaceActivity> = activities.iter().filter_map(Activity::as_place).collect();
    check_in_order(&places, |place| check_place(place, catalog, now))
}

#[cfg(feature = "parallel")]
fn check_in_order<F>(places: &[&PlaceActivity], check: F) -> Vec<AvailabilityResult>
where
    F: Fn(&PlaceActivity) -> AvailabilityResult + Send + Sync,
{
    places.par_iter().map(|place| check(place)).collect()
}

#[cfg(not(feature = "parallel"))]
fn check_in_order<F>(places: &[&PlaceActivity], check: F) -> Vec<AvailabilityResult>
where
    F: Fn(&PlaceActivity) -> AvailabilityResult,
{
    places.iter().map(|place| check(place)).collect()
}

fn check_place(place: &PlaceActivity, catalog: &LocationCatalog, now: NaiveDateTime) -> AvailabilityResult {
    let location = catalog.location_for(place);
    let busy_level = location.and_then(|l| l.busy_level);
    let reservation_required = reservation_reason(place).is_some().then_some(true);
    let result = |status, message: String| AvailabilityResult {
        activity_id: place.id.clone(),
        status,
        message,
        reservation_required,
        busy_level,
    };

    if place.availability_status == Some(AvailabilityStatus::RequiresReservation) {
        return result(
            AvailabilityStatus::RequiresReservation,
            format!("{} requires a reservation", place.title),
        );
    }
    let Some(hours) = location
        .and_then(|l| l.hours.clone())
        .filter(|h| !h.periods.is_empty())
        .or_else(|| daily_hours_from_window(place))
    else {
        return result(
            AvailabilityStatus::Unknown,
            format!("no opening hours known for {}", place.title),
        );
    };

    match is_open_now(&hours, now) {
        OpenStatus::Open { closes_at } if busy_level == Some(BusyLevel::High) => result(
            AvailabilityStatus::Busy,
            format!("open until {closes_at}, expect crowds"),
        ),
        OpenStatus::Open { closes_at } => {
            result(AvailabilityStatus::Open, format!("open until {closes_at}"))
        }
        OpenStatus::Closed { opens_at } => result(AvailabilityStatus::Closed, closed_message(opens_at)),
        OpenStatus::Unknown => result(
            AvailabilityStatus::Unknown,
            format!("no opening hours known for {}", place.title),
        ),
    }
}

fn closed_message(next: Option<NextOpening>) -> String {
    match next {
        Some(NextOpening {
            opens_at,
            days_ahead: 0,
            ..
        }) => format!("closed, opens at {opens_at}"),
        Some(NextOpening {
            weekday, opens_at, ..
        }) => format!("closed, opens {weekday} at {opens_at}"),
        None => "closed".to_owned(),
    }
}

/// Treat an activity's operating window as its hours on every weekday.
fn daily_hours_from_window(place: &PlaceActivity) -> Option<OperatingHours> {
    let window = place.operating_window.as_ref()?;
    let (opens, closes) = window.bounds()?;
    let overnight = window.is_overnight || closes <= opens;
    Some(OperatingHours::new(
        (0..7).map(|day| Period::new(day, opens, closes, overnight)).collect(),
    ))
}
