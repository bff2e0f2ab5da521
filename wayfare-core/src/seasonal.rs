//! Seasonal availability rules and trip relevance.
//!
//! Seasonal locations (festivals, illuminations, winter-only markets) carry a
//! list of [`AvailabilityRule`]s instead of, or on top of, weekly hours. A
//! seasonal location is relevant to a trip only when at least one rule marked
//! available overlaps the trip's date span.

use std::ops::RangeInclusive;

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Inclusive calendar span of a trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TripDates {
    start: NaiveDate,
    end: NaiveDate,
}

/// Errors returned by [`TripDates::new`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TripDatesError {
    /// The end date precedes the start date.
    #[error("trip ends on {end} before it starts on {start}")]
    EndBeforeStart {
        /// Requested start.
        start: NaiveDate,
        /// Requested end.
        end: NaiveDate,
    },
}

impl TripDates {
    /// Validate and construct a trip span.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, TripDatesError> {
        if end < start {
            return Err(TripDatesError::EndBeforeStart { start, end });
        }
        Ok(Self { start, end })
    }

    /// First day of the trip.
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the trip.
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Whether the trip shares at least one day with `[from, to]`.
    pub fn overlaps(&self, from: NaiveDate, to: NaiveDate) -> bool {
        !(self.end < from || self.start > to)
    }

    fn years(&self) -> RangeInclusive<i32> {
        self.start.year()..=self.end.year()
    }
}

/// A dated availability rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityRule {
    /// Shape of the rule.
    #[serde(flatten)]
    pub kind: RuleKind,
    /// Whether the rule marks the location as available.
    #[serde(default)]
    pub is_available: bool,
}

/// The date pattern a rule describes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuleKind {
    /// Same calendar dates every year, optionally wrapping past New Year.
    #[serde(rename_all = "camelCase")]
    FixedAnnual {
        /// Starting month, 1-12.
        month_start: u32,
        /// Starting day of month.
        day_start: u32,
        /// Ending month; defaults to the starting month.
        #[serde(default)]
        month_end: Option<u32>,
        /// Ending day; defaults to the starting day.
        #[serde(default)]
        day_end: Option<u32>,
    },
    /// "Nth weekday of month", e.g. the third Saturday of March.
    #[serde(rename_all = "camelCase")]
    FloatingAnnual {
        /// Month, 1-12.
        month: u32,
        /// Ordinal 1-4, or 5 for the last such weekday.
        week_ordinal: u8,
        /// Day of week, `0` = Sunday.
        day_of_week: u32,
        /// Length of the event in days; defaults to one.
        #[serde(default)]
        duration_days: Option<u32>,
    },
    /// Explicit date range, optionally pinned to specific years.
    #[serde(rename_all = "camelCase")]
    DateRange {
        /// Starting month.
        month_start: u32,
        /// Starting day.
        day_start: u32,
        /// Ending month.
        month_end: u32,
        /// Ending day.
        day_end: u32,
        /// First year the range applies to.
        #[serde(default)]
        year_start: Option<i32>,
        /// Last year the range applies to.
        #[serde(default)]
        year_end: Option<i32>,
    },
}

impl AvailabilityRule {
    /// Whether this rule, if marked available, overlaps `trip`.
    pub fn overlaps(&self, trip: &TripDates) -> bool {
        self.is_available && self.kind.overlaps(trip)
    }
}

impl RuleKind {
    /// Whether the pattern overlaps `trip`, ignoring the availability flag.
    pub fn overlaps(&self, trip: &TripDates) -> bool {
        match *self {
            Self::FixedAnnual {
                month_start,
                day_start,
                month_end,
                day_end,
            } => {
                let end_month = month_end.unwrap_or(month_start);
                let end_day = day_end.unwrap_or(day_start);
                // Start one year early so a wrap from last December is seen.
                (trip.start.year() - 1..=trip.end.year()).any(|year| {
                    fixed_annual_overlaps(trip, year, (month_start, day_start), (end_month, end_day))
                })
            }
            Self::FloatingAnnual {
                month,
                week_ordinal,
                day_of_week,
                duration_days,
            } => {
                let Some(weekday) = weekday_from_sunday_index(day_of_week) else {
                    log::warn!("floating rule has invalid dayOfWeek {day_of_week}");
                    return false;
                };
                let extra_days = u64::from(duration_days.unwrap_or(1).max(1) - 1);
                (trip.start.year() - 1..=trip.end.year()).any(|year| {
                    nth_weekday_of_month(year, month, weekday, week_ordinal)
                        .and_then(|start| Some((start, start.checked_add_days(Days::new(extra_days))?)))
                        .is_some_and(|(start, end)| trip.overlaps(start, end))
                })
            }
            Self::DateRange {
                month_start,
                day_start,
                month_end,
                day_end,
                year_start,
                year_end,
            } => {
                if year_start.is_some_and(|y| trip.end.year() < y)
                    || year_end.is_some_and(|y| trip.start.year() > y)
                {
                    return false;
                }
                let anchors = year_start.map_or_else(|| trip.years(), |y| y..=y);
                anchors.into_iter().any(|anchor| {
                    date_range_bounds(anchor, (month_start, day_start), (month_end, day_end), year_end)
                        .is_some_and(|(start, end)| trip.overlaps(start, end))
                })
            }
        }
    }
}

fn fixed_annual_overlaps(
    trip: &TripDates,
    year: i32,
    (month_start, day_start): (u32, u32),
    (month_end, day_end): (u32, u32),
) -> bool {
    let (Some(start), Some(end)) = (
        clamped_date(year, month_start, day_start),
        clamped_date(year, month_end, day_end),
    ) else {
        log::warn!("fixed annual rule has an invalid date {month_start}/{day_start}-{month_end}/{day_end}");
        return false;
    };
    if start <= end {
        return trip.overlaps(start, end);
    }
    // Wraps past New Year: test the December tail and the January head apart.
    let before_new_year = NaiveDate::from_ymd_opt(year, 12, 31)
        .is_some_and(|dec_31| trip.overlaps(start, dec_31));
    let after_new_year = NaiveDate::from_ymd_opt(year + 1, 1, 1)
        .zip(clamped_date(year + 1, month_end, day_end))
        .is_some_and(|(jan_1, next_end)| trip.overlaps(jan_1, next_end));
    before_new_year || after_new_year
}

fn date_range_bounds(
    anchor: i32,
    (month_start, day_start): (u32, u32),
    (month_end, day_end): (u32, u32),
    year_end: Option<i32>,
) -> Option<(NaiveDate, NaiveDate)> {
    let start = clamped_date(anchor, month_start, day_start)?;
    let end = clamped_date(year_end.unwrap_or(anchor), month_end, day_end)?;
    if end >= start {
        return Some((start, end));
    }
    if year_end.is_some() {
        log::warn!("date range ends on {end} before it starts on {start}");
        return None;
    }
    // Unpinned ranges such as 12/20-01/05 run into the next year.
    Some((start, clamped_date(anchor + 1, month_end, day_end)?))
}

/// Build a date, clamping the day to the month's length so `02/29` resolves
/// to `02/28` in common years.
fn clamped_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    if day == 0 {
        return None;
    }
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let last = first.checked_add_months(Months::new(1))?.pred_opt()?;
    NaiveDate::from_ymd_opt(year, month, day.min(last.day()))
}

/// Convert a Sunday-based day index into a [`Weekday`].
pub fn weekday_from_sunday_index(index: u32) -> Option<Weekday> {
    match index {
        0 => Some(Weekday::Sun),
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        _ => None,
    }
}

/// Resolve the `ordinal`-th `weekday` of `month` in `year`.
///
/// Ordinals 1-4 count from the start of the month; 5 means the last such
/// weekday, found by walking backwards from the month's final day.
///
/// # Examples
/// ```
/// use chrono::{NaiveDate, Weekday};
/// use wayfare_core::seasonal::nth_weekday_of_month;
///
/// let third_saturday = nth_weekday_of_month(2026, 3, Weekday::Sat, 3);
/// assert_eq!(third_saturday, NaiveDate::from_ymd_opt(2026, 3, 21));
/// ```
pub fn nth_weekday_of_month(year: i32, month: u32, weekday: Weekday, ordinal: u8) -> Option<NaiveDate> {
    match ordinal {
        1..=4 => NaiveDate::from_weekday_of_month_opt(year, month, weekday, ordinal),
        5 => {
            let mut day = clamped_date(year, month, 31)?;
            while day.weekday() != weekday {
                day = day.pred_opt()?;
            }
            Some(day)
        }
        _ => {
            log::warn!("floating rule has invalid weekOrdinal {ordinal}");
            None
        }
    }
}

/// Decide whether a location matters for a trip.
///
/// Non-seasonal locations are always relevant. Seasonal locations are
/// excluded when the trip dates or the rules are missing, and otherwise kept
/// only if a rule marked available overlaps the trip.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use wayfare_core::seasonal::{AvailabilityRule, RuleKind, is_seasonal_location_relevant};
///
/// let gion_matsuri = AvailabilityRule {
///     kind: RuleKind::FixedAnnual { month_start: 7, day_start: 24, month_end: Some(7), day_end: Some(25) },
///     is_available: true,
/// };
/// let start = NaiveDate::from_ymd_opt(2026, 7, 20);
/// let end = NaiveDate::from_ymd_opt(2026, 7, 30);
/// assert!(is_seasonal_location_relevant(true, &[gion_matsuri], start, end));
/// ```
pub fn is_seasonal_location_relevant(
    is_seasonal: bool,
    rules: &[AvailabilityRule],
    trip_start: Option<NaiveDate>,
    trip_end: Option<NaiveDate>,
) -> bool {
    if !is_seasonal {
        return true;
    }
    let (Some(start), Some(end)) = (trip_start, trip_end) else {
        log::debug!("excluding seasonal location: trip dates are unknown");
        return false;
    };
    if rules.is_empty() {
        log::debug!("excluding seasonal location: no availability rules");
        return false;
    }
    match TripDates::new(start, end) {
        Ok(trip) => rules.iter().any(|rule| rule.overlaps(&trip)),
        Err(err) => {
            log::warn!("excluding seasonal location: {err}");
            false
        }
    }
}
