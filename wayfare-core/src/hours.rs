//! Weekly operating hours and the "is it open now" check.
//!
//! Hours follow the shape most place-data providers use: a list of weekly
//! [`Period`]s keyed by a Sunday-based day index. An overnight period's close
//! belongs to the following day, so a bar open Friday 18:00 to 02:00 is still
//! open at 01:00 on Saturday.

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Deserializer, Serialize};

use crate::clock::ClockTime;
use crate::itinerary::OperatingWindow;

/// One weekly opening interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    /// Day index, `0` = Sunday through `6` = Saturday.
    pub day: u32,
    /// Opening time.
    pub open: ClockTime,
    /// Closing time, on the following day when overnight.
    pub close: ClockTime,
    /// Explicit overnight marker.
    #[serde(default)]
    pub is_overnight: bool,
}

impl Period {
    /// Construct a period.
    pub const fn new(day: u32, open: ClockTime, close: ClockTime, is_overnight: bool) -> Self {
        Self {
            day,
            open,
            close,
            is_overnight,
        }
    }

    /// Whether the period runs past midnight.
    ///
    /// A close at or before the open is treated as overnight even when the
    /// flag is missing, e.g. `10:00`-`00:00`.
    pub fn crosses_midnight(&self) -> bool {
        self.is_overnight || self.close <= self.open
    }

    /// Close time measured from the period's own midnight.
    pub fn effective_close(&self) -> ClockTime {
        if self.crosses_midnight() {
            self.close.next_day()
        } else {
            self.close
        }
    }

    /// The period as an itinerary operating window.
    pub fn to_window(&self) -> OperatingWindow {
        OperatingWindow::new(self.open, self.close, self.crosses_midnight())
    }

    fn covers(&self, now: ClockTime) -> bool {
        self.open <= now && now < self.effective_close()
    }
}

/// A location's weekly opening schedule.
///
/// Deserialising is lenient: a period whose times do not parse is logged and
/// dropped, so one bad entry never fails a whole catalog.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatingHours {
    /// Weekly periods in any order.
    #[serde(default, deserialize_with = "lenient_periods")]
    pub periods: Vec<Period>,
}

/// A period as written in a document, before its times are parsed.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPeriod {
    day: u32,
    open: String,
    close: String,
    #[serde(default)]
    is_overnight: bool,
}

impl RawPeriod {
    fn parse(&self) -> Option<Period> {
        let open = ClockTime::parse_lenient(&self.open, "hours.periods.open")?;
        let close = ClockTime::parse_lenient(&self.close, "hours.periods.close")?;
        if self.day > 6 {
            log::warn!("ignoring period with day index {}", self.day);
            return None;
        }
        Some(Period::new(self.day, open, close, self.is_overnight))
    }
}

fn lenient_periods<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Period>, D::Error> {
    let raw = Vec::<RawPeriod>::deserialize(deserializer)?;
    Ok(raw.iter().filter_map(RawPeriod::parse).collect())
}

impl OperatingHours {
    /// Construct hours from periods.
    pub const fn new(periods: Vec<Period>) -> Self {
        Self { periods }
    }

    /// Periods that start on `weekday`, earliest first.
    pub fn periods_on(&self, weekday: Weekday) -> Vec<&Period> {
        let index = weekday.num_days_from_sunday();
        let mut periods: Vec<&Period> = self.periods.iter().filter(|p| p.day == index).collect();
        periods.sort_by_key(|p| p.open);
        periods
    }

    /// The operating window for a visit on `weekday`, if the location opens
    /// that day. Multiple periods collapse to the earliest one.
    pub fn window_on(&self, weekday: Weekday) -> Option<OperatingWindow> {
        self.periods_on(weekday).first().map(|p| p.to_window())
    }
}

/// When a closed location opens next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NextOpening {
    /// Weekday of the next opening.
    pub weekday: Weekday,
    /// Opening time on that day.
    pub opens_at: ClockTime,
    /// Whole days from the checked instant; `0` is later today.
    pub days_ahead: u32,
}

/// Outcome of [`is_open_now`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenStatus {
    /// Open; closes at the given wall-clock time.
    Open {
        /// Closing time of the covering period.
        closes_at: ClockTime,
    },
    /// Closed; reopens at the given time if any period exists within a week.
    Closed {
        /// Next opening, if any.
        opens_at: Option<NextOpening>,
    },
    /// No hours to judge by.
    Unknown,
}

/// Decide whether a location with `hours` is open at `instant`.
///
/// `instant` is a zone-naive wall-clock time in the trip's timezone. Callers
/// checking many locations should capture a single instant per request.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use wayfare_core::{ClockTime, OpenStatus, OperatingHours, Period};
///
/// let open = ClockTime::from_hm(18, 0).unwrap();
/// let close = ClockTime::from_hm(2, 0).unwrap();
/// // Friday (index 5) 18:00 until Saturday 02:00.
/// let hours = OperatingHours::new(vec![Period::new(5, open, close, true)]);
/// // 2026-03-07 is a Saturday.
/// let instant = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap().and_hms_opt(1, 30, 0).unwrap();
/// assert_eq!(
///     wayfare_core::is_open_now(&hours, instant),
///     OpenStatus::Open { closes_at: close }
/// );
/// ```
pub fn is_open_now(hours: &OperatingHours, instant: NaiveDateTime) -> OpenStatus {
    if hours.periods.is_empty() {
        return OpenStatus::Unknown;
    }
    let today = instant.weekday();
    let now = ClockTime::from_minutes(instant.hour() * 60 + instant.minute());

    // Yesterday's overnight period still running after midnight.
    let carried_over = hours
        .periods_on(today.pred())
        .into_iter()
        .find(|p| p.crosses_midnight() && now < p.close);
    if let Some(period) = carried_over {
        return OpenStatus::Open {
            closes_at: period.close,
        };
    }

    let todays = hours.periods_on(today);
    if let Some(period) = todays.iter().find(|p| p.covers(now)) {
        return OpenStatus::Open {
            closes_at: period.close,
        };
    }

    if let Some(period) = todays.iter().find(|p| p.open > now) {
        return OpenStatus::Closed {
            opens_at: Some(NextOpening {
                weekday: today,
                opens_at: period.open,
                days_ahead: 0,
            }),
        };
    }

    let mut weekday = today;
    for days_ahead in 1..=7 {
        weekday = weekday.succ();
        if let Some(period) = hours.periods_on(weekday).first() {
            return OpenStatus::Closed {
                opens_at: Some(NextOpening {
                    weekday,
                    opens_at: period.open,
                    days_ahead,
                }),
            };
        }
    }
    OpenStatus::Closed { opens_at: None }
}
