//! Scheduling options and per-day entry points.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use wayfare_core::{ClockTime, Coordinates, PlaceActivity, TravelMode};

/// Default visit length per category, in minutes.
const CATEGORY_MINUTES: &[(&str, u32)] = &[
    ("museum", 120),
    ("temple", 60),
    ("shrine", 45),
    ("park", 60),
    ("restaurant", 75),
    ("cafe", 45),
    ("bar", 90),
    ("shopping", 90),
    ("market", 60),
    ("viewpoint", 30),
];

/// Knobs for [`crate::DayScheduler`].
///
/// Every field has a default, so an empty JSON object is a valid
/// configuration.
///
/// # Examples
/// ```rust
/// use wayfare_planner::ScheduleOptions;
///
/// let options: ScheduleOptions =
///     serde_json::from_str(r#"{"defaultDayStart": "08:30", "transitionBufferMinutes": 10}"#)?;
/// assert_eq!(options.default_day_start.to_string(), "08:30");
/// assert_eq!(options.default_visit_minutes, 60);
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScheduleOptions {
    /// Start of each day unless an entry point overrides it.
    pub default_day_start: ClockTime,
    /// Soft end of each day; running past it is logged, not clipped.
    pub default_day_end: ClockTime,
    /// Visit length when neither the activity nor its category says.
    pub default_visit_minutes: u32,
    /// Slack added to every leg between stops.
    pub transition_buffer_minutes: u32,
    /// Leg length when no estimate is available.
    pub fallback_travel_minutes: u32,
    /// Mode used for estimated legs.
    pub travel_mode: TravelMode,
    /// Visit length by lower-case category or tag.
    pub category_minutes: BTreeMap<String, u32>,
}

impl Default for ScheduleOptions {
    fn default() -> Self {
        Self {
            default_day_start: ClockTime::from_minutes(9 * 60),
            default_day_end: ClockTime::from_minutes(21 * 60),
            default_visit_minutes: 60,
            transition_buffer_minutes: 5,
            fallback_travel_minutes: 15,
            travel_mode: TravelMode::Walk,
            category_minutes: CATEGORY_MINUTES
                .iter()
                .map(|&(category, minutes)| (category.to_owned(), minutes))
                .collect(),
        }
    }
}

impl ScheduleOptions {
    /// Visit length for `place`: its explicit duration, then the first tag
    /// with a category default, then the catalog category, then the global
    /// default.
    #[must_use]
    pub fn visit_minutes(&self, place: &PlaceActivity, category: Option<&str>) -> u32 {
        if let Some(minutes) = place.duration_min.filter(|&m| m > 0) {
            return minutes;
        }
        place
            .tags
            .iter()
            .map(String::as_str)
            .chain(category)
            .find_map(|key| self.category_minutes.get(&key.to_ascii_lowercase()).copied())
            .unwrap_or(self.default_visit_minutes)
    }
}

/// Where and when a day begins and ends, e.g. at the hotel.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryPoint {
    /// Starting position; anchors the first leg and route sequencing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_point: Option<Coordinates>,
    /// Final position the day returns to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_point: Option<Coordinates>,
    /// Overrides [`ScheduleOptions::default_day_start`] for the day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<ClockTime>,
}

/// Entry points keyed by day identifier.
pub type DayEntryPoints = BTreeMap<String, EntryPoint>;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some(25), vec![], None, 25)]
    #[case(None, vec!["Museum"], None, 120)]
    #[case(None, vec!["photo", "shrine"], None, 45)]
    #[case(None, vec![], Some("cafe"), 45)]
    #[case(None, vec!["temple"], Some("cafe"), 60)]
    #[case(None, vec!["unknown"], None, 60)]
    #[case(Some(0), vec![], None, 60)]
    fn visit_minutes_fall_back_in_order(
        #[case] explicit: Option<u32>,
        #[case] tags: Vec<&str>,
        #[case] category: Option<&str>,
        #[case] expected: u32,
    ) {
        let mut place = PlaceActivity::new("a", "Stop");
        place.duration_min = explicit;
        place.tags = tags.into_iter().map(str::to_owned).collect();
        assert_eq!(ScheduleOptions::default().visit_minutes(&place, category), expected);
    }

    #[test]
    fn empty_options_use_defaults() {
        let options: ScheduleOptions = serde_json::from_str("{}").expect("valid options");
        assert_eq!(options, ScheduleOptions::default());
        assert_eq!(options.default_day_end.to_string(), "21:00");
    }

    #[test]
    fn entry_points_deserialise_by_day() {
        let json = r#"{"d1": {"startPoint": {"lat": 35.0, "lng": 135.7}, "startTime": "08:00"}}"#;
        let entries: DayEntryPoints = serde_json::from_str(json).expect("valid entry points");
        let entry = entries.get("d1").expect("entry for d1");
        assert_eq!(entry.start_time.map(|t| t.to_string()).as_deref(), Some("08:00"));
        assert!(entry.end_point.is_none());
    }
}
