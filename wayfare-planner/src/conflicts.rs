//! Conflict Detector: classify problems in a scheduled itinerary.
//!
//! Detection is a pure re-walk of the document. Each rule runs on its own and
//! skips an activity when the data it needs is missing or malformed, so an
//! activity may trigger several conflicts or none. Notes never take part.

use serde::Serialize;
use wayfare_core::{
    AvailabilityStatus, ClockTime, Day, Itinerary, MINUTES_PER_DAY, MealType, OperatingWindow,
    PlaceActivity,
};

/// Tags that mark a booking-only venue.
const FINE_DINING_TAGS: &[&str] = &[
    "fine_dining",
    "fine-dining",
    "michelin",
    "omakase",
    "kaiseki",
    "tasting_menu",
];

/// Tags that make a dinner stop restaurant-like.
const RESTAURANT_TAGS: &[&str] = &[
    "restaurant",
    "dining",
    "izakaya",
    "sushi",
    "steakhouse",
    "bistro",
    "yakiniku",
];

/// Conflict taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictType {
    /// The visit falls outside the operating window.
    ClosedDuringVisit,
    /// The gap before a visit is shorter than its travel leg.
    InsufficientTravelTime,
    /// Two consecutive visits intersect.
    OverlappingActivities,
    /// The venue should be booked ahead.
    ReservationRecommended,
}

/// How serious a conflict is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The plan cannot work as written.
    Error,
    /// The plan is tight.
    Warning,
    /// Advice only.
    Info,
}

/// Why a reservation is recommended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationReason {
    /// Tagged as fine dining.
    FineDining,
    /// A dinner slot at a restaurant-like venue.
    DinnerAtRestaurant,
    /// Marked `requires_reservation` upstream.
    MarkedRequired,
}

/// Structured payload of a [`Conflict`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged, rename_all_fields = "camelCase")]
pub enum ConflictDetails {
    /// Visit and window bounds as written in the document.
    ClosedDuringVisit {
        /// Visit arrival.
        arrival_time: String,
        /// Visit departure.
        departure_time: String,
        /// Window opening.
        opens_at: String,
        /// Window closing.
        closes_at: String,
        /// Whether the window crosses midnight.
        is_overnight: bool,
    },
    /// Available and required minutes between two visits.
    InsufficientTravelTime {
        /// Minutes from the previous departure to this arrival; negative when
        /// the visits overlap.
        gap_minutes: i64,
        /// Minutes the travel leg needs.
        required_minutes: u32,
    },
    /// Minutes two visits share.
    Overlap {
        /// Length of the intersection.
        overlap_minutes: i64,
    },
    /// Reservation trigger.
    Reservation {
        /// What triggered the recommendation.
        reason: ReservationReason,
    },
}

/// One detected problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Conflict {
    /// Rule that fired.
    #[serde(rename = "type")]
    pub kind: ConflictType,
    /// Severity.
    pub severity: Severity,
    /// Day holding the activity.
    pub day_id: String,
    /// Activity the conflict is about.
    pub activity_id: String,
    /// The preceding activity for pairwise rules.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_activity_id: Option<String>,
    /// Human-readable explanation.
    pub message: String,
    /// Rule-specific payload.
    pub details: ConflictDetails,
}

/// Conflict counts by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ConflictSummary {
    /// Number of errors.
    pub errors: usize,
    /// Number of warnings.
    pub warnings: usize,
    /// Number of informational conflicts.
    pub info: usize,
    /// Total number of conflicts.
    pub total: usize,
}

/// Conflicts in detection order together with their summary.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ConflictReport {
    /// Conflicts ordered by day, then activity, then rule.
    pub conflicts: Vec<Conflict>,
    /// Counts by severity.
    pub summary: ConflictSummary,
}

impl ConflictReport {
    /// Build a report and its summary from a list of conflicts.
    #[must_use]
    pub fn from_conflicts(conflicts: Vec<Conflict>) -> Self {
        let mut summary = ConflictSummary {
            total: conflicts.len(),
            ..ConflictSummary::default()
        };
        for conflict in &conflicts {
            match conflict.severity {
                Severity::Error => summary.errors += 1,
                Severity::Warning => summary.warnings += 1,
                Severity::Info => summary.info += 1,
            }
        }
        Self { conflicts, summary }
    }

    /// Whether no rule fired.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.conflicts.is_empty()
    }

    /// Conflicts of one type.
    pub fn of_type(&self, kind: ConflictType) -> impl Iterator<Item = &Conflict> {
        self.conflicts.iter().filter(move |c| c.kind == kind)
    }
}

/// Detect conflicts across every day of `itinerary`.
///
/// Never fails; an itinerary with nothing to check yields an empty report.
///
/// # Examples
/// ```rust
/// use wayfare_core::{Activity, Day, Itinerary, PlaceActivity};
/// use wayfare_planner::{ConflictType, detect_itinerary_conflicts};
///
/// let mut omakase = PlaceActivity::new("s", "Sushi Saito");
/// omakase.tags = vec!["omakase".into()];
/// let itinerary = Itinerary {
///     days: vec![Day { id: "d1".into(), activities: vec![Activity::from(omakase)], ..Day::default() }],
/// };
/// let report = detect_itinerary_conflicts(&itinerary);
/// assert_eq!(report.summary.info, 1);
/// assert_eq!(report.of_type(ConflictType::ReservationRecommended).count(), 1);
/// ```
#[must_use]
pub fn detect_itinerary_conflicts(itinerary: &Itinerary) -> ConflictReport {
    let conflicts = itinerary.days.iter().flat_map(day_conflicts).collect();
    ConflictReport::from_conflicts(conflicts)
}

fn day_conflicts(day: &Day) -> Vec<Conflict> {
    let mut conflicts = Vec::new();
    let mut previous: Option<&PlaceActivity> = None;
    for place in day.places() {
        let mut push = |kind, severity, related: Option<&PlaceActivity>, message, details| {
            conflicts.push(Conflict {
                kind,
                severity,
                day_id: day.id.clone(),
                activity_id: place.id.clone(),
                related_activity_id: related.map(|p| p.id.clone()),
                message,
                details,
            });
        };

        if let Some((message, details)) = closed_during_visit(place) {
            push(ConflictType::ClosedDuringVisit, Severity::Error, None, message, details);
        }
        let consecutive = previous.and_then(|prev| VisitPair::between(prev, place).map(|pair| (prev, pair)));
        if let Some((prev, pair)) = consecutive {
            if let Some((severity, message, details)) = pair.travel_shortfall(prev, place) {
                push(ConflictType::InsufficientTravelTime, severity, Some(prev), message, details);
            }
            if let Some((message, details)) = pair.overlap(prev, place) {
                push(ConflictType::OverlappingActivities, Severity::Error, Some(prev), message, details);
            }
        }
        if let Some(reason) = reservation_reason(place) {
            push(
                ConflictType::ReservationRecommended,
                Severity::Info,
                None,
                format!("{} usually needs a reservation", place.title),
                ConflictDetails::Reservation { reason },
            );
        }
        previous = Some(place);
    }
    conflicts
}

/// A visit must sit inside one continuous open interval.
fn closed_during_visit(place: &PlaceActivity) -> Option<(String, ConflictDetails)> {
    let (arrival, departure) = place.schedule.as_ref()?.window()?;
    let window = place.operating_window.as_ref()?;
    let (opens, closes) = window.bounds()?;
    let overnight = window.is_overnight || closes <= opens;

    let (earliest, latest) = if !overnight {
        (Some(opens), closes)
    } else if arrival < closes {
        // Visit starts in the after-midnight tail of yesterday's window.
        (None, closes)
    } else {
        (Some(opens), closes.next_day())
    };

    let message = if earliest.is_some_and(|open| arrival < open) {
        format!("{} opens at {opens} but the visit starts at {arrival}", place.title)
    } else if departure > latest {
        format!("{} closes at {closes} but the visit ends at {departure}", place.title)
    } else {
        return None;
    };
    Some((message, closed_details(place, window)))
}

fn closed_details(place: &PlaceActivity, window: &OperatingWindow) -> ConflictDetails {
    let (arrival_time, departure_time) = place
        .schedule
        .as_ref()
        .map(|s| (s.arrival_time.clone(), s.departure_time.clone()))
        .unwrap_or_default();
    ConflictDetails::ClosedDuringVisit {
        arrival_time,
        departure_time,
        opens_at: window.opens_at.clone(),
        closes_at: window.closes_at.clone(),
        is_overnight: window.is_overnight,
    }
}

/// Parsed departure of one visit and arrival of the next.
#[derive(Debug, Clone, Copy)]
struct VisitPair {
    departure: ClockTime,
    arrival: ClockTime,
}

impl VisitPair {
    /// Both visits need a parsable schedule. A next arrival earlier in the
    /// clock than the previous one, after a departure past midnight, belongs
    /// to the following day.
    fn between(prev: &PlaceActivity, next: &PlaceActivity) -> Option<Self> {
        let (prev_arrival, departure) = prev.schedule.as_ref()?.window()?;
        let (next_arrival, _) = next.schedule.as_ref()?.window()?;
        let arrival = if departure.minutes() >= MINUTES_PER_DAY && next_arrival < prev_arrival {
            next_arrival.next_day()
        } else {
            next_arrival
        };
        Some(Self { departure, arrival })
    }

    fn gap(self) -> i64 {
        self.departure.minutes_until(self.arrival)
    }

    /// `gap < 0` is an error, `0 <= gap < required` a warning.
    fn travel_shortfall(
        self,
        prev: &PlaceActivity,
        next: &PlaceActivity,
    ) -> Option<(Severity, String, ConflictDetails)> {
        let required = next.travel_from_previous?.duration_minutes;
        let gap = self.gap();
        if gap >= i64::from(required) {
            return None;
        }
        let (severity, message) = if gap < 0 {
            (
                Severity::Error,
                format!(
                    "{} starts before {} ends, leaving no time for the {required} minute trip",
                    next.title, prev.title
                ),
            )
        } else {
            (
                Severity::Warning,
                format!(
                    "only {gap} minutes between {} and {}, the trip takes {required}",
                    prev.title, next.title
                ),
            )
        };
        let details = ConflictDetails::InsufficientTravelTime {
            gap_minutes: gap,
            required_minutes: required,
        };
        Some((severity, message, details))
    }

    fn overlap(self, prev: &PlaceActivity, next: &PlaceActivity) -> Option<(String, ConflictDetails)> {
        let overlap_minutes = self.arrival.minutes_until(self.departure);
        (overlap_minutes > 0).then(|| {
            (
                format!(
                    "{} overlaps {} by {overlap_minutes} minutes",
                    next.title, prev.title
                ),
                ConflictDetails::Overlap { overlap_minutes },
            )
        })
    }
}

/// Why `place` should be booked ahead, if it should.
pub(crate) fn reservation_reason(place: &PlaceActivity) -> Option<ReservationReason> {
    if place.has_any_tag(FINE_DINING_TAGS) {
        Some(ReservationReason::FineDining)
    } else if place.meal_type == Some(MealType::Dinner) && place.has_any_tag(RESTAURANT_TAGS) {
        Some(ReservationReason::DinnerAtRestaurant)
    } else if place.availability_status == Some(AvailabilityStatus::RequiresReservation) {
        Some(ReservationReason::MarkedRequired)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use wayfare_core::test_support::{day_of, scheduled_place};
    use wayfare_core::{Activity, NoteActivity};

    fn report_for(places: Vec<PlaceActivity>) -> ConflictReport {
        detect_itinerary_conflicts(&Itinerary {
            days: vec![day_of("d1", places)],
        })
    }

    #[test]
    fn early_arrival_is_closed_during_visit() {
        let report = report_for(vec![scheduled_place(
            "museum",
            ("07:00", "08:00"),
            Some(("09:00", "17:00")),
            None,
        )]);
        assert_eq!(report.summary.total, 1);
        let conflict = report.conflicts.first().expect("one conflict");
        assert_eq!(conflict.kind, ConflictType::ClosedDuringVisit);
        assert_eq!(conflict.severity, Severity::Error);
        assert!(conflict.message.contains("opens at 09:00"), "{}", conflict.message);
    }

    #[test]
    fn late_departure_mentions_closing() {
        let report = report_for(vec![scheduled_place(
            "garden",
            ("16:00", "17:30"),
            Some(("09:00", "17:00")),
            None,
        )]);
        let conflict = report.conflicts.first().expect("one conflict");
        assert!(conflict.message.contains("closes at 17:00"), "{}", conflict.message);
    }

    #[rstest]
    #[case("19:00", "23:30", 0)]
    #[case("23:30", "01:30", 0)]
    #[case("00:30", "01:45", 0)]
    #[case("01:00", "02:30", 1)]
    #[case("17:00", "19:00", 1)]
    #[case("23:00", "02:30", 1)]
    fn overnight_windows_cover_both_sides_of_midnight(
        #[case] arrival: &str,
        #[case] departure: &str,
        #[case] expected: usize,
    ) {
        let report = report_for(vec![scheduled_place(
            "izakaya",
            (arrival, departure),
            Some(("18:00", "02:00")),
            None,
        )]);
        assert_eq!(report.of_type(ConflictType::ClosedDuringVisit).count(), expected);
    }

    #[test]
    fn overlapping_visits_report_overlap_minutes() {
        let report = report_for(vec![
            scheduled_place("a", ("09:30", "11:00"), None, None),
            scheduled_place("b", ("10:30", "11:30"), None, None),
        ]);
        assert_eq!(report.summary.total, 1);
        let conflict = report.conflicts.first().expect("one conflict");
        assert_eq!(conflict.kind, ConflictType::OverlappingActivities);
        assert_eq!(conflict.related_activity_id.as_deref(), Some("a"));
        assert_eq!(conflict.details, ConflictDetails::Overlap { overlap_minutes: 30 });
    }

    #[rstest]
    #[case("11:09", Some(Severity::Error))]
    #[case("11:10", Some(Severity::Warning))]
    #[case("11:24", Some(Severity::Warning))]
    #[case("11:25", None)]
    fn travel_gap_boundaries(#[case] arrival: &str, #[case] expected: Option<Severity>) {
        let report = report_for(vec![
            scheduled_place("a", ("10:00", "11:10"), None, None),
            scheduled_place("b", (arrival, "12:30"), None, Some(15)),
        ]);
        let severity = report
            .of_type(ConflictType::InsufficientTravelTime)
            .next()
            .map(|c| c.severity);
        assert_eq!(severity, expected);
    }

    #[test]
    fn negative_gap_also_reports_the_overlap() {
        let report = report_for(vec![
            scheduled_place("a", ("10:00", "11:10"), None, None),
            scheduled_place("b", ("11:00", "12:00"), None, Some(10)),
        ]);
        let kinds: Vec<ConflictType> = report.conflicts.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            [ConflictType::InsufficientTravelTime, ConflictType::OverlappingActivities]
        );
        assert_eq!(report.summary.errors, 2);
    }

    #[test]
    fn missing_data_skips_only_the_rules_that_need_it() {
        let mut unscheduled = scheduled_place("b", ("11:00", "12:00"), Some(("09:00", "10:00")), Some(30));
        unscheduled.schedule = None;
        let malformed = scheduled_place("c", ("noon", "13:00"), Some(("09:00", "10:00")), Some(30));
        let report = report_for(vec![
            scheduled_place("a", ("09:00", "10:00"), None, None),
            unscheduled,
            malformed,
        ]);
        assert!(report.is_clean());
    }

    #[test]
    fn notes_do_not_break_consecutive_places() {
        let day = day_of(
            "d1",
            [
                Activity::from(scheduled_place("a", ("09:00", "11:00"), None, None)),
                Activity::from(NoteActivity {
                    id: "n".into(),
                    title: "Buy snacks".into(),
                    ..NoteActivity::default()
                }),
                Activity::from(scheduled_place("b", ("10:30", "11:30"), None, None)),
            ],
        );
        let report = detect_itinerary_conflicts(&Itinerary { days: vec![day] });
        assert_eq!(report.of_type(ConflictType::OverlappingActivities).count(), 1);
    }

    #[test]
    fn visits_after_a_midnight_departure_roll_to_the_next_day() {
        let report = report_for(vec![
            scheduled_place("bar", ("23:00", "00:30"), None, None),
            scheduled_place("ramen", ("00:45", "01:15"), None, Some(10)),
        ]);
        assert!(report.is_clean(), "{:?}", report.conflicts);
    }

    #[rstest]
    #[case(vec!["fine_dining"], None, None, Some(ReservationReason::FineDining))]
    #[case(vec!["Michelin"], None, None, Some(ReservationReason::FineDining))]
    #[case(vec!["izakaya"], Some(MealType::Dinner), None, Some(ReservationReason::DinnerAtRestaurant))]
    #[case(vec!["izakaya"], Some(MealType::Lunch), None, None)]
    #[case(vec![], None, Some(AvailabilityStatus::RequiresReservation), Some(ReservationReason::MarkedRequired))]
    #[case(vec!["temple"], Some(MealType::Dinner), Some(AvailabilityStatus::Open), None)]
    fn reservation_triggers(
        #[case] tags: Vec<&str>,
        #[case] meal: Option<MealType>,
        #[case] status: Option<AvailabilityStatus>,
        #[case] expected: Option<ReservationReason>,
    ) {
        let mut place = PlaceActivity::new("r", "Dinner");
        place.tags = tags.into_iter().map(str::to_owned).collect();
        place.meal_type = meal;
        place.availability_status = status;
        assert_eq!(reservation_reason(&place), expected);
    }

    #[test]
    fn clean_itinerary_is_idempotent() {
        let itinerary = Itinerary {
            days: vec![day_of(
                "d1",
                [
                    scheduled_place("a", ("09:00", "10:30"), Some(("09:00", "17:00")), None),
                    scheduled_place("b", ("11:00", "12:00"), Some(("11:00", "22:00")), Some(20)),
                ],
            )],
        };
        let first = detect_itinerary_conflicts(&itinerary);
        assert!(first.is_clean());
        assert_eq!(first.summary.total, 0);
        assert_eq!(first, detect_itinerary_conflicts(&itinerary));
    }

    #[test]
    fn report_serialises_with_wire_names() {
        let place = scheduled_place("a", ("07:00", "08:00"), Some(("09:00", "17:00")), None);
        let value = serde_json::to_value(report_for(vec![place])).expect("serialise");
        assert_eq!(value["summary"]["errors"], 1);
        assert_eq!(value["conflicts"][0]["type"], "closed_during_visit");
        assert_eq!(value["conflicts"][0]["severity"], "error");
        assert_eq!(value["conflicts"][0]["dayId"], "d1");
        assert_eq!(value["conflicts"][0]["details"]["opensAt"], "09:00");
    }
}
