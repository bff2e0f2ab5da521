//! End-to-end planning: sequence, schedule, then detect conflicts.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use wayfare_core::{
    Activity, Coordinates, Itinerary, Location, LocationCatalog, RouteSequencer,
    StraightLineTravelTimeProvider, TravelTimeProvider, TripDates,
    is_seasonal_location_relevant,
};
use wayfare_router::NearestNeighbourSequencer;

use crate::availability::{AvailabilityResult, check_availability};
use crate::conflicts::{ConflictReport, detect_itinerary_conflicts};
use crate::error::PlanError;
use crate::options::{DayEntryPoints, ScheduleOptions};
use crate::route::{OptimizedDay, optimize_day, sequence_day};
use crate::scheduler::{DayScheduler, validate_entry_points};

/// The planned itinerary and what is wrong with it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanOutcome {
    /// Sequenced and timestamped itinerary.
    pub itinerary: Itinerary,
    /// Conflicts found in `itinerary`.
    pub conflicts: ConflictReport,
}

/// Runs the whole pipeline against one location catalog.
///
/// The planner holds no per-request state, so a single instance can serve
/// concurrent requests when its sequencer and provider are `Sync`.
///
/// # Examples
/// ```rust
/// use wayfare_core::{Activity, Day, Itinerary, LocationCatalog, PlaceActivity};
/// use wayfare_planner::{DayEntryPoints, Planner};
///
/// let mut garden = PlaceActivity::new("g", "Moss Garden");
/// garden.duration_min = Some(45);
/// let itinerary = Itinerary {
///     days: vec![Day { id: "d1".into(), activities: vec![Activity::from(garden)], ..Day::default() }],
/// };
/// let outcome = Planner::from_catalog(LocationCatalog::new()).plan(&itinerary, &DayEntryPoints::new())?;
/// assert!(outcome.conflicts.is_clean());
/// # Ok::<(), wayfare_planner::PlanError>(())
/// ```
#[derive(Debug)]
pub struct Planner<S = NearestNeighbourSequencer, P = StraightLineTravelTimeProvider>
where
    S: RouteSequencer,
    P: TravelTimeProvider,
{
    catalog: LocationCatalog,
    sequencer: S,
    provider: P,
    options: ScheduleOptions,
    optimize_routes: bool,
}

impl Planner {
    /// A planner with the default sequencer and straight-line travel times.
    #[must_use]
    pub fn from_catalog(catalog: LocationCatalog) -> Self {
        Self::new(
            catalog,
            NearestNeighbourSequencer::default(),
            StraightLineTravelTimeProvider::default(),
        )
    }
}

impl<S, P> Planner<S, P>
where
    S: RouteSequencer,
    P: TravelTimeProvider,
{
    /// Construct a planner with default options and route optimisation on.
    pub fn new(catalog: LocationCatalog, sequencer: S, provider: P) -> Self {
        Self {
            catalog,
            sequencer,
            provider,
            options: ScheduleOptions::default(),
            optimize_routes: true,
        }
    }

    /// Replace the scheduling options.
    #[must_use]
    pub fn with_options(mut self, options: ScheduleOptions) -> Self {
        self.options = options;
        self
    }

    /// Turn route sequencing on or off; when off, the caller's order stands.
    #[must_use]
    pub const fn with_route_optimization(mut self, enabled: bool) -> Self {
        self.optimize_routes = enabled;
        self
    }

    /// The catalog activities are resolved against.
    #[must_use]
    pub const fn catalog(&self) -> &LocationCatalog {
        &self.catalog
    }

    /// The active scheduling options.
    #[must_use]
    pub const fn options(&self) -> &ScheduleOptions {
        &self.options
    }

    /// Sequence each day, timestamp it and collect conflicts.
    ///
    /// # Errors
    ///
    /// Returns a [`PlanError`] for an itinerary without days or entry points
    /// naming unknown days.
    pub fn plan(&self, itinerary: &Itinerary, entry_points: &DayEntryPoints) -> Result<PlanOutcome, PlanError> {
        validate_entry_points(itinerary, entry_points)?;
        let ordered = if self.optimize_routes {
            self.sequence_days(itinerary, entry_points)
        } else {
            itinerary.clone()
        };
        let scheduled = self.schedule(&ordered, entry_points)?;
        let conflicts = detect_itinerary_conflicts(&scheduled);
        log::debug!(
            "planned {} days with {} conflicts",
            scheduled.days.len(),
            conflicts.summary.total
        );
        Ok(PlanOutcome {
            itinerary: scheduled,
            conflicts,
        })
    }

    /// Timestamp `itinerary` without reordering it.
    ///
    /// # Errors
    ///
    /// See [`DayScheduler::schedule`].
    pub fn schedule(&self, itinerary: &Itinerary, entry_points: &DayEntryPoints) -> Result<Itinerary, PlanError> {
        DayScheduler::new(&self.options, &self.catalog, &self.provider).schedule(itinerary, entry_points)
    }

    /// Reorder one day.
    ///
    /// # Errors
    ///
    /// See [`optimize_day`].
    pub fn optimize_day(
        &self,
        itinerary: &Itinerary,
        day_id: &str,
        start: Option<Coordinates>,
    ) -> Result<OptimizedDay, PlanError> {
        optimize_day(itinerary, day_id, start, &self.catalog, &self.sequencer)
    }

    /// Availability of each place activity at `now`.
    #[must_use]
    pub fn check_availability(&self, activities: &[Activity], now: NaiveDateTime) -> Vec<AvailabilityResult> {
        check_availability(activities, &self.catalog, now)
    }

    /// Catalog locations worth offering for a trip, ordered by identifier.
    ///
    /// Seasonal locations need both dates and a matching rule.
    ///
    /// # Errors
    ///
    /// [`PlanError::InvalidTripDates`] when `end` precedes `start`.
    pub fn relevant_locations(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<&Location>, PlanError> {
        if let (Some(from), Some(to)) = (start, end) {
            TripDates::new(from, to)?;
        }
        let mut relevant: Vec<&Location> = self
            .catalog
            .iter()
            .filter(|l| is_seasonal_location_relevant(l.is_seasonal, &l.availability_rules, start, end))
            .collect();
        relevant.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(relevant)
    }

    fn sequence_days(&self, itinerary: &Itinerary, entry_points: &DayEntryPoints) -> Itinerary {
        let days = itinerary
            .days
            .iter()
            .map(|day| {
                let start = entry_points.get(&day.id).and_then(|entry| entry.start_point);
                sequence_day(day, start, &self.catalog, &self.sequencer).day
            })
            .collect();
        Itinerary { days }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use wayfare_core::test_support::{FailingTravelTimeProvider, day_of, place_at, scheduled_place};
    use wayfare_core::{AvailabilityRule, AvailabilityStatus, ClockTime, OperatingHours, Period, RuleKind};

    use crate::conflicts::ConflictType;

    fn hm(h: u32, m: u32) -> ClockTime {
        ClockTime::from_hm(h, m).expect("valid time")
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[fixture]
    fn catalog() -> LocationCatalog {
        let mut festival = Location::new("gion-matsuri", "Gion Matsuri");
        festival.is_seasonal = true;
        festival.availability_rules = vec![AvailabilityRule {
            kind: RuleKind::FixedAnnual {
                month_start: 7,
                day_start: 1,
                month_end: Some(7),
                day_end: Some(31),
            },
            is_available: true,
        }];
        let mut temple = Location::new("kinkaku-ji", "Kinkaku-ji");
        temple.hours = Some(OperatingHours::new(
            (0..7).map(|day| Period::new(day, hm(9, 0), hm(17, 0), false)).collect(),
        ));
        let mut uncurated = Location::new("illumination", "Winter Illumination");
        uncurated.is_seasonal = true;
        [festival, temple, uncurated].into_iter().collect()
    }

    #[rstest]
    fn end_to_end_reports_the_early_ramen_arrival() {
        let itinerary = Itinerary {
            days: vec![day_of(
                "d1",
                [
                    scheduled_place("temple", ("09:00", "10:30"), Some(("09:00", "17:00")), None),
                    scheduled_place("ramen", ("10:35", "11:30"), Some(("11:00", "22:00")), Some(5)),
                ],
            )],
        };
        let report = detect_itinerary_conflicts(&itinerary);
        assert_eq!(report.summary.total, 1);
        let conflict = report.conflicts.first().expect("one conflict");
        assert_eq!(conflict.kind, ConflictType::ClosedDuringVisit);
        assert_eq!(conflict.activity_id, "ramen");
    }

    #[rstest]
    fn planning_sequences_schedules_and_detects(catalog: LocationCatalog) {
        let mut temple = place_at("temple", 35.0394, 135.7292);
        temple.location_id = Some("kinkaku-ji".into());
        let far = place_at("far", 35.10, 135.80);
        let near = place_at("near", 35.0400, 135.7300);
        let mut day = day_of("d1", [temple, far, near]);
        day.date = Some(date(2026, 7, 15));
        let itinerary = Itinerary { days: vec![day] };

        let outcome = Planner::new(catalog, NearestNeighbourSequencer::default(), FailingTravelTimeProvider)
            .plan(&itinerary, &DayEntryPoints::new())
            .expect("planned");
        let day = outcome.itinerary.day("d1").expect("day kept");
        let order: Vec<&str> = day.places().map(|p| p.id.as_str()).collect();
        assert_eq!(order, ["temple", "near", "far"]);
        assert!(day.places().all(|p| p.schedule.is_some()));
        let window = day.places().next().and_then(|p| p.operating_window.clone());
        assert_eq!(window.map(|w| w.opens_at).as_deref(), Some("09:00"));
        assert!(outcome.conflicts.is_clean(), "{:?}", outcome.conflicts);
    }

    #[rstest]
    fn disabled_optimization_keeps_the_callers_order(catalog: LocationCatalog) {
        let itinerary = Itinerary {
            days: vec![day_of(
                "d1",
                [place_at("a", 0.0, 0.0), place_at("b", 0.0, 0.1), place_at("c", 0.0, 0.01)],
            )],
        };
        let outcome = Planner::from_catalog(catalog)
            .with_route_optimization(false)
            .plan(&itinerary, &DayEntryPoints::new())
            .expect("planned");
        let day = outcome.itinerary.days.first().expect("one day");
        let order: Vec<&str> = day.places().map(|p| p.id.as_str()).collect();
        assert_eq!(order, ["a", "b", "c"]);
    }

    #[rstest]
    fn plan_rejects_entry_points_for_unknown_days(catalog: LocationCatalog) {
        let itinerary = Itinerary {
            days: vec![day_of("d1", [place_at("a", 0.0, 0.0)])],
        };
        let entry_points = DayEntryPoints::from([("d7".to_owned(), crate::EntryPoint::default())]);
        let err = Planner::from_catalog(catalog)
            .plan(&itinerary, &entry_points)
            .expect_err("unknown day");
        assert_eq!(err, PlanError::UnknownDay { day_id: "d7".into() });
    }

    #[rstest]
    #[case(Some(date(2026, 7, 10)), Some(date(2026, 7, 20)), vec!["gion-matsuri", "kinkaku-ji"])]
    #[case(Some(date(2026, 9, 1)), Some(date(2026, 9, 5)), vec!["kinkaku-ji"])]
    #[case(None, None, vec!["kinkaku-ji"])]
    fn relevant_locations_filter_seasonal_entries(
        catalog: LocationCatalog,
        #[case] start: Option<NaiveDate>,
        #[case] end: Option<NaiveDate>,
        #[case] expected: Vec<&str>,
    ) {
        let planner = Planner::from_catalog(catalog);
        let ids: Vec<&str> = planner
            .relevant_locations(start, end)
            .expect("valid dates")
            .into_iter()
            .map(|l| l.id.as_str())
            .collect();
        assert_eq!(ids, expected);
    }

    #[rstest]
    fn reversed_trip_dates_are_rejected(catalog: LocationCatalog) {
        let planner = Planner::from_catalog(catalog);
        let err = planner
            .relevant_locations(Some(date(2026, 7, 20)), Some(date(2026, 7, 10)))
            .expect_err("reversed dates");
        assert!(matches!(err, PlanError::InvalidTripDates(_)));
    }

    #[rstest]
    fn malformed_times_never_stop_the_rest_of_the_day(mut catalog: LocationCatalog) {
        let broken: Location = serde_json::from_str(
            r#"{"id": "broken", "name": "Broken Hours",
                "hours": {"periods": [{"day": 1, "open": "noon", "close": "late"}]}}"#,
        )
        .expect("location with malformed hours still decodes");
        catalog.insert(broken);

        let mut garbled = place_at("garbled", 35.0400, 135.7300);
        garbled.operating_window = Some(wayfare_core::OperatingWindow {
            opens_at: "ten".into(),
            closes_at: "4pm".into(),
            is_overnight: false,
        });
        garbled.schedule = Some(wayfare_core::Schedule {
            arrival_time: "soon".into(),
            departure_time: "later".into(),
        });
        let mut unknown_hours = place_at("unknown-hours", 35.0410, 135.7310);
        unknown_hours.location_id = Some("broken".into());
        let mut temple = place_at("temple", 35.0394, 135.7292);
        temple.location_id = Some("kinkaku-ji".into());
        let mut day = day_of("d1", [garbled, unknown_hours, temple]);
        // A Monday, so catalog hours are consulted.
        day.date = Some(date(2026, 3, 2));
        let itinerary = Itinerary { days: vec![day] };

        let outcome = Planner::new(catalog.clone(), NearestNeighbourSequencer::default(), FailingTravelTimeProvider)
            .with_route_optimization(false)
            .plan(&itinerary, &DayEntryPoints::new())
            .expect("malformed data is not a planning error");
        let day = outcome.itinerary.day("d1").expect("day kept");
        assert!(day.places().all(|p| p.schedule.is_some()), "{day:?}");
        let temple_window = day
            .places()
            .find(|p| p.id == "temple")
            .and_then(|p| p.operating_window.clone());
        assert_eq!(temple_window.map(|w| w.opens_at).as_deref(), Some("09:00"));
        assert!(
            outcome
                .conflicts
                .conflicts
                .iter()
                .all(|c| c.kind != ConflictType::ClosedDuringVisit),
            "{:?}",
            outcome.conflicts
        );

        let noon = date(2026, 3, 2).and_hms_opt(12, 0, 0).expect("valid instant");
        let statuses: Vec<(String, AvailabilityStatus)> =
            check_availability(&day.activities, &catalog, noon)
                .into_iter()
                .map(|r| (r.activity_id, r.status))
                .collect();
        assert_eq!(
            statuses,
            [
                ("garbled".to_owned(), AvailabilityStatus::Unknown),
                ("unknown-hours".to_owned(), AvailabilityStatus::Unknown),
                ("temple".to_owned(), AvailabilityStatus::Open),
            ]
        );
    }
}
