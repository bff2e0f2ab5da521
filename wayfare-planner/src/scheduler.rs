//! Day Scheduler: assign arrival and departure times to place activities.
//!
//! Each day is walked in activity order from its start time. A visit's
//! arrival is the previous departure plus the leg to it and the transition
//! buffer. Arrivals before opening wait for the doors to open; departures are
//! never clipped to closing time, so late visits surface as conflicts rather
//! than silently shrinking.

use std::collections::HashMap;

use chrono::Datelike;
use geo::Coord;
use wayfare_core::travel_time::whole_minutes;
use wayfare_core::{
    ClockTime, Day, Itinerary, LocationCatalog, OperatingWindow, PlaceActivity, Schedule,
    StraightLineTravelTimeProvider, TravelLeg, TravelTimeMatrix, TravelTimeProvider,
};

use crate::error::PlanError;
use crate::options::{DayEntryPoints, EntryPoint, ScheduleOptions};

/// Schedules itineraries against a location catalog and a travel-time
/// provider.
///
/// # Examples
/// ```rust
/// use wayfare_core::{
///     Activity, Day, Itinerary, LocationCatalog, PlaceActivity, StraightLineTravelTimeProvider,
/// };
/// use wayfare_planner::{DayEntryPoints, DayScheduler, ScheduleOptions};
///
/// let mut temple = PlaceActivity::new("t", "Temple");
/// temple.duration_min = Some(90);
/// let itinerary = Itinerary {
///     days: vec![Day { id: "d1".into(), activities: vec![Activity::from(temple)], ..Day::default() }],
/// };
/// let options = ScheduleOptions::default();
/// let catalog = LocationCatalog::new();
/// let provider = StraightLineTravelTimeProvider::default();
/// let scheduler = DayScheduler::new(&options, &catalog, &provider);
/// let scheduled = scheduler.schedule(&itinerary, &DayEntryPoints::new())?;
/// let visit = scheduled.days.first().expect("one day").places().next().and_then(|p| p.schedule.clone());
/// assert_eq!(visit.map(|s| s.departure_time).as_deref(), Some("10:30"));
/// # Ok::<(), wayfare_planner::PlanError>(())
/// ```
#[derive(Debug)]
pub struct DayScheduler<'a, P: ?Sized> {
    options: &'a ScheduleOptions,
    catalog: &'a LocationCatalog,
    provider: &'a P,
}

impl<'a, P> DayScheduler<'a, P>
where
    P: TravelTimeProvider + ?Sized,
{
    /// Construct a scheduler.
    #[must_use]
    pub const fn new(options: &'a ScheduleOptions, catalog: &'a LocationCatalog, provider: &'a P) -> Self {
        Self {
            options,
            catalog,
            provider,
        }
    }

    /// Timestamp every place activity of `itinerary`.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::EmptyItinerary`] for an itinerary without days and
    /// [`PlanError::UnknownDay`] when `entry_points` names a day that does not
    /// exist.
    pub fn schedule(
        &self,
        itinerary: &Itinerary,
        entry_points: &DayEntryPoints,
    ) -> Result<Itinerary, PlanError> {
        validate_entry_points(itinerary, entry_points)?;
        let mut scheduled = itinerary.clone();
        for day in &mut scheduled.days {
            let entry = entry_points.get(&day.id).copied().unwrap_or_default();
            self.schedule_day(day, &entry);
        }
        Ok(scheduled)
    }

    /// Timestamp one day in place.
    pub fn schedule_day(&self, day: &mut Day, entry: &EntryPoint) {
        let start = entry.start_point.and_then(|c| c.to_coord());
        let end = entry.end_point.and_then(|c| c.to_coord());
        let estimates = self.estimate_legs(day, start, end);
        let visit_weekday = day.date.map(|date| date.weekday());

        let mut cursor = entry.start_time.unwrap_or(self.options.default_day_start);
        let mut has_previous = start.is_some();
        let mut last_departure = None;
        for (index, place) in day
            .activities
            .iter_mut()
            .filter_map(|activity| activity.as_place_mut())
            .enumerate()
        {
            let travel = if has_previous {
                self.resolve_travel(place, estimates.leg_into(index))
                    .saturating_add(self.options.transition_buffer_minutes)
            } else {
                0
            };
            let mut arrival = cursor.add_minutes(travel);

            if place.operating_window.is_none()
                && let Some(weekday) = visit_weekday
            {
                place.operating_window = self
                    .catalog
                    .hours_for(place)
                    .and_then(|hours| hours.window_on(weekday));
            }
            if let Some(opens) = place.operating_window.as_ref().and_then(|w| waits_until(w, arrival)) {
                log::debug!("{}: arrival {arrival} advanced to opening at {opens}", place.id);
                arrival = opens;
            }

            let category = self.catalog.location_for(place).and_then(|l| l.category.as_deref());
            let departure = arrival.add_minutes(self.options.visit_minutes(place, category));
            place.schedule = Some(Schedule::new(arrival, departure));
            cursor = departure;
            has_previous = true;
            last_departure = Some(departure);
        }

        let Some(departure) = last_departure else {
            return;
        };
        let finish = estimates
            .return_leg
            .map_or(departure, |minutes| departure.add_minutes(minutes));
        if finish > self.options.default_day_end {
            log::debug!(
                "day {} finishes at {finish}, after the configured end {}",
                day.id,
                self.options.default_day_end
            );
        }
    }

    /// Minutes of travel into `place`. An explicit leg wins; otherwise the
    /// estimate or the fallback is used and written back to the activity.
    fn resolve_travel(&self, place: &mut PlaceActivity, estimate: Option<u32>) -> u32 {
        if let Some(leg) = place.travel_from_previous {
            return leg.duration_minutes;
        }
        let minutes = estimate.unwrap_or(self.options.fallback_travel_minutes);
        place.travel_from_previous = Some(TravelLeg {
            mode: self.options.travel_mode,
            duration_minutes: minutes,
        });
        minutes
    }

    /// Query the provider once for the day's resolvable points: the start
    /// point, each place with coordinates and the end point, in that order.
    fn estimate_legs(&self, day: &Day, start: Option<Coord<f64>>, end: Option<Coord<f64>>) -> LegEstimates {
        let stops: Vec<Option<Coord<f64>>> =
            day.places().map(|place| self.catalog.coordinates_for(place)).collect();
        let points: Vec<Coord<f64>> = start
            .into_iter()
            .chain(stops.iter().flatten().copied())
            .chain(end)
            .collect();
        if points.len() < 2 {
            return LegEstimates::default();
        }
        let matrix = match self.provider.get_travel_time_matrix(&points, self.options.travel_mode) {
            Ok(matrix) => matrix,
            Err(err) => {
                log::warn!("travel estimates unavailable for day {}: {err}", day.id);
                return LegEstimates::default();
            }
        };
        LegEstimates::from_matrix(&matrix, &stops, start.is_some(), end.is_some())
    }
}

/// Per-stop leg estimates in minutes for one day.
#[derive(Debug, Default)]
struct LegEstimates {
    /// Leg into the n-th place, keyed by place index.
    legs: HashMap<usize, u32>,
    /// Leg from the last place to the end point.
    return_leg: Option<u32>,
}

impl LegEstimates {
    fn from_matrix(
        matrix: &TravelTimeMatrix,
        stops: &[Option<Coord<f64>>],
        has_start: bool,
        has_end: bool,
    ) -> Self {
        // Row/column of each resolvable place in the matrix.
        let mut next_row = usize::from(has_start);
        let rows: Vec<Option<usize>> = stops
            .iter()
            .map(|stop| {
                stop.map(|_| {
                    let row = next_row;
                    next_row += 1;
                    row
                })
            })
            .collect();
        let cell = |from: usize, to: usize| {
            let minutes = matrix.get(from).and_then(|row| row.get(to)).copied().and_then(whole_minutes);
            if minutes.is_none() {
                log::warn!("no travel estimate between matrix points {from} and {to}");
            }
            minutes
        };

        let mut legs = HashMap::new();
        let mut previous = has_start.then_some(0);
        for (index, row) in rows.iter().enumerate() {
            if let (Some(from), Some(to)) = (previous, *row)
                && let Some(minutes) = cell(from, to)
            {
                legs.insert(index, minutes);
            }
            previous = *row;
        }
        let return_leg = match (has_end, rows.last().copied().flatten()) {
            (true, Some(last)) => cell(last, next_row),
            _ => None,
        };
        Self { legs, return_leg }
    }

    fn leg_into(&self, index: usize) -> Option<u32> {
        self.legs.get(&index).copied()
    }
}

/// The time a visit arriving at `arrival` has to wait for, if the window
/// has not opened yet. Arrivals inside the after-midnight tail of an
/// overnight window do not wait.
fn waits_until(window: &OperatingWindow, arrival: ClockTime) -> Option<ClockTime> {
    let (opens, closes) = window.bounds()?;
    let overnight = window.is_overnight || closes <= opens;
    if overnight && arrival < closes {
        return None;
    }
    (arrival < opens).then_some(opens)
}

pub(crate) fn validate_entry_points(itinerary: &Itinerary, entry_points: &DayEntryPoints) -> Result<(), PlanError> {
    if itinerary.days.is_empty() {
        return Err(PlanError::EmptyItinerary);
    }
    entry_points
        .keys()
        .find(|id| itinerary.day(id).is_none())
        .map_or(Ok(()), |day_id| {
            Err(PlanError::UnknownDay {
                day_id: day_id.clone(),
            })
        })
}

/// Schedule `itinerary` using inline coordinates and straight-line travel
/// estimates.
///
/// Use [`DayScheduler`] to supply a location catalog or a routing-service
/// provider.
///
/// # Errors
///
/// See [`DayScheduler::schedule`].
pub fn schedule_itinerary(
    itinerary: &Itinerary,
    options: &ScheduleOptions,
    entry_points: &DayEntryPoints,
) -> Result<Itinerary, PlanError> {
    let catalog = LocationCatalog::new();
    let provider = StraightLineTravelTimeProvider::default();
    DayScheduler::new(options, &catalog, &provider).schedule(itinerary, entry_points)
}
