//! Route optimisation for a single day.

use serde::Serialize;
use wayfare_core::{
    Activity, Coordinates, Day, Itinerary, LocationCatalog, PlaceActivity, RouteOrder,
    RouteSequencer, RouteStop,
};

use crate::error::PlanError;

/// Counts reported with an [`OptimizedDay`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteStats {
    /// Stops that had coordinates and took part in sequencing.
    pub optimized_count: usize,
    /// Stops without coordinates, kept at the end in input order.
    pub skipped_count: usize,
}

/// Outcome of [`optimize_day`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizedDay {
    /// Whether the visiting order changed.
    pub optimized: bool,
    /// The day in its new order; unchanged when `optimized` is false.
    pub day: Day,
    /// Sequencing counts.
    pub stats: RouteStats,
}

/// Reorder the place activities of one day with `sequencer`.
///
/// Place activities take the slots places held before, so notes stay where
/// they were. A reordered place loses its `travelFromPrevious` leg when its
/// predecessor changed; rescheduling recomputes it.
///
/// # Errors
///
/// [`PlanError::EmptyItinerary`] when there are no days and
/// [`PlanError::UnknownDay`] when `day_id` is not among them.
pub fn optimize_day<S>(
    itinerary: &Itinerary,
    day_id: &str,
    start: Option<Coordinates>,
    catalog: &LocationCatalog,
    sequencer: &S,
) -> Result<OptimizedDay, PlanError>
where
    S: RouteSequencer + ?Sized,
{
    if itinerary.days.is_empty() {
        return Err(PlanError::EmptyItinerary);
    }
    let day = itinerary.day(day_id).ok_or_else(|| PlanError::UnknownDay {
        day_id: day_id.to_owned(),
    })?;
    Ok(sequence_day(day, start, catalog, sequencer))
}

pub(crate) fn sequence_day<S>(
    day: &Day,
    start: Option<Coordinates>,
    catalog: &LocationCatalog,
    sequencer: &S,
) -> OptimizedDay
where
    S: RouteSequencer + ?Sized,
{
    let stops = RouteStop::from_day(day, catalog);
    let route = sequencer.sequence(&stops, start.and_then(Coordinates::to_coord));
    let stats = RouteStats {
        optimized_count: route.optimized_count,
        skipped_count: route.skipped_count,
    };
    if !route.order_changed {
        return OptimizedDay {
            optimized: false,
            day: day.clone(),
            stats,
        };
    }
    log::debug!("day {} reordered to {:?}", day.id, route.order);
    OptimizedDay {
        optimized: true,
        day: reorder(day, &route),
        stats,
    }
}

fn reorder(day: &Day, route: &RouteOrder) -> Day {
    let mut pool: Vec<Option<PlaceActivity>> = day.places().cloned().map(Some).collect();
    let original: Vec<String> = day.places().map(|p| p.id.clone()).collect();
    let mut ordered: Vec<PlaceActivity> = route
        .order
        .iter()
        .filter_map(|id| {
            pool.iter_mut()
                .find(|slot| slot.as_ref().is_some_and(|p| &p.id == id))
                .and_then(Option::take)
        })
        .collect();
    // Anything the sequencer dropped keeps its relative order at the end.
    ordered.extend(pool.into_iter().flatten());

    let mut previous: Option<String> = None;
    for place in &mut ordered {
        if predecessor(&original, &place.id) != previous.as_deref() {
            place.travel_from_previous = None;
        }
        previous = Some(place.id.clone());
    }

    let mut places = ordered.into_iter();
    let activities = day
        .activities
        .iter()
        .map(|activity| match activity {
            Activity::Place(original_place) => places
                .next()
                .map_or_else(|| Activity::Place(original_place.clone()), Activity::Place),
            Activity::Note(note) => Activity::Note(note.clone()),
        })
        .collect();
    Day {
        activities,
        ..day.clone()
    }
}

fn predecessor<'a>(order: &'a [String], id: &str) -> Option<&'a str> {
    let at = order.iter().position(|candidate| candidate == id)?;
    at.checked_sub(1)
        .and_then(|before| order.get(before))
        .map(String::as_str)
}
