//! Greedy nearest-neighbour sequencing with optional 2-opt refinement.

use geo::Coord;
use wayfare_core::travel_time::haversine_km;
use wayfare_core::{RouteOrder, RouteSequencer, RouteStop};

use crate::two_opt::refine;

/// Configuration for [`NearestNeighbourSequencer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequencerConfig {
    /// Minimum number of resolvable stops before 2-opt refinement runs.
    pub two_opt_threshold: usize,
    /// Upper bound on full 2-opt sweeps.
    pub max_two_opt_passes: usize,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            two_opt_threshold: 8,
            max_two_opt_passes: 50,
        }
    }
}

impl SequencerConfig {
    /// Configuration that never runs 2-opt, yielding the pure greedy order.
    #[must_use]
    pub const fn greedy_only() -> Self {
        Self {
            two_opt_threshold: usize::MAX,
            max_two_opt_passes: 0,
        }
    }
}

/// A stop with resolved coordinates.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Waypoint<'a> {
    pub(crate) stop: &'a RouteStop,
    pub(crate) at: Coord<f64>,
}

/// Default route sequencer.
///
/// From the start point (or, without one, the first stop that has
/// coordinates) it repeatedly visits the closest unvisited stop by
/// great-circle distance. Ties go to the stop listed first.
///
/// # Examples
/// ```rust
/// use geo::Coord;
/// use wayfare_core::{RouteSequencer, RouteStop};
/// use wayfare_router::NearestNeighbourSequencer;
///
/// let stops = [
///     RouteStop::new("a", Some(Coord { x: 0.0, y: 0.0 })),
///     RouteStop::new("b", Some(Coord { x: 0.1, y: 0.0 })),
///     RouteStop::new("c", Some(Coord { x: 0.01, y: 0.0 })),
/// ];
/// let order = NearestNeighbourSequencer::default().sequence(&stops, None);
/// assert_eq!(order.order, ["a", "c", "b"]);
/// assert!(order.order_changed);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestNeighbourSequencer {
    config: SequencerConfig,
}

impl NearestNeighbourSequencer {
    /// Construct a sequencer with explicit configuration.
    #[must_use]
    pub const fn with_config(config: SequencerConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &SequencerConfig {
        &self.config
    }
}

impl RouteSequencer for NearestNeighbourSequencer {
    fn sequence(&self, stops: &[RouteStop], start: Option<Coord<f64>>) -> RouteOrder {
        let (mut remaining, skipped): (Vec<Waypoint<'_>>, Vec<&RouteStop>) =
            split_resolvable(stops);
        let optimized_count = remaining.len();

        let mut tour = Vec::with_capacity(optimized_count);
        let mut current = start;
        if current.is_none() && !remaining.is_empty() {
            let first = remaining.remove(0);
            current = Some(first.at);
            tour.push(first);
        }
        while let Some(from) = current {
            let Some(next) = closest(&remaining, from) else {
                break;
            };
            let waypoint = remaining.remove(next);
            current = Some(waypoint.at);
            tour.push(waypoint);
        }

        if optimized_count >= self.config.two_opt_threshold {
            let improvements = refine(&mut tour, start, self.config.max_two_opt_passes);
            log::debug!("2-opt applied {improvements} improvements over {optimized_count} stops");
        }

        let order: Vec<String> = tour
            .iter()
            .map(|w| w.stop)
            .chain(skipped.iter().copied())
            .map(|stop| stop.id.clone())
            .collect();
        let order_changed = order.iter().zip(stops).any(|(id, stop)| *id != stop.id);
        RouteOrder {
            order,
            order_changed,
            optimized_count,
            skipped_count: skipped.len(),
        }
    }
}

fn split_resolvable(stops: &[RouteStop]) -> (Vec<Waypoint<'_>>, Vec<&RouteStop>) {
    let mut resolved = Vec::with_capacity(stops.len());
    let mut skipped = Vec::new();
    for stop in stops {
        match stop.location {
            Some(at) => resolved.push(Waypoint { stop, at }),
            None => skipped.push(stop),
        }
    }
    (resolved, skipped)
}

/// Index of the waypoint closest to `from`; the earliest wins ties.
fn closest(candidates: &[Waypoint<'_>], from: Coord<f64>) -> Option<usize> {
    candidates
        .iter()
        .enumerate()
        .map(|(index, w)| (index, haversine_km(from, w.at)))
        .min_by(|(_, lhs), (_, rhs)| lhs.total_cmp(rhs))
        .map(|(index, _)| index)
}
