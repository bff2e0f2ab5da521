//! 2-opt refinement of an open tour.
//!
//! The tour starts at a fixed anchor: the caller's start point when given,
//! otherwise the tour's first stop. Reversing `tour[i..=k]` replaces the legs
//! `before(i) -> tour[i]` and `tour[k] -> tour[k + 1]` with
//! `before(i) -> tour[k]` and `tour[i] -> tour[k + 1]`. The tour is open, so
//! the last stop has no outgoing leg.

use geo::Coord;
use wayfare_core::travel_time::haversine_km;

use crate::sequencer::Waypoint;

/// Improvements smaller than this many kilometres are ignored so
/// floating-point noise cannot cause endless swaps.
const MIN_GAIN_KM: f64 = 1e-9;

/// Apply first-improvement 2-opt sweeps until no reversal helps or
/// `max_passes` is reached. Returns the number of reversals applied.
pub(crate) fn refine(
    tour: &mut [Waypoint<'_>],
    start: Option<Coord<f64>>,
    max_passes: usize,
) -> usize {
    let first_movable = usize::from(start.is_none());
    let mut applied = 0;
    for _ in 0..max_passes {
        let mut improved = false;
        for i in first_movable..tour.len() {
            for k in (i + 1)..tour.len() {
                if reversal_gain(tour, start, i, k) > MIN_GAIN_KM {
                    if let Some(segment) = tour.get_mut(i..=k) {
                        segment.reverse();
                    }
                    improved = true;
                    applied += 1;
                }
            }
        }
        if !improved {
            break;
        }
    }
    applied
}

/// Kilometres saved by reversing `tour[i..=k]`; negative when it would
/// lengthen the tour.
#[expect(
    clippy::float_arithmetic,
    reason = "2-opt compares summed great-circle distances"
)]
fn reversal_gain(tour: &[Waypoint<'_>], start: Option<Coord<f64>>, i: usize, k: usize) -> f64 {
    let before = match i.checked_sub(1) {
        Some(previous) => tour.get(previous).map(|w| w.at),
        None => start,
    };
    let (Some(a), Some(b), Some(c)) = (before, tour.get(i).map(|w| w.at), tour.get(k).map(|w| w.at))
    else {
        return 0.0;
    };
    let after = tour.get(k + 1).map(|w| w.at);
    let tail = |from: Coord<f64>| after.map_or(0.0, |d| haversine_km(from, d));
    let current = haversine_km(a, b) + tail(c);
    let reversed = haversine_km(a, c) + tail(b);
    current - reversed
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use wayfare_core::RouteStop;

    fn stops(points: &[(&str, f64, f64)]) -> Vec<RouteStop> {
        points
            .iter()
            .map(|&(id, x, y)| RouteStop::new(id, Some(Coord { x, y })))
            .collect()
    }

    fn waypoints(stops: &[RouteStop]) -> Vec<Waypoint<'_>> {
        stops
            .iter()
            .filter_map(|stop| stop.location.map(|at| Waypoint { stop, at }))
            .collect()
    }

    fn ids(tour: &[Waypoint<'_>]) -> Vec<String> {
        tour.iter().map(|w| w.stop.id.clone()).collect()
    }

    #[rstest]
    fn uncrosses_a_zigzag() {
        let stops = stops(&[
            ("p0", 0.0, 0.0),
            ("p1", 0.01, 0.01),
            ("p2", 0.01, 0.0),
            ("p3", 0.0, 0.01),
        ]);
        let mut tour = waypoints(&stops);
        let applied = refine(&mut tour, None, 10);
        assert!(applied >= 1);
        assert_eq!(ids(&tour).first().map(String::as_str), Some("p0"));
        assert_eq!(ids(&tour), ["p0", "p2", "p1", "p3"]);
    }

    #[rstest]
    fn start_anchor_allows_moving_the_first_stop() {
        // From a start west of everything, visiting `near` first is shorter.
        let stops = stops(&[("far", 0.02, 0.0), ("near", 0.01, 0.0)]);
        let mut tour = waypoints(&stops);
        refine(&mut tour, Some(Coord { x: 0.0, y: 0.0 }), 10);
        assert_eq!(ids(&tour), ["near", "far"]);
    }

    #[rstest]
    fn without_start_the_first_stop_stays() {
        let stops = stops(&[("far", 0.02, 0.0), ("near", 0.01, 0.0)]);
        let mut tour = waypoints(&stops);
        let applied = refine(&mut tour, None, 10);
        assert_eq!(applied, 0);
        assert_eq!(ids(&tour), ["far", "near"]);
    }

    #[rstest]
    fn zero_passes_leave_the_tour_alone() {
        let stops = stops(&[
            ("p0", 0.0, 0.0),
            ("p1", 0.01, 0.01),
            ("p2", 0.01, 0.0),
            ("p3", 0.0, 0.01),
        ]);
        let mut tour = waypoints(&stops);
        assert_eq!(refine(&mut tour, None, 0), 0);
        assert_eq!(ids(&tour), ["p0", "p1", "p2", "p3"]);
    }
}
