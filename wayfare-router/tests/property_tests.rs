//! Property-based tests for the nearest-neighbour sequencer.
//!
//! # Invariants tested
//!
//! - **Permutation:** every input stop appears exactly once in the output.
//! - **Skipped tail:** stops without coordinates trail the order in input order.
//! - **Counts:** `optimized_count + skipped_count` equals the input length.
//! - **Greedy choice:** below the 2-opt threshold, every step picks a closest
//!   remaining stop.
//! - **Determinism:** repeated runs give identical orders.

use std::collections::HashMap;

use geo::Coord;
use proptest::prelude::*;
use wayfare_core::travel_time::haversine_km;
use wayfare_core::{RouteSequencer, RouteStop};
use wayfare_router::{NearestNeighbourSequencer, SequencerConfig};

/// Stops clustered within a few kilometres, roughly a third without
/// coordinates. Identifiers are unique.
fn stops_strategy() -> impl Strategy<Value = Vec<RouteStop>> {
    proptest::collection::vec(
        prop::option::weighted(0.7, (135.70_f64..135.80, 34.95_f64..35.05)),
        0..14,
    )
    .prop_map(|points| {
        points
            .into_iter()
            .enumerate()
            .map(|(index, point)| {
                RouteStop::new(format!("stop-{index}"), point.map(|(x, y)| Coord { x, y }))
            })
            .collect()
    })
}

fn start_strategy() -> impl Strategy<Value = Option<Coord<f64>>> {
    prop::option::of((135.70_f64..135.80, 34.95_f64..35.05).prop_map(|(x, y)| Coord { x, y }))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn output_is_a_permutation_with_skipped_tail(
        stops in stops_strategy(),
        start in start_strategy(),
    ) {
        let order = NearestNeighbourSequencer::default().sequence(&stops, start);

        let mut expected: Vec<&str> = stops.iter().map(|s| s.id.as_str()).collect();
        let mut actual: Vec<&str> = order.order.iter().map(String::as_str).collect();
        expected.sort_unstable();
        actual.sort_unstable();
        prop_assert_eq!(actual, expected);

        let skipped: Vec<&str> = stops
            .iter()
            .filter(|s| s.location.is_none())
            .map(|s| s.id.as_str())
            .collect();
        let tail_start = order.order.len() - skipped.len();
        let tail: Vec<&str> = order.order.iter().skip(tail_start).map(String::as_str).collect();
        prop_assert_eq!(tail, skipped.clone());
        prop_assert_eq!(order.skipped_count, skipped.len());
        prop_assert_eq!(order.optimized_count + order.skipped_count, stops.len());

        let unchanged = order.order.iter().zip(&stops).all(|(id, s)| *id == s.id);
        prop_assert_eq!(order.order_changed, !unchanged);
    }

    #[test]
    fn greedy_steps_pick_a_closest_stop(
        stops in stops_strategy(),
        start in start_strategy(),
    ) {
        let sequencer = NearestNeighbourSequencer::with_config(SequencerConfig::greedy_only());
        let order = sequencer.sequence(&stops, start);
        let by_id: HashMap<&str, Coord<f64>> = stops
            .iter()
            .filter_map(|s| s.location.map(|at| (s.id.as_str(), at)))
            .collect();
        let visited: Vec<Coord<f64>> = order
            .order
            .iter()
            .filter_map(|id| by_id.get(id.as_str()).copied())
            .collect();

        let mut current = start.or_else(|| visited.first().copied());
        let skip_first = usize::from(start.is_none());
        for (step, next) in visited.iter().enumerate().skip(skip_first) {
            let Some(from) = current else { break };
            let chosen = haversine_km(from, *next);
            let best = visited
                .iter()
                .skip(step)
                .map(|candidate| haversine_km(from, *candidate))
                .fold(f64::INFINITY, f64::min);
            prop_assert!(chosen <= best, "step {} chose {} but {} was available", step, chosen, best);
            current = Some(*next);
        }
    }

    #[test]
    fn sequencing_is_deterministic(
        stops in stops_strategy(),
        start in start_strategy(),
    ) {
        let sequencer = NearestNeighbourSequencer::default();
        prop_assert_eq!(sequencer.sequence(&stops, start), sequencer.sequence(&stops, start));
    }
}
