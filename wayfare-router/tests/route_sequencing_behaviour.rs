#![expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]

//! Behavioural tests for `NearestNeighbourSequencer` using rstest-bdd.

use std::cell::RefCell;

use geo::Coord;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use wayfare_core::{RouteOrder, RouteSequencer, RouteStop};
use wayfare_router::NearestNeighbourSequencer;

#[derive(Debug, Default)]
struct SequencingWorld {
    stops: RefCell<Vec<RouteStop>>,
    start: RefCell<Option<Coord<f64>>>,
    order: RefCell<Option<RouteOrder>>,
}

#[fixture]
fn world() -> SequencingWorld {
    SequencingWorld::default()
}

fn coord(x: &str, y: &str) -> Coord<f64> {
    Coord {
        x: x.trim().parse().expect("numeric x"),
        y: y.trim().parse().expect("numeric y"),
    }
}

fn recorded(world: &SequencingWorld) -> RouteOrder {
    world
        .order
        .borrow()
        .clone()
        .expect("order should be recorded before assertions")
}

#[given("a stop {name} at {x}, {y}")]
fn given_stop(world: &SequencingWorld, name: String, x: String, y: String) {
    world
        .stops
        .borrow_mut()
        .push(RouteStop::new(name, Some(coord(&x, &y))));
}

#[given("a stop {name} without coordinates")]
fn given_unresolved_stop(world: &SequencingWorld, name: String) {
    world.stops.borrow_mut().push(RouteStop::new(name, None));
}

#[given("an entry point at {x}, {y}")]
fn given_entry_point(world: &SequencingWorld, x: String, y: String) {
    world.start.replace(Some(coord(&x, &y)));
}

#[when("the day is sequenced")]
fn when_sequenced(world: &SequencingWorld) {
    let order = NearestNeighbourSequencer::default()
        .sequence(&world.stops.borrow(), *world.start.borrow());
    world.order.replace(Some(order));
}

#[then("the visiting order is {ids}")]
fn then_order(world: &SequencingWorld, ids: String) {
    let expected: Vec<String> = ids.split(',').map(|id| id.trim().to_owned()).collect();
    assert_eq!(recorded(world).order, expected);
}

#[then("the order is reported as changed")]
fn then_changed(world: &SequencingWorld) {
    assert!(recorded(world).order_changed);
}

#[then("the order is reported as unchanged")]
fn then_unchanged(world: &SequencingWorld) {
    assert!(!recorded(world).order_changed);
}

#[then("{count} stops are skipped")]
fn then_skipped(world: &SequencingWorld, count: String) {
    let expected: usize = count.parse().expect("numeric count");
    assert_eq!(recorded(world).skipped_count, expected);
}

#[scenario(path = "tests/features/route_sequencing.feature", index = 0)]
fn nearer_stop_first(world: SequencingWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/route_sequencing.feature", index = 1)]
fn unresolved_stops_last(world: SequencingWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/route_sequencing.feature", index = 2)]
fn entry_point_anchors(world: SequencingWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/route_sequencing.feature", index = 3)]
fn efficient_day_unchanged(world: SequencingWorld) {
    let _ = world;
}
