//! Behavioural tests for opening hours and seasonal relevance.

use std::cell::RefCell;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use wayfare_core::{
    AvailabilityRule, ClockTime, OpenStatus, OperatingHours, Period, RuleKind, is_open_now,
    is_seasonal_location_relevant,
};

#[derive(Debug, Default)]
struct AvailabilityWorld {
    hours: RefCell<OperatingHours>,
    status: RefCell<Option<OpenStatus>>,
    rules: RefCell<Vec<AvailabilityRule>>,
    relevant: RefCell<Option<bool>>,
}

#[fixture]
fn world() -> AvailabilityWorld {
    AvailabilityWorld::default()
}

fn time(raw: &str) -> ClockTime {
    raw.parse().expect("valid time")
}

fn weekday(raw: &str) -> Weekday {
    raw.parse().expect("valid weekday")
}

fn date(raw: &str) -> NaiveDate {
    raw.parse().expect("valid ISO date")
}

fn month_day(raw: &str) -> (u32, u32) {
    let (month, day) = raw.split_once('/').expect("month/day");
    (
        month.parse().expect("valid month"),
        day.parse().expect("valid day"),
    )
}

/// The first date on or after 2026-03-02 (a Monday) falling on `weekday`.
fn instant_on(weekday: Weekday, at: ClockTime) -> NaiveDateTime {
    let monday = NaiveDate::from_ymd_opt(2026, 3, 2).expect("valid date");
    let day = monday + chrono::Days::new(u64::from(weekday.num_days_from_monday()));
    assert_eq!(day.weekday(), weekday);
    day.and_hms_opt(at.minutes() / 60, at.minutes() % 60, 0)
        .expect("valid instant")
}

#[given("a venue open on {day} from {open} to {close}")]
fn given_daytime_venue(world: &AvailabilityWorld, day: String, open: String, close: String) {
    let index = weekday(&day).num_days_from_sunday();
    world
        .hours
        .replace(OperatingHours::new(vec![Period::new(index, time(&open), time(&close), false)]));
}

#[given("an overnight venue open on {day} from {open} to {close}")]
fn given_overnight_venue(world: &AvailabilityWorld, day: String, open: String, close: String) {
    let index = weekday(&day).num_days_from_sunday();
    world
        .hours
        .replace(OperatingHours::new(vec![Period::new(index, time(&open), time(&close), true)]));
}

#[given("a venue without opening hours")]
fn given_no_hours(world: &AvailabilityWorld) {
    world.hours.replace(OperatingHours::default());
}

#[when("I check the venue on {day} at {at}")]
fn when_checked(world: &AvailabilityWorld, day: String, at: String) {
    let instant = instant_on(weekday(&day), time(&at));
    let status = is_open_now(&world.hours.borrow(), instant);
    world.status.replace(Some(status));
}

#[then("the venue is open until {close}")]
fn then_open_until(world: &AvailabilityWorld, close: String) {
    assert_eq!(
        *world.status.borrow(),
        Some(OpenStatus::Open {
            closes_at: time(&close)
        })
    );
}

#[then("the venue is closed and reopens in {days} days at {open}")]
fn then_closed(world: &AvailabilityWorld, days: String, open: String) {
    let status = world.status.borrow();
    let Some(OpenStatus::Closed {
        opens_at: Some(next),
    }) = *status
    else {
        panic!("expected a closed status with a next opening, got {status:?}");
    };
    assert_eq!(next.days_ahead, days.parse::<u32>().expect("day count"));
    assert_eq!(next.opens_at, time(&open));
}

#[then("the venue status is unknown")]
fn then_unknown(world: &AvailabilityWorld) {
    assert_eq!(*world.status.borrow(), Some(OpenStatus::Unknown));
}

#[given("a seasonal venue available from {start} to {end} every year")]
fn given_fixed_rule(world: &AvailabilityWorld, start: String, end: String) {
    let (month_start, day_start) = month_day(&start);
    let (month_end, day_end) = month_day(&end);
    world.rules.replace(vec![AvailabilityRule {
        kind: RuleKind::FixedAnnual {
            month_start,
            day_start,
            month_end: Some(month_end),
            day_end: Some(day_end),
        },
        is_available: true,
    }]);
}

#[given("a seasonal venue without availability rules")]
fn given_no_rules(world: &AvailabilityWorld) {
    world.rules.replace(Vec::new());
}

#[when("the trip runs from {start} to {end}")]
fn when_trip_runs(world: &AvailabilityWorld, start: String, end: String) {
    let relevant = is_seasonal_location_relevant(
        true,
        &world.rules.borrow(),
        Some(date(&start)),
        Some(date(&end)),
    );
    world.relevant.replace(Some(relevant));
}

#[then("the venue is relevant")]
fn then_relevant(world: &AvailabilityWorld) {
    assert_eq!(*world.relevant.borrow(), Some(true));
}

#[then("the venue is not relevant")]
fn then_not_relevant(world: &AvailabilityWorld) {
    assert_eq!(*world.relevant.borrow(), Some(false));
}

#[scenario(path = "tests/features/opening_hours.feature", index = 0)]
fn open_inside_hours(world: AvailabilityWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/opening_hours.feature", index = 1)]
fn open_past_midnight(world: AvailabilityWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/opening_hours.feature", index = 2)]
fn closed_reports_next_opening(world: AvailabilityWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/opening_hours.feature", index = 3)]
fn unknown_without_hours(world: AvailabilityWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/seasonal_relevance.feature", index = 0)]
fn festival_inside_trip(world: AvailabilityWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/seasonal_relevance.feature", index = 1)]
fn festival_outside_trip(world: AvailabilityWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/seasonal_relevance.feature", index = 2)]
fn illumination_wraps_new_year(world: AvailabilityWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/seasonal_relevance.feature", index = 3)]
fn seasonal_without_rules(world: AvailabilityWorld) {
    let _ = world;
}
