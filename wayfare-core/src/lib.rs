//! Core domain types for the Wayfare itinerary engine.
//!
//! The crate holds the itinerary document model, the location catalog and
//! the leaf evaluators the planner builds on: opening-hours and seasonal
//! availability, dining classification and travel-time estimation. It also
//! defines the [`TravelTimeProvider`] and [`RouteSequencer`] seams that other
//! crates implement.
//!
//! Everything here is synchronous and free of shared state. Missing or
//! malformed data degrades the affected check instead of failing the call.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod clock;
pub mod dining;
pub mod hours;
pub mod itinerary;
pub mod location;
pub mod seasonal;
pub mod sequencer;
pub mod travel_time;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use clock::{ClockTime, ClockTimeError, MINUTES_PER_DAY};
pub use dining::{filter_by_meal_type, is_dining_location, suits_meal};
pub use hours::{NextOpening, OpenStatus, OperatingHours, Period, is_open_now};
pub use itinerary::{
    Activity, AvailabilityStatus, Coordinates, Day, Itinerary, MealType, NoteActivity,
    OperatingWindow, PlaceActivity, Schedule, TimeOfDay, TravelLeg, TravelMode,
};
pub use location::{BusyLevel, Location, LocationCatalog, MealOptions};
pub use seasonal::{AvailabilityRule, RuleKind, TripDates, TripDatesError, is_seasonal_location_relevant};
pub use sequencer::{RouteOrder, RouteSequencer, RouteStop};
pub use travel_time::{
    StraightLineTravelTimeProvider, TravelTimeError, TravelTimeMatrix, TravelTimeProvider,
};
