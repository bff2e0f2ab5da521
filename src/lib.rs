//! Facade crate for the Wayfare itinerary engine.
//!
//! This crate re-exports the domain types, the route sequencer and the
//! planning pipeline, and exposes the OSRM-backed travel time provider and
//! JSON loaders behind the `http-routing` feature.

#![forbid(unsafe_code)]

pub use wayfare_core::{
    Activity, AvailabilityRule, AvailabilityStatus, ClockTime, Coordinates, Day, Itinerary,
    Location, LocationCatalog, MealType, OperatingHours, OperatingWindow, PlaceActivity, Schedule,
    StraightLineTravelTimeProvider, TravelTimeError, TravelTimeMatrix, TravelTimeProvider,
    TripDates, filter_by_meal_type, is_dining_location,
};

pub use wayfare_router::{NearestNeighbourSequencer, SequencerConfig};

pub use wayfare_planner::{
    AvailabilityResult, ConflictReport, DayEntryPoints, OptimizedDay, PlanError, PlanOutcome,
    Planner, ScheduleOptions, check_availability, detect_itinerary_conflicts, optimize_day,
    schedule_itinerary,
};

#[cfg(feature = "http-routing")]
pub use wayfare_data::routing::{HttpTravelTimeProvider, HttpTravelTimeProviderConfig};

#[cfg(feature = "http-routing")]
pub use wayfare_data::{CatalogError, load_itinerary, load_locations};
