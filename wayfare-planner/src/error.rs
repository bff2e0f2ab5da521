//! Caller-contract violations reported by the planner.

use thiserror::Error;
use wayfare_core::TripDatesError;

/// Errors returned when the request itself is unusable.
///
/// Missing or malformed activity data never produces a `PlanError`; those
/// cases degrade the affected check instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    /// The itinerary has no days.
    #[error("itinerary has no days")]
    EmptyItinerary,
    /// A request referenced a day that is not in the itinerary.
    #[error("day '{day_id}' is not part of the itinerary")]
    UnknownDay {
        /// The missing day identifier.
        day_id: String,
    },
    /// The trip date range is reversed.
    #[error(transparent)]
    InvalidTripDates(#[from] TripDatesError),
}
