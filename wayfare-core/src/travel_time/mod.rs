//! Estimate travel times between itinerary stops.
//!
//! The [`TravelTimeProvider`] trait abstracts the retrieval of pairwise travel
//! times between coordinates for a given [`TravelMode`](crate::TravelMode).
//! Callers supply a slice of points and receive an adjacency matrix of
//! [`Duration`](std::time::Duration) values. Unreachable pairs are reported as
//! [`Duration::MAX`](std::time::Duration::MAX).
//!
//! [`StraightLineTravelTimeProvider`] is the offline default; routing-service
//! backed providers live in `wayfare-data`.

mod error;
mod provider;
mod straight_line;

pub use error::TravelTimeError;
pub use provider::{TravelTimeMatrix, TravelTimeProvider, whole_minutes};
pub use straight_line::{StraightLineTravelTimeProvider, haversine_km};
