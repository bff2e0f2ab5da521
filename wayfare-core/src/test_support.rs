//! Test doubles and itinerary builders shared by unit and behaviour tests.
//!
//! The helpers in this module are gated behind the `test-support` feature
//! (and `cfg(test)`).

use std::time::Duration;

use geo::Coord;

use crate::{
    Activity, ClockTime, Coordinates, Day, OperatingWindow, PlaceActivity, Schedule, TravelLeg, TravelMode,
    TravelTimeError, TravelTimeMatrix, TravelTimeProvider,
};

/// Deterministic `TravelTimeProvider` returning one-minute edges.
#[derive(Default, Debug, Copy, Clone)]
pub struct UnitTravelTimeProvider;

impl TravelTimeProvider for UnitTravelTimeProvider {
    fn get_travel_time_matrix(
        &self,
        points: &[Coord<f64>],
        _mode: TravelMode,
    ) -> Result<TravelTimeMatrix, TravelTimeError> {
        if points.is_empty() {
            return Err(TravelTimeError::EmptyInput);
        }
        let n = points.len();
        let mut matrix = vec![vec![Duration::from_secs(60); n]; n];
        for (i, row) in matrix.iter_mut().enumerate() {
            if let Some(cell) = row.get_mut(i) {
                *cell = Duration::ZERO;
            }
        }
        Ok(matrix)
    }
}

/// A `TravelTimeProvider` returning a fixed, caller-supplied matrix.
///
/// Dimension mismatches produce a [`TravelTimeError::ServiceError`] with
/// code `DIMENSION_MISMATCH`.
#[derive(Debug, Clone)]
pub struct FixedMatrixTravelTimeProvider {
    matrix: TravelTimeMatrix,
}

impl FixedMatrixTravelTimeProvider {
    /// Construct a provider from a pre-built matrix.
    pub const fn new(matrix: TravelTimeMatrix) -> Self {
        Self { matrix }
    }

    /// Build from whole minutes for convenience in fixtures.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use geo::Coord;
    /// use wayfare_core::{TravelMode, TravelTimeProvider};
    /// use wayfare_core::test_support::FixedMatrixTravelTimeProvider;
    ///
    /// let provider = FixedMatrixTravelTimeProvider::from_minutes(vec![vec![0, 7], vec![7, 0]]);
    /// let points = [Coord { x: 0.0, y: 0.0 }, Coord { x: 1.0, y: 0.0 }];
    /// assert!(provider.get_travel_time_matrix(&points, TravelMode::Walk).is_ok());
    /// ```
    pub fn from_minutes(minutes: Vec<Vec<u64>>) -> Self {
        let matrix = minutes
            .into_iter()
            .map(|row| row.into_iter().map(|m| Duration::from_secs(m * 60)).collect())
            .collect();
        Self { matrix }
    }
}

impl TravelTimeProvider for FixedMatrixTravelTimeProvider {
    fn get_travel_time_matrix(
        &self,
        points: &[Coord<f64>],
        _mode: TravelMode,
    ) -> Result<TravelTimeMatrix, TravelTimeError> {
        if points.is_empty() {
            return Err(TravelTimeError::EmptyInput);
        }
        let expected = points.len();
        if self.matrix.len() != expected || self.matrix.iter().any(|row| row.len() != expected) {
            return Err(TravelTimeError::ServiceError {
                code: "DIMENSION_MISMATCH".to_owned(),
                message: format!("matrix is not {expected}x{expected}"),
            });
        }
        Ok(self.matrix.clone())
    }
}

/// A `TravelTimeProvider` that always fails, standing in for an unreachable
/// routing service.
#[derive(Default, Debug, Copy, Clone)]
pub struct FailingTravelTimeProvider;

impl TravelTimeProvider for FailingTravelTimeProvider {
    fn get_travel_time_matrix(
        &self,
        points: &[Coord<f64>],
        _mode: TravelMode,
    ) -> Result<TravelTimeMatrix, TravelTimeError> {
        if points.is_empty() {
            return Err(TravelTimeError::EmptyInput);
        }
        Err(TravelTimeError::NetworkError {
            url: "http://routing.invalid".to_owned(),
            message: "connection refused".to_owned(),
        })
    }
}

/// A place activity at `lat`/`lng`.
pub fn place_at(id: &str, lat: f64, lng: f64) -> PlaceActivity {
    let mut place = PlaceActivity::new(id, id);
    place.coordinates = Some(Coordinates::new(lat, lng));
    place
}

/// A place activity with a schedule, an operating window and, when
/// `travel_minutes` is given, a walking leg from the previous stop.
///
/// Times are stored verbatim so fixtures can exercise malformed input. A
/// window closing at or before it opens is marked overnight.
pub fn scheduled_place(
    id: &str,
    (arrival, departure): (&str, &str),
    window: Option<(&str, &str)>,
    travel_minutes: Option<u32>,
) -> PlaceActivity {
    let mut place = PlaceActivity::new(id, id);
    place.schedule = Some(Schedule {
        arrival_time: arrival.to_owned(),
        departure_time: departure.to_owned(),
    });
    place.operating_window = window.map(|(opens, closes)| {
        let parsed = opens.parse::<ClockTime>().ok().zip(closes.parse::<ClockTime>().ok());
        OperatingWindow {
            opens_at: opens.to_owned(),
            closes_at: closes.to_owned(),
            is_overnight: parsed.is_some_and(|(o, c)| c <= o),
        }
    });
    place.travel_from_previous = travel_minutes.map(|duration_minutes| TravelLeg {
        mode: TravelMode::Walk,
        duration_minutes,
    });
    place
}

/// A day holding `activities` in order.
pub fn day_of<I>(id: &str, activities: I) -> Day
where
    I: IntoIterator,
    I::Item: Into<Activity>,
{
    Day {
        id: id.to_owned(),
        activities: activities.into_iter().map(Into::into).collect(),
        ..Day::default()
    }
}
