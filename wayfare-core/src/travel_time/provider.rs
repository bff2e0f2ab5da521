//! Travel-time provider trait and adjacency-matrix alias for stop pairs.

use std::time::Duration;

use geo::Coord;

use crate::itinerary::TravelMode;

use super::error::TravelTimeError;

/// Adjacency matrix of travel times.
pub type TravelTimeMatrix = Vec<Vec<Duration>>;

/// Fetch pairwise travel times for a set of points.
///
/// Implementers must return a square `n x n` matrix where `n == points.len()`.
/// `matrix[i][j]` is the travel time from `points[i]` to `points[j]`. Points
/// use `x` for longitude and `y` for latitude.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use geo::Coord;
/// use wayfare_core::{TravelMode, TravelTimeError, TravelTimeMatrix, TravelTimeProvider};
///
/// struct FiveMinuteProvider;
///
/// impl TravelTimeProvider for FiveMinuteProvider {
///     fn get_travel_time_matrix(
///         &self,
///         points: &[Coord<f64>],
///         _mode: TravelMode,
///     ) -> Result<TravelTimeMatrix, TravelTimeError> {
///         if points.is_empty() {
///             return Err(TravelTimeError::EmptyInput);
///         }
///         let n = points.len();
///         Ok((0..n)
///             .map(|i| {
///                 (0..n)
///                     .map(|j| if i == j { Duration::ZERO } else { Duration::from_secs(300) })
///                     .collect::<Vec<_>>()
///             })
///             .collect())
///     }
/// }
///
/// let matrix = FiveMinuteProvider.get_travel_time_matrix(&[Coord { x: 0.0, y: 0.0 }], TravelMode::Walk)?;
/// assert_eq!(matrix.len(), 1);
/// # Ok::<(), TravelTimeError>(())
/// ```
pub trait TravelTimeProvider {
    /// Return a matrix of travel times between `points` for `mode`.
    ///
    /// Implementations must return `Err(TravelTimeError::EmptyInput)` when
    /// `points` is empty.
    fn get_travel_time_matrix(
        &self,
        points: &[Coord<f64>],
        mode: TravelMode,
    ) -> Result<TravelTimeMatrix, TravelTimeError>;
}

impl<T: TravelTimeProvider + ?Sized> TravelTimeProvider for &T {
    fn get_travel_time_matrix(
        &self,
        points: &[Coord<f64>],
        mode: TravelMode,
    ) -> Result<TravelTimeMatrix, TravelTimeError> {
        (**self).get_travel_time_matrix(points, mode)
    }
}

impl<T: TravelTimeProvider + ?Sized> TravelTimeProvider for Box<T> {
    fn get_travel_time_matrix(
        &self,
        points: &[Coord<f64>],
        mode: TravelMode,
    ) -> Result<TravelTimeMatrix, TravelTimeError> {
        (**self).get_travel_time_matrix(points, mode)
    }
}

/// Round a matrix cell up to whole minutes.
///
/// Returns `None` for unreachable pairs (`Duration::MAX`) and for values too
/// large to be a plausible same-day leg.
pub fn whole_minutes(duration: Duration) -> Option<u32> {
    if duration == Duration::MAX {
        return None;
    }
    u32::try_from(duration.as_secs().div_ceil(60))
        .ok()
        .filter(|&minutes| minutes < crate::clock::MINUTES_PER_DAY)
}
