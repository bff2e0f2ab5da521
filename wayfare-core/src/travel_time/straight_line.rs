//! Offline travel-time estimates from great-circle distance.

use std::time::Duration;

use geo::Coord;

use crate::itinerary::TravelMode;

use super::error::TravelTimeError;
use super::provider::{TravelTimeMatrix, TravelTimeProvider};

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Default ratio between street distance and straight-line distance.
pub const DEFAULT_DETOUR_FACTOR: f64 = 1.3;

/// Great-circle distance in kilometres between two `lng`/`lat` points.
pub fn haversine_km(from: Coord<f64>, to: Coord<f64>) -> f64 {
    let d_lat = (to.y - from.y).to_radians();
    let d_lng = (to.x - from.x).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + from.y.to_radians().cos() * to.y.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Estimate travel time as haversine distance, stretched by a detour factor,
/// over the mode's typical speed.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use wayfare_core::{StraightLineTravelTimeProvider, TravelMode, TravelTimeProvider};
///
/// let gion = Coord { x: 135.7788, y: 35.0037 };
/// let kiyomizu = Coord { x: 135.7850, y: 34.9949 };
/// let matrix = StraightLineTravelTimeProvider::default()
///     .get_travel_time_matrix(&[gion, kiyomizu], TravelMode::Walk)?;
/// assert!(matrix[0][1] > matrix[0][0]);
/// # Ok::<(), wayfare_core::TravelTimeError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StraightLineTravelTimeProvider {
    detour_factor: f64,
}

impl Default for StraightLineTravelTimeProvider {
    fn default() -> Self {
        Self {
            detour_factor: DEFAULT_DETOUR_FACTOR,
        }
    }
}

impl StraightLineTravelTimeProvider {
    /// Create a provider with a custom detour factor. Values below `1.0` or
    /// non-finite values fall back to [`DEFAULT_DETOUR_FACTOR`].
    pub fn with_detour_factor(detour_factor: f64) -> Self {
        if detour_factor.is_finite() && detour_factor >= 1.0 {
            Self { detour_factor }
        } else {
            log::warn!("ignoring detour factor {detour_factor}; using {DEFAULT_DETOUR_FACTOR}");
            Self::default()
        }
    }

    fn leg(&self, from: Coord<f64>, to: Coord<f64>, mode: TravelMode) -> Duration {
        let hours = haversine_km(from, to) * self.detour_factor / mode.typical_speed_kmh();
        let seconds = hours * 3600.0;
        if seconds.is_finite() && seconds >= 0.0 {
            Duration::from_secs_f64(seconds)
        } else {
            Duration::MAX
        }
    }
}

impl TravelTimeProvider for StraightLineTravelTimeProvider {
    fn get_travel_time_matrix(
        &self,
        points: &[Coord<f64>],
        mode: TravelMode,
    ) -> Result<TravelTimeMatrix, TravelTimeError> {
        if points.is_empty() {
            return Err(TravelTimeError::EmptyInput);
        }
        Ok(points
            .iter()
            .map(|&from| points.iter().map(|&to| self.leg(from, to, mode)).collect())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::travel_time::whole_minutes;
    use rstest::rstest;

    const KYOTO_STATION: Coord<f64> = Coord { x: 135.7585, y: 34.9858 };
    const KINKAKU_JI: Coord<f64> = Coord { x: 135.7292, y: 35.0394 };

    #[test]
    fn haversine_matches_a_known_distance() {
        // Kyoto Station to Kinkaku-ji is roughly 6.5 km as the crow flies.
        let km = haversine_km(KYOTO_STATION, KINKAKU_JI);
        assert!((6.0..7.0).contains(&km), "unexpected distance {km}");
    }

    #[test]
    fn diagonal_is_zero() {
        let matrix = StraightLineTravelTimeProvider::default()
            .get_travel_time_matrix(&[KYOTO_STATION, KINKAKU_JI], TravelMode::Walk)
            .expect("matrix");
        assert_eq!(matrix[0][0], Duration::ZERO);
        assert_eq!(matrix[1][1], Duration::ZERO);
        assert_eq!(matrix[0][1], matrix[1][0]);
    }

    #[rstest]
    #[case(TravelMode::Walk, TravelMode::Bike)]
    #[case(TravelMode::Bike, TravelMode::Drive)]
    fn faster_modes_take_less_time(#[case] slow: TravelMode, #[case] fast: TravelMode) {
        let provider = StraightLineTravelTimeProvider::default();
        let points = [KYOTO_STATION, KINKAKU_JI];
        let slow_leg = provider.get_travel_time_matrix(&points, slow).expect("matrix")[0][1];
        let fast_leg = provider.get_travel_time_matrix(&points, fast).expect("matrix")[0][1];
        assert!(fast_leg < slow_leg);
    }

    #[test]
    fn walking_estimate_is_plausible() {
        let matrix = StraightLineTravelTimeProvider::default()
            .get_travel_time_matrix(&[KYOTO_STATION, KINKAKU_JI], TravelMode::Walk)
            .expect("matrix");
        let minutes = whole_minutes(matrix[0][1]).expect("reachable");
        assert!((100..130).contains(&minutes), "unexpected walk of {minutes} minutes");
    }

    #[rstest]
    #[case(0.5)]
    #[case(f64::NAN)]
    fn rejects_implausible_detour_factors(#[case] factor: f64) {
        assert_eq!(
            StraightLineTravelTimeProvider::with_detour_factor(factor),
            StraightLineTravelTimeProvider::default()
        );
    }

    #[test]
    fn errors_on_empty_input() {
        let err = StraightLineTravelTimeProvider::default()
            .get_travel_time_matrix(&[], TravelMode::Walk)
            .expect_err("empty input");
        assert_eq!(err, TravelTimeError::EmptyInput);
    }
}
