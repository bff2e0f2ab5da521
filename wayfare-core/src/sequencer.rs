//! Ordering a day's stops to reduce travel.

use geo::Coord;
use serde::{Deserialize, Serialize};

use crate::itinerary::Day;
use crate::location::LocationCatalog;

/// A stop handed to a [`RouteSequencer`].
#[derive(Debug, Clone, PartialEq)]
pub struct RouteStop {
    /// Activity identifier.
    pub id: String,
    /// Resolved position, if any.
    pub location: Option<Coord<f64>>,
}

impl RouteStop {
    /// Construct a stop.
    pub fn new(id: impl Into<String>, location: Option<Coord<f64>>) -> Self {
        Self {
            id: id.into(),
            location,
        }
    }

    /// The place activities of `day` as stops, resolving coordinates through
    /// `catalog`. Notes are not stops.
    pub fn from_day(day: &Day, catalog: &LocationCatalog) -> Vec<Self> {
        day.places()
            .map(|place| Self::new(place.id.clone(), catalog.coordinates_for(place)))
            .collect()
    }
}

/// Result of sequencing a day's stops.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteOrder {
    /// Stop identifiers in visiting order.
    pub order: Vec<String>,
    /// Whether `order` differs from the input order.
    pub order_changed: bool,
    /// Stops that took part in sequencing.
    pub optimized_count: usize,
    /// Stops without coordinates, appended in input order.
    pub skipped_count: usize,
}

/// Reorder stops to reduce travel overhead.
///
/// Implementations must return every input identifier exactly once, keep
/// unresolvable stops in their original relative order at the end, and be
/// deterministic. Sequencers must be `Send + Sync` so planners can be shared
/// across threads.
pub trait RouteSequencer: Send + Sync {
    /// Order `stops`, optionally anchored on a `start` point such as a hotel.
    fn sequence(&self, stops: &[RouteStop], start: Option<Coord<f64>>) -> RouteOrder;
}
