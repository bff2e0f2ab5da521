//! Location records and the in-memory catalog activities refer to.

use std::collections::HashMap;

use geo::Coord;
use serde::{Deserialize, Serialize};

use crate::hours::OperatingHours;
use crate::itinerary::{Coordinates, PlaceActivity};
use crate::seasonal::AvailabilityRule;

/// Crowd level reported by a place-data provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BusyLevel {
    /// Quiet.
    Low,
    /// Usual crowd.
    Moderate,
    /// Expect queues.
    High,
}

/// Provider flags describing which meals a venue serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealOptions {
    /// Serves breakfast.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serves_breakfast: Option<bool>,
    /// Serves lunch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serves_lunch: Option<bool>,
    /// Serves dinner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serves_dinner: Option<bool>,
}

/// A catalogued place.
///
/// # Examples
/// ```
/// use wayfare_core::{Coordinates, Location, LocationCatalog};
///
/// let mut temple = Location::new("kiyomizu", "Kiyomizu-dera");
/// temple.coordinates = Some(Coordinates::new(34.9949, 135.7850));
/// let catalog: LocationCatalog = [temple].into_iter().collect();
/// assert!(catalog.get("kiyomizu").is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// Stable identifier referenced by activities.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Primary provider type, e.g. `restaurant`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_type: Option<String>,
    /// All provider types.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<String>,
    /// Curated category, e.g. `museum` or `restaurant`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    /// Weekly opening hours.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours: Option<OperatingHours>,
    /// Whether the place only operates on certain dates.
    #[serde(default)]
    pub is_seasonal: bool,
    /// Dated rules for seasonal places.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub availability_rules: Vec<AvailabilityRule>,
    /// Meal service flags.
    #[serde(default)]
    pub meal_options: MealOptions,
    /// Current crowd level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub busy_level: Option<BusyLevel>,
    /// Free-form tags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl Location {
    /// Construct a location with only an identifier and name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Locations keyed by identifier.
#[derive(Debug, Clone, Default)]
pub struct LocationCatalog {
    locations: HashMap<String, Location>,
}

impl LocationCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a location, returning the previous entry.
    pub fn insert(&mut self, location: Location) -> Option<Location> {
        self.locations.insert(location.id.clone(), location)
    }

    /// Look up a location by identifier.
    pub fn get(&self, id: &str) -> Option<&Location> {
        self.locations.get(id)
    }

    /// Iterate over all locations in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &Location> {
        self.locations.values()
    }

    /// Number of locations.
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// The catalog entry an activity refers to.
    pub fn location_for(&self, place: &PlaceActivity) -> Option<&Location> {
        place.location_id.as_deref().and_then(|id| self.get(id))
    }

    /// Resolve an activity's position; inline coordinates win over the
    /// catalog entry. Invalid coordinates resolve to `None`.
    pub fn coordinates_for(&self, place: &PlaceActivity) -> Option<Coord<f64>> {
        place
            .coordinates
            .or_else(|| self.location_for(place).and_then(|l| l.coordinates))
            .and_then(Coordinates::to_coord)
    }

    /// Weekly hours for an activity's catalog entry.
    pub fn hours_for(&self, place: &PlaceActivity) -> Option<&OperatingHours> {
        self.location_for(place).and_then(|l| l.hours.as_ref())
    }
}

impl FromIterator<Location> for LocationCatalog {
    fn from_iter<I: IntoIterator<Item = Location>>(iter: I) -> Self {
        Self {
            locations: iter.into_iter().map(|l| (l.id.clone(), l)).collect(),
        }
    }
}

impl Extend<Location> for LocationCatalog {
    fn extend<I: IntoIterator<Item = Location>>(&mut self, iter: I) {
        self.locations
            .extend(iter.into_iter().map(|l| (l.id.clone(), l)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn catalog() -> LocationCatalog {
        let mut market = Location::new("nishiki", "Nishiki Market");
        market.coordinates = Some(Coordinates::new(35.005, 135.765));
        let mut broken = Location::new("broken", "Nowhere");
        broken.coordinates = Some(Coordinates::new(120.0, 0.0));
        [market, broken].into_iter().collect()
    }

    #[rstest]
    fn inline_coordinates_win(catalog: LocationCatalog) {
        let mut place = PlaceActivity::new("a", "Market stroll");
        place.location_id = Some("nishiki".into());
        place.coordinates = Some(Coordinates::new(35.0, 135.0));
        assert_eq!(
            catalog.coordinates_for(&place),
            Some(Coord { x: 135.0, y: 35.0 })
        );
    }

    #[rstest]
    fn catalog_coordinates_fill_in(catalog: LocationCatalog) {
        let mut place = PlaceActivity::new("a", "Market stroll");
        place.location_id = Some("nishiki".into());
        assert_eq!(
            catalog.coordinates_for(&place),
            Some(Coord { x: 135.765, y: 35.005 })
        );
    }

    #[rstest]
    #[case(Some("broken"))]
    #[case(Some("missing"))]
    #[case(None)]
    fn unresolvable_places_have_no_coordinates(catalog: LocationCatalog, #[case] id: Option<&str>) {
        let mut place = PlaceActivity::new("a", "Somewhere");
        place.location_id = id.map(str::to_owned);
        assert_eq!(catalog.coordinates_for(&place), None);
    }

    #[test]
    fn location_deserialises_from_camel_case() {
        let json = r#"{
            "id": "ippudo",
            "name": "Ippudo Nishiki",
            "sourceType": "restaurant",
            "hours": {"periods": [{"day": 1, "open": "11:00", "close": "23:00"}]},
            "mealOptions": {"servesDinner": true},
            "busyLevel": "high"
        }"#;
        let location: Location = serde_json::from_str(json).expect("valid location");
        assert_eq!(location.source_type.as_deref(), Some("restaurant"));
        assert_eq!(location.meal_options.serves_dinner, Some(true));
        assert_eq!(location.busy_level, Some(BusyLevel::High));
        assert!(!location.is_seasonal);
        assert_eq!(location.hours.map(|h| h.periods.len()), Some(1));
    }
}
