//! The itinerary document exchanged with callers.
//!
//! An [`Itinerary`] is an ordered list of [`Day`]s, each holding an ordered
//! list of [`Activity`] values. Activity order is the visiting order unless a
//! route sequencer rewrites it. Only [`Activity::Place`] entries take part in
//! scheduling and conflict detection; notes are carried through untouched.
//!
//! Times inside the document stay as the caller's raw strings. They are parsed
//! leniently at the point of use so one malformed value only disables the
//! checks that need it.

use chrono::NaiveDate;
use geo::Coord;
use serde::{Deserialize, Serialize};

use crate::clock::ClockTime;

/// Ordered sequence of trip days.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Itinerary {
    /// Days in trip order.
    #[serde(default)]
    pub days: Vec<Day>,
}

impl Itinerary {
    /// Look up a day by identifier.
    pub fn day(&self, id: &str) -> Option<&Day> {
        self.days.iter().find(|day| day.id == id)
    }

    /// Look up a day by identifier for modification.
    pub fn day_mut(&mut self, id: &str) -> Option<&mut Day> {
        self.days.iter_mut().find(|day| day.id == id)
    }
}

/// One day of the trip.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Day {
    /// Stable identifier used by entry points and conflicts.
    pub id: String,
    /// Human-readable label such as "Day 2 - Kyoto".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_label: Option<String>,
    /// Calendar date, when known. Used to pick the weekday's opening hours.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    /// City the day is spent in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city_id: Option<String>,
    /// Activities in visiting order.
    #[serde(default)]
    pub activities: Vec<Activity>,
}

impl Day {
    /// Iterate over the place activities of the day in order.
    pub fn places(&self) -> impl Iterator<Item = &PlaceActivity> {
        self.activities.iter().filter_map(Activity::as_place)
    }
}

/// A single itinerary entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Activity {
    /// A visitable stop.
    Place(PlaceActivity),
    /// Free text kept in the day's flow.
    Note(NoteActivity),
}

impl Activity {
    /// Identifier of the activity regardless of kind.
    pub fn id(&self) -> &str {
        match self {
            Self::Place(place) => &place.id,
            Self::Note(note) => &note.id,
        }
    }

    /// Borrow the place payload, if this is a place.
    pub const fn as_place(&self) -> Option<&PlaceActivity> {
        match self {
            Self::Place(place) => Some(place),
            Self::Note(_) => None,
        }
    }

    /// Mutably borrow the place payload, if this is a place.
    pub const fn as_place_mut(&mut self) -> Option<&mut PlaceActivity> {
        match self {
            Self::Place(place) => Some(place),
            Self::Note(_) => None,
        }
    }
}

impl From<PlaceActivity> for Activity {
    fn from(place: PlaceActivity) -> Self {
        Self::Place(place)
    }
}

impl From<NoteActivity> for Activity {
    fn from(note: NoteActivity) -> Self {
        Self::Note(note)
    }
}

/// A visitable stop.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceActivity {
    /// Stable identifier.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Coarse time bucket chosen by the user.
    #[serde(default)]
    pub time_of_day: TimeOfDay,
    /// Reference into the location catalog.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_id: Option<String>,
    /// Inline coordinates; preferred over the catalog entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    /// Explicit visit length in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_min: Option<u32>,
    /// Neighbourhood label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neighborhood: Option<String>,
    /// Free-form tags such as `museum` or `fine_dining`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// User notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Timestamped visit window.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Schedule>,
    /// Opening window for the visit day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operating_window: Option<OperatingWindow>,
    /// Leg from the previous stop.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub travel_from_previous: Option<TravelLeg>,
    /// Meal slot this stop fills.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meal_type: Option<MealType>,
    /// Availability reported by an upstream check.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability_status: Option<AvailabilityStatus>,
}

impl PlaceActivity {
    /// Construct a place with only an identifier and title.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    /// Case-insensitive tag lookup.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    /// Whether any of `tags` is present.
    pub fn has_any_tag(&self, tags: &[&str]) -> bool {
        tags.iter().any(|tag| self.has_tag(tag))
    }
}

/// Free-text itinerary entry.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteActivity {
    /// Stable identifier.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Coarse time bucket.
    #[serde(default)]
    pub time_of_day: TimeOfDay,
    /// Note body.
    #[serde(default)]
    pub notes: String,
}

/// Coarse time-of-day bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    /// Before noon.
    Morning,
    /// Noon to early evening.
    Afternoon,
    /// Early evening.
    Evening,
    /// Late night.
    Night,
    /// No preference.
    #[default]
    Flexible,
}

/// Arrival and departure of a visit, as `HH:MM` strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    /// Arrival time.
    pub arrival_time: String,
    /// Departure time.
    pub departure_time: String,
}

impl Schedule {
    /// Build a schedule from parsed times.
    pub fn new(arrival: ClockTime, departure: ClockTime) -> Self {
        Self {
            arrival_time: arrival.to_string(),
            departure_time: departure.to_string(),
        }
    }

    /// Parse the window, returning `None` if either end is malformed.
    ///
    /// A departure earlier than the arrival is taken to run past midnight.
    pub fn window(&self) -> Option<(ClockTime, ClockTime)> {
        let arrival = ClockTime::parse_lenient(&self.arrival_time, "schedule.arrivalTime")?;
        let departure = ClockTime::parse_lenient(&self.departure_time, "schedule.departureTime")?;
        if departure < arrival {
            Some((arrival, departure.next_day()))
        } else {
            Some((arrival, departure))
        }
    }
}

/// Opening window of a location on the visit day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatingWindow {
    /// Opening time.
    pub opens_at: String,
    /// Closing time; belongs to the next day when overnight.
    pub closes_at: String,
    /// Whether the window crosses midnight.
    #[serde(default)]
    pub is_overnight: bool,
}

impl OperatingWindow {
    /// Build a window from parsed times.
    pub fn new(opens_at: ClockTime, closes_at: ClockTime, is_overnight: bool) -> Self {
        Self {
            opens_at: opens_at.to_string(),
            closes_at: closes_at.to_string(),
            is_overnight,
        }
    }

    /// Parse opening and closing, returning `None` if either is malformed.
    pub fn bounds(&self) -> Option<(ClockTime, ClockTime)> {
        let opens = ClockTime::parse_lenient(&self.opens_at, "operatingWindow.opensAt")?;
        let closes = ClockTime::parse_lenient(&self.closes_at, "operatingWindow.closesAt")?;
        Some((opens, closes))
    }
}

/// A travel leg between consecutive stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelLeg {
    /// Transport mode.
    pub mode: TravelMode,
    /// Estimated door-to-door minutes.
    pub duration_minutes: u32,
}

/// Transport mode for a travel leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    /// On foot.
    #[default]
    Walk,
    /// Bicycle.
    Bike,
    /// Public transport.
    Transit,
    /// Private car.
    Drive,
    /// Taxi or ride hailing.
    Taxi,
}

impl TravelMode {
    /// Typical door-to-door speed in km/h used for straight-line estimates.
    pub const fn typical_speed_kmh(self) -> f64 {
        match self {
            Self::Walk => 4.5,
            Self::Bike => 14.0,
            Self::Transit => 18.0,
            Self::Drive | Self::Taxi => 24.0,
        }
    }
}

/// Meal slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    /// Morning meal.
    Breakfast,
    /// Midday meal.
    Lunch,
    /// Evening meal.
    Dinner,
    /// Light bite at any time.
    Snack,
}

/// Availability of a stop as reported by the availability batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityStatus {
    /// Open at the checked instant.
    Open,
    /// Closed at the checked instant.
    Closed,
    /// No usable data.
    Unknown,
    /// A booking is needed.
    RequiresReservation,
    /// Open but crowded.
    Busy,
}

/// WGS84 coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

impl Coordinates {
    /// Construct coordinates from latitude and longitude.
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Whether both values are finite and inside the WGS84 ranges.
    pub fn is_valid(self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    /// Convert to a `geo` coordinate when valid.
    pub fn to_coord(self) -> Option<Coord<f64>> {
        self.is_valid().then(|| self.into())
    }
}

impl From<Coordinates> for Coord<f64> {
    fn from(value: Coordinates) -> Self {
        Self {
            x: value.lng,
            y: value.lat,
        }
    }
}
