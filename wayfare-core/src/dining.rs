//! Meal and dining classification for candidate locations.
//!
//! Each layer is consulted only when the previous one had nothing to say:
//! provider types beat curated categories, which beat name keywords. Meal
//! suitability works the same way with meal flags, opening hours and finally
//! keywords. A location stays in unless some layer rules it out.

use crate::clock::ClockTime;
use crate::hours::OperatingHours;
use crate::itinerary::MealType;
use crate::location::Location;

const DINING_TYPES: &[&str] = &[
    "restaurant",
    "cafe",
    "bar",
    "bakery",
    "meal_takeaway",
    "meal_delivery",
    "food",
    "night_club",
    "food_court",
    "izakaya",
];

const DINING_CATEGORIES: &[&str] = &["restaurant", "cafe", "bar", "food", "dining", "nightlife"];

/// Words that mark a landmark even when the category says "food", e.g. a
/// temple listed under `restaurant` because of its tea house.
const LANDMARK_WORDS: &[&str] = &[
    "temple",
    "shrine",
    "museum",
    "castle",
    "palace",
    "park",
    "garden",
    "tower",
    "cathedral",
    "church",
    "gallery",
    "monument",
    "bridge",
    "station",
];

const DINING_NAME_WORDS: &[&str] = &[
    "restaurant",
    "cafe",
    "café",
    "coffee",
    "ramen",
    "sushi",
    "izakaya",
    "bistro",
    "bakery",
    "diner",
    "grill",
    "pizzeria",
    "eatery",
    "bar",
    "pub",
    "noodle",
    "noodles",
    "tavern",
    "brasserie",
    "trattoria",
    "kitchen",
    "udon",
    "soba",
    "tempura",
    "yakitori",
];

/// Names that point to a morning venue even when they also mention a bar.
const BREAKFAST_WORDS: &[&str] = &[
    "breakfast",
    "brunch",
    "morning",
    "cafe",
    "café",
    "coffee",
    "bakery",
    "kissaten",
    "pancake",
    "pancakes",
    "bagel",
];

const BREAKFAST_EXCLUDED: &[&str] = &["bar", "pub", "izakaya", "dessert", "cocktail", "tavern"];
const LUNCH_EXCLUDED: &[&str] = &["bar", "pub", "cocktail"];
const DINNER_EXCLUDED: &[&str] = &["bakery", "coffee", "dessert", "gelato"];

/// Whether `location` is a place to eat or drink.
///
/// # Examples
/// ```
/// use wayfare_core::{Location, dining::is_dining_location};
///
/// let mut temple = Location::new("t", "Kinkaku-ji Temple");
/// temple.category = Some("restaurant".into());
/// assert!(!is_dining_location(&temple));
///
/// let shop = Location::new("r", "Menya Inoichi Ramen");
/// assert!(is_dining_location(&shop));
/// ```
pub fn is_dining_location(location: &Location) -> bool {
    if let Some(source_type) = &location.source_type {
        return is_listed(source_type, DINING_TYPES);
    }
    if !location.types.is_empty() {
        return location.types.iter().any(|t| is_listed(t, DINING_TYPES));
    }
    if let Some(category) = &location.category {
        return is_listed(category, DINING_CATEGORIES)
            && !mentions_any(&location.name, LANDMARK_WORDS);
    }
    mentions_any(&location.name, DINING_NAME_WORDS)
}

/// Whether a dining location suits `meal`.
pub fn suits_meal(location: &Location, meal: MealType) -> bool {
    let flags = location.meal_options;
    let flag = match meal {
        MealType::Breakfast => flags.serves_breakfast,
        MealType::Lunch => flags.serves_lunch,
        MealType::Dinner => flags.serves_dinner,
        MealType::Snack => None,
    };
    if let Some(serves) = flag {
        return serves;
    }
    if let Some(hours) = location.hours.as_ref().filter(|h| !h.periods.is_empty()) {
        return hours_suit_meal(hours, meal);
    }
    if meal == MealType::Breakfast && mentions_any(&location.name, BREAKFAST_WORDS) {
        return true;
    }
    let excluded = match meal {
        MealType::Breakfast => BREAKFAST_EXCLUDED,
        MealType::Lunch => LUNCH_EXCLUDED,
        MealType::Dinner => DINNER_EXCLUDED,
        MealType::Snack => return true,
    };
    !mentions_any(&location.name, excluded)
}

/// Dining locations that suit `meal`, in input order.
pub fn filter_by_meal_type<'a, I>(locations: I, meal: MealType) -> Vec<&'a Location>
where
    I: IntoIterator<Item = &'a Location>,
{
    locations
        .into_iter()
        .filter(|l| is_dining_location(l) && suits_meal(l, meal))
        .collect()
}

fn hours_suit_meal(hours: &OperatingHours, meal: MealType) -> bool {
    let at = |h, m| ClockTime::from_hm(h, m).unwrap_or(ClockTime::MIDNIGHT);
    let mut periods = hours.periods.iter();
    match meal {
        MealType::Breakfast => periods.any(|p| p.open < at(11, 0)),
        MealType::Lunch => periods.any(|p| p.open < at(14, 0) && p.effective_close() > at(11, 30)),
        MealType::Dinner => periods.any(|p| p.effective_close() >= at(18, 0)),
        MealType::Snack => true,
    }
}

fn is_listed(value: &str, list: &[&str]) -> bool {
    list.iter().any(|item| value.eq_ignore_ascii_case(item))
}

fn mentions_any(text: &str, words: &[&str]) -> bool {
    let lower = text.to_lowercase();
    words.iter().any(|word| contains_word(&lower, word))
}

/// Substring match that only counts whole words, so "bar" does not match
/// "Barcelona" but does match "sake bar".
fn contains_word(haystack: &str, word: &str) -> bool {
    haystack.match_indices(word).any(|(start, matched)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + matched.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}
