//! Load location catalogs and itinerary documents from JSON files.
//!
//! A catalog file holds either a bare array of locations or an object with a
//! `locations` array:
//!
//! ```json
//! { "locations": [{ "id": "kiyomizu", "name": "Kiyomizu-dera" }] }
//! ```
//!
//! Itineraries use the same camelCase document shape the planner emits, so a
//! planned itinerary can be fed back in unchanged.

use std::io::BufReader;

use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use wayfare_core::{Itinerary, Location, LocationCatalog};

use crate::fs::open_utf8_file;

/// Errors raised while loading JSON documents.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Opening the file failed.
    #[error("failed to open {what} at {path}")]
    Open {
        /// Kind of document, e.g. `location catalog`.
        what: &'static str,
        /// Requested path.
        path: Utf8PathBuf,
        /// Source error from std I/O.
        #[source]
        source: std::io::Error,
    },
    /// The file was not valid JSON for the expected document.
    #[error("failed to parse {what} JSON at {path}")]
    Parse {
        /// Kind of document.
        what: &'static str,
        /// Requested path.
        path: Utf8PathBuf,
        /// Source error from `serde_json`.
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogDocument {
    List(Vec<Location>),
    Wrapped { locations: Vec<Location> },
}

impl CatalogDocument {
    fn into_locations(self) -> Vec<Location> {
        match self {
            Self::List(locations) | Self::Wrapped { locations } => locations,
        }
    }
}

/// Decode a JSON document of type `T` from `path`.
///
/// `what` names the document in error messages.
///
/// # Errors
/// Returns [`CatalogError::Open`] when the file cannot be opened and
/// [`CatalogError::Parse`] when its contents do not decode as `T`.
pub fn load_document<T: DeserializeOwned>(
    path: &Utf8Path,
    what: &'static str,
) -> Result<T, CatalogError> {
    let file = open_utf8_file(path).map_err(|source| CatalogError::Open {
        what,
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| CatalogError::Parse {
        what,
        path: path.to_path_buf(),
        source,
    })
}

/// Load a location catalog.
///
/// When an identifier appears more than once the later entry replaces the
/// earlier one and a warning is logged.
///
/// # Errors
/// See [`load_document`].
pub fn load_locations(path: &Utf8Path) -> Result<LocationCatalog, CatalogError> {
    let document: CatalogDocument = load_document(path, "location catalog")?;
    let mut catalog = LocationCatalog::new();
    for location in document.into_locations() {
        if let Some(previous) = catalog.insert(location) {
            log::warn!("duplicate location id {} in {path}; keeping the later entry", previous.id);
        }
    }
    log::debug!("loaded {} locations from {path}", catalog.len());
    Ok(catalog)
}

/// Load an itinerary document.
///
/// # Errors
/// See [`load_document`].
pub fn load_itinerary(path: &Utf8Path) -> Result<Itinerary, CatalogError> {
    load_document(path, "itinerary")
}
