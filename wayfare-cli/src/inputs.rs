//! Input loading and output writing shared by the subcommands.

use std::io::Write;

use camino::Utf8Path;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use wayfare_core::{
    Coordinates, LocationCatalog, MealType, StraightLineTravelTimeProvider, TravelTimeProvider,
};
use wayfare_data::routing::{HttpTravelTimeProvider, HttpTravelTimeProviderConfig};
use wayfare_data::{load_document, load_locations};
use wayfare_planner::{DayEntryPoints, ScheduleOptions};

use crate::CliError;

/// Fail unless `path` names an existing regular file.
pub(crate) fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match wayfare_data::fs::file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// [`require_existing`] for optional inputs.
pub(crate) fn require_if_set(path: Option<&Utf8Path>, field: &'static str) -> Result<(), CliError> {
    path.map_or(Ok(()), |p| require_existing(p, field))
}

/// The catalog at `path`, or an empty catalog when no path is configured.
pub(crate) fn load_catalog(path: Option<&Utf8Path>) -> Result<LocationCatalog, CliError> {
    match path {
        Some(p) => Ok(load_locations(p)?),
        None => Ok(LocationCatalog::new()),
    }
}

pub(crate) fn load_entry_points(path: Option<&Utf8Path>) -> Result<DayEntryPoints, CliError> {
    match path {
        Some(p) => Ok(load_document(p, "day entry points")?),
        None => Ok(DayEntryPoints::new()),
    }
}

pub(crate) fn load_options(path: Option<&Utf8Path>) -> Result<ScheduleOptions, CliError> {
    match path {
        Some(p) => Ok(load_document(p, "schedule options")?),
        None => Ok(ScheduleOptions::default()),
    }
}

/// OSRM when a base URL is configured, straight-line estimates otherwise.
pub(crate) fn build_provider(
    base_url: Option<&str>,
    profile: Option<&str>,
) -> Result<Box<dyn TravelTimeProvider>, CliError> {
    let Some(url) = base_url else {
        return Ok(Box::new(StraightLineTravelTimeProvider::default()));
    };
    let mut config = HttpTravelTimeProviderConfig::new(url);
    if let Some(name) = profile {
        config = config.with_profile(name);
    }
    let provider = HttpTravelTimeProvider::with_config(config).map_err(|source| {
        CliError::BuildTravelTimeProvider {
            base_url: url.to_owned(),
            source,
        }
    })?;
    log::debug!("using OSRM travel times from {url}");
    Ok(Box::new(provider))
}

pub(crate) fn parse_date(field: &'static str, value: Option<&str>) -> Result<Option<NaiveDate>, CliError> {
    value
        .map(|raw| {
            raw.parse().map_err(|source| CliError::InvalidDate {
                field,
                value: raw.to_owned(),
                source,
            })
        })
        .transpose()
}

/// Parse `--at`; the current local time when unset.
pub(crate) fn parse_instant(value: Option<&str>) -> Result<NaiveDateTime, CliError> {
    let Some(raw) = value else {
        return Ok(chrono::Local::now().naive_local());
    };
    raw.parse().map_err(|source| CliError::InvalidTimestamp {
        value: raw.to_owned(),
        source,
    })
}

/// Parse a `lat,lng` pair.
pub(crate) fn parse_coordinates(value: &str) -> Result<Coordinates, CliError> {
    let invalid = || CliError::InvalidCoordinates {
        value: value.to_owned(),
    };
    let (lat, lng) = value.split_once(',').ok_or_else(invalid)?;
    let coordinates = Coordinates::new(
        lat.trim().parse().map_err(|_| invalid())?,
        lng.trim().parse().map_err(|_| invalid())?,
    );
    if coordinates.is_valid() {
        Ok(coordinates)
    } else {
        Err(invalid())
    }
}

/// Parse a meal slot name, ignoring case.
pub(crate) fn parse_meal(value: &str) -> Result<MealType, CliError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "breakfast" => Ok(MealType::Breakfast),
        "lunch" => Ok(MealType::Lunch),
        "dinner" => Ok(MealType::Dinner),
        "snack" => Ok(MealType::Snack),
        _ => Err(CliError::InvalidMealType {
            value: value.to_owned(),
        }),
    }
}

pub(crate) fn write_json<T: Serialize + ?Sized>(writer: &mut dyn Write, value: &T) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerialiseOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}
