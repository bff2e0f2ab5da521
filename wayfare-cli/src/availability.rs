//! `availability` command.

use std::io::Write;

use camino::Utf8PathBuf;
use chrono::NaiveDateTime;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use wayfare_core::{Activity, Itinerary};
use wayfare_data::load_itinerary;
use wayfare_planner::{AvailabilityResult, check_availability};

use crate::inputs::{load_catalog, parse_instant, require_existing, require_if_set, write_json};
use crate::{ARG_AT, ARG_DAY, ARG_ITINERARY, ARG_LOCATIONS, CliError, ENV_AVAILABILITY_ITINERARY};

/// CLI arguments for the `availability` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "availability",
    long_about = "Report for each place activity whether it is open, closed, \
                 busy or needs a reservation at one instant. Opening hours \
                 come from the location catalog, or from the activity's own \
                 operating window.",
    about = "Report whether each stop is open"
)]
#[ortho_config(prefix = "WAYFARE")]
pub(crate) struct AvailabilityArgs {
    /// Path to the itinerary JSON document.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) itinerary: Option<Utf8PathBuf>,
    /// Path to a JSON location catalog.
    #[arg(long = ARG_LOCATIONS, value_name = "path")]
    #[serde(default)]
    pub(crate) locations: Option<Utf8PathBuf>,
    /// Only check this day's activities.
    #[arg(long = ARG_DAY, value_name = "id")]
    #[serde(default)]
    pub(crate) day: Option<String>,
    /// Local date-time to check (YYYY-MM-DDTHH:MM:SS); defaults to now.
    #[arg(long = ARG_AT, value_name = "datetime")]
    #[serde(default)]
    pub(crate) at: Option<String>,
}

/// Resolved `availability` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AvailabilityConfig {
    pub(crate) itinerary: Utf8PathBuf,
    pub(crate) locations: Option<Utf8PathBuf>,
    pub(crate) day: Option<String>,
    pub(crate) at: NaiveDateTime,
}

impl TryFrom<AvailabilityArgs> for AvailabilityConfig {
    type Error = CliError;

    fn try_from(args: AvailabilityArgs) -> Result<Self, Self::Error> {
        let itinerary = args.itinerary.ok_or(CliError::MissingArgument {
            field: ARG_ITINERARY,
            env: ENV_AVAILABILITY_ITINERARY,
        })?;
        Ok(Self {
            itinerary,
            locations: args.locations,
            day: args.day,
            at: parse_instant(args.at.as_deref())?,
        })
    }
}

/// `availability` output: one result per place activity, in input order.
#[derive(Debug, Serialize)]
struct AvailabilityResponse {
    results: Vec<AvailabilityResult>,
}

/// Activities of `day`, or of every day when unset. An unknown day yields none.
fn selected_activities(itinerary: Itinerary, day: Option<&str>) -> Vec<Activity> {
    itinerary
        .days
        .into_iter()
        .filter(|d| day.is_none_or(|id| d.id == id))
        .flat_map(|d| d.activities)
        .collect()
}

pub(crate) fn run_availability_with(
    args: AvailabilityArgs,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let config = AvailabilityConfig::try_from(merged)?;
    require_existing(&config.itinerary, ARG_ITINERARY)?;
    require_if_set(config.locations.as_deref(), ARG_LOCATIONS)?;
    let catalog = load_catalog(config.locations.as_deref())?;
    let activities = selected_activities(load_itinerary(&config.itinerary)?, config.day.as_deref());
    let results = check_availability(&activities, &catalog, config.at);
    write_json(writer, &AvailabilityResponse { results })
}
