//! `locations` command: seasonal candidate filtering.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use wayfare_core::filter_by_meal_type;
use wayfare_data::load_locations;
use wayfare_planner::Planner;

use crate::inputs::{parse_date, parse_meal, require_existing, write_json};
use crate::{ARG_FROM, ARG_LOCATIONS, ARG_MEAL, ARG_TO, CliError, ENV_LOCATIONS_LOCATIONS};

/// CLI arguments for the `locations` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "locations",
    long_about = "List the catalog locations that suit a trip. Seasonal \
                 locations are only listed when both trip dates are given \
                 and one of their rules covers the trip. With --meal only \
                 dining locations suited to that meal are listed.",
    about = "List catalog locations for a trip"
)]
#[ortho_config(prefix = "WAYFARE")]
pub(crate) struct LocationsArgs {
    /// Path to a JSON location catalog.
    #[arg(long = ARG_LOCATIONS, value_name = "path")]
    #[serde(default)]
    pub(crate) locations: Option<Utf8PathBuf>,
    /// First day of the trip (YYYY-MM-DD).
    #[arg(long = ARG_FROM, value_name = "date")]
    #[serde(default)]
    pub(crate) from: Option<String>,
    /// Last day of the trip (YYYY-MM-DD).
    #[arg(long = ARG_TO, value_name = "date")]
    #[serde(default)]
    pub(crate) to: Option<String>,
    /// Only list places to eat suited to this meal (breakfast, lunch, dinner, snack).
    #[arg(long = ARG_MEAL, value_name = "meal")]
    #[serde(default)]
    pub(crate) meal: Option<String>,
}

pub(crate) fn run_locations_with(args: LocationsArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let path = merged.locations.ok_or(CliError::MissingArgument {
        field: ARG_LOCATIONS,
        env: ENV_LOCATIONS_LOCATIONS,
    })?;
    let start = parse_date(ARG_FROM, merged.from.as_deref())?;
    let end = parse_date(ARG_TO, merged.to.as_deref())?;
    let meal = merged.meal.as_deref().map(parse_meal).transpose()?;
    require_existing(&path, ARG_LOCATIONS)?;
    let planner = Planner::from_catalog(load_locations(&path)?);
    let relevant = planner.relevant_locations(start, end)?;
    match meal {
        Some(meal) => write_json(writer, &filter_by_meal_type(relevant, meal)),
        None => write_json(writer, &relevant),
    }
}
