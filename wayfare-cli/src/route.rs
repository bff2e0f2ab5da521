//! `route` command: reorder one day.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use wayfare_core::Coordinates;
use wayfare_data::load_itinerary;
use wayfare_planner::optimize_day;
use wayfare_router::{NearestNeighbourSequencer, SequencerConfig};

use crate::inputs::{load_catalog, parse_coordinates, require_existing, require_if_set, write_json};
use crate::{
    ARG_DAY, ARG_ITINERARY, ARG_LOCATIONS, ARG_START, CliError, ENV_ROUTE_DAY,
    ENV_ROUTE_ITINERARY,
};

/// CLI arguments for the `route` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "route",
    long_about = "Reorder the place activities of one day with a nearest \
                 neighbour heuristic, refined by 2-opt on longer days. Notes \
                 keep their positions and stops without coordinates move to \
                 the end.",
    about = "Reorder the stops of one day"
)]
#[ortho_config(prefix = "WAYFARE")]
pub(crate) struct RouteArgs {
    /// Path to the itinerary JSON document.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) itinerary: Option<Utf8PathBuf>,
    /// Identifier of the day to reorder.
    #[arg(long = ARG_DAY, value_name = "id")]
    #[serde(default)]
    pub(crate) day: Option<String>,
    /// Starting point as "lat,lng"; it never moves.
    #[arg(long = ARG_START, value_name = "lat,lng")]
    #[serde(default)]
    pub(crate) start: Option<String>,
    /// Path to a JSON location catalog.
    #[arg(long = ARG_LOCATIONS, value_name = "path")]
    #[serde(default)]
    pub(crate) locations: Option<Utf8PathBuf>,
    /// Stop count from which 2-opt refinement runs.
    #[arg(long, value_name = "stops")]
    #[serde(default)]
    pub(crate) two_opt_threshold: Option<usize>,
}

impl RouteArgs {
    pub(crate) fn into_config(self) -> Result<RouteConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        RouteConfig::try_from(merged)
    }
}

/// Resolved `route` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RouteConfig {
    pub(crate) itinerary: Utf8PathBuf,
    pub(crate) day: String,
    pub(crate) start: Option<Coordinates>,
    pub(crate) locations: Option<Utf8PathBuf>,
    pub(crate) sequencer: SequencerConfig,
}

impl TryFrom<RouteArgs> for RouteConfig {
    type Error = CliError;

    fn try_from(args: RouteArgs) -> Result<Self, Self::Error> {
        let itinerary = args.itinerary.ok_or(CliError::MissingArgument {
            field: ARG_ITINERARY,
            env: ENV_ROUTE_ITINERARY,
        })?;
        let day = args.day.ok_or(CliError::MissingArgument {
            field: ARG_DAY,
            env: ENV_ROUTE_DAY,
        })?;
        let start = args.start.as_deref().map(parse_coordinates).transpose()?;
        let mut sequencer = SequencerConfig::default();
        if let Some(threshold) = args.two_opt_threshold {
            sequencer.two_opt_threshold = threshold;
        }
        Ok(Self {
            itinerary,
            day,
            start,
            locations: args.locations,
            sequencer,
        })
    }
}

pub(crate) fn run_route_with(args: RouteArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    require_existing(&config.itinerary, ARG_ITINERARY)?;
    require_if_set(config.locations.as_deref(), ARG_LOCATIONS)?;
    let catalog = load_catalog(config.locations.as_deref())?;
    let itinerary = load_itinerary(&config.itinerary)?;
    let sequencer = NearestNeighbourSequencer::with_config(config.sequencer);
    let optimized = optimize_day(&itinerary, &config.day, config.start, &catalog, &sequencer)?;
    write_json(writer, &optimized)
}
