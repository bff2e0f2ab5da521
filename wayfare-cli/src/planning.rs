//! `schedule` and `plan` commands.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use wayfare_core::{Itinerary, TravelTimeProvider};
use wayfare_data::load_itinerary;
use wayfare_planner::{DayEntryPoints, Planner};
use wayfare_router::NearestNeighbourSequencer;

use crate::inputs::{
    build_provider, load_catalog, load_entry_points, load_options, require_existing,
    require_if_set, write_json,
};
use crate::{
    ARG_ENTRY_POINTS, ARG_ITINERARY, ARG_LOCATIONS, ARG_OPTIONS, ARG_OSRM_BASE_URL,
    ARG_OSRM_PROFILE, CliError, ENV_PLAN_ITINERARY, ENV_SCHEDULE_ITINERARY,
};

/// CLI arguments for the `schedule` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "schedule",
    long_about = "Compute arrival and departure times for every place in an \
                 itinerary, keeping the given order. Travel legs come from \
                 the itinerary, an OSRM service when configured, or \
                 straight-line estimates.",
    about = "Timestamp every visit in an itinerary"
)]
#[ortho_config(prefix = "WAYFARE")]
pub(crate) struct ScheduleArgs {
    /// Path to the itinerary JSON document.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) itinerary: Option<Utf8PathBuf>,
    /// Path to a JSON location catalog.
    #[arg(long = ARG_LOCATIONS, value_name = "path")]
    #[serde(default)]
    pub(crate) locations: Option<Utf8PathBuf>,
    /// Path to a JSON object of per-day entry points.
    #[arg(long = ARG_ENTRY_POINTS, value_name = "path")]
    #[serde(default)]
    pub(crate) entry_points: Option<Utf8PathBuf>,
    /// Path to JSON schedule options.
    #[arg(long = ARG_OPTIONS, value_name = "path")]
    #[serde(default)]
    pub(crate) options: Option<Utf8PathBuf>,
    /// Base URL for an OSRM server (e.g. "http://localhost:5000").
    #[arg(long = ARG_OSRM_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) osrm_base_url: Option<String>,
    /// OSRM profile to use for every travel mode.
    #[arg(long = ARG_OSRM_PROFILE, value_name = "name")]
    #[serde(default)]
    pub(crate) osrm_profile: Option<String>,
}

impl ScheduleArgs {
    pub(crate) fn into_config(self) -> Result<PlanningConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        PlanningConfig::try_from(merged)
    }
}

impl TryFrom<ScheduleArgs> for PlanningConfig {
    type Error = CliError;

    fn try_from(args: ScheduleArgs) -> Result<Self, Self::Error> {
        let itinerary = args.itinerary.ok_or(CliError::MissingArgument {
            field: ARG_ITINERARY,
            env: ENV_SCHEDULE_ITINERARY,
        })?;
        Ok(Self {
            itinerary,
            locations: args.locations,
            entry_points: args.entry_points,
            options: args.options,
            osrm_base_url: args.osrm_base_url,
            osrm_profile: args.osrm_profile,
            keep_order: true,
        })
    }
}

/// CLI arguments for the `plan` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "plan",
    long_about = "Reorder each day to cut travel, timestamp every visit and \
                 report conflicts. Prints the planned itinerary together \
                 with its conflict report.",
    about = "Reorder, timestamp and check an itinerary"
)]
#[ortho_config(prefix = "WAYFARE")]
pub(crate) struct PlanArgs {
    /// Path to the itinerary JSON document.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) itinerary: Option<Utf8PathBuf>,
    /// Path to a JSON location catalog.
    #[arg(long = ARG_LOCATIONS, value_name = "path")]
    #[serde(default)]
    pub(crate) locations: Option<Utf8PathBuf>,
    /// Path to a JSON object of per-day entry points.
    #[arg(long = ARG_ENTRY_POINTS, value_name = "path")]
    #[serde(default)]
    pub(crate) entry_points: Option<Utf8PathBuf>,
    /// Path to JSON schedule options.
    #[arg(long = ARG_OPTIONS, value_name = "path")]
    #[serde(default)]
    pub(crate) options: Option<Utf8PathBuf>,
    /// Base URL for an OSRM server (e.g. "http://localhost:5000").
    #[arg(long = ARG_OSRM_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) osrm_base_url: Option<String>,
    /// OSRM profile to use for every travel mode.
    #[arg(long = ARG_OSRM_PROFILE, value_name = "name")]
    #[serde(default)]
    pub(crate) osrm_profile: Option<String>,
    /// Keep each day's order instead of resequencing it.
    #[arg(long)]
    #[serde(default)]
    pub(crate) keep_order: bool,
}

impl PlanArgs {
    pub(crate) fn into_config(self) -> Result<PlanningConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        PlanningConfig::try_from(merged)
    }
}

impl TryFrom<PlanArgs> for PlanningConfig {
    type Error = CliError;

    fn try_from(args: PlanArgs) -> Result<Self, Self::Error> {
        let itinerary = args.itinerary.ok_or(CliError::MissingArgument {
            field: ARG_ITINERARY,
            env: ENV_PLAN_ITINERARY,
        })?;
        Ok(Self {
            itinerary,
            locations: args.locations,
            entry_points: args.entry_points,
            options: args.options,
            osrm_base_url: args.osrm_base_url,
            osrm_profile: args.osrm_profile,
            keep_order: args.keep_order,
        })
    }
}

/// Resolved configuration shared by `schedule` and `plan`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PlanningConfig {
    pub(crate) itinerary: Utf8PathBuf,
    pub(crate) locations: Option<Utf8PathBuf>,
    pub(crate) entry_points: Option<Utf8PathBuf>,
    pub(crate) options: Option<Utf8PathBuf>,
    pub(crate) osrm_base_url: Option<String>,
    pub(crate) osrm_profile: Option<String>,
    pub(crate) keep_order: bool,
}

impl PlanningConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.itinerary, ARG_ITINERARY)?;
        require_if_set(self.locations.as_deref(), ARG_LOCATIONS)?;
        require_if_set(self.entry_points.as_deref(), ARG_ENTRY_POINTS)?;
        require_if_set(self.options.as_deref(), ARG_OPTIONS)?;
        Ok(())
    }
}

/// `schedule` output: the timestamped itinerary under `data`.
#[derive(Debug, Serialize)]
struct ScheduleResponse {
    data: Itinerary,
}

type CliPlanner = Planner<NearestNeighbourSequencer, Box<dyn TravelTimeProvider>>;

struct PlanningInputs {
    planner: CliPlanner,
    itinerary: Itinerary,
    entry_points: DayEntryPoints,
}

fn prepare(config: &PlanningConfig) -> Result<PlanningInputs, CliError> {
    config.validate_sources()?;
    let catalog = load_catalog(config.locations.as_deref())?;
    let options = load_options(config.options.as_deref())?;
    let provider = build_provider(config.osrm_base_url.as_deref(), config.osrm_profile.as_deref())?;
    let planner = Planner::new(catalog, NearestNeighbourSequencer::default(), provider)
        .with_options(options)
        .with_route_optimization(!config.keep_order);
    Ok(PlanningInputs {
        planner,
        itinerary: load_itinerary(&config.itinerary)?,
        entry_points: load_entry_points(config.entry_points.as_deref())?,
    })
}

pub(crate) fn run_schedule_with(args: ScheduleArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let inputs = prepare(&args.into_config()?)?;
    let scheduled = inputs
        .planner
        .schedule(&inputs.itinerary, &inputs.entry_points)?;
    write_json(writer, &ScheduleResponse { data: scheduled })
}

pub(crate) fn run_plan_with(args: PlanArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let inputs = prepare(&args.into_config()?)?;
    let outcome = inputs.planner.plan(&inputs.itinerary, &inputs.entry_points)?;
    write_json(writer, &outcome)
}

#[cfg(test)]
pub(crate) fn schedule_config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<PlanningConfig, CliError> {
    let merged = ScheduleArgs::merge_from_layers(layers).map_err(CliError::from)?;
    PlanningConfig::try_from(merged)
}
