//! `conflicts` command.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use wayfare_data::load_itinerary;
use wayfare_planner::detect_itinerary_conflicts;

use crate::inputs::{require_existing, write_json};
use crate::{ARG_ITINERARY, CliError, ENV_CONFLICTS_ITINERARY};

/// CLI arguments for the `conflicts` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "conflicts",
    long_about = "Check a timestamped itinerary for visits outside opening \
                 hours, overlaps, tight connections and reservation risks. \
                 The itinerary is read as-is; run `schedule` first to fill \
                 in visit times.",
    about = "Report scheduling conflicts"
)]
#[ortho_config(prefix = "WAYFARE")]
pub(crate) struct ConflictsArgs {
    /// Path to the itinerary JSON document.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) itinerary: Option<Utf8PathBuf>,
}

pub(crate) fn run_conflicts_with(args: ConflictsArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let path = merged.itinerary.ok_or(CliError::MissingArgument {
        field: ARG_ITINERARY,
        env: ENV_CONFLICTS_ITINERARY,
    })?;
    require_existing(&path, ARG_ITINERARY)?;
    let report = detect_itinerary_conflicts(&load_itinerary(&path)?);
    write_json(writer, &report)
}
