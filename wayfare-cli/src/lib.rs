//! Command-line interface for the Wayfare itinerary engine.
//!
//! Each subcommand reads JSON documents from disk and writes pretty-printed
//! JSON to standard output. Inputs can come from CLI flags, configuration
//! files, or `WAYFARE_CMDS_<COMMAND>_<FIELD>` environment variables.
#![forbid(unsafe_code)]

use std::io::Write;

use clap::{Parser, Subcommand};

mod availability;
mod conflicts;
mod error;
mod inputs;
mod locations;
mod planning;
mod route;

pub use error::CliError;

use availability::{AvailabilityArgs, run_availability_with};
use conflicts::{ConflictsArgs, run_conflicts_with};
use locations::{LocationsArgs, run_locations_with};
use planning::{PlanArgs, ScheduleArgs, run_plan_with, run_schedule_with};
use route::{RouteArgs, run_route_with};

const ARG_ITINERARY: &str = "itinerary";
const ARG_LOCATIONS: &str = "locations";
const ARG_ENTRY_POINTS: &str = "entry-points";
const ARG_OPTIONS: &str = "options";
const ARG_OSRM_BASE_URL: &str = "osrm-base-url";
const ARG_OSRM_PROFILE: &str = "osrm-profile";
const ARG_DAY: &str = "day";
const ARG_START: &str = "start";
const ARG_AT: &str = "at";
const ARG_FROM: &str = "from";
const ARG_TO: &str = "to";
const ARG_MEAL: &str = "meal";

const ENV_SCHEDULE_ITINERARY: &str = "WAYFARE_CMDS_SCHEDULE_ITINERARY";
const ENV_PLAN_ITINERARY: &str = "WAYFARE_CMDS_PLAN_ITINERARY";
const ENV_ROUTE_ITINERARY: &str = "WAYFARE_CMDS_ROUTE_ITINERARY";
const ENV_ROUTE_DAY: &str = "WAYFARE_CMDS_ROUTE_DAY";
const ENV_CONFLICTS_ITINERARY: &str = "WAYFARE_CMDS_CONFLICTS_ITINERARY";
const ENV_AVAILABILITY_ITINERARY: &str = "WAYFARE_CMDS_AVAILABILITY_ITINERARY";
const ENV_LOCATIONS_LOCATIONS: &str = "WAYFARE_CMDS_LOCATIONS_LOCATIONS";

/// Run the Wayfare CLI with the current process arguments and environment.
///
/// # Errors
/// Returns a [`CliError`] describing the first failure; argument errors carry
/// the Clap error so callers can print usage.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let mut stdout = std::io::stdout().lock();
    run_command(cli.command, &mut stdout)
}

fn run_command(command: Command, writer: &mut dyn Write) -> Result<(), CliError> {
    match command {
        Command::Schedule(args) => run_schedule_with(args, writer),
        Command::Plan(args) => run_plan_with(args, writer),
        Command::Route(args) => run_route_with(args, writer),
        Command::Conflicts(args) => run_conflicts_with(args, writer),
        Command::Availability(args) => run_availability_with(args, writer),
        Command::Locations(args) => run_locations_with(args, writer),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "wayfare",
    about = "Sequence, schedule and check travel itineraries",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Timestamp every visit in an itinerary.
    Schedule(ScheduleArgs),
    /// Reorder, timestamp and check an itinerary in one pass.
    Plan(PlanArgs),
    /// Reorder the stops of one day to cut travel.
    Route(RouteArgs),
    /// Report scheduling conflicts in a timestamped itinerary.
    Conflicts(ConflictsArgs),
    /// Report whether each stop is open at a given instant.
    Availability(AvailabilityArgs),
    /// List catalog locations worth offering for a trip.
    Locations(LocationsArgs),
}

#[cfg(test)]
mod tests;
