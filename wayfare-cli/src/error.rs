//! Error types emitted by the Wayfare CLI.
//!
//! Keep this error type reasonably small, as every command helper returns
//! `Result<_, CliError>`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use thiserror::Error;
use wayfare_data::CatalogError;
use wayfare_data::routing::ProviderBuildError;
use wayfare_planner::PlanError;

/// Errors emitted by the Wayfare CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// A referenced input path does not exist.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        field: &'static str,
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// An input document could not be loaded.
    #[error(transparent)]
    Load(#[from] CatalogError),
    /// A date option was not an ISO `YYYY-MM-DD` date.
    #[error("--{field} value {value:?} is not a date (expected YYYY-MM-DD)")]
    InvalidDate {
        field: &'static str,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    /// The `--at` option was not an ISO local date-time.
    #[error("--at value {value:?} is not a local date-time (expected YYYY-MM-DDTHH:MM:SS)")]
    InvalidTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    /// The `--start` option was not a valid `lat,lng` pair.
    #[error("--start value {value:?} is not a valid lat,lng pair")]
    InvalidCoordinates { value: String },
    /// The `--meal` option did not name a meal slot.
    #[error("--meal value {value:?} is not one of breakfast, lunch, dinner or snack")]
    InvalidMealType { value: String },
    /// Constructing the travel time provider failed.
    #[error("failed to build travel time provider for {base_url:?}: {source}")]
    BuildTravelTimeProvider {
        base_url: String,
        #[source]
        source: ProviderBuildError,
    },
    /// The planner rejected the request.
    #[error("planning failed: {0}")]
    Plan(#[from] PlanError),
    /// Serialising the command output failed.
    #[error("failed to serialise output: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing the command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
