//! Day scheduling, conflict detection and the end-to-end planning pipeline.
//!
//! The crate turns a user's day-grouped activities into a timestamped
//! itinerary and a list of scheduling problems:
//!
//! - [`schedule_itinerary`] and [`DayScheduler`] assign arrival and departure
//!   times from visit durations, travel estimates and opening hours.
//! - [`detect_itinerary_conflicts`] re-walks a scheduled itinerary and reports
//!   closures, overlaps, tight transfers and reservation risk.
//! - [`check_availability`] answers "is it open now" for a batch of
//!   activities.
//! - [`optimize_day`] reorders one day's stops with a route sequencer.
//! - [`Planner`] runs sequencing, scheduling and detection in one call.
//!
//! All operations are pure over their inputs. Malformed or missing data
//! disables the affected check for that activity only.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod availability;
mod conflicts;
mod error;
mod options;
mod plan;
mod route;
mod scheduler;

pub use availability::{AvailabilityResult, check_availability};
pub use conflicts::{
    Conflict, ConflictDetails, ConflictReport, ConflictSummary, ConflictType, ReservationReason,
    Severity, detect_itinerary_conflicts,
};
pub use error::PlanError;
pub use options::{DayEntryPoints, EntryPoint, ScheduleOptions};
pub use plan::{PlanOutcome, Planner};
pub use route::{OptimizedDay, RouteStats, optimize_day};
pub use scheduler::{DayScheduler, schedule_itinerary};
