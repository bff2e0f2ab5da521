//! Shared test harness modules for the Wayfare CLI.

use super::*;

mod helpers;
