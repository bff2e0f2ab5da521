//! Data access for the Wayfare engine.
//!
//! Responsibilities:
//! - Load location catalogs and itinerary documents from JSON files.
//! - Provide travel-time providers backed by external routing services.
//!
//! Boundaries:
//! - Do not encode planning rules (those live in `wayfare-planner`).
//! - Keep blocking I/O behind the synchronous provider and loader APIs.
//!
//! Invariants:
//! - No global mutable state.

#![forbid(unsafe_code)]

pub mod catalog;
pub mod fs;
pub mod routing;

pub use catalog::{CatalogError, load_document, load_itinerary, load_locations};
