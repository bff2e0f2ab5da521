//! HTTP-based travel time providers for routing services.
//!
//! This module provides [`HttpTravelTimeProvider`], an implementation of
//! [`wayfare_core::TravelTimeProvider`] that fetches travel time matrices
//! from an OSRM routing service.
//!
//! # Architecture
//!
//! The provider calls the OSRM Table API once per matrix. The synchronous
//! [`TravelTimeProvider`](wayfare_core::TravelTimeProvider) trait is
//! implemented by blocking on async HTTP calls internally, keeping the
//! planner embeddable in synchronous contexts. The travel mode picks the
//! OSRM profile segment of the request URL.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use geo::Coord;
//! use wayfare_core::{TravelMode, TravelTimeProvider};
//! use wayfare_data::routing::{HttpTravelTimeProvider, HttpTravelTimeProviderConfig};
//!
//! let config = HttpTravelTimeProviderConfig::new("http://localhost:5000")
//!     .with_timeout(Duration::from_secs(10))
//!     .with_user_agent("my-app/1.0");
//! let provider = HttpTravelTimeProvider::with_config(config)?;
//!
//! let points = [Coord { x: 135.7850, y: 34.9949 }, Coord { x: 135.7788, y: 35.0037 }];
//! let matrix = provider.get_travel_time_matrix(&points, TravelMode::Walk)?;
//! println!("Travel time: {:?}", matrix[0][1]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod osrm;
mod provider;

pub use provider::{
    DEFAULT_USER_AGENT, HttpTravelTimeProvider, HttpTravelTimeProviderConfig, ProviderBuildError,
    osrm_profile,
};
