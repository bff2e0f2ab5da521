//! `TravelTimeProvider` backed by OSRM's Table API.
//!
//! The [`TravelTimeProvider`] trait is synchronous so the planner stays usable
//! from plain threads. This provider bridges to async HTTP by blocking on a
//! Tokio runtime it owns.

use std::time::Duration;

use geo::Coord;
use reqwest::Client;
use thiserror::Error;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};
use wayfare_core::{TravelMode, TravelTimeError, TravelTimeMatrix, TravelTimeProvider};

use super::osrm::TableResponse;

/// Errors raised while constructing an [`HttpTravelTimeProvider`].
#[derive(Debug, Error)]
pub enum ProviderBuildError {
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// Failed to build the Tokio runtime.
    #[error("failed to build Tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// Default user agent for OSRM requests.
pub const DEFAULT_USER_AGENT: &str = "wayfare-routing/0.1";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// The OSRM profile segment used for `mode`.
///
/// OSRM has no public-transport profile; transit and taxi legs are estimated
/// on the road network.
pub const fn osrm_profile(mode: TravelMode) -> &'static str {
    match mode {
        TravelMode::Walk => "walking",
        TravelMode::Bike => "cycling",
        TravelMode::Transit | TravelMode::Drive | TravelMode::Taxi => "driving",
    }
}

/// Configuration for [`HttpTravelTimeProvider`].
#[derive(Debug, Clone)]
pub struct HttpTravelTimeProviderConfig {
    /// Base URL for the OSRM service (e.g., `"http://localhost:5000"`).
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
    /// Profile used for every mode instead of [`osrm_profile`]. A single
    /// `osrm-routed` instance serves one profile, so deployments often pin it.
    pub profile: Option<String>,
}

impl Default for HttpTravelTimeProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            profile: None,
        }
    }
}

impl HttpTravelTimeProviderConfig {
    /// Create a configuration for the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Pin the OSRM profile for all travel modes.
    #[must_use]
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    fn profile_for(&self, mode: TravelMode) -> &str {
        self.profile.as_deref().unwrap_or_else(|| osrm_profile(mode))
    }
}

/// Travel time provider using the OSRM Table API.
///
/// # Runtime behaviour
///
/// Outside any Tokio runtime the provider blocks on its own current-thread
/// runtime. Inside a multi-threaded runtime (detected via
/// [`Handle::try_current()`]) it uses that runtime's handle with
/// [`tokio::task::block_in_place`]. Inside a `current_thread` runtime it falls
/// back to its own runtime, which can deadlock if the caller's runtime drives
/// I/O this request needs.
///
/// Cells OSRM reports as unreachable, and any negative or non-finite value,
/// become [`Duration::MAX`].
pub struct HttpTravelTimeProvider {
    client: Client,
    config: HttpTravelTimeProviderConfig,
    runtime: Runtime,
}

impl std::fmt::Debug for HttpTravelTimeProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTravelTimeProvider")
            .field("client", &self.client)
            .field("config", &self.config)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish()
    }
}

impl HttpTravelTimeProvider {
    /// Create a provider with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(HttpTravelTimeProviderConfig::new(base_url))
    }

    /// Create a provider with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn with_config(config: HttpTravelTimeProviderConfig) -> Result<Self, ProviderBuildError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(ProviderBuildError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ProviderBuildError::Runtime)?;
        Ok(Self {
            client,
            config,
            runtime,
        })
    }

    /// The active configuration.
    pub const fn config(&self) -> &HttpTravelTimeProviderConfig {
        &self.config
    }

    /// `{base_url}/table/v1/{profile}/{lon,lat;...}`
    fn build_table_url(&self, points: &[Coord<f64>], mode: TravelMode) -> String {
        let coords = points
            .iter()
            .map(|point| format!("{},{}", point.x, point.y))
            .collect::<Vec<_>>()
            .join(";");

        format!(
            "{}/table/v1/{}/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.profile_for(mode),
            coords
        )
    }

    async fn fetch_matrix_async(
        &self,
        points: &[Coord<f64>],
        mode: TravelMode,
    ) -> Result<TravelTimeMatrix, TravelTimeError> {
        let url = self.build_table_url(points, mode);
        log::debug!("requesting {}x{} travel matrix from {url}", points.len(), points.len());

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, &url))?
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(&err, &url))?;

        let table: TableResponse =
            response
                .json()
                .await
                .map_err(|err| TravelTimeError::ParseError {
                    message: err.to_string(),
                })?;

        convert_response(table, points.len())
    }

    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &str) -> TravelTimeError {
        if error.is_timeout() {
            return TravelTimeError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.config.timeout.as_secs(),
            };
        }

        if let Some(status) = error.status() {
            return TravelTimeError::HttpError {
                url: url.to_owned(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }

        TravelTimeError::NetworkError {
            url: url.to_owned(),
            message: error.to_string(),
        }
    }
}

/// Turn an OSRM table into a square matrix of `expected` rows.
fn convert_response(
    response: TableResponse,
    expected: usize,
) -> Result<TravelTimeMatrix, TravelTimeError> {
    if !response.is_ok() {
        return Err(TravelTimeError::ServiceError {
            code: response.code,
            message: response.message.unwrap_or_default(),
        });
    }

    let durations = response
        .durations
        .ok_or_else(|| TravelTimeError::ParseError {
            message: "OSRM response missing durations array".to_owned(),
        })?;

    if durations.len() != expected || durations.iter().any(|row| row.len() != expected) {
        return Err(TravelTimeError::ParseError {
            message: format!("OSRM returned a table that is not {expected}x{expected}"),
        });
    }

    // Duration::from_secs_f64 panics on negative or non-finite input.
    let matrix = durations
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|cell| {
                    cell.filter(|&seconds| seconds >= 0.0 && seconds.is_finite())
                        .map_or(Duration::MAX, Duration::from_secs_f64)
                })
                .collect()
        })
        .collect();

    Ok(matrix)
}

impl TravelTimeProvider for HttpTravelTimeProvider {
    /// Fetch the travel time matrix for `points`.
    ///
    /// # Runtime requirements
    ///
    /// From inside an existing Tokio runtime, that runtime must be
    /// multi-threaded; see the type-level docs.
    fn get_travel_time_matrix(
        &self,
        points: &[Coord<f64>],
        mode: TravelMode,
    ) -> Result<TravelTimeMatrix, TravelTimeError> {
        if points.is_empty() {
            return Err(TravelTimeError::EmptyInput);
        }

        let future = self.fetch_matrix_async(points, mode);
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            _ => self.runtime.block_on(future),
        }
    }
}
