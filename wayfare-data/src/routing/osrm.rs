//! OSRM Table service response.
//!
//! See: <http://project-osrm.org/docs/v5.24.0/api/#table-service>

use serde::Deserialize;

/// OSRM Table API response.
#[derive(Debug, Deserialize)]
pub struct TableResponse {
    /// Status code from OSRM, `"Ok"` on success; otherwise e.g.
    /// `"InvalidQuery"` or `"NoTable"`.
    pub code: String,

    /// Error detail when `code` is not `"Ok"`.
    pub message: Option<String>,

    /// Durations in seconds; `durations[i][j]` runs from source `i` to
    /// destination `j`. `None` marks pairs with no route.
    pub durations: Option<Vec<Vec<Option<f64>>>>,
}

impl TableResponse {
    pub fn is_ok(&self) -> bool {
        self.code == "Ok"
    }
}
