use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Placeholder shown when a request arrives without a customer name
pub const UNKNOWN_CUSTOMER: &str = "Unknown";

/// A single ride dispatch request, as handed to us by whatever produced it.
/// Every field is optional; the UI never mutates a request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RideRequest {
    #[serde(default, alias = "customerName", skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,

    #[serde(default, alias = "pickupAddress", skip_serializing_if = "Option::is_none")]
    pub pickup_address: Option<String>,

    #[serde(default, alias = "dropoffAddress", skip_serializing_if = "Option::is_none")]
    pub dropoff_address: Option<String>,
}

impl RideRequest {
    /// Customer row text ("Unknown" when absent)
    pub fn display_customer(&self) -> &str {
        display_or(&self.customer_name, UNKNOWN_CUSTOMER)
    }

    /// Pickup row text (empty when absent)
    pub fn display_pickup(&self) -> &str {
        display_or(&self.pickup_address, "")
    }

    /// Dropoff row text (empty when absent)
    pub fn display_dropoff(&self) -> &str {
        display_or(&self.dropoff_address, "")
    }
}

/// The single place where "absent field" becomes display text.
/// Every row goes through here so the fallback rule cannot drift.
fn display_or<'a>(field: &'a Option<String>, fallback: &'a str) -> &'a str {
    field.as_deref().unwrap_or(fallback)
}

#[derive(Debug, Error)]
pub enum RequestLoadError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid request file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Request files may hold one request or a whole batch
#[derive(Deserialize)]
#[serde(untagged)]
enum RequestFile {
    Many(Vec<RideRequest>),
    One(RideRequest),
}

/// Parse a JSON request document: either a single object or an array
pub fn parse_requests(content: &str) -> Result<Vec<RideRequest>, serde_json::Error> {
    match serde_json::from_str::<RequestFile>(content)? {
        RequestFile::Many(requests) => Ok(requests),
        RequestFile::One(request) => Ok(vec![request]),
    }
}

/// Load requests from a JSON file on disk
pub fn load_requests(path: &Path) -> Result<Vec<RideRequest>, RequestLoadError> {
    let content = std::fs::read_to_string(path).map_err(|source| RequestLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse_requests(&content).map_err(|source| RequestLoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Built-in demo data so the TUI is usable without a request file.
/// The last entry has every field absent to exercise the fallbacks.
pub fn sample_requests() -> Vec<RideRequest> {
    vec![
        RideRequest {
            customer_name: Some("Alex".to_string()),
            pickup_address: Some("1 Main St".to_string()),
            dropoff_address: Some("2 Oak Ave".to_string()),
        },
        RideRequest {
            customer_name: Some("Jane Doe".to_string()),
            pickup_address: Some("14 Harbour Rd".to_string()),
            dropoff_address: None,
        },
        RideRequest::default(),
    ]
}
