use serde::{Deserialize, Serialize};

use crate::dashboard::{RcaFinding, Stat};

/// Failure of a single backend round trip
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response (connection refused, timeout, ...).
    #[error("request to {path} failed: {message}")]
    Transport { path: String, message: String },

    /// The backend answered with a non-success status.
    #[error("{path} returned status {status}")]
    Status { path: String, status: u16 },

    /// The response body was not the JSON we expected.
    #[error("invalid response from {path}: {message}")]
    Decode { path: String, message: String },

    #[error("HTTP client build failed: {0}")]
    ClientBuild(String),
}

/// Payload of `GET /api/vehicle/{id}/health`. Every field is optional so partial
/// payloads still merge into the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleHealth {
    pub id: Option<String>,
    pub model: Option<String>,
    pub health: Option<u8>,
    pub mileage: Option<u32>,
    pub last_service: Option<String>,
    pub predicted_failure: Option<String>,
}

/// Payload of `POST /api/chat`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub message: Option<String>,
}

/// Payload of `GET /api/manufacturing/insights`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManufacturingInsights {
    #[serde(default)]
    pub findings: Vec<RcaFinding>,
    #[serde(default)]
    pub impact: Vec<Stat>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChatRequest<'a> {
    pub message: &'a str,
    pub vehicle_id: &'a str,
}
