#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the crime dashboard server.
//!
//! Feature property types are serialized into the `properties` object of
//! the `GeoJSON` features the server returns, so their field names are the
//! snake_case names the map front-end reads.

use serde::{Deserialize, Serialize};

/// Reply sent when the chat upstream fails for any reason.
pub const CHAT_FAILURE_REPLY: &str = "Something went wrong.";

/// Reply sent when the chat message is blank.
pub const CHAT_EMPTY_MESSAGE_REPLY: &str = "Message must not be empty.";

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

/// Query parameters for time-windowed endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowQueryParams {
    /// Trailing window length in days. `0` means all time.
    pub window_days: Option<u32>,
}

/// `POST /api/chat` request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The user's message.
    pub message: String,
}

/// `POST /api/chat` response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    /// The assistant's reply, or a generic failure message.
    pub reply: String,
}

impl ChatReply {
    /// The generic failure reply.
    #[must_use]
    pub fn failure() -> Self {
        Self {
            reply: CHAT_FAILURE_REPLY.to_string(),
        }
    }
}

/// Properties of a hospital point feature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HospitalProperties {
    /// Facility name.
    pub name: String,
    /// Street address.
    pub address: Option<String>,
    /// City.
    pub city: Option<String>,
    /// State.
    pub state: Option<String>,
    /// ZIP code.
    pub zipcode: Option<String>,
    /// Simulated occupancy percentage.
    pub occupancy: u32,
}

/// Properties of a hotspot point feature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotspotProperties {
    /// Simulated intensity.
    pub intensity: u32,
    /// Neighborhood name as logged.
    pub neighborhood: Option<String>,
    /// When the incident occurred (RFC 3339).
    pub occurred_at: Option<String>,
    /// Offense category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}
