//! Liveness Reporter
//!
//! Probes the connection handle on demand and turns the outcome into a
//! fixed-shape status. A failed probe is reported, never propagated.

use std::sync::Arc;

use serde::Serialize;
use tracing::warn;

use crate::store::StoreConnection;

/// Component name reported in every status.
pub const COMPONENT_NAME: &str = "cache";

// == Liveness Status ==
/// Snapshot produced by a single probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LivenessStatus {
    pub name: String,
    pub up: bool,
    /// The store's literal PING reply, when up
    pub response: Option<String>,
    /// Why the probe failed, when down
    pub error: Option<String>,
}

impl LivenessStatus {
    pub fn up(response: impl Into<String>) -> Self {
        Self {
            name: COMPONENT_NAME.to_string(),
            up: true,
            response: Some(response.into()),
            error: None,
        }
    }

    pub fn down(error: impl Into<String>) -> Self {
        Self {
            name: COMPONENT_NAME.to_string(),
            up: false,
            response: None,
            error: Some(error.into()),
        }
    }

    /// `"up"` or `"down"`.
    pub fn status(&self) -> &'static str {
        if self.up {
            "up"
        } else {
            "down"
        }
    }
}

// == Liveness Reporter ==
#[derive(Clone)]
pub struct LivenessReporter {
    store: Arc<dyn StoreConnection>,
}

impl LivenessReporter {
    pub fn new(store: Arc<dyn StoreConnection>) -> Self {
        Self { store }
    }

    /// Runs one probe against the store.
    pub async fn check(&self) -> LivenessStatus {
        match self.store.probe().await {
            Ok(token) => LivenessStatus::up(token),
            Err(e) => {
                warn!("Liveness probe failed: {}", e);
                LivenessStatus::down(e.to_string())
            }
        }
    }
}

/// Details block of the liveness payload.
#[derive(Debug, Clone, Serialize)]
pub struct LivenessDetails {
    pub connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&LivenessStatus> for LivenessDetails {
    fn from(status: &LivenessStatus) -> Self {
        Self {
            connected: status.up,
            response: status.response.clone(),
            error: status.error.clone(),
        }
    }
}
