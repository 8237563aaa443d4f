//! Response DTOs for the cache service API

use serde::Serialize;

use crate::health::{LivenessDetails, LivenessStatus};

/// Response body for the liveness endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct LivenessResponse {
    /// Component name ("cache")
    pub name: String,
    /// "up" or "down"
    pub status: String,
    pub details: LivenessDetails,
    /// When the probe ran, ISO 8601
    pub checked_at: String,
}

impl From<&LivenessStatus> for LivenessResponse {
    fn from(status: &LivenessStatus) -> Self {
        Self {
            name: status.name.clone(),
            status: status.status().to_string(),
            details: LivenessDetails::from(status),
            checked_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_up_response_serialize() {
        let resp = LivenessResponse::from(&LivenessStatus::up("PONG"));
        let json = serde_json::to_value(&resp).unwrap();

        assert_eq!(json["name"], "cache");
        assert_eq!(json["status"], "up");
        assert_eq!(json["details"]["connected"], true);
        assert_eq!(json["details"]["response"], "PONG");
        assert!(json["details"].get("error").is_none());
        assert!(json["checked_at"].is_string());
    }

    #[test]
    fn test_down_response_serialize() {
        let resp = LivenessResponse::from(&LivenessStatus::down("Connection error: refused"));
        let json = serde_json::to_value(&resp).unwrap();

        assert_eq!(json["status"], "down");
        assert_eq!(json["details"]["connected"], false);
        assert_eq!(json["details"]["error"], "Connection error: refused");
        assert!(json["details"].get("response").is_none());
    }
}
