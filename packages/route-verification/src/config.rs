use serde::Deserialize;
use std::time::Duration;

use crate::services::verification::VerificationSettings;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,

    // OSRM-compatible routing server
    #[serde(default = "default_osrm_url")]
    pub osrm_url: String,

    /// Platform REST API (projects, chat, users). The service binary keeps
    /// uploads in memory; this is read by library consumers that build a
    /// `ProjectUploadSink` or `HttpChatSource`.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default = "default_inspection_points")]
    pub inspection_points: usize,

    #[serde(default = "default_verification_radius_meters")]
    pub verification_radius_meters: f64,

    #[serde(default = "default_routing_timeout_secs")]
    pub routing_timeout_secs: u64,

    /// Tick for `ChatPoller`; like `api_url`, unused by the binary itself
    #[serde(default = "default_chat_poll_interval_secs")]
    pub chat_poll_interval_secs: u64,

    // Sessions older than this are swept from memory
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::from_env::<Config>()
    }

    pub fn routing_timeout(&self) -> Duration {
        Duration::from_secs(self.routing_timeout_secs)
    }

    pub fn chat_poll_interval(&self) -> Duration {
        Duration::from_secs(self.chat_poll_interval_secs.max(1))
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs.max(60))
    }

    pub fn verification_settings(&self) -> VerificationSettings {
        VerificationSettings {
            inspection_points: self.inspection_points,
            radius_m: self.verification_radius_meters,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            osrm_url: default_osrm_url(),
            api_url: default_api_url(),
            inspection_points: default_inspection_points(),
            verification_radius_meters: default_verification_radius_meters(),
            routing_timeout_secs: default_routing_timeout_secs(),
            chat_poll_interval_secs: default_chat_poll_interval_secs(),
            session_ttl_secs: default_session_ttl_secs(),
        }
    }
}

fn default_port() -> u16 {
    3000
}

fn default_osrm_url() -> String {
    "https://router.project-osrm.org".to_string()
}

fn default_api_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_inspection_points() -> usize {
    4
}

fn default_verification_radius_meters() -> f64 {
    50.0
}

fn default_routing_timeout_secs() -> u64 {
    15
}

fn default_chat_poll_interval_secs() -> u64 {
    10
}

fn default_session_ttl_secs() -> u64 {
    3600
}
