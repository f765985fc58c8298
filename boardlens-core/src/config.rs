use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_detection_endpoint")]
    pub detection_endpoint: String,

    #[serde(default = "default_analysis_endpoint")]
    pub analysis_endpoint: String,

    /// Which analysis backend to route to: "engine" or "lichess".
    #[serde(default = "default_analysis_backend")]
    pub analysis_backend: String,

    #[serde(default = "default_analysis_depth")]
    pub analysis_depth: u32,

    /// Whole-request deadline for remote calls, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            detection_endpoint: default_detection_endpoint(),
            analysis_endpoint: default_analysis_endpoint(),
            analysis_backend: default_analysis_backend(),
            analysis_depth: default_analysis_depth(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_detection_endpoint() -> String {
    "http://localhost:8001".to_string()
}

fn default_analysis_endpoint() -> String {
    "http://localhost:8000".to_string()
}

fn default_analysis_backend() -> String {
    "engine".to_string()
}

fn default_analysis_depth() -> u32 {
    12
}

fn default_request_timeout_secs() -> u64 {
    30
}
