// Settings module
// Client configuration: where the scheduling API lives and how the agenda opens

use serde::{Deserialize, Serialize};

use crate::models::ui::ViewMode;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api_base_url: String,
    /// Bearer token sent with every request, if the API requires one.
    pub auth_token: Option<String>,
    pub request_timeout_secs: u64,
    /// Extra attempts for agenda fetches. Mutations are never retried.
    pub max_retries: usize,
    pub retry_delay_ms: u64,
    pub default_view: ViewMode,
    pub default_professional_id: Option<i64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:3000/api".to_string(),
            auth_token: None,
            request_timeout_secs: 20,
            max_retries: 2,
            retry_delay_ms: 400,
            default_view: ViewMode::Week,
            default_professional_id: None,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), String> {
        let url = self.api_base_url.trim();
        if url.is_empty() {
            return Err("API base URL cannot be empty".to_string());
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err("API base URL must start with http:// or https://".to_string());
        }

        if self.request_timeout_secs == 0 {
            return Err("Request timeout must be greater than 0 seconds".to_string());
        }

        if let Some(id) = self.default_professional_id {
            if id <= 0 {
                return Err("Default professional id must be positive".to_string());
            }
        }

        Ok(())
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.api_base_url.trim().trim_end_matches('/')
    }
}
