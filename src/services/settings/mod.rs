mod mapper;
mod service;

pub use mapper::{apply_env_overrides, ENV_API_URL, ENV_TOKEN};
pub use service::SettingsService;
