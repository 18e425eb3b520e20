use crate::models::settings::Settings;

pub const ENV_API_URL: &str = "SALON_AGENDA_API_URL";
pub const ENV_TOKEN: &str = "SALON_AGENDA_TOKEN";

/// Overlay environment variables on top of the file settings.
///
/// `lookup` is `std::env::var` in production; tests pass a closure.
pub fn apply_env_overrides<F>(settings: &mut Settings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
        log::debug!("API base URL overridden from {}", ENV_API_URL);
        settings.api_base_url = url.trim().to_string();
    }

    if let Some(token) = lookup(ENV_TOKEN).filter(|v| !v.trim().is_empty()) {
        settings.auth_token = Some(token.trim().to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_applied() {
        let mut settings = Settings::default();
        apply_env_overrides(&mut settings, |key| match key {
            ENV_API_URL => Some(" https://salao.example.com/api ".to_string()),
            ENV_TOKEN => Some("secret".to_string()),
            _ => None,
        });

        assert_eq!(settings.api_base_url, "https://salao.example.com/api");
        assert_eq!(settings.auth_token.as_deref(), Some("secret"));
    }

    #[test]
    fn test_blank_values_ignored() {
        let mut settings = Settings::default();
        apply_env_overrides(&mut settings, |_| Some("  ".to_string()));

        assert_eq!(settings, Settings::default());
    }
}
