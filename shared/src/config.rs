use crate::tracking::Platform;

pub const DEFAULT_API_BASE: &str = "http://localhost:5000";
pub const DEFAULT_TOKEN_KEY: &str = "access_token";

/// Client configuration, fixed at build time.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Base URL of the remote API, without trailing slash.
    pub api_base: String,
    /// LocalStorage key holding the bearer token.
    pub token_key: String,
    /// Collectors that receive tracking events.
    pub tracking: Vec<Platform>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            token_key: DEFAULT_TOKEN_KEY.to_string(),
            tracking: Platform::ALL.to_vec(),
        }
    }
}

impl AppConfig {
    /// Builds the config from optional overrides. Blank values fall back to
    /// the defaults; `tracking` is a comma separated platform list where
    /// unknown names are skipped and `none` disables tracking.
    pub fn from_vars(
        api_base: Option<&str>,
        token_key: Option<&str>,
        tracking: Option<&str>,
    ) -> Self {
        let mut config = Self::default();

        if let Some(base) = non_blank(api_base) {
            config.api_base = base.trim_end_matches('/').to_string();
        }
        if let Some(key) = non_blank(token_key) {
            config.token_key = key.to_string();
        }
        if let Some(list) = non_blank(tracking) {
            config.tracking = parse_platforms(list);
        }

        config
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_platforms(list: &str) -> Vec<Platform> {
    if list.eq_ignore_ascii_case("none") {
        return Vec::new();
    }
    let mut platforms = Vec::new();
    for name in list.split(',').filter(|n| !n.trim().is_empty()) {
        match Platform::parse(name) {
            Some(p) if !platforms.contains(&p) => platforms.push(p),
            Some(_) => {}
            None => log::warn!("unknown tracking platform ignored: {}", name.trim()),
        }
    }
    platforms
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.api_base, "http://localhost:5000");
        assert_eq!(config.token_key, "access_token");
        assert_eq!(config.tracking.len(), 5);
        assert_eq!(AppConfig::from_vars(None, Some("  "), None), config);
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_vars(
            Some("https://api.aigrowth.com.br/"),
            Some("aigrowth_token"),
            Some("ga4, hotjar,ga4,mixpanel"),
        );
        assert_eq!(config.api_base, "https://api.aigrowth.com.br");
        assert_eq!(config.token_key, "aigrowth_token");
        assert_eq!(
            config.tracking,
            vec![Platform::GoogleAnalytics, Platform::Hotjar]
        );
    }

    #[test]
    fn test_tracking_can_be_disabled() {
        let config = AppConfig::from_vars(None, None, Some("none"));
        assert!(config.tracking.is_empty());
    }
}
