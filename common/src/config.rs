//! クライアント設定（APIのベースURLと地図APIキー）

use crate::error::{Error, Result};

pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// 地図スクリプトのローダーキー
pub const MAPS_SCRIPT_KEY: &str = "google-maps";

const MAPS_SCRIPT_BASE: &str = "https://maps.googleapis.com/maps/api/js";

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub api_url: String,
    pub maps_api_key: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            maps_api_key: None,
        }
    }
}

impl ClientConfig {
    /// 空文字は未設定として扱う
    pub fn new(api_url: Option<&str>, maps_api_key: Option<&str>) -> Self {
        let api_url = api_url
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_API_URL)
            .trim_end_matches('/')
            .to_string();
        let maps_api_key = maps_api_key
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        Self { api_url, maps_api_key }
    }

    pub fn maps_script_url(&self) -> Result<String> {
        let key = self
            .maps_api_key
            .as_deref()
            .ok_or_else(|| Error::Config("maps API key is not set".to_string()))?;
        Ok(format!("{}?key={}&v=weekly&libraries=marker,routes", MAPS_SCRIPT_BASE, key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_values_use_defaults() {
        let config = ClientConfig::new(Some("  "), Some(""));
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_api_url_trailing_slash_removed() {
        let config = ClientConfig::new(Some("https://api.example.org/"), None);
        assert_eq!(config.api_url, "https://api.example.org");
    }

    #[test]
    fn test_maps_script_url() {
        let config = ClientConfig::new(None, Some("abc123"));
        assert_eq!(
            config.maps_script_url().unwrap(),
            "https://maps.googleapis.com/maps/api/js?key=abc123&v=weekly&libraries=marker,routes"
        );
        assert!(matches!(ClientConfig::default().maps_script_url(), Err(Error::Config(_))));
    }
}
