use crate::error::{AppError, Result};
use give_and_get_common::config::DEFAULT_API_URL;
use give_and_get_common::ClientConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// バックエンドURLを上書きする環境変数
pub const API_URL_ENV: &str = "GIVE_AND_GET_API_URL";
/// 地図APIキーを上書きする環境変数
pub const MAPS_KEY_ENV: &str = "GIVE_AND_GET_MAPS_KEY";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_url: Option<String>,
    pub maps_api_key: Option<String>,
    pub timeout_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// ファイルがなければ既定値
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default_config())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| AppError::Config("home directory not found".into()))?;
        Ok(home.join(".config").join("give-and-get").join("config.json"))
    }

    fn default_config() -> Self {
        Self {
            api_url: None,
            maps_api_key: None,
            timeout_seconds: 30,
        }
    }

    /// 優先順位: コマンドライン > 環境変数 > 設定ファイル > 既定値
    pub fn api_url(&self, flag: Option<&str>) -> String {
        let env = std::env::var(API_URL_ENV).ok();
        resolve_api_url(flag, env.as_deref(), self.api_url.as_deref())
    }

    pub fn maps_api_key(&self) -> Option<String> {
        match std::env::var(MAPS_KEY_ENV) {
            Ok(key) if !key.trim().is_empty() => Some(key),
            _ => self.maps_api_key.clone(),
        }
    }

    pub fn client_config(&self, flag: Option<&str>) -> ClientConfig {
        ClientConfig {
            api_url: self.api_url(flag),
            maps_api_key: self.maps_api_key(),
        }
    }

    pub fn set_api_url(&mut self, url: String) -> Result<()> {
        let url = url.trim().trim_end_matches('/').to_string();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(AppError::Config(format!("API URL must start with http:// or https://: {}", url)));
        }
        self.api_url = Some(url);
        self.save()
    }

    pub fn set_maps_key(&mut self, key: String) -> Result<()> {
        self.maps_api_key = Some(key.trim().to_string());
        self.save()
    }
}

/// 空文字の指定は未指定として扱う
pub fn resolve_api_url(flag: Option<&str>, env: Option<&str>, file: Option<&str>) -> String {
    [flag, env, file]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|url| !url.is_empty())
        .unwrap_or(DEFAULT_API_URL)
        .trim_end_matches('/')
        .to_string()
}
