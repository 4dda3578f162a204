//! reqwest によるHTTP送信

use crate::config::Config;
use crate::error::{AppError, Result};
use give_and_get_common::{ApiClient, ApiError, ApiTransport, HttpMethod, HttpReply};
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

impl ApiTransport for ReqwestTransport {
    async fn send(&self, method: HttpMethod, url: &str, body: Option<String>) -> std::result::Result<HttpReply, ApiError> {
        let mut request = match method {
            HttpMethod::Get => self.client.get(url),
            HttpMethod::Post => self.client.post(url),
        };
        if let Some(body) = body {
            request = request.header(CONTENT_TYPE, "application/json").body(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        log::debug!("{} {} -> {}", method.as_str(), url, status);
        Ok(HttpReply { status, body })
    }
}

/// 設定からAPIクライアントを作る
pub fn build_client(config: &Config, api_url: Option<&str>) -> Result<ApiClient<ReqwestTransport>> {
    let transport = ReqwestTransport::new(Duration::from_secs(config.timeout_seconds.max(1)))?;
    Ok(ApiClient::new(config.api_url(api_url), transport))
}
