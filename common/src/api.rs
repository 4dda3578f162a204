//! バックエンドAPIクライアント
//!
//! HTTP送受信は `ApiTransport` に任せる（CLIはreqwest、ブラウザはfetch）。
//! ここではURL組み立て・JSON変換・エラー分類だけを行う。

use crate::about::AboutContent;
use crate::donations::DonorItems;
use crate::error::ApiError;
use crate::types::{Coordinate, CreateUserReply, HealthReply, LocationSet, MatchReply, VerificationReply};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

pub const CREATE_USER_PATH: &str = "/api/user/create";
pub const VALIDATE_DONOR_PATH: &str = "/api/donor/validate";
pub const VALIDATE_ORG_PATH: &str = "/api/org/validate";
pub const MATCH_SUPPLIES_PATH: &str = "/api/match-supplies";
pub const MATCH_PEOPLE_PATH: &str = "/api/match-people";
pub const ABOUT_PATH: &str = "/api/about";
pub const HEALTH_PATH: &str = "/api/health";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// ステータスと本文
#[derive(Debug, Clone, PartialEq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP送信の抽象
///
/// 接続できなかった場合のみ `ApiError::Network` を返す。
/// 非2xxは `HttpReply` としてそのまま返すこと。
#[allow(async_fn_in_trait)]
pub trait ApiTransport {
    async fn send(&self, method: HttpMethod, url: &str, body: Option<String>) -> Result<HttpReply, ApiError>;
}

/// `/api/match-supplies` リクエスト
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupplyMatchRequest {
    pub location: Coordinate,
    pub radius: u32,
    pub donor_items: Option<DonorItems>,
}

/// `/api/match-people` リクエスト
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeopleMatchRequest {
    pub location: Coordinate,
    pub radius: u32,
    pub person_filters: Option<Value>,
}

/// APIクライアント
#[derive(Debug, Clone)]
pub struct ApiClient<T> {
    base_url: String,
    transport: T,
}

impl<T: ApiTransport> ApiClient<T> {
    pub fn new(base_url: impl Into<String>, transport: T) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, transport }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// 寄付者登録
    pub async fn create_user(&self, payload: &Value) -> Result<CreateUserReply, ApiError> {
        self.post(CREATE_USER_PATH, payload).await
    }

    /// 寄付者の事前検証
    pub async fn validate_donor(&self, payload: &Value) -> Result<VerificationReply, ApiError> {
        let reply: VerificationReply = self.post(VALIDATE_DONOR_PATH, payload).await?;
        accepted(reply)
    }

    /// 団体の登録・検証
    ///
    /// `success: false` はサーバー側の拒否として扱う
    pub async fn validate_organization(&self, payload: &Value) -> Result<VerificationReply, ApiError> {
        let reply: VerificationReply = self.post(VALIDATE_ORG_PATH, payload).await?;
        accepted(reply)
    }

    pub async fn match_supplies(&self, request: &SupplyMatchRequest) -> Result<LocationSet, ApiError> {
        let reply: MatchReply = self.post(MATCH_SUPPLIES_PATH, request).await?;
        log::info!("match-supplies: {} matches", reply.matches_found);
        Ok(LocationSet::from_ranked(reply.ranked_organizations))
    }

    pub async fn match_people(&self, request: &PeopleMatchRequest) -> Result<LocationSet, ApiError> {
        let reply: MatchReply = self.post(MATCH_PEOPLE_PATH, request).await?;
        log::info!("match-people: {} matches", reply.matches_found);
        Ok(LocationSet::from_ranked(reply.ranked_organizations))
    }

    /// About（失敗時は固定文言）
    pub async fn about(&self) -> AboutContent {
        match self.get::<AboutContent>(ABOUT_PATH).await {
            Ok(about) => about,
            Err(e) => {
                log::warn!("about content unavailable, using fallback: {}", e);
                AboutContent::fallback()
            }
        }
    }

    pub async fn health(&self) -> Result<HealthReply, ApiError> {
        self.get(HEALTH_PATH).await
    }

    async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        let url = self.url(path);
        log::debug!("GET {}", url);
        let reply = self.transport.send(HttpMethod::Get, &url, None).await?;
        decode(reply)
    }

    async fn post<B: Serialize, R: DeserializeOwned>(&self, path: &str, body: &B) -> Result<R, ApiError> {
        let url = self.url(path);
        let body = serde_json::to_string(body).map_err(|e| ApiError::Decode(e.to_string()))?;
        log::debug!("POST {} ({} bytes)", url, body.len());
        let reply = self.transport.send(HttpMethod::Post, &url, Some(body)).await?;
        decode(reply)
    }
}

fn accepted(reply: VerificationReply) -> Result<VerificationReply, ApiError> {
    if reply.success {
        Ok(reply)
    } else {
        let message = if reply.message.trim().is_empty() {
            "Validation failed".to_string()
        } else {
            reply.message
        };
        Err(ApiError::Rejected(message))
    }
}

fn decode<R: DeserializeOwned>(reply: HttpReply) -> Result<R, ApiError> {
    if !reply.is_success() {
        let detail = extract_detail(&reply.body, reply.status);
        log::warn!("backend rejected request ({}): {}", reply.status, detail);
        return Err(ApiError::Rejected(detail));
    }
    serde_json::from_str(&reply.body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// 非2xxレスポンスから表示用メッセージを取り出す
///
/// `detail` が文字列ならそのまま、オブジェクトなら message/error を優先し、
/// なければJSONを文字列化する
pub fn extract_detail(body: &str, status: u16) -> String {
    let fallback = || {
        let trimmed = body.trim();
        if trimmed.is_empty() {
            format!("Server error ({})", status)
        } else {
            trimmed.to_string()
        }
    };

    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return fallback();
    };

    match value.get("detail") {
        Some(Value::String(detail)) => detail.clone(),
        Some(detail @ Value::Object(map)) => map
            .get("message")
            .or_else(|| map.get("error"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| detail.to_string()),
        Some(Value::Null) | None => value
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(fallback),
        Some(detail) => detail.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use serde_json::json;
    use std::cell::RefCell;

    /// 送信内容を記録し、固定レスポンスを返す
    struct MockTransport {
        reply: Result<HttpReply, ApiError>,
        sent: RefCell<Vec<(HttpMethod, String, Option<String>)>>,
    }

    impl MockTransport {
        fn ok(status: u16, body: Value) -> Self {
            Self {
                reply: Ok(HttpReply { status, body: body.to_string() }),
                sent: RefCell::new(Vec::new()),
            }
        }

        fn offline() -> Self {
            Self {
                reply: Err(ApiError::Network("connection refused".to_string())),
                sent: RefCell::new(Vec::new()),
            }
        }
    }

    impl ApiTransport for MockTransport {
        async fn send(&self, method: HttpMethod, url: &str, body: Option<String>) -> Result<HttpReply, ApiError> {
            self.sent.borrow_mut().push((method, url.to_string(), body));
            self.reply.clone()
        }
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = ApiClient::new("http://localhost:8000/", MockTransport::offline());
        assert_eq!(client.url(HEALTH_PATH), "http://localhost:8000/api/health");
    }

    #[test]
    fn test_create_user_posts_payload() {
        let transport = MockTransport::ok(200, json!({"status": "success", "message": "User created", "user_id": "u1"}));
        let client = ApiClient::new("http://api", transport);
        let reply = block_on(client.create_user(&json!({"name": "Ann"}))).unwrap();
        assert_eq!(reply.user_id.as_deref(), Some("u1"));

        let sent = client.transport().sent.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, HttpMethod::Post);
        assert_eq!(sent[0].1, "http://api/api/user/create");
        assert_eq!(sent[0].2.as_deref(), Some(r#"{"name":"Ann"}"#));
    }

    #[test]
    fn test_org_validate_success_false_is_rejection() {
        let transport = MockTransport::ok(200, json!({"success": false, "message": "EIN could not be verified"}));
        let client = ApiClient::new("http://api", transport);
        let err = block_on(client.validate_organization(&json!({}))).unwrap_err();
        assert_eq!(err, ApiError::Rejected("EIN could not be verified".to_string()));
    }

    #[test]
    fn test_non_2xx_detail_is_surfaced() {
        let transport = MockTransport::ok(400, json!({"detail": "Email already registered"}));
        let client = ApiClient::new("http://api", transport);
        let err = block_on(client.create_user(&json!({}))).unwrap_err();
        assert_eq!(err, ApiError::Rejected("Email already registered".to_string()));
    }

    #[test]
    fn test_network_failure_passes_through() {
        let client = ApiClient::new("http://api", MockTransport::offline());
        let err = block_on(client.health()).unwrap_err();
        assert!(err.is_network());
    }

    #[test]
    fn test_undecodable_success_body() {
        let transport = MockTransport {
            reply: Ok(HttpReply { status: 200, body: "<html>".to_string() }),
            sent: RefCell::new(Vec::new()),
        };
        let client = ApiClient::new("http://api", transport);
        assert!(matches!(block_on(client.health()), Err(ApiError::Decode(_))));
    }

    #[test]
    fn test_match_supplies_builds_ordered_set() {
        let transport = MockTransport::ok(
            200,
            json!({
                "success": true,
                "matches_found": 2,
                "ranked_organizations": {
                    "2": {"name": "B", "location": {"lat": 1.0, "lng": 1.0}},
                    "1": {"name": "A", "location": {"lat": 2.0, "lng": 2.0}}
                }
            }),
        );
        let client = ApiClient::new("http://api", transport);
        let request = SupplyMatchRequest { location: Coordinate::FALLBACK, radius: 5, donor_items: None };
        let set = block_on(client.match_supplies(&request)).unwrap();
        assert_eq!(set.ids(), vec!["1", "2"]);

        let sent = client.transport().sent.borrow();
        let body: Value = serde_json::from_str(sent[0].2.as_deref().unwrap()).unwrap();
        assert_eq!(body["radius"], 5);
        assert!(body["donor_items"].is_null());
        assert_eq!(body["location"]["lat"], 40.8148);
    }

    #[test]
    fn test_about_falls_back_on_error() {
        let client = ApiClient::new("http://api", MockTransport::offline());
        let about = block_on(client.about());
        assert_eq!(about, AboutContent::fallback());
    }

    #[test]
    fn test_extract_detail_variants() {
        assert_eq!(extract_detail(r#"{"detail":"Bad"}"#, 400), "Bad");
        assert_eq!(extract_detail(r#"{"detail":{"message":"Nested"}}"#, 422), "Nested");
        assert_eq!(
            extract_detail(r#"{"detail":[{"loc":["body","age"],"msg":"too old"}]}"#, 422),
            r#"[{"loc":["body","age"],"msg":"too old"}]"#
        );
        assert_eq!(extract_detail(r#"{"message":"Plain"}"#, 500), "Plain");
        assert_eq!(extract_detail("Internal Server Error", 500), "Internal Server Error");
        assert_eq!(extract_detail("", 502), "Server error (502)");
    }
}
