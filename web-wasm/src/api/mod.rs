//! バックエンドAPI（ブラウザ側）

pub mod fetch;

use fetch::FetchTransport;
use give_and_get_common::{ApiClient, ClientConfig};

/// ビルド時の環境変数から設定を読む
pub fn config() -> ClientConfig {
    ClientConfig::new(option_env!("GIVE_AND_GET_API_URL"), option_env!("GIVE_AND_GET_MAPS_KEY"))
}

pub fn client() -> ApiClient<FetchTransport> {
    ApiClient::new(config().api_url, FetchTransport)
}
