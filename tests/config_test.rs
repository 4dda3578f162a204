//! 設定ファイルのテスト

use give_and_get::config::{resolve_api_url, Config};
use tempfile::tempdir;

/// ファイルがなければ既定値
#[test]
fn test_load_missing_file_gives_defaults() {
    let dir = tempdir().expect("Failed to create temp dir");
    let config = Config::load_from(&dir.path().join("config.json")).unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.timeout_seconds, 30);
}

/// 保存して読み直す（親ディレクトリも作成される）
#[test]
fn test_save_and_reload() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("nested").join("config.json");

    let config = Config {
        api_url: Some("https://api.example.org".into()),
        maps_api_key: Some("maps-key".into()),
        timeout_seconds: 10,
    };
    config.save_to(&path).unwrap();

    let loaded = Config::load_from(&path).unwrap();
    assert_eq!(loaded, config);
}

/// 古い設定ファイル（項目不足）も読める
#[test]
fn test_partial_file_uses_defaults() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{"api_url": "http://10.0.0.5:8000"}"#).unwrap();

    let loaded = Config::load_from(&path).unwrap();
    assert_eq!(loaded.api_url.as_deref(), Some("http://10.0.0.5:8000"));
    assert_eq!(loaded.timeout_seconds, 30);
    assert!(loaded.maps_api_key.is_none());
}

/// コマンドライン > 環境変数 > 設定ファイル > 既定値
#[test]
fn test_api_url_precedence() {
    assert_eq!(resolve_api_url(None, None, None), "http://localhost:8000");
    assert_eq!(resolve_api_url(None, None, Some("http://file/")), "http://file");
    assert_eq!(resolve_api_url(None, Some("http://env"), Some("http://file")), "http://env");
    assert_eq!(
        resolve_api_url(Some("http://flag"), Some("http://env"), Some("http://file")),
        "http://flag"
    );
    // 空文字は未指定扱い
    assert_eq!(resolve_api_url(Some("  "), None, Some("http://file")), "http://file");
}
