//! ログインフラグ（localStorage）

use give_and_get_common::nav::AUTH_FLAG_KEY;
use give_and_get_common::AuthStore;
use gloo::storage::{LocalStorage, Storage};

#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserAuthStore;

impl AuthStore for BrowserAuthStore {
    fn is_authenticated(&self) -> bool {
        LocalStorage::get::<bool>(AUTH_FLAG_KEY).unwrap_or(false)
    }

    /// ログアウト時はキーごと削除
    fn set_authenticated(&self, value: bool) {
        if value {
            if let Err(e) = LocalStorage::set(AUTH_FLAG_KEY, true) {
                gloo::console::error!(format!("failed to store auth flag: {}", e));
            }
        } else {
            LocalStorage::delete(AUTH_FLAG_KEY);
        }
    }
}
