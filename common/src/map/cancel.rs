use std::cell::Cell;
use std::rc::Rc;

/// 経路リクエストの取消トークン
///
/// クローンは同じフラグを共有する。単一スレッド（ブラウザ）前提。
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let token = CancelToken::new();
        let held_by_request = token.clone();
        assert!(!held_by_request.is_cancelled());
        token.cancel();
        assert!(held_by_request.is_cancelled());
    }
}
