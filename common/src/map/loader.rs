//! 外部スクリプトの読込（キー単位でメモ化）
//!
//! - 読込済みのキーは即座に完了する
//! - 読込中のキーは同じFutureを共有する
//! - 失敗したキーは記録しないので、次の呼び出しで再試行する

use crate::error::LoadError;
use futures::future::{FutureExt, LocalBoxFuture, Shared};
use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;

type LoadFuture = Shared<LocalBoxFuture<'static, Result<(), LoadError>>>;

/// 読込状態
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    NotStarted,
    Loading,
    Loaded,
    Failed(LoadError),
}

#[derive(Default)]
pub struct ScriptLoader {
    entries: RefCell<HashMap<String, LoadFuture>>,
}

impl ScriptLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// キーを読み込む
    ///
    /// `start` は実際に読込を始める必要があるときだけ呼ばれる
    pub async fn load<F, Fut>(&self, key: &str, start: F) -> Result<(), LoadError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(), LoadError>> + 'static,
    {
        let future = self.entry(key, start);
        future.await
    }

    fn entry<F, Fut>(&self, key: &str, start: F) -> LoadFuture
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(), LoadError>> + 'static,
    {
        let mut entries = self.entries.borrow_mut();
        if let Some(existing) = entries.get(key) {
            match existing.peek() {
                Some(Err(e)) => log::info!("retrying {} after failure: {}", key, e),
                _ => return existing.clone(),
            }
        }

        log::debug!("loading script {}", key);
        let future = start().boxed_local().shared();
        entries.insert(key.to_string(), future.clone());
        future
    }

    pub fn state(&self, key: &str) -> LoadState {
        match self.entries.borrow().get(key) {
            None => LoadState::NotStarted,
            Some(future) => match future.peek() {
                None => LoadState::Loading,
                Some(Ok(())) => LoadState::Loaded,
                Some(Err(e)) => LoadState::Failed(e.clone()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::channel::oneshot;
    use futures::executor::block_on;
    use std::cell::Cell;

    #[test]
    fn test_loaded_key_does_not_start_again() {
        let loader = ScriptLoader::new();
        let starts = Cell::new(0);
        let start = || {
            starts.set(starts.get() + 1);
            async { Ok(()) }
        };

        block_on(loader.load("maps", start)).unwrap();
        block_on(loader.load("maps", start)).unwrap();
        assert_eq!(starts.get(), 1);
        assert_eq!(loader.state("maps"), LoadState::Loaded);
    }

    #[test]
    fn test_in_flight_load_is_shared() {
        let loader = ScriptLoader::new();
        let (tx, rx) = oneshot::channel::<()>();
        let starts = Cell::new(0);

        let first = loader.load("maps", || {
            starts.set(starts.get() + 1);
            async move {
                rx.await.map_err(|_| LoadError::new("maps", "cancelled"))
            }
        });
        let second = loader.load("maps", || {
            starts.set(starts.get() + 1);
            async { Ok(()) }
        });

        // 読込中の2回目の呼び出しは新たに開始しない
        let joined = futures::future::join(first, async move {
            tx.send(()).unwrap();
            second.await
        });
        let (a, b) = block_on(joined);
        assert!(a.is_ok());
        assert!(b.is_ok());
        assert_eq!(starts.get(), 1);
    }

    #[test]
    fn test_failed_load_is_retried() {
        let loader = ScriptLoader::new();
        let starts = Cell::new(0);

        let result = block_on(loader.load("maps", || {
            starts.set(starts.get() + 1);
            async { Err(LoadError::new("maps", "network")) }
        }));
        assert!(result.is_err());
        assert!(matches!(loader.state("maps"), LoadState::Failed(_)));

        block_on(loader.load("maps", || {
            starts.set(starts.get() + 1);
            async { Ok(()) }
        }))
        .unwrap();
        assert_eq!(starts.get(), 2);
        assert_eq!(loader.state("maps"), LoadState::Loaded);
    }

    #[test]
    fn test_keys_are_independent() {
        let loader = ScriptLoader::new();
        assert_eq!(loader.state("other"), LoadState::NotStarted);
        block_on(loader.load("maps", || async { Ok(()) })).unwrap();
        assert_eq!(loader.state("other"), LoadState::NotStarted);
    }
}
