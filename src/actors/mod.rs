// Actor模块 - 使用Actor模式管理并发状态
//
// 界面状态和离线缓存各由一个 Actor 独占，通过消息传递访问

pub mod app_actor;
pub mod offline_cache;

pub use app_actor::{AppActor, AppCommand, AppHandle};
pub use offline_cache::{
    FetchOutcome, InstallReport, OfflineCacheActor, OfflineCacheCommand, OfflineCacheConfig,
    OfflineCacheHandle, ResponseSource,
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::offline::{CacheStorage, NetworkFetcher};
    use reqwest::{Client, Url};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_offline_cache_handle_after_actor_dropped() {
        let config = OfflineCacheConfig {
            cache_name: "test-v1".to_string(),
            origin: Url::parse("http://127.0.0.1:9/").unwrap(),
            assets: Vec::new(),
        };
        let fetcher = Arc::new(NetworkFetcher::new(Client::new()));
        let (actor, handle) = OfflineCacheActor::new(config, CacheStorage::in_memory(), fetcher);

        // 不运行Actor，直接drop
        drop(actor);

        assert!(handle.install().await.is_err());
        assert!(handle.cached_urls("test-v1").await.is_empty());
    }

    #[tokio::test]
    async fn test_install_with_empty_asset_list() {
        let config = OfflineCacheConfig {
            cache_name: "empty-v1".to_string(),
            origin: Url::parse("http://127.0.0.1:9/").unwrap(),
            assets: Vec::new(),
        };
        let fetcher = Arc::new(NetworkFetcher::new(Client::new()));
        let (actor, handle) = OfflineCacheActor::new(config, CacheStorage::in_memory(), fetcher);
        tokio::spawn(actor.run());

        let report = handle.install().await.unwrap();
        assert!(report.cached.is_empty());
        assert!(report.failed.is_empty());
    }
}
