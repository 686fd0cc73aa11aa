//! 离线缓存命令
//!
//! 启动离线缓存 Actor 并执行安装或请求拦截

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use reqwest::{Client, Url};

use crate::actors::{
    FetchOutcome, InstallReport, OfflineCacheActor, OfflineCacheConfig, OfflineCacheHandle,
};
use crate::config::RuntimeConfig;
use crate::offline::{CacheStorage, NetworkFetcher};

/// 打开磁盘上的缓存并启动离线缓存 Actor
pub async fn start_offline_cache(
    config: &RuntimeConfig,
    origin: Url,
    assets: Vec<String>,
    client: Client,
) -> Result<OfflineCacheHandle> {
    let storage = CacheStorage::open_dir(config.cache_dir()).await?;
    let cache_config = OfflineCacheConfig {
        cache_name: config.cache_name.clone(),
        origin,
        assets,
    };
    let (actor, handle) =
        OfflineCacheActor::new(cache_config, storage, Arc::new(NetworkFetcher::new(client)));
    tokio::spawn(actor.run());
    Ok(handle)
}

pub fn describe_install(report: &InstallReport) -> String {
    let mut lines = vec![format!(
        "{}: {} cached, {} failed",
        report.cache_name,
        report.cached.len(),
        report.failed.len()
    )];
    lines.extend(report.failed.iter().map(|(url, reason)| format!("  {} ({})", url, reason)));
    lines.join("\n")
}

/// 拦截一个请求，把响应体写到文件或返回给调用方输出
pub async fn fetch_asset(
    handle: &OfflineCacheHandle,
    url: &str,
    output: Option<&Path>,
) -> Result<FetchOutcome> {
    let outcome = handle.fetch(url).await?;
    if let Some(path) = output {
        tokio::fs::write(path, &outcome.response.body).await?;
    }
    Ok(outcome)
}
