// Offline Cache Actor - 独立运行的离线缓存工作者
//
// 只接收两类消息：安装（预取资源清单）和请求拦截（缓存优先，回落网络）
// 与界面状态不共享任何内存

use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::Url;
use tokio::sync::{mpsc, oneshot};
use tracing::{info, warn};

use crate::offline::{self, AssetFetcher, CacheStorage, CachedResponse};

/// 离线缓存命令
pub enum OfflineCacheCommand {
    /// 安装：打开缓存并预取所有资源
    Install {
        reply: oneshot::Sender<Result<InstallReport>>,
    },

    /// 拦截请求
    Fetch {
        url: String,
        reply: oneshot::Sender<Result<FetchOutcome>>,
    },

    /// 列出某个缓存中的地址
    CachedUrls {
        cache_name: String,
        reply: oneshot::Sender<Vec<String>>,
    },
}

/// 安装结果
#[derive(Debug, Clone, Default)]
pub struct InstallReport {
    pub cache_name: String,
    pub cached: Vec<String>,
    pub failed: Vec<(String, String)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseSource {
    Cache,
    Network,
}

#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub source: ResponseSource,
    pub response: CachedResponse,
}

/// 离线缓存配置
#[derive(Debug, Clone)]
pub struct OfflineCacheConfig {
    pub cache_name: String,
    /// 页面来源，用于解析 `./index.html` 之类的相对地址
    pub origin: Url,
    pub assets: Vec<String>,
}

/// 离线缓存Actor
pub struct OfflineCacheActor {
    receiver: mpsc::Receiver<OfflineCacheCommand>,
    storage: CacheStorage,
    fetcher: Arc<dyn AssetFetcher>,
    config: OfflineCacheConfig,
}

impl OfflineCacheActor {
    /// 创建新的Actor
    pub fn new(
        config: OfflineCacheConfig,
        storage: CacheStorage,
        fetcher: Arc<dyn AssetFetcher>,
    ) -> (Self, OfflineCacheHandle) {
        let (sender, receiver) = mpsc::channel(16);
        let actor = Self {
            receiver,
            storage,
            fetcher,
            config,
        };
        (actor, OfflineCacheHandle { sender })
    }

    /// 运行Actor
    pub async fn run(mut self) {
        info!("Offline Cache Actor 已启动: {}", self.config.cache_name);

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                OfflineCacheCommand::Install { reply } => {
                    let report = self.install().await;
                    if let Err(e) = &report {
                        warn!("离线缓存安装失败: {:#}", e);
                    }
                    let _ = reply.send(report);
                }

                OfflineCacheCommand::Fetch { url, reply } => {
                    let _ = reply.send(self.fetch(&url).await);
                }

                OfflineCacheCommand::CachedUrls { cache_name, reply } => {
                    let urls = self
                        .storage
                        .get(&cache_name)
                        .map(|cache| cache.urls())
                        .unwrap_or_default();
                    let _ = reply.send(urls);
                }
            }
        }

        info!("Offline Cache Actor 已停止");
    }

    async fn install(&mut self) -> Result<InstallReport> {
        let mut report = InstallReport {
            cache_name: self.config.cache_name.clone(),
            ..Default::default()
        };

        for asset in &self.config.assets {
            let url = match offline::resolve_url(&self.config.origin, asset) {
                Ok(url) => url,
                Err(e) => {
                    report.failed.push((asset.clone(), e.to_string()));
                    continue;
                }
            };

            match self.fetcher.fetch(&url).await {
                Ok(response) if response.is_success() => {
                    report.cached.push(url.to_string());
                    self.storage.open(&self.config.cache_name).put(response);
                }
                Ok(response) => {
                    warn!("资源 {} 返回状态 {}，未缓存", url, response.status);
                    report
                        .failed
                        .push((url.to_string(), format!("HTTP {}", response.status)));
                }
                Err(e) => {
                    warn!("资源 {} 获取失败: {}", url, e);
                    report.failed.push((url.to_string(), e.to_string()));
                }
            }
        }

        // 即使一个资源都没取到，也要留下这个命名缓存
        self.storage.open(&self.config.cache_name);
        self.storage
            .persist(&self.config.cache_name)
            .await
            .with_context(|| format!("离线缓存 {} 写入磁盘失败", self.config.cache_name))?;

        info!(
            "离线缓存安装完成: {} 个成功, {} 个失败",
            report.cached.len(),
            report.failed.len()
        );
        Ok(report)
    }

    async fn fetch(&self, url: &str) -> Result<FetchOutcome> {
        let url = offline::resolve_url(&self.config.origin, url)?;

        if let Some(cached) = self.storage.match_url(url.as_str()) {
            return Ok(FetchOutcome {
                source: ResponseSource::Cache,
                response: cached.clone(),
            });
        }

        // 回落到网络的响应不写入缓存
        let response = self.fetcher.fetch(&url).await?;
        Ok(FetchOutcome {
            source: ResponseSource::Network,
            response,
        })
    }
}

/// 离线缓存Handle
#[derive(Clone)]
pub struct OfflineCacheHandle {
    sender: mpsc::Sender<OfflineCacheCommand>,
}

impl OfflineCacheHandle {
    /// 安装（预取资源清单）
    pub async fn install(&self) -> Result<InstallReport> {
        let (reply, rx) = oneshot::channel();
        self.sender
            .send(OfflineCacheCommand::Install { reply })
            .await
            .map_err(|_| anyhow::anyhow!("离线缓存Actor已停止"))?;
        rx.await?
    }

    /// 拦截请求：缓存优先，未命中时走网络
    pub async fn fetch(&self, url: impl Into<String>) -> Result<FetchOutcome> {
        let (reply, rx) = oneshot::channel();
        self.sender
            .send(OfflineCacheCommand::Fetch {
                url: url.into(),
                reply,
            })
            .await
            .map_err(|_| anyhow::anyhow!("离线缓存Actor已停止"))?;
        rx.await?
    }

    pub async fn cached_urls(&self, cache_name: impl Into<String>) -> Vec<String> {
        let (reply, rx) = oneshot::channel();
        let cmd = OfflineCacheCommand::CachedUrls {
            cache_name: cache_name.into(),
            reply,
        };
        if self.sender.send(cmd).await.is_err() {
            return Vec::new();
        }
        rx.await.unwrap_or_default()
    }
}
