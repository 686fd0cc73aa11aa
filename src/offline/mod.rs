// 离线缓存模块 - 安装时预取固定资源清单，之后优先从缓存返回
//
// 缓存按名称分组，每个缓存持久化为 `<root>/<cache_name>.json`
// 只有修改 CACHE_NAME 才会让旧缓存失效（旧文件不会自动删除）

pub mod fetcher;

pub use fetcher::{AssetFetcher, NetworkFetcher};

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use anyhow::Result;
use chrono::{DateTime, Utc};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// 缓存名称，升级版本号即可清除旧缓存
pub const CACHE_NAME: &str = "pinyin-camera-v1";

/// 安装时预取的资源
pub const ASSETS: &[&str] = &[
    "./",
    "./index.html",
    "./style.css",
    "./script.js",
    "./manifest.json",
    "https://cdn-icons-png.flaticon.com/512/1628/1628441.png",
    "https://fonts.googleapis.com/css2?family=Inter:wght@400;500;700&family=Noto+Sans+TC:wght@400;500;700&display=swap",
    "https://fonts.googleapis.com/icon?family=Material+Icons+Round",
    "https://unpkg.com/pinyin-pro",
];

pub fn default_assets() -> Vec<String> {
    ASSETS.iter().map(|s| s.to_string()).collect()
}

/// 相对地址按页面来源解析为绝对地址
pub fn resolve_url(origin: &Url, url: &str) -> Result<Url> {
    Ok(origin.join(url)?)
}

/// 一条缓存的响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedResponse {
    pub url: String,
    pub status: u16,
    pub content_type: Option<String>,
    #[serde(with = "body_base64")]
    pub body: Vec<u8>,
    pub stored_at: DateTime<Utc>,
}

impl CachedResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

mod body_base64 {
    use base64::{engine::general_purpose, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(body: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&general_purpose::STANDARD.encode(body))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(deserializer)?;
        general_purpose::STANDARD
            .decode(text)
            .map_err(serde::de::Error::custom)
    }
}

/// 单个命名缓存
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Cache {
    entries: HashMap<String, CachedResponse>,
}

impl Cache {
    pub fn put(&mut self, response: CachedResponse) {
        self.entries.insert(response.url.clone(), response);
    }

    pub fn get(&self, url: &str) -> Option<&CachedResponse> {
        self.entries.get(url)
    }

    pub fn urls(&self) -> Vec<String> {
        let mut urls: Vec<String> = self.entries.keys().cloned().collect();
        urls.sort();
        urls
    }
}

/// 全部命名缓存
pub struct CacheStorage {
    root: Option<PathBuf>,
    caches: BTreeMap<String, Cache>,
}

impl CacheStorage {
    /// 仅存在于内存中的缓存
    pub fn in_memory() -> Self {
        Self {
            root: None,
            caches: BTreeMap::new(),
        }
    }

    /// 从目录加载所有已持久化的缓存
    pub async fn open_dir(root: PathBuf) -> Result<Self> {
        tokio::fs::create_dir_all(&root).await?;

        let mut caches = BTreeMap::new();
        let mut dir = tokio::fs::read_dir(&root).await?;
        while let Some(entry) = dir.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else {
                continue;
            };
            let loaded = tokio::fs::read(&path)
                .await
                .map(|bytes| serde_json::from_slice::<Cache>(&bytes));
            match loaded {
                Ok(Ok(cache)) => {
                    caches.insert(name, cache);
                }
                Ok(Err(e)) => warn!("缓存文件 {:?} 无法解析，已跳过: {}", path, e),
                Err(e) => warn!("读取缓存文件 {:?} 失败: {}", path, e),
            }
        }

        info!("已加载 {} 个离线缓存", caches.len());
        Ok(Self {
            root: Some(root),
            caches,
        })
    }

    /// 打开（不存在则创建）命名缓存
    pub fn open(&mut self, name: &str) -> &mut Cache {
        self.caches.entry(name.to_string()).or_default()
    }

    pub fn get(&self, name: &str) -> Option<&Cache> {
        self.caches.get(name)
    }

    pub fn cache_names(&self) -> Vec<String> {
        self.caches.keys().cloned().collect()
    }

    /// 在所有缓存中查找
    pub fn match_url(&self, url: &str) -> Option<&CachedResponse> {
        self.caches.values().find_map(|cache| cache.get(url))
    }

    /// 将命名缓存写回磁盘（内存模式下不做任何事）
    pub async fn persist(&self, name: &str) -> Result<()> {
        let (Some(root), Some(cache)) = (&self.root, self.caches.get(name)) else {
            return Ok(());
        };
        let json = serde_json::to_vec(cache)?;
        tokio::fs::write(root.join(format!("{}.json", name)), json).await?;
        Ok(())
    }
}
