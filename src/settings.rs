// 设置存储 - API Key 保存在本地 JSON 键值文件中

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::models::{messages, SaveStatus};

/// API Key 在本地存储中的键名
pub const API_KEY_STORAGE_KEY: &str = "gcv_api_key";

/// 本地键值存储（JSON 对象文件，字符串键值）
pub struct LocalStorage {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl LocalStorage {
    pub async fn open(path: PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let entries = match tokio::fs::read(&path).await {
            Ok(bytes) if !bytes.is_empty() => {
                serde_json::from_slice::<BTreeMap<String, String>>(&bytes).unwrap_or_else(|e| {
                    warn!("本地存储文件无法解析，按空存储处理: {}", e);
                    BTreeMap::new()
                })
            }
            _ => BTreeMap::new(),
        };

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn get_item(&self, key: &str) -> Option<String> {
        self.entries.read().await.get(key).cloned()
    }

    pub async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), value.to_string());
        let json = serde_json::to_string_pretty(&*entries)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }
}

/// 设置管理器 - 保存 OCR 服务的 API Key
pub struct SettingsManager {
    storage: LocalStorage,
    api_key: RwLock<String>,
}

impl SettingsManager {
    /// 打开存储并加载已保存的 API Key（没有则为空字符串）
    pub async fn new(path: PathBuf) -> Result<Self> {
        let storage = LocalStorage::open(path).await?;
        let api_key = storage
            .get_item(API_KEY_STORAGE_KEY)
            .await
            .unwrap_or_default();

        if api_key.is_empty() {
            info!("尚未配置 API Key");
        }

        Ok(Self {
            storage,
            api_key: RwLock::new(api_key),
        })
    }

    pub async fn api_key(&self) -> String {
        self.api_key.read().await.clone()
    }

    /// 保存 API Key
    ///
    /// 输入裁剪后为空时返回错误状态，已保存的值保持不变
    pub async fn save_api_key(&self, candidate: &str) -> Result<SaveStatus> {
        let key = candidate.trim();
        if key.is_empty() {
            return Ok(SaveStatus::error(messages::API_KEY_EMPTY));
        }

        let mut current = self.api_key.write().await;
        self.storage.set_item(API_KEY_STORAGE_KEY, key).await?;
        *current = key.to_string();
        info!("API Key 已保存到 {:?}", self.storage.path());

        Ok(SaveStatus::success(messages::SAVED))
    }
}
