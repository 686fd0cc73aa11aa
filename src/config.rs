// 运行配置 - 数据目录、识别服务地址和离线缓存参数

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use reqwest::Url;

use crate::offline::CACHE_NAME;
use crate::ocr::DEFAULT_VISION_ENDPOINT;
use crate::utils;

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// 数据目录（本地存储文件和离线缓存都在这里）
    pub data_dir: PathBuf,
    /// 日志目录
    pub log_dir: PathBuf,
    /// 文字识别服务地址
    pub vision_endpoint: String,
    /// 离线缓存名称
    pub cache_name: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            data_dir: utils::get_app_data_dir(),
            log_dir: utils::get_log_dir(),
            vision_endpoint: DEFAULT_VISION_ENDPOINT.to_string(),
            cache_name: CACHE_NAME.to_string(),
        }
    }
}

impl RuntimeConfig {
    /// 以命令行参数覆盖默认值
    pub fn with_overrides(data_dir: Option<PathBuf>, endpoint: Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(dir) = data_dir {
            config.log_dir = dir.join("logs");
            config.data_dir = dir;
        }
        if let Some(endpoint) = endpoint {
            config.vision_endpoint = endpoint;
        }
        config
    }

    /// 本地存储文件
    pub fn storage_path(&self) -> PathBuf {
        self.data_dir.join("storage.json")
    }

    /// 离线缓存目录
    pub fn cache_dir(&self) -> PathBuf {
        self.data_dir.join("caches")
    }
}

/// 解析页面来源；未指定时使用当前目录
pub fn resolve_origin(origin: Option<&str>) -> Result<Url> {
    match origin {
        Some(value) => {
            let mut url = Url::parse(value)?;
            // 来源必须以 `/` 结尾，相对资源才会解析到它下面
            if !url.path().ends_with('/') {
                let path = format!("{}/", url.path());
                url.set_path(&path);
            }
            Ok(url)
        }
        None => {
            let cwd = std::env::current_dir()?;
            Url::from_directory_path(&cwd)
                .map_err(|_| anyhow!("无法将当前目录转换为地址: {:?}", cwd))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides() {
        let config = RuntimeConfig::with_overrides(
            Some(PathBuf::from("/tmp/pc")),
            Some("http://localhost/annotate".to_string()),
        );
        assert_eq!(config.storage_path(), PathBuf::from("/tmp/pc/storage.json"));
        assert_eq!(config.cache_dir(), PathBuf::from("/tmp/pc/caches"));
        assert_eq!(config.log_dir, PathBuf::from("/tmp/pc/logs"));
        assert_eq!(config.vision_endpoint, "http://localhost/annotate");
        assert_eq!(config.cache_name, CACHE_NAME);
    }

    #[test]
    fn test_resolve_origin_adds_trailing_slash() {
        let url = resolve_origin(Some("https://example.com/app")).unwrap();
        assert_eq!(url.as_str(), "https://example.com/app/");
        assert_eq!(url.join("./style.css").unwrap().as_str(), "https://example.com/app/style.css");

        let cwd = resolve_origin(None).unwrap();
        assert_eq!(cwd.scheme(), "file");
        assert!(cwd.path().ends_with('/'));
    }
}
