// 资源获取 - 网络地址走 HTTP，file:// 地址直接读磁盘

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::{header::CONTENT_TYPE, Client, Url};
use tracing::debug;

use super::CachedResponse;

#[async_trait]
pub trait AssetFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<CachedResponse>;
}

pub struct NetworkFetcher {
    client: Client,
}

impl NetworkFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    async fn fetch_file(&self, url: &Url) -> Result<CachedResponse> {
        let mut path = url
            .to_file_path()
            .map_err(|_| anyhow!("无效的文件地址: {}", url))?;
        let is_dir = tokio::fs::metadata(&path)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false);
        if url.path().ends_with('/') || is_dir {
            path = path.join("index.html");
        }

        let body = tokio::fs::read(&path)
            .await
            .with_context(|| format!("读取本地资源失败: {:?}", path))?;
        let content_type = path
            .extension()
            .and_then(|e| e.to_str())
            .map(content_type_for_extension)
            .map(str::to_string);

        Ok(CachedResponse {
            url: url.to_string(),
            status: 200,
            content_type,
            body,
            stored_at: Utc::now(),
        })
    }

    async fn fetch_http(&self, url: &Url) -> Result<CachedResponse> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?.to_vec();

        Ok(CachedResponse {
            url: url.to_string(),
            status,
            content_type,
            body,
            stored_at: Utc::now(),
        })
    }
}

#[async_trait]
impl AssetFetcher for NetworkFetcher {
    async fn fetch(&self, url: &Url) -> Result<CachedResponse> {
        debug!("获取资源: {}", url);
        if url.scheme() == "file" {
            self.fetch_file(url).await
        } else {
            self.fetch_http(url).await
        }
    }
}

fn content_type_for_extension(ext: &str) -> &'static str {
    match ext.to_ascii_lowercase().as_str() {
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "js" => "text/javascript",
        "json" => "application/json",
        "png" => "image/png",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockServer;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_fetch_local_directory_serves_index() {
        let dir = tempdir().unwrap();
        tokio::fs::write(dir.path().join("index.html"), "<html></html>").await.unwrap();

        let origin = Url::from_directory_path(dir.path()).unwrap();
        let fetcher = NetworkFetcher::new(Client::new());

        let index = fetcher.fetch(&origin).await.unwrap();
        assert_eq!(index.body, b"<html></html>");
        assert_eq!(index.content_type.as_deref(), Some("text/html"));

        let missing = fetcher.fetch(&origin.join("style.css").unwrap()).await;
        assert!(missing.is_err());
    }

    #[tokio::test]
    async fn test_fetch_http_keeps_status() {
        let server = MockServer::start().await;
        server.respond("/style.css", 200, "text/css", "body{}");

        let fetcher = NetworkFetcher::new(Client::new());
        let ok = fetcher
            .fetch(&Url::parse(&server.url("/style.css")).unwrap())
            .await
            .unwrap();
        assert!(ok.is_success());
        assert_eq!(ok.content_type.as_deref(), Some("text/css"));

        let missing = fetcher
            .fetch(&Url::parse(&server.url("/nope")).unwrap())
            .await
            .unwrap();
        assert_eq!(missing.status, 404);
    }
}
