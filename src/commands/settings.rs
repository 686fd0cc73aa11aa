//! 设置命令 - 查看和保存 API Key

use anyhow::{bail, Result};

use crate::actors::AppHandle;
use crate::models::{messages, SaveStatus};

/// 返回输入框中的 API Key（默认以圆点掩码）
pub async fn show_api_key(handle: &AppHandle, reveal: bool) -> Result<String> {
    handle.open_settings().await;
    if reveal {
        handle.toggle_api_key_visibility().await;
    }
    let snapshot = handle.snapshot().await;
    handle.close_settings().await;

    if snapshot.api_key_input.is_empty() {
        bail!(messages::API_KEY_REQUIRED);
    }
    Ok(snapshot.api_key_display())
}

/// 保存 API Key，返回输入框下方的状态提示
pub async fn set_api_key(handle: &AppHandle, key: String) -> Result<SaveStatus> {
    handle.open_settings().await;
    handle.save_settings(key).await;
    match handle.snapshot().await.save_status {
        Some(status) => Ok(status),
        None => bail!("保存状态缺失"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actors::AppActor;
    use crate::config::RuntimeConfig;
    use crate::AppState;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_set_and_show_api_key() {
        let dir = tempdir().unwrap();
        let config = RuntimeConfig::with_overrides(Some(dir.path().to_path_buf()), None);
        let state = AppState::new(&config, reqwest::Client::new()).await.unwrap();
        let (actor, handle) = AppActor::new(state);
        tokio::spawn(actor.run());

        assert!(show_api_key(&handle, false).await.is_err());

        let status = set_api_key(&handle, "   ".to_string()).await.unwrap();
        assert!(!status.is_success());
        assert_eq!(status.message, messages::API_KEY_EMPTY);

        let status = set_api_key(&handle, "  abc123 ".to_string()).await.unwrap();
        assert!(status.is_success());
        assert_eq!(status.message, messages::SAVED);
        // 同一会话里输入框保持原样
        assert_eq!(show_api_key(&handle, true).await.unwrap(), "  abc123 ");

        // 重新启动后加载的是裁剪后的值
        let state = AppState::new(&config, reqwest::Client::new()).await.unwrap();
        let (actor, handle) = AppActor::new(state);
        tokio::spawn(actor.run());
        assert_eq!(show_api_key(&handle, false).await.unwrap(), "••••••");
        assert_eq!(show_api_key(&handle, true).await.unwrap(), "abc123");

        let stored = std::fs::read_to_string(config.storage_path()).unwrap();
        assert!(stored.contains("\"gcv_api_key\""));
        assert!(stored.contains("abc123"));
    }
}
