//! 文件系统路径工具
//!
//! 提供跨平台的数据目录和日志目录

use std::path::PathBuf;

const APP_DIR_NAME: &str = "pinyin-camera";

fn home_dir() -> PathBuf {
    PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
}

/// 获取数据目录路径（跨平台）
///
/// - macOS: ~/Library/Application Support/pinyin-camera
/// - Windows: %APPDATA%/pinyin-camera
/// - Linux: ~/.local/share/pinyin-camera
pub fn get_app_data_dir() -> PathBuf {
    if cfg!(target_os = "macos") {
        home_dir().join("Library/Application Support").join(APP_DIR_NAME)
    } else if cfg!(target_os = "windows") {
        let appdata = std::env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(appdata).join(APP_DIR_NAME)
    } else {
        home_dir().join(".local/share").join(APP_DIR_NAME)
    }
}

/// 获取日志目录路径（跨平台）
///
/// - macOS: ~/Library/Logs/pinyin-camera
/// - Windows: %APPDATA%/pinyin-camera/logs
/// - Linux: ~/.local/share/pinyin-camera/logs
pub fn get_log_dir() -> PathBuf {
    if cfg!(target_os = "macos") {
        home_dir().join("Library/Logs").join(APP_DIR_NAME)
    } else {
        get_app_data_dir().join("logs")
    }
}
