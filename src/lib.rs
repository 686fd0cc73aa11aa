// 繁体字拼音相机 - 应用主库
//
// 拍照 → Google Cloud Vision 识别繁体中文 → 按行标注拼音 → 卡片展示

pub mod actors;
pub mod annotation;
pub mod app;
pub mod capture;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod event_bus;
pub mod logger;
pub mod models;
pub mod ocr;
pub mod offline;
pub mod settings;
pub mod utils;
pub mod view;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use annotation::{PhoneticConverter, PinyinConverter};
use config::RuntimeConfig;
use event_bus::EventBus;
use ocr::{OcrProvider, VisionClient};
use settings::SettingsManager;

pub use app::run;

/// 应用状态
///
/// 由 App Actor 独占持有，各处理函数通过它访问设置、OCR、注音和事件总线
#[derive(Clone)]
pub struct AppState {
    /// API Key 存储
    pub settings: Arc<SettingsManager>,
    /// 文字识别服务
    pub ocr: Arc<dyn OcrProvider>,
    /// 拼音转换
    pub converter: Arc<dyn PhoneticConverter>,
    /// 事件总线
    pub event_bus: Arc<EventBus>,
}

impl AppState {
    /// 按运行配置组装应用状态
    pub async fn new(config: &RuntimeConfig, client: reqwest::Client) -> anyhow::Result<Self> {
        let settings = SettingsManager::new(config.storage_path()).await?;
        Ok(Self {
            settings: Arc::new(settings),
            ocr: Arc::new(VisionClient::with_endpoint(client, &config.vision_endpoint)),
            converter: Arc::new(PinyinConverter),
            event_bus: Arc::new(EventBus::default()),
        })
    }
}
