//! 拍摄识别命令
//!
//! 把图片交给 App Actor，等待这一轮识别结束后输出卡片

use std::path::PathBuf;

use anyhow::{anyhow, bail, Result};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, info};

use crate::actors::AppHandle;
use crate::event_bus::AppEvent;
use crate::models::{messages, AnnotatedLine, Modal, View};

/// 识别一张图片，返回按行标注的卡片
///
/// `events` 需要在调用前订阅，否则可能错过界面切换事件
pub async fn capture_image(
    handle: &AppHandle,
    events: &mut broadcast::Receiver<AppEvent>,
    image: PathBuf,
) -> Result<Vec<AnnotatedLine>> {
    info!("识别图片: {:?}", image);
    handle.select_image(Some(image)).await;

    loop {
        match events.recv().await {
            Ok(AppEvent::ViewChanged { view: View::Result }) => {
                return Ok(handle.snapshot().await.cards);
            }
            Ok(AppEvent::ViewChanged { view: View::Initial }) => {
                let toast = handle.snapshot().await.toast;
                bail!(toast.unwrap_or_else(|| messages::NO_TEXT.to_string()));
            }
            Ok(AppEvent::ModalToggled {
                modal: Modal::Settings,
                visible: true,
            }) => {
                bail!(messages::API_KEY_REQUIRED);
            }
            Ok(event) => debug!("忽略事件: {:?}", event),
            Err(RecvError::Lagged(n)) => debug!("事件接收落后 {} 条", n),
            Err(RecvError::Closed) => return Err(anyhow!("事件总线已关闭")),
        }
    }
}

/// 渲染卡片：拼音在上，原文在下，卡片之间空一行
pub fn render_cards(cards: &[AnnotatedLine], json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(cards)?);
    }
    let blocks: Vec<String> = cards
        .iter()
        .map(|card| format!("{}\n{}", card.pinyin, card.text))
        .collect();
    Ok(blocks.join("\n\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actors::AppActor;
    use crate::annotation::PinyinConverter;
    use crate::capture::EncodedImage;
    use crate::error::OcrError;
    use crate::event_bus::EventBus;
    use crate::ocr::OcrProvider;
    use crate::settings::SettingsManager;
    use crate::AppState;
    use async_trait::async_trait;
    use std::sync::Arc;
    use tempfile::{tempdir, TempDir};

    struct FixedOcr(Result<Option<String>, String>);

    #[async_trait]
    impl OcrProvider for FixedOcr {
        async fn recognize_text(
            &self,
            _image: &EncodedImage,
            _api_key: &str,
        ) -> Result<Option<String>, OcrError> {
            self.0.clone().map_err(OcrError::Api)
        }
    }

    async fn start(
        api_key: Option<&str>,
        reply: Result<Option<String>, String>,
    ) -> (TempDir, AppHandle, broadcast::Receiver<AppEvent>) {
        let dir = tempdir().unwrap();
        let settings = SettingsManager::new(dir.path().join("storage.json"))
            .await
            .unwrap();
        if let Some(key) = api_key {
            settings.save_api_key(key).await.unwrap();
        }
        let state = AppState {
            settings: Arc::new(settings),
            ocr: Arc::new(FixedOcr(reply)),
            converter: Arc::new(PinyinConverter),
            event_bus: Arc::new(EventBus::new(64)),
        };
        let events = state.event_bus.subscribe();
        let (actor, handle) = AppActor::new(state);
        tokio::spawn(actor.run());
        std::fs::write(dir.path().join("photo.jpg"), [0xFF, 0xD8, 0xFF, 0xE0]).unwrap();
        (dir, handle, events)
    }

    #[tokio::test]
    async fn test_capture_returns_cards() {
        let reply = Ok(Some("你好\n世界".to_string()));
        let (dir, handle, mut events) = start(Some("key"), reply).await;

        let cards = capture_image(&handle, &mut events, dir.path().join("photo.jpg"))
            .await
            .unwrap();

        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].pinyin, "nǐ hǎo");
        assert_eq!(
            render_cards(&cards, false).unwrap(),
            "nǐ hǎo\n你好\n\nshì jiè\n世界"
        );
    }

    #[tokio::test]
    async fn test_capture_without_key_fails() {
        let (dir, handle, mut events) = start(None, Ok(Some("你好".to_string()))).await;

        let err = capture_image(&handle, &mut events, dir.path().join("photo.jpg"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), messages::API_KEY_REQUIRED);
    }

    #[tokio::test]
    async fn test_capture_reports_toast_on_failure() {
        let reply = Err("Quota exceeded".to_string());
        let (dir, handle, mut events) = start(Some("key"), reply).await;

        let err = capture_image(&handle, &mut events, dir.path().join("photo.jpg"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "エラーが発生しました: Quota exceeded");

        let (dir, handle, mut events) = start(Some("key"), Ok(None)).await;
        let err = capture_image(&handle, &mut events, dir.path().join("photo.jpg"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), messages::NO_TEXT);
    }

    #[test]
    fn test_render_cards_json() {
        let cards = vec![AnnotatedLine {
            text: "中國".to_string(),
            pinyin: "zhōng guó".to_string(),
        }];
        let json = render_cards(&cards, true).unwrap();
        let parsed: Vec<AnnotatedLine> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, cards);
    }
}
