// OCR 模块 - 调用外部文字识别服务

pub mod vision;

pub use vision::{VisionClient, DEFAULT_VISION_ENDPOINT};

use async_trait::async_trait;

use crate::capture::EncodedImage;
use crate::error::OcrError;

/// 文字识别提供商
#[async_trait]
pub trait OcrProvider: Send + Sync {
    /// 识别图片中的文字
    ///
    /// # 参数
    /// * `image` - base64 编码的图片
    /// * `api_key` - 服务凭证（调用方保证非空）
    ///
    /// # 返回
    /// * `Some(text)` - 识别出的完整文本
    /// * `None` - 图片中没有文字
    async fn recognize_text(
        &self,
        image: &EncodedImage,
        api_key: &str,
    ) -> Result<Option<String>, OcrError>;
}
