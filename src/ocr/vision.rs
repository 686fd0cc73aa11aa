// Google Cloud Vision 文字识别实现

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::OcrProvider;
use crate::capture::EncodedImage;
use crate::error::OcrError;
use crate::models::messages;

pub const DEFAULT_VISION_ENDPOINT: &str = "https://vision.googleapis.com/v1/images:annotate";

/// 繁体中文识别提示
const LANGUAGE_HINT: &str = "zh-Hant";
const FEATURE_TEXT_DETECTION: &str = "TEXT_DETECTION";

#[derive(Debug, Serialize)]
struct AnnotateRequest<'a> {
    requests: Vec<AnnotateImageRequest<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateImageRequest<'a> {
    image: ImageContent<'a>,
    features: Vec<Feature>,
    image_context: ImageContext,
}

#[derive(Debug, Serialize)]
struct ImageContent<'a> {
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct Feature {
    #[serde(rename = "type")]
    feature_type: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageContext {
    language_hints: Vec<&'static str>,
}

#[derive(Debug, Default, Deserialize)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<AnnotateImageResponse>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateImageResponse {
    #[serde(default)]
    text_annotations: Option<Vec<EntityAnnotation>>,
    #[serde(default)]
    error: Option<Status>,
}

#[derive(Debug, Deserialize)]
struct EntityAnnotation {
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<Status>,
}

#[derive(Debug, Deserialize)]
struct Status {
    #[serde(default)]
    message: Option<String>,
}

fn build_request(image: &EncodedImage) -> AnnotateRequest<'_> {
    AnnotateRequest {
        requests: vec![AnnotateImageRequest {
            image: ImageContent {
                content: image.as_str(),
            },
            features: vec![Feature {
                feature_type: FEATURE_TEXT_DETECTION,
            }],
            image_context: ImageContext {
                language_hints: vec![LANGUAGE_HINT],
            },
        }],
    }
}

/// 从错误响应体中取出 `error.message`
fn parse_error_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error)
        .and_then(|status| status.message)
        .filter(|message| !message.is_empty())
}

/// 取第一张图片结果中的第一条文字标注（即完整文本）
fn extract_full_text(response: AnnotateResponse) -> Result<Option<String>, OcrError> {
    let Some(first) = response.responses.into_iter().next() else {
        return Ok(None);
    };

    if let Some(message) = first.error.and_then(|status| status.message) {
        return Err(OcrError::Api(message));
    }

    Ok(first
        .text_annotations
        .and_then(|annotations| annotations.into_iter().next())
        .and_then(|annotation| annotation.description))
}

/// Vision API 客户端
#[derive(Clone)]
pub struct VisionClient {
    client: Client,
    endpoint: String,
}

impl VisionClient {
    /// 创建客户端（接受共享的HTTP客户端以复用连接池）
    pub fn with_endpoint(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl OcrProvider for VisionClient {
    async fn recognize_text(
        &self,
        image: &EncodedImage,
        api_key: &str,
    ) -> Result<Option<String>, OcrError> {
        info!("发送文字识别请求: {} 字节", image.as_str().len());

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", api_key)])
            .json(&build_request(image))
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let message = parse_error_message(&body)
                .unwrap_or_else(|| messages::REQUEST_FAILED.to_string());
            warn!("文字识别请求失败 ({}): {}", status, message);
            return Err(OcrError::Api(message));
        }

        let parsed: AnnotateResponse = serde_json::from_slice(&body)?;
        let text = extract_full_text(parsed)?;
        match &text {
            Some(text) => debug!("识别到 {} 个字符", text.chars().count()),
            None => info!("图片中未检测到文字"),
        }
        Ok(text)
    }
}
