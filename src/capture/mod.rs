// 图片获取模块 - 读取拍摄/选择的图片并编码为 base64

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use base64::{engine::general_purpose, Engine as _};
use image::ImageFormat;
use regex::Regex;
use tracing::debug;

use crate::error::CaptureError;

/// 相机输入控件，保存当前选中的文件
#[derive(Debug, Default)]
pub struct CameraInput {
    selection: Option<PathBuf>,
}

impl CameraInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, file: Option<PathBuf>) {
        self.selection = file;
    }

    pub fn selection(&self) -> Option<&Path> {
        self.selection.as_deref()
    }

    /// 清空选择，以便再次选择同一文件
    pub fn clear(&mut self) {
        self.selection = None;
    }
}

/// 读入内存的原始图片
pub struct CapturedImage {
    bytes: Vec<u8>,
    mime_type: &'static str,
}

impl CapturedImage {
    pub async fn read(path: &Path) -> Result<Self, CaptureError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| CaptureError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self::from_bytes(bytes))
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        let mime_type = image::guess_format(&bytes)
            .map(mime_type_of)
            .unwrap_or("application/octet-stream");
        Self { bytes, mime_type }
    }

    pub fn byte_count(&self) -> usize {
        self.bytes.len()
    }

    pub fn mime_type(&self) -> &'static str {
        self.mime_type
    }

    /// 生成 `data:<mime>;base64,<payload>` 形式的 URL
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime_type,
            general_purpose::STANDARD.encode(&self.bytes)
        )
    }
}

fn mime_type_of(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Png => "image/png",
        ImageFormat::Jpeg => "image/jpeg",
        ImageFormat::Gif => "image/gif",
        ImageFormat::WebP => "image/webp",
        ImageFormat::Bmp => "image/bmp",
        ImageFormat::Tiff => "image/tiff",
        _ => "application/octet-stream",
    }
}

/// base64 编码后的图片内容（不含 data URL 前缀）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage(String);

impl EncodedImage {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&CapturedImage> for EncodedImage {
    fn from(image: &CapturedImage) -> Self {
        let data_url = image.to_data_url();
        Self(strip_data_url_prefix(&data_url).to_string())
    }
}

/// 去掉 `data:...,` 前缀；没有前缀时原样返回
pub fn strip_data_url_prefix(value: &str) -> &str {
    static PREFIX: OnceLock<Regex> = OnceLock::new();
    let prefix = PREFIX.get_or_init(|| Regex::new(r"^data:[^,]*,").expect("valid regex"));
    match prefix.find(value) {
        Some(m) => &value[m.end()..],
        None => value,
    }
}

/// 读取文件并编码为 base64
pub async fn capture_to_base64(path: &Path) -> Result<EncodedImage, CaptureError> {
    let image = CapturedImage::read(path).await?;
    debug!(
        "已读取图片 {:?}: {} 字节, 类型 {}",
        path,
        image.byte_count(),
        image.mime_type()
    );
    Ok(EncodedImage::from(&image))
}
