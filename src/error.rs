// 错误类型 - 识别流程中需要区分处理的错误

use std::path::PathBuf;

use thiserror::Error;

/// OCR 请求错误
#[derive(Debug, Error)]
pub enum OcrError {
    /// 服务端返回的错误（或无法解析时的通用提示）
    #[error("{0}")]
    Api(String),

    /// 网络层错误
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// 响应体不是预期的 JSON
    #[error("unexpected response from OCR service: {0}")]
    Decode(#[from] serde_json::Error),
}

/// 一轮拍摄识别中的错误
#[derive(Debug, Error)]
pub enum CaptureError {
    /// 读取图片文件失败
    #[error("failed to read image {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Ocr(#[from] OcrError),
}
