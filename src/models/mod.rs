// 数据模型模块 - 定义所有的数据结构

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// 界面提示文案
pub mod messages {
    pub const API_KEY_REQUIRED: &str = "設定からAPIキーを入力してください";
    pub const API_KEY_EMPTY: &str = "APIキーを入力してください";
    pub const SAVED: &str = "保存しました";
    pub const NO_TEXT: &str = "文字が認識できませんでした";
    pub const ERROR_PREFIX: &str = "エラーが発生しました: ";
    pub const REQUEST_FAILED: &str = "API request failed";
}

/// 主界面（三者互斥）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    Initial,
    Loading,
    Result,
}

impl View {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::Loading => "loading",
            Self::Result => "result",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "initial" => Ok(Self::Initial),
            "loading" => Ok(Self::Loading),
            "result" => Ok(Self::Result),
            other => Err(format!("未知的界面: {}", other)),
        }
    }
}

/// 浮层（与主界面独立）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modal {
    Settings,
}

/// 保存状态类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    Success,
    Error,
}

/// API Key 输入框下方的状态提示
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveStatus {
    pub kind: StatusKind,
    pub message: String,
}

impl SaveStatus {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.kind == StatusKind::Success
    }
}

/// 一张结果卡片：拼音在上，原文在下
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedLine {
    /// 原始行文本（未裁剪）
    pub text: String,
    /// 带声调符号的拼音
    pub pinyin: String,
}

/// 界面状态快照
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UiSnapshot {
    pub view: View,
    pub settings_open: bool,
    pub toast: Option<String>,
    pub api_key_input: String,
    pub api_key_masked: bool,
    pub save_status: Option<SaveStatus>,
    pub camera_selection: Option<PathBuf>,
    pub cards: Vec<AnnotatedLine>,
}

impl UiSnapshot {
    /// 当前输入框中应显示的文本（掩码时以圆点代替）
    pub fn api_key_display(&self) -> String {
        if self.api_key_masked {
            "•".repeat(self.api_key_input.chars().count())
        } else {
            self.api_key_input.clone()
        }
    }
}

impl Default for UiSnapshot {
    fn default() -> Self {
        Self {
            view: View::Initial,
            settings_open: false,
            toast: None,
            api_key_input: String::new(),
            api_key_masked: true,
            save_status: None,
            camera_selection: None,
            cards: Vec::new(),
        }
    }
}
