// 注音模块 - 按行拆分识别结果并生成拼音卡片

pub mod converter;

pub use converter::PinyinConverter;

use crate::models::AnnotatedLine;

/// 文本转拼音能力
pub trait PhoneticConverter: Send + Sync {
    /// 输出带声调符号的拼音
    fn to_phonetic(&self, text: &str) -> String;
}

/// 按 `\n` 拆分，丢弃裁剪后为空的行，保留原始顺序和原始文本
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split('\n')
        .filter(|line| !line.trim().is_empty())
        .collect()
}

/// 文本中是否至少有一行非空白内容
pub fn has_visible_lines(text: &str) -> bool {
    text.split('\n').any(|line| !line.trim().is_empty())
}

/// 为每一行生成卡片
pub fn annotate(text: &str, converter: &dyn PhoneticConverter) -> Vec<AnnotatedLine> {
    split_lines(text)
        .into_iter()
        .map(|line| AnnotatedLine {
            pinyin: converter.to_phonetic(line),
            text: line.to_string(),
        })
        .collect()
}
