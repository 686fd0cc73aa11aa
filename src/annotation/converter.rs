// 基于 pinyin 库的注音实现
//
// 输出格式：每个汉字一个带声调的音节，连续的非汉字原样保留，彼此以单个空格分隔

use pinyin::ToPinyin;

use super::PhoneticConverter;

/// 逐字注音的拼音转换器
///
/// 每个汉字取字典中的第一个读音，不按词语消歧，也不做变调：
/// `銀行` 输出 `yín xíng`，`一個人` 输出 `yī gè rén`。
/// 连续的非汉字（包括英文单词）作为一个整体保留，不拆成单个字母。
#[derive(Debug, Default, Clone, Copy)]
pub struct PinyinConverter;

impl PhoneticConverter for PinyinConverter {
    fn to_phonetic(&self, text: &str) -> String {
        let mut tokens: Vec<String> = Vec::new();
        let mut pending = String::new();

        for ch in text.chars() {
            match ch.to_pinyin() {
                Some(syllable) => {
                    flush(&mut pending, &mut tokens);
                    tokens.push(syllable.with_tone().to_string());
                }
                None if ch.is_whitespace() => flush(&mut pending, &mut tokens),
                None => pending.push(ch),
            }
        }
        flush(&mut pending, &mut tokens);

        tokens.join(" ")
    }
}

fn flush(pending: &mut String, tokens: &mut Vec<String>) {
    if !pending.is_empty() {
        tokens.push(std::mem::take(pending));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_traditional_characters() {
        assert_eq!(PinyinConverter.to_phonetic("中國"), "zhōng guó");
        assert_eq!(PinyinConverter.to_phonetic("你好"), "nǐ hǎo");
    }

    #[test]
    fn test_mixed_text_keeps_non_han_runs() {
        assert_eq!(PinyinConverter.to_phonetic("7-11便利"), "7-11 biàn lì");
        assert_eq!(PinyinConverter.to_phonetic("  好 ok\r"), "hǎo ok");
    }

    #[test]
    fn test_per_character_readings_without_sandhi() {
        assert_eq!(PinyinConverter.to_phonetic("銀行"), "yín xíng");
        assert_eq!(PinyinConverter.to_phonetic("一個人"), "yī gè rén");
        assert_eq!(PinyinConverter.to_phonetic("我very喜欢你"), "wǒ very xǐ huān nǐ");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(PinyinConverter.to_phonetic(""), "");
    }
}
