//! 语音选择
//!
//! 按文字脚本多数原则为片段选择音色

use super::narration::VoiceChoice;

/// 阿拉伯字母区块 (U+0600–U+06FF)，波斯语也在其中
#[inline]
fn is_arabic_script(ch: char) -> bool {
    ('\u{0600}'..='\u{06FF}').contains(&ch)
}

#[inline]
fn is_latin_letter(ch: char) -> bool {
    ch.is_ascii_alphabetic()
}

/// 语音选择器
///
/// 阿拉伯字母数 >= 拉丁字母数时选择 A 音色，否则选择 B 音色。
/// 相等（包括都为 0）时选 A。
#[derive(Debug, Clone)]
pub struct VoiceSelector {
    script_a: VoiceChoice,
    script_b: VoiceChoice,
}

impl VoiceSelector {
    pub fn new(script_a: VoiceChoice, script_b: VoiceChoice) -> Self {
        Self { script_a, script_b }
    }

    pub fn script_a(&self) -> &VoiceChoice {
        &self.script_a
    }

    pub fn script_b(&self) -> &VoiceChoice {
        &self.script_b
    }

    pub fn select(&self, text: &str) -> &VoiceChoice {
        let (arabic, latin) = text.chars().fold((0usize, 0usize), |(a, l), ch| {
            (
                a + is_arabic_script(ch) as usize,
                l + is_latin_letter(ch) as usize,
            )
        });

        if arabic >= latin {
            &self.script_a
        } else {
            &self.script_b
        }
    }
}
