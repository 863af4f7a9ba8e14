//! Domain Layer - 领域层
//!
//! 包含:
//! - Narration Context: 片段、音色、音频产物
//! - 纯函数组件: 分段、文本规范化、语音选择

pub mod narration;

mod text_normalizer;
mod text_segmenter;
mod voice_selector;

pub use text_normalizer::{default_rules, NormalizationRule, TextNormalizer};
pub use text_segmenter::segment_text;
pub use voice_selector::VoiceSelector;
