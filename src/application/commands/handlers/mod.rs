//! Command Handlers 实现
//!
//! - SpeechSynthesizer: 单片段合成
//! - AudioMerger: 有序拼接与编码
//! - NarrateHandler: 流水线编排

mod audio_merger;
mod narrate_handler;
mod speech_synthesizer;

pub use audio_merger::*;
pub use narrate_handler::*;
pub use speech_synthesizer::*;

#[cfg(test)]
pub(crate) mod test_support;
