//! Narration Context - 朗读限界上下文
//!
//! 职责:
//! - 输入片段与规范化片段
//! - 语音选择结果
//! - 合成产物与 PCM 拼接缓冲

mod entities;
mod pcm;
mod value_objects;

pub use entities::{AudioArtifact, NormalizedSegment, Segment};
pub use pcm::PcmAudio;
pub use value_objects::{RunId, VoiceChoice};
