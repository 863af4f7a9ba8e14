//! Linguo - 双语文档朗读
//!
//! 架构设计: Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - 分段、规范化、音色选择（纯函数）
//! - Narration: 片段、音频产物、PCM 值对象
//!
//! 应用层 (application/):
//! - Ports: TtsEngine, AudioCodec, SegmentStorage
//! - Commands: NarrateHandler 流水线编排
//!
//! 基础设施层 (infrastructure/):
//! - Adapters: HTTP / Fake TTS Client, MP3 Codec, 文件片段存储

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
