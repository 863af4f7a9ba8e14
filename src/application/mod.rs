//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（TtsEngine、AudioCodec、SegmentStorage）
//! - commands: 朗读命令及处理器
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;

// Re-exports
pub use commands::{
    handlers::{
        AudioMerger, MergeConfig, MergeSummary, NarrateConfig, NarrateHandler, SpeechSynthesizer,
        DEFAULT_SILENCE_MS,
    },
    NarrateCommand, NarrateResponse,
};

pub use error::{ApplicationError, MergeError};

pub use ports::{
    // Audio codec
    AudioCodecPort,
    CodecError,
    EncodeConfig,
    // Segment storage
    SegmentStoragePort,
    StorageError,
    // TTS engine
    SynthesisRequest,
    SynthesisResponse,
    TtsEnginePort,
    TtsError,
};
