//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod audio_codec;
mod segment_storage;
mod tts_engine;

pub use audio_codec::{AudioCodecPort, CodecError, EncodeConfig};
pub use segment_storage::{SegmentStoragePort, StorageError};
pub use tts_engine::{SynthesisRequest, SynthesisResponse, TtsEnginePort, TtsError};
