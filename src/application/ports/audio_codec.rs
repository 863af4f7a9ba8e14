//! Audio Codec Port - 音频编解码抽象
//!
//! 合成产物解码为 PCM，拼接结果编码为 MP3

use thiserror::Error;

use crate::domain::narration::PcmAudio;

/// 编解码错误
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Encoding error: {0}")]
    EncodingError(String),

    #[error("Decoding error: {0}")]
    DecodingError(String),
}

/// 编码配置
#[derive(Debug, Clone)]
pub struct EncodeConfig {
    /// 目标比特率（kbps）
    pub bitrate_kbps: u32,
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self { bitrate_kbps: 128 }
    }
}

/// Audio Codec Port
///
/// CPU 密集的同步接口，编解码不会挂起
pub trait AudioCodecPort: Send + Sync {
    /// 解码音频数据（MP3/WAV 等），混为单声道
    ///
    /// `extension` 仅作为容器探测的提示
    fn decode(&self, data: &[u8], extension: Option<&str>) -> Result<PcmAudio, CodecError>;

    /// 编码为 MP3
    fn encode_mp3(&self, pcm: &PcmAudio, config: &EncodeConfig) -> Result<Vec<u8>, CodecError>;
}
