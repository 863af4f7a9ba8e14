//! Fake TTS Client - 离线 TTS 客户端
//!
//! 不调用网络服务，返回固定音频（指定文件或生成的静音 WAV）

use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;

use crate::application::ports::{SynthesisRequest, SynthesisResponse, TtsEnginePort, TtsError};

/// Fake TTS Client 配置
#[derive(Debug, Clone)]
pub struct FakeTtsClientConfig {
    /// 固定返回的音频文件路径，None 时生成静音 WAV
    pub audio_file_path: Option<PathBuf>,
    /// 生成音频的时长（毫秒）
    pub duration_ms: u64,
    /// 生成音频的采样率
    pub sample_rate: u32,
    /// 模拟合成延迟（毫秒）
    pub delay_ms: u64,
    /// 文本包含该标记时返回错误
    pub fail_marker: Option<String>,
}

impl Default for FakeTtsClientConfig {
    fn default() -> Self {
        Self {
            audio_file_path: None,
            duration_ms: 500,
            sample_rate: 24000,
            delay_ms: 0,
            fail_marker: None,
        }
    }
}

/// 生成单声道 16 位静音 WAV
fn silent_wav(duration_ms: u64, sample_rate: u32) -> Vec<u8> {
    let bits_per_sample: u16 = 16;
    let num_channels: u16 = 1;
    let byte_rate = sample_rate * num_channels as u32 * (bits_per_sample / 8) as u32;
    let block_align = num_channels * (bits_per_sample / 8);

    let num_samples = (sample_rate as u64 * duration_ms / 1000) as usize;
    let data_size = num_samples * 2;
    let file_size = 36 + data_size;

    let mut wav = Vec::with_capacity(44 + data_size);

    // RIFF header
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(file_size as u32).to_le_bytes());
    wav.extend_from_slice(b"WAVE");

    // fmt chunk
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes()); // chunk size
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM format
    wav.extend_from_slice(&num_channels.to_le_bytes());
    wav.extend_from_slice(&sample_rate.to_le_bytes());
    wav.extend_from_slice(&byte_rate.to_le_bytes());
    wav.extend_from_slice(&block_align.to_le_bytes());
    wav.extend_from_slice(&bits_per_sample.to_le_bytes());

    // data chunk
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&(data_size as u32).to_le_bytes());
    wav.resize(44 + data_size, 0);

    wav
}

/// Fake TTS Client
///
/// 用于离线运行和测试
pub struct FakeTtsClient {
    config: FakeTtsClientConfig,
    /// 缓存的音频数据
    audio_data: Vec<u8>,
    extension: String,
}

impl FakeTtsClient {
    /// 创建新的 FakeTtsClient
    pub fn new(config: FakeTtsClientConfig) -> Result<Self, std::io::Error> {
        let (audio_data, extension) = match &config.audio_file_path {
            Some(path) => {
                let data = std::fs::read(path)?;
                let extension = path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .unwrap_or("mp3")
                    .to_string();
                (data, extension)
            }
            None => (
                silent_wav(config.duration_ms, config.sample_rate),
                "wav".to_string(),
            ),
        };

        tracing::info!(
            path = ?config.audio_file_path,
            audio_size = audio_data.len(),
            "FakeTtsClient initialized"
        );

        Ok(Self {
            config,
            audio_data,
            extension,
        })
    }

    /// 使用默认配置创建
    pub fn with_defaults() -> Result<Self, std::io::Error> {
        Self::new(FakeTtsClientConfig::default())
    }
}

#[async_trait]
impl TtsEnginePort for FakeTtsClient {
    async fn synthesize(&self, request: SynthesisRequest) -> Result<SynthesisResponse, TtsError> {
        tracing::debug!(
            text_len = request.text.len(),
            voice = %request.voice_id,
            "FakeTtsClient: returning fixed audio"
        );

        if self.config.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.delay_ms)).await;
        }

        if let Some(marker) = &self.config.fail_marker {
            if request.text.contains(marker.as_str()) {
                return Err(TtsError::ServiceError(format!(
                    "text contains failure marker {:?}",
                    marker
                )));
            }
        }

        Ok(SynthesisResponse {
            audio_data: self.audio_data.clone(),
            extension: self.extension.clone(),
        })
    }
}
