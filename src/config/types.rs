//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

use crate::application::{EncodeConfig, MergeConfig, NarrateConfig};

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// TTS 引擎配置
    #[serde(default)]
    pub tts: TtsConfig,

    /// 音色配置
    #[serde(default)]
    pub voices: VoiceConfig,

    /// 音频配置
    #[serde(default)]
    pub audio: AudioConfig,

    /// 流水线配置
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

impl AppConfig {
    /// 流水线运行参数
    pub fn narrate_config(&self) -> NarrateConfig {
        NarrateConfig {
            max_concurrent: (self.pipeline.max_concurrent > 0)
                .then_some(self.pipeline.max_concurrent),
            merge: MergeConfig {
                silence_ms: self.audio.silence_ms,
                sample_rate: (self.audio.sample_rate > 0).then_some(self.audio.sample_rate),
                encode: EncodeConfig {
                    bitrate_kbps: self.audio.bitrate_kbps,
                },
            },
        }
    }
}

/// TTS 服务类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TtsProvider {
    /// 外部 HTTP TTS 服务
    #[default]
    Http,
    /// 离线固定音频
    Fake,
}

impl std::fmt::Display for TtsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TtsProvider::Http => write!(f, "http"),
            TtsProvider::Fake => write!(f, "fake"),
        }
    }
}

/// TTS 引擎配置
#[derive(Debug, Clone, Deserialize)]
pub struct TtsConfig {
    /// 服务类型
    #[serde(default)]
    pub provider: TtsProvider,

    /// TTS 服务基础 URL
    #[serde(default = "default_tts_url")]
    pub url: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_tts_timeout")]
    pub timeout_secs: u64,

    /// fake 模式下返回的音频文件，未设置时生成静音
    #[serde(default)]
    pub fake_audio_path: Option<PathBuf>,
}

fn default_tts_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_tts_timeout() -> u64 {
    120
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            provider: TtsProvider::default(),
            url: default_tts_url(),
            timeout_secs: default_tts_timeout(),
            fake_audio_path: None,
        }
    }
}

/// 音色配置
///
/// script_a: 阿拉伯字母（波斯语）音色，平局时使用
/// script_b: 拉丁字母（英语）音色
#[derive(Debug, Clone, Deserialize)]
pub struct VoiceConfig {
    #[serde(default = "default_script_a_voice")]
    pub script_a: String,

    #[serde(default = "default_script_b_voice")]
    pub script_b: String,
}

fn default_script_a_voice() -> String {
    "fa-IR-DilaraNeural".to_string()
}

fn default_script_b_voice() -> String {
    "en-US-JennyNeural".to_string()
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            script_a: default_script_a_voice(),
            script_b: default_script_b_voice(),
        }
    }
}

/// 音频配置
#[derive(Debug, Clone, Deserialize)]
pub struct AudioConfig {
    /// 片段之间的静音（毫秒）
    #[serde(default = "default_silence_ms")]
    pub silence_ms: u64,

    /// MP3 比特率（kbps）
    #[serde(default = "default_bitrate_kbps")]
    pub bitrate_kbps: u32,

    /// 输出采样率（Hz），0 表示沿用第一个片段
    #[serde(default)]
    pub sample_rate: u32,
}

fn default_silence_ms() -> u64 {
    300
}

fn default_bitrate_kbps() -> u32 {
    128
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            silence_ms: default_silence_ms(),
            bitrate_kbps: default_bitrate_kbps(),
            sample_rate: 0,
        }
    }
}

/// 流水线配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PipelineConfig {
    /// 最大并发合成数，0 表示不限制
    #[serde(default)]
    pub max_concurrent: usize,

    /// 临时文件目录，未设置时使用系统临时目录
    #[serde(default)]
    pub work_dir: Option<PathBuf>,
}

impl PipelineConfig {
    pub fn work_dir(&self) -> PathBuf {
        self.work_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}
