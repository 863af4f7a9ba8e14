//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（linguo.toml）
//! 3. 默认值
//!
//! 命令行参数在 main 中最后覆盖

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::{AppConfig, TtsProvider};
use crate::infrastructure::adapters::{SUPPORTED_BITRATES_KBPS, SUPPORTED_SAMPLE_RATES};

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["linguo", "linguo.local"];

/// 加载应用配置
///
/// # 环境变量示例
/// - `LINGUO_TTS__URL=http://tts-server:8000`
/// - `LINGUO_TTS__PROVIDER=fake`
/// - `LINGUO_VOICES__SCRIPT_A=fa-IR-FaridNeural`
/// - `LINGUO_PIPELINE__MAX_CONCURRENT=8`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("tts.provider", "http")?
        .set_default("tts.url", "http://localhost:8000")?
        .set_default("tts.timeout_secs", 120)?
        .set_default("voices.script_a", "fa-IR-DilaraNeural")?
        .set_default("voices.script_b", "en-US-JennyNeural")?
        .set_default("audio.silence_ms", 300)?
        .set_default("audio.bitrate_kbps", 128)?
        .set_default("audio.sample_rate", 0)?
        .set_default("pipeline.max_concurrent", 0)?
        .set_default("log.level", "info")?;

    // 2. 配置文件
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量（最高优先级）
    // 前缀: LINGUO_
    // 层级分隔符: __ (双下划线)
    builder = builder.add_source(
        Environment::with_prefix("LINGUO")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 应用命令行音色覆盖，并重新验证
pub fn apply_voice_overrides(
    mut config: AppConfig,
    script_a: Option<String>,
    script_b: Option<String>,
) -> Result<AppConfig, ConfigError> {
    if let Some(voice) = script_a {
        config.voices.script_a = voice;
    }
    if let Some(voice) = script_b {
        config.voices.script_b = voice;
    }
    validate_config(&config)?;
    Ok(config)
}

/// 验证配置有效性
pub fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.tts.provider == TtsProvider::Http && config.tts.url.is_empty() {
        return Err(ConfigError::ValidationError(
            "TTS URL cannot be empty".to_string(),
        ));
    }

    if config.tts.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "TTS timeout cannot be 0".to_string(),
        ));
    }

    if config.voices.script_a.trim().is_empty() || config.voices.script_b.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "Voice ids cannot be empty".to_string(),
        ));
    }

    if !SUPPORTED_BITRATES_KBPS.contains(&config.audio.bitrate_kbps) {
        return Err(ConfigError::ValidationError(format!(
            "Unsupported MP3 bitrate {} kbps, expected one of {:?}",
            config.audio.bitrate_kbps, SUPPORTED_BITRATES_KBPS
        )));
    }

    // 0 表示沿用第一个片段的采样率
    if config.audio.sample_rate != 0 && !SUPPORTED_SAMPLE_RATES.contains(&config.audio.sample_rate)
    {
        return Err(ConfigError::ValidationError(format!(
            "Unsupported output sample rate {} Hz, expected 0 or one of {:?}",
            config.audio.sample_rate, SUPPORTED_SAMPLE_RATES
        )));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Linguo Configuration ===");
    tracing::info!("TTS Provider: {}", config.tts.provider);
    match config.tts.provider {
        TtsProvider::Http => {
            tracing::info!("TTS URL: {}", config.tts.url);
            tracing::info!("TTS Timeout: {}s", config.tts.timeout_secs);
        }
        TtsProvider::Fake => {
            tracing::info!("Fake Audio: {:?}", config.tts.fake_audio_path);
        }
    }
    tracing::info!("Voice (Arabic script): {}", config.voices.script_a);
    tracing::info!("Voice (Latin script): {}", config.voices.script_b);
    tracing::info!("Silence Gap: {}ms", config.audio.silence_ms);
    tracing::info!("MP3 Bitrate: {}kbps", config.audio.bitrate_kbps);
    if config.pipeline.max_concurrent > 0 {
        tracing::info!("Max Concurrent: {}", config.pipeline.max_concurrent);
    } else {
        tracing::info!("Max Concurrent: unbounded");
    }
    tracing::info!("Work Directory: {:?}", config.pipeline.work_dir());
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("============================");
}
