//! Linguo - 双语文档朗读工具
//!
//! 读取 Markdown/LaTeX 文本，逐行合成语音，拼接为单个 MP3

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use linguo::application::{NarrateCommand, NarrateHandler, TtsEnginePort};
use linguo::config::{
    apply_voice_overrides, load_config_from_path, print_config, AppConfig, TtsProvider,
};
use linguo::domain::narration::VoiceChoice;
use linguo::domain::VoiceSelector;
use linguo::infrastructure::{
    FakeTtsClient, FakeTtsClientConfig, FileSegmentStorage, HttpTtsClient, HttpTtsClientConfig,
    Mp3Codec,
};

#[derive(Debug, Parser)]
#[command(name = "linguo", version, about = "Narrate a bilingual Markdown/LaTeX document to MP3")]
struct Cli {
    /// 输入文本文件
    #[arg(short, long)]
    input: PathBuf,

    /// 输出 MP3 文件
    #[arg(short, long, default_value = "output.mp3")]
    output: PathBuf,

    /// 阿拉伯字母（波斯语）音色
    #[arg(long)]
    voice_fa: Option<String>,

    /// 拉丁字母（英语）音色
    #[arg(long)]
    voice_en: Option<String>,

    /// 配置文件路径
    #[arg(long)]
    config: Option<PathBuf>,
}

fn build_tts_engine(config: &AppConfig) -> anyhow::Result<Arc<dyn TtsEnginePort>> {
    let engine: Arc<dyn TtsEnginePort> = match config.tts.provider {
        TtsProvider::Http => {
            let tts_config = HttpTtsClientConfig::new(config.tts.url.clone())
                .with_timeout(config.tts.timeout_secs);
            Arc::new(HttpTtsClient::new(tts_config)?)
        }
        TtsProvider::Fake => {
            let tts_config = FakeTtsClientConfig {
                audio_file_path: config.tts.fake_audio_path.clone(),
                ..Default::default()
            };
            Arc::new(FakeTtsClient::new(tts_config)?)
        }
    };
    Ok(engine)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 加载配置（优先级：命令行 > 环境变量 > 配置文件 > 默认值）
    let config = load_config_from_path(cli.config.as_deref())
        .and_then(|config| apply_voice_overrides(config, cli.voice_fa, cli.voice_en))
        .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    // 初始化日志
    let log_filter = format!("{},linguo={}", config.log.level, config.log.level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter)),
        )
        .init();

    print_config(&config);

    // 输入文件不存在时直接退出，不做任何处理
    let text = match tokio::fs::read_to_string(&cli.input).await {
        Ok(text) => text,
        Err(e) => {
            tracing::error!(input = %cli.input.display(), error = %e, "Failed to read input file");
            anyhow::bail!("Input file {} could not be read: {}", cli.input.display(), e);
        }
    };

    let tts_engine = build_tts_engine(&config)?;
    let storage = FileSegmentStorage::new(config.pipeline.work_dir())
        .await
        .context("Failed to prepare work directory")?;

    let handler = NarrateHandler::with_default_rules(
        VoiceSelector::new(
            VoiceChoice::new(config.voices.script_a.clone()),
            VoiceChoice::new(config.voices.script_b.clone()),
        ),
        tts_engine,
        Arc::new(Mp3Codec::new()),
        Arc::new(storage),
        config.narrate_config(),
    )?;

    let response = handler
        .handle(NarrateCommand::new(text, cli.output))
        .await?;

    if !response.dropped.is_empty() {
        tracing::warn!(
            "Dropped segments (0-based): {:?}",
            response.dropped
        );
    }
    println!(
        "Successfully created: {} ({} of {} segments, {:.1}s)",
        response.output_path.display(),
        response.synthesized,
        response.segments,
        response.duration_ms as f64 / 1000.0
    );

    Ok(())
}
