//! Narrate Handler - 朗读流水线编排
//!
//! 分段 → 规范化 → 并发合成 → 按索引收集 → 拼接

use futures_util::future::join_all;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::Instrument;

use crate::application::commands::handlers::{AudioMerger, MergeConfig, SpeechSynthesizer};
use crate::application::commands::narrate_commands::*;
use crate::application::error::ApplicationError;
use crate::application::ports::{AudioCodecPort, SegmentStoragePort, TtsEnginePort};
use crate::domain::narration::{AudioArtifact, NormalizedSegment, RunId};
use crate::domain::{segment_text, TextNormalizer, VoiceSelector};

/// 流水线配置
#[derive(Debug, Clone, Default)]
pub struct NarrateConfig {
    /// 最大并发合成数，None 表示不限制（所有片段同时发起）
    pub max_concurrent: Option<usize>,
    /// 拼接配置
    pub merge: MergeConfig,
}

/// Narrate Handler - 把整篇文本合成为一个音频文件
pub struct NarrateHandler {
    normalizer: TextNormalizer,
    voice_selector: VoiceSelector,
    synthesizer: SpeechSynthesizer,
    merger: AudioMerger,
    storage: Arc<dyn SegmentStoragePort>,
    max_concurrent: Option<usize>,
}

impl NarrateHandler {
    pub fn new(
        normalizer: TextNormalizer,
        voice_selector: VoiceSelector,
        tts_engine: Arc<dyn TtsEnginePort>,
        codec: Arc<dyn AudioCodecPort>,
        storage: Arc<dyn SegmentStoragePort>,
        config: NarrateConfig,
    ) -> Self {
        Self {
            normalizer,
            voice_selector,
            synthesizer: SpeechSynthesizer::new(tts_engine, storage.clone()),
            merger: AudioMerger::new(codec, storage.clone(), config.merge),
            storage,
            max_concurrent: config.max_concurrent.filter(|&n| n > 0),
        }
    }

    /// 使用默认规则表构建
    pub fn with_default_rules(
        voice_selector: VoiceSelector,
        tts_engine: Arc<dyn TtsEnginePort>,
        codec: Arc<dyn AudioCodecPort>,
        storage: Arc<dyn SegmentStoragePort>,
        config: NarrateConfig,
    ) -> Result<Self, ApplicationError> {
        Ok(Self::new(
            TextNormalizer::new()?,
            voice_selector,
            tts_engine,
            codec,
            storage,
            config,
        ))
    }

    pub async fn handle(&self, cmd: NarrateCommand) -> Result<NarrateResponse, ApplicationError> {
        let run_id = RunId::new();
        let span = tracing::info_span!("narrate", run_id = %run_id);
        self.run(run_id, cmd).instrument(span).await
    }

    async fn run(
        &self,
        run_id: RunId,
        cmd: NarrateCommand,
    ) -> Result<NarrateResponse, ApplicationError> {
        let normalized: Vec<NormalizedSegment> = segment_text(&cmd.text)
            .iter()
            .map(|segment| {
                NormalizedSegment::new(segment.index(), self.normalizer.normalize(segment.text()))
            })
            .collect();

        tracing::info!(
            segments = normalized.len(),
            max_concurrent = ?self.max_concurrent,
            "Processing {} segments...",
            normalized.len()
        );

        if !normalized.is_empty() && !self.synthesizer.health_check().await {
            tracing::warn!("TTS service health check failed, continuing anyway");
        }

        let results = self.synthesize_all(run_id, &normalized).await;

        let mut dropped = Vec::new();
        let mut artifacts: Vec<AudioArtifact> = Vec::with_capacity(results.len());
        for (segment, result) in normalized.iter().zip(results) {
            match result {
                Some(artifact) => artifacts.push(artifact),
                None => dropped.push(segment.index()),
            }
        }
        // 拼接顺序只由片段索引决定，与完成顺序无关
        artifacts.sort_by_key(|artifact| artifact.index());

        if !dropped.is_empty() {
            tracing::warn!(
                dropped = ?dropped,
                "{} of {} segments failed and were dropped",
                dropped.len(),
                normalized.len()
            );
        }

        tracing::info!(clips = artifacts.len(), "Stitching audio segments...");
        let merge_result = self.merger.merge(artifacts, &cmd.output_path).await;

        match self.storage.cleanup_run(run_id).await {
            Ok(0) => {}
            Ok(removed) => tracing::debug!(removed, "Removed leftover segment files"),
            Err(e) => tracing::warn!(error = %e, "Failed to clean up segment storage"),
        }

        let summary = merge_result?;

        tracing::info!(
            output = %cmd.output_path.display(),
            duration_ms = summary.duration_ms,
            "Successfully created: {}",
            cmd.output_path.display()
        );

        Ok(NarrateResponse {
            run_id,
            segments: normalized.len(),
            synthesized: summary.clips,
            dropped,
            output_path: cmd.output_path,
            duration_ms: summary.duration_ms,
        })
    }

    /// 并发合成所有片段，结果与输入一一对应
    ///
    /// 所有 future 在同一个任务里被轮询，只在网络 I/O 处挂起
    async fn synthesize_all(
        &self,
        run_id: RunId,
        segments: &[NormalizedSegment],
    ) -> Vec<Option<AudioArtifact>> {
        let gate = self.max_concurrent.map(Semaphore::new);

        let tasks = segments.iter().map(|segment| {
            let voice = self.voice_selector.select(segment.text());
            let gate = gate.as_ref();

            async move {
                let _permit = match gate {
                    Some(semaphore) => semaphore.acquire().await.ok(),
                    None => None,
                };

                tracing::debug!(
                    segment_index = segment.index(),
                    voice = %voice,
                    "Synthesizing segment"
                );

                self.synthesizer.synthesize(run_id, segment, voice).await
            }
        });

        join_all(tasks).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::commands::handlers::test_support::{
        ByteCodec, MemoryStorage, ScriptedTts,
    };
    use crate::application::error::MergeError;
    use tempfile::tempdir;

    struct Fixture {
        tts: Arc<ScriptedTts>,
        storage: Arc<MemoryStorage>,
        handler: NarrateHandler,
    }

    fn fixture(tts: ScriptedTts, codec: ByteCodec, max_concurrent: Option<usize>) -> Fixture {
        fixture_with_storage(tts, codec, MemoryStorage::new(), max_concurrent)
    }

    fn fixture_with_storage(
        tts: ScriptedTts,
        codec: ByteCodec,
        storage: MemoryStorage,
        max_concurrent: Option<usize>,
    ) -> Fixture {
        let tts = Arc::new(tts);
        let storage = Arc::new(storage);
        let handler = NarrateHandler::new(
            TextNormalizer::new().unwrap(),
            VoiceSelector::new("voice-fa".into(), "voice-en".into()),
            tts.clone(),
            Arc::new(codec),
            storage.clone(),
            NarrateConfig {
                max_concurrent,
                merge: MergeConfig::default(),
            },
        );
        Fixture {
            tts,
            storage,
            handler,
        }
    }

    fn clip_texts(output: &std::path::Path) -> Vec<String> {
        let data = std::fs::read(output).unwrap();
        ByteCodec::split_output(&data)
            .into_iter()
            .map(|(text, silence)| {
                assert_eq!(silence, 300);
                text
            })
            .collect()
    }

    #[tokio::test]
    async fn test_blank_lines_and_markup() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("out.mp3");
        let f = fixture(ScriptedTts::new(), ByteCodec::new(), None);

        let response = f
            .handler
            .handle(NarrateCommand::new("# Hello\n\nWorld", &output))
            .await
            .unwrap();

        assert_eq!(response.segments, 2);
        assert_eq!(response.synthesized, 2);
        assert!(response.dropped.is_empty());
        assert_eq!(clip_texts(&output), vec!["Hello", "World"]);
    }

    #[tokio::test]
    async fn test_order_preserved_regardless_of_completion() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("out.mp3");
        // 前面的片段最慢完成
        let tts = ScriptedTts::new()
            .with_delay("first", 60)
            .with_delay("second", 30)
            .with_delay("third", 1);
        let f = fixture(tts, ByteCodec::new(), None);

        f.handler
            .handle(NarrateCommand::new("first\nsecond\nthird", &output))
            .await
            .unwrap();

        assert_eq!(clip_texts(&output), vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_failed_segment_dropped_without_gap() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("out.mp3");
        let f = fixture(ScriptedTts::new().failing_on("two"), ByteCodec::new(), None);

        let response = f
            .handler
            .handle(NarrateCommand::new("one\ntwo\nthree", &output))
            .await
            .unwrap();

        assert_eq!(response.segments, 3);
        assert_eq!(response.synthesized, 2);
        assert_eq!(response.dropped, vec![1]);

        let data = std::fs::read(&output).unwrap();
        assert_eq!(
            ByteCodec::split_output(&data),
            vec![("one".to_string(), 300), ("three".to_string(), 300)]
        );
    }

    #[tokio::test]
    async fn test_store_failure_dropped_without_gap() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("out.mp3");
        let f = fixture_with_storage(
            ScriptedTts::new(),
            ByteCodec::new(),
            MemoryStorage::new().failing_save_on(1),
            None,
        );

        let response = f
            .handler
            .handle(NarrateCommand::new("one\ntwo\nthree", &output))
            .await
            .unwrap();

        assert_eq!(response.synthesized, 2);
        assert_eq!(response.dropped, vec![1]);
        assert_eq!(clip_texts(&output), vec!["one", "three"]);
        assert_eq!(f.storage.file_count(), 0);
    }

    #[tokio::test]
    async fn test_all_segments_fail_writes_empty_audio() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("out.mp3");
        let tts = ScriptedTts::new().failing_on("a").failing_on("b");
        let f = fixture(tts, ByteCodec::new(), None);

        let response = f
            .handler
            .handle(NarrateCommand::new("a\nb", &output))
            .await
            .unwrap();

        assert_eq!(response.synthesized, 0);
        assert_eq!(response.dropped, vec![0, 1]);
        assert!(std::fs::read(&output).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_voice_selected_per_segment() {
        let dir = tempdir().unwrap();
        let f = fixture(ScriptedTts::new(), ByteCodec::new(), None);

        f.handler
            .handle(NarrateCommand::new(
                "سلام دنیا\nhello world\nسلامت hello",
                dir.path().join("out.mp3"),
            ))
            .await
            .unwrap();

        let mut calls = f.tts.calls();
        calls.sort();
        let mut expected = vec![
            ("سلام دنیا".to_string(), "voice-fa".to_string()),
            ("hello world".to_string(), "voice-en".to_string()),
            ("سلامت hello".to_string(), "voice-fa".to_string()),
        ];
        expected.sort();
        assert_eq!(calls, expected);
    }

    #[tokio::test]
    async fn test_unbounded_fan_out() {
        let dir = tempdir().unwrap();
        let text = (0..8).map(|i| format!("line {}", i)).collect::<Vec<_>>().join("\n");
        let f = fixture(ScriptedTts::new(), ByteCodec::new(), None);

        f.handler
            .handle(NarrateCommand::new(text, dir.path().join("out.mp3")))
            .await
            .unwrap();

        assert_eq!(f.tts.max_in_flight(), 8);
    }

    #[tokio::test]
    async fn test_concurrency_gate_keeps_order() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("out.mp3");
        let text = (0..6).map(|i| format!("line {}", i)).collect::<Vec<_>>().join("\n");
        let f = fixture(ScriptedTts::new(), ByteCodec::new(), Some(2));

        f.handler
            .handle(NarrateCommand::new(text, &output))
            .await
            .unwrap();

        assert!(f.tts.max_in_flight() <= 2);
        let expected: Vec<String> = (0..6).map(|i| format!("line {}", i)).collect();
        assert_eq!(clip_texts(&output), expected);
    }

    #[tokio::test]
    async fn test_storage_cleaned_after_merge_error() {
        let dir = tempdir().unwrap();
        let f = fixture(ScriptedTts::new(), ByteCodec::rejecting(b'!'), None);

        let err = f
            .handler
            .handle(NarrateCommand::new("ok\nbroken!\nlater", dir.path().join("out.mp3")))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ApplicationError::Merge(MergeError::Decode { index: 1, .. })
        ));
        assert_eq!(f.storage.file_count(), 0);
    }

    #[tokio::test]
    async fn test_default_rules_constructor() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("out.mp3");
        let handler = NarrateHandler::with_default_rules(
            VoiceSelector::new("voice-fa".into(), "voice-en".into()),
            Arc::new(ScriptedTts::new()),
            Arc::new(ByteCodec::new()),
            Arc::new(MemoryStorage::new()),
            NarrateConfig::default(),
        )
        .unwrap();

        handler
            .handle(NarrateCommand::new("**bold**", &output))
            .await
            .unwrap();

        assert_eq!(clip_texts(&output), vec!["bold"]);
    }

    #[test]
    fn test_invalid_rule_maps_to_application_error() {
        let err = crate::domain::NormalizationRule::template("(", "").unwrap_err();
        assert!(matches!(
            ApplicationError::from(err),
            ApplicationError::InvalidRule(_)
        ));
    }

    #[tokio::test]
    async fn test_empty_document() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("out.mp3");
        let f = fixture(ScriptedTts::new(), ByteCodec::new(), None);

        let response = f
            .handler
            .handle(NarrateCommand::new("\n  \n", &output))
            .await
            .unwrap();

        assert_eq!(response.segments, 0);
        assert!(f.tts.calls().is_empty());
        assert!(output.exists());
    }
}
