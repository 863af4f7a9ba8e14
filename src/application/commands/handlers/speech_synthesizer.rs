//! SpeechSynthesizer - 单片段合成

use std::sync::Arc;

use crate::application::ports::{SegmentStoragePort, SynthesisRequest, TtsEnginePort};
use crate::domain::narration::{AudioArtifact, NormalizedSegment, RunId, VoiceChoice};

/// 单片段合成器
///
/// 失败只记录日志并返回 `None`，不向上传播，也不重试
pub struct SpeechSynthesizer {
    tts_engine: Arc<dyn TtsEnginePort>,
    storage: Arc<dyn SegmentStoragePort>,
}

impl SpeechSynthesizer {
    pub fn new(tts_engine: Arc<dyn TtsEnginePort>, storage: Arc<dyn SegmentStoragePort>) -> Self {
        Self {
            tts_engine,
            storage,
        }
    }

    /// 检查 TTS 服务是否可用
    pub async fn health_check(&self) -> bool {
        self.tts_engine.health_check().await
    }

    /// 合成一个片段并写入临时存储
    pub async fn synthesize(
        &self,
        run_id: RunId,
        segment: &NormalizedSegment,
        voice: &VoiceChoice,
    ) -> Option<AudioArtifact> {
        let request = SynthesisRequest {
            text: segment.text().to_string(),
            voice_id: voice.as_str().to_string(),
        };

        let response = match self.tts_engine.synthesize(request).await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::error!(
                    segment_index = segment.index(),
                    voice = %voice,
                    error = %e,
                    "Failed chunk {}: {}",
                    segment.index(),
                    e
                );
                return None;
            }
        };

        match self
            .storage
            .save(
                run_id,
                segment.index(),
                &response.extension,
                &response.audio_data,
            )
            .await
        {
            Ok(path) => {
                tracing::debug!(
                    segment_index = segment.index(),
                    voice = %voice,
                    audio_size = response.audio_data.len(),
                    path = %path.display(),
                    "Segment synthesized"
                );
                Some(AudioArtifact::new(segment.index(), path))
            }
            Err(e) => {
                tracing::error!(
                    segment_index = segment.index(),
                    error = %e,
                    "Failed to store chunk {}: {}",
                    segment.index(),
                    e
                );
                None
            }
        }
    }
}
