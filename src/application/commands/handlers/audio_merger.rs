//! AudioMerger - 有序拼接

use std::path::Path;
use std::sync::Arc;

use crate::application::error::MergeError;
use crate::application::ports::{AudioCodecPort, EncodeConfig, SegmentStoragePort};
use crate::domain::narration::{AudioArtifact, PcmAudio};

/// 片段之间的静音间隔（毫秒）
pub const DEFAULT_SILENCE_MS: u64 = 300;

/// 没有任何片段时输出音频的采样率
pub const FALLBACK_SAMPLE_RATE: u32 = 24000;

/// 拼接配置
#[derive(Debug, Clone)]
pub struct MergeConfig {
    /// 每个片段之后追加的静音时长
    pub silence_ms: u64,
    /// 输出采样率，None 表示沿用第一个片段的采样率
    pub sample_rate: Option<u32>,
    /// MP3 编码配置
    pub encode: EncodeConfig,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            silence_ms: DEFAULT_SILENCE_MS,
            sample_rate: None,
            encode: EncodeConfig::default(),
        }
    }
}

/// 拼接结果
#[derive(Debug, Clone)]
pub struct MergeSummary {
    /// 拼接的片段数
    pub clips: usize,
    /// 输出时长（毫秒）
    pub duration_ms: u64,
}

/// 音频拼接器
///
/// 按给定顺序解码、追加片段和静音；每个产物追加后立即删除其临时文件
pub struct AudioMerger {
    codec: Arc<dyn AudioCodecPort>,
    storage: Arc<dyn SegmentStoragePort>,
    config: MergeConfig,
}

impl AudioMerger {
    pub fn new(
        codec: Arc<dyn AudioCodecPort>,
        storage: Arc<dyn SegmentStoragePort>,
        config: MergeConfig,
    ) -> Self {
        Self {
            codec,
            storage,
            config,
        }
    }

    /// 拼接并写出 MP3
    ///
    /// 输入为空时写出一个空音频文件
    pub async fn merge(
        &self,
        artifacts: Vec<AudioArtifact>,
        output_path: &Path,
    ) -> Result<MergeSummary, MergeError> {
        let mut merged: Option<PcmAudio> = None;
        let mut clips = 0;

        for artifact in artifacts {
            let data = self.storage.read(artifact.path()).await?;
            let extension = artifact.path().extension().and_then(|ext| ext.to_str());

            let clip = self
                .codec
                .decode(&data, extension)
                .map_err(|source| MergeError::Decode {
                    index: artifact.index(),
                    source,
                })?;

            let accumulator = merged.get_or_insert_with(|| {
                PcmAudio::empty(self.config.sample_rate.unwrap_or(clip.sample_rate()))
            });
            accumulator.append(&clip);
            let silence = PcmAudio::silence(self.config.silence_ms, accumulator.sample_rate());
            accumulator.append(&silence);

            self.storage.remove(artifact.path()).await?;
            clips += 1;

            tracing::debug!(
                segment_index = artifact.index(),
                clip_ms = clip.duration_ms(),
                "Segment appended"
            );
        }

        let merged = merged.unwrap_or_else(|| {
            PcmAudio::empty(self.config.sample_rate.unwrap_or(FALLBACK_SAMPLE_RATE))
        });

        let encoded = self
            .codec
            .encode_mp3(&merged, &self.config.encode)
            .map_err(MergeError::Encode)?;

        tokio::fs::write(output_path, &encoded)
            .await
            .map_err(|source| MergeError::Output {
                path: output_path.to_path_buf(),
                source,
            })?;

        tracing::debug!(
            clips,
            duration_ms = merged.duration_ms(),
            output_size = encoded.len(),
            "Merged audio written"
        );

        Ok(MergeSummary {
            clips,
            duration_ms: merged.duration_ms(),
        })
    }
}
