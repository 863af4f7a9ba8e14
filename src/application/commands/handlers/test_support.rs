//! 测试替身：脚本化 TTS、内存存储、字节编解码器

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::application::ports::{
    AudioCodecPort, CodecError, EncodeConfig, SegmentStoragePort, StorageError, SynthesisRequest,
    SynthesisResponse, TtsEnginePort, TtsError,
};
use crate::domain::narration::{PcmAudio, RunId};

/// 字节编解码器的采样率：1 ms = 1 个样本
pub const BYTE_CODEC_RATE: u32 = 1000;

/// 把文本字节当作“音频”返回的 TTS
#[derive(Default)]
pub struct ScriptedTts {
    failing: HashSet<String>,
    delays_ms: HashMap<String, u64>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedTts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(mut self, text: &str) -> Self {
        self.failing.insert(text.to_string());
        self
    }

    pub fn with_delay(mut self, text: &str, delay_ms: u64) -> Self {
        self.delays_ms.insert(text.to_string(), delay_ms);
        self
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// (text, voice_id) 调用记录
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TtsEnginePort for ScriptedTts {
    async fn synthesize(&self, request: SynthesisRequest) -> Result<SynthesisResponse, TtsError> {
        self.calls
            .lock()
            .unwrap()
            .push((request.text.clone(), request.voice_id.clone()));

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        let delay = self.delays_ms.get(&request.text).copied().unwrap_or(10);
        tokio::time::sleep(Duration::from_millis(delay)).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing.contains(&request.text) {
            return Err(TtsError::ServiceError("scripted failure".to_string()));
        }

        Ok(SynthesisResponse {
            audio_data: request.text.into_bytes(),
            extension: "raw".to_string(),
        })
    }
}

/// 内存片段存储
#[derive(Default)]
pub struct MemoryStorage {
    files: Mutex<HashMap<PathBuf, Vec<u8>>>,
    removed: Mutex<Vec<PathBuf>>,
    failing_saves: HashSet<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// 该片段索引的写入返回 IO 错误
    pub fn failing_save_on(mut self, segment_index: usize) -> Self {
        self.failing_saves.insert(segment_index);
        self
    }

    pub fn file_count(&self) -> usize {
        self.files.lock().unwrap().len()
    }

    pub fn removed(&self) -> Vec<PathBuf> {
        self.removed.lock().unwrap().clone()
    }

    pub fn insert(&self, path: PathBuf, data: Vec<u8>) {
        self.files.lock().unwrap().insert(path, data);
    }
}

#[async_trait]
impl SegmentStoragePort for MemoryStorage {
    fn run_dir(&self, run_id: RunId) -> PathBuf {
        PathBuf::from("mem").join(run_id.to_string())
    }

    fn segment_path(&self, run_id: RunId, segment_index: usize, extension: &str) -> PathBuf {
        self.run_dir(run_id)
            .join(format!("segment_{}.{}", segment_index, extension))
    }

    async fn save(
        &self,
        run_id: RunId,
        segment_index: usize,
        extension: &str,
        data: &[u8],
    ) -> Result<PathBuf, StorageError> {
        if self.failing_saves.contains(&segment_index) {
            return Err(StorageError::IoError("disk full".to_string()));
        }
        let path = self.segment_path(run_id, segment_index, extension);
        self.insert(path.clone(), data.to_vec());
        Ok(path)
    }

    async fn read(&self, path: &Path) -> Result<Vec<u8>, StorageError> {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| StorageError::FileNotFound(path.display().to_string()))
    }

    async fn remove(&self, path: &Path) -> Result<(), StorageError> {
        if self.files.lock().unwrap().remove(path).is_some() {
            self.removed.lock().unwrap().push(path.to_path_buf());
        }
        Ok(())
    }

    async fn cleanup_run(&self, run_id: RunId) -> Result<u64, StorageError> {
        let run_dir = self.run_dir(run_id);
        let mut files = self.files.lock().unwrap();
        let before = files.len();
        files.retain(|path, _| !path.starts_with(&run_dir));
        Ok((before - files.len()) as u64)
    }
}

/// 每个字节对应一个样本的编解码器，便于断言拼接结果
///
/// 字节 0 是静音，文本字节都非 0
#[derive(Default)]
pub struct ByteCodec {
    corrupt_marker: Option<u8>,
}

impl ByteCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// 含有该字节的数据解码失败
    pub fn rejecting(marker: u8) -> Self {
        Self {
            corrupt_marker: Some(marker),
        }
    }

    /// 把编码结果拆成 (片段, 静音长度) 序列
    pub fn split_output(data: &[u8]) -> Vec<(String, usize)> {
        let mut clips = Vec::new();
        let mut i = 0;
        while i < data.len() {
            let start = i;
            while i < data.len() && data[i] != 0 {
                i += 1;
            }
            let text = String::from_utf8_lossy(&data[start..i]).into_owned();
            let silence_start = i;
            while i < data.len() && data[i] == 0 {
                i += 1;
            }
            clips.push((text, i - silence_start));
        }
        clips
    }
}

impl AudioCodecPort for ByteCodec {
    fn decode(&self, data: &[u8], _extension: Option<&str>) -> Result<PcmAudio, CodecError> {
        if let Some(marker) = self.corrupt_marker {
            if data.contains(&marker) {
                return Err(CodecError::DecodingError("corrupt frame".to_string()));
            }
        }
        let samples = data.iter().map(|&b| b as f32 / 255.0).collect();
        Ok(PcmAudio::mono(samples, BYTE_CODEC_RATE))
    }

    fn encode_mp3(&self, pcm: &PcmAudio, _config: &EncodeConfig) -> Result<Vec<u8>, CodecError> {
        Ok(pcm
            .samples()
            .iter()
            .map(|&s| (s * 255.0).round() as u8)
            .collect())
    }
}
