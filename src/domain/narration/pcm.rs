//! PCM 音频缓冲
//!
//! 拼接用的内存表示：单声道 f32 样本

/// 单声道 PCM 音频
#[derive(Debug, Clone, PartialEq)]
pub struct PcmAudio {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl PcmAudio {
    /// 空音频
    pub fn empty(sample_rate: u32) -> Self {
        Self {
            samples: Vec::new(),
            sample_rate,
        }
    }

    /// 单声道样本
    pub fn mono(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// 从交错多声道样本创建，各声道取平均混为单声道
    pub fn from_interleaved(samples: &[f32], sample_rate: u32, channels: u8) -> Self {
        let channels = channels.max(1) as usize;
        if channels == 1 {
            return Self::mono(samples.to_vec(), sample_rate);
        }

        let mixed = samples
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
            .collect();

        Self::mono(mixed, sample_rate)
    }

    /// 指定时长的静音
    pub fn silence(duration_ms: u64, sample_rate: u32) -> Self {
        let frames = (sample_rate as u64 * duration_ms / 1000) as usize;
        Self::mono(vec![0.0; frames], sample_rate)
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// 时长（毫秒）
    pub fn duration_ms(&self) -> u64 {
        if self.sample_rate == 0 {
            return 0;
        }
        self.samples.len() as u64 * 1000 / self.sample_rate as u64
    }

    /// 追加另一段音频，采样率不同时先重采样到当前采样率
    pub fn append(&mut self, other: &PcmAudio) {
        if other.sample_rate == self.sample_rate {
            self.samples.extend_from_slice(&other.samples);
        } else {
            let resampled = other.resampled(self.sample_rate);
            self.samples.extend(resampled.samples);
        }
    }

    /// 简单线性重采样
    pub fn resampled(&self, to_rate: u32) -> PcmAudio {
        if to_rate == self.sample_rate || self.samples.is_empty() || self.sample_rate == 0 {
            return Self::mono(self.samples.clone(), to_rate);
        }

        let ratio = to_rate as f64 / self.sample_rate as f64;
        let frame_count = self.samples.len();
        let new_frame_count = (frame_count as f64 * ratio) as usize;
        let mut resampled = Vec::with_capacity(new_frame_count);

        for i in 0..new_frame_count {
            let src_pos = i as f64 / ratio;
            let src_idx = src_pos as usize;
            let frac = src_pos - src_idx as f64;

            let s0 = self.samples.get(src_idx).copied().unwrap_or(0.0);
            let s1 = self
                .samples
                .get((src_idx + 1).min(frame_count - 1))
                .copied()
                .unwrap_or(s0);

            // 线性插值
            resampled.push(s0 + (s1 - s0) * frac as f32);
        }

        Self::mono(resampled, to_rate)
    }

    /// 转换为 i16 样本（编码器输入）
    pub fn to_i16(&self) -> Vec<i16> {
        self.samples
            .iter()
            .map(|&s| (s.clamp(-1.0, 1.0) * 32767.0) as i16)
            .collect()
    }
}
