//! MP3 Codec - 基于 symphonia 解码、LAME 编码
//!
//! 支持：
//! - MP3 / WAV 解码（symphonia 自动探测容器）
//! - 多声道混为单声道
//! - PCM → MP3 编码（mp3lame-encoder）

use mp3lame_encoder::{Bitrate, Builder, FlushNoGap, MonoPcm};
use std::io::Cursor;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::application::ports::{AudioCodecPort, CodecError, EncodeConfig};
use crate::domain::narration::PcmAudio;

/// LAME 支持的 CBR 比特率
pub const SUPPORTED_BITRATES_KBPS: &[u32] = &[
    8, 16, 24, 32, 40, 48, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320,
];

/// LAME 支持的输出采样率（Hz）
pub const SUPPORTED_SAMPLE_RATES: &[u32] = &[
    8000, 11025, 12000, 16000, 22050, 24000, 32000, 44100, 48000,
];

fn lame_bitrate(kbps: u32) -> Result<Bitrate, CodecError> {
    let bitrate = match kbps {
        8 => Bitrate::Kbps8,
        16 => Bitrate::Kbps16,
        24 => Bitrate::Kbps24,
        32 => Bitrate::Kbps32,
        40 => Bitrate::Kbps40,
        48 => Bitrate::Kbps48,
        64 => Bitrate::Kbps64,
        80 => Bitrate::Kbps80,
        96 => Bitrate::Kbps96,
        112 => Bitrate::Kbps112,
        128 => Bitrate::Kbps128,
        160 => Bitrate::Kbps160,
        192 => Bitrate::Kbps192,
        224 => Bitrate::Kbps224,
        256 => Bitrate::Kbps256,
        320 => Bitrate::Kbps320,
        other => {
            return Err(CodecError::InvalidInput(format!(
                "Unsupported MP3 bitrate: {} kbps",
                other
            )))
        }
    };
    Ok(bitrate)
}

/// MP3 编解码器
#[derive(Debug, Default)]
pub struct Mp3Codec;

impl Mp3Codec {
    pub fn new() -> Self {
        Self
    }
}

impl AudioCodecPort for Mp3Codec {
    fn decode(&self, data: &[u8], extension: Option<&str>) -> Result<PcmAudio, CodecError> {
        if data.is_empty() {
            return Err(CodecError::InvalidInput("Empty audio data".to_string()));
        }

        let cursor = Cursor::new(data.to_vec());
        let mss = MediaSourceStream::new(Box::new(cursor), Default::default());

        let mut hint = Hint::new();
        if let Some(ext) = extension {
            hint.with_extension(ext);
        }

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| CodecError::DecodingError(format!("Probe failed: {}", e)))?;

        let mut format = probed.format;

        let track = format
            .default_track()
            .ok_or_else(|| CodecError::DecodingError("No audio track found".to_string()))?;

        let mut decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .map_err(|e| CodecError::DecodingError(format!("Decoder creation failed: {}", e)))?;

        let track_id = track.id;
        let mut sample_rate = track.codec_params.sample_rate;
        let mut channels = track.codec_params.channels.map(|c| c.count());
        let mut samples: Vec<f32> = Vec::new();

        loop {
            let packet = match format.next_packet() {
                Ok(p) => p,
                Err(symphonia::core::errors::Error::IoError(e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    break;
                }
                Err(symphonia::core::errors::Error::ResetRequired) => break,
                Err(e) => {
                    return Err(CodecError::DecodingError(format!(
                        "Packet read error: {}",
                        e
                    )));
                }
            };

            if packet.track_id() != track_id {
                continue;
            }

            let decoded = match decoder.decode(&packet) {
                Ok(d) => d,
                Err(e) => {
                    tracing::warn!("Decode error (skipping packet): {}", e);
                    continue;
                }
            };

            let spec = *decoded.spec();
            sample_rate = Some(spec.rate);
            channels = Some(spec.channels.count());

            let num_frames = decoded.frames();
            let mut sample_buf = SampleBuffer::<f32>::new(num_frames as u64, spec);
            sample_buf.copy_interleaved_ref(decoded);
            let actual_samples = num_frames * spec.channels.count();
            samples.extend(&sample_buf.samples()[..actual_samples]);
        }

        let sample_rate = sample_rate
            .filter(|&rate| rate > 0)
            .ok_or_else(|| CodecError::DecodingError("Unknown sample rate".to_string()))?;
        let channels = channels.unwrap_or(1).min(u8::MAX as usize) as u8;

        Ok(PcmAudio::from_interleaved(&samples, sample_rate, channels))
    }

    fn encode_mp3(&self, pcm: &PcmAudio, config: &EncodeConfig) -> Result<Vec<u8>, CodecError> {
        let mut builder = Builder::new().ok_or_else(|| {
            CodecError::EncodingError("Failed to create LAME encoder".to_string())
        })?;
        builder
            .set_num_channels(1)
            .map_err(|e| CodecError::EncodingError(format!("Failed to set channels: {:?}", e)))?;
        builder.set_sample_rate(pcm.sample_rate()).map_err(|e| {
            CodecError::EncodingError(format!(
                "Unsupported sample rate {}: {:?}",
                pcm.sample_rate(),
                e
            ))
        })?;
        builder
            .set_brate(lame_bitrate(config.bitrate_kbps)?)
            .map_err(|e| CodecError::EncodingError(format!("Failed to set bitrate: {:?}", e)))?;

        let mut encoder = builder
            .build()
            .map_err(|e| CodecError::EncodingError(format!("Failed to init LAME: {:?}", e)))?;

        let samples = pcm.to_i16();
        let mut mp3 = Vec::new();

        if !samples.is_empty() {
            encoder
                .encode_to_vec(MonoPcm(&samples), &mut mp3)
                .map_err(|e| CodecError::EncodingError(format!("MP3 encode failed: {:?}", e)))?;
        }

        encoder
            .flush_to_vec::<FlushNoGap>(&mut mp3)
            .map_err(|e| CodecError::EncodingError(format!("MP3 flush failed: {:?}", e)))?;

        tracing::debug!(
            samples = samples.len(),
            sample_rate = pcm.sample_rate(),
            bitrate_kbps = config.bitrate_kbps,
            mp3_size = mp3.len(),
            "Encoded to MP3"
        );

        Ok(mp3)
    }
}
