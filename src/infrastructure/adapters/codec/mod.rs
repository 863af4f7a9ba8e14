//! Codec Adapter - 音频编解码实现

mod mp3_codec;

pub use mp3_codec::{Mp3Codec, SUPPORTED_BITRATES_KBPS, SUPPORTED_SAMPLE_RATES};
