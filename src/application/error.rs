//! 应用层错误定义
//!
//! 合成失败在片段级别被吸收，只有拼接/编码和初始化错误会向上传播

use std::path::PathBuf;
use thiserror::Error;

use crate::application::ports::{CodecError, StorageError};

/// 拼接错误
#[derive(Debug, Error)]
pub enum MergeError {
    /// 产物解码失败（损坏的音频等）
    #[error("Failed to decode segment {index}: {source}")]
    Decode {
        index: usize,
        #[source]
        source: CodecError,
    },

    /// 最终 MP3 编码失败
    #[error("Failed to encode output: {0}")]
    Encode(#[source] CodecError),

    /// 临时存储读写失败
    #[error("Segment storage error: {0}")]
    Storage(#[from] StorageError),

    /// 输出文件写入失败
    #[error("Failed to write {}: {source}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 拼接阶段失败
    #[error(transparent)]
    Merge(#[from] MergeError),

    /// 规则表无效
    #[error("Invalid normalization rule: {0}")]
    InvalidRule(#[from] regex::Error),
}
