//! Narration Context - Entities

use std::path::{Path, PathBuf};

/// 输入片段 - 最小合成单位
///
/// 不变量:
/// - index 是过滤空行之后的位置，决定最终拼接顺序
/// - text 已去除首尾空白且不为空
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    index: usize,
    text: String,
}

impl Segment {
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// 规范化后的片段
///
/// text 可以为空（例如整行都是标记），是否能合成由 TTS 服务决定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedSegment {
    index: usize,
    text: String,
}

impl NormalizedSegment {
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// 单个片段的合成音频
///
/// 指向临时存储中的文件，拼接后立即删除
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioArtifact {
    index: usize,
    path: PathBuf,
}

impl AudioArtifact {
    pub fn new(index: usize, path: PathBuf) -> Self {
        Self { index, path }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
