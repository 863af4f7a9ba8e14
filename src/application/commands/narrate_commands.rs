//! Narration Commands - 朗读命令

use std::path::PathBuf;

use crate::domain::narration::RunId;

/// 把整篇文本合成为一个音频文件
#[derive(Debug, Clone)]
pub struct NarrateCommand {
    /// 完整输入文本
    pub text: String,
    /// 输出 MP3 路径（已存在则覆盖）
    pub output_path: PathBuf,
}

impl NarrateCommand {
    pub fn new(text: impl Into<String>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            text: text.into(),
            output_path: output_path.into(),
        }
    }
}

/// 运行结果
#[derive(Debug, Clone)]
pub struct NarrateResponse {
    pub run_id: RunId,
    /// 非空行数
    pub segments: usize,
    /// 成功合成并拼接的片段数
    pub synthesized: usize,
    /// 合成失败被丢弃的片段索引（升序）
    pub dropped: Vec<usize>,
    pub output_path: PathBuf,
    /// 输出音频时长（毫秒）
    pub duration_ms: u64,
}
