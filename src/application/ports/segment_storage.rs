//! Segment Storage Port - 出站端口
//!
//! 每个片段的临时音频存储，一次运行一个目录

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::narration::RunId;

/// 片段存储错误
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Segment Storage Port
///
/// (run_id, segment_index) 唯一确定一个文件，并发写入互不冲突
#[async_trait]
pub trait SegmentStoragePort: Send + Sync {
    /// 运行的临时目录
    fn run_dir(&self, run_id: RunId) -> PathBuf;

    /// 片段音频的文件路径
    fn segment_path(&self, run_id: RunId, segment_index: usize, extension: &str) -> PathBuf;

    /// 保存片段音频
    async fn save(
        &self,
        run_id: RunId,
        segment_index: usize,
        extension: &str,
        data: &[u8],
    ) -> Result<PathBuf, StorageError>;

    /// 读取音频
    async fn read(&self, path: &Path) -> Result<Vec<u8>, StorageError>;

    /// 删除音频文件（不存在时忽略）
    async fn remove(&self, path: &Path) -> Result<(), StorageError>;

    /// 删除运行目录及其中剩余的文件，返回删除的文件数
    async fn cleanup_run(&self, run_id: RunId) -> Result<u64, StorageError>;
}
