//! File Storage - 文件系统片段存储实现
//!
//! 实现 SegmentStoragePort trait

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::application::ports::{SegmentStoragePort, StorageError};
use crate::domain::narration::RunId;

/// 文件系统片段存储
///
/// 目录结构: `{base_dir}/linguo-{run_id}/segment_{index}.{ext}`
pub struct FileSegmentStorage {
    /// 存储根目录
    base_dir: PathBuf,
}

impl FileSegmentStorage {
    /// 创建新的文件存储
    pub async fn new(base_dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let base_dir = base_dir.as_ref().to_path_buf();

        // 确保目录存在
        fs::create_dir_all(&base_dir)
            .await
            .map_err(|e| StorageError::IoError(e.to_string()))?;

        Ok(Self { base_dir })
    }

    /// 获取存储根目录
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

#[async_trait]
impl SegmentStoragePort for FileSegmentStorage {
    fn run_dir(&self, run_id: RunId) -> PathBuf {
        self.base_dir.join(format!("linguo-{}", run_id))
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
        // 确保运行目录存在
        fs::create_dir_all(self.run_dir(run_id))
            .await
            .map_err(|e| StorageError::IoError(e.to_string()))?;

        let path = self.segment_path(run_id, segment_index, extension);

        fs::write(&path, data)
            .await
            .map_err(|e| StorageError::IoError(e.to_string()))?;

        tracing::debug!(
            "Saved segment audio: run={}, segment={}, size={} bytes",
            run_id,
            segment_index,
            data.len()
        );

        Ok(path)
    }

    async fn read(&self, path: &Path) -> Result<Vec<u8>, StorageError> {
        match fs::read(path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(
                StorageError::FileNotFound(path.to_string_lossy().to_string()),
            ),
            Err(e) => Err(StorageError::IoError(e.to_string())),
        }
    }

    async fn remove(&self, path: &Path) -> Result<(), StorageError> {
        match fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::IoError(e.to_string())),
        }
    }

    async fn cleanup_run(&self, run_id: RunId) -> Result<u64, StorageError> {
        let run_dir = self.run_dir(run_id);

        if !run_dir.exists() {
            return Ok(0);
        }

        let mut deleted_count = 0u64;
        let mut entries = fs::read_dir(&run_dir)
            .await
            .map_err(|e| StorageError::IoError(e.to_string()))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StorageError::IoError(e.to_string()))?
        {
            if entry.path().is_file() {
                fs::remove_file(entry.path())
                    .await
                    .map_err(|e| StorageError::IoError(e.to_string()))?;
                deleted_count += 1;
            }
        }

        fs::remove_dir(&run_dir)
            .await
            .map_err(|e| StorageError::IoError(e.to_string()))?;

        tracing::debug!(
            "Cleaned up run storage: run={}, files={}",
            run_id,
            deleted_count
        );

        Ok(deleted_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_save_read_remove() {
        let temp_dir = tempdir().unwrap();
        let storage = FileSegmentStorage::new(temp_dir.path()).await.unwrap();
        let run_id = RunId::new();

        let path = storage.save(run_id, 0, "mp3", b"fake mp3").await.unwrap();
        assert!(path.exists());
        assert_eq!(path, storage.segment_path(run_id, 0, "mp3"));

        assert_eq!(storage.read(&path).await.unwrap(), b"fake mp3");

        storage.remove(&path).await.unwrap();
        assert!(!path.exists());

        // 再次删除不报错
        storage.remove(&path).await.unwrap();
        assert!(matches!(
            storage.read(&path).await,
            Err(StorageError::FileNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_distinct_paths_per_index_and_run() {
        let temp_dir = tempdir().unwrap();
        let storage = FileSegmentStorage::new(temp_dir.path()).await.unwrap();
        let (a, b) = (RunId::new(), RunId::new());

        assert_ne!(storage.segment_path(a, 0, "mp3"), storage.segment_path(a, 1, "mp3"));
        assert_ne!(storage.segment_path(a, 0, "mp3"), storage.segment_path(b, 0, "mp3"));
    }

    #[tokio::test]
    async fn test_cleanup_run() {
        let temp_dir = tempdir().unwrap();
        let storage = FileSegmentStorage::new(temp_dir.path()).await.unwrap();
        let run_id = RunId::new();

        for i in 0..3 {
            storage.save(run_id, i, "mp3", b"data").await.unwrap();
        }

        let deleted = storage.cleanup_run(run_id).await.unwrap();
        assert_eq!(deleted, 3);
        assert!(!storage.run_dir(run_id).exists());

        // 目录不存在时返回 0
        assert_eq!(storage.cleanup_run(run_id).await.unwrap(), 0);
    }
}
