//! Storage Adapter - 片段临时存储实现

mod file_storage;

pub use file_storage::FileSegmentStorage;
