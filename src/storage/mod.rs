//! 存储层
//!
//! 以标识符为键的 JSON 文档存储。流水线只依赖 [`DocumentStore`]，
//! 后端可以是磁盘目录（[`FileStore`]）或内存（[`MemoryStore`]）。

pub mod file_store;
pub mod memory_store;
pub mod repository;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::StorageError;

pub use file_store::FileStore;
pub use memory_store::MemoryStore;
pub use repository::{AnalysisRepository, QuizRepository};

/// 标识符长度
pub const ID_LEN: usize = 8;

/// 键值文档存储
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// 写入（覆盖）一个文档
    async fn put(&self, id: &str, doc: &Value) -> Result<(), StorageError>;

    /// 读取文档，不存在时返回 `None`
    async fn get(&self, id: &str) -> Result<Option<Value>, StorageError>;

    /// 列出所有可读的文档
    async fn list(&self) -> Result<Vec<Value>, StorageError>;

    /// 删除文档，返回是否存在
    async fn delete(&self, id: &str) -> Result<bool, StorageError>;
}

/// 生成新的短标识符
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..ID_LEN].to_string()
}

/// 客户端传入的标识符只允许字母、数字和 `-`
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty() && id.len() <= 64 && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}
