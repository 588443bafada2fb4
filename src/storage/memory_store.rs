use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::DocumentStore;
use crate::error::StorageError;

/// 内存存储，用于测试或临时运行
#[derive(Default)]
pub struct MemoryStore {
    docs: RwLock<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn put(&self, id: &str, doc: &Value) -> Result<(), StorageError> {
        self.docs.write().await.insert(id.to_string(), doc.clone());
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Value>, StorageError> {
        Ok(self.docs.read().await.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<Value>, StorageError> {
        Ok(self.docs.read().await.values().cloned().collect())
    }

    async fn delete(&self, id: &str) -> Result<bool, StorageError> {
        Ok(self.docs.write().await.remove(id).is_some())
    }
}
