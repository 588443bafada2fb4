use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tokio::fs;
use tracing::{info, warn};

use super::{is_valid_id, DocumentStore};
use crate::error::StorageError;

/// 目录存储：每个文档一个 `<id>.json` 文件
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// 打开（必要时创建）存储目录
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| StorageError::io(dir.display().to_string(), e))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &str) -> Result<PathBuf, StorageError> {
        if !is_valid_id(id) {
            return Err(StorageError::InvalidId { id: id.to_string() });
        }
        Ok(self.dir.join(format!("{id}.json")))
    }
}

#[async_trait]
impl DocumentStore for FileStore {
    async fn put(&self, id: &str, doc: &Value) -> Result<(), StorageError> {
        let path = self.path_for(id)?;
        let body = serde_json::to_vec_pretty(doc).map_err(|e| StorageError::serde(id, e))?;
        fs::write(&path, body)
            .await
            .map_err(|e| StorageError::io(path.display().to_string(), e))?;
        info!("[Storage] 已保存: {}", path.display());
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Value>, StorageError> {
        let path = self.path_for(id)?;
        let body = match fs::read(&path).await {
            Ok(body) => body,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StorageError::io(path.display().to_string(), e)),
        };
        serde_json::from_slice(&body)
            .map(Some)
            .map_err(|e| StorageError::serde(id, e))
    }

    async fn list(&self) -> Result<Vec<Value>, StorageError> {
        let mut docs = Vec::new();
        let mut entries = fs::read_dir(&self.dir)
            .await
            .map_err(|e| StorageError::io(self.dir.display().to_string(), e))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StorageError::io(self.dir.display().to_string(), e))?
        {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }

            let parsed = match fs::read(&path).await {
                Ok(body) => serde_json::from_slice::<Value>(&body).map_err(|e| e.to_string()),
                Err(e) => Err(e.to_string()),
            };
            match parsed {
                Ok(doc) => docs.push(doc),
                Err(e) => warn!("[Storage] 跳过无法读取的文件 {}: {}", path.display(), e),
            }
        }

        Ok(docs)
    }

    async fn delete(&self, id: &str) -> Result<bool, StorageError> {
        let path = self.path_for(id)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                info!("[Storage] 已删除: {}", id);
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::io(path.display().to_string(), e)),
        }
    }
}
