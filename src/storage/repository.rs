//! 类型化的试卷/分析仓库
//!
//! 在 [`DocumentStore`] 之上做序列化、标识符生成和排序

use std::sync::Arc;

use tracing::warn;

use super::{generate_id, is_valid_id, DocumentStore};
use crate::error::StorageError;
use crate::models::{AnalysisEntry, QuestionRecord, QuizEntry, QuizSummary};

/// 试卷仓库
#[derive(Clone)]
pub struct QuizRepository {
    store: Arc<dyn DocumentStore>,
}

impl QuizRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// 保存新试卷，分配标识符
    pub async fn create(
        &self,
        name: impl Into<String>,
        data: Vec<QuestionRecord>,
    ) -> Result<QuizEntry, StorageError> {
        let entry = QuizEntry::new(generate_id(), name, data);
        let doc = serde_json::to_value(&entry).map_err(|e| StorageError::serde(&entry.id, e))?;
        self.store.put(&entry.id, &doc).await?;
        Ok(entry)
    }

    /// 列出试卷摘要，按时间倒序
    pub async fn list(&self) -> Result<Vec<QuizSummary>, StorageError> {
        let mut summaries: Vec<QuizSummary> = self
            .store
            .list()
            .await?
            .into_iter()
            .filter_map(|doc| match serde_json::from_value::<QuizSummary>(doc) {
                Ok(summary) => Some(summary),
                Err(e) => {
                    warn!("[Storage] 跳过格式错误的试卷: {}", e);
                    None
                }
            })
            .collect();

        summaries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(summaries)
    }

    /// 读取完整试卷
    pub async fn get(&self, id: &str) -> Result<Option<QuizEntry>, StorageError> {
        if !is_valid_id(id) {
            return Ok(None);
        }
        match self.store.get(id).await? {
            Some(doc) => serde_json::from_value(doc)
                .map(Some)
                .map_err(|e| StorageError::serde(id, e)),
            None => Ok(None),
        }
    }

    /// 删除试卷，返回是否存在
    pub async fn delete(&self, id: &str) -> Result<bool, StorageError> {
        if !is_valid_id(id) {
            return Ok(false);
        }
        self.store.delete(id).await
    }
}

/// 主题分析仓库
#[derive(Clone)]
pub struct AnalysisRepository {
    store: Arc<dyn DocumentStore>,
}

impl AnalysisRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn save(&self, entry: &AnalysisEntry) -> Result<(), StorageError> {
        let doc = serde_json::to_value(entry).map_err(|e| StorageError::serde(&entry.id, e))?;
        self.store.put(&entry.id, &doc).await
    }

    pub async fn get(&self, id: &str) -> Result<Option<AnalysisEntry>, StorageError> {
        if !is_valid_id(id) {
            return Ok(None);
        }
        match self.store.get(id).await? {
            Some(doc) => serde_json::from_value(doc)
                .map(Some)
                .map_err(|e| StorageError::serde(id, e)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QuestionOption;
    use crate::storage::{FileStore, MemoryStore};

    fn sample_questions(n: u32) -> Vec<QuestionRecord> {
        (1..=n)
            .map(|i| QuestionRecord {
                number: i,
                question: format!("Question {i}"),
                options: vec![QuestionOption::new("A", "yes"), QuestionOption::new("B", "no")],
                correct: "A".to_string(),
                diagram_description: None,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_quiz_round_trip_on_disk() {
        let tmp = tempfile::tempdir().unwrap();
        let store = Arc::new(FileStore::open(tmp.path()).await.unwrap());
        let repo = QuizRepository::new(store);

        let created = repo.create("paper", sample_questions(3)).await.unwrap();
        assert_eq!(created.question_count, 3);

        let loaded = repo.get(&created.id).await.unwrap().unwrap();
        assert_eq!(loaded.data, created.data);
        assert_eq!(loaded.name, "paper");

        assert!(repo.delete(&created.id).await.unwrap());
        assert!(repo.get(&created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_newest_first_without_bodies() {
        let repo = QuizRepository::new(Arc::new(MemoryStore::new()));

        let first = repo.create("first", sample_questions(1)).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = repo.create("second", sample_questions(2)).await.unwrap();

        let summaries = repo.list().await.unwrap();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].id, second.id);
        assert_eq!(summaries[1].id, first.id);
        assert_eq!(summaries[0].question_count, 2);
    }

    #[tokio::test]
    async fn test_invalid_id_is_not_found() {
        let repo = QuizRepository::new(Arc::new(MemoryStore::new()));
        assert!(repo.get("../x").await.unwrap().is_none());
        assert!(!repo.delete("../x").await.unwrap());
    }
}
