//! 主题分析服务（D³ engine）
//!
//! 对上传的教学素材逐个抽取考试高频主题，汇总后按出现次数排序

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Local;
use serde_json::Value;
use tracing::{info, warn};

use crate::clients::{DocumentModel, GenerationParams};
use crate::error::ExtractionError;
use crate::models::{AnalysisEntry, FileSummary};
use crate::services::normalizer;
use crate::services::prompts;

/// 每个文件保留的最大字符数
pub const MATERIAL_MAX_CHARS: usize = 5000;
/// 排名保留的主题数量
pub const RANKED_TOPICS_LIMIT: usize = 15;
/// 每个文件摘要中展示的样例数量
const SAMPLES_PER_FILE: usize = 3;

/// 一份上传的素材
#[derive(Debug, Clone)]
pub struct MaterialFile {
    /// 表单字段名：documents / lectures / exams
    pub category: String,
    pub name: String,
    pub bytes: Vec<u8>,
}

/// 主题分析服务
pub struct TopicService {
    model: Arc<dyn DocumentModel>,
}

impl TopicService {
    pub fn new(model: Arc<dyn DocumentModel>) -> Self {
        Self { model }
    }

    /// 分析一批素材，返回尚未持久化的分析结果
    pub async fn analyze(&self, id: String, files: &[MaterialFile]) -> AnalysisEntry {
        let mut all_topics = Vec::new();
        let mut file_summaries = Vec::with_capacity(files.len());

        for file in files {
            let content: String = String::from_utf8_lossy(&file.bytes)
                .chars()
                .take(MATERIAL_MAX_CHARS)
                .collect();

            let topics = match self.extract_topics(&content).await {
                Ok(topics) => topics,
                Err(e) => {
                    warn!("[D3] 文件 {} 主题抽取失败: {}", file.name, e);
                    Vec::new()
                }
            };
            info!("[D3] {} ({}) 找到 {} 个主题", file.name, file.category, topics.len());

            file_summaries.push(FileSummary {
                name: file.name.clone(),
                category: file.category.clone(),
                topics_found: topics.len(),
                samples: topics.iter().take(SAMPLES_PER_FILE).cloned().collect(),
            });
            all_topics.extend(topics);
        }

        AnalysisEntry {
            id,
            timestamp: Local::now(),
            files_processed: file_summaries.len(),
            total_topics_found: all_topics.len(),
            ranked_topics: rank_topics(&all_topics, RANKED_TOPICS_LIMIT),
            file_summaries,
            status: "completed".to_string(),
        }
    }

    async fn extract_topics(&self, material: &str) -> Result<Vec<String>, ExtractionError> {
        let raw = self
            .model
            .generate(&prompts::topics_prompt(material), None, GenerationParams::TOPICS)
            .await?;

        let items = normalizer::parse_array(&raw)?;
        Ok(items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
                _ => None,
            })
            .collect())
    }
}

/// 按出现次数降序排序，次数相同时保持首次出现的顺序
pub fn rank_topics(topics: &[String], limit: usize) -> Vec<String> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for topic in topics {
        let count = counts.entry(topic.as_str()).or_insert(0);
        if *count == 0 {
            order.push(topic.as_str());
        }
        *count += 1;
    }

    // sort_by 是稳定排序
    order.sort_by(|a, b| counts[b].cmp(&counts[a]));
    order.into_iter().take(limit).map(str::to_string).collect()
}
