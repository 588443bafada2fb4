use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// 单个文件的主题抽取结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileSummary {
    pub name: String,
    pub category: String,
    pub topics_found: usize,
    pub samples: Vec<String>,
}

/// 一次主题分析
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisEntry {
    pub id: String,
    pub timestamp: DateTime<Local>,
    pub files_processed: usize,
    pub total_topics_found: usize,
    pub ranked_topics: Vec<String>,
    pub file_summaries: Vec<FileSummary>,
    pub status: String,
}
