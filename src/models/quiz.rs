use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use super::question::QuestionRecord;

/// 持久化的一份试卷
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizEntry {
    pub id: String,
    pub name: String,
    pub timestamp: DateTime<Local>,
    pub question_count: usize,
    pub data: Vec<QuestionRecord>,
}

impl QuizEntry {
    pub fn new(id: String, name: impl Into<String>, data: Vec<QuestionRecord>) -> Self {
        Self {
            id,
            name: name.into(),
            timestamp: Local::now(),
            question_count: data.len(),
            data,
        }
    }
}

/// 试卷摘要
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSummary {
    pub id: String,
    pub name: String,
    pub timestamp: DateTime<Local>,
    pub question_count: usize,
}

/// 根据上传文件名生成试卷名称
pub fn display_name(filename: &str) -> String {
    filename.replace(".pdf", "")
}
