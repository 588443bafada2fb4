use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ExtractionError;

/// 选项字母表
pub const OPTION_LETTERS: [&str; 4] = ["A", "B", "C", "D"];

/// 单个选项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOption {
    pub letter: String,
    pub text: String,
}

impl QuestionOption {
    pub fn new(letter: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            letter: letter.into(),
            text: text.into(),
        }
    }
}

/// 规范化后的题目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub number: u32,
    pub question: String,
    pub options: Vec<QuestionOption>,
    pub correct: String,
    #[serde(default)]
    pub diagram_description: Option<String>,
}

impl QuestionRecord {
    /// 从修复过的松散 JSON 对象转换
    ///
    /// `index` 为 1-based 序号，仅用于错误信息
    pub fn from_value(value: &Value, index: usize) -> Result<Self, ExtractionError> {
        // 字段缺失与字段类型错误分别报告
        let invalid = |field: &'static str| match value.get(field) {
            None | Some(Value::Null) => ExtractionError::InvalidRecord { index, field },
            Some(_) => ExtractionError::InvalidField { index, field },
        };

        let question = value
            .get("question")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| invalid("question"))?
            .to_string();

        let options = value
            .get("options")
            .and_then(Value::as_array)
            .ok_or_else(|| invalid("options"))?
            .iter()
            .map(|opt| {
                let letter = opt.get("letter").and_then(Value::as_str);
                let text = opt.get("text").map(value_to_text);
                match (letter, text) {
                    (Some(letter), Some(text)) => Ok(QuestionOption::new(letter, text)),
                    _ => Err(invalid("options")),
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        let correct = value
            .get("correct")
            .map(value_to_text)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| invalid("correct"))?;

        let number = value
            .get("number")
            .and_then(Value::as_u64)
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(index as u32);

        let diagram_description = value
            .get("diagram_description")
            .and_then(Value::as_str)
            .map(str::to_string);

        Ok(Self {
            number,
            question,
            options,
            correct,
            diagram_description,
        })
    }
}

/// 把字符串或数字类型的 JSON 值转换为文本
pub(crate) fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
