//! 响应规范化
//!
//! 把 LLM 返回的原始文本变成 JSON 值：
//! 1. 去掉首尾的代码围栏（```json / ```）
//! 2. 严格解析
//! 3. 失败后做宽松修复再解析（尾逗号、行注释、弯引号）
//!
//! 宽松修复逐字符扫描并跟踪是否处在字符串内部，字符串内容原样保留

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::ExtractionError;

static OPEN_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)^```(?:json)?[ \t]*\r?\n?").expect("valid regex"));
static CLOSE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)```[ \t]*$").expect("valid regex"));

/// 模型把数组包在对象里时优先使用的字段
const PREFERRED_ARRAY_KEY: &str = "questions";

/// 去掉代码围栏
pub fn strip_code_fences(raw: &str) -> String {
    let text = OPEN_FENCE.replace_all(raw.trim(), "");
    let text = CLOSE_FENCE.replace_all(text.trim(), "");
    text.trim().to_string()
}

/// 解析 LLM 响应为 JSON 值
pub fn parse_response(raw: &str) -> Result<Value, ExtractionError> {
    let text = strip_code_fences(raw);

    match serde_json::from_str::<Value>(&text) {
        Ok(value) => Ok(value),
        Err(strict) => {
            warn!("严格 JSON 解析失败: {}，尝试宽松解析", strict);
            let repaired = lenient_repair(&text);
            serde_json::from_str::<Value>(&repaired).map_err(|lenient| {
                ExtractionError::Unparseable {
                    strict: strict.to_string(),
                    lenient: lenient.to_string(),
                }
            })
        }
    }
}

/// 解析 LLM 响应并取出题目数组
///
/// 如果模型把数组包在对象里，优先取 `questions` 字段，否则取第一个数组字段
pub fn parse_array(raw: &str) -> Result<Vec<Value>, ExtractionError> {
    match parse_response(raw)? {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => {
            let found = match map.remove(PREFERRED_ARRAY_KEY) {
                Some(Value::Array(items)) => Some((PREFERRED_ARRAY_KEY.to_string(), items)),
                _ => map.into_iter().find_map(|(key, value)| match value {
                    Value::Array(items) => Some((key, items)),
                    _ => None,
                }),
            };
            match found {
                Some((key, items)) => {
                    debug!("从对象字段 '{}' 中取出数组", key);
                    Ok(items)
                }
                None => Err(ExtractionError::NotAnArray { found: "object" }),
            }
        }
        other => Err(ExtractionError::NotAnArray {
            found: json_kind(&other),
        }),
    }
}

/// 宽松修复：只处理模型常见的小毛病
///
/// - 字符串外的 `//` 行注释被删除
/// - 字符串外、后面紧跟 `]` 或 `}` 的逗号被删除
/// - 充当字符串定界符的弯双引号被替换为 `"`
fn lenient_repair(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    // 当前字符串的结束定界符；`None` 表示不在字符串内
    let mut closer: Option<char> = None;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match closer {
            Some(end) => {
                if c == '\\' {
                    out.push(c);
                    if let Some(&next) = chars.get(i + 1) {
                        out.push(next);
                        i += 1;
                    }
                } else if c == end || (end == '\u{201d}' && c == '"') {
                    // 弯引号开头的字符串也接受直引号结尾
                    out.push('"');
                    closer = None;
                } else {
                    out.push(c);
                }
            }
            None => match c {
                '"' => {
                    out.push('"');
                    closer = Some('"');
                }
                '\u{201c}' | '\u{201d}' => {
                    out.push('"');
                    closer = Some('\u{201d}');
                }
                '/' if chars.get(i + 1) == Some(&'/') => {
                    while i < chars.len() && chars[i] != '\n' {
                        i += 1;
                    }
                    continue;
                }
                ',' if next_significant(&chars, i + 1).is_some_and(|n| n == ']' || n == '}') => {}
                _ => out.push(c),
            },
        }
        i += 1;
    }

    out
}

/// 跳过空白和行注释后的下一个字符
fn next_significant(chars: &[char], mut i: usize) -> Option<char> {
    while i < chars.len() {
        match chars[i] {
            c if c.is_whitespace() => i += 1,
            '/' if chars.get(i + 1) == Some(&'/') => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
            }
            c => return Some(c),
        }
    }
    None
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
