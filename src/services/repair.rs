//! 字段/结构修复
//!
//! 把 LLM 返回的各种形状统一成规范结构：
//! - 选项是纯字符串 → 依次映射到 A/B/C/D（最多四个）
//! - 选项是字母到文本的映射 → 转成对象数组
//! - 别名字段（answer/text/diagram）→ 规范字段，绝不覆盖已有的规范字段
//!
//! 所有修复都是幂等的

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::models::question::value_to_text;
use crate::models::OPTION_LETTERS;

/// 别名 → 规范字段
const FIELD_ALIASES: [(&str, &str); 3] = [
    ("answer", "correct"),
    ("text", "question"),
    ("diagram", "diagram_description"),
];

/// 修复选项格式
pub fn fix_options_format(questions: &mut [Value]) {
    for q in questions.iter_mut() {
        let Some(obj) = q.as_object_mut() else {
            continue;
        };
        let number = obj.get("number").cloned().unwrap_or(Value::Null);

        let fixed = match obj.get("options") {
            Some(Value::Array(opts)) if opts.first().is_some_and(Value::is_string) => {
                Some(options_from_strings(opts))
            }
            Some(Value::Object(map)) => Some(options_from_map(map)),
            _ => None,
        };

        if let Some(fixed) = fixed {
            obj.insert("options".to_string(), Value::Array(fixed));
            info!("🔧 修复了第 {} 题的选项格式", number);
        } else if let Some(Value::Array(opts)) = obj.get_mut("options") {
            normalize_option_letters(opts);
        }

        if let Some(Value::String(correct)) = obj.get_mut("correct") {
            let normalized = correct.trim().to_uppercase();
            if *correct != normalized {
                *correct = normalized;
            }
        }
    }
}

/// 规范化字段名
pub fn normalize_field_names(questions: &mut [Value]) {
    for q in questions.iter_mut() {
        let Some(obj) = q.as_object_mut() else {
            continue;
        };

        for (alias, canonical) in FIELD_ALIASES {
            if obj.contains_key(alias) && !obj.contains_key(canonical) {
                if let Some(value) = obj.remove(alias) {
                    debug!("字段重命名: {} → {}", alias, canonical);
                    obj.insert(canonical.to_string(), value);
                }
            }
        }
    }
}

/// 完整修复：选项格式 + 字段名
///
/// 字段重命名之后再跑一次选项修复，以便 `answer` 改名后的 `correct` 也被规范化
pub fn repair_questions(questions: &mut [Value]) {
    fix_options_format(questions);
    normalize_field_names(questions);
    fix_options_format(questions);
}

/// 从指定序号开始按顺序重新编号（不信任模型返回的编号）
pub fn renumber_from(questions: &mut [Value], start: usize) {
    for (i, q) in questions.iter_mut().enumerate() {
        let expected = start + i;
        let Some(obj) = q.as_object_mut() else {
            continue;
        };
        if obj.get("number").and_then(Value::as_u64) != Some(expected as u64) {
            let previous = obj.get("number").cloned().unwrap_or(Value::Null);
            debug!("修正题号: {} → {}", previous, expected);
            obj.insert("number".to_string(), Value::from(expected));
        }
    }
}

/// 对象形式的选项：字母去空白并转大写
fn normalize_option_letters(opts: &mut [Value]) {
    for opt in opts.iter_mut() {
        if let Some(Value::String(letter)) = opt.get_mut("letter") {
            let normalized = letter.trim().to_uppercase();
            if *letter != normalized {
                *letter = normalized;
            }
        }
    }
}

fn options_from_strings(opts: &[Value]) -> Vec<Value> {
    opts.iter()
        .take(OPTION_LETTERS.len())
        .zip(OPTION_LETTERS)
        .map(|(opt, letter)| {
            let text = match opt {
                Value::Object(inner) => inner.get("text").map(value_to_text).unwrap_or_default(),
                other => value_to_text(other),
            };
            option_value(letter, text)
        })
        .collect()
}

fn options_from_map(map: &Map<String, Value>) -> Vec<Value> {
    let mut entries: Vec<(String, String)> = map
        .iter()
        .map(|(letter, text)| (letter.trim().to_uppercase(), value_to_text(text)))
        .collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    entries
        .into_iter()
        .take(OPTION_LETTERS.len())
        .map(|(letter, text)| option_value(&letter, text))
        .collect()
}

fn option_value(letter: &str, text: String) -> Value {
    let mut obj = Map::new();
    obj.insert("letter".to_string(), Value::from(letter));
    obj.insert("text".to_string(), Value::from(text));
    Value::Object(obj)
}
