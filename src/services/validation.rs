//! 题号校验
//!
//! 保证最终题目序列按顺序编号为 1..=N。
//! - 编号集合正好是 1..=N 但顺序被打乱：按编号排序
//! - 有缺失、重复、非整数或越界：丢弃所有原有编号，按列表顺序重新编号
//!
//! 该步骤永不失败

use serde_json::Value;
use tracing::{info, warn};

/// 校验结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberingOutcome {
    /// 编号本来就正确
    Unchanged,
    /// 编号集合正确，只调整了顺序
    Reordered,
    /// 全部重新编号
    Renumbered,
}

/// 校验并在必要时修正编号
pub fn ensure_sequential_numbering(questions: &mut [Value]) -> NumberingOutcome {
    let reported: Vec<u64> = questions
        .iter()
        .filter_map(|q| q.get("number").and_then(Value::as_u64))
        .collect();
    let mut numbers = reported.clone();
    numbers.sort_unstable();

    let expected: Vec<u64> = (1..=questions.len() as u64).collect();
    if numbers == expected {
        if reported == expected {
            return NumberingOutcome::Unchanged;
        }
        info!("题号集合完整但顺序错乱，按题号排序");
        questions.sort_by_key(|q| q.get("number").and_then(Value::as_u64).unwrap_or(u64::MAX));
        return NumberingOutcome::Reordered;
    }

    warn!(
        "题号 {:?} 与期望的 1..={} 不一致，自动重新编号",
        numbers,
        questions.len()
    );

    for (i, q) in questions.iter_mut().enumerate() {
        if let Some(obj) = q.as_object_mut() {
            obj.insert("number".to_string(), Value::from(i + 1));
        }
    }

    NumberingOutcome::Renumbered
}
