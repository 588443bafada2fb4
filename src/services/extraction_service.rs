//! 题目抽取服务 - 先计数再拆分
//!
//! 流程：
//! 1. 询问题目总数（取响应中的第一个整数）
//! 2. 总数 ≤ 阈值：一次抽取全部
//! 3. 总数 > 阈值：按中点拆成 1..=mid 与 mid+1..=count 两次抽取（顺序调用）
//! 4. 结构修复 → 题号校验 → 转换为 `QuestionRecord`

use std::ops::RangeInclusive;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde_json::Value;
use tracing::{debug, info};

use crate::clients::{DocumentModel, GenerationParams};
use crate::error::ExtractionError;
use crate::models::{Document, QuestionRecord};
use crate::services::normalizer;
use crate::services::prompts::{self, PROMPT_ALL, PROMPT_COUNT};
use crate::services::repair::{fix_options_format, renumber_from, repair_questions};
use crate::services::validation::ensure_sequential_numbering;
use crate::utils::logging::truncate_text;

/// 默认拆分阈值
pub const DEFAULT_SPLIT_THRESHOLD: usize = 40;

static FIRST_INTEGER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("valid regex"));

/// 抽取计划
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionPlan {
    /// 一次抽取全部题目
    Single { total: usize },
    /// 两次按范围抽取
    Split {
        first: RangeInclusive<usize>,
        second: RangeInclusive<usize>,
    },
}

impl ExtractionPlan {
    /// 根据题目总数选择抽取策略
    pub fn for_count(total: usize, split_threshold: usize) -> Self {
        if total <= split_threshold {
            ExtractionPlan::Single { total }
        } else {
            let mid = total / 2;
            ExtractionPlan::Split {
                first: 1..=mid,
                second: mid + 1..=total,
            }
        }
    }
}

/// 从计数响应中取出第一个整数
pub fn parse_count(response: &str) -> Option<usize> {
    FIRST_INTEGER
        .find(response)
        .and_then(|m| m.as_str().parse::<usize>().ok())
}

/// 题目抽取服务
///
/// 职责：
/// - 编排计数调用和一到两次抽取调用
/// - 对模型输出做规范化、修复和校验
/// - 不关心存储
pub struct ExtractionService {
    model: Arc<dyn DocumentModel>,
    split_threshold: usize,
}

impl ExtractionService {
    pub fn new(model: Arc<dyn DocumentModel>, split_threshold: usize) -> Self {
        Self {
            model,
            split_threshold,
        }
    }

    /// 从文档中抽取规范化的题目列表
    pub async fn extract(&self, doc: &Document) -> Result<Vec<QuestionRecord>, ExtractionError> {
        info!("[开始] {} ({} KB)", doc.filename, doc.size_kb());

        info!("🔍 正在识别题目总数...");
        let total = self.count_questions(doc).await?;
        info!("📋 试卷共有 {} 道题", total);

        let mut questions = match ExtractionPlan::for_count(total, self.split_threshold) {
            ExtractionPlan::Single { .. } => {
                info!("🤖 单次调用，抽取全部题目...");
                self.call_extraction(doc, PROMPT_ALL).await?
            }
            ExtractionPlan::Split { first, second } => {
                info!(
                    "🤖 拆分抽取: {}–{} + {}–{}",
                    first.start(),
                    first.end(),
                    second.start(),
                    second.end()
                );

                let mut part1 = self
                    .call_extraction(doc, &prompts::part_prompt(*first.start(), *first.end()))
                    .await?;
                let mut part2 = self
                    .call_extraction(doc, &prompts::part_prompt(*second.start(), *second.end()))
                    .await?;

                fix_options_format(&mut part1);
                fix_options_format(&mut part2);
                renumber_from(&mut part2, *second.start());

                part1.extend(part2);
                part1
            }
        };

        repair_questions(&mut questions);
        let outcome = ensure_sequential_numbering(&mut questions);
        debug!("题号校验结果: {:?}", outcome);

        let records = questions
            .iter()
            .enumerate()
            .map(|(i, q)| QuestionRecord::from_value(q, i + 1))
            .collect::<Result<Vec<_>, _>>()?;

        info!("✅ 成功抽取 {} 道题", records.len());
        Ok(records)
    }

    /// 询问题目总数
    pub async fn count_questions(&self, doc: &Document) -> Result<usize, ExtractionError> {
        let response = self
            .model
            .generate(PROMPT_COUNT, Some(doc), GenerationParams::COUNT)
            .await?;
        debug!("计数响应: {}", truncate_text(&response, 200));

        parse_count(&response).ok_or(ExtractionError::CountNotFound { response })
    }

    async fn call_extraction(&self, doc: &Document, prompt: &str) -> Result<Vec<Value>, ExtractionError> {
        let raw = self
            .model
            .generate(prompt, Some(doc), GenerationParams::EXTRACTION)
            .await?;
        debug!("抽取响应长度: {} 字符", raw.len());

        normalizer::parse_array(&raw)
    }
}
