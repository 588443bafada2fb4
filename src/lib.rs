//! # Databoy
//!
//! 从扫描版试卷中抽取选择题并以 JSON 形式保存和提供的服务
//!
//! ## 架构设计
//!
//! ### ① 模型边界（Clients）
//! - `clients/` - `DocumentModel`："给定提示词和文档，返回文本"
//! - `LlmClient` - 基于 async-openai 的 OpenAI 兼容实现
//!
//! ### ② 业务能力层（Services）
//! - `normalizer` - 去围栏 + 严格/宽松 JSON 解析
//! - `repair` - 选项格式和字段名修复（幂等）
//! - `validation` - 题号校验，保证 1..=N
//! - `ExtractionService` - 先计数再拆分的抽取流程
//! - `TopicService` - 教学素材主题分析
//!
//! ### ③ 存储层（Storage）
//! - `DocumentStore` - 键值文档存储接口（目录 / 内存）
//! - `QuizRepository` / `AnalysisRepository` - 类型化仓库
//!
//! ### ④ 接口层（Api）
//! - `api/` - axum 路由与处理器
//!
//! ## 模块结构

pub mod api;
pub mod app;
pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;
pub mod utils;

// 重新导出常用类型
pub use app::App;
pub use clients::{DocumentModel, GenerationParams, LlmClient};
pub use config::Config;
pub use error::{ConfigError, ExtractionError, LlmError, StorageError};
pub use models::{QuestionOption, QuestionRecord, QuizEntry};
pub use services::{ExtractionService, TopicService};
