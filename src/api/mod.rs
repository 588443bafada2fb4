//! HTTP 接口
//!
//! 路由：
//! - `POST /upload` 上传试卷文档或直接提交 JSON
//! - `GET /health` 健康检查
//! - `GET /api/quizzes`、`GET|DELETE /api/quiz/:id` 试卷管理
//! - `POST /api/d3-engine/train`、`GET /api/d3-engine/analysis/:id` 主题分析

pub mod analysis;
pub mod error;
pub mod quiz;

use std::path::Path;
use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, State};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::services::{ExtractionService, TopicService};
use crate::storage::{AnalysisRepository, QuizRepository};

pub use error::ApiError;

/// 处理器共享的上下文
#[derive(Clone)]
pub struct AppState {
    pub extraction: Arc<ExtractionService>,
    pub topics: Arc<TopicService>,
    pub quizzes: QuizRepository,
    pub analyses: AnalysisRepository,
    pub model_name: String,
}

/// 构建完整路由
pub fn router(state: AppState, max_upload_bytes: usize, static_dir: Option<&Path>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let router = Router::new()
        .route("/health", get(health))
        .merge(quiz::routes())
        .merge(analysis::routes())
        .with_state(state);

    let router = match static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    };

    router
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(cors)
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "model": state.model_name,
    }))
}
