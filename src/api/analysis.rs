//! 主题分析接口（D³ engine）

use axum::extract::{Multipart, Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tracing::{error, info};

use super::error::ApiError;
use super::AppState;
use crate::services::MaterialFile;
use crate::storage::generate_id;

/// 接受素材的表单字段
const MATERIAL_FIELDS: [&str; 3] = ["documents", "lectures", "exams"];

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/d3-engine/train", post(train))
        .route("/api/d3-engine/analysis/:id", get(get_analysis))
}

async fn train(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let mut files = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        error!("读取表单字段失败: {e}");
        ApiError::BadRequest("Failed to read multipart field".to_string())
    })? {
        let category = field.name().unwrap_or_default().to_string();
        if !MATERIAL_FIELDS.contains(&category.as_str()) {
            continue;
        }

        let name = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|_| ApiError::BadRequest("Failed to read file data".to_string()))?;

        // 浏览器对空的文件输入框也会发送一个没有文件名的字段
        if name.is_empty() && bytes.is_empty() {
            continue;
        }

        files.push(MaterialFile {
            category,
            name,
            bytes: bytes.to_vec(),
        });
    }

    if files.is_empty() {
        return Err(ApiError::BadRequest("No files uploaded".to_string()));
    }

    info!("[D3] 开始分析 {} 个文件", files.len());
    let analysis = state.topics.analyze(generate_id(), &files).await;
    state.analyses.save(&analysis).await.map_err(|e| {
        error!(error = ?e, "[D3] 保存分析结果失败");
        ApiError::from(e)
    })?;
    info!("[D3] 分析结果已保存: {}", analysis.id);

    Ok(Json(json!({
        "success": true,
        "message": "D³ Engine training completed",
        "analysisId": analysis.id,
        "topics": analysis.ranked_topics,
        "filesProcessed": analysis.files_processed,
        "totalTopics": analysis.total_topics_found,
    })))
}

async fn get_analysis(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let analysis = state
        .analyses
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Analysis {id} not found")))?;

    Ok(Json(json!({
        "success": true,
        "data": analysis,
    })))
}
