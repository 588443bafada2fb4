//! 试卷相关接口：上传、列表、读取、删除

use axum::extract::{Multipart, Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tracing::{error, info};

use super::error::ApiError;
use super::AppState;
use crate::models::quiz::display_name;
use crate::models::{Document, QuestionRecord};
use crate::services::validation::ensure_sequential_numbering;

/// 直接提交 JSON 时使用的试卷名称
const JSON_QUIZ_NAME: &str = "json_quiz";
const REQUIRED_FIELDS: [&str; 3] = ["question", "options", "correct"];

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/upload", post(upload))
        .route("/api/quizzes", get(list_quizzes))
        .route("/api/quiz/:id", get(get_quiz).delete(delete_quiz))
}

async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let mut quiz_data: Option<String> = None;
    let mut document: Option<Document> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        error!("读取表单字段失败: {e}");
        ApiError::BadRequest("Failed to read multipart field".to_string())
    })? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "quiz_data" => {
                let text = field
                    .text()
                    .await
                    .map_err(|_| ApiError::BadRequest("Failed to read quiz_data".to_string()))?;
                quiz_data = Some(text);
            }
            "file" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let mime_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|_| ApiError::BadRequest("Failed to read file data".to_string()))?;
                document = Some(Document::new(filename, mime_type, bytes.to_vec()));
            }
            _ => {}
        }
    }

    if let Some(raw) = quiz_data {
        let records = parse_quiz_data(&raw)?;
        let entry = state.quizzes.create(JSON_QUIZ_NAME, records).await?;
        let count = entry.question_count;

        return Ok(Json(json!({
            "success": true,
            "data": entry.data,
            "count": count,
            "quizId": entry.id,
            "message": format!("Quiz loaded successfully – {count} questions"),
        })));
    }

    let document = document
        .ok_or_else(|| ApiError::BadRequest("No file or quiz_data provided".to_string()))?;
    if document.filename.is_empty() {
        return Err(ApiError::BadRequest("No file selected".to_string()));
    }

    let questions = state.extraction.extract(&document).await.map_err(|e| {
        error!(error = ?e, "[试卷] {} 处理失败", document.filename);
        ApiError::from(e)
    })?;

    let entry = state
        .quizzes
        .create(display_name(&document.filename), questions)
        .await?;
    let count = entry.question_count;
    info!("[试卷] {} 已保存为 {}", document.filename, entry.id);

    Ok(Json(json!({
        "success": true,
        "data": entry.data,
        "count": count,
        "quizId": entry.id,
        "message": format!("Extraction completed – {count} questions"),
    })))
}

async fn list_quizzes(State(state): State<AppState>) -> Json<Value> {
    let quizzes = state.quizzes.list().await.unwrap_or_else(|e| {
        error!("[Storage] 列出试卷失败: {}", e);
        Vec::new()
    });

    Json(json!({
        "success": true,
        "count": quizzes.len(),
        "data": quizzes,
    }))
}

async fn get_quiz(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let quiz = state
        .quizzes
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Quiz {id} not found")))?;

    Ok(Json(json!({
        "success": true,
        "data": quiz,
    })))
}

async fn delete_quiz(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let deleted = state.quizzes.delete(&id).await.unwrap_or_else(|e| {
        error!("[Storage] 删除试卷 {} 失败: {}", id, e);
        false
    });

    if !deleted {
        return Err(ApiError::NotFound(format!("Quiz {id} not found")));
    }

    Ok(Json(json!({
        "success": true,
        "message": format!("Quiz {id} deleted"),
    })))
}

/// 校验直接提交的 JSON 题目数组并转换为规范结构
pub fn parse_quiz_data(raw: &str) -> Result<Vec<QuestionRecord>, ApiError> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|_| ApiError::BadRequest("Invalid JSON format".to_string()))?;

    let Value::Array(mut questions) = value else {
        return Err(ApiError::BadRequest("Quiz data must be a JSON array".to_string()));
    };

    for (i, q) in questions.iter().enumerate() {
        let index = i + 1;
        for field in REQUIRED_FIELDS {
            if q.get(field).is_none() {
                return Err(ApiError::BadRequest(format!(
                    "Question {index} missing required field: {field}"
                )));
            }
        }

        let Some(options) = q["options"].as_array() else {
            return Err(ApiError::BadRequest(format!(
                "Question {index} options must be an array"
            )));
        };

        let well_formed = options.iter().all(|opt| {
            opt.as_object()
                .is_some_and(|o| o.contains_key("letter") && o.contains_key("text"))
        });
        if !well_formed {
            return Err(ApiError::BadRequest(format!(
                "Question {index} options must be objects with 'letter' and 'text' fields"
            )));
        }
    }

    ensure_sequential_numbering(&mut questions);

    questions
        .iter()
        .enumerate()
        .map(|(i, q)| QuestionRecord::from_value(q, i + 1))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| ApiError::BadRequest(e.to_string()))
}
