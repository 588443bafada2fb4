#![allow(dead_code)]

use std::ops::RangeInclusive;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::Request;
use axum::Router;
use databoy::api;
use databoy::app::build_state;
use databoy::clients::{DocumentModel, GenerationParams};
use databoy::error::LlmError;
use databoy::models::Document;
use databoy::storage::{AnalysisRepository, FileStore, QuizRepository};
use serde_json::{json, Value};

type Script = dyn Fn(&str) -> Result<String, LlmError> + Send + Sync;

/// 按提示词返回预设响应的模型，并记录每次调用
pub struct ScriptedModel {
    script: Box<Script>,
    calls: Mutex<Vec<RecordedCall>>,
}

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub prompt: String,
    pub had_document: bool,
    pub params: GenerationParams,
}

impl ScriptedModel {
    pub fn new<F>(script: F) -> Arc<Self>
    where
        F: Fn(&str) -> Result<String, LlmError> + Send + Sync + 'static,
    {
        Arc::new(Self {
            script: Box::new(script),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.prompt).collect()
    }
}

#[async_trait]
impl DocumentModel for ScriptedModel {
    fn model_name(&self) -> &str {
        "scripted-model"
    }

    async fn generate(
        &self,
        prompt: &str,
        document: Option<&Document>,
        params: GenerationParams,
    ) -> Result<String, LlmError> {
        self.calls.lock().unwrap().push(RecordedCall {
            prompt: prompt.to_string(),
            had_document: document.is_some(),
            params,
        });
        (self.script)(prompt)
    }
}

/// 生成一段题目 JSON，`numbers` 为模型"声称"的题号
pub fn questions_json(numbers: RangeInclusive<u32>) -> Value {
    Value::Array(
        numbers
            .map(|n| {
                json!({
                    "number": n,
                    "question": format!("Question {n}?"),
                    "options": [
                        {"letter": "A", "text": "first"},
                        {"letter": "B", "text": "second"},
                        {"letter": "C", "text": "third"},
                        {"letter": "D", "text": "fourth"}
                    ],
                    "correct": "B",
                    "diagram_description": null
                })
            })
            .collect(),
    )
}

/// 测试用的完整路由（磁盘存储放在临时目录）
pub async fn test_app(model: Arc<ScriptedModel>) -> (Router, tempfile::TempDir) {
    let tmp = tempfile::tempdir().unwrap();
    let quizzes = FileStore::open(tmp.path().join("quizzes")).await.unwrap();
    let analyses = FileStore::open(tmp.path().join("d3_analyses")).await.unwrap();

    let state = build_state(
        model,
        QuizRepository::new(Arc::new(quizzes)),
        AnalysisRepository::new(Arc::new(analyses)),
        40,
    );

    (api::router(state, 10 * 1024 * 1024, None), tmp)
}

const BOUNDARY: &str = "----databoy-test-boundary";

/// multipart 表单中的一个字段
pub struct Part {
    pub name: &'static str,
    pub filename: Option<&'static str>,
    pub content_type: Option<&'static str>,
    pub data: Vec<u8>,
}

impl Part {
    pub fn text(name: &'static str, value: impl Into<String>) -> Self {
        Self {
            name,
            filename: None,
            content_type: None,
            data: value.into().into_bytes(),
        }
    }

    pub fn file(name: &'static str, filename: &'static str, content_type: &'static str, data: &[u8]) -> Self {
        Self {
            name,
            filename: Some(filename),
            content_type: Some(content_type),
            data: data.to_vec(),
        }
    }
}

/// 构造 multipart POST 请求
pub fn multipart_request(uri: &str, parts: Vec<Part>) -> Request<Body> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part.filename {
            Some(filename) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                    part.name, filename
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{}\"\r\n", part.name).as_bytes(),
            ),
        }
        if let Some(content_type) = part.content_type {
            body.extend_from_slice(format!("Content-Type: {content_type}\r\n").as_bytes());
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(&part.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", format!("multipart/form-data; boundary={BOUNDARY}"))
        .body(Body::from(body))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// 读取响应体为 JSON
pub async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
