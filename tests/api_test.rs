mod common;

use axum::http::StatusCode;
use common::{empty_request, json_body, multipart_request, questions_json, test_app, Part, ScriptedModel};
use databoy::services::prompts::PROMPT_COUNT;
use serde_json::json;
use tower::ServiceExt;

fn paper_model() -> std::sync::Arc<ScriptedModel> {
    ScriptedModel::new(|prompt| {
        if prompt == PROMPT_COUNT {
            Ok("There are 3 questions.".to_string())
        } else {
            Ok(format!("```json\n{}\n```", questions_json(1..=3)))
        }
    })
}

#[tokio::test]
async fn test_health_reports_model() {
    let (app, _tmp) = test_app(paper_model()).await;

    let response = app.oneshot(empty_request("GET", "/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body, json!({"status": "ok", "model": "scripted-model"}));
}

#[tokio::test]
async fn test_upload_get_delete_round_trip() {
    let (app, tmp) = test_app(paper_model()).await;

    let request = multipart_request(
        "/upload",
        vec![Part::file("file", "grade7_2019.pdf", "application/pdf", b"%PDF-1.4")],
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["count"], 3);
    assert_eq!(body["message"], "Extraction completed – 3 questions");
    let quiz_id = body["quizId"].as_str().unwrap().to_string();
    assert_eq!(quiz_id.len(), 8);
    assert!(tmp.path().join("quizzes").join(format!("{quiz_id}.json")).exists());

    let response = app
        .clone()
        .oneshot(empty_request("GET", &format!("/api/quiz/{quiz_id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let fetched = json_body(response).await;
    assert_eq!(fetched["data"]["name"], "grade7_2019");
    assert_eq!(fetched["data"]["questionCount"], 3);
    assert_eq!(fetched["data"]["data"], body["data"]);

    let response = app
        .clone()
        .oneshot(empty_request("DELETE", &format!("/api/quiz/{quiz_id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["message"], format!("Quiz {quiz_id} deleted"));

    let response = app
        .clone()
        .oneshot(empty_request("GET", &format!("/api/quiz/{quiz_id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], format!("Quiz {quiz_id} not found"));

    let response = app
        .oneshot(empty_request("DELETE", &format!("/api/quiz/{quiz_id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_upload_without_payload_is_rejected() {
    let (app, _tmp) = test_app(paper_model()).await;

    let request = multipart_request("/upload", vec![Part::text("other", "x")]);
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["message"], "No file or quiz_data provided");
}

#[tokio::test]
async fn test_upload_with_empty_filename_is_rejected() {
    let (app, _tmp) = test_app(paper_model()).await;

    let request = multipart_request("/upload", vec![Part::file("file", "", "application/pdf", b"")]);
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["message"], "No file selected");
}

#[tokio::test]
async fn test_model_failure_returns_500_with_message() {
    let model = ScriptedModel::new(|_| Ok("no idea".to_string()));
    let (app, _tmp) = test_app(model).await;

    let request = multipart_request(
        "/upload",
        vec![Part::file("file", "paper.pdf", "application/pdf", b"%PDF")],
    );
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("Could not detect number of questions"));
}

#[tokio::test]
async fn test_direct_json_submission() {
    let model = ScriptedModel::new(|_| panic!("model must not be called"));
    let (app, _tmp) = test_app(model).await;

    let quiz = json!([
        {"question": "Q1", "options": [{"letter": "A", "text": "x"}, {"letter": "B", "text": "y"}], "correct": "B"},
        {"question": "Q2", "options": [{"letter": "A", "text": "x"}, {"letter": "B", "text": "y"}], "correct": "A"}
    ]);
    let request = multipart_request("/upload", vec![Part::text("quiz_data", quiz.to_string())]);
    let response = app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["count"], 2);
    assert_eq!(body["message"], "Quiz loaded successfully – 2 questions");
    assert_eq!(body["data"][1]["number"], 2);

    let response = app
        .oneshot(empty_request("GET", "/api/quizzes"))
        .await
        .unwrap();
    let listing = json_body(response).await;
    assert_eq!(listing["count"], 1);
    assert_eq!(listing["data"][0]["name"], "json_quiz");
    assert_eq!(listing["data"][0]["questionCount"], 2);
    assert!(listing["data"][0].get("data").is_none());
}

#[tokio::test]
async fn test_direct_json_validation_errors() {
    let model = ScriptedModel::new(|_| panic!("model must not be called"));
    let (app, _tmp) = test_app(model).await;

    let cases = [
        ("{broken", "Invalid JSON format"),
        (r#"{"question": "Q"}"#, "Quiz data must be a JSON array"),
        (r#"[{"question": "Q", "correct": "A"}]"#, "Question 1 missing required field: options"),
        (
            r#"[{"question": "Q", "options": ["a", "b"], "correct": "A"}]"#,
            "Question 1 options must be objects with 'letter' and 'text' fields",
        ),
    ];

    for (payload, expected) in cases {
        let request = multipart_request("/upload", vec![Part::text("quiz_data", payload)]);
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "payload: {payload}");
        assert_eq!(json_body(response).await["message"], expected);
    }
}

#[tokio::test]
async fn test_list_is_newest_first() {
    let (app, _tmp) = test_app(paper_model()).await;

    for name in ["first.pdf", "second.pdf"] {
        let request = multipart_request(
            "/upload",
            vec![Part::file("file", name, "application/pdf", b"%PDF")],
        );
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let response = app.oneshot(empty_request("GET", "/api/quizzes")).await.unwrap();
    let listing = json_body(response).await;
    assert_eq!(listing["success"], true);
    assert_eq!(listing["count"], 2);
    assert_eq!(listing["data"][0]["name"], "second");
    assert_eq!(listing["data"][1]["name"], "first");
}

#[tokio::test]
async fn test_unknown_quiz_is_404() {
    let (app, _tmp) = test_app(paper_model()).await;

    let response = app
        .oneshot(empty_request("GET", "/api/quiz/deadbeef"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_d3_train_and_fetch_analysis() {
    let model = ScriptedModel::new(|prompt| {
        assert!(prompt.contains("TOP 10 most important topics"));
        if prompt.contains("lecture notes") {
            Ok(r#"["Photosynthesis", "Malaria", "Soil"]"#.to_string())
        } else if prompt.contains("exam paper") {
            Ok("```json\n[\"Malaria\", \"Magnets\",]\n```".to_string())
        } else {
            Ok("not json at all".to_string())
        }
    });
    let (app, _tmp) = test_app(model.clone()).await;

    let request = multipart_request(
        "/api/d3-engine/train",
        vec![
            Part::file("lectures", "week1.txt", "text/plain", b"lecture notes on plants and disease"),
            Part::file("exams", "2019.txt", "text/plain", b"exam paper 2019"),
            Part::file("documents", "garbage.bin", "application/octet-stream", b"\x00\x01"),
        ],
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "D³ Engine training completed");
    assert_eq!(body["filesProcessed"], 3);
    assert_eq!(body["totalTopics"], 5);
    assert_eq!(body["topics"], json!(["Malaria", "Photosynthesis", "Soil", "Magnets"]));

    // 主题抽取只发送文本，不附带文档
    assert!(model.calls().iter().all(|c| !c.had_document));

    let analysis_id = body["analysisId"].as_str().unwrap();
    let response = app
        .clone()
        .oneshot(empty_request("GET", &format!("/api/d3-engine/analysis/{analysis_id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let analysis = json_body(response).await;
    assert_eq!(analysis["data"]["status"], "completed");
    assert_eq!(analysis["data"]["file_summaries"][0]["category"], "lectures");
    assert_eq!(analysis["data"]["file_summaries"][0]["samples"].as_array().unwrap().len(), 3);
    assert_eq!(analysis["data"]["file_summaries"][2]["topics_found"], 0);

    let response = app
        .oneshot(empty_request("GET", "/api/d3-engine/analysis/missing1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["message"], "Analysis missing1 not found");
}

#[tokio::test]
async fn test_d3_train_without_files_is_rejected() {
    let model = ScriptedModel::new(|_| panic!("model must not be called"));
    let (app, _tmp) = test_app(model).await;

    let request = multipart_request("/api/d3-engine/train", vec![Part::text("notes", "hello")]);
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["message"], "No files uploaded");
}
