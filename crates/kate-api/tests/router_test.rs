//! End-to-end router tests with mock clients.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use kate_api::state::{AppState, StageFactory};
use kate_api::router;
use kate_core::{
    Content, Document, DocumentClass, LibraryEntry, Page, Paragraph, Reference, StageCredentials,
};
use kate_semantha::{MockSemantha, SemanthaApi};
use kate_stage::{MockStage, StageStore};

fn analyzed_document(name: &str) -> Document {
    Document {
        id: format!("id-{name}"),
        name: name.to_string(),
        pages: vec![Page {
            contents: Some(vec![Content {
                paragraphs: Some(vec![
                    Paragraph {
                        id: "p1".to_string(),
                        text: "emissions must be reported annually".to_string(),
                        references: Some(vec![Reference {
                            document_id: "lib1".to_string(),
                            paragraph_id: "lp1".to_string(),
                            similarity: 0.92,
                        }]),
                    },
                    Paragraph {
                        id: "p2".to_string(),
                        text: "unrelated boilerplate".to_string(),
                        references: None,
                    },
                ]),
            }]),
        }],
    }
}

fn configured_semantha(name: &str) -> MockSemantha {
    MockSemantha::new()
        .with_compare_result(analyzed_document(name))
        .with_document_tags("lib1", vec!["Climate".to_string()])
        .with_document_name("lib1", "Climate Directive")
        .with_paragraph_text("lib1", "lp1", "emissions are reported annually")
        .with_library_tags(vec!["Climate".to_string(), "Social".to_string()])
        .with_entries_for_tag(
            "Climate",
            vec![LibraryEntry {
                id: "lib1".to_string(),
                name: "Climate Directive".to_string(),
                content_preview: String::new(),
            }],
        )
        .with_document_category(
            "lib1",
            Some(DocumentClass {
                id: "climate".to_string(),
                name: "Climate".to_string(),
                parent_id: None,
            }),
        )
        .with_answer("Yes, annually.", vec![])
        .with_summary("Emissions reporting is mandatory.")
}

fn mock_stage_factory(stage: Arc<MockStage>) -> StageFactory {
    Arc::new(move |_| Ok(stage.clone() as Arc<dyn StageStore>))
}

fn app(semantha: MockSemantha, stage: Arc<MockStage>) -> Router {
    router(AppState::for_tests(
        Arc::new(semantha) as Arc<dyn SemanthaApi>,
        mock_stage_factory(stage),
    ))
}

fn complete_credentials() -> serde_json::Value {
    serde_json::json!({
        "account": "acct", "user": "user", "password": "pw", "role": "role",
        "warehouse": "wh", "database": "db", "schema": "public", "stage": "docs"
    })
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    session: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("x-session-id", session);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).unwrap())
        }
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

/// Multipart body carrying only the built-in sample marker.
fn sample_upload_request(session: &str) -> Request<Body> {
    let boundary = "kate-test-boundary";
    let body = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"sample\"\r\n\r\ntrue\r\n--{boundary}--\r\n"
    );
    Request::builder()
        .method("POST")
        .uri("/pages/compare/analyze")
        .header("x-session-id", session)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let app = app(MockSemantha::new(), Arc::new(MockStage::new()));
    let (status, body) = send(&app, "GET", "/health", "t", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn navigation_sets_the_session_page() {
    let app = app(MockSemantha::new(), Arc::new(MockStage::new()));
    let (status, body) = send(
        &app,
        "POST",
        "/session/page",
        "t",
        Some(serde_json::json!({"page": "question_answer"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["label"], "Semantic Q&A");
}

#[tokio::test]
async fn compare_page_is_empty_before_analysis() {
    let app = app(MockSemantha::new(), Arc::new(MockStage::new()));
    let (status, body) = send(&app, "GET", "/pages/compare", "t", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["analyzed"], false);
    assert_eq!(body["match_count"], 0);
}

#[tokio::test]
async fn sample_analysis_renders_matches_topics_and_sunburst() {
    let app = app(
        configured_semantha("sample_supplier_code.txt"),
        Arc::new(MockStage::new()),
    );
    let response = app.clone().oneshot(sample_upload_request("t")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(body["analyzed"], true);
    assert_eq!(body["match_count"], 1);
    assert_eq!(body["topics"][0]["page"], "1");
    assert_eq!(body["topics"][0]["topic"], "Climate");
    assert_eq!(body["matches"][0]["similarity_percent"], "92%");
    assert_eq!(body["matches"][0]["color"], "#FDD835");
    assert_eq!(body["matches"][0]["library_document"], "Climate Directive");
    assert_eq!(body["sunburst"]["labels"][0], "Climate");

    // The analysis survives a re-render of the same session.
    let (status, rerender) = send(&app, "GET", "/pages/compare", "t", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rerender["analyzed"], true);

    // Another session is unaffected.
    let (_, other) = send(&app, "GET", "/pages/compare", "other", None).await;
    assert_eq!(other["analyzed"], false);
}

#[tokio::test]
async fn strictness_applies_the_documented_thresholds() {
    let app = app(MockSemantha::new(), Arc::new(MockStage::new()));
    let (status, body) = send(
        &app,
        "POST",
        "/settings/strictness",
        "t",
        Some(serde_json::json!({"level": "strict"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["threshold"], 0.75);
}

#[tokio::test]
async fn tag_options_include_the_untagged_sentinel() {
    let app = app(
        MockSemantha::new().with_library_tags(vec!["Climate".to_string()]),
        Arc::new(MockStage::new()),
    );
    let (status, body) = send(&app, "GET", "/settings/tags", "t", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["options"],
        serde_json::json!(["Climate", "(no tag)"])
    );
}

#[tokio::test]
async fn empty_question_is_rejected_inline() {
    let app = app(MockSemantha::new(), Arc::new(MockStage::new()));
    let (status, body) = send(
        &app,
        "POST",
        "/pages/qa/ask",
        "t",
        Some(serde_json::json!({"question": "   "})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("question"));
}

#[tokio::test]
async fn questions_get_answers_with_reference_tags() {
    let semantha = MockSemantha::new()
        .with_answer(
            "Yes, annually.",
            vec![kate_core::AnswerReference {
                id: "lib1".to_string(),
                name: "Climate Directive".to_string(),
                content: "emissions are reported annually".to_string(),
            }],
        )
        .with_document_tags("lib1", vec!["Climate".to_string()]);
    let app = app(semantha, Arc::new(MockStage::new()));
    let (status, body) = send(
        &app,
        "POST",
        "/pages/qa/ask",
        "t",
        Some(serde_json::json!({"question": "How often are emissions reported?"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["answer"], "Yes, annually.");
    assert_eq!(body["references"][0]["tag"], "Climate");
}

#[tokio::test]
async fn stage_listing_requires_complete_credentials() {
    let app = app(MockSemantha::new(), Arc::new(MockStage::new()));
    let (status, body) = send(&app, "GET", "/pages/collection/files", "t", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("credentials"));
}

#[tokio::test]
async fn batch_flow_analyzes_stage_files_and_summarizes() {
    let stage = Arc::new(
        MockStage::new()
            .with_file("reports/a.pdf", b"%PDF-1.7")
            .with_file("reports/skip.csv", b"x;y"),
    );
    let app = app(configured_semantha("a.pdf"), stage);

    let (status, _) = send(
        &app,
        "POST",
        "/settings/credentials",
        "t",
        Some(complete_credentials()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "POST", "/pages/collection/analyze", "t", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["analyzed_count"], 1);
    assert_eq!(body["documents"], serde_json::json!(["a.pdf"]));

    let (status, overview) = send(&app, "GET", "/pages/collection", "t", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(overview["analyzed"], true);
    assert_eq!(overview["topic_counts"][0]["tag"], "Climate");
    assert_eq!(overview["topic_counts"][0]["count"], 1);
    assert_eq!(overview["documents"][0]["name"], "a.pdf");

    let (status, summary) = send(
        &app,
        "POST",
        "/pages/collection/summarize",
        "t",
        Some(serde_json::json!({"tag": "Climate"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["summary"], "Emissions reporting is mandatory.");
    assert_eq!(summary["sources"][0]["index"], 1);
    assert_eq!(summary["sources"][0]["document"], "a.pdf");

    // A topic without hits is informational, not an error.
    let (status, empty) = send(
        &app,
        "POST",
        "/pages/collection/summarize",
        "t",
        Some(serde_json::json!({"tag": "Social"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(empty["summary"].is_null());
}

#[tokio::test]
async fn batch_documents_can_be_promoted_to_the_compare_page() {
    let stage = Arc::new(MockStage::new().with_file("a.pdf", b"%PDF-1.7"));
    let app = app(configured_semantha("a.pdf"), stage);

    send(&app, "POST", "/settings/credentials", "t", Some(complete_credentials())).await;
    send(&app, "POST", "/pages/collection/analyze", "t", None).await;

    let (status, body) = send(
        &app,
        "POST",
        "/pages/collection/promote",
        "t",
        Some(serde_json::json!({"document": "a.pdf"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"], "individual_document");

    let (_, compare) = send(&app, "GET", "/pages/compare", "t", None).await;
    assert_eq!(compare["document"], "a.pdf");

    let (status, _) = send(
        &app,
        "POST",
        "/pages/collection/promote",
        "t",
        Some(serde_json::json!({"document": "missing.pdf"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn pdf_preview_is_base64_and_gated_by_extension() {
    let stage = Arc::new(MockStage::new().with_file("a.pdf", b"%PDF-1.7"));
    let app = app(MockSemantha::new(), stage);

    send(&app, "POST", "/settings/credentials", "t", Some(complete_credentials())).await;

    let (status, body) =
        send(&app, "GET", "/pages/collection/files/a.pdf/preview", "t", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content_base64"], "JVBERi0xLjc=");

    let (status, _) =
        send(&app, "GET", "/pages/collection/files/a.csv/preview", "t", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn entering_own_credentials_disables_the_default_account() {
    let app = app(MockSemantha::new(), Arc::new(MockStage::new()));
    let (status, body) = send(
        &app,
        "POST",
        "/settings/credentials",
        "t",
        Some(serde_json::json!({
            "account": "  acct  ", "user": "", "password": "", "role": "",
            "warehouse": "", "database": "", "schema": "", "stage": ""
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["complete"], false);
    assert_eq!(body["default_credentials_enabled"], false);
}

#[tokio::test]
async fn default_account_is_gated_by_the_shared_secret() {
    let mut state = AppState::for_tests(
        Arc::new(MockSemantha::new()) as Arc<dyn SemanthaApi>,
        mock_stage_factory(Arc::new(MockStage::new())),
    );
    state.default_secret = Some("open sesame".to_string());
    state.default_credentials = Some(StageCredentials {
        account: "acct".into(),
        user: "user".into(),
        password: "pw".into(),
        role: "role".into(),
        warehouse: "wh".into(),
        database: "db".into(),
        schema: "public".into(),
        stage: "docs".into(),
    });
    let app = router(state);

    let (status, _) = send(
        &app,
        "POST",
        "/settings/credentials/default",
        "t",
        Some(serde_json::json!({"secret": "wrong"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = send(
        &app,
        "POST",
        "/settings/credentials/default",
        "t",
        Some(serde_json::json!({"secret": "open sesame"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["complete"], true);
    assert_eq!(body["default_credentials_enabled"], true);
}
