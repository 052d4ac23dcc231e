//! Router-level tests driven through `tower::ServiceExt::oneshot` with the
//! deterministic mock embedder, so no model download is needed.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use speechscore_embed::{EmbedError, Embedder, EmbeddingConfig, EmbeddingService, MockEmbedder};
use speechscore_rubric::{
    load_rubric_from_reader, RubricCriterion, RubricTable, ScoringEngine, ScoringResult,
};
use speechscore_web::handlers::system::INDEX_MESSAGE;
use speechscore_web::router::build_router;
use speechscore_web::state::AppState;
use tower::ServiceExt;

const RUBRIC: &str = "criterion_id,criterion_name,description,keywords,min_words,max_words,weight\n\
    C1,Refund policy,Explain the refund policy and return window,\"refund,policy\",5,50,2\n\
    C2,Greeting,Greet the customer politely,\"hello,welcome\",1,20,1\n";

const BOUNDARY: &str = "speechscore-test-boundary";

fn app_with(rubric: RubricTable, embedder: Arc<dyn Embedder>) -> Router {
    let engine = ScoringEngine::new(Arc::new(rubric), embedder);
    build_router(AppState::new(engine), true)
}

fn test_app() -> anyhow::Result<Router> {
    let embedder: Arc<dyn Embedder> = Arc::new(MockEmbedder::new(64));
    let rubric = load_rubric_from_reader(RUBRIC.as_bytes(), b',', embedder.as_ref())?;
    Ok(app_with(rubric, embedder))
}

fn json_request(uri: &str, body: Value) -> anyhow::Result<Request<Body>> {
    Ok(Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))?)
}

fn multipart_request(field: &str, content: &[u8]) -> anyhow::Result<Request<Body>> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"transcript.txt\"\r\n\
             Content-Type: text/plain\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Ok(Request::builder()
        .method("POST")
        .uri("/score-file")
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
        .body(Body::from(body))?)
}

async fn send(app: &Router, req: Request<Body>) -> anyhow::Result<(StatusCode, Value)> {
    let resp = app.clone().oneshot(req).await?;
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    Ok((status, serde_json::from_slice(&bytes)?))
}

#[tokio::test]
async fn index_describes_the_api() -> anyhow::Result<()> {
    let app = test_app()?;
    let (status, body) = send(&app, Request::get("/").body(Body::empty())?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "msg": INDEX_MESSAGE }));
    Ok(())
}

#[tokio::test]
async fn health_reports_criteria_count() -> anyhow::Result<()> {
    let app = test_app()?;
    let (status, body) = send(&app, Request::get("/health").body(Body::empty())?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok", "criteria": 2 }));
    Ok(())
}

#[tokio::test]
async fn health_reports_model_state_before_first_use() -> anyhow::Result<()> {
    let mock: Arc<dyn Embedder> = Arc::new(MockEmbedder::new(8));
    let rubric = load_rubric_from_reader(RUBRIC.as_bytes(), b',', mock.as_ref())?;
    let service = Arc::new(EmbeddingService::new(EmbeddingConfig::default()));
    let state = AppState {
        engine: ScoringEngine::new(Arc::new(rubric), mock),
        embedding: Some(service),
    };
    let app = build_router(state, true);

    // model details appear only once the model is loaded
    let (status, body) = send(&app, Request::get("/health").body(Body::empty())?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok", "criteria": 2, "model_loaded": false }));
    Ok(())
}

#[tokio::test]
async fn rubric_summary_hides_embeddings() -> anyhow::Result<()> {
    let app = test_app()?;
    let (status, body) = send(&app, Request::get("/rubric").body(Body::empty())?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_weight"], 3.0);

    let criteria = body["criteria"].as_array().expect("criteria array");
    assert_eq!(criteria.len(), 2);
    assert_eq!(criteria[0]["criterion_id"], "C1");
    assert_eq!(criteria[0]["keywords"], json!(["refund", "policy"]));
    assert!(criteria[0].get("description_embedding").is_none());
    Ok(())
}

#[tokio::test]
async fn score_returns_per_criterion_breakdown() -> anyhow::Result<()> {
    let app = test_app()?;
    let req = json_request(
        "/score",
        json!({ "transcript": "Hello and welcome. Our refund policy allows returns within thirty days." }),
    )?;
    let (status, body) = send(&app, req).await?;
    assert_eq!(status, StatusCode::OK);

    let result: ScoringResult = serde_json::from_value(body)?;
    assert_eq!(result.words, 11);
    assert_eq!(result.criteria.len(), 2);
    assert_eq!(result.criteria[0].criterion_id, "C1");
    assert_eq!(result.criteria[0].keyword_score, 1.0);
    assert_eq!(result.criteria[1].keywords_found, vec!["hello".to_string(), "welcome".to_string()]);
    assert!((0.0..=100.0).contains(&result.overall_score));
    Ok(())
}

#[tokio::test]
async fn score_accepts_request_weights() -> anyhow::Result<()> {
    let app = test_app()?;
    let transcript = "refund policy";
    let req = json_request(
        "/score",
        json!({ "transcript": transcript, "weights": { "kw": 1.0, "wc": 0.0, "sem": 0.0 } }),
    )?;
    let (status, body) = send(&app, req).await?;
    assert_eq!(status, StatusCode::OK);

    // keyword-only: C1 matches fully (weight 2), C2 not at all (weight 1)
    let result: ScoringResult = serde_json::from_value(body)?;
    assert!((result.overall_score - 66.67).abs() < 1e-9, "{}", result.overall_score);
    Ok(())
}

#[tokio::test]
async fn invalid_weights_are_unprocessable() -> anyhow::Result<()> {
    let app = test_app()?;
    let req = json_request(
        "/score",
        json!({ "transcript": "anything", "weights": { "kw": 0.0, "wc": 0.0, "sem": 0.0 } }),
    )?;
    let (status, body) = send(&app, req).await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap_or_default().contains("weights"));
    Ok(())
}

#[tokio::test]
async fn empty_rubric_is_unprocessable() -> anyhow::Result<()> {
    let app = app_with(RubricTable::new(Vec::new()), Arc::new(MockEmbedder::default()));
    let (status, body) = send(&app, json_request("/score", json!({ "transcript": "hi" }))?).await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].is_string());
    Ok(())
}

struct OfflineEmbedder;

impl Embedder for OfflineEmbedder {
    fn embed_batch(&self, _texts: &[String]) -> speechscore_embed::Result<Vec<Vec<f32>>> {
        Err(EmbedError::Download("network unreachable".into()))
    }
}

#[tokio::test]
async fn embedding_failure_is_service_unavailable() -> anyhow::Result<()> {
    let rubric = RubricTable::new(vec![RubricCriterion {
        criterion_id: "C1".into(),
        criterion_name: "Intro".into(),
        description: "Introduce yourself".into(),
        keywords: vec![],
        min_words: 0,
        max_words: 9999,
        weight: 1.0,
        description_embedding: vec![1.0, 0.0],
    }]);
    let app = app_with(rubric, Arc::new(OfflineEmbedder));

    let (status, body) = send(&app, json_request("/score", json!({ "transcript": "hi there" }))?).await?;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"].as_str().unwrap_or_default().contains("network unreachable"));
    Ok(())
}

#[tokio::test]
async fn score_file_matches_json_scoring() -> anyhow::Result<()> {
    let app = test_app()?;
    let transcript = "Hello there, our refund policy is generous.";

    let (status, from_file) = send(&app, multipart_request("file", transcript.as_bytes())?).await?;
    assert_eq!(status, StatusCode::OK);
    let (_, from_json) = send(&app, json_request("/score", json!({ "transcript": transcript }))?).await?;

    assert_eq!(from_file, from_json);
    Ok(())
}

#[tokio::test]
async fn score_file_rejects_non_utf8() -> anyhow::Result<()> {
    let app = test_app()?;
    let (status, body) = send(&app, multipart_request("file", &[0xff, 0xfe, 0x00, 0xc3])?).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap_or_default().contains("UTF-8"));
    Ok(())
}

#[tokio::test]
async fn score_file_requires_file_field() -> anyhow::Result<()> {
    let app = test_app()?;
    let (status, body) = send(&app, multipart_request("attachment", b"refund policy")?).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap_or_default().contains("'file'"));
    Ok(())
}
