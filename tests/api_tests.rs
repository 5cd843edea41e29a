use std::sync::Arc;

use axum_test::TestServer;
use serde_json::json;

use cinerec_api::api::{create_router, AppState, RecommenderContext};
use cinerec_api::error::{AppError, AppResult};
use cinerec_api::models::{Corpus, Movie};
use cinerec_api::services::GenerativeRanker;

fn movie(title: &str, director: &str, overview: &str) -> Movie {
    Movie {
        title: title.to_string(),
        released_year: "1994".to_string(),
        runtime: "120 min".to_string(),
        genre: "Crime, Drama".to_string(),
        imdb_rating: Some(8.5),
        overview: overview.to_string(),
        meta_score: Some(90.0),
        director: director.to_string(),
        star1: "Star One".to_string(),
        star2: "Star Two".to_string(),
        star3: String::new(),
        star4: String::new(),
        poster_link: "https://example.com/poster.jpg".to_string(),
    }
}

fn test_corpus() -> Corpus {
    Corpus::new(vec![
        movie("The Matrix", "Lana Wachowski", "A hacker learns reality is a simulation"),
        movie("Pulp Fiction", "Quentin Tarantino", "Interwoven tales of crime in Los Angeles"),
        movie("Spirited Away", "Hayao Miyazaki", "A girl wanders into a world of spirits"),
    ])
}

/// Provider double that returns a fixed id list without any network call.
struct ScriptedRanker {
    ids: Vec<usize>,
}

#[async_trait::async_trait]
impl GenerativeRanker for ScriptedRanker {
    async fn rank(&self, _corpus: &Corpus, _request: &str, _count: usize) -> AppResult<Vec<usize>> {
        Ok(self.ids.clone())
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

struct FailingRanker;

#[async_trait::async_trait]
impl GenerativeRanker for FailingRanker {
    async fn rank(&self, _corpus: &Corpus, _request: &str, _count: usize) -> AppResult<Vec<usize>> {
        Err(AppError::ExternalApi("model endpoint unreachable".to_string()))
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

fn create_test_server_with(
    context: Option<RecommenderContext>,
    generative: Arc<dyn GenerativeRanker>,
) -> TestServer {
    let state = AppState::new(context, generative);
    let app = create_router(state);
    TestServer::new(app).unwrap()
}

fn create_test_server() -> TestServer {
    create_test_server_with(
        Some(RecommenderContext::new(test_corpus())),
        Arc::new(ScriptedRanker { ids: vec![1, 0] }),
    )
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_similarity_ranks_matching_movie_first() {
    let server = create_test_server();

    let response = server
        .post("/ml")
        .json(&json!({ "summary": "Tarantino" }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();

    let recommendations = body["recommendations"].as_array().unwrap();
    assert!(!recommendations.is_empty());
    assert_eq!(recommendations[0]["title"], "Pulp Fiction");
    assert_eq!(recommendations[0]["id"], 1);

    // Query below the extraction minimum: searched with the raw text.
    assert_eq!(body["keywords"], json!(["Tarantino"]));
}

#[tokio::test]
async fn test_similarity_respects_count() {
    let server = create_test_server();

    let response = server
        .post("/ml")
        .json(&json!({ "summary": "crime in the city", "count": 2 }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["recommendations"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_similarity_count_beyond_corpus_returns_all() {
    let server = create_test_server();

    let response = server
        .post("/ml")
        .json(&json!({ "summary": "spirits", "count": 50 }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["recommendations"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_missing_summary_is_a_client_error() {
    let server = create_test_server();

    let response = server.post("/ml").json(&json!({ "count": 3 })).await;

    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("summary"));
}

#[tokio::test]
async fn test_empty_summary_is_a_client_error() {
    let server = create_test_server();

    let response = server.post("/ml").json(&json!({ "summary": "   " })).await;

    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_non_json_body_is_a_client_error() {
    let server = create_test_server();

    let response = server.post("/ml").text("summary=tarantino").await;

    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_similarity_unavailable_without_dataset() {
    let server = create_test_server_with(None, Arc::new(ScriptedRanker { ids: vec![] }));

    let response = server
        .post("/ml")
        .json(&json!({ "summary": "anything" }))
        .await;

    response.assert_status(axum::http::StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_generative_returns_rows_in_model_order() {
    let server = create_test_server_with(
        Some(RecommenderContext::new(test_corpus())),
        Arc::new(ScriptedRanker { ids: vec![2, 0] }),
    );

    let response = server
        .post("/llm")
        .json(&json!({ "summary": "something whimsical" }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();

    let recommendations = body["recommendations"].as_array().unwrap();
    assert_eq!(recommendations.len(), 2);
    assert_eq!(recommendations[0]["title"], "Spirited Away");
    assert_eq!(recommendations[1]["title"], "The Matrix");
}

#[tokio::test]
async fn test_generative_drops_rows_outside_corpus() {
    let server = create_test_server_with(
        Some(RecommenderContext::new(test_corpus())),
        Arc::new(ScriptedRanker { ids: vec![1, 99] }),
    );

    let response = server
        .post("/llm")
        .json(&json!({ "summary": "crime stories" }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();

    let recommendations = body["recommendations"].as_array().unwrap();
    assert_eq!(recommendations.len(), 1);
    assert_eq!(recommendations[0]["title"], "Pulp Fiction");
}

#[tokio::test]
async fn test_generative_provider_failure_is_a_gateway_error() {
    let server = create_test_server_with(
        Some(RecommenderContext::new(test_corpus())),
        Arc::new(FailingRanker),
    );

    let response = server
        .post("/llm")
        .json(&json!({ "summary": "anything" }))
        .await;

    response.assert_status(axum::http::StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_generative_unavailable_without_dataset() {
    let server = create_test_server_with(None, Arc::new(ScriptedRanker { ids: vec![0] }));

    let response = server
        .post("/llm")
        .json(&json!({ "summary": "anything" }))
        .await;

    response.assert_status(axum::http::StatusCode::SERVICE_UNAVAILABLE);
}
