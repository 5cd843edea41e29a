use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::models::Movie;

use super::AppState;

const DEFAULT_RESULT_COUNT: usize = 10;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    pub summary: Option<String>,
    pub count: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct MovieResponse {
    pub id: usize,
    pub title: String,
    pub released_year: String,
    pub runtime: String,
    pub genre: String,
    pub imdb_rating: Option<f32>,
    pub overview: String,
    pub meta_score: Option<f32>,
    pub director: String,
    pub star1: String,
    pub star2: String,
    pub star3: String,
    pub star4: String,
    pub poster_link: String,
}

impl From<(usize, &Movie)> for MovieResponse {
    fn from((id, movie): (usize, &Movie)) -> Self {
        Self {
            id,
            title: movie.title.clone(),
            released_year: movie.released_year.clone(),
            runtime: movie.runtime.clone(),
            genre: movie.genre.clone(),
            imdb_rating: movie.imdb_rating,
            overview: movie.overview.clone(),
            meta_score: movie.meta_score,
            director: movie.director.clone(),
            star1: movie.star1.clone(),
            star2: movie.star2.clone(),
            star3: movie.star3.clone(),
            star4: movie.star4.clone(),
            poster_link: movie.poster_link.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SimilarityResponse {
    pub recommendations: Vec<MovieResponse>,
    pub keywords: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerativeResponse {
    pub recommendations: Vec<MovieResponse>,
}

/// Unwraps the request body, turning extractor rejections and a missing or
/// empty summary into client errors that name the problem.
fn validate_request(
    payload: Result<Json<RecommendRequest>, JsonRejection>,
) -> AppResult<(String, usize)> {
    let Json(request) = payload
        .map_err(|rejection| AppError::InvalidInput(format!("Invalid request body: {}", rejection)))?;

    let summary = request
        .summary
        .ok_or_else(|| AppError::InvalidInput("Missing field 'summary'".to_string()))?;

    if summary.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "Field 'summary' must not be empty".to_string(),
        ));
    }

    Ok((summary, request.count.unwrap_or(DEFAULT_RESULT_COUNT)))
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Rank movies against the request summary by cosine similarity
pub async fn recommend_similarity(
    State(state): State<AppState>,
    payload: Result<Json<RecommendRequest>, JsonRejection>,
) -> AppResult<Json<SimilarityResponse>> {
    let context = state.context()?;
    let (summary, count) = validate_request(payload)?;

    let (ranked, keywords) = context.ranker.rank(&summary, count);

    let recommendations: Vec<MovieResponse> = ranked
        .iter()
        .filter_map(|movie| context.corpus.get(movie.id).map(|m| (movie.id, m).into()))
        .collect();

    tracing::info!(
        results = recommendations.len(),
        keywords = %keywords,
        "Similarity ranking completed"
    );

    Ok(Json(SimilarityResponse {
        recommendations,
        keywords: vec![keywords],
    }))
}

/// Rank movies against the request summary via the generative provider
pub async fn recommend_generative(
    State(state): State<AppState>,
    payload: Result<Json<RecommendRequest>, JsonRejection>,
) -> AppResult<Json<GenerativeResponse>> {
    let context = state.context()?;
    let (summary, count) = validate_request(payload)?;

    let ids = state
        .generative()
        .rank(&context.corpus, &summary, count)
        .await?;

    let recommendations: Vec<MovieResponse> = ids
        .iter()
        .filter_map(|&id| context.corpus.get(id).map(|m| (id, m).into()))
        .collect();

    Ok(Json(GenerativeResponse { recommendations }))
}
