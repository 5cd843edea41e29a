//! Movie recommendation API
//!
//! Recommends movies matching a free-text description using two parallel
//! strategies over the same fixed corpus:
//!
//! - **`/ml`**: TF-IDF vector-space search — TextRank keyword extraction,
//!   projection into the fitted space, cosine ranking (`services::{keywords,
//!   tfidf, ranker}`).
//! - **`/llm`**: a delegated query against an external generative model that
//!   receives the whole corpus as a table and returns relevance-ordered row
//!   ids (`services::providers`).
//!
//! The corpus and the fitted index are built once at startup and shared
//! read-only across requests (`api::RecommenderContext`).

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
