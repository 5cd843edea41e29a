/// Gemini generative ranking provider
///
/// Serializes the corpus to a flat CSV table, embeds it with the user's
/// request into a fixed instruction template, and asks the model for a raw
/// JSON array of row identifiers ordered by relevance. The model sometimes
/// wraps its answer in markdown code fences despite the instructions, so the
/// response is stripped before parsing.
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    models::Corpus,
    services::providers::GenerativeRanker,
};

#[derive(Clone)]
pub struct GeminiRanker {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

impl GeminiRanker {
    pub fn new(api_key: String, api_url: String, model: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
            model,
        }
    }

    /// Fixed instruction template demanding a raw JSON array of integers.
    fn build_prompt(dataset: &str, request: &str, count: usize) -> String {
        format!(
            r#"### ROLE
You are a strict data retrieval assistant. Your job is to query the dataset below.

### DATASET (Movies with ID)
{dataset}

### USER REQUEST
"{request}"

### INSTRUCTIONS
1. Analyze the dataset to find the top {count} movies that best match the User Request.
2. **SORTING:** Order the results by **Relevance** (Best match = First). Do NOT sort numerically.
3. **OUTPUT FORMAT:** Return a raw JSON list of integers only. Do not write explanations. Do not write "json" or markdown tags.

### EXAMPLE OUTPUT
[45, 12, 998]
"#
        )
    }

    /// Removes markdown code-fence wrapping the model might add.
    fn strip_wrapping(text: &str) -> String {
        text.replace("```json", "").replace("```", "").trim().to_string()
    }

    /// Parses the model's answer into corpus row identifiers.
    ///
    /// Unparseable output is a distinct error so callers can tell "no output"
    /// from "bad output"; identifiers outside the corpus are dropped.
    fn parse_row_ids(text: &str, corpus_len: usize) -> AppResult<Vec<usize>> {
        let clean = Self::strip_wrapping(text);

        let raw_ids: Vec<i64> = serde_json::from_str(&clean).map_err(|e| {
            tracing::error!(error = %e, response = %text, "Model did not return a valid id list");
            AppError::ModelOutput(format!("expected a JSON array of integers, got: {}", clean))
        })?;

        let ids: Vec<usize> = raw_ids
            .iter()
            .filter_map(|&id| {
                if id >= 0 && (id as usize) < corpus_len {
                    Some(id as usize)
                } else {
                    tracing::warn!(id, "Dropping unknown row id from model response");
                    None
                }
            })
            .collect();

        Ok(ids)
    }

    async fn generate(&self, prompt: String) -> AppResult<String> {
        let url = format!("{}/models/{}:generateContent", self.api_url, self.model);

        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self
            .http_client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Gemini API returned status {}: {}",
                status, body
            )));
        }

        let generated: GenerateContentResponse = response.json().await?;

        let text = generated
            .candidates
            .first()
            .map(|candidate| {
                candidate
                    .content
                    .parts
                    .iter()
                    .map(|part| part.text.as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .filter(|text| !text.is_empty())
            .ok_or_else(|| {
                AppError::ExternalApi("Gemini API returned no candidates".to_string())
            })?;

        Ok(text)
    }
}

#[async_trait::async_trait]
impl GenerativeRanker for GeminiRanker {
    async fn rank(&self, corpus: &Corpus, request: &str, count: usize) -> AppResult<Vec<usize>> {
        let dataset = corpus.to_prompt_table()?;
        let prompt = Self::build_prompt(&dataset, request, count);

        let answer = self.generate(prompt).await?;
        let ids = Self::parse_row_ids(&answer, corpus.len())?;

        tracing::info!(
            results = ids.len(),
            provider = self.name(),
            "Generative ranking completed"
        );

        Ok(ids)
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}
