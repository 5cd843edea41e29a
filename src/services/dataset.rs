use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::config::Config;
use crate::models::{Corpus, Movie};

/// Raw dataset row as shipped in the IMDB Top-1000 CSV.
///
/// Only the columns the system uses are mapped; certificate, vote count and
/// gross are dropped at parse time. Every text field is optional so rows with
/// gaps survive parsing and get filled with empty strings.
#[derive(Debug, Deserialize)]
struct MovieRow {
    #[serde(rename = "Series_Title")]
    title: Option<String>,
    #[serde(rename = "Released_Year")]
    released_year: Option<String>,
    #[serde(rename = "Runtime")]
    runtime: Option<String>,
    #[serde(rename = "Genre")]
    genre: Option<String>,
    #[serde(rename = "IMDB_Rating")]
    imdb_rating: Option<f32>,
    #[serde(rename = "Overview")]
    overview: Option<String>,
    #[serde(rename = "Meta_score")]
    meta_score: Option<f32>,
    #[serde(rename = "Director")]
    director: Option<String>,
    #[serde(rename = "Star1")]
    star1: Option<String>,
    #[serde(rename = "Star2")]
    star2: Option<String>,
    #[serde(rename = "Star3")]
    star3: Option<String>,
    #[serde(rename = "Star4")]
    star4: Option<String>,
    #[serde(rename = "Poster_Link")]
    poster_link: Option<String>,
}

impl From<MovieRow> for Movie {
    fn from(row: MovieRow) -> Self {
        Self {
            title: row.title.unwrap_or_default(),
            released_year: row.released_year.unwrap_or_default(),
            runtime: row.runtime.unwrap_or_default(),
            genre: row.genre.unwrap_or_default(),
            imdb_rating: row.imdb_rating,
            overview: row.overview.unwrap_or_default(),
            meta_score: row.meta_score,
            director: row.director.unwrap_or_default(),
            star1: row.star1.unwrap_or_default(),
            star2: row.star2.unwrap_or_default(),
            star3: row.star3.unwrap_or_default(),
            star4: row.star4.unwrap_or_default(),
            poster_link: row.poster_link.unwrap_or_default(),
        }
    }
}

/// Loads the movie corpus from the configured cache path, downloading the
/// dataset first when the file is missing and a URL is configured.
pub async fn load_corpus(config: &Config) -> Result<Corpus> {
    let path = Path::new(&config.dataset_path);

    if !path.exists() {
        let url = config
            .dataset_url
            .as_deref()
            .context("Dataset file missing and no DATASET_URL configured")?;
        download_dataset(url, path).await?;
    }

    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open dataset at {}", path.display()))?;
    let corpus = parse_corpus(file)?;

    tracing::info!(
        movies = corpus.len(),
        path = %path.display(),
        "Movie dataset loaded"
    );

    Ok(corpus)
}

/// Parses CSV movie rows in dataset column order from any reader.
pub fn parse_corpus<R: Read>(reader: R) -> Result<Corpus> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut movies = Vec::new();

    for result in csv_reader.deserialize() {
        let row: MovieRow = result.context("Failed to parse movie record")?;
        movies.push(Movie::from(row));
    }

    if movies.is_empty() {
        anyhow::bail!("Dataset contained no movie rows");
    }

    Ok(Corpus::new(movies))
}

async fn download_dataset(url: &str, path: &Path) -> Result<()> {
    tracing::info!(%url, "Downloading movie dataset");

    let response = reqwest::get(url)
        .await
        .context("Dataset download request failed")?;

    if !response.status().is_success() {
        anyhow::bail!("Dataset download returned status {}", response.status());
    }

    let bytes = response
        .bytes()
        .await
        .context("Failed to read dataset download body")?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(path, &bytes)
        .with_context(|| format!("Failed to write dataset to {}", path.display()))?;

    tracing::info!(bytes = bytes.len(), path = %path.display(), "Dataset cached");
    Ok(())
}
