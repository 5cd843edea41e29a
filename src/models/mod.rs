use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// A single movie row from the dataset.
///
/// Identified by its position in the [`Corpus`]; attributes are immutable for
/// the process lifetime. Release year and runtime stay as strings because the
/// source data contains non-numeric values in both columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
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

impl Movie {
    /// Builds the searchable text for this movie.
    ///
    /// Whitespace-joined concatenation of title, year, genre, director, the
    /// four cast names and the overview. Display-only fields (poster link,
    /// runtime, ratings) never enter the soup.
    pub fn soup(&self) -> String {
        [
            self.title.as_str(),
            self.released_year.as_str(),
            self.genre.as_str(),
            self.director.as_str(),
            self.star1.as_str(),
            self.star2.as_str(),
            self.star3.as_str(),
            self.star4.as_str(),
            self.overview.as_str(),
        ]
        .join(" ")
    }
}

/// Ordered, read-only collection of movies loaded once at startup.
///
/// Row identifiers are positions into this collection and remain stable for
/// the process lifetime.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    movies: Vec<Movie>,
}

impl Corpus {
    pub fn new(movies: Vec<Movie>) -> Self {
        Self { movies }
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn get(&self, id: usize) -> Option<&Movie> {
        self.movies.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Movie> {
        self.movies.iter()
    }

    /// Soup strings for every movie, in corpus order.
    pub fn soups(&self) -> Vec<String> {
        self.movies.iter().map(Movie::soup).collect()
    }

    /// Serializes the corpus to a flat CSV table for the generative prompt.
    ///
    /// Leads with the row id and excludes display-only columns so the model
    /// only sees the searchable fields.
    pub fn to_prompt_table(&self) -> AppResult<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record([
            "id", "title", "released_year", "genre", "director", "star1", "star2", "star3",
            "star4", "overview",
        ])?;

        for (id, movie) in self.movies.iter().enumerate() {
            writer.write_record([
                id.to_string().as_str(),
                movie.title.as_str(),
                movie.released_year.as_str(),
                movie.genre.as_str(),
                movie.director.as_str(),
                movie.star1.as_str(),
                movie.star2.as_str(),
                movie.star3.as_str(),
                movie.star4.as_str(),
                movie.overview.as_str(),
            ])?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| AppError::Internal(format!("CSV buffer error: {}", e)))?;
        String::from_utf8(bytes).map_err(|e| AppError::Internal(format!("CSV encoding: {}", e)))
    }
}
