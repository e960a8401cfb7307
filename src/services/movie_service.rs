//! Domain service for reading movie filming locations.
//!
//! Handlers go through [`MovieService`] rather than the [`Store`](crate::db::Store)
//! so the record source can be wrapped or replaced in tests.

use crate::api::types::MovieDto;
use crate::domain::MovieId;
use crate::models::movie::{MovieFilter, MovieLocation};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MovieError {
    #[error("Movie not found: {0}")]
    NotFound(MovieId),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Record store unavailable: {0}")]
    Unavailable(String),
}

impl From<sea_orm::DbErr> for MovieError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Unavailable(err.to_string())
    }
}

#[async_trait::async_trait]
pub trait MovieService: Send + Sync {
    /// Lists locations matching every filter in `filter`, ascending by id.
    ///
    /// # Errors
    ///
    /// Returns [`MovieError::Unavailable`] when the record store fails.
    async fn list_movies(&self, filter: &MovieFilter) -> Result<Vec<MovieDto>, MovieError>;

    /// Fetches a single location by id.
    ///
    /// # Errors
    ///
    /// - Returns [`MovieError::NotFound`] if no record has this id
    /// - Returns [`MovieError::Unavailable`] when the record store fails
    async fn get_movie(&self, id: MovieId) -> Result<MovieDto, MovieError>;

    /// Lists every distinct title once, in ascending order.
    ///
    /// # Errors
    ///
    /// Returns [`MovieError::Unavailable`] when the record store fails.
    async fn list_distinct_titles(&self) -> Result<Vec<String>, MovieError>;
}

/// Parses the raw `year` filter.
///
/// # Errors
///
/// Returns [`MovieError::InvalidArgument`] unless `raw` is an integer.
pub fn parse_year(raw: &str) -> Result<i32, MovieError> {
    raw.trim().parse::<i32>().map_err(|_| {
        MovieError::InvalidArgument(format!(
            "Invalid year: '{}'. Year must be an integer",
            raw
        ))
    })
}

/// Self link for a single location, as exposed by the HTTP API.
#[must_use]
pub fn movie_uri(id: MovieId) -> String {
    format!("{}/movies/{id}", crate::constants::API_PREFIX)
}

pub fn movie_to_dto(movie: MovieLocation) -> MovieDto {
    MovieDto {
        uri: movie_uri(movie.id),
        id: movie.id.value(),
        title: movie.title,
        year: movie.year,
        location: movie.location,
        fun_fact: movie.fun_fact,
        production_company: movie.production_company,
        distributor: movie.distributor,
        director: movie.director,
        writer: movie.writer,
        actor_1: movie.actor_1,
        actor_2: movie.actor_2,
        actor_3: movie.actor_3,
        latitude: movie.latitude,
        longitude: movie.longitude,
    }
}
