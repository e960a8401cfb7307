use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, AppState, MovieResponse, MoviesResponse};
use crate::domain::MovieId;
use crate::models::movie::MovieFilter;
use crate::services::{MovieError, parse_year};

/// Raw `/movies` query string. `year` stays a string so [`parse_year`]
/// reports a malformed value instead of the extractor rejecting it.
#[derive(Debug, Default, Deserialize)]
pub struct MovieQuery {
    pub title: Option<String>,
    pub year: Option<String>,
    pub location: Option<String>,
    pub production_company: Option<String>,
    pub distributor: Option<String>,
    pub director: Option<String>,
    pub writer: Option<String>,
    pub actor_1: Option<String>,
    pub actor_2: Option<String>,
    pub actor_3: Option<String>,
}

impl TryFrom<MovieQuery> for MovieFilter {
    type Error = MovieError;

    fn try_from(query: MovieQuery) -> Result<Self, Self::Error> {
        Ok(Self {
            title: query.title,
            year: query.year.as_deref().map(parse_year).transpose()?,
            location: query.location,
            production_company: query.production_company,
            distributor: query.distributor,
            director: query.director,
            writer: query.writer,
            actor_1: query.actor_1,
            actor_2: query.actor_2,
            actor_3: query.actor_3,
        })
    }
}

/// `GET /api/v1/movies`
pub async fn list_movies(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MovieQuery>,
) -> Result<Json<MoviesResponse>, ApiError> {
    let filter = MovieFilter::try_from(query)?;
    let movies = state.movie_service().list_movies(&filter).await?;
    Ok(Json(MoviesResponse { movies }))
}

/// `GET /api/v1/movies/{id}`
pub async fn get_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<MovieResponse>, ApiError> {
    let movie = state.movie_service().get_movie(MovieId::new(id)).await?;
    Ok(Json(MovieResponse { movie }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_to_filter() {
        let query = MovieQuery {
            title: Some("Greed".to_string()),
            year: Some("1924".to_string()),
            ..MovieQuery::default()
        };
        let filter = MovieFilter::try_from(query).unwrap();
        assert_eq!(filter, MovieFilter::default().with_title("Greed").with_year(1924));
    }

    #[test]
    fn test_malformed_year_is_rejected() {
        let query = MovieQuery {
            year: Some("19x4".to_string()),
            ..MovieQuery::default()
        };
        assert!(matches!(
            MovieFilter::try_from(query),
            Err(MovieError::InvalidArgument(_))
        ));
    }
}
