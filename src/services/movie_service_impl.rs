//! `SeaORM` implementation of the [`MovieService`] trait.

use crate::api::types::MovieDto;
use crate::db::Store;
use crate::domain::MovieId;
use crate::models::movie::MovieFilter;
use crate::services::movie_service::{MovieError, MovieService, movie_to_dto};
use std::sync::Arc;
use tracing::debug;

pub struct SeaOrmMovieService {
    store: Arc<Store>,
}

impl SeaOrmMovieService {
    #[must_use]
    pub const fn new(store: Arc<Store>) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl MovieService for SeaOrmMovieService {
    async fn list_movies(&self, filter: &MovieFilter) -> Result<Vec<MovieDto>, MovieError> {
        let movies = self.store.list_movies(filter).await?;
        debug!(count = movies.len(), filtered = !filter.is_empty(), "Listed movies");
        Ok(movies.into_iter().map(movie_to_dto).collect())
    }

    async fn get_movie(&self, id: MovieId) -> Result<MovieDto, MovieError> {
        self.store
            .get_movie(id)
            .await?
            .map(movie_to_dto)
            .ok_or(MovieError::NotFound(id))
    }

    async fn list_distinct_titles(&self) -> Result<Vec<String>, MovieError> {
        Ok(self.store.list_distinct_titles().await?)
    }
}
