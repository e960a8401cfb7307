use axum::{Json, extract::State};
use std::sync::Arc;

use super::{ApiError, AppState, TitlesResponse};

/// `GET /api/v1/titles`
pub async fn list_titles(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TitlesResponse>, ApiError> {
    let titles = state.movie_service().list_distinct_titles().await?;
    Ok(Json(TitlesResponse { titles }))
}
