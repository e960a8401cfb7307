use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieDto {
    pub id: i32,
    pub title: String,
    pub year: i32,
    pub location: String,
    pub fun_fact: Option<String>,
    pub production_company: Option<String>,
    pub distributor: Option<String>,
    pub director: Option<String>,
    pub writer: Option<String>,
    pub actor_1: Option<String>,
    pub actor_2: Option<String>,
    pub actor_3: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Self link, e.g. `/api/v1/movies/4`.
    pub uri: String,
}

#[derive(Debug, Serialize)]
pub struct MoviesResponse {
    pub movies: Vec<MovieDto>,
}

#[derive(Debug, Serialize)]
pub struct MovieResponse {
    pub movie: MovieDto,
}

#[derive(Debug, Serialize)]
pub struct TitlesResponse {
    pub titles: Vec<String>,
}
