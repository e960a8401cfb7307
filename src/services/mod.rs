pub mod movie_service;
pub use movie_service::{MovieError, MovieService, parse_year};

pub mod movie_service_impl;
pub use movie_service_impl::SeaOrmMovieService;
