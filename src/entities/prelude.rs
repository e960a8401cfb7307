pub use super::movie_locations::Entity as MovieLocations;
