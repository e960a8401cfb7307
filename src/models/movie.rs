use crate::domain::MovieId;

#[derive(Debug, Clone, PartialEq)]
pub struct MovieLocation {
    pub id: MovieId,
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
}

/// Exact-match filters for listing locations. Every `Some` field must match;
/// `title` compares case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovieFilter {
    pub title: Option<String>,
    pub year: Option<i32>,
    pub location: Option<String>,
    pub production_company: Option<String>,
    pub distributor: Option<String>,
    pub director: Option<String>,
    pub writer: Option<String>,
    pub actor_1: Option<String>,
    pub actor_2: Option<String>,
    pub actor_3: Option<String>,
}

impl MovieFilter {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.year.is_none()
            && self.location.is_none()
            && self.production_company.is_none()
            && self.distributor.is_none()
            && self.director.is_none()
            && self.writer.is_none()
            && self.actor_1.is_none()
            && self.actor_2.is_none()
            && self.actor_3.is_none()
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub const fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }
}
