use crate::domain::MovieId;
use crate::entities::{movie_locations, prelude::*};
use crate::models::movie::{MovieFilter, MovieLocation};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};

pub struct MovieRepository {
    conn: DatabaseConnection,
}

impl MovieRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(model: movie_locations::Model) -> MovieLocation {
        MovieLocation {
            id: MovieId::new(model.id),
            title: model.title,
            year: model.release_year,
            location: model.location,
            fun_fact: model.fun_fact,
            production_company: model.production_company,
            distributor: model.distributor,
            director: model.director,
            writer: model.writer,
            actor_1: model.actor_1,
            actor_2: model.actor_2,
            actor_3: model.actor_3,
            latitude: model.latitude,
            longitude: model.longitude,
        }
    }

    /// Every filter except `title`, which [`Self::list`] applies after the
    /// query. SQLite's `LOWER` folds ASCII only.
    fn filter_condition(filter: &MovieFilter) -> Condition {
        use movie_locations::Column;

        let mut condition = Condition::all();

        if let Some(year) = filter.year {
            condition = condition.add(Column::ReleaseYear.eq(year));
        }

        let exact = [
            (Column::Location, &filter.location),
            (Column::ProductionCompany, &filter.production_company),
            (Column::Distributor, &filter.distributor),
            (Column::Director, &filter.director),
            (Column::Writer, &filter.writer),
            (Column::Actor1, &filter.actor_1),
            (Column::Actor2, &filter.actor_2),
            (Column::Actor3, &filter.actor_3),
        ];
        for (column, value) in exact {
            if let Some(value) = value {
                condition = condition.add(column.eq(value.as_str()));
            }
        }

        condition
    }

    pub async fn list(&self, filter: &MovieFilter) -> Result<Vec<MovieLocation>, sea_orm::DbErr> {
        let mut rows = MovieLocations::find()
            .filter(Self::filter_condition(filter))
            .order_by_asc(movie_locations::Column::Id)
            .all(&self.conn)
            .await?;

        if let Some(title) = &filter.title {
            let wanted = title.to_lowercase();
            rows.retain(|row| row.title.to_lowercase() == wanted);
        }

        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    pub async fn get(&self, id: MovieId) -> Result<Option<MovieLocation>, sea_orm::DbErr> {
        let row = MovieLocations::find_by_id(id.value())
            .one(&self.conn)
            .await?;

        Ok(row.map(Self::map_model))
    }

    pub async fn distinct_titles(&self) -> Result<Vec<String>, sea_orm::DbErr> {
        MovieLocations::find()
            .select_only()
            .column(movie_locations::Column::Title)
            .distinct()
            .order_by_asc(movie_locations::Column::Title)
            .into_tuple::<String>()
            .all(&self.conn)
            .await
    }
}
