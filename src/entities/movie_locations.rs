use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "movie_locations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub release_year: i32,
    pub location: String,
    #[sea_orm(column_type = "Text", nullable)]
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

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
