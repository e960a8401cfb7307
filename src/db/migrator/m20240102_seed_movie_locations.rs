use crate::entities::movie_locations::Column;
use crate::entities::prelude::*;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

struct SeedLocation {
    title: &'static str,
    release_year: i32,
    location: &'static str,
    fun_fact: Option<&'static str>,
    production_company: Option<&'static str>,
    distributor: Option<&'static str>,
    director: Option<&'static str>,
    writer: Option<&'static str>,
    actors: [Option<&'static str>; 3],
    coordinates: Option<(f64, f64)>,
}

impl SeedLocation {
    fn values(&self) -> Vec<SimpleExpr> {
        let owned = |s: Option<&str>| s.map(str::to_string);
        vec![
            self.title.into(),
            self.release_year.into(),
            self.location.into(),
            owned(self.fun_fact).into(),
            owned(self.production_company).into(),
            owned(self.distributor).into(),
            owned(self.director).into(),
            owned(self.writer).into(),
            owned(self.actors[0]).into(),
            owned(self.actors[1]).into(),
            owned(self.actors[2]).into(),
            self.coordinates.map(|(lat, _)| lat).into(),
            self.coordinates.map(|(_, lng)| lng).into(),
        ]
    }
}

const MGM: Option<&str> = Some("Metro-Goldwyn-Mayer (MGM)");
const ESSANAY: Option<&str> = Some("The Essanay Film Manufacturing Company");

const SEED: &[SeedLocation] = &[
    SeedLocation {
        title: "A Jitney Elopement",
        release_year: 1915,
        location: "Golden Gate Park",
        fun_fact: Some(
            "During San Francisco's Gold Rush era, the Park was part of an area designated as the \"Great Sand Waste\". ",
        ),
        production_company: ESSANAY,
        distributor: Some("General Film Company"),
        director: Some("Charles Chaplin"),
        writer: Some("Charles Chaplin"),
        actors: [Some("Charles Chaplin"), None, None],
        coordinates: Some((37.769_420_8, -122.486_213_8)),
    },
    SeedLocation {
        title: "A Jitney Elopement",
        release_year: 1915,
        location: "20th and Folsom Streets",
        fun_fact: None,
        production_company: ESSANAY,
        distributor: Some("General Film Company"),
        director: Some("Charles Chaplin"),
        writer: Some("Charles Chaplin"),
        actors: [Some("Charles Chaplin"), None, None],
        coordinates: Some((37.758_895, -122.414_724_2)),
    },
    SeedLocation {
        title: "The Ten Commandments",
        release_year: 1923,
        location: "St. Peter & Paul's Church (666 Filbert Street, Washington Square)",
        fun_fact: Some("Exteriors of the church were used."),
        production_company: Some("Paramount Pictures"),
        distributor: Some("Paramount Pictures"),
        director: Some("Cecil B. DeMille"),
        writer: Some("Jesse L. Lasky, Jr."),
        actors: [Some("Charlton Heston"), Some("Yul Brynner"), None],
        coordinates: Some((37.800_781, -122.410_084)),
    },
    SeedLocation {
        title: "Greed",
        release_year: 1924,
        location: "Hayes Street at Laguna",
        fun_fact: None,
        production_company: MGM,
        distributor: MGM,
        director: Some("Eric von Stroheim"),
        writer: Some("Eric von Stroheim"),
        actors: [Some("Zasu Pitts"), None, Some("Cloris Leachman")],
        coordinates: Some((37.776_464_7, -122.426_298_5)),
    },
    SeedLocation {
        title: "Greed",
        release_year: 1924,
        location: "Cliff House (1090 Point Lobos Avenue)",
        fun_fact: Some(
            "In 1887, the Cliff House was severely damaged when the schooner Parallel, abandoned and loaded with dynamite, ran aground on the rocks below.",
        ),
        production_company: MGM,
        distributor: MGM,
        director: Some("Eric von Stroheim"),
        writer: Some("Eric von Stroheim "),
        actors: [Some("Zasu Pitts"), None, Some("Cloris Leachman")],
        coordinates: Some((37.774_929_5, -122.419_415_5)),
    },
    SeedLocation {
        title: "Greed",
        release_year: 1924,
        location: "Bush and Sutter Streets",
        fun_fact: None,
        production_company: MGM,
        distributor: MGM,
        director: Some("Eric von Stroheim"),
        writer: Some("Eric von Stroheim"),
        actors: [Some("Zasu Pitts"), None, Some("Cloris Leachman")],
        coordinates: Some((37.787_370_2, -122.423_423_9)),
    },
    SeedLocation {
        title: "The Jazz Singer",
        release_year: 1927,
        location: "Coffee Dan's (O'Farrell Street at Powell)",
        fun_fact: None,
        production_company: Some("Warner Bros. Pictures"),
        distributor: Some("Warner Bros. Pictures"),
        director: Some("Alan Crosland"),
        writer: Some("Alfred A. Cohn"),
        actors: [Some("Al Jolson"), None, Some("Amy Adams")],
        coordinates: Some((37.774_929_5, -122.419_415_5)),
    },
    // No recorded location or coordinates for this one.
    SeedLocation {
        title: "Barbary Coast",
        release_year: 1935,
        location: "",
        fun_fact: None,
        production_company: Some("The Samuel Goldwyn Company"),
        distributor: Some("United Artists"),
        director: Some("Howard Hawks"),
        writer: Some("Ben Hecht"),
        actors: [Some("Mariam Hopkins"), Some("Edward G. Robinson"), None],
        coordinates: None,
    },
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut insert = Query::insert();
        insert.into_table(MovieLocations).columns([
            Column::Title,
            Column::ReleaseYear,
            Column::Location,
            Column::FunFact,
            Column::ProductionCompany,
            Column::Distributor,
            Column::Director,
            Column::Writer,
            Column::Actor1,
            Column::Actor2,
            Column::Actor3,
            Column::Latitude,
            Column::Longitude,
        ]);

        for row in SEED {
            insert
                .values(row.values())
                .map_err(|e| DbErr::Migration(e.to_string()))?;
        }

        manager.exec_stmt(insert).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let delete = Query::delete().from_table(MovieLocations).to_owned();
        manager.exec_stmt(delete).await?;

        Ok(())
    }
}
