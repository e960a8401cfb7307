//! List filming locations command handler

use crate::cli::ListArgs;
use crate::config::Config;
use crate::db::Store;
use crate::models::movie::MovieFilter;

pub async fn cmd_list_movies(config: &Config, args: ListArgs) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;

    let filter = MovieFilter {
        title: args.title,
        year: args.year,
        director: args.director,
        actor_1: args.actor,
        ..MovieFilter::default()
    };
    let movies = store.list_movies(&filter).await?;

    if movies.is_empty() {
        println!("No filming locations found.");
        if !filter.is_empty() {
            println!();
            println!("Try again without filters: sfmovies list");
        }
        return Ok(());
    }

    println!("Filming Locations ({} total)", movies.len());
    println!("{:-<70}", "");

    for movie in movies {
        let location = if movie.location.is_empty() {
            "unknown location"
        } else {
            movie.location.as_str()
        };

        println!("• {} ({}) @ {}", movie.title, movie.year, location);
        println!(
            "  ID: {} | Director: {}",
            movie.id,
            movie.director.as_deref().unwrap_or("?")
        );
    }

    Ok(())
}
