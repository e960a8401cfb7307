//! List titles command handler

use crate::config::Config;
use crate::db::Store;

pub async fn cmd_list_titles(config: &Config) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let titles = store.list_distinct_titles().await?;

    if titles.is_empty() {
        println!("No movies in the database.");
        return Ok(());
    }

    println!("Titles ({} total)", titles.len());
    println!("{:-<70}", "");
    for title in titles {
        println!("  {}", title);
    }

    Ok(())
}
