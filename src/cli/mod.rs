//! CLI module - Command-line interface for `sfmovies`
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Args, Parser, Subcommand};

/// SF Movies - San Francisco filming locations as a read-only JSON API
#[derive(Parser)]
#[command(name = "sfmovies")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the HTTP API (default when no command is given)
    #[command(alias = "daemon", alias = "-d")]
    Serve,

    /// List filming locations
    #[command(alias = "ls", alias = "l")]
    List(ListArgs),

    /// List distinct movie titles
    #[command(alias = "t")]
    Titles,

    /// Create default config file
    #[command(alias = "--init")]
    Init,
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Title to match, ignoring case
    #[arg(long)]
    pub title: Option<String>,

    /// Release year
    #[arg(long)]
    pub year: Option<i32>,

    /// Director, exact match
    #[arg(long)]
    pub director: Option<String>,

    /// Lead actor, exact match
    #[arg(long)]
    pub actor: Option<String>,
}

pub use commands::*;
