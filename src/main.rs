use std::{fs, path::PathBuf};

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use db::open;
use types::{Config, OutputFmt, config_path, default_db_path};

mod cli;
mod commands;
mod db;
mod metrics;
mod models;
mod storage;
mod types;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let fmt = if cli.json {
        OutputFmt::Json
    } else {
        OutputFmt::Text
    };

    let cfg = Config::load(&config_path()?)?;
    let db_path = match cfg.db_path() {
        Some(p) => PathBuf::from(p),
        None => default_db_path()?,
    };
    if let Some(dir) = db_path.parent() {
        fs::create_dir_all(dir)?;
    }

    let pool = open(&db_path.to_string_lossy()).await?;

    match cli.cmd {
        Commands::Session(cmd) => commands::session::handle(cmd, &pool, fmt).await?,
        Commands::Template(cmd) => commands::template::handle(cmd, &pool, fmt).await?,
        Commands::Records => commands::records::handle(&pool, fmt).await?,
        Commands::Progress(args) => commands::progress::handle(args, &pool, fmt).await?,
        Commands::History(cmd) => commands::history::handle(cmd, &pool, fmt).await?,
        Commands::Dashboard => commands::dashboard::handle(&pool, fmt).await?,
        Commands::Config(cmd) => commands::config::handle(cmd, fmt).await?,
    }

    Ok(())
}
