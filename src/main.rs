mod cli;
mod config;
mod db;
mod models;
mod tracker;
mod utils;

use anyhow::{Context, Result};
use clap::Parser;
use rusqlite::Connection;

use cli::args::{Cli, Commands};
use cli::handlers;
use config::AppConfig;
use db::migrations::run_migrations;

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = AppConfig::load().context("Loading config")?;

    // Ensure data directory exists and open DB
    let db_path = config.ensure_db_dir()?;
    let conn = Connection::open(&db_path)
        .with_context(|| format!("Opening database at {:?}", db_path))?;
    log::debug!("Using database {:?}", db_path);

    run_migrations(&conn)?;

    match cli.command {
        Some(Commands::Add { name, fields }) => {
            handlers::handle_add(&conn, &config, &name, &fields)?;
        }
        Some(Commands::Edit { id, name, fields }) => {
            handlers::handle_edit(&conn, &id, name.as_deref(), &fields)?;
        }
        Some(Commands::Delete { id }) => {
            handlers::handle_delete(&conn, &id)?;
        }
        Some(Commands::Done { id, date, undo }) => {
            handlers::handle_done(&conn, &id, &date, undo)?;
        }
        Some(Commands::Toggle { id, date }) => {
            handlers::handle_toggle(&conn, &id, &date)?;
        }
        Some(Commands::List { date }) => {
            handlers::handle_list(&conn, &date)?;
        }
        Some(Commands::Stats) => {
            handlers::handle_stats(&conn)?;
        }
        Some(Commands::Calendar { month }) => {
            handlers::handle_calendar(&conn, month.as_deref())?;
        }
        Some(Commands::Theme { dark, light }) => {
            handlers::handle_theme(&conn, dark, light)?;
        }
        Some(Commands::Config { init }) => {
            handlers::handle_config(&config, init)?;
        }

        // No subcommand → today's list
        None => {
            handlers::handle_list(&conn, "today")?;
        }
    }

    Ok(())
}
