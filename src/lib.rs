pub mod api;
pub mod cli;
pub mod config;
pub mod database;
pub mod domain;
pub mod rating;
pub mod services;

use std::path::Path;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Command};
use crate::config::settings::AppConfig;
use crate::services::ingestion::IngestionService;
use crate::services::processing::RecomputeService;
use crate::services::server::ServerService;

pub fn interpret() -> Command {
    Cli::parse().command
}

pub fn handle_serve(port: u16) -> Result<()> {
    let service = ServerService::new(port, AppConfig::new());

    tokio::runtime::Runtime::new()?.block_on(service.run())
}

pub fn handle_ingest(source: &Path) -> Result<()> {
    let pool = database::create_pool(&database::default_path())?;
    let mut service = IngestionService::new(pool);
    service.run(source)
}

pub fn handle_process() -> Result<()> {
    let pool = database::create_pool(&database::default_path())?;
    let service = RecomputeService::new(AppConfig::new(), pool);
    service.run()
}
