//! md2web CLI: turn a markdown tree into page components and a route table.
//!
//! Runs the content pipeline once (`build`) or keeps it in sync with the
//! sources (`watch`).

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
