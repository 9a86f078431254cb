use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use trivia_api::configuration::get_configuration;
use trivia_api::db::establish_connection;
use trivia_api::server::app::run_server;
use trivia_api::telemetry::init_tracing;
use trivia_api::transfer::{export_data, import_data};

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[clap(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run migrations and serve the HTTP API
    Serve,
    /// Run migrations and exit
    Migrate,
    /// Import categories.csv and questions.csv from a directory
    Import { path: PathBuf },
    /// Export categories.csv and questions.csv to a directory
    Export { path: PathBuf },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing();
    let cli = Cli::parse();

    let settings = get_configuration().context("Failed to read configuration")?;
    let store = establish_connection(&settings.database).await?;

    tracing::info!("Running db migrations...");
    store.migrate().await?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_server(store, &settings.application).await?,
        Commands::Migrate => tracing::info!("Migrations applied"),
        Commands::Import { path } => {
            import_data(store.as_ref(), &path).await?;
        }
        Commands::Export { path } => export_data(store.as_ref(), &path).await?,
    };
    Ok(())
}
