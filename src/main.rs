pub mod data;
pub mod db;
pub mod error;
pub mod server;
pub mod settings;
pub mod utils;

use clap::{Parser, Subcommand};

/// The Mentorlink server
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Serve(server::ServerArgs),
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    match args.command {
        Commands::Serve(server) => server::init_server(server).await?,
    }
    Ok(())
}
