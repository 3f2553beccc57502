// src/main.rs
use anyhow::Result;
use clap::Parser;
use mood_index_study::cli::{self, Cli};

fn main() -> Result<()> {
    // Initialize environment
    dotenv::dotenv().ok();

    // Logs go to stderr so the report on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    cli::run(cli)
}
