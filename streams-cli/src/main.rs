use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod config;

use config::ConfigLoader;

#[derive(Parser)]
#[command(name = "streams", about = "Evaluate streaming novelty-detection classifiers")]
#[command(version, propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage configuration
    Config(commands::config::ConfigArgs),
    /// Replay a prediction log and report CER and UnkR
    Eval(commands::eval::EvalArgs),
    /// Summarize a sample file
    Samples(commands::samples::SamplesArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = ConfigLoader::load()?;

    match cli.command {
        Commands::Config(args) => commands::config::run(args, &config),
        Commands::Eval(args) => commands::eval::run(args, &config),
        Commands::Samples(args) => commands::samples::run(args, &config),
    }
}
