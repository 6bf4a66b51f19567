use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::{ConfigCommand, FoodCommand};
use nutridb::config::Config;
use nutridb::store::FoodStore;

#[derive(Parser)]
#[command(name = "nutridb")]
#[command(version)]
#[command(about = "Look up and record nutrition facts for foods", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Override the data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an empty food database in the data directory
    Init,

    /// Query and add foods
    Food(FoodCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nutridb=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = Config::load(cli.config)?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }

    match cli.command {
        Some(Commands::Init) => {
            let store = FoodStore::initialize(config.storage())?;
            println!(
                "Created empty food database at {}",
                store.storage().database_path().display()
            );
        }
        Some(Commands::Food(cmd)) => {
            let store = FoodStore::load(config.storage())?;
            cmd.run(&store)?;
        }
        Some(Commands::Config(cmd)) => {
            cmd.run(&config)?;
        }
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}
