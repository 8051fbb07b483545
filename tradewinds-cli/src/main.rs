//! Tradewinds CLI - run a trading voyage from the console.

mod logger;
mod output;

use std::error::Error;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use example_captain::ExampleCaptain;
use merchant_captain::MerchantCaptain;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tradewinds_core::{run_voyage, Captain, Catalog, GameConfig, GameSetup};

/// Tradewinds - buy low, sell high, and mind the pirates
#[derive(Parser, Debug)]
#[command(name = "tradewinds")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Play one game with a scripted captain at the helm
    Play {
        /// Captain's name (3-15 letters)
        #[arg(short, long, default_value = "Drake")]
        name: String,

        /// Days to play for
        #[arg(short, long, default_value = "30")]
        days: u32,

        /// Index of the ship to captain (see `ships`)
        #[arg(long, default_value = "0")]
        ship: usize,

        /// Who gives the orders
        #[arg(short, long, default_value = "merchant")]
        captain: CaptainChoice,

        /// Random seed (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Catalog JSON file (default: the bundled catalog)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Game config JSON file (default: house rules)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Stop after this many orders
        #[arg(short = 't', long, default_value = "1000")]
        max_turns: u32,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// List the ships, islands and routes of a catalog
    Ships {
        /// Catalog JSON file (default: the bundled catalog)
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
}

/// Scripted captains shipped with the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CaptainChoice {
    /// Sails wherever it can and never trades.
    Example,
    /// Trades on the margin between neighbouring islands.
    Merchant,
}

/// Output format for the `play` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// CLI error type.
#[derive(Debug)]
struct CliError {
    message: String,
}

impl CliError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<tradewinds_core::CatalogError> for CliError {
    fn from(e: tradewinds_core::CatalogError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<tradewinds_core::ConfigError> for CliError {
    fn from(e: tradewinds_core::ConfigError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<tradewinds_core::SetupError> for CliError {
    fn from(e: tradewinds_core::SetupError) -> Self {
        Self::new(e.to_string())
    }
}

fn load_catalog(path: Option<&Path>) -> Result<Catalog, CliError> {
    match path {
        Some(path) => Ok(Catalog::from_json(&std::fs::read_to_string(path)?)?),
        None => Ok(Catalog::standard()?),
    }
}

fn load_config(path: Option<&Path>) -> Result<GameConfig, CliError> {
    match path {
        Some(path) => Ok(GameConfig::from_json(&std::fs::read_to_string(path)?)?),
        None => Ok(GameConfig::default()),
    }
}

#[allow(clippy::too_many_arguments)]
fn play(
    name: &str,
    days: u32,
    ship: usize,
    captain: CaptainChoice,
    seed: Option<u64>,
    catalog: Option<&Path>,
    config: Option<&Path>,
    max_turns: u32,
    format: OutputFormat,
) -> Result<(), CliError> {
    let catalog = load_catalog(catalog)?;
    let config = load_config(config)?;
    let mut game = GameSetup::new(catalog, config)?.finish(name, days, ship)?;

    let seed = seed.unwrap_or_else(rand::random);
    log::info!("seed {}", seed);
    let mut rng = StdRng::seed_from_u64(seed);

    let captain: &dyn Captain = match captain {
        CaptainChoice::Example => &ExampleCaptain,
        CaptainChoice::Merchant => &MerchantCaptain,
    };
    let report = run_voyage(&mut game, captain, &mut rng, max_turns);

    match format {
        OutputFormat::Text => print!("{}", output::format_text(&report, &game, seed)),
        OutputFormat::Json => println!("{}", output::format_json(&report, seed)?),
    }
    Ok(())
}

fn ships(catalog: Option<&Path>) -> Result<(), CliError> {
    let catalog = load_catalog(catalog)?;
    print!("{}", output::format_catalog(&catalog));
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    logger::init(args.verbose);

    let result = match args.command {
        Commands::Play {
            name,
            days,
            ship,
            captain,
            seed,
            catalog,
            config,
            max_turns,
            format,
        } => play(
            &name,
            days,
            ship,
            captain,
            seed,
            catalog.as_deref(),
            config.as_deref(),
            max_turns,
            format,
        ),
        Commands::Ships { catalog } => ships(catalog.as_deref()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
