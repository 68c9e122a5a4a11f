//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions.

pub mod config;
pub mod favorites;
pub mod resolve;
pub mod search;
pub mod serve;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::format::url::UrlFormatter;
use crate::format::{available_formats, get_formatter, Listing, OutputFormatter};
use crate::notice::{NoticeLevel, NoticeReceiver};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Address search, favorites and location resolution for the weather app
#[derive(Parser)]
#[command(name = "weather-places")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search addresses
    Search(search::SearchArgs),

    /// List and edit favorite locations
    Favorites(favorites::FavoritesArgs),

    /// Show the location weather would be fetched for
    Resolve(resolve::ResolveArgs),

    /// Start the favorites server (foreground)
    Serve(serve::ServeArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

/// Run the CLI
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    let default_level = match cli.command {
        Commands::Serve(_) => "info",
        _ => "warn",
    };
    init_logging(default_level);

    match cli.command {
        Commands::Search(args) => search::run(args).await,
        Commands::Favorites(args) => favorites::run(args).await,
        Commands::Resolve(args) => resolve::run(args).await,
        Commands::Serve(args) => serve::run(args).await,
        Commands::Config(args) => config::run(args),
    }
}

/// Log to stderr, filtered by `RUST_LOG` when set
fn init_logging(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Load the config, generating and saving a device id on first use
pub(crate) fn load_config() -> Result<(Config, String)> {
    let mut config = Config::load()?;
    let (device_id, generated) = config.ensure_device_id();
    if generated {
        tracing::info!(device_id = %device_id, "Generated device id");
        config.save()?;
    }
    Ok((config, device_id))
}

/// Output options shared by the listing commands
#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Output format
    #[arg(long, short = 'f', default_value = "text")]
    pub format: String,

    /// Write output to file
    #[arg(long, short = 'o')]
    pub output: Option<String>,

    /// Map provider for the url format (see `config url.default`)
    #[arg(long)]
    pub provider: Option<String>,
}

impl Default for OutputArgs {
    fn default() -> Self {
        Self {
            format: "text".to_string(),
            output: None,
            provider: None,
        }
    }
}

/// Pick the formatter named by the output options
fn select_formatter(args: &OutputArgs) -> Result<Box<dyn OutputFormatter>> {
    if let Some(provider) = &args.provider {
        if !args.format.eq_ignore_ascii_case("url") {
            return Err(Error::Config(
                "--provider only applies to the url format".to_string(),
            ));
        }
        return Ok(Box::new(UrlFormatter::with_provider(provider.as_str())));
    }

    get_formatter(&args.format).ok_or_else(|| {
        let names: Vec<String> = available_formats().into_iter().map(|f| f.name).collect();
        Error::Config(format!(
            "Unknown format: {} (available: {})",
            args.format,
            names.join(", ")
        ))
    })
}

/// Render a listing and print it or write it to a file
pub(crate) fn emit(listing: &Listing, args: &OutputArgs, config: &Config) -> Result<()> {
    let rendered = select_formatter(args)?.format(listing, config)?;

    match args.output.as_deref() {
        Some(path) => {
            std::fs::write(path, &rendered)?;
            eprintln!("Output written to {}", path);
        }
        None => print!("{}", rendered),
    }
    Ok(())
}

/// Print every notice published so far; returns whether any was an error
pub(crate) fn drain_notices(rx: &mut NoticeReceiver) -> bool {
    let mut had_error = false;
    while let Ok(notice) = rx.try_recv() {
        match notice.level {
            NoticeLevel::Info => eprintln!("{}", notice.message),
            NoticeLevel::Error => {
                had_error = true;
                eprintln!("Error: {}", notice.message);
            }
        }
    }
    had_error
}
