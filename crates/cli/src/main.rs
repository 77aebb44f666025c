mod cmd;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cmd::{cmd_build, cmd_manifest, cmd_serve};
use output::{OutputFormat, print_error};

/// swcache - offline caching for single-page app builds
#[derive(Parser)]
#[command(name = "swcache")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Path to the configuration file (default: $SWCACHE_CONFIG, then ./swcache.json)
  #[arg(short, long, global = true)]
  config: Option<PathBuf>,

  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Build the frontend, then generate the service worker and instrument index.html
  Build {
    /// Skip the frontend build command and only run generation
    #[arg(long)]
    skip_build: bool,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "text")]
    output: OutputFormat,
  },

  /// Serve the asset root with ETag validation and SPA fallback
  Serve {
    /// Address to bind (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// Port to bind (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Stop after this duration (e.g., "30s", "5m")
    #[arg(long, value_parser = humantime::parse_duration)]
    shutdown_after: Option<Duration>,
  },

  /// Print the asset manifest of the current asset root
  Manifest {
    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "text")]
    output: OutputFormat,
  },
}

fn main() -> ExitCode {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "info" };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let config = cli.config.as_deref();
  let result = match cli.command {
    Commands::Build { skip_build, output } => cmd_build(config, skip_build, output),
    Commands::Serve {
      host,
      port,
      shutdown_after,
    } => cmd_serve(config, host, port, shutdown_after),
    Commands::Manifest { output } => cmd_manifest(config, output),
  };

  match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      print_error(&format!("{:#}", e));
      ExitCode::FAILURE
    }
  }
}
