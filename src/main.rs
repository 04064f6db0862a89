//! Environment Gate CLI
//!
//! Validates the environment variables of a web application before it is
//! built or started, and serves the application with the request hook
//! installed.

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use env_gate::config::{CONFIG_FILE, SAMPLE_CONFIG};
use env_gate::{Config, EnvError, EnvHandle, ExecutionContext, Schema, app, global, load_env};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "envgate")]
#[command(about = "Validate and gate web application environment variables")]
#[command(version = "0.1.0")]
#[command(long_about = "
envgate checks the server and client environment variables of a web application
against their schemas and refuses to start the application when any of them is
invalid. Server-only variables are never readable from the client context.

Examples:
  envgate check                          # Validate the process environment
  envgate check --env-file .env          # Validate a dotenv file
  envgate check --context client         # Validate only client variables
  envgate show                           # Read every variable through the gate
  envgate serve --addr 127.0.0.1:3000    # Serve the app with the request hook
")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Default)]
struct EnvArgs {
    /// Configuration file path (default: ./envgate.toml when present)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Read variables from a dotenv file instead of the process environment
    #[arg(short, long, value_name = "FILE")]
    env_file: Option<PathBuf>,

    /// Execution context to validate for
    #[arg(long, value_enum)]
    context: Option<ExecutionContext>,

    /// Do not log parsed values after validation
    #[arg(long)]
    quiet_snapshot: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the environment and report every invalid variable
    Check {
        #[command(flatten)]
        env: EnvArgs,
    },

    /// Validate, then read every declared variable through the access gate
    Show {
        #[command(flatten)]
        env: EnvArgs,
    },

    /// Validate, then serve the application
    Serve {
        #[command(flatten)]
        env: EnvArgs,

        /// Address to listen on
        #[arg(long, value_name = "ADDR", default_value = "127.0.0.1:3000")]
        addr: SocketAddr,
    },

    /// Show the effective configuration and what it validates
    Config {
        #[command(flatten)]
        env: EnvArgs,
    },

    /// Create a sample configuration file
    InitConfig {
        /// Output path for config file (default: envgate.toml)
        #[arg(value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

impl EnvArgs {
    /// Config file values with command line overrides applied
    fn resolve(self) -> Result<Config> {
        let mut config =
            Config::resolve(self.config, ".").context("Failed to load configuration file")?;

        if let Some(env_file) = self.env_file {
            config.env_file = Some(env_file);
        }
        if let Some(context) = self.context {
            config.context = Some(context);
        }
        if self.quiet_snapshot {
            config.log_snapshot = Some(false);
        }

        Ok(config)
    }
}

fn init_tracing(verbose: u8, default_level: &str) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Gated value for `show`: `<denied>` when the access policy refuses the
/// name, `<none>` when the read passes but nothing is stored.
fn shown_value(handle: &EnvHandle, name: &str) -> String {
    match handle.get(name) {
        Some(value) => value.to_string(),
        None if handle.is_server_accessible(name) => "<none>".to_string(),
        None => "<denied>".to_string(),
    }
}

/// Validation failures are already logged field by field
fn startup_error(err: EnvError) -> anyhow::Error {
    match err {
        EnvError::Invalid(_) => anyhow::anyhow!("Invalid environment variables"),
        other => other.into(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check { env } => {
            let config = env.resolve()?;
            init_tracing(cli.verbose, config.log_level());

            let handle = load_env(&config).map_err(startup_error)?;
            println!(
                "✓ Environment valid ({} context, {} variables)",
                handle.context(),
                handle.parsed().len()
            );

            Ok(())
        }

        Commands::Show { env } => {
            let config = env.resolve()?;
            init_tracing(cli.verbose, config.log_level());

            let handle = load_env(&config).map_err(startup_error)?;
            for name in Schema::declared_names() {
                println!("{}={}", name, shown_value(&handle, name));
            }

            Ok(())
        }

        Commands::Serve { env, addr } => {
            let config = env.resolve()?;
            init_tracing(cli.verbose, config.log_level());

            if config.context() == ExecutionContext::Restricted {
                bail!("Refusing to serve from the client context");
            }

            let handle = load_env(&config).map_err(startup_error)?;
            let handle = global::install(handle)?;
            let router = app::router(handle.clone());

            let listener = tokio::net::TcpListener::bind(addr)
                .await
                .with_context(|| format!("Failed to bind {}", addr))?;
            tracing::info!("envgate listening on {addr}");
            axum::serve(listener, router.into_make_service())
                .await
                .context("Server error")?;

            Ok(())
        }

        Commands::Config { env } => {
            let config = env.resolve()?;

            for line in config.summary() {
                println!("{}", line);
            }

            Ok(())
        }

        Commands::InitConfig { output } => {
            let config_path = output.unwrap_or_else(|| PathBuf::from(CONFIG_FILE));

            if config_path.exists() {
                bail!(
                    "Configuration file already exists: {}",
                    config_path.display()
                );
            }

            std::fs::write(&config_path, SAMPLE_CONFIG)
                .context("Failed to write configuration file")?;
            println!("Created configuration file: {}", config_path.display());

            Ok(())
        }
    }
}
