//! service-map - point-in-time topology of a Kubernetes cluster
//!
//! Serves `GET /api/service-map`, a node/edge graph of services, pods,
//! deployments, ingresses, config maps and secrets, rebuilt on every request.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use kube_service_map::cli::{self, ConfigSubcommand};
use kube_service_map::config::{Config, ConfigLoader};
use kube_service_map::server::{self, AppState};
use kube_service_map::{FetchMode, KubeResourceFetcher, build_service_map, kube};

/// Point-in-time service map of a Kubernetes cluster
#[derive(Parser, Debug)]
#[command(name = "service-map")]
#[command(about = "Serve a point-in-time service map of a Kubernetes cluster", long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(long, short = 'd', global = true)]
    debug: bool,

    /// Configuration file (defaults to the per-user config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

/// Main commands
#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default)
    Serve {
        /// Address to bind
        #[arg(long)]
        bind: Option<String>,
        /// Port to listen on
        #[arg(long, short = 'p')]
        port: Option<u16>,
        /// Kubeconfig context to use
        #[arg(long)]
        context: Option<String>,
        /// List the resource kinds concurrently
        #[arg(long)]
        concurrent: bool,
    },
    /// Build the service map once and print it as JSON
    Snapshot {
        /// Kubeconfig context to use
        #[arg(long)]
        context: Option<String>,
        /// List the resource kinds concurrently
        #[arg(long)]
        concurrent: bool,
        /// Pretty-print the JSON document
        #[arg(long)]
        pretty: bool,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let command = args.command.unwrap_or(Command::Serve {
        bind: None,
        port: None,
        context: None,
        concurrent: false,
    });

    match command {
        Command::Config { subcommand } => {
            cli::handle_config_command(subcommand, args.config.as_deref())
        }
        Command::Version => {
            cli::display_version();
            Ok(())
        }
        Command::Serve {
            bind,
            port,
            context,
            concurrent,
        } => {
            let mut config = load_config(args.config.as_deref(), context, concurrent)?;
            if let Some(bind) = bind {
                config.server.bind_address = bind;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            ConfigLoader::validate(&config)?;
            cli::init_logging(&config.logger, args.debug)?;

            let addr = ConfigLoader::socket_addr(&config)?;
            let fetcher = connect(&config).await?;
            let state = AppState::new(Arc::new(fetcher), fetch_mode(&config));
            server::serve(addr, state).await
        }
        Command::Snapshot {
            context,
            concurrent,
            pretty,
        } => {
            let config = load_config(args.config.as_deref(), context, concurrent)?;
            cli::init_logging(&config.logger, args.debug)?;

            let fetcher = connect(&config).await?;
            let map = build_service_map(&fetcher, fetch_mode(&config)).await?;
            let json = if pretty {
                serde_json::to_string_pretty(&map)
            } else {
                serde_json::to_string(&map)
            }
            .context("Failed to serialize service map")?;
            println!("{}", json);
            Ok(())
        }
    }
}

/// Load configuration and apply the flags shared by `serve` and `snapshot`
fn load_config(
    path: Option<&std::path::Path>,
    context: Option<String>,
    concurrent: bool,
) -> Result<Config> {
    let mut config = ConfigLoader::load(path).context("Failed to load configuration")?;
    if context.is_some() {
        config.kube.context = context;
    }
    if concurrent {
        config.fetch.concurrent = true;
    }
    Ok(config)
}

async fn connect(config: &Config) -> Result<KubeResourceFetcher> {
    tracing::debug!("Initializing Kubernetes client");
    let client = kube::create_client(config.kube.context.as_deref()).await?;
    Ok(KubeResourceFetcher::new(client))
}

fn fetch_mode(config: &Config) -> FetchMode {
    let mode = FetchMode::from_concurrent(config.fetch.concurrent);
    tracing::info!("Fetching resource collections in {:?} mode", mode);
    mode
}
