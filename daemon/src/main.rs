//! cashscope: inspect CashTokens categories from the command line, or serve
//! token reports over HTTP.

mod render;

use cashscope_explorer::{init_logging, Explorer, ExplorerConfig, ExplorerMetrics, LogFormat};
use cashscope_rpc::{RpcServer, RpcState};
use cashscope_types::{Network, Timestamp};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Parser)]
#[command(name = "cashscope", about = "CashTokens explorer")]
struct Cli {
    /// Network the token ids refer to: "mainnet" or "chipnet".
    /// When a config file is provided, defaults to the file's network value.
    #[arg(long, global = true, env = "CASHSCOPE_NETWORK")]
    network: Option<String>,

    /// Chaingraph GraphQL endpoint.
    #[arg(long, global = true, env = "CASHSCOPE_CHAINGRAPH_URL")]
    chaingraph_url: Option<String>,

    /// Gateway used for `ipfs://` registry locations.
    #[arg(long, global = true, env = "CASHSCOPE_IPFS_GATEWAY")]
    ipfs_gateway: Option<String>,

    /// Trust registry consulted for the verified flag.
    #[arg(long, global = true, env = "CASHSCOPE_OTR_REGISTRY_URL")]
    otr_registry_url: Option<String>,

    /// Per-request timeout in seconds.
    #[arg(long, global = true, env = "CASHSCOPE_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    /// Log format: "human" or "json".
    #[arg(long, global = true, env = "CASHSCOPE_LOG_FORMAT")]
    log_format: Option<String>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, global = true, env = "CASHSCOPE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, global = true, env = "CASHSCOPE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Look up one token category and print its report.
    Lookup {
        /// Token id: the genesis transaction hash, 64 hex characters.
        token_id: String,

        /// Print the report as JSON instead of a text summary.
        #[arg(long)]
        json: bool,
    },

    /// Serve token reports over HTTP.
    Serve {
        /// Address to bind the HTTP API to.
        #[arg(long, env = "CASHSCOPE_RPC_BIND")]
        bind: Option<String>,

        /// HTTP API port.
        #[arg(long, env = "CASHSCOPE_RPC_PORT")]
        port: Option<u16>,

        /// Expose Prometheus metrics on `/metrics`.
        #[arg(long, env = "CASHSCOPE_ENABLE_METRICS")]
        metrics: bool,
    },

    /// Print the effective configuration as TOML.
    Config,
}

/// File settings first, then CLI flags and env vars on top.
fn effective_config(cli: &Cli, file_cfg: ExplorerConfig) -> anyhow::Result<ExplorerConfig> {
    let network = match cli.network.as_deref() {
        Some(name) => name.parse::<Network>()?,
        None => file_cfg.network,
    };

    let mut config = ExplorerConfig {
        network,
        chaingraph_url: cli
            .chaingraph_url
            .clone()
            .unwrap_or(file_cfg.chaingraph_url),
        ipfs_gateway: cli.ipfs_gateway.clone().unwrap_or(file_cfg.ipfs_gateway),
        otr_registry_url: cli
            .otr_registry_url
            .clone()
            .unwrap_or(file_cfg.otr_registry_url),
        request_timeout_secs: cli.timeout_secs.or(file_cfg.request_timeout_secs),
        log_format: cli.log_format.clone().unwrap_or(file_cfg.log_format),
        log_level: cli.log_level.clone().unwrap_or(file_cfg.log_level),
        ..file_cfg
    };

    if let Command::Serve {
        bind,
        port,
        metrics,
    } = &cli.command
    {
        if let Some(bind) = bind {
            config.rpc_bind = bind.clone();
        }
        if let Some(port) = port {
            config.rpc_port = *port;
        }
        config.enable_metrics |= *metrics;
    }
    Ok(config)
}

fn now() -> Option<Timestamp> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .ok()
        .map(|d| Timestamp::new(d.as_secs()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (file_cfg, load_error) = match &cli.config {
        Some(path) => match ExplorerConfig::from_toml_file(&path.to_string_lossy()) {
            Ok(cfg) => (cfg, None),
            Err(e) => (ExplorerConfig::default(), Some(e)),
        },
        None => (ExplorerConfig::default(), None),
    };
    let config = effective_config(&cli, file_cfg)?;

    let format = config.log_format().unwrap_or(LogFormat::Human);
    init_logging(format, &config.log_level);
    if let Some(e) = load_error {
        tracing::warn!(error = %e, "failed to load config file, using defaults");
    } else if let Some(path) = &cli.config {
        tracing::info!(path = %path.display(), "loaded config");
    }

    match cli.command {
        Command::Lookup { token_id, json } => {
            let explorer = Explorer::from_config(&config);
            let report = explorer.lookup_input(&token_id).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", render::render_report(&report, now()));
            }
        }
        Command::Serve { .. } => {
            if !config.enable_rpc {
                anyhow::bail!("the HTTP API is disabled by configuration (enable_rpc = false)");
            }

            let mut explorer = Explorer::from_config(&config);
            let metrics = if config.enable_metrics {
                let metrics = Arc::new(ExplorerMetrics::new());
                explorer = explorer.with_metrics(metrics.clone());
                Some(metrics)
            } else {
                None
            };

            tracing::info!(
                network = %config.network,
                chaingraph = %config.chaingraph_url,
                metrics = config.enable_metrics,
                "starting cashscope API on {}:{}",
                config.rpc_bind,
                config.rpc_port
            );

            let server = RpcServer::new(
                config.rpc_bind.clone(),
                config.rpc_port,
                RpcState {
                    explorer: Arc::new(explorer),
                    metrics,
                },
            );
            server
                .start(async {
                    if let Err(e) = tokio::signal::ctrl_c().await {
                        tracing::error!(error = %e, "failed to listen for shutdown signal");
                    }
                })
                .await?;

            tracing::info!("cashscope exited cleanly");
        }
        Command::Config => {
            print!("{}", config.to_toml_string()?);
        }
    }

    Ok(())
}
