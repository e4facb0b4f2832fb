//! route-hook: keep Caddy routes in sync with containers.
//!
//! ```text
//!   container runtime ──stdin JSON──┐
//!                                   ▼
//!   operator ──--route──▶ route::RouteBuilder ──▶ reconcile::Reconciler ──HTTP──▶ Caddy admin API
//!                                                        │
//!                                   --retry ─▶ reconcile::run_with_retry (until Ctrl-C)
//! ```

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use thiserror::Error;

use route_hook::config::{load_with_overrides, ConfigError, ConfigOverrides, HookConfig};
use route_hook::control_plane::{AdminClient, ClientError};
use route_hook::hook::{HookError, HookState, RouteInput};
use route_hook::lifecycle::{signals, Shutdown};
use route_hook::observability::logging;
use route_hook::reconcile::{run_with_retry, ReconcileError, Reconciler};
use route_hook::route::{identity_of, RouteBuilder, ValidationError};

#[derive(Parser)]
#[command(name = "route-hook")]
#[command(about = "Create and delete Caddy routes for containers", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Proxy admin API host [default: caddy]
    #[arg(long)]
    admin_host: Option<String>,

    /// Proxy admin API port [default: 2019]
    #[arg(long)]
    admin_port: Option<u16>,

    /// Caddy HTTP server whose routes are managed [default: srv0]
    #[arg(short, long)]
    server: Option<String>,

    /// Retry creating the route every MINUTES until interrupted
    #[arg(short, long, value_name = "MINUTES")]
    retry: Option<u64>,

    /// Only allow clients from private networks
    #[arg(short, long)]
    private: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Emit JSON log lines
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the route unless it already exists
    Add {
        /// PUBLIC_NAME:INTERN_NAME:INTERN_PORT (read from the hook state on stdin if absent)
        #[arg(long)]
        route: Option<String>,

        /// Redirect PUBLIC_NAME to this URL prefix instead of proxying
        /// (the route may be a bare PUBLIC_NAME; INTERN_NAME and INTERN_PORT are ignored)
        #[arg(long)]
        redirect: Option<String>,
    },
    /// Delete the route for a public name
    Delete {
        /// PUBLIC_NAME or a full route (read from the hook state on stdin if absent)
        #[arg(long)]
        route: Option<String>,
    },
}

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Hook(#[from] HookError),

    #[error("invalid route: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Reconcile(#[from] ReconcileError),
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            admin_host: self.admin_host.clone(),
            admin_port: self.admin_port,
            server: self.server.clone(),
            retry_minutes: self.retry,
            private: self.private,
            log_level: self.log_level.clone(),
            log_json: self.log_json,
        }
    }
}

/// Take the route from the flag, or from the hook state on stdin.
fn route_input(flag: Option<String>, resolve_hostname: bool) -> Result<Option<RouteInput>, AppError> {
    if let Some(text) = flag {
        return Ok(Some(RouteInput { text, hostname: None }));
    }

    let state = HookState::from_reader(io::stdin().lock())?;
    Ok(state.route_input(resolve_hostname)?)
}

async fn add(
    config: &HookConfig,
    route: Option<String>,
    redirect: Option<String>,
) -> Result<(), AppError> {
    let Some(input) = route_input(route, redirect.is_none())? else {
        tracing::info!("No route annotation, nothing to do");
        return Ok(());
    };

    let Some(request) = RouteBuilder::new(input.text)
        .private(config.private)
        .redirect(redirect)
        .internal_host_fallback(input.hostname)
        .build()?
    else {
        tracing::info!("Empty route annotation, nothing to do");
        return Ok(());
    };

    let reconciler = Reconciler::new(AdminClient::new(&config.admin)?, config.server.clone());

    match config.retry_interval() {
        Some(interval) => {
            let shutdown = Shutdown::new();
            let rx = shutdown.subscribe();
            let _ctrl_c = signals::spawn_ctrl_c_handler(shutdown);
            run_with_retry(&reconciler, &request, interval, rx).await?;
        }
        None => {
            let outcome = reconciler.create(&request).await?;
            tracing::debug!(?outcome, "Create finished");
        }
    }

    Ok(())
}

async fn delete(config: &HookConfig, route: Option<String>) -> Result<(), AppError> {
    let Some(input) = route_input(route, false)? else {
        tracing::info!("No route annotation, nothing to do");
        return Ok(());
    };
    let Some(identity) = identity_of(&input.text)? else {
        tracing::info!("Empty route annotation, nothing to do");
        return Ok(());
    };

    let reconciler = Reconciler::new(AdminClient::new(&config.admin)?, config.server.clone());
    let outcome = reconciler.delete(&identity).await?;
    tracing::debug!(?outcome, "Delete finished");

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_with_overrides(cli.config.as_deref(), &cli.overrides()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("route-hook: {}", e);
            return ExitCode::FAILURE;
        }
    };

    logging::init(&config.observability);

    tracing::debug!(
        admin_host = %config.admin.host,
        admin_port = config.admin.port,
        server = %config.server,
        retry_minutes = ?config.retry_minutes,
        private = config.private,
        "Configuration loaded"
    );

    let result = match cli.command {
        Commands::Add { route, redirect } => add(&config, route, redirect).await,
        Commands::Delete { route } => delete(&config, route).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "route-hook failed");
            ExitCode::FAILURE
        }
    }
}
