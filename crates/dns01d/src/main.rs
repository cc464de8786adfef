// # dns01d - DNS-01 Solver Daemon
//
// This is a THIN integration layer. All challenge logic lives in
// dns01-core; the bunny.net API client lives in dns01-provider-bunny.
//
// The daemon is responsible for:
// 1. Reading configuration from environment variables
// 2. Initializing logging and the runtime
// 3. Building and initializing the solver
// 4. Serving until SIGTERM/SIGINT, or running a single present/cleanup
//
// ## Configuration
//
// - `GROUP_NAME`: API group the webhook is served under (required)
// - `API_KEY`: bunny.net API key (required)
// - `BUNNY_API_BASE_URL`: API base URL (default https://api.bunny.net)
// - `DNS01_HTTP_TIMEOUT_SECS`: Timeout per HTTP call (default 30)
// - `DNS01_MODE`: `live` or `dry-run` (default live)
// - `DNS01_LOG_LEVEL`: trace, debug, info, warn, error (default info)
//
// ## Example
//
// ```bash
// export GROUP_NAME=acme.example.com
// export API_KEY=your_key
//
// # Serve until shutdown
// dns01d
//
// # Validate against a real account
// DNS01_MODE=dry-run dns01d present \
//     --fqdn _acme-challenge.example.com. --zone example.com. --key test-token
// ```

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use dns01_core::{
    ChallengeRequest, HostConfig, ShutdownSignal, ShutdownTrigger, Solver, SolverConfig,
};
use std::env;
use std::process::ExitCode;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error
#[derive(Debug, Clone, Copy)]
enum Dns01ExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (failed challenge operation, unexpected failure)
    RuntimeError = 2,
}

impl From<Dns01ExitCode> for ExitCode {
    fn from(code: Dns01ExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

#[derive(Parser, Debug)]
#[command(name = "dns01d", version, about = "bunny.net DNS-01 challenge solver")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Initialize the solver and wait for a shutdown signal (default)
    Serve,
    /// Create the challenge TXT record once
    Present(ChallengeArgs),
    /// Delete the challenge TXT record once
    Cleanup(ChallengeArgs),
}

#[derive(Debug, Args)]
struct ChallengeArgs {
    /// Fully-qualified challenge name, e.g. _acme-challenge.example.com.
    #[arg(long)]
    fqdn: String,
    /// Zone owning the name, e.g. example.com.
    #[arg(long)]
    zone: String,
    /// Token the TXT record carries
    #[arg(long)]
    key: String,
}

/// One-shot challenge operation
#[derive(Debug, Clone, Copy)]
enum Operation {
    Present,
    Cleanup,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Present => write!(f, "present"),
            Operation::Cleanup => write!(f, "cleanup"),
        }
    }
}

impl From<ChallengeArgs> for ChallengeRequest {
    fn from(args: ChallengeArgs) -> Self {
        ChallengeRequest::new(args.fqdn, args.zone, args.key)
    }
}

/// Application configuration
struct Config {
    group_name: String,
    api_key: String,
    api_base_url: Option<String>,
    http_timeout_secs: Option<u64>,
    mode: String,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        let http_timeout_secs = match env::var("DNS01_HTTP_TIMEOUT_SECS") {
            Ok(value) => Some(value.trim().parse().map_err(|_| {
                anyhow::anyhow!("DNS01_HTTP_TIMEOUT_SECS must be a number. Got: {}", value)
            })?),
            Err(_) => None,
        };

        Ok(Self {
            group_name: env::var("GROUP_NAME").unwrap_or_default(),
            api_key: env::var("API_KEY").unwrap_or_default(),
            api_base_url: env::var("BUNNY_API_BASE_URL").ok(),
            http_timeout_secs,
            mode: env::var("DNS01_MODE").unwrap_or_else(|_| "live".to_string()),
            log_level: env::var("DNS01_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        if self.group_name.trim().is_empty() {
            anyhow::bail!(
                "GROUP_NAME must be specified. \
                Set it via: export GROUP_NAME=acme.example.com"
            );
        }

        if self.api_key.trim().is_empty() {
            anyhow::bail!(
                "API_KEY must be specified. \
                Set it via: export API_KEY=your_bunny_api_key"
            );
        }

        match self.mode.to_lowercase().as_str() {
            "live" | "dry-run" => {}
            _ => anyhow::bail!(
                "DNS01_MODE '{}' is not valid. Valid modes: live, dry-run",
                self.mode
            ),
        }

        if let Some(timeout) = self.http_timeout_secs
            && !(1..=300).contains(&timeout)
        {
            anyhow::bail!(
                "DNS01_HTTP_TIMEOUT_SECS must be between 1 and 300 seconds. Got: {}",
                timeout
            );
        }

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "DNS01_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        Ok(())
    }

    fn solver_config(&self) -> SolverConfig {
        let mut config = SolverConfig::new(&self.group_name, &self.api_key)
            .with_dry_run(self.mode.eq_ignore_ascii_case("dry-run"));

        if let Some(ref url) = self.api_base_url {
            config = config.with_api_base_url(url);
        }
        if let Some(timeout) = self.http_timeout_secs {
            config = config.with_http_timeout_secs(timeout);
        }
        config
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return Dns01ExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return Dns01ExitCode::ConfigError.into();
    }

    let log_level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return Dns01ExitCode::ConfigError.into();
    }

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return Dns01ExitCode::RuntimeError.into();
        }
    };

    rt.block_on(async {
        let (trigger, shutdown) = ShutdownSignal::channel();

        let mut solver = match dns01_provider_bunny::solver_from_config(&config.solver_config()) {
            Ok(solver) => solver,
            Err(e) => {
                error!("Failed to build solver: {}", e);
                return Dns01ExitCode::ConfigError;
            }
        };

        let host = HostConfig {
            group_name: config.group_name.clone(),
            ..Default::default()
        };
        if let Err(e) = solver.initialize(&host, shutdown).await {
            error!("Failed to initialize solver: {}", e);
            return Dns01ExitCode::ConfigError;
        }

        let outcome = match cli.command.unwrap_or(Command::Serve) {
            Command::Serve => serve(&solver, &config.group_name, trigger).await,
            Command::Present(args) => {
                run_once(&solver, Operation::Present, args.into(), trigger).await
            }
            Command::Cleanup(args) => {
                run_once(&solver, Operation::Cleanup, args.into(), trigger).await
            }
        };

        match outcome {
            Ok(()) => Dns01ExitCode::CleanShutdown,
            Err(e) => {
                error!("{:#}", e);
                Dns01ExitCode::RuntimeError
            }
        }
    })
    .into()
}

/// Wait for a shutdown signal, then abort in-flight provider calls
async fn serve(solver: &dyn Solver, group_name: &str, trigger: ShutdownTrigger) -> Result<()> {
    info!("Solver {} ready under group {}", solver.name(), group_name);

    let signal = wait_for_shutdown().await?;
    info!("Received shutdown signal: {}", signal);

    trigger.trigger();
    info!("Shutting down");
    Ok(())
}

/// Run one challenge operation, aborting it on SIGTERM/SIGINT
async fn run_once(
    solver: &dyn Solver,
    operation: Operation,
    request: ChallengeRequest,
    trigger: ShutdownTrigger,
) -> Result<()> {
    info!("Running {} for {}", operation, request.fqdn);

    let watcher = tokio::spawn(async move {
        match wait_for_shutdown().await {
            Ok(signal) => {
                info!("Received shutdown signal: {}", signal);
                trigger.trigger();
            }
            Err(e) => error!("Shutdown watcher failed: {}", e),
        }
    });

    let result = match operation {
        Operation::Present => solver.present(&request).await,
        Operation::Cleanup => solver.clean_up(&request).await,
    };
    watcher.abort();

    result.map_err(|e| anyhow::anyhow!("{} failed for {}: {}", operation, request.fqdn, e))?;
    info!("{} completed for {}", operation, request.fqdn);
    Ok(())
}

/// Wait for shutdown signals (SIGTERM, SIGINT)
///
/// # Returns
///
/// The name of the signal received.
#[cfg(unix)]
async fn wait_for_shutdown() -> Result<&'static str> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

    Ok(tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    })
}

/// Wait for shutdown signals (SIGINT only)
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn wait_for_shutdown() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to wait for CTRL-C: {}", e))?;
    Ok("SIGINT")
}
