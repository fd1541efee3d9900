//! vpnguard — self-healing recovery for a VPN gateway container and its
//! dependents.
//!
//! One invocation performs one probe / diagnose / repair / verify cycle,
//! bounded by the configured retry budget. The caller (cron, a systemd
//! timer) is responsible for not launching a new run while one is active.
//!
//! # Usage
//!
//! ```text
//! vpnguard run --config /etc/vpnguard.toml
//! vpnguard probe --url http://127.0.0.1:8388/
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use vpnguard_recovery::probe::{self, HttpProber};
use vpnguard_recovery::{HealthStatus, Orchestrator, RecoveryConfig};
use vpnguard_runtime::DockerCli;

#[derive(Parser)]
#[command(
    name = "vpnguard",
    about = "Self-healing recovery for a VPN gateway container and its dependents",
    version,
    propagate_version = true,
)]
struct Cli {
    /// Path to vpnguard.toml (default: ./vpnguard.toml if present).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory for the daily-rolling invocation log (in addition to
    /// console output).
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Container runtime CLI binary to drive (e.g. "podman").
    #[arg(long, default_value = "docker", global = true)]
    runtime_binary: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one probe-recover-verify invocation.
    Run {
        /// Override the gateway container name.
        #[arg(long)]
        gateway: Option<String>,
        /// Override the health-check URL.
        #[arg(long)]
        url: Option<String>,
        /// Override the retry budget.
        #[arg(long)]
        max_retries: Option<u32>,
    },
    /// Probe the endpoint once and report the derived status. Issues no
    /// lifecycle commands.
    Probe {
        /// Override the health-check URL.
        #[arg(long)]
        url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // The guard must outlive the run so buffered file-log lines flush.
    let _log_guard = init_logging(cli.log_dir.as_deref());

    let mut config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("vpnguard: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Command::Run {
            gateway,
            url,
            max_retries,
        } => {
            if let Some(gateway) = gateway {
                config.gateway = gateway;
            }
            if let Some(url) = url {
                config.health_url = url;
            }
            if let Some(max_retries) = max_retries {
                config.max_retries = max_retries;
            }

            let prober = Arc::new(HttpProber::new(config.probe_timeout()));
            let runtime = Arc::new(DockerCli::with_binary(&cli.runtime_binary));
            let orchestrator = Orchestrator::new(runtime, prober, config);

            let outcome = orchestrator.run().await;
            info!(?outcome, "invocation finished");
            if outcome.is_resolved() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Command::Probe { url } => {
            if let Some(url) = url {
                config.health_url = url;
            }
            let prober = HttpProber::new(config.probe_timeout());
            match probe::check_endpoint(&prober, &config.health_url).await {
                HealthStatus::Up => {
                    println!("up");
                    ExitCode::SUCCESS
                }
                HealthStatus::Down => {
                    println!("down");
                    ExitCode::FAILURE
                }
            }
        }
    }
}

/// Load the config file, falling back to ./vpnguard.toml, then defaults.
fn load_config(path: Option<&Path>) -> anyhow::Result<RecoveryConfig> {
    match path {
        Some(path) => Ok(RecoveryConfig::from_file(path)?),
        None => {
            let default_path = Path::new("vpnguard.toml");
            if default_path.exists() {
                Ok(RecoveryConfig::from_file(default_path)?)
            } else {
                Ok(RecoveryConfig::default())
            }
        }
    }
}

/// Console logging, plus a daily-rolling file log when `--log-dir` is
/// given. The file writer is non-blocking: a slow or failing log disk
/// drops lines rather than stalling recovery.
fn init_logging(
    log_dir: Option<&Path>,
) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,vpnguard=debug"));
    let console = tracing_subscriber::fmt::layer();

    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "vpnguard.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(env_filter)
                .with(console)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(writer)
                        .with_ansi(false),
                )
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(console)
                .init();
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn load_config_from_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "gateway = \"wg-gate\"\nhealth_url = \"http://10.0.0.2:1080/\"\nmax_retries = 7"
        )
        .unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.gateway, "wg-gate");
        assert_eq!(config.max_retries, 7);
    }

    #[test]
    fn load_config_missing_explicit_file_errors() {
        let missing = Path::new("/nonexistent/vpnguard.toml");
        assert!(load_config(Some(missing)).is_err());
    }

    #[test]
    fn runtime_binary_defaults_to_docker() {
        let cli = Cli::try_parse_from(["vpnguard", "run"]).unwrap();
        assert_eq!(cli.runtime_binary, "docker");
    }

    #[test]
    fn runtime_binary_can_be_overridden() {
        let cli =
            Cli::try_parse_from(["vpnguard", "run", "--runtime-binary", "podman"]).unwrap();
        assert_eq!(cli.runtime_binary, "podman");
    }

    #[test]
    fn parse_run_with_overrides() {
        let cli = Cli::try_parse_from([
            "vpnguard",
            "run",
            "--gateway",
            "wg-gate",
            "--max-retries",
            "5",
        ])
        .unwrap();
        match cli.command {
            Command::Run {
                gateway,
                max_retries,
                ..
            } => {
                assert_eq!(gateway.as_deref(), Some("wg-gate"));
                assert_eq!(max_retries, Some(5));
            }
            _ => panic!("expected run subcommand"),
        }
    }
}
