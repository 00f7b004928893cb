//! `config-store get|set`: JSON in on stdin, JSON out on stdout.

use std::process::ExitCode;

use dotenvy::dotenv;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::{debug, error, info};

use common::{ConfigEntry, QueryPattern};
use configs::{AppConfig, LogFormat};

const USAGE: &str = "usage: config-store <get|set>  (reads a JSON array from stdin)";

#[derive(Clone, Copy, Debug)]
enum Command {
    Get,
    Set,
}

fn parse_command() -> Option<Command> {
    let mut args = std::env::args().skip(1);
    let cmd = match args.next()?.as_str() {
        "get" => Command::Get,
        "set" => Command::Set,
        _ => return None,
    };
    args.next().is_none().then_some(cmd)
}

fn init_logging(format: LogFormat) {
    match format {
        LogFormat::Compact => common::utils::logging::init_logging_default(),
        LogFormat::Json => common::utils::logging::init_logging_json(),
    }
    debug!(service = "config-store", event = "logger_init", "tracing subscriber initialized");
}

async fn read_stdin() -> anyhow::Result<String> {
    let mut buf = String::new();
    tokio::io::stdin().read_to_string(&mut buf).await?;
    Ok(buf)
}

async fn run(cfg: AppConfig, cmd: Command) -> anyhow::Result<()> {
    let input = read_stdin().await?;
    let store = service::bootstrap::open_store(&cfg).await?;
    match cmd {
        Command::Get => {
            let patterns: Vec<QueryPattern> = serde_json::from_str(&input)?;
            let entries = store.get(&patterns).await?;
            let mut out = serde_json::to_vec_pretty(&entries)?;
            out.push(b'\n');
            let mut stdout = tokio::io::stdout();
            stdout.write_all(&out).await?;
            stdout.flush().await?;
            info!(service = "config-store", event = "get", patterns = patterns.len(), entries = entries.len(), "query served");
        }
        Command::Set => {
            let entries: Vec<ConfigEntry> = serde_json::from_str(&input)?;
            store.set(&entries).await?;
            info!(service = "config-store", event = "set", entries = entries.len(), "batch applied");
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    dotenv().ok();

    let cfg = AppConfig::load_and_validate();
    init_logging(cfg.as_ref().map(|c| c.logging.format).unwrap_or_default());

    let Some(cmd) = parse_command() else {
        eprintln!("{USAGE}");
        return ExitCode::from(2);
    };

    let cfg = match cfg {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(service = "config-store", event = "config_invalid", error = %e, "failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    std::panic::set_hook(Box::new(|info| {
        error!(service = "config-store", event = "panic", pid = std::process::id(), message = %info, "unhandled panic occurred");
    }));

    let rt = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "config-store", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    match rt.block_on(run(cfg, cmd)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(service = "config-store", event = "command_failed", command = ?cmd, error = %e, "command failed");
            ExitCode::FAILURE
        }
    }
}
