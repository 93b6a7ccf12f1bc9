//! `bridgeview`: terminal dashboard for a sensor-to-MQTT bridge.
//!
//! Views are navigable via number keys (1-6): Dashboard, Sensors, MQTT,
//! Logs, Config and Docs. Data loads per view; nothing polls.
//!
//! Logs are written to a file (default `/tmp/bridgeview.log`) to avoid
//! corrupting the terminal UI.

mod action;
mod app;
mod component;
mod event;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::ffi::OsStr;
use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use bridgeview_config::Overrides;
use bridgeview_core::Session;

use crate::app::App;

/// Terminal dashboard for monitoring a sensor-to-MQTT bridge.
#[derive(Parser, Debug)]
#[command(name = "bridgeview", version, about)]
struct Cli {
    /// Bridge server URL (e.g., http://192.168.1.20:8000)
    #[arg(short = 's', long, env = "BRIDGEVIEW_SERVER")]
    server: Option<String>,

    /// Config profile to use (defaults to the file's default profile)
    #[arg(short = 'p', long, env = "BRIDGEVIEW_PROFILE")]
    profile: Option<String>,

    /// Request timeout in seconds (0 disables it)
    #[arg(long)]
    timeout: Option<u64>,

    /// Log file path (defaults to /tmp/bridgeview.log)
    #[arg(long, default_value = "/tmp/bridgeview.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }
}

/// File-only tracing; anything on stdout/stderr would corrupt the TUI.
/// `RUST_LOG` directives win over `-v`. Hold the guard until exit.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let filter = EnvFilter::builder()
        .with_default_directive(cli.log_level().into())
        .from_env_lossy();

    let (dir, name) = match (cli.log_file.parent(), cli.log_file.file_name()) {
        (Some(dir), Some(name)) if !dir.as_os_str().is_empty() => (dir.to_path_buf(), name),
        (_, Some(name)) => (PathBuf::from("."), name),
        _ => (PathBuf::from("/tmp"), OsStr::new("bridgeview.log")),
    };
    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .init();

    guard
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Hooks go in before the terminal is touched.
    tui::install_hooks()?;
    let _log_guard = setup_tracing(&cli);

    // Priority: CLI flags > environment > config file.
    let config = bridgeview_config::load_config()?;
    let overrides = Overrides {
        profile: cli.profile.clone(),
        server: cli.server.clone(),
        timeout: cli.timeout,
    };
    let client = bridgeview_config::resolve(&config, &overrides)?;
    info!(server = %client.server, "starting bridgeview");

    let session = Session::new(&client)?;
    let mut app = App::new(session, client.server.to_string());
    app.run().await?;

    Ok(())
}
