//! `sitenav-tui`: terminal front-end for a website directory.
//!
//! Three screens: the approved listing (Home), the admin moderation queue,
//! and the submission form. Listing screens carry a header that fades in
//! as the list scrolls.
//!
//! Logs go to a file so they never corrupt the terminal. A background
//! data bridge relays store changes into the action loop.

mod action;
mod app;
mod component;
mod data_bridge;
mod event;
mod screen;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use sitenav_config::Profile;
use sitenav_core::{Directory, DirectoryConfig, FileLikeStore};

use crate::app::App;

/// Browse, moderate and submit websites from the terminal.
#[derive(Parser, Debug)]
#[command(name = "sitenav-tui", version, about)]
struct Cli {
    /// Profile from the config file
    #[arg(short, long, env = "SITENAV_PROFILE")]
    profile: Option<String>,

    /// Directory server URL, bypassing profiles (e.g., https://dir.example.com)
    #[arg(short, long, env = "SITENAV_SERVER")]
    server: Option<String>,

    /// Log file path (defaults to sitenav-tui.log in the data directory)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// File-only tracing. The returned guard flushes on drop.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "sitenav_tui={log_level},sitenav_core={log_level}"
        ))
    });

    let log_file = cli
        .log_file
        .clone()
        .unwrap_or_else(|| sitenav_config::log_dir().join("sitenav-tui.log"));
    let log_dir = log_file
        .parent()
        .map_or_else(std::env::temp_dir, std::path::Path::to_path_buf);
    let log_filename = log_file
        .file_name()
        .map_or_else(|| "sitenav-tui.log".into(), std::ffi::OsStr::to_os_string);

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    guard
}

/// `--server` wins over profiles; otherwise the selected profile is used.
fn directory_config(cli: &Cli, cfg: &sitenav_config::Config) -> Result<DirectoryConfig> {
    if let Some(server) = &cli.server {
        let profile = Profile {
            server: server.clone(),
            ..Profile::default()
        };
        return sitenav_config::profile_to_directory_config(&profile, "adhoc")
            .wrap_err("invalid --server");
    }

    let name = cfg.profile_name(cli.profile.as_deref());
    let profile = cfg
        .profile(&name)
        .wrap_err("no usable profile; pass --server or run `sitenav config init`")?;
    Ok(sitenav_config::profile_to_directory_config(profile, &name)?)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tui::install_hooks()?;
    let _log_guard = setup_tracing(&cli);

    let cfg = sitenav_config::load_config_or_default();
    let config = directory_config(&cli, &cfg)?;
    info!(url = %config.url, role = %config.role, "starting sitenav-tui");

    let likes = FileLikeStore::open(sitenav_config::like_store_path())?;
    let directory = Directory::from_config(&config, Arc::new(likes))?;

    let mut app = App::new(directory, cfg.ui);
    app.run().await
}
