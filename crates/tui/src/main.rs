mod app;
mod theme;

use std::{
    fs::{self, OpenOptions},
    sync::Arc,
};

use anyhow::{Context, Result};
use portal_core::{
    banner::presets,
    config::{self, AppConfig},
    ConfiguredPolicy, DismissalStore, FileDismissalStore, ShellConfig, ShellController, ShellDeps,
    SystemOpener,
};
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::{prelude::*, EnvFilter};

use crate::app::{ChannelNavigator, PortalApp};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;

    let config_path = config::ensure_default_config().context("failed to prepare config")?;
    let config = AppConfig::load().context("failed to load configuration")?;
    info!(config = %config_path.display(), state = %config.state_dir.display(), "configuration loaded");

    let store: Arc<dyn DismissalStore> =
        Arc::new(FileDismissalStore::new(config.dismissal_store_path()));
    let (route_tx, route_rx) = mpsc::unbounded_channel();

    let shell = ShellController::new(
        ShellConfig {
            banner: presets::annual_enrollment(
                config.banner_version.clone(),
                config.enrollment_video_url.clone(),
            ),
            user_email: config.user_email.clone(),
            start_path: config.start_route.clone(),
        },
        ShellDeps {
            store,
            navigator: Box::new(ChannelNavigator::new(route_tx)),
            opener: Box::new(SystemOpener),
            policies: Box::new(ConfiguredPolicy::new(config.primary_policy_id.clone())),
        },
    );

    let theme = theme::Theme::from_config(&config);
    let mut app = PortalApp::new(shell, route_rx, theme);
    app.run().await
}

fn init_logging() -> Result<()> {
    let log_dir = std::env::current_dir()?.join("logs");
    fs::create_dir_all(&log_dir)?;
    let log_path = log_dir.join("bloom-portal.log");
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("failed to open log file {}", log_path.display()))?;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // The terminal UI owns stdout, so only the file layer is installed.
    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .compact()
        .with_writer(Arc::new(log_file));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    Ok(())
}
