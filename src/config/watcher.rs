//! Configuration file watcher for hot reload.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::ProviderConfig;

/// Monitors the configuration file and forwards valid, changed configs.
pub struct ConfigWatcher {
    path: PathBuf,
    current: ProviderConfig,
    update_tx: mpsc::UnboundedSender<ProviderConfig>,
}

impl ConfigWatcher {
    /// Returns the watcher and a receiver for configuration updates.
    ///
    /// `current` is the configuration already in use; reloads equal to it
    /// are not forwarded.
    pub fn new(path: &Path, current: ProviderConfig) -> (Self, mpsc::UnboundedReceiver<ProviderConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                current,
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching. Dropping the returned watcher stops it.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let Self {
            path,
            mut current,
            update_tx,
        } = self;
        let watched = path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| {
                let event = match res {
                    Ok(event) => event,
                    Err(e) => {
                        tracing::error!(error = ?e, "Watch error");
                        return;
                    }
                };
                if !(event.kind.is_modify() || event.kind.is_create()) {
                    return;
                }

                match load_config(&path) {
                    Ok(new_config) if new_config == current => {
                        tracing::debug!("Config file touched but unchanged");
                    }
                    Ok(new_config) => {
                        tracing::info!(path = ?path, "Config file changed, reloading");
                        current = new_config.clone();
                        let _ = update_tx.send(new_config);
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to reload config, keeping current configuration");
                    }
                }
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&watched, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?watched, "Config watcher started");
        Ok(watcher)
    }
}
