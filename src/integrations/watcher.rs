// src/integrations/watcher.rs — Background pollers for chat channels
//
// Watchers poll each configured channel for new messages and forward them
// to the bot loop. The first poll of a channel only records a baseline so
// commands sent while the bot was offline are not replayed.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::integrations::registry::IntegrationRegistry;
use crate::integrations::types::IncomingMessage;

/// A new chat message seen by a watcher.
#[derive(Debug, Clone)]
pub struct WatchEvent {
    /// Which integration the message came from
    pub integration_id: String,
    pub message: IncomingMessage,
}

impl WatchEvent {
    /// Key of the room this message belongs to, e.g. `discord:1234`.
    pub fn room_key(&self) -> String {
        format!("{}:{}", self.integration_id, self.message.channel)
    }
}

/// Configuration for a specific watcher.
#[derive(Debug, Clone)]
pub struct WatchConfig {
    /// Integration to watch
    pub integration_id: String,
    /// Channels to monitor
    pub targets: Vec<String>,
    /// Poll interval in seconds
    pub poll_interval_secs: u64,
    /// Messages fetched per poll
    pub history_limit: u32,
}

/// Manages background polling watchers for all configured integrations.
pub struct WatcherManager {
    configs: Vec<WatchConfig>,
    shutdown_tx: Option<tokio::sync::broadcast::Sender<()>>,
}

impl Default for WatcherManager {
    fn default() -> Self {
        Self::new()
    }
}

impl WatcherManager {
    pub fn new() -> Self {
        Self {
            configs: Vec::new(),
            shutdown_tx: None,
        }
    }

    /// Add a watcher configuration.
    pub fn add_watch(&mut self, config: WatchConfig) {
        self.configs.push(config);
    }

    /// Start all configured watchers, returning a channel that receives events.
    pub fn start(&mut self, registry: Arc<IntegrationRegistry>) -> mpsc::Receiver<WatchEvent> {
        let (event_tx, event_rx) = mpsc::channel(100);
        let (shutdown_tx, _) = tokio::sync::broadcast::channel(1);
        self.shutdown_tx = Some(shutdown_tx.clone());

        for config in &self.configs {
            let config = config.clone();
            let registry = registry.clone();
            let tx = event_tx.clone();
            let mut shutdown_rx = shutdown_tx.subscribe();

            tokio::spawn(async move {
                let interval = Duration::from_secs(config.poll_interval_secs);
                let mut last_seen: HashMap<String, Option<Cursor>> = HashMap::new();
                tracing::info!(
                    "Watcher started for {} ({} channel(s), {}s interval)",
                    config.integration_id,
                    config.targets.len(),
                    config.poll_interval_secs
                );

                loop {
                    tokio::select! {
                        _ = tokio::time::sleep(interval) => {
                            if let Err(e) = poll_integration(&registry, &config, &tx, &mut last_seen).await {
                                tracing::warn!(
                                    "Watcher poll failed for {}: {}",
                                    config.integration_id,
                                    e
                                );
                            }
                            if tx.is_closed() {
                                break;
                            }
                        }
                        _ = shutdown_rx.recv() => {
                            tracing::info!("Watcher stopping for {}", config.integration_id);
                            break;
                        }
                    }
                }
            });
        }

        event_rx
    }

    /// Stop all running watchers.
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }

    /// Check if any watchers are configured.
    pub fn has_watchers(&self) -> bool {
        !self.configs.is_empty()
    }
}

/// Position of the newest message already handled in a channel.
#[derive(Debug, Clone, PartialEq)]
pub struct Cursor {
    pub id: String,
    pub timestamp: String,
}

impl Cursor {
    fn of(message: &IncomingMessage) -> Self {
        Self {
            id: message.id.clone(),
            timestamp: message.timestamp.clone(),
        }
    }
}

/// Messages after the cursor. With no cursor every message is new.
///
/// When the cursor message has scrolled out of the fetched batch, messages
/// are compared by their RFC 3339 timestamps instead.
pub fn new_messages(messages: Vec<IncomingMessage>, cursor: Option<&Cursor>) -> Vec<IncomingMessage> {
    let Some(cursor) = cursor else {
        return messages;
    };
    match messages.iter().position(|m| m.id == cursor.id) {
        Some(pos) => messages.into_iter().skip(pos + 1).collect(),
        None => messages
            .into_iter()
            .filter(|m| m.timestamp.as_str() > cursor.timestamp.as_str())
            .collect(),
    }
}

/// Feed one fetched batch for `target` through the cursor table.
///
/// A target missing from `last_seen` has not been polled yet: the batch
/// becomes its baseline and nothing is returned, even when it is empty.
/// An entry holding `None` is a channel that had no messages so far.
pub fn advance(
    last_seen: &mut HashMap<String, Option<Cursor>>,
    target: &str,
    messages: Vec<IncomingMessage>,
) -> Vec<IncomingMessage> {
    let newest = messages.last().map(Cursor::of);
    let Some(entry) = last_seen.get_mut(target) else {
        last_seen.insert(target.to_string(), newest);
        return Vec::new();
    };

    let fresh = new_messages(messages, entry.as_ref());
    if newest.is_some() {
        *entry = newest;
    }
    fresh
}

/// Poll a single integration for new messages.
async fn poll_integration(
    registry: &IntegrationRegistry,
    config: &WatchConfig,
    tx: &mpsc::Sender<WatchEvent>,
    last_seen: &mut HashMap<String, Option<Cursor>>,
) -> anyhow::Result<()> {
    let messaging = registry
        .messaging(&config.integration_id)
        .ok_or_else(|| anyhow::anyhow!("Integration '{}' not found", config.integration_id))?;

    for target in &config.targets {
        let messages = match messaging.history(target, config.history_limit).await {
            Ok(m) => m,
            Err(e) => {
                tracing::debug!(
                    "Watcher: failed to poll {}/{}: {}",
                    config.integration_id,
                    target,
                    e
                );
                continue;
            }
        };

        for message in advance(last_seen, target, messages) {
            let event = WatchEvent {
                integration_id: config.integration_id.clone(),
                message,
            };
            if tx.send(event).await.is_err() {
                // Receiver dropped
                return Ok(());
            }
        }
    }

    Ok(())
}
