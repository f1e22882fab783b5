// src/bot/runner.rs — Long-running bot loop
//
// Watchers poll the configured chat channels; every new message goes
// through the dispatcher and the replies are posted back to the channel.

use std::sync::Arc;

use crate::bot::dispatcher::Dispatcher;
use crate::infra::config::{Config, IntegrationEntry};
use crate::infra::errors::PokerPalError;
use crate::integrations::credentials::IntegrationCredentials;
use crate::integrations::discord::DiscordAdapter;
use crate::integrations::google_sheets::GoogleSheetsAdapter;
use crate::integrations::registry::IntegrationRegistry;
use crate::integrations::rocketchat::RocketChatAdapter;
use crate::integrations::types::MessagingAdapter;
use crate::integrations::watcher::{WatchConfig, WatchEvent, WatcherManager};
use crate::sheets::SheetMirror;
use crate::util::{split_message, truncate_str};

/// Register the chat integrations that are both enabled and have credentials.
pub fn build_registry(config: &Config, creds: &IntegrationCredentials) -> IntegrationRegistry {
    let mut registry = IntegrationRegistry::new();

    let enabled = |entry: &Option<IntegrationEntry>| {
        entry.as_ref().is_some_and(|e| e.is_active())
    };

    if enabled(&config.integrations.discord) {
        match creds.discord {
            Some(ref discord) => {
                registry.register(Box::new(DiscordAdapter::new(discord.bot_token.clone())));
                tracing::info!("Integration: Discord connected");
            }
            None => tracing::warn!("Discord is enabled but no bot token is configured"),
        }
    }

    if enabled(&config.integrations.rocketchat) {
        match creds.rocketchat {
            Some(ref rc) => {
                registry.register(Box::new(RocketChatAdapter::new(
                    rc.server_url.clone(),
                    rc.user_id.clone(),
                    rc.auth_token.clone(),
                )));
                tracing::info!("Integration: RocketChat connected");
            }
            None => tracing::warn!("RocketChat is enabled but no credentials are configured"),
        }
    }

    registry
}

/// Google Sheets mirror, when `[sheets]` is enabled.
pub fn build_mirror(
    config: &Config,
    creds: &IntegrationCredentials,
) -> Result<Option<SheetMirror>, PokerPalError> {
    let Some(spreadsheet_id) = config.active_spreadsheet() else {
        return Ok(None);
    };

    let google = creds
        .google
        .as_ref()
        .filter(|g| g.access_token.is_some() || g.refresh_token.is_some())
        .ok_or_else(|| {
            PokerPalError::Config(
                "sheets.enabled is set but no Google OAuth tokens are configured".into(),
            )
        })?;

    // An empty access token is refreshed on the first 401.
    let adapter = GoogleSheetsAdapter::new(
        google.access_token.clone().unwrap_or_default(),
        google.refresh_token.clone(),
        google.client_id.clone(),
        google.client_secret.clone(),
    );
    tracing::info!("Integration: Google Sheets connected ({spreadsheet_id})");

    Ok(Some(SheetMirror::new(
        Arc::new(adapter),
        spreadsheet_id,
        config.sheets.sheet_rows,
        config.sheets.sheet_columns,
    )))
}

/// One watcher per registered chat integration with channels configured.
pub fn build_watch_configs(config: &Config, registry: &IntegrationRegistry) -> Vec<WatchConfig> {
    let entries = [
        ("discord", &config.integrations.discord),
        ("rocketchat", &config.integrations.rocketchat),
    ];

    entries
        .into_iter()
        .filter(|(id, _)| registry.get(id).is_some())
        .filter_map(|(id, entry)| entry.as_ref().filter(|e| e.is_active()).map(|e| (id, e)))
        .map(|(id, entry)| WatchConfig {
            integration_id: id.to_string(),
            targets: entry.channels.clone(),
            poll_interval_secs: config.bot.poll_interval_secs,
            history_limit: config.bot.history_limit,
        })
        .collect()
}

/// Run until Ctrl+C.
pub async fn run_bot(
    config: &Config,
    registry: Arc<IntegrationRegistry>,
    mut dispatcher: Dispatcher,
) -> Result<(), PokerPalError> {
    let watch_configs = build_watch_configs(config, &registry);
    if watch_configs.is_empty() {
        return Err(PokerPalError::NoIntegrations);
    }

    tracing::info!(
        "PokerPal starting (prefix '{}', spreadsheet mirror {})",
        dispatcher.prefix(),
        if dispatcher.has_mirror() { "on" } else { "off" }
    );

    let mut watcher_manager = WatcherManager::new();
    for wc in watch_configs {
        watcher_manager.add_watch(wc);
    }
    let mut event_rx = watcher_manager.start(registry.clone());

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    println!("PokerPal running. Press Ctrl+C to stop.");

    loop {
        tokio::select! {
            Some(event) = event_rx.recv() => {
                handle_event(&event, &registry, &mut dispatcher).await;
            }
            _ = &mut shutdown => {
                tracing::info!("Shutdown signal received");
                break;
            }
        }
    }

    watcher_manager.stop();
    if !dispatcher.store().is_empty() {
        tracing::info!(
            "Discarding {} running session(s): {}",
            dispatcher.store().len(),
            dispatcher.store().rooms().join(", ")
        );
    }
    println!("PokerPal stopped.");
    Ok(())
}

async fn handle_event(event: &WatchEvent, registry: &IntegrationRegistry, dispatcher: &mut Dispatcher) {
    let room = event.room_key();
    let msg = &event.message;
    tracing::info!("[{room}] {}: {}", msg.sender, truncate_str(&msg.content, 200));

    let replies = dispatcher.handle(&room, &msg.content).await;
    if replies.is_empty() {
        return;
    }

    let Some(messaging) = registry.messaging(&event.integration_id) else {
        tracing::error!("Integration '{}' disappeared from the registry", event.integration_id);
        return;
    };
    deliver(messaging, &msg.channel, &replies).await;
}

/// Post replies in order, splitting any that exceed the platform limit.
pub async fn deliver(messaging: &dyn MessagingAdapter, channel: &str, replies: &[String]) {
    let limit = messaging.max_message_len();
    for reply in replies {
        for chunk in split_message(reply, limit) {
            if let Err(e) = messaging.send(channel, &chunk).await {
                tracing::error!("Failed to send reply to {channel}: {e}");
                return;
            }
        }
    }
}
