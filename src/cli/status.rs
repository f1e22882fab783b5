// src/cli/status.rs — Configuration and credential status

use std::path::Path;

use crate::infra::config::{Config, IntegrationEntry};
use crate::infra::paths;
use crate::integrations::credentials::{self, IntegrationCredentials};
use crate::integrations::discord::DiscordAdapter;
use crate::integrations::google_sheets::GoogleSheetsAdapter;
use crate::integrations::rocketchat::RocketChatAdapter;

/// Display config and validate each configured credential against its API.
pub async fn show_status(config: &Config, config_path: &Path) -> anyhow::Result<()> {
    println!("pokerpal v{}", env!("CARGO_PKG_VERSION"));
    println!();

    if config_path.exists() {
        println!("  Config:       {} (loaded)", config_path.display());
    } else {
        println!("  Config:       (using defaults)");
    }
    println!("  Prefix:       {}", config.bot.command_prefix);
    println!("  Poll every:   {}s", config.bot.poll_interval_secs);
    println!("  Logs:         {}", paths::log_dir().display());

    let creds_path = credentials::credentials_path();
    let creds = IntegrationCredentials::load()?;
    println!(
        "  Credentials:  {}",
        if creds_path.exists() {
            creds_path.display().to_string()
        } else {
            "(environment only)".into()
        }
    );

    println!();
    println!("  Chat:");
    print_entry("discord", config.integrations.discord.as_ref(), &creds);
    print_entry("rocketchat", config.integrations.rocketchat.as_ref(), &creds);

    println!();
    match config.active_spreadsheet() {
        Some(id) => println!("  Spreadsheet:  {id}"),
        None => println!("  Spreadsheet:  (mirroring off)"),
    }

    println!();
    println!("  Checking credentials...");
    for line in validate_all(config, &creds).await {
        println!("    {line}");
    }

    Ok(())
}

fn print_entry(id: &str, entry: Option<&IntegrationEntry>, creds: &IntegrationCredentials) {
    let state = match entry {
        Some(e) if e.is_active() => format!("enabled, {} channel(s)", e.channels.len()),
        Some(e) if e.enabled => "enabled, no channels".to_string(),
        _ => "disabled".to_string(),
    };
    let creds_state = if creds.has_credentials(id) {
        "credentials set"
    } else {
        "no credentials"
    };
    println!("    {id:<12} {state} ({creds_state})");
}

async fn validate_all(config: &Config, creds: &IntegrationCredentials) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(ref d) = creds.discord {
        let adapter = DiscordAdapter::new(d.bot_token.clone());
        lines.push(check(adapter.validate().await, "Discord"));
    }

    if let Some(ref rc) = creds.rocketchat {
        let adapter = RocketChatAdapter::new(
            rc.server_url.clone(),
            rc.user_id.clone(),
            rc.auth_token.clone(),
        );
        lines.push(check(adapter.validate().await, "RocketChat"));
    }

    if let (Some(id), Some(g)) = (config.active_spreadsheet(), creds.google.as_ref()) {
        let adapter = GoogleSheetsAdapter::new(
            g.access_token.clone().unwrap_or_default(),
            g.refresh_token.clone(),
            g.client_id.clone(),
            g.client_secret.clone(),
        );
        lines.push(check(adapter.validate(id).await, "Google Sheets"));
    }

    if lines.is_empty() {
        lines.push("nothing to check".into());
    }
    lines
}

fn check(result: anyhow::Result<String>, name: &str) -> String {
    match result {
        Ok(msg) => format!("ok    {msg}"),
        Err(e) => format!("FAIL  {name}: {e}"),
    }
}
