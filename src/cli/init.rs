// src/cli/init.rs — First-time setup

use std::path::Path;

use crate::infra::config::{Config, IntegrationEntry};
use crate::integrations::credentials::{
    self, DiscordCredentials, IntegrationCredentials, RocketChatCredentials,
};

/// Tokens passed on the command line.
#[derive(Debug, Default)]
pub struct InitOptions {
    pub discord_token: Option<String>,
    pub rocketchat_url: Option<String>,
    pub rocketchat_user_id: Option<String>,
    pub rocketchat_token: Option<String>,
}

/// Write a default config (unless one exists) and store any given tokens.
pub async fn run_init(config_path: &Path, opts: InitOptions) -> anyhow::Result<()> {
    println!("pokerpal setup");
    println!();

    if config_path.exists() {
        println!("  Config: {} (already exists)", config_path.display());
    } else {
        eprint!("  Writing default config... ");
        default_config(&opts).save_to(config_path)?;
        eprintln!("done");
        println!("  Config: {}", config_path.display());
    }

    let mut creds = IntegrationCredentials::load_from(&credentials::credentials_path())?;
    let mut changed = false;

    if let Some(token) = opts.discord_token {
        credentials::validate_token_format("discord", &token).map_err(anyhow::Error::msg)?;
        creds.discord = Some(DiscordCredentials { bot_token: token });
        changed = true;
    }

    if let (Some(server_url), Some(user_id), Some(auth_token)) = (
        opts.rocketchat_url,
        opts.rocketchat_user_id,
        opts.rocketchat_token,
    ) {
        credentials::validate_token_format("rocketchat", &auth_token)
            .map_err(anyhow::Error::msg)?;
        creds.rocketchat = Some(RocketChatCredentials {
            server_url,
            user_id,
            auth_token,
        });
        changed = true;
    }

    if changed {
        creds.save()?;
        println!("  Credentials: {}", credentials::credentials_path().display());
    }

    println!();
    println!("Setup complete!");
    println!();
    println!("Next steps:");
    println!("  1. Add channel IDs under [integrations.discord] or [integrations.rocketchat]");
    println!("  2. Optionally enable [sheets] and set GOOGLE_CLIENT_ID / GOOGLE_REFRESH_TOKEN");
    println!("  3. pokerpal status      Check credentials");
    println!("     pokerpal run         Start the bot");
    println!("     pokerpal shell       Try commands locally");

    Ok(())
}

/// Starter config. Integrations given on the command line are switched on
/// with an empty channel list to fill in.
fn default_config(opts: &InitOptions) -> Config {
    let mut config = Config::default();
    let entry = |enabled: bool| {
        Some(IntegrationEntry {
            enabled,
            channels: Vec::new(),
        })
    };
    config.integrations.discord = entry(opts.discord_token.is_some());
    config.integrations.rocketchat = entry(opts.rocketchat_token.is_some());
    config
}
