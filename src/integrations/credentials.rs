// src/integrations/credentials.rs — Credential storage for chat and sheet integrations

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::infra::paths;

/// Credentials file stored at ~/.pokerpal/credentials/integrations.json
///
/// # Security Note
/// Tokens are stored as plaintext JSON on disk with chmod 600 on Unix.
/// Environment variables take precedence and avoid writing secrets to disk.
const CREDENTIALS_FILE: &str = "integrations.json";

/// All stored integration credentials.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntegrationCredentials {
    #[serde(default)]
    pub discord: Option<DiscordCredentials>,
    #[serde(default)]
    pub rocketchat: Option<RocketChatCredentials>,
    #[serde(default)]
    pub google: Option<GoogleCredentials>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscordCredentials {
    pub bot_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RocketChatCredentials {
    pub server_url: String,
    pub user_id: String,
    /// Personal access token
    pub auth_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

impl IntegrationCredentials {
    /// Load credentials from disk or environment.
    pub fn load() -> anyhow::Result<Self> {
        let mut creds = Self::load_from(&credentials_path())?;
        creds.apply_env_overrides();
        Ok(creds)
    }

    /// Load a credentials file; a missing file yields empty credentials.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save credentials to the default location.
    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&credentials_path())
    }

    /// Save credentials with restrictive permissions (atomic write).
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                let dir_perms = std::fs::Permissions::from_mode(0o700);
                std::fs::set_permissions(parent, dir_perms)?;
            }
        }

        let json = serde_json::to_string_pretty(self)?;

        // Write to a temp file then rename so a crash never leaves half a file
        let tmp_path = path.with_extension("json.tmp");
        std::fs::write(&tmp_path, &json)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&tmp_path, perms)?;
        }

        std::fs::rename(&tmp_path, path)?;
        Ok(())
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        // Discord (DISCORD_TOKEN kept as an alias)
        if let Ok(token) =
            std::env::var("DISCORD_BOT_TOKEN").or_else(|_| std::env::var("DISCORD_TOKEN"))
        {
            self.discord = Some(DiscordCredentials { bot_token: token });
        }

        // RocketChat
        if let (Ok(server_url), Ok(user_id), Ok(auth_token)) = (
            std::env::var("ROCKETCHAT_URL"),
            std::env::var("ROCKETCHAT_USER_ID"),
            std::env::var("ROCKETCHAT_AUTH_TOKEN"),
        ) {
            self.rocketchat = Some(RocketChatCredentials {
                server_url,
                user_id,
                auth_token,
            });
        }

        // Google (OAuth2)
        if let Ok(id) = std::env::var("GOOGLE_CLIENT_ID") {
            if let Ok(secret) = std::env::var("GOOGLE_CLIENT_SECRET") {
                self.google = Some(GoogleCredentials {
                    client_id: id,
                    client_secret: secret,
                    access_token: std::env::var("GOOGLE_ACCESS_TOKEN").ok(),
                    refresh_token: std::env::var("GOOGLE_REFRESH_TOKEN").ok(),
                });
            }
        }
    }

    /// Check whether credentials exist for a given integration.
    pub fn has_credentials(&self, integration: &str) -> bool {
        match integration {
            "discord" => self.discord.is_some(),
            "rocketchat" => self.rocketchat.is_some(),
            "google_sheets" => self
                .google
                .as_ref()
                .is_some_and(|g| g.access_token.is_some() || g.refresh_token.is_some()),
            _ => false,
        }
    }

    /// List all integrations that have credentials.
    pub fn configured_integrations(&self) -> Vec<&str> {
        ["discord", "rocketchat", "google_sheets"]
            .into_iter()
            .filter(|id| self.has_credentials(id))
            .collect()
    }
}

/// Path to the credentials file.
pub fn credentials_path() -> PathBuf {
    paths::credentials_dir().join(CREDENTIALS_FILE)
}

/// Validate a token format without making an API call.
pub fn validate_token_format(integration: &str, token: &str) -> Result<(), String> {
    match integration {
        "discord" => {
            // Discord tokens are base64-ish strings, no easy prefix check
            if token.len() < 20 {
                return Err("Discord bot token seems too short".into());
            }
        }
        "rocketchat" => {
            if token.trim().is_empty() || token.contains(char::is_whitespace) {
                return Err("RocketChat access tokens must be a single non-empty word".into());
            }
        }
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_default() {
        let creds = IntegrationCredentials::default();
        assert!(creds.discord.is_none());
        assert!(creds.rocketchat.is_none());
        assert!(creds.configured_integrations().is_empty());
    }

    #[test]
    fn test_configured_integrations() {
        let creds = IntegrationCredentials {
            discord: Some(DiscordCredentials {
                bot_token: "x".repeat(30),
            }),
            rocketchat: None,
            google: Some(GoogleCredentials {
                client_id: "id".into(),
                client_secret: "secret".into(),
                access_token: None,
                refresh_token: Some("refresh".into()),
            }),
        };
        assert_eq!(creds.configured_integrations(), vec!["discord", "google_sheets"]);
        assert!(!creds.has_credentials("rocketchat"));
        assert!(!creds.has_credentials("slack"));
    }

    #[test]
    fn test_google_without_tokens_is_not_configured() {
        let creds = IntegrationCredentials {
            google: Some(GoogleCredentials {
                client_id: "id".into(),
                client_secret: "secret".into(),
                access_token: None,
                refresh_token: None,
            }),
            ..Default::default()
        };
        assert!(!creds.has_credentials("google_sheets"));
    }

    #[test]
    fn test_validate_discord_token() {
        assert!(validate_token_format("discord", &"a".repeat(59)).is_ok());
        assert!(validate_token_format("discord", "short").is_err());
    }

    #[test]
    fn test_validate_rocketchat_token() {
        assert!(validate_token_format("rocketchat", "abcDEF123").is_ok());
        assert!(validate_token_format("rocketchat", "has space").is_err());
        assert!(validate_token_format("rocketchat", "").is_err());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials").join(CREDENTIALS_FILE);
        let creds = IntegrationCredentials {
            rocketchat: Some(RocketChatCredentials {
                server_url: "https://chat.example.com".into(),
                user_id: "u1".into(),
                auth_token: "tok".into(),
            }),
            ..Default::default()
        };
        creds.save_to(&path).unwrap();

        let loaded = IntegrationCredentials::load_from(&path).unwrap();
        assert!(loaded.has_credentials("rocketchat"));
        assert_eq!(loaded.rocketchat.unwrap().user_id, "u1");
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let loaded = IntegrationCredentials::load_from(Path::new("/nonexistent/creds.json")).unwrap();
        assert!(loaded.configured_integrations().is_empty());
    }
}
