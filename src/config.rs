use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Environment variable holding the Telegram bot token
pub const TOKEN_ENV: &str = "BOT_TOKEN";

#[derive(Debug, Clone)]
pub struct Config {
    pub bot_token: String,
    pub fetch: FetchConfig,
}

/// Optional settings file. Every field has a default.
#[derive(Debug, Deserialize, Default)]
struct FileConfig {
    #[serde(default)]
    fetch: FetchConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FetchConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/124.0 Safari/537.36"
        .to_string()
}

impl Config {
    /// Read the optional settings file at `path` (defaults when it does not
    /// exist) and the bot token from the environment.
    pub fn load(path: &Path) -> Result<Self> {
        let fetch = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            parse_file_config(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        } else {
            FetchConfig::default()
        };

        let bot_token = bot_token_from(std::env::var(TOKEN_ENV).ok())?;

        Ok(Self { bot_token, fetch })
    }
}

fn parse_file_config(content: &str) -> Result<FetchConfig> {
    let file: FileConfig = toml::from_str(content)?;
    if file.fetch.timeout_secs == 0 {
        anyhow::bail!("fetch.timeout_secs must be greater than zero");
    }
    Ok(file.fetch)
}

fn bot_token_from(value: Option<String>) -> Result<String> {
    match value {
        Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        _ => anyhow::bail!("Env var {} is missing", TOKEN_ENV),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let fetch = parse_file_config("").unwrap();
        assert_eq!(fetch.timeout_secs, 10);
        assert!(fetch.user_agent.starts_with("Mozilla/5.0"));
    }

    #[test]
    fn test_fetch_section_overrides() {
        let fetch = parse_file_config(
            r#"
            [fetch]
            timeout_secs = 3
            user_agent = "tg-music-test"
            "#,
        )
        .unwrap();
        assert_eq!(fetch.timeout_secs, 3);
        assert_eq!(fetch.user_agent, "tg-music-test");
    }

    #[test]
    fn test_zero_timeout_rejected() {
        assert!(parse_file_config("[fetch]\ntimeout_secs = 0").is_err());
    }

    #[test]
    fn test_bot_token_required() {
        assert!(bot_token_from(None).is_err());
        assert!(bot_token_from(Some("   ".to_string())).is_err());
        assert_eq!(
            bot_token_from(Some(" 123:abc\n".to_string())).unwrap(),
            "123:abc"
        );
    }

    #[test]
    fn test_missing_token_message_names_variable() {
        let err = bot_token_from(None).unwrap_err();
        assert!(err.to_string().contains("BOT_TOKEN"));
    }
}
