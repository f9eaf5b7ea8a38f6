use std::time::Duration;
use std::{env, fmt, fs, io, path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::duration::{DurationError, parse_duration};
use crate::monitoring::{Target, ValidationError};
use crate::notifications::telegram::DEFAULT_API_URL;

/// Used when `client_request_timeout` is missing or empty.
pub const DEFAULT_REQUEST_TIMEOUT: &str = "15s";

/// Used when neither `--config` nor `SITEWATCH_CONFIG` is given.
pub const DEFAULT_CONFIG_PATH: &str = "./data/config.json";

pub const BOT_TOKEN_ENV: &str = "SITEWATCH_TELEGRAM_BOT_TOKEN";
pub const USER_ID_ENV: &str = "SITEWATCH_TELEGRAM_USER_ID";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}", path.display())]
    ReadFailed {
        path: path::PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse JSON config {}", path.display())]
    ParseJson {
        path: path::PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to parse TOML config {}", path.display())]
    ParseToml {
        path: path::PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("missing telegram bot token")]
    MissingBotToken,
    #[error("missing telegram user id")]
    MissingUserId,
    #[error("invalid client request timeout {value:?}")]
    InvalidTimeout {
        value: String,
        #[source]
        source: DurationError,
    },
    #[error("invalid website {name:?}")]
    InvalidWebsite {
        name: String,
        #[source]
        source: ValidationError,
    },
}

/// Service configuration
///
/// Field names are `snake_case`; the PascalCase spellings of the original
/// JSON format are accepted as aliases.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Token of the telegram bot in use
    #[serde(default, alias = "TelegramBotToken")]
    pub telegram_bot_token: String,

    /// Telegram chat that receives the notifications
    #[serde(default, alias = "TelegramUserID")]
    pub telegram_user_id: String,

    /// Request timeout as a duration string (`"5s"`, `"10m"`). `"0"` disables it.
    #[serde(default, alias = "ClientRequestTimeout", skip_serializing_if = "Option::is_none")]
    pub client_request_timeout: Option<String>,

    /// Bot API base URL, for self-hosted Bot API servers
    #[serde(default, alias = "TelegramApiUrl", skip_serializing_if = "Option::is_none")]
    pub telegram_api_url: Option<String>,

    #[serde(default, alias = "Websites")]
    pub websites: Vec<WebsiteConfig>,
}

/// One monitored website as written in the configuration file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebsiteConfig {
    #[serde(alias = "Name")]
    pub name: String,
    /// URL under which the website should be available
    #[serde(alias = "URL")]
    pub url: String,
    /// Duration string (`"5s"`, `"10m"`)
    #[serde(alias = "Interval")]
    pub interval: String,
}

fn is_toml_path(path: &path::Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("toml"))
}

/// Returns `None` for missing, empty and whitespace-only values
fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let write_indented = |level: usize| {
            move |f: &mut fmt::Formatter<'_>, label: &str, value: &dyn fmt::Display| {
                writeln!(f, "  {:indent$}{}: {}", "", label, value, indent = level * 2)
            }
        };
        let write_title_indented = |level: usize| {
            move |f: &mut fmt::Formatter<'_>, label: &str| {
                writeln!(f, "{:indent$}{}", "", label, indent = level * 2)
            }
        };

        let write_title_1 = write_title_indented(1);
        let write_1 = write_indented(1);
        let write_title_2 = write_title_indented(2);
        let write_2 = write_indented(2);

        let token = if non_blank(&self.telegram_bot_token).is_some() { "<set>" } else { "<missing>" };
        let timeout = self.client_request_timeout.as_deref().and_then(non_blank);

        writeln!(f, "Current Configuration State:")?;
        write_title_1(f, "Telegram")?;
        write_1(f, "Bot Token", &token)?;
        write_1(f, "User ID", &self.telegram_user_id)?;
        write_1(f, "API URL", &self.api_url())?;
        write_title_1(f, "HTTP Client")?;
        write_1(f, "Request Timeout", &timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT))?;
        write_title_1(f, "Websites")?;
        for website in &self.websites {
            write_title_2(f, &website.name)?;
            write_2(f, "URL", &website.url)?;
            write_2(f, "Interval", &website.interval)?;
        }

        Ok(())
    }
}

impl Config {
    /// Read a config file and apply the environment overrides
    ///
    /// Files ending in `.toml` are parsed as TOML, anything else as JSON.
    ///
    /// ```no_run
    /// let cfg = sitewatch::config::Config::load("./data/config.json")?;
    /// println!("{}", cfg);
    /// # Ok::<(), sitewatch::config::ConfigError>(())
    /// ```
    pub fn load(path: impl AsRef<path::Path>) -> Result<Self, ConfigError> {
        let mut config = Self::from_file(path)?;
        config.apply_overrides(|key| env::var(key).ok());
        Ok(config)
    }

    /// Generate Config structure from file, without environment overrides
    pub fn from_file(path: impl AsRef<path::Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw_string = fs::read_to_string(path)
            .map_err(|source| ConfigError::ReadFailed { path: path.to_path_buf(), source })?;

        if is_toml_path(path) {
            toml::from_str(&raw_string)
                .map_err(|source| ConfigError::ParseToml { path: path.to_path_buf(), source })
        } else {
            serde_json::from_str(&raw_string)
                .map_err(|source| ConfigError::ParseJson { path: path.to_path_buf(), source })
        }
    }

    /// Replace credentials with non-blank values returned by `lookup`
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(token) = lookup(BOT_TOKEN_ENV).filter(|v| non_blank(v).is_some()) {
            self.telegram_bot_token = token;
        }
        if let Some(user_id) = lookup(USER_ID_ENV).filter(|v| non_blank(v).is_some()) {
            self.telegram_user_id = user_id;
        }
    }

    /// Bot token and recipient, both required
    pub fn credentials(&self) -> Result<(&str, &str), ConfigError> {
        let token = non_blank(&self.telegram_bot_token).ok_or(ConfigError::MissingBotToken)?;
        let user_id = non_blank(&self.telegram_user_id).ok_or(ConfigError::MissingUserId)?;
        Ok((token, user_id))
    }

    /// Probe timeout, [`DEFAULT_REQUEST_TIMEOUT`] when unset. Zero means unbounded.
    pub fn request_timeout(&self) -> Result<Duration, ConfigError> {
        let value = self
            .client_request_timeout
            .as_deref()
            .and_then(non_blank)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT);

        parse_duration(value)
            .map_err(|source| ConfigError::InvalidTimeout { value: value.to_string(), source })
    }

    pub fn api_url(&self) -> &str {
        self.telegram_api_url.as_deref().and_then(non_blank).unwrap_or(DEFAULT_API_URL)
    }

    /// Turn every website entry into a validated target, stopping at the first bad one
    pub fn targets(&self) -> Result<Vec<Target>, ConfigError> {
        self.websites
            .iter()
            .map(|website| {
                Target::from_config(website).map_err(|source| ConfigError::InvalidWebsite {
                    name: website.name.clone(),
                    source,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use super::*;

    const LEGACY_JSON: &str = r#"{
        "TelegramBotToken": "123:ABC",
        "TelegramUserID": "42",
        "ClientRequestTimeout": "5s",
        "Websites": [
            { "Name": "Example", "URL": "https://example.com", "Interval": "10s" },
            { "Name": "Docs", "URL": "https://docs.example.com", "Interval": "1m" }
        ]
    }"#;

    fn write_config(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_legacy_json() {
        let file = write_config(".json", LEGACY_JSON);
        let config = Config::from_file(file.path()).unwrap();

        assert_eq!(config.credentials().unwrap(), ("123:ABC", "42"));
        assert_eq!(config.request_timeout().unwrap(), Duration::from_secs(5));
        assert_eq!(config.api_url(), DEFAULT_API_URL);

        let targets = config.targets().unwrap();
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].name(), "Example");
        assert_eq!(targets[1].interval(), Duration::from_secs(60));
    }

    #[test]
    fn test_load_toml() {
        let file = write_config(
            ".toml",
            r#"
                telegram_bot_token = "123:ABC"
                telegram_user_id = "42"
                telegram_api_url = "http://localhost:8081"

                [[websites]]
                name = "Example"
                url = "https://example.com"
                interval = "30s"
            "#,
        );
        let config = Config::from_file(file.path()).unwrap();

        assert_eq!(config.api_url(), "http://localhost:8081");
        assert_eq!(config.request_timeout().unwrap(), Duration::from_secs(15));
        assert_eq!(config.targets().unwrap()[0].interval(), Duration::from_secs(30));
    }

    #[test]
    fn test_missing_file_and_bad_syntax() {
        assert!(matches!(
            Config::from_file("/nonexistent/sitewatch.json"),
            Err(ConfigError::ReadFailed { .. })
        ));

        let json = write_config(".json", "{ not json");
        assert!(matches!(Config::from_file(json.path()), Err(ConfigError::ParseJson { .. })));

        let toml = write_config(".toml", "websites = [");
        assert!(matches!(Config::from_file(toml.path()), Err(ConfigError::ParseToml { .. })));
    }

    #[test]
    fn test_missing_credentials() {
        let mut config = Config::default();
        assert!(matches!(config.credentials(), Err(ConfigError::MissingBotToken)));

        config.telegram_bot_token = "123:ABC".into();
        config.telegram_user_id = "   ".into();
        assert!(matches!(config.credentials(), Err(ConfigError::MissingUserId)));
    }

    #[test]
    fn test_request_timeout() {
        let mut config = Config::default();
        assert_eq!(config.request_timeout().unwrap(), Duration::from_secs(15));

        config.client_request_timeout = Some(String::new());
        assert_eq!(config.request_timeout().unwrap(), Duration::from_secs(15));

        config.client_request_timeout = Some("0".into());
        assert_eq!(config.request_timeout().unwrap(), Duration::ZERO);

        config.client_request_timeout = Some("fast".into());
        assert!(matches!(config.request_timeout(), Err(ConfigError::InvalidTimeout { .. })));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config {
            telegram_bot_token: "file-token".into(),
            telegram_user_id: "file-user".into(),
            ..Config::default()
        };

        let env: HashMap<&str, &str> = HashMap::from([(BOT_TOKEN_ENV, "env-token"), (USER_ID_ENV, "")]);
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.telegram_bot_token, "env-token");
        assert_eq!(config.telegram_user_id, "file-user");
    }

    #[test]
    fn test_invalid_website_names_entry() {
        let config = Config {
            websites: vec![
                WebsiteConfig {
                    name: "Good".into(),
                    url: "https://example.com".into(),
                    interval: "5s".into(),
                },
                WebsiteConfig {
                    name: "Broken".into(),
                    url: "https://example.org".into(),
                    interval: "every minute".into(),
                },
            ],
            ..Config::default()
        };

        match config.targets() {
            Err(ConfigError::InvalidWebsite { name, .. }) => assert_eq!(name, "Broken"),
            other => panic!("expected InvalidWebsite, got {other:?}"),
        }
    }

    #[test]
    fn test_display_masks_token() {
        let file = write_config(".json", LEGACY_JSON);
        let config = Config::from_file(file.path()).unwrap();
        let rendered = config.to_string();

        assert!(!rendered.contains("123:ABC"));
        assert!(rendered.contains("Bot Token: <set>"));
        assert!(rendered.contains("Example"));
    }
}
