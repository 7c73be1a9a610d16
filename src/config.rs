//! Configuration file structures for teamwatch.
//!
//! Configuration is a YAML file with three sections, any value of which can
//! be overridden through environment variables with the `TEAMWATCH_` prefix
//! and `__` as section separator (e.g. `TEAMWATCH_SITE__PASSWORD`). Secrets
//! belong in the environment, not in the file.
//!
//! # Configuration file format
//!
//! ```yaml
//! site:
//!   base_url: "https://amara.example.org/en"
//!   username: "watcher"
//!   password: "secret"
//!
//! watch:
//!   recency_threshold_secs: 600   # optional, default 600
//!   concurrency: 1                # optional, default 1
//!   patterns:                     # optional, defaults shown in `PatternConfig`
//!     - contains: "added a video"
//!     - contains: "unassigned"
//!     - sequence: ["endorsed", "(transcriber)"]
//!
//! webhook:
//!   url: "https://hooks.example.com/trigger/team-activity/with/key/XYZ"
//! ```

use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::Deserialize;

/// Root configuration structure.
#[derive(Deserialize)]
pub struct Config {
    /// Activity site connection settings
    pub site: Site,
    /// Watch pipeline tuning
    #[serde(default)]
    pub watch: Watch,
    /// Outbound alert settings
    pub webhook: Webhook,
}

/// Activity site connection settings.
#[derive(Deserialize)]
pub struct Site {
    /// Base URL of the site, including the language prefix.
    ///
    /// A trailing slash is normalized away at load time.
    ///
    /// # Examples
    ///
    /// - `https://amara.org/en`
    /// - `http://localhost:8080/en`
    pub base_url: String,

    /// Site account username.
    pub username: String,

    /// Site account password.
    ///
    /// Prefer supplying this through `TEAMWATCH_SITE__PASSWORD` over writing
    /// it into the file.
    pub password: String,
}

/// Watch pipeline tuning.
#[derive(Deserialize)]
pub struct Watch {
    /// Maximum age in seconds an activity may have and still be considered.
    #[serde(default = "default_recency_threshold_secs")]
    pub recency_threshold_secs: i64,

    /// How many feeds may be fetched at the same instant.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Alert pattern set; an activity matching any one of them is
    /// alert-worthy.
    #[serde(default = "PatternConfig::default_set")]
    pub patterns: Vec<PatternConfig>,
}

impl Default for Watch {
    fn default() -> Self {
        Watch {
            recency_threshold_secs: default_recency_threshold_secs(),
            concurrency: default_concurrency(),
            patterns: PatternConfig::default_set(),
        }
    }
}

fn default_recency_threshold_secs() -> i64 {
    600
}

fn default_concurrency() -> usize {
    1
}

/// Outbound alert settings.
#[derive(Deserialize)]
pub struct Webhook {
    /// Full webhook URL, including the trigger key.
    pub url: String,
}

/// Declarative form of one alert pattern, as written in the config file.
///
/// Compiled into a predicate by the matcher at startup.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PatternConfig {
    /// `- contains: "added a video"`: case-sensitive substring.
    Contains(String),
    /// `- sequence: ["endorsed", "(transcriber)"]`: first substring followed
    /// later by the second within the same text.
    Sequence(String, String),
    /// `- regex: "declined .* task"`: full regular expression.
    Regex(String),
}

impl PatternConfig {
    /// The built-in alert pattern set, used when the config names none.
    pub fn default_set() -> Vec<PatternConfig> {
        vec![
            PatternConfig::Contains("added a video".to_string()),
            PatternConfig::Contains("unassigned".to_string()),
            PatternConfig::Sequence("endorsed".to_string(), "(transcriber)".to_string()),
        ]
    }
}

impl Config {
    /// Loads configuration from a YAML file, with `TEAMWATCH_`-prefixed
    /// environment variables taking precedence over file values.
    pub fn load(path: &str) -> Result<Config, figment::Error> {
        let mut config: Config = Figment::new()
            .merge(Yaml::file(path))
            .merge(Env::prefixed("TEAMWATCH_").split("__"))
            .extract()?;

        // Normalize the base URL so URL building can always append paths.
        while config.site.base_url.ends_with('/') {
            config.site.base_url.pop();
        }

        Ok(config)
    }
}
