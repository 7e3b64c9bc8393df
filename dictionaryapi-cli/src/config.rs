use std::path::Path;
use std::time::Duration;

use dictionaryapi::Reference;
use figment::Figment;
use figment::providers::{Env, Format, Toml};
use serde::{Deserialize, Serialize};

/// The config file that is read when no other path is given.
pub const DEFAULT_PATH: &str = "dictionaryapi.toml";
/// The prefix of environment variables that override the config file.
pub const ENV_PREFIX: &str = "DICTIONARYAPI_";

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// API keys for the references
    pub keys: Keys,
    /// HTTP client configuration
    pub http: HttpConfig,
}

/// The dictionaryapi.com API keys, one per reference.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Keys {
    pub collegiate: Option<String>,
    pub learners: Option<String>,
    pub thesaurus: Option<String>,
}

impl Keys {
    /// Returns the key for `reference`, if one is configured.
    #[must_use]
    pub fn get(&self, reference: Reference) -> Option<&str> {
        match reference {
            Reference::Collegiate => self.collegiate.as_deref(),
            Reference::Learners => self.learners.as_deref(),
            Reference::Thesaurus => self.thesaurus.as_deref(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct HttpConfig {
    /// Maximum duration of a single request
    #[serde(default = "default_http_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: default_http_timeout(),
        }
    }
}

#[must_use]
pub const fn default_http_timeout() -> Duration {
    dictionaryapi::client::DEFAULT_TIMEOUT
}

/// Loads the config file at `path` and merges the `DICTIONARYAPI_` environment variables on top.
///
/// A missing file is the same as an empty one. Nested keys are separated by `__` in variable
/// names, e.g. `DICTIONARYAPI_KEYS__COLLEGIATE`.
pub fn load(path: &Path) -> Result<Config, figment::Error> {
    Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
}
