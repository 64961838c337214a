use std::time::Duration;

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::Result;

static CRATE_NAME: &str = std::env!("CARGO_PKG_NAME");

/// The production endpoint of the Dwolla OAuth REST API
pub const DEFAULT_BASE_URL: &str = "https://www.dwolla.com/oauth/rest";

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_USER_AGENT: &str = "Dwolla Rust Wrapper";

/// Settings used to build a [`Client`](crate::Client)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The URL every resource path is appended to
    pub base_url: String,

    /// How long to wait for a complete response before giving up
    pub timeout_secs: u64,

    /// The value of the `User-Agent` header
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Config {
    /// A default configuration pointing at a different base URL
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// The request timeout
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Load the configuration from the platform config directory.
    ///
    /// A default configuration is written out if none exists yet.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`](crate::Error::Config) if the file cannot be
    /// read, written, or parsed.
    pub fn load() -> Result<Self> {
        Ok(confy::load(CRATE_NAME, "config")?)
    }

    /// Store the configuration in the platform config directory
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`](crate::Error::Config) if the file cannot be
    /// written.
    pub fn store(&self) -> Result<()> {
        Ok(confy::store(CRATE_NAME, "config", self)?)
    }

    /// The URL of a resource, with each segment appended to the base URL
    /// path and percent-encoded
    pub(crate) fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)?;
        url.path_segments_mut()
            .map_err(|()| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}
