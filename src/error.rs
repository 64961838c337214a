use reqwest::StatusCode;

/// Convenience alias for results returned by this crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by the Dwolla client
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The API rejected the request. The message is the one sent by the
    /// server, verbatim.
    #[error("{0}")]
    Request(String),

    /// The request could not be sent, or no response was received.
    ///
    /// The request URL is stripped, since it carries the OAuth token.
    #[error("transport error")]
    Transport(#[source] reqwest::Error),

    /// The configured base URL cannot be used to build resource URLs
    #[error("invalid base URL")]
    Url(#[from] url::ParseError),

    /// The server answered with an unsuccessful status and no API envelope
    #[error("unexpected HTTP status: {0}")]
    Status(StatusCode),

    /// The response body was not valid JSON, or did not match the expected
    /// schema
    #[error("failed to decode response")]
    Decode(#[from] serde_json::Error),

    /// The parameters passed to [`Transaction::new`](crate::Transaction::new)
    /// are inconsistent with the transaction kind
    #[error("invalid transaction: {0}")]
    InvalidTransaction(&'static str),

    /// The operation needs a user carrying an OAuth token
    #[error("user has no OAuth token")]
    Unauthenticated,

    /// The configuration file could not be loaded or stored
    #[error("failed to load or store config")]
    Config(#[from] confy::ConfyError),
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e.without_url())
    }
}
