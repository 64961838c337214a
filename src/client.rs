use std::sync::Arc;

use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE},
    RequestBuilder,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{instrument, Level};

use crate::{
    transaction::{Submit, TransactionFactory},
    Config, Error, Result,
};

/// The wrapper around every API response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Envelope {
    success: bool,

    #[serde(default)]
    message: Option<String>,

    #[serde(default)]
    response: serde_json::Value,
}

impl Envelope {
    fn into_payload<T: DeserializeOwned>(self) -> Result<T> {
        if self.success {
            Ok(serde_json::from_value(self.response)?)
        } else {
            let message = self.message.unwrap_or_default();
            tracing::event!(Level::WARN, %message, "request rejected by the API");
            Err(Error::Request(message))
        }
    }
}

/// A client to the Dwolla API.
///
/// The client is cheap to clone; clones share the same connection pool.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    config: Config,
    transactions: Arc<dyn TransactionFactory>,
}

impl Client {
    /// Create a new client from the given [`Config`]
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] if the underlying HTTP client cannot be
    /// built, for example because the user agent is not a valid header value.
    pub fn new(config: Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            http,
            config,
            transactions: Arc::new(Submit),
        })
    }

    /// Replace the [`TransactionFactory`] used by
    /// [`User::send_money_to`](crate::User::send_money_to) and
    /// [`User::request_money_from`](crate::User::request_money_from)
    #[must_use]
    pub fn with_transaction_factory(mut self, factory: Arc<dyn TransactionFactory>) -> Self {
        self.transactions = factory;
        self
    }

    /// The configuration this client was built from
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub(crate) fn transaction_factory(&self) -> &dyn TransactionFactory {
        self.transactions.as_ref()
    }

    /// Issue an authenticated `GET` and unwrap the response envelope.
    ///
    /// `query` is sent ahead of the `oauth_token` parameter, in order.
    #[instrument(skip(self, token))]
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &[&str],
        token: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let request = self
            .http
            .get(self.config.url(path)?)
            .query(query)
            .query(&[("oauth_token", token)]);

        Self::send(request).await
    }

    /// Issue an authenticated `POST` with a JSON body and unwrap the response
    /// envelope
    #[instrument(skip(self, token, body))]
    pub(crate) async fn post<B, T>(&self, path: &[&str], token: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self
            .http
            .post(self.config.url(path)?)
            .query(&[("oauth_token", token)])
            .json(body);

        Self::send(request).await
    }

    async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        tracing::event!(Level::DEBUG, %status, "received response");

        match serde_json::from_str::<Envelope>(&body) {
            Ok(envelope) => envelope.into_payload(),
            Err(_) if !status.is_success() => Err(Error::Status(status)),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use test_case::test_case;

    use super::*;

    fn envelope(raw: &str) -> Envelope {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn success_unwraps_response() {
        let raw = r#"{"Success": true, "Message": "Success", "Response": 55.76}"#;

        let balance: Decimal = envelope(raw).into_payload().unwrap();

        assert_eq!(balance, Decimal::new(5576, 2));
    }

    #[test]
    fn failure_carries_server_message() {
        let raw = r#"{
            "Success": false,
            "Message": "Token does not have access to requested resource.",
            "Response": null
        }"#;

        let error = envelope(raw).into_payload::<Decimal>().unwrap_err();

        assert!(matches!(&error, Error::Request(_)));
        assert_eq!(
            error.to_string(),
            "Token does not have access to requested resource."
        );
    }

    #[test_case(r#"{"Success": false}"# => ""; "no message")]
    #[test_case(r#"{"Success": false, "Message": "Invalid PIN."}"# => "Invalid PIN."; "no response")]
    fn failure_message(raw: &str) -> String {
        match envelope(raw).into_payload::<u64>() {
            Err(Error::Request(message)) => message,
            other => panic!("expected a request error, got {:?}", other),
        }
    }

    #[test]
    fn mismatched_payload_is_a_decode_error() {
        let raw = r#"{"Success": true, "Message": "Success", "Response": "not a number"}"#;

        let error = envelope(raw).into_payload::<u64>().unwrap_err();

        assert!(matches!(error, Error::Decode(_)));
    }
}
