use std::fmt;

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{instrument, Level};

use crate::{
    contacts::Contact,
    transaction::{Kind, Party, PartyType, TransactionId, TransactionParams},
    Client, ContactsQuery, Error, FundingSource, Result,
};

/// A Dwolla account.
///
/// A [`User`] carrying an OAuth token is the authenticated principal, and can
/// be used to query the account and move money. Without a token it is only a
/// reference to another account, such as a contact or the counterparty of a
/// transaction.
#[derive(Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct User {
    pub(crate) id: Option<String>,
    pub(crate) name: Option<String>,
    pub(crate) latitude: Option<f64>,
    pub(crate) longitude: Option<f64>,
    pub(crate) city: Option<String>,
    pub(crate) state: Option<String>,
    #[serde(rename = "Type")]
    pub(crate) account_type: Option<String>,
    #[serde(skip)]
    pub(crate) oauth_token: Option<String>,
    #[serde(skip)]
    pub(crate) image: Option<String>,
    #[serde(skip)]
    pub(crate) contact_type: Option<String>,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("account_type", &self.account_type)
            .field("contact_type", &self.contact_type)
            .field("authenticated", &self.oauth_token.is_some())
            .finish_non_exhaustive()
    }
}

impl User {
    /// An unfetched stub for the user who owns `oauth_token`.
    ///
    /// Call [`User::fetch`] to populate the profile.
    #[must_use]
    pub fn me(oauth_token: impl Into<String>) -> Self {
        Self {
            oauth_token: Some(oauth_token.into()),
            ..Self::default()
        }
    }

    /// A reference to the account with the given id
    #[must_use]
    pub fn reference(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// Attach an OAuth token, making this user able to authenticate requests
    #[must_use]
    pub fn with_oauth_token(self, oauth_token: impl Into<String>) -> Self {
        Self {
            oauth_token: Some(oauth_token.into()),
            ..self
        }
    }

    /// The Dwolla account id, for example "812-111-1111"
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// The account holder's name
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The OAuth token, present only for an authenticated user
    #[must_use]
    pub fn oauth_token(&self) -> Option<&str> {
        self.oauth_token.as_deref()
    }

    /// Latitude of the account holder's location
    #[must_use]
    pub fn latitude(&self) -> Option<f64> {
        self.latitude
    }

    /// Longitude of the account holder's location
    #[must_use]
    pub fn longitude(&self) -> Option<f64> {
        self.longitude
    }

    /// The city on record
    #[must_use]
    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    /// The state on record, for example "IA"
    #[must_use]
    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    /// The kind of account, for example "Personal"
    #[must_use]
    pub fn account_type(&self) -> Option<&str> {
        self.account_type.as_deref()
    }

    /// The avatar URL. Only set on contacts.
    #[must_use]
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    /// Where a contact comes from, for example "Facebook" or "Dwolla". Only
    /// set on contacts.
    #[must_use]
    pub fn contact_type(&self) -> Option<&str> {
        self.contact_type.as_deref()
    }

    fn token(&self) -> Result<&str> {
        self.oauth_token().ok_or(Error::Unauthenticated)
    }

    /// Retrieve the full account information of the user owning this user's
    /// OAuth token.
    ///
    /// The returned [`User`] keeps the token.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::Request`] if the API rejects the token, and with
    /// [`Error::Unauthenticated`] if this user has no token.
    #[instrument(skip_all)]
    pub async fn fetch(&self, client: &Client) -> Result<Self> {
        let token = self.token()?;
        let user: Self = client.get(&["users"], token, &[]).await?;

        tracing::event!(Level::DEBUG, id = ?user.id, "fetched account information");

        Ok(user.with_oauth_token(token))
    }

    /// Retrieve the public information of another account
    ///
    /// # Errors
    ///
    /// Fails with [`Error::Request`] if the API rejects the lookup, and with
    /// [`Error::Unauthenticated`] if this user has no token.
    #[instrument(skip(self, client))]
    pub async fn lookup(&self, client: &Client, id: &str) -> Result<Self> {
        client.get(&["users", id], self.token()?, &[]).await
    }

    /// Retrieve the account balance
    ///
    /// # Errors
    ///
    /// Fails with [`Error::Request`] if the API rejects the request, and with
    /// [`Error::Unauthenticated`] if this user has no token.
    #[instrument(skip_all)]
    pub async fn balance(&self, client: &Client) -> Result<Decimal> {
        client.get(&["balance"], self.token()?, &[]).await
    }

    /// List the funding sources linked to the account, in the order returned
    /// by the API
    ///
    /// # Errors
    ///
    /// Fails with [`Error::Request`] if the API rejects the request, and with
    /// [`Error::Unauthenticated`] if this user has no token.
    #[instrument(skip_all)]
    pub async fn funding_sources(&self, client: &Client) -> Result<Vec<FundingSource>> {
        let sources: Vec<FundingSource> =
            client.get(&["fundingsources"], self.token()?, &[]).await?;

        tracing::event!(Level::DEBUG, count = sources.len(), "listed funding sources");

        Ok(sources)
    }

    /// Retrieve a single funding source by id
    ///
    /// # Errors
    ///
    /// Fails with [`Error::Request`] if the API rejects the request, and with
    /// [`Error::Unauthenticated`] if this user has no token.
    #[instrument(skip(self, client))]
    pub async fn funding_source(&self, client: &Client, id: &str) -> Result<FundingSource> {
        client.get(&["fundingsources", id], self.token()?, &[]).await
    }

    /// List the user's contacts, optionally filtered.
    ///
    /// Each contact is a reference [`User`] carrying an
    /// [`image`](User::image) and a [`contact_type`](User::contact_type)
    /// rather than a full profile.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::Request`] if the API rejects the request, and with
    /// [`Error::Unauthenticated`] if this user has no token.
    #[instrument(skip(self, client))]
    pub async fn contacts(&self, client: &Client, query: &ContactsQuery) -> Result<Vec<Self>> {
        let contacts: Vec<Contact> = client
            .get(&["contacts"], self.token()?, &query.params())
            .await?;

        Ok(contacts.into_iter().map(Self::from).collect())
    }

    /// Send money to another account or to an email address.
    ///
    /// Returns the id of the resulting transaction.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::Request`] if the API rejects the transaction (for
    /// example an invalid PIN or insufficient funds), and with
    /// [`Error::Unauthenticated`] if this user has no token.
    #[allow(clippy::too_many_arguments)]
    #[instrument(skip(self, client, destination, pin))]
    pub async fn send_money_to(
        &self,
        client: &Client,
        destination: impl Into<Party>,
        amount: Decimal,
        pin: &str,
        destination_type: PartyType,
        description: &str,
        funds_source: Option<&str>,
    ) -> Result<TransactionId> {
        let params = TransactionParams {
            origin: self.clone(),
            kind: Kind::Send,
            destination: Some(destination.into()),
            destination_type: Some(destination_type),
            source: None,
            source_type: None,
            amount,
            pin: pin.to_string(),
            description: description.to_string(),
            funds_source: funds_source.map(ToString::to_string),
        };

        client.transaction_factory().submit(client, params).await
    }

    /// Request money from another account or from an email address.
    ///
    /// Returns the id of the resulting transaction.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::Request`] if the API rejects the request, and with
    /// [`Error::Unauthenticated`] if this user has no token.
    #[instrument(skip(self, client, source, pin))]
    pub async fn request_money_from(
        &self,
        client: &Client,
        source: impl Into<Party>,
        amount: Decimal,
        pin: &str,
        source_type: PartyType,
        description: &str,
    ) -> Result<TransactionId> {
        let params = TransactionParams {
            origin: self.clone(),
            kind: Kind::Request,
            destination: None,
            destination_type: None,
            source: Some(source.into()),
            source_type: Some(source_type),
            amount,
            pin: pin.to_string(),
            description: description.to_string(),
            funds_source: None,
        };

        client.transaction_factory().submit(client, params).await
    }
}
