//! Sending and requesting money

use std::fmt;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{instrument, Level};

use crate::{Client, Error, Result, User};

/// The server-assigned identifier of a transaction
pub type TransactionId = u64;

/// Whether money moves away from or towards the origin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// Send money from the origin to a destination
    Send,

    /// Ask a source to pay the origin
    Request,
}

impl Kind {
    fn path(self) -> &'static str {
        match self {
            Self::Send => "send",
            Self::Request => "request",
        }
    }
}

/// How the counterparty of a transaction is identified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PartyType {
    /// A Dwolla account id
    Dwolla,

    /// An email address
    Email,
}

/// The counterparty of a transaction
#[derive(Debug, Clone, PartialEq)]
pub enum Party {
    /// A known Dwolla account
    User(User),

    /// A raw account id or email address
    Id(String),
}

impl Party {
    /// The identifier sent to the API
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::User(user) => user.id(),
            Self::Id(id) => Some(id),
        }
    }
}

impl From<User> for Party {
    fn from(user: User) -> Self {
        Self::User(user)
    }
}

impl From<&User> for Party {
    fn from(user: &User) -> Self {
        Self::User(user.clone())
    }
}

impl From<String> for Party {
    fn from(id: String) -> Self {
        Self::Id(id)
    }
}

impl From<&str> for Party {
    fn from(id: &str) -> Self {
        Self::Id(id.to_string())
    }
}

/// The unvalidated arguments of a [`Transaction`]
#[derive(Clone, PartialEq)]
pub struct TransactionParams {
    /// The authenticated user initiating the transaction
    pub origin: User,

    /// Send or request
    pub kind: Kind,

    /// Who receives the money. Only for [`Kind::Send`].
    pub destination: Option<Party>,

    /// How `destination` is identified. Only for [`Kind::Send`].
    pub destination_type: Option<PartyType>,

    /// Who is asked for money. Only for [`Kind::Request`].
    pub source: Option<Party>,

    /// How `source` is identified. Only for [`Kind::Request`].
    pub source_type: Option<PartyType>,

    /// The amount of money to move
    pub amount: Decimal,

    /// The origin's PIN
    pub pin: String,

    /// Free text attached to the transaction
    pub description: String,

    /// The id of the [`FundingSource`](crate::FundingSource) to pay from.
    /// Only for [`Kind::Send`].
    pub funds_source: Option<String>,
}

impl fmt::Debug for TransactionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransactionParams")
            .field("origin", &self.origin)
            .field("kind", &self.kind)
            .field("destination", &self.destination)
            .field("destination_type", &self.destination_type)
            .field("source", &self.source)
            .field("source_type", &self.source_type)
            .field("amount", &self.amount)
            .field("description", &self.description)
            .field("funds_source", &self.funds_source)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Counterparty {
    Destination {
        party: Party,
        party_type: PartyType,
        funds_source: Option<String>,
    },
    Source {
        party: Party,
        party_type: PartyType,
    },
}

/// A validated money transfer or money request, ready to be submitted
#[derive(Clone, PartialEq)]
pub struct Transaction {
    origin: User,
    counterparty: Counterparty,
    amount: Decimal,
    pin: String,
    description: String,
}

impl fmt::Debug for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transaction")
            .field("origin", &self.origin.id())
            .field("counterparty", &self.counterparty)
            .field("amount", &self.amount)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Payload<'a> {
    #[serde(rename_all = "camelCase")]
    Send {
        pin: &'a str,
        destination_id: &'a str,
        destination_type: PartyType,
        #[serde(with = "rust_decimal::serde::float")]
        amount: Decimal,
        notes: &'a str,
        #[serde(skip_serializing_if = "Option::is_none")]
        funds_source: Option<&'a str>,
    },
    #[serde(rename_all = "camelCase")]
    Request {
        pin: &'a str,
        source_id: &'a str,
        source_type: PartyType,
        #[serde(with = "rust_decimal::serde::float")]
        amount: Decimal,
        notes: &'a str,
    },
}

impl Transaction {
    /// Validate the parameters against the transaction [`Kind`].
    ///
    /// A send needs a destination and may name a funding source; a request
    /// needs a source. The other side must be left unset.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTransaction`] if the parameters do not match
    /// the kind, or if the counterparty has no identifier.
    pub fn new(params: TransactionParams) -> Result<Self> {
        let TransactionParams {
            origin,
            kind,
            destination,
            destination_type,
            source,
            source_type,
            amount,
            pin,
            description,
            funds_source,
        } = params;

        let counterparty = match kind {
            Kind::Send => {
                if source.is_some() || source_type.is_some() {
                    return Err(Error::InvalidTransaction("a send cannot have a source"));
                }
                Counterparty::Destination {
                    party: destination
                        .ok_or(Error::InvalidTransaction("a send needs a destination"))?,
                    party_type: destination_type
                        .ok_or(Error::InvalidTransaction("a send needs a destination type"))?,
                    funds_source,
                }
            }
            Kind::Request => {
                if destination.is_some() || destination_type.is_some() {
                    return Err(Error::InvalidTransaction(
                        "a request cannot have a destination",
                    ));
                }
                if funds_source.is_some() {
                    return Err(Error::InvalidTransaction(
                        "a request cannot have a funds source",
                    ));
                }
                Counterparty::Source {
                    party: source.ok_or(Error::InvalidTransaction("a request needs a source"))?,
                    party_type: source_type
                        .ok_or(Error::InvalidTransaction("a request needs a source type"))?,
                }
            }
        };

        let transaction = Self {
            origin,
            counterparty,
            amount,
            pin,
            description,
        };

        if transaction.counterparty().id().is_none() {
            return Err(Error::InvalidTransaction("the counterparty has no id"));
        }

        Ok(transaction)
    }

    /// Send or request
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self.counterparty {
            Counterparty::Destination { .. } => Kind::Send,
            Counterparty::Source { .. } => Kind::Request,
        }
    }

    /// The user initiating the transaction
    #[must_use]
    pub fn origin(&self) -> &User {
        &self.origin
    }

    /// The destination of a send, or the source of a request
    #[must_use]
    pub fn counterparty(&self) -> &Party {
        match &self.counterparty {
            Counterparty::Destination { party, .. } | Counterparty::Source { party, .. } => party,
        }
    }

    /// How the counterparty is identified
    #[must_use]
    pub fn counterparty_type(&self) -> PartyType {
        match self.counterparty {
            Counterparty::Destination { party_type, .. }
            | Counterparty::Source { party_type, .. } => party_type,
        }
    }

    /// The funding source paid from. Always `None` for a request.
    #[must_use]
    pub fn funds_source(&self) -> Option<&str> {
        match &self.counterparty {
            Counterparty::Destination { funds_source, .. } => funds_source.as_deref(),
            Counterparty::Source { .. } => None,
        }
    }

    /// The amount of money to move
    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// The free text attached to the transaction
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    fn payload(&self) -> Result<Payload<'_>> {
        let id = self
            .counterparty()
            .id()
            .ok_or(Error::InvalidTransaction("the counterparty has no id"))?;

        let payload = match &self.counterparty {
            Counterparty::Destination {
                party_type,
                funds_source,
                ..
            } => Payload::Send {
                pin: &self.pin,
                destination_id: id,
                destination_type: *party_type,
                amount: self.amount,
                notes: &self.description,
                funds_source: funds_source.as_deref(),
            },
            Counterparty::Source { party_type, .. } => Payload::Request {
                pin: &self.pin,
                source_id: id,
                source_type: *party_type,
                amount: self.amount,
                notes: &self.description,
            },
        };

        Ok(payload)
    }

    /// Submit the transaction and return its id
    ///
    /// # Errors
    ///
    /// Fails with [`Error::Request`] if the API rejects the transaction, and
    /// with [`Error::Unauthenticated`] if the origin has no OAuth token.
    #[instrument(skip(client))]
    pub async fn execute(&self, client: &Client) -> Result<TransactionId> {
        let token = self.origin.oauth_token().ok_or(Error::Unauthenticated)?;
        let payload = self.payload()?;

        let id: TransactionId = client
            .post(&["transactions", self.kind().path()], token, &payload)
            .await?;

        tracing::event!(Level::INFO, id, "transaction submitted");

        Ok(id)
    }
}

/// Turns [`TransactionParams`] into a submitted transaction.
///
/// The [`Client`] uses [`Submit`] unless another factory is injected with
/// [`Client::with_transaction_factory`].
#[async_trait]
pub trait TransactionFactory: fmt::Debug + Send + Sync {
    /// Build a transaction from `params`, submit it, and return its id.
    ///
    /// # Errors
    ///
    /// Implementations fail if the parameters are invalid or the submission
    /// is rejected.
    async fn submit(&self, client: &Client, params: TransactionParams) -> Result<TransactionId>;
}

/// The default [`TransactionFactory`]: validates the parameters with
/// [`Transaction::new`] and calls [`Transaction::execute`]
#[derive(Debug, Default, Clone, Copy)]
pub struct Submit;

#[async_trait]
impl TransactionFactory for Submit {
    async fn submit(&self, client: &Client, params: TransactionParams) -> Result<TransactionId> {
        Transaction::new(params)?.execute(client).await
    }
}
