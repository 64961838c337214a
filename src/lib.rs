//! A client for the Dwolla OAuth REST API
//!
//! Build a [`Client`] from a [`Config`], fetch the authenticated [`User`]
//! with [`User::me`], and use it to query balances, funding sources and
//! contacts, or to send and request money.
//!
//! ```no_run
//! # async fn run() -> dwolla::Result<()> {
//! use dwolla::{Client, Config, PartyType, User};
//! use rust_decimal::Decimal;
//!
//! let client = Client::new(Config::default())?;
//! let me = User::me("OAUTH_TOKEN").fetch(&client).await?;
//!
//! let balance = me.balance(&client).await?;
//! println!("{} has {}", me.name().unwrap_or_default(), balance);
//!
//! let id = me
//!     .send_money_to(
//!         &client,
//!         "friend@example.com",
//!         Decimal::from(10),
//!         "1234",
//!         PartyType::Email,
//!         "lunch",
//!         None,
//!     )
//!     .await?;
//! println!("sent, transaction {}", id);
//! # Ok(())
//! # }
//! ```

#![deny(
    clippy::all,
    missing_debug_implementations,
    missing_copy_implementations,
    missing_docs
)]
#![warn(clippy::pedantic)]

mod client;
pub use client::Client;
mod config;
pub use config::Config;
mod contacts;
pub use contacts::ContactsQuery;
mod error;
pub use error::{Error, Result};
mod funding_source;
pub use funding_source::FundingSource;
pub mod transaction;
#[doc(inline)]
pub use transaction::{
    Kind, Party, PartyType, Transaction, TransactionFactory, TransactionId, TransactionParams,
};
mod user;
pub use user::User;
