use std::{error::Error, fmt::Display};

use clap::{Parser, Subcommand};
use eats_app::{
    context::AppContext,
    domain::users::models::UserUuid,
    errors::{Classify, ErrorBody},
};
use serde::Serialize;
use serde_json::Value;

use crate::config::{LoggingConfig, StoreConfig};

mod cart;
mod orders;
mod wallet;

#[derive(Debug, Parser)]
#[command(name = "eats-app", about = "Eats transactional core CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub logging: LoggingConfig,

    #[command(flatten)]
    pub store: StoreConfig,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Load configuration from `.env`, the environment and arguments.
    pub(crate) fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}

#[derive(Debug, Subcommand)]
pub(crate) enum Commands {
    /// Inspect and edit the cart
    Cart(cart::CartCommand),

    /// List and place orders
    Orders(orders::OrdersCommand),

    /// Accounts, top-ups and transfers
    Wallet(wallet::WalletCommand),
}

impl Commands {
    pub(crate) async fn run(self, user: UserUuid, ctx: &AppContext) -> Result<Outcome, String> {
        match self {
            Self::Cart(command) => cart::run(command, user, ctx).await,
            Self::Orders(command) => orders::run(command, user, ctx).await,
            Self::Wallet(command) => wallet::run(command, user, ctx).await,
        }
    }
}

/// Result of one command: what to print and whether state may have changed.
#[derive(Debug)]
pub(crate) struct Outcome {
    pub output: Value,
    pub mutated: bool,
}

impl Outcome {
    fn read<T: Serialize>(value: &T) -> Result<Self, String> {
        Self::new(value, false)
    }

    fn write<T: Serialize>(value: &T) -> Result<Self, String> {
        Self::new(value, true)
    }

    fn new<T: Serialize>(value: &T, mutated: bool) -> Result<Self, String> {
        let output = serde_json::to_value(value)
            .map_err(|error| format!("failed to encode output: {error}"))?;

        Ok(Self { output, mutated })
    }
}

/// Render a service failure as `<kind>: <message>`.
fn failure<E: Classify + Display>(error: E) -> String {
    let body = ErrorBody::from_error(&error);

    format!("{}: {}", body.kind, body.message)
}

/// Render an error followed by its chain of sources.
pub(crate) fn describe(error: &dyn Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();

    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }

    message
}
