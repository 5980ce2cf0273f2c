//! CLI configuration module

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use eats_app::{
    context::ServicesConfig,
    domain::{
        carts::models::{CartsConfig, DEFAULT_DELIVERY_MINUTES, DEFAULT_DELIVERY_PRICE},
        orders::models::OrdersConfig,
        users::models::UserUuid,
        wallet::models::{DEFAULT_DAILY_TOP_UP_CAP, WalletConfig},
    },
};
use jiff::{SignedDuration, tz::TimeZone};

/// Log output format.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub(crate) enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub(crate) struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Data directory, caller identity and business limits.
#[derive(Debug, Args)]
pub(crate) struct StoreConfig {
    /// Directory holding seed documents and snapshots
    #[arg(long, env = "EATS_DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// Authenticated user the command runs as
    #[arg(short, long, env = "EATS_USER")]
    pub user: UserUuid,

    /// Maximum total top-up per user per calendar day
    #[arg(long, env = "EATS_DAILY_TOP_UP_CAP", default_value_t = DEFAULT_DAILY_TOP_UP_CAP)]
    pub daily_top_up_cap: u64,

    /// Minutes between placing an order and its completion
    #[arg(long, env = "EATS_DELIVERY_MINUTES", default_value_t = DEFAULT_DELIVERY_MINUTES)]
    pub delivery_minutes: u32,

    /// Flat delivery charge
    #[arg(long, env = "EATS_DELIVERY_PRICE", default_value_t = DEFAULT_DELIVERY_PRICE)]
    pub delivery_price: u64,

    /// IANA time zone for calendar days and delivery dates; system zone when omitted
    #[arg(long, env = "EATS_TIME_ZONE")]
    pub time_zone: Option<String>,
}

impl StoreConfig {
    /// Resolve the per-service settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the time zone is unknown.
    pub fn services(&self) -> Result<ServicesConfig, jiff::Error> {
        let time_zone = match &self.time_zone {
            Some(name) => TimeZone::get(name)?,
            None => TimeZone::system(),
        };

        Ok(ServicesConfig {
            carts: CartsConfig {
                delivery_price: self.delivery_price,
                delivery_minutes: self.delivery_minutes,
            },
            orders: OrdersConfig {
                delivery_duration: SignedDuration::from_mins(i64::from(self.delivery_minutes)),
                time_zone: time_zone.clone(),
            },
            wallet: WalletConfig {
                daily_top_up_cap: self.daily_top_up_cap,
                time_zone,
            },
        })
    }
}
