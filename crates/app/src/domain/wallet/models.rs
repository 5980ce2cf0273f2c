//! Wallet Models

use std::collections::BTreeMap;

use jiff::{Timestamp, civil::Date, tz::TimeZone};
use serde::{Deserialize, Serialize};

use crate::{domain::users::models::UserUuid, uuids::TypedUuid};

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Most a user may top up per calendar day, in minor currency units.
pub const DEFAULT_DAILY_TOP_UP_CAP: u64 = 1000;

pub const TOP_UP_TITLE: &str = "Account top-up";

/// Account UUID
pub type AccountUuid = TypedUuid<Account>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    Card,
    Savings,
}

/// Account Model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    #[serde(rename = "id")]
    pub uuid: AccountUuid,
    #[serde(rename = "type")]
    pub kind: AccountKind,
    pub balance: u64,
}

/// Ledger entry. Never changed once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub amount: i64,
    pub title: String,
    pub time: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Wallet {
    pub accounts: Vec<Account>,
}

/// 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: u32,
    pub page_size: u32,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of transactions grouped by calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionsPage {
    pub current_page: u32,
    pub total_pages: u32,
    pub data: BTreeMap<Date, Vec<Transaction>>,
}

/// Peer transfer request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    pub from_account: AccountUuid,
    pub to_phone: String,
    pub amount: u64,
}

/// Complete wallet state, keyed by user.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WalletSnapshot {
    #[serde(default)]
    pub accounts: BTreeMap<UserUuid, BTreeMap<AccountUuid, Account>>,
    #[serde(default)]
    pub transactions: BTreeMap<UserUuid, Vec<Transaction>>,
    #[serde(default, rename = "daily_topups")]
    pub daily_top_ups: BTreeMap<UserUuid, BTreeMap<Date, u64>>,
    #[serde(default)]
    pub user_phones: BTreeMap<UserUuid, String>,
}

/// Wallet limits and calendar settings.
#[derive(Debug, Clone)]
pub struct WalletConfig {
    pub daily_top_up_cap: u64,

    /// Zone whose calendar days bound the top-up cap and group transactions.
    pub time_zone: TimeZone,
}

impl WalletConfig {
    pub(crate) fn day_of(&self, time: Timestamp) -> Date {
        time.to_zoned(self.time_zone.clone()).date()
    }
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            daily_top_up_cap: DEFAULT_DAILY_TOP_UP_CAP,
            time_zone: TimeZone::UTC,
        }
    }
}
