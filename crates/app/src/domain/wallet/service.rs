//! Wallet service.

use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::{
    domain::{
        users::{UserDirectory, models::UserUuid},
        wallet::{
            errors::WalletServiceError,
            models::{
                AccountUuid, Page, TOP_UP_TITLE, Transaction, TransactionsPage, Transfer, Wallet,
                WalletConfig, WalletSnapshot,
            },
        },
    },
    snapshot::Snapshottable,
};

/// Accounts, ledgers and top-up counters for every user behind a single lock.
///
/// One lock for the whole wallet means a transfer never has to order the
/// acquisition of two users' state.
pub struct InMemoryWalletService {
    config: WalletConfig,
    users: Arc<dyn UserDirectory>,
    state: RwLock<WalletSnapshot>,
}

impl InMemoryWalletService {
    #[must_use]
    pub fn new(config: WalletConfig, users: Arc<dyn UserDirectory>) -> Self {
        Self::from_snapshot(config, users, WalletSnapshot::default())
    }

    /// Restore the wallet from a previously taken snapshot.
    #[must_use]
    pub fn from_snapshot(
        config: WalletConfig,
        users: Arc<dyn UserDirectory>,
        snapshot: WalletSnapshot,
    ) -> Self {
        Self {
            config,
            users,
            state: RwLock::new(snapshot),
        }
    }

    /// The sender's phone, from the cache or the user directory.
    async fn sender_phone(
        &self,
        state: &WalletSnapshot,
        user: UserUuid,
    ) -> Result<String, WalletServiceError> {
        if let Some(phone) = state.user_phones.get(&user) {
            return Ok(phone.clone());
        }

        self.users
            .get_profile(user)
            .await
            .map(|profile| profile.phone)
            .map_err(WalletServiceError::SenderPhone)
    }
}

fn signed(amount: u64) -> Result<i64, WalletServiceError> {
    i64::try_from(amount).map_err(|_| WalletServiceError::AmountTooLarge)
}

#[async_trait]
impl WalletService for InMemoryWalletService {
    async fn get_wallet(&self, user: UserUuid) -> Result<Wallet, WalletServiceError> {
        let state = self.state.read().await;

        let accounts = state
            .accounts
            .get(&user)
            .map(|accounts| accounts.values().cloned().collect())
            .unwrap_or_default();

        Ok(Wallet { accounts })
    }

    async fn get_transactions(
        &self,
        user: UserUuid,
        page: Page,
    ) -> Result<TransactionsPage, WalletServiceError> {
        if page.page == 0 || page.page_size == 0 {
            return Err(WalletServiceError::InvalidPage);
        }

        let state = self.state.read().await;

        let mut transactions: Vec<&Transaction> = state
            .transactions
            .get(&user)
            .map(|transactions| transactions.iter().rev().collect())
            .unwrap_or_default();

        transactions.sort_by(|a, b| b.time.cmp(&a.time));

        let total = transactions.len();
        let page_size = page.page_size as usize;
        let total_pages = u32::try_from(total.div_ceil(page_size)).unwrap_or(u32::MAX);

        let start = (page.page as usize - 1).saturating_mul(page_size);

        let mut data: BTreeMap<_, Vec<Transaction>> = BTreeMap::new();

        for transaction in transactions.into_iter().skip(start).take(page_size) {
            data.entry(self.config.day_of(transaction.time))
                .or_default()
                .push(transaction.clone());
        }

        Ok(TransactionsPage {
            current_page: page.page,
            total_pages,
            data,
        })
    }

    #[tracing::instrument(
        name = "wallet.service.top_up",
        skip_all,
        fields(user_uuid = %user, account_uuid = %account, amount = amount),
        err
    )]
    async fn top_up(
        &self,
        user: UserUuid,
        account: AccountUuid,
        amount: u64,
        point_in_time: Timestamp,
    ) -> Result<u64, WalletServiceError> {
        if amount == 0 {
            return Err(WalletServiceError::InvalidAmount);
        }

        let entry_amount = signed(amount)?;
        let today = self.config.day_of(point_in_time);
        let cap = self.config.daily_top_up_cap;

        // Check and update happen under the same guard, so concurrent top-ups
        // cannot both pass the cap check.
        let mut state = self.state.write().await;

        let topped_up = state
            .daily_top_ups
            .get(&user)
            .and_then(|days| days.get(&today))
            .copied()
            .unwrap_or(0);

        if topped_up.checked_add(amount).is_none_or(|total| total > cap) {
            warn!(topped_up, "daily top-up limit exceeded");

            return Err(WalletServiceError::DailyLimitExceeded { cap });
        }

        let balance = state
            .accounts
            .get(&user)
            .and_then(|accounts| accounts.get(&account))
            .map(|account| account.balance)
            .ok_or(WalletServiceError::AccountNotFound(account))?;

        let balance = balance
            .checked_add(amount)
            .ok_or(WalletServiceError::AmountTooLarge)?;

        if let Some(target) = state
            .accounts
            .get_mut(&user)
            .and_then(|accounts| accounts.get_mut(&account))
        {
            target.balance = balance;
        }

        *state
            .daily_top_ups
            .entry(user)
            .or_default()
            .entry(today)
            .or_default() += amount;

        state.transactions.entry(user).or_default().push(Transaction {
            amount: entry_amount,
            title: TOP_UP_TITLE.to_string(),
            time: point_in_time,
            icon: None,
        });

        info!(balance, "topped up account");

        Ok(balance)
    }

    #[tracing::instrument(
        name = "wallet.service.transfer",
        skip_all,
        fields(
            user_uuid = %user,
            account_uuid = %transfer.from_account,
            amount = transfer.amount
        ),
        err
    )]
    async fn transfer(
        &self,
        user: UserUuid,
        transfer: Transfer,
        point_in_time: Timestamp,
    ) -> Result<u64, WalletServiceError> {
        if transfer.amount == 0 {
            return Err(WalletServiceError::InvalidAmount);
        }

        let entry_amount = signed(transfer.amount)?;

        // Every check below precedes the first mutation; nothing is rolled back.
        let mut state = self.state.write().await;

        let sender_balance = state
            .accounts
            .get(&user)
            .and_then(|accounts| accounts.get(&transfer.from_account))
            .map(|account| account.balance)
            .ok_or(WalletServiceError::AccountNotFound(transfer.from_account))?;

        if sender_balance < transfer.amount {
            warn!(sender_balance, "insufficient funds for transfer");

            return Err(WalletServiceError::InsufficientFunds);
        }

        let recipient = self
            .users
            .find_user_by_phone(&transfer.to_phone)
            .await
            .ok_or_else(|| WalletServiceError::RecipientNotFound(transfer.to_phone.clone()))?;

        if recipient == user {
            return Err(WalletServiceError::SelfTransfer);
        }

        // Lowest account id wins when the recipient has several.
        let (recipient_account, recipient_balance) = state
            .accounts
            .get(&recipient)
            .and_then(|accounts| accounts.values().next())
            .map(|account| (account.uuid, account.balance))
            .ok_or(WalletServiceError::RecipientHasNoAccounts)?;

        let recipient_balance = recipient_balance
            .checked_add(transfer.amount)
            .ok_or(WalletServiceError::AmountTooLarge)?;

        let sender_phone = self.sender_phone(&state, user).await?;

        let sender_balance = sender_balance - transfer.amount;

        if let Some(account) = state
            .accounts
            .get_mut(&user)
            .and_then(|accounts| accounts.get_mut(&transfer.from_account))
        {
            account.balance = sender_balance;
        }

        if let Some(account) = state
            .accounts
            .get_mut(&recipient)
            .and_then(|accounts| accounts.get_mut(&recipient_account))
        {
            account.balance = recipient_balance;
        }

        state.transactions.entry(user).or_default().push(Transaction {
            amount: -entry_amount,
            title: format!("Transfer to {}", transfer.to_phone),
            time: point_in_time,
            icon: None,
        });

        state
            .transactions
            .entry(recipient)
            .or_default()
            .push(Transaction {
                amount: entry_amount,
                title: format!("Transfer from {sender_phone}"),
                time: point_in_time,
                icon: None,
            });

        state.user_phones.insert(user, sender_phone);

        info!(
            recipient_uuid = %recipient,
            recipient_account_uuid = %recipient_account,
            sender_balance,
            "transferred funds"
        );

        Ok(sender_balance)
    }
}

#[async_trait]
impl Snapshottable for InMemoryWalletService {
    const NAME: &'static str = "wallet_data";

    type Snapshot = WalletSnapshot;

    async fn snapshot(&self) -> WalletSnapshot {
        self.state.read().await.clone()
    }
}

#[automock]
#[async_trait]
pub trait WalletService: Send + Sync {
    /// List the user's accounts.
    async fn get_wallet(&self, user: UserUuid) -> Result<Wallet, WalletServiceError>;

    /// Page through the user's transactions, newest first, grouped by day.
    async fn get_transactions(
        &self,
        user: UserUuid,
        page: Page,
    ) -> Result<TransactionsPage, WalletServiceError>;

    /// Credit one of the user's accounts, subject to the daily cap. Returns
    /// the new balance.
    async fn top_up(
        &self,
        user: UserUuid,
        account: AccountUuid,
        amount: u64,
        point_in_time: Timestamp,
    ) -> Result<u64, WalletServiceError>;

    /// Move funds to the user owning `transfer.to_phone`. Returns the
    /// sender's new balance.
    async fn transfer(
        &self,
        user: UserUuid,
        transfer: Transfer,
        point_in_time: Timestamp,
    ) -> Result<u64, WalletServiceError>;
}
