use clap::{Args, Subcommand};
use eats_app::{
    context::AppContext,
    domain::{
        users::models::UserUuid,
        wallet::models::{AccountUuid, DEFAULT_PAGE_SIZE, Page, Transfer},
    },
};
use jiff::Timestamp;
use serde_json::json;

use super::{Outcome, failure};

#[derive(Debug, Args)]
pub(crate) struct WalletCommand {
    #[command(subcommand)]
    command: WalletSubcommand,
}

#[derive(Debug, Subcommand)]
enum WalletSubcommand {
    /// List accounts
    Show,

    /// Page through transactions grouped by day
    Transactions(TransactionsArgs),

    /// Credit an account, within the daily cap
    TopUp(TopUpArgs),

    /// Send funds to another user by phone number
    Transfer(TransferArgs),
}

#[derive(Debug, Args)]
struct TransactionsArgs {
    /// 1-based page number
    #[arg(long, default_value_t = 1)]
    page: u32,

    /// Entries per page
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: u32,
}

#[derive(Debug, Args)]
struct TopUpArgs {
    /// Account UUID
    #[arg(long)]
    account: AccountUuid,

    /// Amount in minor currency units
    #[arg(long)]
    amount: u64,
}

#[derive(Debug, Args)]
struct TransferArgs {
    /// Sender account UUID
    #[arg(long)]
    from: AccountUuid,

    /// Recipient phone number
    #[arg(long)]
    to_phone: String,

    /// Amount in minor currency units
    #[arg(long)]
    amount: u64,
}

pub(crate) async fn run(
    command: WalletCommand,
    user: UserUuid,
    ctx: &AppContext,
) -> Result<Outcome, String> {
    match command.command {
        WalletSubcommand::Show => {
            Outcome::read(&ctx.wallet.get_wallet(user).await.map_err(failure)?)
        }
        WalletSubcommand::Transactions(args) => {
            let page = ctx
                .wallet
                .get_transactions(
                    user,
                    Page {
                        page: args.page,
                        page_size: args.page_size,
                    },
                )
                .await
                .map_err(failure)?;

            Outcome::read(&page)
        }
        WalletSubcommand::TopUp(args) => {
            let balance = ctx
                .wallet
                .top_up(user, args.account, args.amount, Timestamp::now())
                .await
                .map_err(failure)?;

            Outcome::write(&json!({ "id": args.account, "balance": balance }))
        }
        WalletSubcommand::Transfer(args) => {
            let balance = ctx
                .wallet
                .transfer(
                    user,
                    Transfer {
                        from_account: args.from,
                        to_phone: args.to_phone,
                        amount: args.amount,
                    },
                    Timestamp::now(),
                )
                .await
                .map_err(failure)?;

            Outcome::write(&json!({ "id": args.from, "balance": balance }))
        }
    }
}
