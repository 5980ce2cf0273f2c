use clap::{Args, Subcommand, ValueEnum};
use eats_app::{
    context::AppContext,
    domain::{
        addresses::models::AddressUuid,
        orders::models::{NewOrder, PaymentMethod},
        users::models::UserUuid,
    },
};
use jiff::Timestamp;

use super::{Outcome, failure};

#[derive(Debug, Args)]
pub(crate) struct OrdersCommand {
    #[command(subcommand)]
    command: OrdersSubcommand,
}

#[derive(Debug, Subcommand)]
enum OrdersSubcommand {
    /// List orders, newest first
    List,

    /// Turn the cart into an order
    Place(PlaceOrderArgs),
}

#[derive(Debug, Args)]
struct PlaceOrderArgs {
    /// UUID of one of the user's saved addresses
    #[arg(long)]
    address: AddressUuid,

    /// Payment method
    #[arg(long, value_enum, default_value_t = PaymentArg::Card)]
    payment: PaymentArg,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PaymentArg {
    Card,
    Cash,
    Wallet,
}

impl From<PaymentArg> for PaymentMethod {
    fn from(value: PaymentArg) -> Self {
        match value {
            PaymentArg::Card => Self::Card,
            PaymentArg::Cash => Self::Cash,
            PaymentArg::Wallet => Self::Wallet,
        }
    }
}

pub(crate) async fn run(
    command: OrdersCommand,
    user: UserUuid,
    ctx: &AppContext,
) -> Result<Outcome, String> {
    let now = Timestamp::now();

    match command.command {
        // Listing may complete orders, so the result is persisted.
        OrdersSubcommand::List => {
            Outcome::write(&ctx.orders.get_orders(user, now).await.map_err(failure)?)
        }
        OrdersSubcommand::Place(args) => {
            let order = ctx
                .orders
                .make_order(
                    user,
                    NewOrder {
                        address: args.address,
                        payment_method: args.payment.into(),
                    },
                    now,
                )
                .await
                .map_err(failure)?;

            Outcome::write(&order)
        }
    }
}
