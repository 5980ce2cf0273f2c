use clap::{Args, Subcommand};
use eats_app::{
    context::AppContext,
    domain::{catalog::models::ProductUuid, users::models::UserUuid},
};
use serde_json::json;

use super::{Outcome, failure};

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Add one unit of a product
    Add(ProductArgs),

    /// Remove one unit of a product
    Remove(ProductArgs),

    /// Show the priced cart
    Show,

    /// Empty the cart
    Clear,
}

#[derive(Debug, Args)]
struct ProductArgs {
    /// Product UUID
    product: ProductUuid,
}

pub(crate) async fn run(
    command: CartCommand,
    user: UserUuid,
    ctx: &AppContext,
) -> Result<Outcome, String> {
    match command.command {
        CartSubcommand::Add(args) => {
            let quantity = ctx
                .carts
                .add_item(user, args.product)
                .await
                .map_err(failure)?;

            Outcome::write(&json!({ "id": args.product, "quantity": quantity }))
        }
        CartSubcommand::Remove(args) => {
            let quantity = ctx
                .carts
                .remove_item(user, args.product)
                .await
                .map_err(failure)?;

            Outcome::write(&json!({ "id": args.product, "quantity": quantity }))
        }
        CartSubcommand::Show => Outcome::read(&ctx.carts.get_cart(user).await.map_err(failure)?),
        CartSubcommand::Clear => {
            ctx.carts.clear_cart(user).await;

            Outcome::write(&ctx.carts.get_cart(user).await.map_err(failure)?)
        }
    }
}
