//! Cart commands.

use anyhow::{Context as _, Result};
use market_cart::NewCartItem;

use super::{AddArgs, ItemArgs};
use crate::context::Context;

/// List the items in the cart.
pub async fn list(ctx: &Context) -> Result<()> {
    let cart = ctx.open_cart().await?;
    ctx.output.cart(&cart.products());
    Ok(())
}

/// Add a product, or bump its quantity if already present.
pub async fn add(args: AddArgs, ctx: &Context) -> Result<()> {
    let cart = ctx.open_cart().await?;
    let product = NewCartItem::new(args.id.as_str(), args.title, args.image_url, args.price);

    cart.add_to_cart(product)
        .await
        .with_context(|| format!("Failed to add {}", args.id))?;

    ctx.output.item_changed(&args.id, &cart.products());
    Ok(())
}

/// Increase an item's quantity.
pub async fn increment(args: ItemArgs, ctx: &Context) -> Result<()> {
    let cart = ctx.open_cart().await?;
    cart.increment(args.id.as_str())
        .await
        .with_context(|| format!("Failed to increment {}", args.id))?;

    ctx.output.item_changed(&args.id, &cart.products());
    Ok(())
}

/// Decrease an item's quantity, removing it at zero.
pub async fn decrement(args: ItemArgs, ctx: &Context) -> Result<()> {
    let cart = ctx.open_cart().await?;
    cart.decrement(args.id.as_str())
        .await
        .with_context(|| format!("Failed to decrement {}", args.id))?;

    ctx.output.item_changed(&args.id, &cart.products());
    Ok(())
}
