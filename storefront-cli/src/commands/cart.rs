//! Cart commands

use shared::models::ProductRef;
use storefront_client::StorefrontContext;

pub fn show(ctx: &StorefrontContext) {
    let items = ctx.cart.items();
    if items.is_empty() {
        println!("Cart is empty");
        return;
    }

    let side = if ctx.auth.is_authenticated() { "account" } else { "guest" };
    println!("{side} cart");
    for item in &items {
        let name = item.product.name.as_deref().unwrap_or("-");
        println!(
            "{:>6}  {:<30} {:>4} x {:>9} = {:>10}",
            item.line_id(),
            name,
            item.quantity,
            item.product.price,
            item.line_total()
        );
    }
    println!("{} item(s), total {}", ctx.cart.total_items(), ctx.cart.total_price());
}

/// Add by product id. The product is fetched first so guest lines carry
/// name and price.
pub async fn add(ctx: &StorefrontContext, product_id: i64, quantity: u32) -> anyhow::Result<()> {
    let product = ctx.products.get_product(product_id).await?;
    if !product.in_stock() {
        anyhow::bail!("{} is out of stock", product.name);
    }
    ctx.cart.add_to_cart(ProductRef::from(&product), quantity).await?;
    show(ctx);
    Ok(())
}
