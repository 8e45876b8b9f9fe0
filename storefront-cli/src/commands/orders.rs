//! Order commands

use shared::models::{NewOrder, Order, OrderProduct, OrderStatus};
use storefront_client::StorefrontContext;

fn print_summary(order: &Order) {
    let total = order
        .total_amount
        .map(|t| t.to_string())
        .unwrap_or_else(|| "-".into());
    let placed = order
        .created_at
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default();
    println!("{:>6}  {:<10} {:>10}  {}", order.id, order.status, total, placed);
}

pub async fn list(ctx: &StorefrontContext) -> anyhow::Result<()> {
    let orders = ctx.orders.get_orders().await?.into_items();
    if orders.is_empty() {
        println!("No orders");
    }
    orders.iter().for_each(print_summary);
    Ok(())
}

pub async fn show(ctx: &StorefrontContext, id: i64) -> anyhow::Result<()> {
    let order = ctx.orders.get_order(id).await?;
    print_summary(&order);
    if let Some(address) = &order.shipping_address {
        println!("  ship to: {address}");
    }
    for item in &order.items {
        let product = match &item.product {
            OrderProduct::Id(id) => format!("#{id}"),
            OrderProduct::Detail(p) => p.name.clone().unwrap_or_else(|| format!("#{}", p.id)),
        };
        println!("  {:>4} x {}", item.quantity, product);
    }
    Ok(())
}

pub async fn create(ctx: &StorefrontContext, order: &NewOrder) -> anyhow::Result<()> {
    if !ctx.auth.is_authenticated() {
        anyhow::bail!("log in before placing an order");
    }
    let created = ctx.orders.create_order(order).await?;
    // The backend empties the cart on checkout
    ctx.cart.fetch_cart().await;
    println!("Order #{} placed", created.id);
    print_summary(&created);
    Ok(())
}

pub async fn set_status(ctx: &StorefrontContext, id: i64, status: OrderStatus) -> anyhow::Result<()> {
    let order = ctx.orders.update_order_status(id, status).await?;
    print_summary(&order);
    Ok(())
}
