//! Catalog commands

use shared::models::{Product, ProductQuery, ProductSearch, StockStatus};
use storefront_client::StorefrontContext;

fn stock_label(status: StockStatus) -> &'static str {
    match status {
        StockStatus::InStock => "in stock",
        StockStatus::LowStock => "low stock",
        StockStatus::OutOfStock => "out of stock",
    }
}

fn print_products(products: &[Product]) {
    for p in products {
        let featured = if p.is_featured { "*" } else { " " };
        println!(
            "{:>6} {} {:<30} {:>10}  {}",
            p.id,
            featured,
            p.name,
            p.price,
            stock_label(p.stock_status())
        );
    }
}

pub async fn products(ctx: &StorefrontContext, query: &ProductQuery) -> anyhow::Result<()> {
    let listing = ctx.products.get_products(query).await?;
    let total = listing.total();
    let more = listing.has_next();
    print_products(&listing.into_items());
    println!("{total} product(s){}", if more { ", more with --page" } else { "" });
    Ok(())
}

pub async fn featured(ctx: &StorefrontContext) -> anyhow::Result<()> {
    print_products(&ctx.products.get_featured_products().await?);
    Ok(())
}

pub async fn search(ctx: &StorefrontContext, search: &ProductSearch) -> anyhow::Result<()> {
    let results = ctx.products.search_products(search).await?;
    if results.is_empty() {
        println!("No matches");
    }
    print_products(&results);
    Ok(())
}

pub async fn product(ctx: &StorefrontContext, id: i64) -> anyhow::Result<()> {
    let p = ctx.products.get_product(id).await?;
    println!("{} (#{})", p.name, p.id);
    if let Some(category) = &p.category {
        println!("  category: {}", category.name);
    }
    println!("  price:    {}", p.price);
    println!("  stock:    {} ({})", p.quantity, stock_label(p.stock_status()));
    if !p.sku.is_empty() {
        println!("  sku:      {}", p.sku);
    }
    if !p.description.is_empty() {
        println!();
        println!("{}", p.description);
    }
    Ok(())
}

pub async fn categories(ctx: &StorefrontContext) -> anyhow::Result<()> {
    for c in ctx.products.get_categories().await?.into_items() {
        match c.products_count {
            Some(count) => println!("{:>6}  {} ({count})", c.id, c.name),
            None => println!("{:>6}  {}", c.id, c.name),
        }
    }
    Ok(())
}
