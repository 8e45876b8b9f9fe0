//! Session commands

use shared::{LoginRequest, RegisterRequest};
use storefront_client::StorefrontContext;

pub async fn login(
    ctx: &StorefrontContext,
    email: String,
    password: String,
    merge: bool,
) -> anyhow::Result<()> {
    let credentials = LoginRequest::new(email, password);
    let user = if merge {
        ctx.login_and_merge(&credentials).await?
    } else {
        ctx.auth.login(&credentials).await?
    };
    println!("Logged in as {}", user.display_name());
    if merge && !ctx.cart.is_empty() {
        println!("Cart: {} item(s)", ctx.cart.total_items());
    }
    Ok(())
}

pub async fn register(ctx: &StorefrontContext, request: &RegisterRequest) -> anyhow::Result<()> {
    let user = ctx.auth.register(request).await?;
    println!("Welcome, {}", user.display_name());
    Ok(())
}

pub fn logout(ctx: &StorefrontContext) {
    ctx.auth.logout();
    println!("Logged out");
}

pub fn whoami(ctx: &StorefrontContext) {
    match ctx.auth.user() {
        Some(user) => {
            let role = if user.is_staff { " (staff)" } else { "" };
            println!("{}{}", user.display_name(), role);
            if let Some(email) = &user.email {
                println!("  {email}");
            }
        }
        None if ctx.auth.is_authenticated() => println!("Token stored, profile unavailable"),
        None => println!("Not logged in"),
    }
}
