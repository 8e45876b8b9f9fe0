//! Storefront CLI - drive the storefront client from a terminal.
//!
//! Tokens and the guest cart are kept in a JSON state file between runs.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog as a guest
//! storefront products --search mug --ordering=-price
//!
//! # Fill a guest cart, then log in and merge it into the account cart
//! storefront cart add 3 --quantity 2
//! storefront login sam@shop.test --password secret
//!
//! # Check what the navigation guard would do
//! storefront open /admin
//! ```
//!
//! # Environment
//!
//! `STOREFRONT_API_URL`, `STOREFRONT_STATE_FILE`, plus the client's
//! `STOREFRONT_TIMEOUT_SECS` and `STOREFRONT_LOGIN_ROUTE`. A `.env` file is
//! loaded first; `RUST_LOG` controls log output (stderr).

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use shared::models::OrderStatus;
use storefront_client::{ClientConfig, FileStorage, SessionEvent, StorefrontContext};

mod commands;

#[derive(Parser)]
#[command(name = "storefront")]
#[command(author, version, about = "Storefront client CLI")]
struct Cli {
    /// Backend base URL
    #[arg(long, env = "STOREFRONT_API_URL")]
    base_url: Option<String>,

    /// File holding tokens and the guest cart
    #[arg(long, env = "STOREFRONT_STATE_FILE", default_value = ".storefront/state.json")]
    state_file: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in; the guest cart is merged into the account cart
    Login {
        email: String,

        #[arg(short, long, env = "STOREFRONT_PASSWORD")]
        password: String,

        /// Keep the guest cart as it is
        #[arg(long)]
        no_merge: bool,
    },
    /// Create an account and log in
    Register {
        email: String,

        #[arg(short, long)]
        password: String,

        #[arg(long)]
        username: Option<String>,

        #[arg(long)]
        first_name: Option<String>,

        #[arg(long)]
        last_name: Option<String>,
    },
    /// Forget the stored tokens
    Logout,
    /// Show the current user
    Whoami,
    /// List products
    Products {
        #[arg(short, long)]
        search: Option<String>,

        /// Category id
        #[arg(short, long)]
        category: Option<i64>,

        #[arg(long)]
        min_price: Option<Decimal>,

        #[arg(long)]
        max_price: Option<Decimal>,

        /// Only featured products
        #[arg(long)]
        featured: bool,

        /// Only products in stock
        #[arg(long)]
        in_stock: bool,

        /// `name`, `price` or `created_at`, `-` prefix for descending
        #[arg(long)]
        ordering: Option<String>,

        #[arg(long)]
        page: Option<u32>,
    },
    /// List featured products
    Featured,
    /// Search products
    Search {
        query: String,

        #[arg(short, long)]
        category: Option<i64>,
    },
    /// Show one product
    Product { id: i64 },
    /// List categories
    Categories,
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Manage orders
    Orders {
        #[command(subcommand)]
        action: OrderAction,
    },
    /// Resolve a route and apply the navigation guard
    Open { path: String },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart
    Show,
    /// Add a product
    Add {
        product_id: i64,

        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Set the quantity of a line (product id for guests, item id otherwise)
    Update { line_id: i64, quantity: u32 },
    /// Remove a line (product id for guests, item id otherwise)
    Remove { line_id: i64 },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum OrderAction {
    /// List your orders
    List,
    /// Show one order
    Show { id: i64 },
    /// Place an order from the server cart
    Create {
        #[arg(long)]
        shipping_address: String,

        #[arg(long)]
        phone: Option<String>,

        #[arg(long)]
        payment_method: Option<String>,

        #[arg(long)]
        notes: Option<String>,
    },
    /// Change the status of an order (staff only)
    Status { id: i64, status: OrderStatus },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storefront_client=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = ClientConfig::from_env();
    if let Some(url) = &cli.base_url {
        config.base_url = url.trim_end_matches('/').to_string();
    }
    tracing::debug!("Using backend {} and state {}", config.base_url, cli.state_file.display());

    let storage = Arc::new(FileStorage::open(&cli.state_file));
    let ctx = StorefrontContext::new(config, storage)?;
    let mut events = ctx.subscribe();

    ctx.startup().await;
    let result = run(&ctx, cli.command).await;

    while let Ok(event) = events.try_recv() {
        if let SessionEvent::Expired { redirect_to } = event {
            eprintln!("Session expired, log in again ({redirect_to})");
        }
    }
    result
}

async fn run(ctx: &StorefrontContext, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Login {
            email,
            password,
            no_merge,
        } => commands::auth::login(ctx, email, password, !no_merge).await?,
        Commands::Register {
            email,
            password,
            username,
            first_name,
            last_name,
        } => {
            let request = shared::RegisterRequest {
                email,
                password_confirm: Some(password.clone()),
                password,
                username,
                first_name,
                last_name,
            };
            commands::auth::register(ctx, &request).await?;
        }
        Commands::Logout => commands::auth::logout(ctx),
        Commands::Whoami => commands::auth::whoami(ctx),
        Commands::Products {
            search,
            category,
            min_price,
            max_price,
            featured,
            in_stock,
            ordering,
            page,
        } => {
            let query = shared::models::ProductQuery {
                search,
                category,
                min_price,
                max_price,
                is_featured: featured.then_some(true),
                in_stock: in_stock.then_some(true),
                ordering,
                page,
                ..Default::default()
            };
            commands::catalog::products(ctx, &query).await?;
        }
        Commands::Featured => commands::catalog::featured(ctx).await?,
        Commands::Search { query, category } => {
            let search = shared::models::ProductSearch {
                q: Some(query),
                category,
                ..Default::default()
            };
            commands::catalog::search(ctx, &search).await?;
        }
        Commands::Product { id } => commands::catalog::product(ctx, id).await?,
        Commands::Categories => commands::catalog::categories(ctx).await?,
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(ctx),
            CartAction::Add {
                product_id,
                quantity,
            } => commands::cart::add(ctx, product_id, quantity).await?,
            CartAction::Update { line_id, quantity } => {
                ctx.cart.update_quantity(line_id, quantity).await?;
                commands::cart::show(ctx);
            }
            CartAction::Remove { line_id } => {
                ctx.cart.remove_from_cart(line_id).await?;
                commands::cart::show(ctx);
            }
            CartAction::Clear => {
                ctx.cart.clear_cart().await?;
                println!("Cart cleared");
            }
        },
        Commands::Orders { action } => match action {
            OrderAction::List => commands::orders::list(ctx).await?,
            OrderAction::Show { id } => commands::orders::show(ctx, id).await?,
            OrderAction::Create {
                shipping_address,
                phone,
                payment_method,
                notes,
            } => {
                let order = shared::models::NewOrder {
                    shipping_address,
                    phone,
                    payment_method,
                    notes,
                };
                commands::orders::create(ctx, &order).await?;
            }
            OrderAction::Status { id, status } => {
                commands::orders::set_status(ctx, id, status).await?;
            }
        },
        Commands::Open { path } => commands::navigate::open(ctx, &path),
    }
    Ok(())
}
