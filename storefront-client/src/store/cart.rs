//! Cart store
//!
//! Two representations, one authoritative at a time:
//!
//! - guest cart: a JSON array under `keys::GUEST_CART`, owned entirely by the
//!   client;
//! - server cart: owned by the backend; the store only mirrors it and
//!   re-fetches after every mutation.
//!
//! Every operation checks `is_authenticated` once, up front, and then stays
//! on that side. Line ids follow [`CartItem::line_id`]: product id for guest
//! lines, server cart-item id for server lines.
//!
//! Overlapping guest mutations are not serialized; two concurrent
//! read-modify-persist sequences can lose an update.

use parking_lot::RwLock;
use rust_decimal::Decimal;
use shared::models::{self, CartItem, ProductRef};

use crate::error::ClientResult;
use crate::services::CartService;
use crate::session::Session;
use crate::storage::keys;

#[derive(Debug, Default)]
struct CartState {
    items: Vec<CartItem>,
    loading: bool,
}

/// Holds cart lines and reconciles guest and server carts
#[derive(Debug)]
pub struct CartStore {
    session: Session,
    service: CartService,
    state: RwLock<CartState>,
}

impl CartStore {
    pub fn new(session: Session, service: CartService) -> Self {
        Self {
            session,
            service,
            state: RwLock::new(CartState::default()),
        }
    }

    /// Snapshot of the current lines
    pub fn items(&self) -> Vec<CartItem> {
        self.state.read().items.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.read().loading
    }

    pub fn total_items(&self) -> u32 {
        models::total_items(&self.state.read().items)
    }

    pub fn total_price(&self) -> Decimal {
        models::total_price(&self.state.read().items)
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().items.is_empty()
    }

    // ========== Guest cart persistence ==========

    /// Persisted guest cart; absent or malformed data yields an empty cart
    fn load_guest_items(&self) -> Vec<CartItem> {
        let Some(raw) = self.session.storage().get(keys::GUEST_CART) else {
            return Vec::new();
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!("Ignoring malformed guest cart: {}", e);
            Vec::new()
        })
    }

    fn persist_guest_items(&self, items: &[CartItem]) -> ClientResult<()> {
        let json = serde_json::to_string(items)?;
        self.session.storage().set(keys::GUEST_CART, &json)?;
        Ok(())
    }

    fn replace_items(&self, items: Vec<CartItem>) {
        self.state.write().items = items;
    }

    /// Apply `f` to the persisted guest cart, persist the result if `f`
    /// reports a change, and mirror it in memory. Never starts from the
    /// in-memory lines, which may still hold a server cart.
    fn mutate_guest(&self, f: impl FnOnce(&mut Vec<CartItem>) -> bool) -> ClientResult<()> {
        let mut items = self.load_guest_items();
        if f(&mut items) {
            self.persist_guest_items(&items)?;
        }
        self.replace_items(items);
        Ok(())
    }

    // ========== Operations ==========

    /// Load the authoritative cart.
    ///
    /// Never fails: a server error is logged and the current lines are kept,
    /// so a transient failure does not blank a working cart.
    pub async fn fetch_cart(&self) {
        if !self.session.is_authenticated() {
            let items = self.load_guest_items();
            self.replace_items(items);
            return;
        }

        self.state.write().loading = true;
        let result = self.service.get_cart().await;
        let mut state = self.state.write();
        state.loading = false;
        match result {
            Ok(cart) => state.items = cart.items,
            Err(e) => tracing::warn!("Error fetching cart: {}", e),
        }
    }

    /// Add `quantity` of `product`.
    ///
    /// Guest: bumps the existing line for the product or appends one, then
    /// persists. Authenticated: adds on the server and re-fetches.
    pub async fn add_to_cart(&self, product: ProductRef, quantity: u32) -> ClientResult<()> {
        if !self.session.is_authenticated() {
            return self.mutate_guest(|items| {
                match items.iter_mut().find(|item| item.product.id == product.id) {
                    Some(existing) => existing.quantity = existing.quantity.saturating_add(quantity),
                    None => items.push(CartItem::new(product, quantity)),
                }
                true
            });
        }

        self.service.add_to_cart(product.id, quantity).await?;
        self.fetch_cart().await;
        Ok(())
    }

    /// Overwrite the quantity of a line. The quantity is not validated.
    pub async fn update_quantity(&self, line_id: i64, quantity: u32) -> ClientResult<()> {
        if !self.session.is_authenticated() {
            return self.mutate_guest(|items| {
                match items.iter_mut().find(|i| i.product.id == line_id) {
                    Some(item) => {
                        item.quantity = quantity;
                        true
                    }
                    None => false,
                }
            });
        }

        self.service.update_quantity(line_id, quantity).await?;
        self.fetch_cart().await;
        Ok(())
    }

    /// Remove a line
    pub async fn remove_from_cart(&self, line_id: i64) -> ClientResult<()> {
        if !self.session.is_authenticated() {
            return self.mutate_guest(|items| {
                items.retain(|i| i.product.id != line_id);
                true
            });
        }

        self.service.remove_from_cart(line_id).await?;
        self.fetch_cart().await;
        Ok(())
    }

    /// Empty the cart. Guest: also deletes the persisted key.
    pub async fn clear_cart(&self) -> ClientResult<()> {
        if !self.session.is_authenticated() {
            self.replace_items(Vec::new());
            self.session.storage().remove(keys::GUEST_CART)?;
            return Ok(());
        }

        self.service.clear_cart().await?;
        self.replace_items(Vec::new());
        Ok(())
    }

    /// Move the persisted guest cart into the server cart.
    ///
    /// Only runs when authenticated. Each guest line is added on the server;
    /// lines that fail stay in the guest cart so nothing is dropped silently.
    /// Returns the number of lines moved.
    pub async fn merge_guest_cart(&self) -> ClientResult<usize> {
        if !self.session.is_authenticated() {
            return Ok(0);
        }

        let guest = self.load_guest_items();
        if guest.is_empty() {
            return Ok(0);
        }

        let mut merged = 0;
        let mut remaining = Vec::new();
        for item in guest {
            match self.service.add_to_cart(item.product.id, item.quantity).await {
                Ok(_) => merged += 1,
                Err(e) => {
                    tracing::warn!("Failed to merge product {} into cart: {}", item.product.id, e);
                    remaining.push(item);
                }
            }
        }

        if remaining.is_empty() {
            self.session.storage().remove(keys::GUEST_CART)?;
        } else {
            self.persist_guest_items(&remaining)?;
        }
        tracing::info!("Merged {} guest cart line(s)", merged);

        self.fetch_cart().await;
        Ok(merged)
    }
}
