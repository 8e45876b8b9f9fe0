//! `/cart/*` endpoints

use shared::models::{AddToCartRequest, ServerCart, UpdateCartItemRequest};

use crate::error::ClientResult;
use crate::http::HttpClient;

#[derive(Debug, Clone)]
pub struct CartService {
    http: HttpClient,
}

impl CartService {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub async fn get_cart(&self) -> ClientResult<ServerCart> {
        self.http.get("/cart/").await
    }

    pub async fn add_to_cart(&self, product_id: i64, quantity: u32) -> ClientResult<ServerCart> {
        let body = AddToCartRequest {
            product_id,
            quantity,
        };
        self.http.post("/cart/add/", &body).await
    }

    /// `item_id` is the server cart-item id
    pub async fn update_quantity(&self, item_id: i64, quantity: u32) -> ClientResult<ServerCart> {
        let body = UpdateCartItemRequest { quantity };
        self.http.put(&format!("/cart/items/{item_id}/"), &body).await
    }

    /// `item_id` is the server cart-item id
    pub async fn remove_from_cart(&self, item_id: i64) -> ClientResult<ServerCart> {
        self.http.delete(&format!("/cart/items/{item_id}/")).await
    }

    pub async fn clear_cart(&self) -> ClientResult<ServerCart> {
        self.http.delete("/cart/clear/").await
    }
}
