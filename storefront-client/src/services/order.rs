//! `/orders/*` endpoints

use shared::models::{Listing, NewOrder, Order, OrderStatus, OrderStatusUpdate};

use crate::error::ClientResult;
use crate::http::HttpClient;

#[derive(Debug, Clone)]
pub struct OrderService {
    http: HttpClient,
}

impl OrderService {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub async fn create_order(&self, order: &NewOrder) -> ClientResult<Order> {
        self.http.post("/orders/", order).await
    }

    pub async fn get_orders(&self) -> ClientResult<Listing<Order>> {
        self.http.get("/orders/").await
    }

    pub async fn get_order(&self, id: i64) -> ClientResult<Order> {
        self.http.get(&format!("/orders/{id}/")).await
    }

    pub async fn update_order_status(&self, id: i64, status: OrderStatus) -> ClientResult<Order> {
        let body = OrderStatusUpdate { status };
        self.http.patch(&format!("/orders/{id}/"), &body).await
    }
}
