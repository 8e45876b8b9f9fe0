//! In-process mock of the storefront backend
//!
//! An axum router served on an ephemeral port. Every request is recorded
//! (method, path without the `/api` prefix, query string, bearer token) so
//! tests can assert on exactly what went over the wire.

#![allow(dead_code)]

use std::sync::Arc;

use axum::extract::{Multipart, Path, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use serde_json::{Value, json};
use storefront_client::storage::keys;
use storefront_client::{ClientConfig, KeyValueStore, MemoryStorage, StorefrontContext};

pub const USER_EMAIL: &str = "sam@shop.test";
pub const ADMIN_EMAIL: &str = "admin@shop.test";
pub const PASSWORD: &str = "secret";
pub const INITIAL_ACCESS: &str = "access-1";
pub const REFRESH: &str = "refresh-1";

/// One request as seen by the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub bearer: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartLine {
    pub id: i64,
    pub product_id: i64,
    pub quantity: u32,
}

/// A multipart part received by the product endpoints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedPart {
    pub name: String,
    pub file_name: Option<String>,
    pub content: Vec<u8>,
}

#[derive(Debug)]
struct BackendState {
    access_token: String,
    refresh_token: String,
    email: String,
    first_name: String,
    staff: bool,
    reject_all: bool,
    fail_cart: bool,
    refresh_calls: usize,
    requests: Vec<Recorded>,
    cart: Vec<CartLine>,
    next_line_id: i64,
    parts: Vec<ReceivedPart>,
    orders: Vec<Value>,
}

impl Default for BackendState {
    fn default() -> Self {
        Self {
            access_token: INITIAL_ACCESS.into(),
            refresh_token: REFRESH.into(),
            email: USER_EMAIL.into(),
            first_name: "Sam".into(),
            staff: false,
            reject_all: false,
            fail_cart: false,
            refresh_calls: 0,
            requests: Vec::new(),
            cart: Vec::new(),
            next_line_id: 100,
            parts: Vec::new(),
            orders: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MockBackend {
    state: Arc<Mutex<BackendState>>,
    pub base_url: String,
}

impl MockBackend {
    /// Start the backend on 127.0.0.1 with a free port
    pub async fn spawn() -> Self {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let backend = Self {
            state: Arc::new(Mutex::new(BackendState::default())),
            base_url: format!("http://{addr}/api"),
        };

        let app = router(backend.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        backend
    }

    pub fn config(&self) -> ClientConfig {
        ClientConfig::new(&self.base_url).with_timeout(5)
    }

    /// Storage holding the currently valid token pair
    pub fn logged_in_storage(&self) -> Arc<MemoryStorage> {
        let state = self.state.lock();
        Arc::new(MemoryStorage::with_entries([
            (keys::ACCESS_TOKEN, state.access_token.as_str()),
            (keys::REFRESH_TOKEN, state.refresh_token.as_str()),
        ]))
    }

    pub fn context(&self, storage: Arc<dyn KeyValueStore>) -> StorefrontContext {
        StorefrontContext::new(self.config(), storage).unwrap()
    }

    // ========== Inspection ==========

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.lock().requests.clone()
    }

    /// Requests as `"METHOD /path/"`
    pub fn calls(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .map(|r| format!("{} {}", r.method, r.path))
            .collect()
    }

    pub fn count(&self, method: &str, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    pub fn last_request(&self) -> Recorded {
        self.requests().pop().unwrap()
    }

    pub fn clear_requests(&self) {
        self.state.lock().requests.clear();
    }

    pub fn refresh_calls(&self) -> usize {
        self.state.lock().refresh_calls
    }

    pub fn access_token(&self) -> String {
        self.state.lock().access_token.clone()
    }

    pub fn cart_lines(&self) -> Vec<CartLine> {
        self.state.lock().cart.clone()
    }

    pub fn received_parts(&self) -> Vec<ReceivedPart> {
        self.state.lock().parts.clone()
    }

    // ========== Scenario knobs ==========

    /// Issue a new access token; the previous one is now rejected
    pub fn rotate_access_token(&self, token: &str) {
        self.state.lock().access_token = token.into();
    }

    /// Make the refresh endpoint reject every refresh token
    pub fn revoke_refresh(&self) {
        self.state.lock().refresh_token = "revoked".into();
    }

    /// Reject every protected call with 401, whatever the token
    pub fn set_reject_all(&self, reject: bool) {
        self.state.lock().reject_all = reject;
    }

    /// Make `GET /cart/` fail with 500
    pub fn set_fail_cart(&self, fail: bool) {
        self.state.lock().fail_cart = fail;
    }

    pub fn set_staff(&self, staff: bool) {
        self.state.lock().staff = staff;
    }

    pub fn seed_cart(&self, product_id: i64, quantity: u32) -> i64 {
        let mut state = self.state.lock();
        let id = state.next_line_id;
        state.next_line_id += 1;
        state.cart.push(CartLine {
            id,
            product_id,
            quantity,
        });
        id
    }

    fn authorize(&self, headers: &HeaderMap) -> Result<(), Response> {
        let state = self.state.lock();
        let expected = format!("Bearer {}", state.access_token);
        let bearer = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
        if !state.reject_all && bearer == Some(expected.as_str()) {
            Ok(())
        } else {
            Err(error(
                StatusCode::UNAUTHORIZED,
                json!({"detail": "Given token not valid for any token type", "code": "token_not_valid"}),
            ))
        }
    }

    fn authorize_staff(&self, headers: &HeaderMap) -> Result<(), Response> {
        self.authorize(headers)?;
        if self.state.lock().staff {
            Ok(())
        } else {
            Err(error(
                StatusCode::FORBIDDEN,
                json!({"detail": "You do not have permission to perform this action."}),
            ))
        }
    }
}

// ============================================================================
// Fixtures
// ============================================================================

const CATALOG: &[(i64, &str, &str, u32, bool)] = &[
    (1, "Mug", "12.50", 20, false),
    (2, "Tee", "25.00", 3, true),
    (3, "Cap", "9.99", 0, true),
];

fn product_json(id: i64) -> Option<Value> {
    CATALOG
        .iter()
        .find(|p| p.0 == id)
        .map(|&(id, name, price, quantity, featured)| {
            json!({
                "id": id,
                "name": name,
                "description": format!("A {name}"),
                "price": price,
                "category": {"id": 1, "name": "Merch", "is_active": true},
                "quantity": quantity,
                "sku": format!("SKU-{id}"),
                "is_active": true,
                "is_featured": featured,
                "created_at": "2024-03-01T10:00:00Z",
            })
        })
}

fn price_of(id: i64) -> Decimal {
    CATALOG
        .iter()
        .find(|p| p.0 == id)
        .and_then(|p| p.2.parse().ok())
        .unwrap_or_default()
}

fn user_json(state: &BackendState) -> Value {
    json!({
        "id": 7,
        "email": state.email,
        "username": state.email.split('@').next(),
        "first_name": state.first_name,
        "last_name": "Shopper",
        "is_staff": state.staff,
        "date_joined": "2024-01-15T08:30:00Z",
    })
}

fn auth_json(state: &BackendState) -> Value {
    json!({
        "access": state.access_token,
        "refresh": state.refresh_token,
        "user": user_json(state),
    })
}

fn cart_json(state: &BackendState) -> Value {
    let items: Vec<Value> = state
        .cart
        .iter()
        .map(|line| {
            json!({
                "id": line.id,
                "product": {
                    "id": line.product_id,
                    "name": product_json(line.product_id).map(|p| p["name"].clone()),
                    "price": price_of(line.product_id),
                },
                "quantity": line.quantity,
            })
        })
        .collect();
    let total_items: u32 = state.cart.iter().map(|l| l.quantity).sum();
    let total_price: Decimal = state
        .cart
        .iter()
        .map(|l| price_of(l.product_id) * Decimal::from(l.quantity))
        .sum();
    json!({"id": 1, "items": items, "total_items": total_items, "total_price": total_price})
}

fn paged(results: Vec<Value>) -> Value {
    json!({"count": results.len(), "next": null, "previous": null, "results": results})
}

fn error(status: StatusCode, body: Value) -> Response {
    (status, Json(body)).into_response()
}

fn not_found() -> Response {
    error(StatusCode::NOT_FOUND, json!({"detail": "Not found."}))
}

// ============================================================================
// Router
// ============================================================================

fn router(backend: MockBackend) -> Router {
    let api = Router::new()
        .route("/auth/login/", post(login))
        .route("/auth/register/", post(register))
        .route("/auth/profile/", get(profile).put(update_profile))
        .route("/auth/token/refresh/", post(refresh))
        .route("/cart/", get(get_cart))
        .route("/cart/add/", post(add_to_cart))
        .route("/cart/items/{id}/", put(update_cart_item).delete(remove_cart_item))
        .route("/cart/clear/", delete(clear_cart))
        .route("/products/", get(list_products).post(create_product))
        .route("/products/featured/", get(featured_products))
        .route("/products/search/", get(search_products))
        .route(
            "/products/{id}/",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/categories/", get(list_categories).post(create_category))
        .route("/orders/", get(list_orders).post(create_order))
        .route("/orders/{id}/", get(get_order).patch(update_order));

    Router::new()
        .nest("/api", api)
        .layer(middleware::from_fn_with_state(backend.clone(), record))
        .with_state(backend)
}

async fn record(State(backend): State<MockBackend>, request: Request, next: Next) -> Response {
    let uri = request.uri();
    let recorded = Recorded {
        method: request.method().to_string(),
        path: uri.path().trim_start_matches("/api").to_string(),
        query: uri.query().map(str::to_string),
        bearer: request
            .headers()
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::to_string),
    };
    backend.state.lock().requests.push(recorded);
    next.run(request).await
}

// ========== Auth ==========

async fn login(State(backend): State<MockBackend>, Json(body): Json<Value>) -> Response {
    let email = body["email"].as_str().unwrap_or_default();
    let known = email == USER_EMAIL || email == ADMIN_EMAIL;
    if !known || body["password"] != PASSWORD {
        return error(
            StatusCode::UNAUTHORIZED,
            json!({"detail": "No active account found with the given credentials"}),
        );
    }
    let mut state = backend.state.lock();
    state.email = email.to_string();
    state.staff = email == ADMIN_EMAIL;
    Json(auth_json(&state)).into_response()
}

async fn register(State(backend): State<MockBackend>, Json(body): Json<Value>) -> Response {
    let email = body["email"].as_str().unwrap_or_default();
    if email == USER_EMAIL || email == ADMIN_EMAIL {
        return error(
            StatusCode::BAD_REQUEST,
            json!({"email": ["user with this email already exists."]}),
        );
    }
    let mut state = backend.state.lock();
    state.email = email.to_string();
    state.staff = false;
    if let Some(first) = body["first_name"].as_str() {
        state.first_name = first.to_string();
    }
    (StatusCode::CREATED, Json(auth_json(&state))).into_response()
}

async fn profile(State(backend): State<MockBackend>, headers: HeaderMap) -> Response {
    if let Err(denied) = backend.authorize(&headers) {
        return denied;
    }
    Json(user_json(&backend.state.lock())).into_response()
}

async fn update_profile(
    State(backend): State<MockBackend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(denied) = backend.authorize(&headers) {
        return denied;
    }
    let mut state = backend.state.lock();
    if let Some(first) = body["first_name"].as_str() {
        state.first_name = first.to_string();
    }
    Json(user_json(&state)).into_response()
}

async fn refresh(State(backend): State<MockBackend>, Json(body): Json<Value>) -> Response {
    let mut state = backend.state.lock();
    state.refresh_calls += 1;
    if body["refresh"] != state.refresh_token.as_str() {
        return error(
            StatusCode::UNAUTHORIZED,
            json!({"detail": "Token is invalid or expired", "code": "token_not_valid"}),
        );
    }
    Json(json!({"access": state.access_token})).into_response()
}

// ========== Cart ==========

async fn get_cart(State(backend): State<MockBackend>, headers: HeaderMap) -> Response {
    if let Err(denied) = backend.authorize(&headers) {
        return denied;
    }
    let state = backend.state.lock();
    if state.fail_cart {
        return error(StatusCode::INTERNAL_SERVER_ERROR, json!({"error": "cart unavailable"}));
    }
    Json(cart_json(&state)).into_response()
}

async fn add_to_cart(
    State(backend): State<MockBackend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(denied) = backend.authorize(&headers) {
        return denied;
    }
    let product_id = body["product_id"].as_i64().unwrap_or_default();
    let quantity = body["quantity"].as_u64().unwrap_or(1) as u32;
    if product_json(product_id).is_none() {
        return error(StatusCode::NOT_FOUND, json!({"error": "Product not found"}));
    }

    let mut state = backend.state.lock();
    match state.cart.iter_mut().find(|l| l.product_id == product_id) {
        Some(line) => line.quantity += quantity,
        None => {
            let id = state.next_line_id;
            state.next_line_id += 1;
            state.cart.push(CartLine {
                id,
                product_id,
                quantity,
            });
        }
    }
    Json(cart_json(&state)).into_response()
}

async fn update_cart_item(
    State(backend): State<MockBackend>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(denied) = backend.authorize(&headers) {
        return denied;
    }
    let mut state = backend.state.lock();
    let Some(line) = state.cart.iter_mut().find(|l| l.id == id) else {
        return not_found();
    };
    line.quantity = body["quantity"].as_u64().unwrap_or_default() as u32;
    Json(cart_json(&state)).into_response()
}

async fn remove_cart_item(
    State(backend): State<MockBackend>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    if let Err(denied) = backend.authorize(&headers) {
        return denied;
    }
    let mut state = backend.state.lock();
    let before = state.cart.len();
    state.cart.retain(|l| l.id != id);
    if state.cart.len() == before {
        return not_found();
    }
    Json(cart_json(&state)).into_response()
}

async fn clear_cart(State(backend): State<MockBackend>, headers: HeaderMap) -> Response {
    if let Err(denied) = backend.authorize(&headers) {
        return denied;
    }
    let mut state = backend.state.lock();
    state.cart.clear();
    Json(cart_json(&state)).into_response()
}

// ========== Catalog ==========

async fn list_products() -> Response {
    let results = CATALOG.iter().filter_map(|p| product_json(p.0)).collect();
    Json(paged(results)).into_response()
}

async fn featured_products() -> Response {
    let results: Vec<Value> = CATALOG
        .iter()
        .filter(|p| p.4)
        .filter_map(|p| product_json(p.0))
        .collect();
    Json(results).into_response()
}

async fn search_products() -> Response {
    let results: Vec<Value> = CATALOG.iter().filter_map(|p| product_json(p.0)).take(1).collect();
    Json(results).into_response()
}

async fn get_product(Path(id): Path<i64>) -> Response {
    match product_json(id) {
        Some(product) => Json(product).into_response(),
        None => not_found(),
    }
}

async fn read_parts(mut multipart: Multipart) -> Vec<ReceivedPart> {
    let mut parts = Vec::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content = field.bytes().await.unwrap().to_vec();
        parts.push(ReceivedPart {
            name,
            file_name,
            content,
        });
    }
    parts
}

fn product_from_parts(id: i64, parts: &[ReceivedPart]) -> Value {
    let text = |name: &str| {
        parts
            .iter()
            .find(|p| p.name == name)
            .map(|p| String::from_utf8_lossy(&p.content).into_owned())
    };
    json!({
        "id": id,
        "name": text("name").unwrap_or_default(),
        "price": text("price").unwrap_or_else(|| "0".into()),
        "quantity": text("quantity").and_then(|q| q.parse::<u32>().ok()).unwrap_or_default(),
        "image": parts.iter().find_map(|p| p.file_name.as_ref().map(|f| format!("/media/products/{f}"))),
    })
}

async fn create_product(
    State(backend): State<MockBackend>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Response {
    if let Err(denied) = backend.authorize_staff(&headers) {
        return denied;
    }
    let parts = read_parts(multipart).await;
    let product = product_from_parts(99, &parts);
    backend.state.lock().parts = parts;
    (StatusCode::CREATED, Json(product)).into_response()
}

async fn update_product(
    State(backend): State<MockBackend>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Response {
    if let Err(denied) = backend.authorize_staff(&headers) {
        return denied;
    }
    let parts = read_parts(multipart).await;
    let product = product_from_parts(id, &parts);
    backend.state.lock().parts = parts;
    Json(product).into_response()
}

async fn delete_product(
    State(backend): State<MockBackend>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    if let Err(denied) = backend.authorize_staff(&headers) {
        return denied;
    }
    if product_json(id).is_none() {
        return not_found();
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn list_categories() -> Response {
    Json(json!([{"id": 1, "name": "Merch", "products_count": 3}])).into_response()
}

async fn create_category(
    State(backend): State<MockBackend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(denied) = backend.authorize_staff(&headers) {
        return denied;
    }
    let category = json!({"id": 2, "name": body["name"], "description": body["description"].as_str().unwrap_or_default()});
    (StatusCode::CREATED, Json(category)).into_response()
}

// ========== Orders ==========

async fn list_orders(State(backend): State<MockBackend>, headers: HeaderMap) -> Response {
    if let Err(denied) = backend.authorize(&headers) {
        return denied;
    }
    let orders = backend.state.lock().orders.clone();
    Json(paged(orders)).into_response()
}

async fn create_order(
    State(backend): State<MockBackend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(denied) = backend.authorize(&headers) {
        return denied;
    }
    let mut state = backend.state.lock();
    if state.cart.is_empty() {
        return error(StatusCode::BAD_REQUEST, json!({"error": "Cart is empty"}));
    }
    let items: Vec<Value> = state
        .cart
        .iter()
        .map(|l| json!({"product": l.product_id, "quantity": l.quantity, "price": price_of(l.product_id)}))
        .collect();
    let total: Decimal = state
        .cart
        .iter()
        .map(|l| price_of(l.product_id) * Decimal::from(l.quantity))
        .sum();
    let order = json!({
        "id": state.orders.len() + 1,
        "status": "pending",
        "items": items,
        "total_amount": total,
        "shipping_address": body["shipping_address"],
        "phone": body["phone"],
        "created_at": "2024-03-02T12:00:00Z",
    });
    state.orders.push(order.clone());
    state.cart.clear();
    (StatusCode::CREATED, Json(order)).into_response()
}

async fn get_order(
    State(backend): State<MockBackend>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    if let Err(denied) = backend.authorize(&headers) {
        return denied;
    }
    let state = backend.state.lock();
    match state.orders.iter().find(|o| o["id"] == id) {
        Some(order) => Json(order.clone()).into_response(),
        None => not_found(),
    }
}

async fn update_order(
    State(backend): State<MockBackend>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(denied) = backend.authorize_staff(&headers) {
        return denied;
    }
    let mut state = backend.state.lock();
    let Some(order) = state.orders.iter_mut().find(|o| o["id"] == id) else {
        return not_found();
    };
    order["status"] = body["status"].clone();
    Json(order.clone()).into_response()
}
