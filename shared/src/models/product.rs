//! Product Model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::category::Category;

/// Stock below this count is reported as low
pub const LOW_STOCK_THRESHOLD: u32 = 10;

/// Stock availability label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockStatus {
    #[serde(rename = "Out of Stock")]
    OutOfStock,
    #[serde(rename = "Low Stock")]
    LowStock,
    #[serde(rename = "In Stock")]
    InStock,
}

impl StockStatus {
    pub fn from_quantity(quantity: u32) -> Self {
        match quantity {
            0 => Self::OutOfStock,
            q if q < LOW_STOCK_THRESHOLD => Self::LowStock,
            _ => Self::InStock,
        }
    }
}

/// Product entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    #[serde(default)]
    pub category: Option<Category>,
    /// Units in stock
    #[serde(default)]
    pub quantity: u32,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub sku: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub stock_status: Option<StockStatus>,
    #[serde(default)]
    pub is_in_stock: Option<bool>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_true() -> bool {
    true
}

impl Product {
    /// Stock label, derived from `quantity` when the backend omitted it
    pub fn stock_status(&self) -> StockStatus {
        self.stock_status
            .unwrap_or_else(|| StockStatus::from_quantity(self.quantity))
    }

    pub fn in_stock(&self) -> bool {
        self.is_in_stock.unwrap_or(self.quantity > 0)
    }
}

/// Product as carried by a cart line.
///
/// Only `id` and `price` are required. Anything else the line was created
/// with is kept in `extra` so a persisted guest cart round-trips unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRef {
    pub id: i64,
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProductRef {
    pub fn new(id: i64, price: Decimal) -> Self {
        Self {
            id,
            price,
            name: None,
            image: None,
            extra: Map::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl From<&Product> for ProductRef {
    fn from(product: &Product) -> Self {
        let mut extra = Map::new();
        if !product.sku.is_empty() {
            extra.insert("sku".into(), Value::String(product.sku.clone()));
        }
        Self {
            id: product.id,
            price: product.price,
            name: Some(product.name.clone()),
            image: product.image.clone(),
            extra,
        }
    }
}

/// Query parameters accepted by `GET /products/`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductQuery {
    /// Free-text search over name, description and category name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Case-insensitive name filter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_featured: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_stock: Option<bool>,
    /// One of `name`, `price`, `created_at`, optionally prefixed with `-`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ordering: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

/// Query parameters accepted by `GET /products/search/`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductSearch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<Decimal>,
}

/// Image attached to a product form
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content: Vec<u8>,
}

/// Create / update product payload, sent as a multipart form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductForm {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    /// Category id
    pub category: Option<i64>,
    pub quantity: Option<u32>,
    pub sku: Option<String>,
    pub is_active: Option<bool>,
    pub is_featured: Option<bool>,
    pub image: Option<ImageUpload>,
}

impl ProductForm {
    /// Text fields of the form, in a stable order, skipping unset ones
    pub fn text_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = Vec::new();
        if let Some(v) = &self.name {
            fields.push(("name", v.clone()));
        }
        if let Some(v) = &self.description {
            fields.push(("description", v.clone()));
        }
        if let Some(v) = &self.price {
            fields.push(("price", v.to_string()));
        }
        if let Some(v) = self.category {
            fields.push(("category", v.to_string()));
        }
        if let Some(v) = self.quantity {
            fields.push(("quantity", v.to_string()));
        }
        if let Some(v) = &self.sku {
            fields.push(("sku", v.clone()));
        }
        if let Some(v) = self.is_active {
            fields.push(("is_active", v.to_string()));
        }
        if let Some(v) = self.is_featured {
            fields.push(("is_featured", v.to_string()));
        }
        fields
    }
}
