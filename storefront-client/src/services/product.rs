//! `/products/*` and `/categories/*` endpoints

use shared::models::{
    Category, CategoryCreate, Listing, Product, ProductForm, ProductQuery, ProductSearch,
};

use crate::error::ClientResult;
use crate::http::{ApiRequest, HttpClient, MultipartForm};

#[derive(Debug, Clone)]
pub struct ProductService {
    http: HttpClient,
}

impl ProductService {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// List or filter products
    pub async fn get_products(&self, query: &ProductQuery) -> ClientResult<Listing<Product>> {
        self.http.get_with_query("/products/", query).await
    }

    pub async fn get_featured_products(&self) -> ClientResult<Vec<Product>> {
        self.http.get("/products/featured/").await
    }

    pub async fn search_products(&self, search: &ProductSearch) -> ClientResult<Vec<Product>> {
        self.http.get_with_query("/products/search/", search).await
    }

    pub async fn get_product(&self, id: i64) -> ClientResult<Product> {
        self.http.get(&format!("/products/{id}/")).await
    }

    pub async fn create_product(&self, form: &ProductForm) -> ClientResult<Product> {
        let request = ApiRequest::post("/products/").multipart(product_multipart(form));
        self.http.request(request).await
    }

    pub async fn update_product(&self, id: i64, form: &ProductForm) -> ClientResult<Product> {
        let request = ApiRequest::put(format!("/products/{id}/")).multipart(product_multipart(form));
        self.http.request(request).await
    }

    pub async fn delete_product(&self, id: i64) -> ClientResult<()> {
        self.http
            .request_empty(ApiRequest::delete(format!("/products/{id}/")))
            .await
    }

    pub async fn get_categories(&self) -> ClientResult<Listing<Category>> {
        self.http.get("/categories/").await
    }

    pub async fn create_category(&self, category: &CategoryCreate) -> ClientResult<Category> {
        self.http.post("/categories/", category).await
    }
}

fn product_multipart(form: &ProductForm) -> MultipartForm {
    let mut multipart = form
        .text_fields()
        .into_iter()
        .fold(MultipartForm::new(), |acc, (name, value)| acc.text(name, value));
    if let Some(image) = &form.image {
        multipart = multipart.file("image", image.file_name.clone(), image.content.clone());
    }
    multipart
}
