//! HTTP client for the storefront REST API
//!
//! Every request carries `Authorization: Bearer <token>` when an access token
//! is persisted. A 401 on a request that has not been retried yet triggers
//! one refresh through `/auth/token/refresh/`:
//!
//! - refresh succeeds: the new token is persisted and the request is sent
//!   once more; that second response is the result;
//! - refresh fails, or there is no refresh token: the session is expired
//!   (state cleared, `SessionEvent::Expired` emitted) and the first 401
//!   is returned.
//!
//! The `retried` flag lives on the [`ApiRequest`] itself, so a request is
//! retried at most once however the retry turns out.

use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::client::{TokenRefreshRequest, TokenRefreshResponse};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::session::Session;

/// Token refresh endpoint
pub const TOKEN_REFRESH_PATH: &str = "/auth/token/refresh/";

// ============================================================================
// Request
// ============================================================================

/// One part of a multipart form
#[derive(Debug, Clone, PartialEq)]
pub enum FormPart {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        file_name: String,
        content: Vec<u8>,
    },
}

/// Owned multipart form; unlike `reqwest::multipart::Form` it can be sent twice
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultipartForm {
    parts: Vec<FormPart>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(FormPart::Text {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        content: Vec<u8>,
    ) -> Self {
        self.parts.push(FormPart::File {
            name: name.into(),
            file_name: file_name.into(),
            content,
        });
        self
    }

    pub fn parts(&self) -> &[FormPart] {
        &self.parts
    }

    fn to_reqwest(&self) -> ClientResult<reqwest::multipart::Form> {
        let mut form = reqwest::multipart::Form::new();
        for part in &self.parts {
            form = match part {
                FormPart::Text { name, value } => form.text(name.clone(), value.clone()),
                FormPart::File {
                    name,
                    file_name,
                    content,
                } => {
                    let mime = mime_guess::from_path(file_name).first_or_octet_stream();
                    let part = reqwest::multipart::Part::bytes(content.clone())
                        .file_name(file_name.clone())
                        .mime_str(mime.essence_str())?;
                    form.part(name.clone(), part)
                }
            };
        }
        Ok(form)
    }
}

/// Request body
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(Value),
    Multipart(MultipartForm),
}

/// A logical API request, kept so it can be resubmitted after a refresh
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Option<Value>,
    body: RequestBody,
    retried: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: None,
            body: RequestBody::Empty,
            retried: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attach a JSON body
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> ClientResult<Self> {
        self.body = RequestBody::Json(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Attach a multipart body
    pub fn multipart(mut self, form: MultipartForm) -> Self {
        self.body = RequestBody::Multipart(form);
        self
    }

    /// Attach query parameters (any struct or map of scalar values)
    pub fn query<Q: Serialize + ?Sized>(mut self, params: &Q) -> ClientResult<Self> {
        let Value::Object(map) = serde_json::to_value(params)? else {
            return Err(ClientError::Config(
                "query parameters must serialize to a map".into(),
            ));
        };
        self.query = (!map.is_empty()).then_some(Value::Object(map));
        Ok(self)
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn body(&self) -> &RequestBody {
        &self.body
    }

    /// Whether this request already went through the refresh-and-retry path
    pub fn is_retried(&self) -> bool {
        self.retried
    }
}

// ============================================================================
// Client
// ============================================================================

/// HTTP client for making requests to the storefront backend
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    login_route: String,
    session: Session,
}

impl HttpClient {
    /// Create a new HTTP client from configuration
    pub fn new(config: &ClientConfig, session: Session) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout_duration())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            login_route: config.login_route.clone(),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Sends the request once, with `token` as bearer if given. Any status is
    /// returned as-is.
    async fn send(&self, request: &ApiRequest, token: Option<&str>) -> ClientResult<reqwest::Response> {
        let mut req = self
            .client
            .request(request.method.clone(), self.url(&request.path));

        if let Some(token) = token {
            req = req.header(AUTHORIZATION, format!("Bearer {}", token));
        }
        if let Some(query) = &request.query {
            req = req.query(query);
        }
        req = match &request.body {
            RequestBody::Empty => req,
            RequestBody::Json(body) => req.json(body),
            RequestBody::Multipart(form) => req.multipart(form.to_reqwest()?),
        };

        tracing::debug!("{} {}", request.method, request.path);
        Ok(req.send().await?)
    }

    /// Execute a request, applying the refresh-and-retry flow on 401.
    ///
    /// Returns the successful response; any non-success status becomes a
    /// [`ClientError`].
    pub async fn execute(&self, mut request: ApiRequest) -> ClientResult<reqwest::Response> {
        let token = self.session.persisted_access_token();
        let response = self.send(&request, token.as_deref()).await?;

        if response.status() == StatusCode::UNAUTHORIZED && !request.retried {
            request.retried = true;

            match self.refresh_access_token().await {
                Ok(new_token) => {
                    tracing::debug!("Retrying {} {} with refreshed token", request.method, request.path);
                    let retry = self.send(&request, Some(&new_token)).await?;
                    return Self::check(retry).await;
                }
                Err(e) => {
                    tracing::warn!("Token refresh failed: {}", e);
                    self.session.expire(&self.login_route);
                }
            }
        }

        Self::check(response).await
    }

    /// Exchange the persisted refresh token for a new access token and
    /// persist it. Goes straight to the backend, without the retry flow.
    async fn refresh_access_token(&self) -> ClientResult<String> {
        let refresh = self
            .session
            .persisted_refresh_token()
            .ok_or_else(|| ClientError::Config("no refresh token stored".into()))?;

        let response = self
            .client
            .post(self.url(TOKEN_REFRESH_PATH))
            .json(&TokenRefreshRequest { refresh })
            .send()
            .await?;
        let refreshed: TokenRefreshResponse = Self::check(response).await?.json().await?;

        self.session.update_access_token(&refreshed.access)?;
        tracing::info!("Access token refreshed");
        Ok(refreshed.access)
    }

    /// Turn a non-success status into an error
    async fn check(response: reqwest::Response) -> ClientResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let text = response.text().await?;
        Err(ClientError::from_status(status, &text))
    }

    /// Execute and decode a JSON response
    pub async fn request<T: DeserializeOwned>(&self, request: ApiRequest) -> ClientResult<T> {
        let path = request.path.clone();
        let bytes = self.execute(request).await?.bytes().await?;
        serde_json::from_slice(&bytes)
            .map_err(|e| ClientError::InvalidResponse(format!("{}: {}", path, e)))
    }

    /// Execute and discard the response body
    pub async fn request_empty(&self, request: ApiRequest) -> ClientResult<()> {
        self.execute(request).await?;
        Ok(())
    }

    // ========== Shorthands ==========

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.request(ApiRequest::get(path)).await
    }

    /// Make a GET request with query parameters
    pub async fn get_with_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> ClientResult<T> {
        self.request(ApiRequest::get(path).query(query)?).await
    }

    /// Make a POST request with JSON body
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        self.request(ApiRequest::post(path).json(body)?).await
    }

    /// Make a PUT request with JSON body
    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        self.request(ApiRequest::put(path).json(body)?).await
    }

    /// Make a PATCH request with JSON body
    pub async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        self.request(ApiRequest::patch(path).json(body)?).await
    }

    /// Make a DELETE request
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.request(ApiRequest::delete(path)).await
    }
}
