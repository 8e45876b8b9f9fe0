//! `/auth/*` endpoints

use shared::client::{TokenRefreshRequest, TokenRefreshResponse};
use shared::{AuthResponse, LoginRequest, ProfileUpdate, RegisterRequest, UserProfile};

use crate::error::ClientResult;
use crate::http::{HttpClient, TOKEN_REFRESH_PATH};

#[derive(Debug, Clone)]
pub struct AuthService {
    http: HttpClient,
}

impl AuthService {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Login with email and password
    pub async fn login(&self, credentials: &LoginRequest) -> ClientResult<AuthResponse> {
        self.http.post("/auth/login/", credentials).await
    }

    /// Create an account; the backend logs the new user in
    pub async fn register(&self, user_data: &RegisterRequest) -> ClientResult<AuthResponse> {
        self.http.post("/auth/register/", user_data).await
    }

    /// Get current user information
    pub async fn get_profile(&self) -> ClientResult<UserProfile> {
        self.http.get("/auth/profile/").await
    }

    pub async fn update_profile(&self, user_data: &ProfileUpdate) -> ClientResult<UserProfile> {
        self.http.put("/auth/profile/", user_data).await
    }

    /// Exchange a refresh token for a new access token.
    ///
    /// The automatic refresh in [`HttpClient`] does not go through here.
    pub async fn refresh_token(&self, refresh: &str) -> ClientResult<TokenRefreshResponse> {
        let body = TokenRefreshRequest {
            refresh: refresh.to_string(),
        };
        self.http.post(TOKEN_REFRESH_PATH, &body).await
    }
}
