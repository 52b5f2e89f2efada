// Authentication endpoints
//
// These only talk to the backend. Persisting the token and the cached user
// is the session layer's job.

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::types::{LoginRequest, LoginResponse, MessageResponse, RegisterRequest, User};

impl ApiClient {
    /// Exchange email and password for a bearer token.
    ///
    /// `POST /auth/login`
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, Error> {
        debug!(email, "logging in");
        let body = LoginRequest {
            email: email.to_owned(),
            password: password.to_owned(),
        };
        self.post("auth/login", &body).await
    }

    /// `POST /auth/logout`. The backend keeps no server-side session, so
    /// this only records the logout in the activity trail.
    pub async fn logout(&self) -> Result<MessageResponse, Error> {
        self.post_empty("auth/logout").await
    }

    /// The user owning the current token.
    ///
    /// `GET /auth/me`
    pub async fn me(&self) -> Result<User, Error> {
        self.get("auth/me").await
    }

    /// Create an account. Requires an admin token.
    ///
    /// `POST /auth/register`
    pub async fn register(&self, req: &RegisterRequest) -> Result<User, Error> {
        self.post("auth/register", req).await
    }
}
