//! Login and token verification against the backend

use std::sync::Arc;

use async_trait::async_trait;

use shared::{LoginRequest, LoginResponse, Session, UserType};
use crate::error::{IntakeError, IntakeResult};
use crate::services::api_client::RealApiClient;
use crate::traits::{AuthService, SessionStore, TokenStatus};

pub struct RealAuthService<S: SessionStore> {
    api: RealApiClient,
    store: Arc<S>,
}

impl<S: SessionStore> RealAuthService<S> {
    pub fn new(api: RealApiClient, store: Arc<S>) -> Self {
        Self { api, store }
    }

    /// Restore a persisted session into the client's context
    pub async fn restore(&self) -> IntakeResult<bool> {
        match self.store.load().await? {
            Some(session) => {
                self.api.session().sign_in(session).await;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn try_login(&self, path: &str, request: &LoginRequest) -> IntakeResult<LoginResponse> {
        self.api.post(path, request).await
    }
}

#[async_trait]
impl<S: SessionStore> AuthService for RealAuthService<S> {
    async fn login(&self, email: &str, password: &str) -> IntakeResult<Session> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        let (response, user_type) = match self.try_login("/login", &request).await {
            Ok(response) => (response, UserType::Admin),
            Err(admin_error) => {
                tracing::debug!("Admin login rejected, trying merchant: {}", admin_error);
                match self.try_login("/merchant/auth/login", &request).await {
                    Ok(response) => (response, UserType::Merchant),
                    Err(merchant_error) => {
                        tracing::debug!("Merchant login rejected: {}", merchant_error);
                        return Err(IntakeError::validation("Invalid credentials"));
                    }
                }
            }
        };

        let session = Session::new(response.token, user_type).with_user(response.user);
        self.store.save(&session).await?;
        self.api.session().sign_in(session.clone()).await;
        Ok(session)
    }

    async fn verify(&self) -> IntakeResult<TokenStatus> {
        let session = self.api.session();
        if session.token().await.is_none() {
            return Ok(TokenStatus::Invalid { reason: "No token".to_string() });
        }

        let result = match session.user_type().await {
            UserType::Merchant => self.api.get::<serde_json::Value>("/merchant/auth/me").await,
            UserType::Admin => self
                .api
                .get::<serde_json::Value>("/verify")
                .await
                .map(|body| body.get("user").cloned().unwrap_or(serde_json::Value::Null)),
        };

        Ok(match result {
            Ok(user) => TokenStatus::Valid { user: Some(user).filter(|u| !u.is_null()) },
            Err(e) if e.status() == Some(401) => TokenStatus::Invalid { reason: "Invalid token".to_string() },
            Err(e) => TokenStatus::Unverified { error: e.to_string() },
        })
    }

    async fn logout(&self) -> IntakeResult<()> {
        self.store.clear().await?;
        self.api.session().sign_out().await;
        Ok(())
    }
}
