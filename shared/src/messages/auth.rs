//! Authentication wire messages

use serde::{Deserialize, Serialize};

/// Body of `POST /login` and `POST /merchant/auth/login`
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub user: Option<serde_json::Value>,
}

/// Body of a non-2xx backend response
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}

impl ApiErrorBody {
    /// Operator-facing message, preferring `error` over `message`
    pub fn summary(&self) -> Option<&str> {
        self.error.as_deref().or(self.message.as_deref())
    }
}
