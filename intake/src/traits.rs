//! Service trait definitions for dependency injection
//!
//! Every backend call goes through one of these traits so the reconciler can
//! be exercised against mocks.

use async_trait::async_trait;

use shared::{
    Customer, DraftDetail, DraftItem, NewCustomer, ParsedLine, PriceTier, Product, ProductId,
    Session, Suggestion, Variant,
};
use crate::error::IntakeResult;

/// Order endpoints: parsing and the draft order
#[mockall::automock]
#[async_trait]
pub trait OrderService: Send + Sync {
    /// Parse free text into order lines
    async fn parse(&self, text: &str) -> IntakeResult<Vec<ParsedLine>>;

    /// Append items to the draft order in one call
    async fn add_draft_items(&self, items: Vec<DraftItem>) -> IntakeResult<()>;

    /// Finalize the draft into an emitted order
    async fn confirm_draft(&self) -> IntakeResult<serde_json::Value>;

    /// Fetch the persisted draft view
    async fn draft_detail(&self) -> IntakeResult<DraftDetail>;
}

/// Product catalog endpoints
#[mockall::automock]
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Fuzzy product lookup, best match first
    async fn suggest(&self, query: &str) -> IntakeResult<Vec<Suggestion>>;

    async fn list_products(&self) -> IntakeResult<Vec<Product>>;

    async fn list_variants(&self, product_id: ProductId) -> IntakeResult<Vec<Variant>>;

    async fn list_tiers(&self, product_id: ProductId) -> IntakeResult<Vec<PriceTier>>;
}

/// Customer endpoints
#[mockall::automock]
#[async_trait]
pub trait CustomerService: Send + Sync {
    async fn list_customers(&self) -> IntakeResult<Vec<Customer>>;

    async fn create_customer(&self, customer: NewCustomer) -> IntakeResult<Customer>;
}

/// Result of checking the stored token against the backend
#[derive(Debug, Clone, PartialEq)]
pub enum TokenStatus {
    /// Backend accepted the token
    Valid { user: Option<serde_json::Value> },
    /// No token, or the backend answered 401
    Invalid { reason: String },
    /// Verification failed for another reason; the token is kept
    Unverified { error: String },
}

impl TokenStatus {
    pub fn is_usable(&self) -> bool {
        !matches!(self, TokenStatus::Invalid { .. })
    }
}

/// Login and token verification
#[mockall::automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Sign in as admin, falling back to merchant
    async fn login(&self, email: &str, password: &str) -> IntakeResult<Session>;

    async fn verify(&self) -> IntakeResult<TokenStatus>;

    async fn logout(&self) -> IntakeResult<()>;
}

/// Persistence for the session between runs
#[mockall::automock]
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self) -> IntakeResult<Option<Session>>;

    async fn save(&self, session: &Session) -> IntakeResult<()>;

    async fn clear(&self) -> IntakeResult<()>;
}
