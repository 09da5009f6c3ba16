//! Service implementations
//!
//! Real implementations of all service traits for production use

pub mod api_client;
pub mod auth_service;
pub mod catalog_service;
pub mod customer_service;
pub mod order_service;
pub mod pricing;
pub mod session_store;
pub mod suggestion_debouncer;

// Re-export service implementations
pub use api_client::RealApiClient;
pub use auth_service::RealAuthService;
pub use catalog_service::RealCatalogService;
pub use customer_service::RealCustomerService;
pub use order_service::RealOrderService;
pub use session_store::FileSessionStore;
pub use suggestion_debouncer::SuggestionDebouncer;
