//! Shared types for the order intake client
//!
//! Contains the identifiers, wire messages and session context used by every
//! component that talks to the commerce backend.

pub mod errors;
pub mod logging;
pub mod messages;
pub mod session;
pub mod types;

pub use errors::*;
pub use session::{Session, SessionContext, SessionEvent};
pub use types::*;

pub use messages::{
    // Orders
    DraftDetail, DraftEntry, DraftItem, DraftItemsRequest, ParseRequest, ParseResponse,
    ParsedLine, Suggestion,

    // Catalog and customers
    Customer, NewCustomer, PriceTier, Product, Variant,

    // Auth and errors
    ApiErrorBody, LoginRequest, LoginResponse,
};
