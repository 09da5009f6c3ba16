//! Wire messages for the backend REST API
//!
//! Organized by endpoint family:
//! - `orders`: parsing, draft items and the draft view
//! - `catalog`: products, variants, price tiers and customers
//! - `auth`: login and error bodies

pub mod auth;
pub mod catalog;
pub mod orders;

use serde::{Deserialize, Deserializer};

pub use auth::{ApiErrorBody, LoginRequest, LoginResponse};

pub use catalog::{Customer, NewCustomer, PriceTier, Product, Variant};

pub use orders::{
    DraftDetail, DraftEntry, DraftItem, DraftItemsRequest, DraftProductGroup, DraftTotals,
    ParseRequest, ParseResponse, ParsedLine, Suggestion,
};

/// Decode an explicit `null` like a missing key
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
