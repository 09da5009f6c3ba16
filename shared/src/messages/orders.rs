//! Order intake wire messages
//!
//! Bodies exchanged with the `/orders/*` endpoints of the backend.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::null_as_default;
use crate::types::{ChargedUnit, LineIndex, MatchStatus, ProductId, Unit, VariantId};

/// Body of `POST /orders/parse`
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ParseRequest {
    pub text: String,
}

/// Response of `POST /orders/parse`
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct ParseResponse {
    #[serde(default)]
    pub items: Vec<ParsedLine>,
}

/// Ranked product candidate, highest confidence first
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Suggestion {
    #[serde(alias = "product_id")]
    pub id: ProductId,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub score: f64,
}

/// One line as returned by the order parser
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ParsedLine {
    #[serde(alias = "index")]
    pub line_index: LineIndex,
    #[serde(default, deserialize_with = "null_as_default", alias = "raw", alias = "rawText")]
    pub raw_text: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub product: String,
    #[serde(default)]
    pub product_id: Option<ProductId>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub qty: Decimal,
    #[serde(default, deserialize_with = "null_as_default")]
    pub unit: Unit,
    pub match_status: MatchStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub suggestions: Vec<Suggestion>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// One item of `POST /orders/draft/items`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DraftItem {
    pub customer: String,
    pub product: String,
    pub qty: Decimal,
    pub unit: Unit,
    pub notes: Option<String>,
    pub variant_id: Option<VariantId>,
    pub sale_unit_price: Option<Decimal>,
    pub product_id: Option<ProductId>,
    pub create_if_missing: bool,
    pub sale_price: Option<Decimal>,
    pub line_index: LineIndex,
    pub default_unit: Option<ChargedUnit>,
    pub charged_unit: ChargedUnit,
}

/// Body of `POST /orders/draft/items`
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct DraftItemsRequest {
    pub items: Vec<DraftItem>,
}

/// Persisted draft line as rendered by `GET /orders/draft/detail`
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct DraftEntry {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub product_id: Option<ProductId>,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub qty: Option<Decimal>,
    #[serde(default)]
    pub unit: Option<Unit>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl DraftEntry {
    pub fn display_product(&self) -> String {
        match (&self.product_name, self.product_id) {
            (Some(name), _) => name.clone(),
            (None, Some(id)) => format!("Product #{id}"),
            (None, None) => "Unknown product".to_string(),
        }
    }
}

/// Per-product totals in the draft, keyed by unit
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct DraftTotals {
    #[serde(default)]
    pub kg: Option<Decimal>,
    #[serde(default)]
    pub unit: Option<Decimal>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct DraftProductGroup {
    pub product_id: ProductId,
    #[serde(default)]
    pub totals: DraftTotals,
}

/// Response of `GET /orders/draft/detail`
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct DraftDetail {
    #[serde(default)]
    pub items: Vec<DraftEntry>,
    #[serde(default)]
    pub group_by_product: Vec<DraftProductGroup>,
}
