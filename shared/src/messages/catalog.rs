//! Catalog and customer wire messages

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::null_as_default;
use crate::types::{ChargedUnit, CustomerId, ProductId, VariantId};

/// Catalog product as listed by `GET /products`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub default_unit: Option<ChargedUnit>,
    #[serde(default)]
    pub sale_price: Option<Decimal>,
}

/// Product variant as listed by `GET /variants?product_id=`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Variant {
    pub id: VariantId,
    #[serde(default)]
    pub product_id: Option<ProductId>,
    #[serde(default)]
    pub label: String,
}

/// Quantity price tier as listed by `GET /variants/tiers?product_id=`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PriceTier {
    #[serde(default)]
    pub product_id: Option<ProductId>,
    #[serde(default)]
    pub variant_id: Option<VariantId>,
    /// Missing or null units are billed by the kilo
    #[serde(default, deserialize_with = "null_as_default")]
    pub unit: ChargedUnit,
    #[serde(default, deserialize_with = "null_as_default")]
    pub min_qty: Decimal,
    pub sale_price: Decimal,
}

/// Customer as listed by `GET /customers`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Body of `POST /customers`
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct NewCustomer {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rut: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferences: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl NewCustomer {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}
