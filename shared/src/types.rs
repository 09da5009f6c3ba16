//! Core shared types and identifiers

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::errors::SharedError;

/// Catalog product identifier assigned by the backend
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub i64);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ProductId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Product variant identifier (e.g. a brand or quality grade of a product)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariantId(pub i64);

impl fmt::Display for VariantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Customer identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(pub i64);

/// Stable identity of a parsed line within one batch.
///
/// Assigned by the parse response and never reassigned or reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineIndex(pub u32);

impl fmt::Display for LineIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u32> for LineIndex {
    fn from(index: u32) -> Self {
        Self(index)
    }
}

/// Unique identifier for session subscribers
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriberId(Uuid);

impl SubscriberId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SubscriberId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unit an order quantity was expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    Kg,
    Unit,
    G,
}

impl Unit {
    /// Billing unit implied by this input unit. Grams are billed by the kilo.
    pub fn charged(self) -> ChargedUnit {
        match self {
            Unit::Kg | Unit::G => ChargedUnit::Kg,
            Unit::Unit => ChargedUnit::Unit,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unit::Kg => write!(f, "kg"),
            Unit::Unit => write!(f, "unit"),
            Unit::G => write!(f, "g"),
        }
    }
}

impl std::str::FromStr for Unit {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "kg" => Ok(Unit::Kg),
            "unit" | "u" | "un" => Ok(Unit::Unit),
            "g" | "gr" => Ok(Unit::G),
            _ => Err(SharedError::InvalidValue {
                field: "unit".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Unit a product is actually billed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChargedUnit {
    #[default]
    Kg,
    Unit,
}

impl From<ChargedUnit> for Unit {
    fn from(unit: ChargedUnit) -> Self {
        match unit {
            ChargedUnit::Kg => Unit::Kg,
            ChargedUnit::Unit => Unit::Unit,
        }
    }
}

impl fmt::Display for ChargedUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Unit::from(*self).fmt(f)
    }
}

impl std::str::FromStr for ChargedUnit {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<Unit>()? {
            Unit::Kg => Ok(ChargedUnit::Kg),
            Unit::Unit => Ok(ChargedUnit::Unit),
            Unit::G => Err(SharedError::InvalidValue {
                field: "default_unit".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Confidence with which the parser bound a line to a catalog product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Exact,
    Similar,
    #[serde(rename = "none")]
    Unmatched,
}

impl MatchStatus {
    pub fn is_exact(self) -> bool {
        self == MatchStatus::Exact
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchStatus::Exact => write!(f, "exact"),
            MatchStatus::Similar => write!(f, "similar"),
            MatchStatus::Unmatched => write!(f, "none"),
        }
    }
}

/// Kind of account a session token belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    #[default]
    Admin,
    Merchant,
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserType::Admin => write!(f, "admin"),
            UserType::Merchant => write!(f, "merchant"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_status_wire_names() {
        let status: MatchStatus = serde_json::from_str("\"none\"").unwrap();
        assert_eq!(status, MatchStatus::Unmatched);
        assert_eq!(serde_json::to_string(&MatchStatus::Similar).unwrap(), "\"similar\"");
        assert!(MatchStatus::Exact.is_exact());
    }

    #[test]
    fn test_grams_are_charged_by_kilo() {
        assert_eq!(Unit::G.charged(), ChargedUnit::Kg);
        assert_eq!(Unit::Unit.charged(), ChargedUnit::Unit);
    }

    #[test]
    fn test_charged_unit_rejects_grams() {
        assert!("g".parse::<ChargedUnit>().is_err());
        assert_eq!("UNIT".parse::<ChargedUnit>().unwrap(), ChargedUnit::Unit);
    }

    #[test]
    fn test_line_index_display() {
        assert_eq!(LineIndex(3).to_string(), "#3");
    }
}
