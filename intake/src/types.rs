//! Intake-specific data types

use std::collections::HashMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use shared::{
    ChargedUnit, Customer, DraftDetail, DraftItem, LineIndex, MatchStatus, ParsedLine, PriceTier,
    Product, ProductId, Suggestion, Unit, VariantId,
};

use crate::error::{IntakeError, IntakeResult};

/// One parsed order line being reconciled
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub line_index: LineIndex,
    pub raw_text: String,
    pub product: String,
    pub product_id: Option<ProductId>,
    pub qty: Decimal,
    pub unit: Unit,
    pub match_status: MatchStatus,
    pub suggestions: Vec<Suggestion>,

    // Set only when the operator defines a new product
    pub create_if_missing: bool,
    pub sale_price: Option<Decimal>,
    pub default_unit: Option<ChargedUnit>,

    pub customer: String,
    pub notes: Option<String>,

    // Pricing
    pub variant_id: Option<VariantId>,
    pub sale_unit_price: Option<Decimal>,
    pub manual_price: bool,
}

impl From<ParsedLine> for OrderLine {
    fn from(parsed: ParsedLine) -> Self {
        Self {
            line_index: parsed.line_index,
            raw_text: parsed.raw_text,
            product: parsed.product,
            product_id: parsed.product_id,
            qty: parsed.qty,
            unit: parsed.unit,
            match_status: parsed.match_status,
            suggestions: parsed.suggestions,
            create_if_missing: false,
            sale_price: None,
            default_unit: None,
            customer: String::new(),
            notes: parsed.notes,
            variant_id: None,
            sale_unit_price: None,
            manual_price: false,
        }
    }
}

impl OrderLine {
    pub fn is_resolved(&self) -> bool {
        self.match_status.is_exact()
    }

    pub fn has_customer(&self) -> bool {
        !self.customer.trim().is_empty()
    }

    /// Reason this line blocks submission, unresolved taking precedence
    pub fn missing(&self) -> Option<MissingReason> {
        if !self.is_resolved() {
            Some(MissingReason::Unresolved)
        } else if !self.has_customer() {
            Some(MissingReason::NoCustomer)
        } else {
            None
        }
    }

    /// Apply an already validated resolution
    pub fn apply(&mut self, resolution: Resolution) {
        match resolution {
            Resolution::Existing { product_id, product_name } => {
                if self.product_id != Some(product_id) {
                    self.variant_id = None;
                }
                self.product_id = Some(product_id);
                if let Some(name) = product_name.filter(|n| !n.trim().is_empty()) {
                    self.product = name;
                }
                self.create_if_missing = false;
                self.sale_price = None;
                self.default_unit = None;
                if !self.manual_price {
                    self.sale_unit_price = None;
                }
            }
            Resolution::Create { product_name, sale_price, default_unit } => {
                if let Some(name) = product_name.filter(|n| !n.trim().is_empty()) {
                    self.product = name;
                }
                self.product_id = None;
                self.variant_id = None;
                self.create_if_missing = true;
                self.sale_price = sale_price;
                self.sale_unit_price = sale_price;
                self.default_unit = Some(default_unit.unwrap_or_default());
            }
        }
        self.match_status = MatchStatus::Exact;
    }

    /// Unit the line will be billed in.
    ///
    /// A cached catalog product's default unit wins, then the unit chosen for
    /// a new product, then the unit the customer ordered in.
    pub fn charged_unit(&self, catalog: &HashMap<ProductId, Product>) -> ChargedUnit {
        self.product_id
            .and_then(|id| catalog.get(&id))
            .and_then(|product| product.default_unit)
            .or(self.default_unit)
            .unwrap_or_else(|| self.unit.charged())
    }

    pub fn to_draft_item(&self, charged_unit: ChargedUnit) -> DraftItem {
        DraftItem {
            customer: self.customer.trim().to_string(),
            product: self.product.clone(),
            qty: self.qty,
            unit: self.unit,
            notes: self.notes.clone(),
            variant_id: self.variant_id,
            sale_unit_price: self.sale_unit_price,
            product_id: self.product_id,
            create_if_missing: self.create_if_missing,
            sale_price: self.sale_price,
            line_index: self.line_index,
            default_unit: self.default_unit,
            charged_unit,
        }
    }
}

/// Operator decision for an unmatched or similar line
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Bind to an existing catalog product
    Existing {
        product_id: ProductId,
        product_name: Option<String>,
    },
    /// Create the product when the batch is submitted
    Create {
        product_name: Option<String>,
        sale_price: Option<Decimal>,
        default_unit: Option<ChargedUnit>,
    },
}

impl Resolution {
    pub fn existing(product_id: ProductId, product_name: impl Into<String>) -> Self {
        Resolution::Existing {
            product_id,
            product_name: Some(product_name.into()),
        }
    }

    pub fn create(product_name: impl Into<String>, sale_price: Decimal, default_unit: ChargedUnit) -> Self {
        Resolution::Create {
            product_name: Some(product_name.into()),
            sale_price: Some(sale_price),
            default_unit: Some(default_unit),
        }
    }

    pub fn validate(&self) -> IntakeResult<()> {
        match self {
            Resolution::Existing { .. } => Ok(()),
            Resolution::Create { sale_price, .. } => match sale_price {
                Some(price) if *price > Decimal::ZERO => Ok(()),
                _ => Err(IntakeError::validation("Enter a sale price greater than zero for the new product")),
            },
        }
    }
}

impl From<&Suggestion> for Resolution {
    fn from(suggestion: &Suggestion) -> Self {
        Resolution::Existing {
            product_id: suggestion.id,
            product_name: Some(suggestion.name.clone()),
        }
    }
}

/// Why a line cannot be submitted yet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingReason {
    Unresolved,
    NoCustomer,
}

impl fmt::Display for MissingReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingReason::Unresolved => write!(f, "unresolved"),
            MissingReason::NoCustomer => write!(f, "without customer"),
        }
    }
}

/// Target of a newly created customer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerAssignment {
    None,
    AllLines,
    Line(LineIndex),
}

/// Live suggestions for one line with the generation of the latest query
#[derive(Debug, Clone, Default)]
pub struct LiveSuggestions {
    pub generation: u64,
    pub items: Vec<Suggestion>,
}

/// Outcome of a successful submission
#[derive(Debug, Clone)]
pub struct SubmitReceipt {
    pub submitted: usize,
    pub draft: Option<DraftDetail>,
}

/// In-memory reconciliation state for one batch plus the caches it relies on
#[derive(Debug, Default)]
pub struct BatchState {
    pub lines: Vec<OrderLine>,
    pub live_suggestions: HashMap<LineIndex, LiveSuggestions>,
    pub catalog: HashMap<ProductId, Product>,
    pub variants: HashMap<ProductId, Vec<shared::Variant>>,
    pub tiers: HashMap<ProductId, Vec<PriceTier>>,
    pub customers: Vec<Customer>,
    pub draft: Option<DraftDetail>,
}

impl BatchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(&self, line: LineIndex) -> Option<&OrderLine> {
        self.lines.iter().find(|l| l.line_index == line)
    }

    pub fn line_mut(&mut self, line: LineIndex) -> IntakeResult<&mut OrderLine> {
        self.lines
            .iter_mut()
            .find(|l| l.line_index == line)
            .ok_or(IntakeError::LineNotFound { line })
    }

    pub fn contains(&self, line: LineIndex) -> bool {
        self.line(line).is_some()
    }

    /// Lines blocking submission, in batch order
    pub fn missing(&self) -> Vec<(LineIndex, MissingReason)> {
        self.lines
            .iter()
            .filter_map(|l| l.missing().map(|reason| (l.line_index, reason)))
            .collect()
    }

    /// Drop the batch and its per-line suggestions; caches are kept
    pub fn clear_batch(&mut self) {
        self.lines.clear();
        self.live_suggestions.clear();
    }
}
