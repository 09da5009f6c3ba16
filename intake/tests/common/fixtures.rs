//! Test fixtures and data for intake tests

use std::str::FromStr;

use rust_decimal::Decimal;

use shared::{
    ChargedUnit, Customer, CustomerId, DraftDetail, DraftEntry, LineIndex, MatchStatus, ParsedLine,
    PriceTier, Product, ProductId, Suggestion, Unit, Variant, VariantId,
};

/// Standard test data
pub struct TestFixtures;

impl TestFixtures {
    pub const ORDER_TEXT: &'static str = "2 kg palta hass\n3 un lechuga\n1/2 kilo tomate";
    pub const CUSTOMER: &'static str = "Ana";
    pub const TOKEN: &'static str = "test-token";

    pub fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    pub fn suggestion(id: i64, name: &str, score: f64) -> Suggestion {
        Suggestion {
            id: ProductId(id),
            name: name.to_string(),
            score,
        }
    }

    /// Line the parser matched exactly to a catalog product
    pub fn exact_line(index: u32, product_id: i64, product: &str, qty: &str, unit: Unit) -> ParsedLine {
        ParsedLine {
            line_index: LineIndex(index),
            raw_text: format!("{qty} {unit} {product}"),
            product: product.to_string(),
            product_id: Some(ProductId(product_id)),
            qty: Self::dec(qty),
            unit,
            match_status: MatchStatus::Exact,
            suggestions: vec![],
            notes: None,
        }
    }

    /// Line the parser could only match loosely
    pub fn similar_line(index: u32, product: &str, suggestions: Vec<Suggestion>) -> ParsedLine {
        ParsedLine {
            line_index: LineIndex(index),
            raw_text: format!("1 kg {product}"),
            product: product.to_string(),
            product_id: None,
            qty: Decimal::ONE,
            unit: Unit::Kg,
            match_status: MatchStatus::Similar,
            suggestions,
            notes: None,
        }
    }

    /// Line with no candidate at all
    pub fn unmatched_line(index: u32, product: &str) -> ParsedLine {
        ParsedLine {
            match_status: MatchStatus::Unmatched,
            ..Self::similar_line(index, product, vec![])
        }
    }

    /// Lines 0..count, all exact matches
    pub fn exact_lines(count: u32) -> Vec<ParsedLine> {
        (0..count)
            .map(|i| Self::exact_line(i, 100 + i as i64, &format!("producto {i}"), "1", Unit::Kg))
            .collect()
    }

    pub fn product(id: i64, name: &str, default_unit: Option<ChargedUnit>) -> Product {
        Product {
            id: ProductId(id),
            name: name.to_string(),
            default_unit,
            sale_price: None,
        }
    }

    pub fn variant(id: i64, product_id: i64, label: &str) -> Variant {
        Variant {
            id: VariantId(id),
            product_id: Some(ProductId(product_id)),
            label: label.to_string(),
        }
    }

    pub fn tier(variant_id: Option<i64>, unit: ChargedUnit, min_qty: &str, price: &str) -> PriceTier {
        PriceTier {
            product_id: None,
            variant_id: variant_id.map(VariantId),
            unit,
            min_qty: Self::dec(min_qty),
            sale_price: Self::dec(price),
        }
    }

    pub fn customer(id: i64, name: &str) -> Customer {
        Customer {
            id: CustomerId(id),
            name: name.to_string(),
            phone: None,
            email: None,
        }
    }

    pub fn draft_with(entries: &[(&str, &str)]) -> DraftDetail {
        DraftDetail {
            items: entries
                .iter()
                .enumerate()
                .map(|(i, (customer, product))| DraftEntry {
                    id: Some(i as i64 + 1),
                    customer_name: Some(customer.to_string()),
                    product_id: None,
                    product_name: Some(product.to_string()),
                    qty: Some(Decimal::ONE),
                    unit: Some(Unit::Kg),
                    notes: None,
                })
                .collect(),
            group_by_product: vec![],
        }
    }
}
