//! Tier pricing in the charged unit

use rust_decimal::Decimal;

use shared::{ChargedUnit, PriceTier, Variant, VariantId};

/// Sale price per charged unit for `qty`.
///
/// Only tiers billed in `unit` for the same variant qualify; the one with the
/// highest `min_qty` not above `qty` wins.
pub fn tier_price(
    tiers: &[PriceTier],
    unit: ChargedUnit,
    variant: Option<VariantId>,
    qty: Decimal,
) -> Option<Decimal> {
    tiers
        .iter()
        .filter(|t| t.unit == unit && t.variant_id == variant)
        .filter(|t| qty >= t.min_qty)
        .max_by(|a, b| a.min_qty.cmp(&b.min_qty))
        .map(|t| t.sale_price)
}

/// Variant whose label matches the house label, ignoring case
pub fn house_variant(variants: &[Variant], label: &str) -> Option<VariantId> {
    variants
        .iter()
        .find(|v| v.label.trim().eq_ignore_ascii_case(label))
        .map(|v| v.id)
}
