//! Order aggregate calculations
//!
//! Every function here is a pure function of the order record: no mutation,
//! no caching, no side effects. Summation is exact `Decimal` arithmetic;
//! callers round with [`crate::money::round_money`] at the reporting
//! boundary. Lookups by id or index that find nothing return zero.

use crate::model::{LineItem, Order, TaxEntry};
use rust_decimal::Decimal;

fn find_item<'a>(order: &'a Order, item_id: u64) -> Option<&'a LineItem> {
    order.line_items.iter().find(|item| item.id == item_id)
}

fn sum_tax_totals(taxes: &[TaxEntry]) -> Decimal {
    taxes.iter().map(|tax| tax.total).sum()
}

/// Sum of each line item's pre-discount baseline price
pub fn subtotal(order: &Order) -> Decimal {
    order.line_items.iter().map(|item| item.subtotal).sum()
}

/// Baseline price of one line item: the pre-discount `subtotal` field when
/// it carries a value, else the post-discount `total`. Quantity never
/// multiplies into this — the result is invariant to the ordered quantity.
pub fn item_cost(order: &Order, item_id: u64) -> Decimal {
    match find_item(order, item_id) {
        Some(item) if !item.subtotal.is_zero() => item.subtotal,
        Some(item) => item.total,
        None => Decimal::ZERO,
    }
}

/// Total discount applied to the order
///
/// When the order exposes coupon lines, their discount amounts are summed
/// directly. Otherwise the discount is reconstructed from the per-item
/// delta between the pre-discount baseline and the post-discount total.
pub fn discount_total(order: &Order) -> Decimal {
    if !order.coupon_lines.is_empty() {
        order.coupon_lines.iter().map(|coupon| coupon.discount).sum()
    } else {
        order
            .line_items
            .iter()
            .map(|item| item.subtotal - item.total)
            .sum()
    }
}

/// Sum of shipping line totals
pub fn shipping_total(order: &Order) -> Decimal {
    order.shipping_lines.iter().map(|line| line.total).sum()
}

/// Sum of fee line totals
pub fn fee_total(order: &Order) -> Decimal {
    order.fee_lines.iter().map(|fee| fee.total).sum()
}

/// Sum of refund totals (refunds arrive already signed negative)
pub fn refund_total(order: &Order) -> Decimal {
    order.refunds.iter().map(|refund| refund.total).sum()
}

/// Grand total:
/// subtotal − discount + shipping + fees + tax + refunds
pub fn total(order: &Order) -> Decimal {
    subtotal(order) - discount_total(order)
        + shipping_total(order)
        + fee_total(order)
        + total_tax(order)
        + refund_total(order)
}

/// Sum of one line item's post-discount tax entries
pub fn line_item_tax(order: &Order, item_id: u64) -> Decimal {
    find_item(order, item_id)
        .map(|item| sum_tax_totals(&item.taxes))
        .unwrap_or_default()
}

/// Tax across all line items on the pre-discount (subtotal) basis
pub fn subtotal_tax(order: &Order) -> Decimal {
    order
        .line_items
        .iter()
        .flat_map(|item| item.taxes.iter())
        .map(|tax| tax.subtotal)
        .sum()
}

/// Tax across all line items on the post-discount basis, plus shipping and
/// fee tax
pub fn total_tax(order: &Order) -> Decimal {
    let line_tax: Decimal = order
        .line_items
        .iter()
        .map(|item| sum_tax_totals(&item.taxes))
        .sum();
    line_tax + shipping_tax(order) + fee_total_tax(order)
}

/// Portion of the line-item tax removed by the discount: pre-discount basis
/// minus post-discount line-item tax. Shipping and fee tax are excluded.
pub fn discount_tax(order: &Order) -> Decimal {
    let line_tax: Decimal = order
        .line_items
        .iter()
        .map(|item| sum_tax_totals(&item.taxes))
        .sum();
    subtotal_tax(order) - line_tax
}

/// Sum of shipping line tax entries
pub fn shipping_tax(order: &Order) -> Decimal {
    order
        .shipping_lines
        .iter()
        .map(|line| sum_tax_totals(&line.taxes))
        .sum()
}

/// Sum of one fee line's tax entries, addressed by index
pub fn fee_tax(order: &Order, fee_index: usize) -> Decimal {
    order
        .fee_lines
        .get(fee_index)
        .map(|fee| sum_tax_totals(&fee.taxes))
        .unwrap_or_default()
}

/// Sum of tax across all fee lines
pub fn fee_total_tax(order: &Order) -> Decimal {
    order
        .fee_lines
        .iter()
        .map(|fee| sum_tax_totals(&fee.taxes))
        .sum()
}
