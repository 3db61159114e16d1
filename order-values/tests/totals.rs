// order-values/tests/totals.rs
// Regression values for the order aggregate functions, checked against
// fixture order records in the storefront API shape.

use order_values::*;
use rust_decimal::Decimal;

fn dec(value: &str) -> Decimal {
    value.parse().unwrap()
}

fn order_with_tax() -> Order {
    serde_json::from_str(include_str!("fixtures/order.json")).unwrap()
}

fn order_no_tax() -> Order {
    serde_json::from_str(include_str!("fixtures/order-no-tax.json")).unwrap()
}

fn order_with_coupons() -> Order {
    serde_json::from_str(include_str!("fixtures/order-with-coupons.json")).unwrap()
}

fn order_with_refunds() -> Order {
    serde_json::from_str(include_str!("fixtures/order-with-refunds.json")).unwrap()
}

#[test]
fn subtotal_sums_item_baselines() {
    assert_eq!(subtotal(&order_with_tax()), dec("67.98"));
    assert_eq!(subtotal(&order_with_coupons()), dec("81.97"));
    assert_eq!(subtotal(&Order::default()), Decimal::ZERO);
}

#[test]
fn item_cost_reads_the_baseline_price() {
    assert_eq!(item_cost(&order_with_tax(), 15), dec("49.99"));
    assert_eq!(item_cost(&order_with_tax(), 19), dec("17.99"));
    // Quantity 2 on this item — the cost is still the baseline field
    assert_eq!(item_cost(&order_with_coupons(), 26), dec("31.98"));
    assert_eq!(item_cost(&order_no_tax(), 2), Decimal::ZERO);
}

#[test]
fn discount_total_regressions() {
    assert_eq!(discount_total(&order_with_refunds()), dec("15"));
    assert_eq!(discount_total(&order_with_coupons()), dec("22.3"));
    assert_eq!(discount_total(&order_no_tax()), Decimal::ZERO);
}

#[test]
fn refund_total_regressions() {
    assert_eq!(refund_total(&order_with_refunds()), dec("-25.00"));
    assert_eq!(refund_total(&order_no_tax()), Decimal::ZERO);
}

#[test]
fn shipping_and_fee_totals() {
    assert_eq!(shipping_total(&order_with_tax()), dec("10"));
    assert_eq!(shipping_total(&order_no_tax()), Decimal::ZERO);
    assert_eq!(fee_total(&order_with_tax()), dec("1.53"));
    assert_eq!(fee_total(&order_with_coupons()), dec("15"));
    assert_eq!(fee_total(&order_no_tax()), dec("20"));
}

#[test]
fn line_item_tax_regressions() {
    assert_eq!(line_item_tax(&order_with_tax(), 15), dec("5.3964"));
    assert_eq!(line_item_tax(&order_with_tax(), 19), dec("1.1424"));
    assert_eq!(line_item_tax(&order_no_tax(), 1), Decimal::ZERO);
}

#[test]
fn subtotal_tax_regressions() {
    assert_eq!(subtotal_tax(&order_with_tax()), dec("7.4888"));
    assert_eq!(subtotal_tax(&order_with_coupons()), dec("3.7893"));
    assert_eq!(subtotal_tax(&order_no_tax()), Decimal::ZERO);
}

#[test]
fn total_tax_regressions() {
    assert_eq!(total_tax(&order_with_tax()), dec("7.3"));
    assert_eq!(total_tax(&order_with_coupons()), dec("5.3618"));
    assert_eq!(total_tax(&order_no_tax()), Decimal::ZERO);
}

#[test]
fn discount_tax_regressions() {
    assert_eq!(discount_tax(&order_with_tax()), dec("0.95"));
    assert_eq!(discount_tax(&order_no_tax()), Decimal::ZERO);
}

#[test]
fn shipping_tax_regressions() {
    assert_eq!(shipping_tax(&order_with_tax()), dec("0.635"));
    assert_eq!(shipping_tax(&order_with_coupons()), dec("0.635"));
    assert_eq!(shipping_tax(&order_no_tax()), Decimal::ZERO);
}

#[test]
fn fee_tax_regressions() {
    assert_eq!(fee_tax(&order_with_tax(), 0), dec("0.1262"));
    assert_eq!(fee_tax(&order_with_coupons(), 1), dec("0.625"));
    assert_eq!(fee_tax(&order_no_tax(), 0), Decimal::ZERO);
    assert_eq!(fee_total_tax(&order_with_tax()), dec("0.1262"));
    assert_eq!(fee_total_tax(&order_with_coupons()), dec("0.9375"));
}

#[test]
fn total_regressions() {
    assert_eq!(round_money(total(&order_with_tax())).to_string(), "81.81");
    assert_eq!(
        round_money(total(&order_with_coupons())).to_string(),
        "59.67"
    );
    assert_eq!(total(&Order::default()), Decimal::ZERO);
}

#[test]
fn total_reconstruction_identity_holds_on_all_fixtures() {
    for order in [
        order_with_tax(),
        order_no_tax(),
        order_with_coupons(),
        order_with_refunds(),
    ] {
        let reconstructed = subtotal(&order) - discount_total(&order)
            + shipping_total(&order)
            + fee_total(&order)
            + total_tax(&order)
            + refund_total(&order);
        assert_eq!(total(&order), reconstructed);
    }
}
