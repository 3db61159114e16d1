//! Order financial calculations
//!
//! Pure aggregate functions over a storefront order record: subtotals,
//! discounts, fees, shipping, refunds and the various tax breakdowns.
//! Every function is total — malformed or missing input degrades to zero
//! so a partial order record can never break summary rendering.

pub mod model;
pub mod money;
pub mod totals;

pub use model::{CouponLine, FeeLine, LineItem, Order, Refund, ShippingLine, TaxEntry};
pub use money::{round_money, to_f64};
pub use totals::*;
