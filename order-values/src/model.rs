//! Order record model
//!
//! Mirrors the storefront REST order shape. Monetary fields arrive as
//! strings or numbers depending on the API version, and legacy records may
//! omit whole sections, so every money field decodes through a
//! zero-coalescing deserializer and every sequence defaults to empty.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};

/// An order record as supplied by the storefront API. Read-only input.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Order {
    #[serde(default)]
    pub line_items: Vec<LineItem>,
    #[serde(default)]
    pub coupon_lines: Vec<CouponLine>,
    #[serde(default)]
    pub fee_lines: Vec<FeeLine>,
    #[serde(default)]
    pub shipping_lines: Vec<ShippingLine>,
    #[serde(default)]
    pub refunds: Vec<Refund>,
}

/// One product entry within an order
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LineItem {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub quantity: u32,
    /// Pre-discount baseline price
    #[serde(default, deserialize_with = "money")]
    pub subtotal: Decimal,
    /// Post-discount extended price
    #[serde(default, deserialize_with = "money")]
    pub total: Decimal,
    #[serde(default)]
    pub taxes: Vec<TaxEntry>,
}

/// Itemized tax entry carried on line items, fees and shipping lines
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaxEntry {
    /// Tax on the post-discount amount
    #[serde(default, deserialize_with = "money")]
    pub total: Decimal,
    /// Tax on the pre-discount baseline
    #[serde(default, deserialize_with = "money")]
    pub subtotal: Decimal,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CouponLine {
    #[serde(default)]
    pub code: String,
    #[serde(default, deserialize_with = "money")]
    pub discount: Decimal,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeeLine {
    #[serde(default, deserialize_with = "money")]
    pub total: Decimal,
    #[serde(default, deserialize_with = "money")]
    pub total_tax: Decimal,
    #[serde(default)]
    pub taxes: Vec<TaxEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShippingLine {
    #[serde(default, deserialize_with = "money")]
    pub total: Decimal,
    #[serde(default)]
    pub taxes: Vec<TaxEntry>,
}

/// A refund summary; totals arrive already signed negative
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Refund {
    #[serde(default, deserialize_with = "money")]
    pub total: Decimal,
}

/// Zero-coalescing money deserializer
///
/// Accepts a decimal serialized as a string ("49.99") or a bare number
/// (49.99). Null, absent, and unparseable values all decode to zero —
/// partial or legacy records must not fail to load.
fn money<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    use rust_decimal::prelude::FromPrimitive;
    use serde::de::{self, Visitor};
    use std::fmt;

    struct MoneyVisitor;

    impl<'de> Visitor<'de> for MoneyVisitor {
        type Value = Decimal;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a decimal as string or number")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.trim().parse::<Decimal>().unwrap_or_default())
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Decimal::from_f64(value).unwrap_or_default())
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Decimal::from(value))
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Decimal::from(value))
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Decimal::ZERO)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Decimal::ZERO)
        }

        fn visit_some<D2>(self, deserializer: D2) -> Result<Self::Value, D2::Error>
        where
            D2: Deserializer<'de>,
        {
            deserializer.deserialize_any(MoneyVisitor)
        }

        fn visit_bool<E>(self, _value: bool) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Decimal::ZERO)
        }

        fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
        where
            M: de::MapAccess<'de>,
        {
            // Drain the unexpected structure, then coalesce to zero
            while map
                .next_entry::<de::IgnoredAny, de::IgnoredAny>()?
                .is_some()
            {}
            Ok(Decimal::ZERO)
        }

        fn visit_seq<S>(self, mut seq: S) -> Result<Self::Value, S::Error>
        where
            S: de::SeqAccess<'de>,
        {
            while seq.next_element::<de::IgnoredAny>()?.is_some() {}
            Ok(Decimal::ZERO)
        }
    }

    deserializer.deserialize_any(MoneyVisitor)
}
