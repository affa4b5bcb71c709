//! Catalog and cart types shared by the product-detail screen and its collaborators.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Label the variation picker shows before the user chooses an option
pub const UNSELECTED_OPTION: &str = "Selecteaza";

/// Unique identifier for a product
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Creates a new `ProductId`
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the inner string value
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a product variation
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariationId(u64);

impl VariationId {
    /// Creates a new `VariationId`
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the numeric id
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for VariationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Non-negative amount in bani (1/100 RON)
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(u64);

impl Money {
    /// Creates an amount from minor units
    #[must_use]
    pub const fn from_minor(minor: u64) -> Self {
        Self(minor)
    }

    /// Creates an amount from whole lei
    #[must_use]
    pub const fn from_major(major: u64) -> Self {
        Self(major.saturating_mul(100))
    }

    /// Returns the amount in minor units
    #[must_use]
    pub const fn minor(self) -> u64 {
        self.0
    }

    /// Multiplies by a quantity, saturating on overflow
    #[must_use]
    pub const fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(quantity as u64))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02} RON", self.0 / 100, self.0 % 100)
    }
}

/// One purchasable option of a product (e.g. a size)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variation {
    /// Variation identifier
    pub id: VariationId,
    /// Picker label, unique within one product's variations
    pub option: String,
    /// Price of one unit of this option
    pub price: Money,
}

impl Variation {
    /// Creates a new variation
    #[must_use]
    pub fn new(id: VariationId, option: impl Into<String>, price: Money) -> Self {
        Self {
            id,
            option: option.into(),
            price,
        }
    }
}

/// A product as listed in the catalog
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Product identifier
    pub id: ProductId,
    /// Display name
    pub name: String,
    /// Description, possibly containing markup
    pub description: String,
    /// Image location
    pub image_url: String,
}

impl Product {
    /// Creates a new product
    #[must_use]
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        description: impl Into<String>,
        image_url: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
            image_url: image_url.into(),
        }
    }
}

/// A configured line handed to the cart
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineRequest {
    /// Product being added
    pub product: Product,
    /// Unit price of the chosen variation
    pub price: Money,
    /// Number of units, at least 1
    pub quantity: u32,
    /// Picker label of the chosen variation
    pub selected_option: String,
    /// Identifier of `product`
    pub product_id: ProductId,
    /// Identifier of the chosen variation
    pub variation_id: VariationId,
}

impl CartLineRequest {
    /// Price of the whole line
    #[must_use]
    pub const fn line_total(&self) -> Money {
        self.price.times(self.quantity)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can use unwrap
mod tests {
    use super::*;

    #[test]
    fn money_display() {
        assert_eq!(Money::from_major(20).to_string(), "20.00 RON");
        assert_eq!(Money::from_minor(1205).to_string(), "12.05 RON");
    }

    #[test]
    fn money_times_saturates() {
        assert_eq!(Money::from_minor(250).times(3), Money::from_minor(750));
        assert_eq!(Money::from_minor(u64::MAX).times(2), Money::from_minor(u64::MAX));
    }

    #[test]
    fn variation_wire_format() {
        let variation: Variation =
            serde_json::from_str(r#"{"id": 7, "option": "L", "price": 2000}"#).unwrap();
        assert_eq!(
            variation,
            Variation::new(VariationId::new(7), "L", Money::from_major(20))
        );
    }
}
