//! Order-line configurator.
//!
//! Turns a product, a picked variation option and a quantity into a priced
//! [`CartLineRequest`]. The variation id and the price are resolved as one
//! value, so they are always set and cleared together.

use crate::error::OrderLineError;
use crate::types::{CartLineRequest, Money, Product, UNSELECTED_OPTION, Variation, VariationId};

/// The variation a picked option resolved to
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ResolvedVariation {
    /// Identifier of the matching variation
    pub variation_id: VariationId,
    /// Its unit price
    pub price: Money,
}

/// Find the variation whose option label equals `chosen_option`
///
/// Labels are unique per product, but if a list repeats one the first entry in
/// list order wins. Returns `None` when nothing matches, including for the
/// [`UNSELECTED_OPTION`] placeholder.
#[must_use]
pub fn select_variation(variations: &[Variation], chosen_option: &str) -> Option<ResolvedVariation> {
    variations
        .iter()
        .find(|variation| variation.option == chosen_option)
        .map(|variation| ResolvedVariation {
            variation_id: variation.id,
            price: variation.price,
        })
}

/// One tap on the quantity stepper
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum QuantityDelta {
    /// The minus button
    Decrement,
    /// The plus button
    Increment,
}

/// Apply one stepper tap
///
/// Never goes below 1: decrementing 1 leaves 1. There is no upper business
/// limit; the cart decides whether a quantity is acceptable.
#[must_use]
pub const fn adjust_quantity(current: u32, delta: QuantityDelta) -> u32 {
    match delta {
        QuantityDelta::Decrement => {
            if current > 1 {
                current - 1
            } else {
                1
            }
        },
        QuantityDelta::Increment => current.saturating_add(1),
    }
}

/// Transient picker and stepper state for one product
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderLine {
    selected_option: String,
    resolved: Option<ResolvedVariation>,
    quantity: u32,
}

impl Default for OrderLine {
    fn default() -> Self {
        Self {
            selected_option: UNSELECTED_OPTION.to_string(),
            resolved: None,
            quantity: 1,
        }
    }
}

impl OrderLine {
    /// A line with nothing picked and quantity 1
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a picker choice and resolve it against `variations`
    pub fn select(&mut self, variations: &[Variation], option: impl Into<String>) {
        self.selected_option = option.into();
        self.resolved = select_variation(variations, &self.selected_option);
    }

    /// Re-resolve the current choice against a fresh variation list
    pub fn refresh(&mut self, variations: &[Variation]) {
        self.resolved = select_variation(variations, &self.selected_option);
    }

    /// Drop the resolution while keeping the picked label and quantity
    pub fn unresolve(&mut self) {
        self.resolved = None;
    }

    /// Apply one stepper tap
    pub fn adjust(&mut self, delta: QuantityDelta) {
        self.quantity = adjust_quantity(self.quantity, delta);
    }

    /// Picked option label
    #[must_use]
    pub fn selected_option(&self) -> &str {
        &self.selected_option
    }

    /// Current quantity, at least 1
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Resolved variation, if the picked option matches the list
    #[must_use]
    pub const fn resolved(&self) -> Option<ResolvedVariation> {
        self.resolved
    }

    /// Resolved variation id
    #[must_use]
    pub fn resolved_variation_id(&self) -> Option<VariationId> {
        self.resolved.map(|r| r.variation_id)
    }

    /// Resolved unit price
    #[must_use]
    pub fn resolved_price(&self) -> Option<Money> {
        self.resolved.map(|r| r.price)
    }

    /// Whether the add-to-cart control is enabled
    #[must_use]
    pub const fn can_add_to_cart(&self) -> bool {
        self.resolved.is_some()
    }

    /// Build the cart line for `product`
    ///
    /// # Errors
    ///
    /// Returns [`OrderLineError::NoVariationSelected`] if the picked option
    /// does not resolve.
    pub fn cart_line(&self, product: &Product) -> Result<CartLineRequest, OrderLineError> {
        let resolved = self.resolved.ok_or(OrderLineError::NoVariationSelected)?;
        Ok(CartLineRequest {
            product: product.clone(),
            price: resolved.price,
            quantity: self.quantity,
            selected_option: self.selected_option.clone(),
            product_id: product.id.clone(),
            variation_id: resolved.variation_id,
        })
    }
}
