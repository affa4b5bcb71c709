//! # Storefront Screens
//!
//! Screen logic of the storefront app, written as reducers over
//! `storefront-core`.
//!
//! - [`form`]: per-field validity snapshots and the whole-form aggregate
//! - [`auth`]: sign-in / sign-up screen on top of a two-field form
//! - [`order_line`]: variation resolution and the quantity stepper
//! - [`product_detail`]: product-detail screen that feeds the cart
//!
//! Collaborators (authentication, variation source, cart) are traits in
//! [`environment`]; [`mocks`] has in-memory versions for tests and the demo.

pub mod auth;
pub mod environment;
pub mod error;
pub mod form;
pub mod mocks;
pub mod order_line;
pub mod product_detail;
pub mod types;
pub mod validation;

pub use auth::{AuthAction, AuthEnvironment, AuthField, AuthMode, AuthReducer, AuthState, Session};
pub use environment::{AuthGrant, AuthService, CartService, Credentials, FieldValidator, VariationSource};
pub use error::{FormError, OrderLineError, ServiceError, SubmitError};
pub use form::{
    FieldState, FieldUpdate, FormAction, FormField, FormReducer, FormState, apply_or_reject,
};
pub use order_line::{OrderLine, QuantityDelta, ResolvedVariation, adjust_quantity, select_variation};
pub use product_detail::{
    ProductDetailAction, ProductDetailEnvironment, ProductDetailReducer, ProductDetailState,
    VariationCatalog,
};
pub use types::{CartLineRequest, Money, Product, ProductId, UNSELECTED_OPTION, Variation, VariationId};
pub use validation::{AuthFormRules, FieldRules};
