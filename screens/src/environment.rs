//! Collaborators the screens talk to.
//!
//! Reducers hold these behind `Arc<dyn …>` and only call them from inside
//! effects, never while reducing.

use crate::error::ServiceError;
use crate::types::{CartLineRequest, ProductId, Variation};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Per-field validator
pub trait FieldValidator<F>: Send + Sync {
    /// Whether `value` is acceptable for `field`
    fn is_valid(&self, field: F, value: &str) -> bool;
}

/// Email and password submitted by the auth form
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Account email
    pub email: String,
    /// Account password, never serialized back out
    #[serde(skip_serializing)]
    pub password: String,
}

impl Credentials {
    /// Creates credentials
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// What the authentication service returns for a successful sign-in
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthGrant {
    /// Account identifier
    pub user_id: String,
    /// Bearer token
    pub token: String,
    /// Token lifetime from the moment it was issued
    pub expires_in: Duration,
}

/// Authentication round trips
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Sign in an existing account
    async fn login(&self, credentials: &Credentials) -> Result<AuthGrant, ServiceError>;

    /// Create a new account
    async fn signup(&self, credentials: &Credentials) -> Result<(), ServiceError>;
}

/// Source of a product's variations
#[async_trait]
pub trait VariationSource: Send + Sync {
    /// Current variations of `product_id`
    async fn fetch_variations(&self, product_id: &ProductId) -> Result<Vec<Variation>, ServiceError>;
}

/// The cart, sole consumer of configured lines
#[async_trait]
pub trait CartService: Send + Sync {
    /// Add one configured line
    async fn add_line(&self, line: CartLineRequest) -> Result<(), ServiceError>;
}
