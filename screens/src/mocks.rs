//! In-memory collaborators
//!
//! Deterministic stand-ins for the authentication service, the variation
//! source and the cart. Used by tests and by the demo binary.
//!
//! - [`InMemoryAuthService`]: account map with login and sign-up
//! - [`StaticVariationSource`]: fixed variation lists per product
//! - [`RecordingCart`]: keeps every line it receives

#![allow(clippy::unwrap_used)] // Lock poisoning only follows a panicking test
#![allow(clippy::missing_panics_doc)]

use crate::environment::{AuthGrant, AuthService, CartService, Credentials, VariationSource};
use crate::error::ServiceError;
use crate::types::{CartLineRequest, ProductId, Variation};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

/// Token lifetime handed out by [`InMemoryAuthService`]
pub const TOKEN_LIFETIME: Duration = Duration::from_secs(3600);

/// Account map keyed by email
///
/// Refusals use the identity provider's error codes as messages
/// (`EMAIL_NOT_FOUND`, `INVALID_PASSWORD`, `EMAIL_EXISTS`).
#[derive(Clone, Debug, Default)]
pub struct InMemoryAuthService {
    accounts: Arc<RwLock<HashMap<String, String>>>,
    offline: Arc<AtomicBool>,
}

impl InMemoryAuthService {
    /// Create a service with no accounts
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an account
    #[must_use]
    pub fn with_account(self, email: &str, password: &str) -> Self {
        self.accounts
            .write()
            .unwrap()
            .insert(email.to_string(), password.to_string());
        self
    }

    /// Make every call fail as if the network were down
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Whether an account exists
    #[must_use]
    pub fn has_account(&self, email: &str) -> bool {
        self.accounts.read().unwrap().contains_key(email)
    }

    fn check_online(&self) -> Result<(), ServiceError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(ServiceError::Unavailable("network unreachable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl AuthService for InMemoryAuthService {
    async fn login(&self, credentials: &Credentials) -> Result<AuthGrant, ServiceError> {
        self.check_online()?;
        let accounts = self.accounts.read().unwrap();
        match accounts.get(&credentials.email) {
            None => Err(ServiceError::Rejected("EMAIL_NOT_FOUND".to_string())),
            Some(password) if *password != credentials.password => {
                Err(ServiceError::Rejected("INVALID_PASSWORD".to_string()))
            },
            Some(_) => Ok(AuthGrant {
                user_id: format!("user:{}", credentials.email),
                token: format!("token:{}", credentials.email),
                expires_in: TOKEN_LIFETIME,
            }),
        }
    }

    async fn signup(&self, credentials: &Credentials) -> Result<(), ServiceError> {
        self.check_online()?;
        let mut accounts = self.accounts.write().unwrap();
        if accounts.contains_key(&credentials.email) {
            return Err(ServiceError::Rejected("EMAIL_EXISTS".to_string()));
        }
        accounts.insert(credentials.email.clone(), credentials.password.clone());
        Ok(())
    }
}

/// Fixed variation lists keyed by product
#[derive(Clone, Debug, Default)]
pub struct StaticVariationSource {
    variations: Arc<RwLock<HashMap<ProductId, Vec<Variation>>>>,
    offline: Arc<AtomicBool>,
}

impl StaticVariationSource {
    /// Create an empty source
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the variations of a product
    #[must_use]
    pub fn with_variations(self, product_id: ProductId, variations: Vec<Variation>) -> Self {
        self.replace(product_id, variations);
        self
    }

    /// Replace the variations of a product (e.g. a price change)
    pub fn replace(&self, product_id: ProductId, variations: Vec<Variation>) {
        self.variations.write().unwrap().insert(product_id, variations);
    }

    /// Make every fetch fail as if the network were down
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }
}

#[async_trait]
impl VariationSource for StaticVariationSource {
    async fn fetch_variations(&self, product_id: &ProductId) -> Result<Vec<Variation>, ServiceError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(ServiceError::Unavailable("network unreachable".to_string()));
        }
        self.variations
            .read()
            .unwrap()
            .get(product_id)
            .cloned()
            .ok_or_else(|| ServiceError::Rejected(format!("unknown product {product_id}")))
    }
}

/// Cart that records every line it accepts
#[derive(Clone, Debug, Default)]
pub struct RecordingCart {
    lines: Arc<RwLock<Vec<CartLineRequest>>>,
    refuse_with: Arc<RwLock<Option<String>>>,
}

impl RecordingCart {
    /// Create an empty cart
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse every line with `message`, or accept again with `None`
    pub fn refuse_with(&self, message: Option<&str>) {
        *self.refuse_with.write().unwrap() = message.map(str::to_string);
    }

    /// Lines accepted so far
    #[must_use]
    pub fn lines(&self) -> Vec<CartLineRequest> {
        self.lines.read().unwrap().clone()
    }

    /// Total number of units accepted
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.lines
            .read()
            .unwrap()
            .iter()
            .map(|line| u64::from(line.quantity))
            .sum()
    }
}

#[async_trait]
impl CartService for RecordingCart {
    async fn add_line(&self, line: CartLineRequest) -> Result<(), ServiceError> {
        if let Some(message) = self.refuse_with.read().unwrap().clone() {
            return Err(ServiceError::Rejected(message));
        }
        self.lines.write().unwrap().push(line);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Money, VariationId};

    #[tokio::test]
    async fn login_checks_password() {
        let service = InMemoryAuthService::new().with_account("a@b.com", "123456");

        let ok = service.login(&Credentials::new("a@b.com", "123456")).await;
        assert_eq!(ok.unwrap().expires_in, TOKEN_LIFETIME);

        let wrong = service.login(&Credentials::new("a@b.com", "654321")).await;
        assert_eq!(wrong, Err(ServiceError::Rejected("INVALID_PASSWORD".to_string())));

        let missing = service.login(&Credentials::new("x@y.com", "123456")).await;
        assert_eq!(missing, Err(ServiceError::Rejected("EMAIL_NOT_FOUND".to_string())));
    }

    #[tokio::test]
    async fn signup_refuses_existing_email() {
        let service = InMemoryAuthService::new();
        let credentials = Credentials::new("a@b.com", "123456");

        assert_eq!(service.signup(&credentials).await, Ok(()));
        assert!(service.has_account("a@b.com"));
        assert_eq!(
            service.signup(&credentials).await,
            Err(ServiceError::Rejected("EMAIL_EXISTS".to_string()))
        );
    }

    #[tokio::test]
    async fn offline_source_fails() {
        let id = ProductId::new("p-1");
        let source = StaticVariationSource::new().with_variations(
            id.clone(),
            vec![Variation::new(VariationId::new(1), "S", Money::from_major(10))],
        );
        assert_eq!(source.fetch_variations(&id).await.unwrap().len(), 1);

        source.set_offline(true);
        assert!(matches!(
            source.fetch_variations(&id).await,
            Err(ServiceError::Unavailable(_))
        ));
    }
}
