//! Storefront demo binary
//!
//! Drives the auth screen and the product-detail screen through a `Store`
//! with in-memory collaborators.

use std::sync::Arc;
use storefront_core::environment::SystemClock;
use storefront_runtime::{Store, StoreError};
use storefront_screens::mocks::{InMemoryAuthService, RecordingCart, StaticVariationSource};
use storefront_screens::{
    AuthAction, AuthEnvironment, AuthField, AuthFormRules, AuthReducer, AuthState, Money, Product,
    ProductDetailAction, ProductDetailEnvironment, ProductDetailReducer, ProductDetailState,
    ProductId, QuantityDelta, Variation, VariationId,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), StoreError> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storefront_screens=debug,storefront_runtime=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("=== Storefront Demo ===\n");

    sign_in().await?;
    configure_line().await?;

    println!("\n=== Demo Complete ===");
    Ok(())
}

async fn sign_in() -> Result<(), StoreError> {
    println!("--- Auth screen ---");

    let env = AuthEnvironment::new(
        Arc::new(InMemoryAuthService::new().with_account("a@b.com", "123456")),
        Arc::new(AuthFormRules::default()),
        Arc::new(SystemClock),
    );
    let store = Store::new(AuthState::sign_in(), AuthReducer::new(), env);

    let edits = [
        (AuthField::Email, "a@b"),
        (AuthField::Email, "a@b.com"),
        (AuthField::Password, "123"),
        (AuthField::Password, "123456"),
    ];
    for (field, value) in edits {
        store
            .send(AuthAction::FieldEdited {
                field,
                value: value.to_string(),
            })
            .await?;
        let can_submit = store.state(AuthState::can_submit).await;
        println!(">>> {field} edited (len {}): submit enabled = {can_submit}", value.len());
    }

    let mut handle = store.send(AuthAction::Submit).await?;
    println!(">>> Submit: in flight = {}", store.state(|s| s.is_submitting).await);
    handle.wait().await;

    let user = store
        .state(|s| s.session.as_ref().map(|session| session.user_id.clone()))
        .await;
    println!("Signed in as: {}", user.unwrap_or_else(|| "nobody".to_string()));

    store.shutdown().await
}

async fn configure_line() -> Result<(), StoreError> {
    println!("\n--- Product-detail screen ---");

    let product = Product::new(
        ProductId::new("bouquet-1"),
        "Spring bouquet",
        "<p>Tulips and <em>daffodils</em></p>",
        "https://cdn.example/bouquet-1.png",
    );
    let variations = StaticVariationSource::new().with_variations(
        product.id.clone(),
        vec![Variation::new(VariationId::new(7), "L", Money::from_major(20))],
    );
    let cart = RecordingCart::new();
    let env = ProductDetailEnvironment::new(Arc::new(variations), Arc::new(cart.clone()));
    let store = Store::new(
        ProductDetailState::new(product),
        ProductDetailReducer::new(),
        env,
    );

    println!("Description: {}", store.state(ProductDetailState::plain_description).await);

    store.send(ProductDetailAction::LoadVariations).await?.wait().await;
    store
        .send(ProductDetailAction::SelectOption {
            option: "L".to_string(),
        })
        .await?;
    println!(">>> Selected L: price {}", store.state(ProductDetailState::price_label).await);

    for _ in 0..2 {
        store
            .send(ProductDetailAction::AdjustQuantity {
                delta: QuantityDelta::Increment,
            })
            .await?;
    }
    println!(">>> Quantity: {}", store.state(|s| s.line.quantity()).await);

    store.send(ProductDetailAction::AddToCart).await?.wait().await;
    for line in cart.lines() {
        println!(
            "Cart line: {} x{} option {} (variation {}) = {}",
            line.product.name,
            line.quantity,
            line.selected_option,
            line.variation_id,
            line.line_total()
        );
    }

    println!(
        "Confirmation shown: {}",
        store.state(|s| s.last_added.is_some()).await
    );

    // Waits for the confirmation to dismiss itself
    store.shutdown().await?;
    println!(
        "Confirmation shown after drain: {}",
        store.state(|s| s.last_added.is_some()).await
    );
    Ok(())
}
