//! Product-detail screen.
//!
//! Entering the screen fetches the product's variations. The user picks an
//! option, taps the quantity stepper and adds the configured line to the cart.
//! Add-to-cart is enabled exactly when the picked option resolves against the
//! loaded variations.
//!
//! A failed fetch only records the error. The last loaded list and the
//! configured line stay as they were so the user can retry.

use crate::environment::{CartService, VariationSource};
use crate::order_line::{OrderLine, QuantityDelta};
use crate::types::{CartLineRequest, Product, Variation};
use regex::Regex;
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use storefront_core::{SmallVec, async_effect, delay, effect::Effect, reducer::Reducer, smallvec};

/// How long the "added to cart" confirmation stays up
pub const CONFIRMATION_DURATION: Duration = Duration::from_secs(3);

/// Variations of the product, as far as the screen knows them
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum VariationCatalog {
    /// No list has arrived yet
    #[default]
    Loading,
    /// The most recently loaded variations
    Ready(Vec<Variation>),
    /// Every fetch so far failed; this is the last message
    Failed(String),
}

impl VariationCatalog {
    /// Loaded variations, empty unless [`Ready`](Self::Ready)
    #[must_use]
    pub fn variations(&self) -> &[Variation] {
        match self {
            Self::Ready(variations) => variations,
            Self::Loading | Self::Failed(_) => &[],
        }
    }

    /// Whether a list has been loaded at least once
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}

/// State of the product-detail screen
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProductDetailState {
    /// Product shown
    pub product: Product,
    /// Its variations
    pub catalog: VariationCatalog,
    /// Picker and stepper state
    pub line: OrderLine,
    /// Last collaborator failure, shown verbatim
    pub error: Option<String>,
    /// Fetch whose answer is awaited; answers to any other fetch are stale
    pub pending_load: Option<u64>,
    /// Fetches started so far, used to number them
    pub loads_started: u64,
    /// Lines handed to the cart that have not been answered
    pub adds_in_flight: u32,
    /// Lines the cart accepted from this screen
    pub adds_confirmed: u64,
    /// Line shown in the "added to cart" confirmation
    pub last_added: Option<CartLineRequest>,
}

impl ProductDetailState {
    /// Screen state for `product` before its variations arrive
    #[must_use]
    pub fn new(product: Product) -> Self {
        Self {
            product,
            catalog: VariationCatalog::Loading,
            line: OrderLine::new(),
            error: None,
            pending_load: None,
            loads_started: 0,
            adds_in_flight: 0,
            adds_confirmed: 0,
            last_added: None,
        }
    }

    /// Whether a fetch is running
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.pending_load.is_some()
    }

    /// Whether the add-to-cart control is enabled
    #[must_use]
    pub const fn can_add_to_cart(&self) -> bool {
        self.line.can_add_to_cart()
    }

    /// Resolved unit price for display, empty when nothing is resolved
    #[must_use]
    pub fn price_label(&self) -> String {
        self.line
            .resolved_price()
            .map(|price| price.to_string())
            .unwrap_or_default()
    }

    /// Product description with markup tags removed
    #[must_use]
    pub fn plain_description(&self) -> String {
        strip_markup(&self.product.description)
    }

    /// Whether `load` is the fetch currently awaited
    fn awaits(&self, load: u64) -> bool {
        self.pending_load == Some(load)
    }
}

/// Remove every `<…>` tag from `text`
#[must_use]
pub fn strip_markup(text: &str) -> String {
    static TAG_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    let re = TAG_REGEX.get_or_init(|| Regex::new(r"<[^>]*>").ok());
    match re {
        Some(re) => re.replace_all(text, "").into_owned(),
        None => text.to_string(),
    }
}

/// Actions of the product-detail screen
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProductDetailAction {
    /// Fetch the product's variations (on entering the screen, or retry)
    LoadVariations,
    /// The variation source answered
    VariationsLoaded {
        /// Fetch being answered
        load: u64,
        /// Current variations
        variations: Vec<Variation>,
    },
    /// The variation source failed
    VariationsFailed {
        /// Fetch being answered
        load: u64,
        /// Message for the user
        message: String,
    },
    /// The user picked an option label
    SelectOption {
        /// Picked label
        option: String,
    },
    /// The user tapped the quantity stepper
    AdjustQuantity {
        /// Which button
        delta: QuantityDelta,
    },
    /// The user tapped add-to-cart
    AddToCart,
    /// The cart accepted the line
    AddedToCart {
        /// Accepted line
        line: CartLineRequest,
    },
    /// The cart refused the line or could not be reached
    AddToCartFailed {
        /// Message for the user
        message: String,
    },
    /// The confirmation for the `confirmed`-th accepted line timed out
    DismissConfirmation {
        /// Value of `adds_confirmed` when the confirmation went up
        confirmed: u64,
    },
    /// The user dismissed the error
    DismissError,
}

/// Collaborators of the product-detail screen
#[derive(Clone)]
pub struct ProductDetailEnvironment {
    /// Variation source
    pub variations: Arc<dyn VariationSource>,
    /// Cart
    pub cart: Arc<dyn CartService>,
}

impl ProductDetailEnvironment {
    /// Creates a new `ProductDetailEnvironment`
    #[must_use]
    pub fn new(variations: Arc<dyn VariationSource>, cart: Arc<dyn CartService>) -> Self {
        Self { variations, cart }
    }
}

/// Reducer for the product-detail screen
#[derive(Clone, Debug, Default)]
pub struct ProductDetailReducer;

impl ProductDetailReducer {
    /// Creates a new `ProductDetailReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn load(
        state: &mut ProductDetailState,
        env: &ProductDetailEnvironment,
    ) -> SmallVec<[Effect<ProductDetailAction>; 4]> {
        state.loads_started = state.loads_started.wrapping_add(1);
        let load = state.loads_started;
        state.pending_load = Some(load);
        state.error = None;

        let source = Arc::clone(&env.variations);
        let product_id = state.product.id.clone();
        tracing::debug!(product_id = %product_id, load, "Loading variations");

        smallvec![async_effect! {
            Some(match source.fetch_variations(&product_id).await {
                Ok(variations) => ProductDetailAction::VariationsLoaded { load, variations },
                Err(error) => ProductDetailAction::VariationsFailed {
                    load,
                    message: error.user_message(),
                },
            })
        }]
    }

    fn add_to_cart(
        state: &mut ProductDetailState,
        env: &ProductDetailEnvironment,
    ) -> SmallVec<[Effect<ProductDetailAction>; 4]> {
        let line = match state.line.cart_line(&state.product) {
            Ok(line) => line,
            Err(error) => {
                tracing::warn!(error = %error, "Rejected add to cart");
                return SmallVec::new();
            },
        };

        tracing::info!(
            product_id = %line.product_id,
            variation_id = %line.variation_id,
            quantity = line.quantity,
            "Adding line to cart"
        );
        state.error = None;
        state.adds_in_flight = state.adds_in_flight.saturating_add(1);

        let cart = Arc::clone(&env.cart);
        smallvec![async_effect! {
            Some(match cart.add_line(line.clone()).await {
                Ok(()) => ProductDetailAction::AddedToCart { line },
                Err(error) => ProductDetailAction::AddToCartFailed {
                    message: error.user_message(),
                },
            })
        }]
    }
}

impl Reducer for ProductDetailReducer {
    type State = ProductDetailState;
    type Action = ProductDetailAction;
    type Environment = ProductDetailEnvironment;

    #[allow(clippy::too_many_lines)]
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            ProductDetailAction::LoadVariations => Self::load(state, env),
            ProductDetailAction::VariationsLoaded { load, variations } => {
                if !state.awaits(load) {
                    tracing::debug!(load, "Ignored stale variations");
                    return SmallVec::new();
                }
                tracing::debug!(load, count = variations.len(), "Variations loaded");
                state.pending_load = None;
                state.line.refresh(&variations);
                state.catalog = VariationCatalog::Ready(variations);
                SmallVec::new()
            },
            ProductDetailAction::VariationsFailed { load, message } => {
                if !state.awaits(load) {
                    tracing::debug!(load, "Ignored stale variation failure");
                    return SmallVec::new();
                }
                tracing::info!(load, message = %message, "Loading variations failed");
                state.pending_load = None;
                if !state.catalog.is_ready() {
                    state.catalog = VariationCatalog::Failed(message.clone());
                }
                state.error = Some(message);
                SmallVec::new()
            },
            ProductDetailAction::SelectOption { option } => {
                state.line.select(state.catalog.variations(), option);
                tracing::debug!(
                    option = state.line.selected_option(),
                    can_add_to_cart = state.line.can_add_to_cart(),
                    "Option selected"
                );
                SmallVec::new()
            },
            ProductDetailAction::AdjustQuantity { delta } => {
                state.line.adjust(delta);
                SmallVec::new()
            },
            ProductDetailAction::AddToCart => Self::add_to_cart(state, env),
            ProductDetailAction::AddedToCart { line } => {
                if state.adds_in_flight == 0 {
                    tracing::warn!("Ignored cart answer with no line in flight");
                    return SmallVec::new();
                }
                state.adds_in_flight -= 1;
                state.adds_confirmed = state.adds_confirmed.wrapping_add(1);
                state.last_added = Some(line);

                let confirmed = state.adds_confirmed;
                smallvec![delay! {
                    duration: CONFIRMATION_DURATION,
                    action: ProductDetailAction::DismissConfirmation { confirmed }
                }]
            },
            ProductDetailAction::AddToCartFailed { message } => {
                if state.adds_in_flight == 0 {
                    tracing::warn!("Ignored cart failure with no line in flight");
                    return SmallVec::new();
                }
                state.adds_in_flight -= 1;
                tracing::info!(message = %message, "Cart refused line");
                state.error = Some(message);
                SmallVec::new()
            },
            ProductDetailAction::DismissConfirmation { confirmed } => {
                if state.adds_confirmed == confirmed {
                    state.last_added = None;
                }
                SmallVec::new()
            },
            ProductDetailAction::DismissError => {
                state.error = None;
                SmallVec::new()
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can use unwrap
mod tests {
    use super::*;
    use crate::mocks::{RecordingCart, StaticVariationSource};
    use crate::types::{Money, ProductId, UNSELECTED_OPTION, VariationId};
    use storefront_testing::{ReducerTest, assertions};

    fn rose() -> Product {
        Product::new(
            ProductId::new("p-1"),
            "Rose",
            "<p>Fresh <b>red</b> roses</p>",
            "https://img/rose.png",
        )
    }

    fn sizes() -> Vec<Variation> {
        vec![
            Variation::new(VariationId::new(1), "S", Money::from_major(10)),
            Variation::new(VariationId::new(2), "M", Money::from_major(12)),
        ]
    }

    fn env() -> ProductDetailEnvironment {
        ProductDetailEnvironment::new(
            Arc::new(StaticVariationSource::new().with_variations(ProductId::new("p-1"), sizes())),
            Arc::new(RecordingCart::new()),
        )
    }

    fn loaded() -> ProductDetailState {
        let mut state = ProductDetailState::new(rose());
        state.catalog = VariationCatalog::Ready(sizes());
        state.loads_started = 1;
        state
    }

    fn configured(option: &str) -> ProductDetailState {
        let mut state = loaded();
        state.line.select(&sizes(), option);
        state
    }

    fn sample_line() -> CartLineRequest {
        configured("S").line.cart_line(&rose()).unwrap()
    }

    #[test]
    fn description_without_markup() {
        assert_eq!(ProductDetailState::new(rose()).plain_description(), "Fresh red roses");
        assert_eq!(strip_markup("no tags"), "no tags");
    }

    #[test]
    fn load_starts_fetch_without_touching_line() {
        let before = configured("M");
        let line_before = before.line.clone();

        ReducerTest::new(ProductDetailReducer::new())
            .with_env(env())
            .given_state(before)
            .when_action(ProductDetailAction::LoadVariations)
            .then_state(move |state| {
                assert!(state.is_loading());
                assert_eq!(state.pending_load, Some(2));
                assert_eq!(state.catalog, VariationCatalog::Ready(sizes()));
                assert_eq!(state.line, line_before);
                assert!(state.can_add_to_cart());
            })
            .then_effects(assertions::assert_has_future_effect)
            .run();
    }

    #[test]
    fn loading_and_unselected_are_distinct() {
        let loading = ProductDetailState::new(rose());
        let unselected = loaded();

        assert!(!loading.catalog.is_ready());
        assert!(unselected.catalog.is_ready());
        assert_eq!(unselected.line.selected_option(), UNSELECTED_OPTION);
        assert!(!loading.can_add_to_cart());
        assert!(!unselected.can_add_to_cart());
    }

    #[test]
    fn selecting_resolves_price_and_id() {
        ReducerTest::new(ProductDetailReducer::new())
            .with_env(env())
            .given_state(loaded())
            .when_action(ProductDetailAction::SelectOption {
                option: "M".to_string(),
            })
            .then_state(|state| {
                assert!(state.can_add_to_cart());
                assert_eq!(state.line.resolved_price(), Some(Money::from_major(12)));
                assert_eq!(state.line.resolved_variation_id(), Some(VariationId::new(2)));
                assert_eq!(state.price_label(), "12.00 RON");
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn selecting_before_load_resolves_nothing() {
        ReducerTest::new(ProductDetailReducer::new())
            .with_env(env())
            .given_state(ProductDetailState::new(rose()))
            .when_action(ProductDetailAction::SelectOption {
                option: "M".to_string(),
            })
            .then_state(|state| {
                assert_eq!(state.line.selected_option(), "M");
                assert!(!state.can_add_to_cart());
                assert_eq!(state.price_label(), "");
            })
            .run();
    }

    #[test]
    fn fresh_list_reprices_selection() {
        let mut state = configured("M");
        state.pending_load = Some(1);

        ReducerTest::new(ProductDetailReducer::new())
            .with_env(env())
            .given_state(state)
            .when_action(ProductDetailAction::VariationsLoaded {
                load: 1,
                variations: vec![Variation::new(VariationId::new(2), "M", Money::from_major(14))],
            })
            .then_state(|state| {
                assert!(!state.is_loading());
                assert_eq!(state.line.resolved_price(), Some(Money::from_major(14)));
            })
            .run();
    }

    #[test]
    fn failed_refetch_keeps_list_and_line() {
        let mut state = configured("S");
        state.pending_load = Some(1);
        let line_before = state.line.clone();

        ReducerTest::new(ProductDetailReducer::new())
            .with_env(env())
            .given_state(state)
            .when_action(ProductDetailAction::VariationsFailed {
                load: 1,
                message: "network unreachable".to_string(),
            })
            .then_state(move |state| {
                assert!(!state.is_loading());
                assert_eq!(state.catalog, VariationCatalog::Ready(sizes()));
                assert_eq!(state.line, line_before);
                assert!(state.can_add_to_cart());
                assert_eq!(state.error.as_deref(), Some("network unreachable"));
            })
            .run();
    }

    #[test]
    fn failed_first_fetch_marks_catalog_failed() {
        let mut state = ProductDetailState::new(rose());
        state.loads_started = 1;
        state.pending_load = Some(1);

        ReducerTest::new(ProductDetailReducer::new())
            .with_env(env())
            .given_state(state)
            .when_action(ProductDetailAction::VariationsFailed {
                load: 1,
                message: "network unreachable".to_string(),
            })
            .then_state(|state| {
                assert_eq!(
                    state.catalog,
                    VariationCatalog::Failed("network unreachable".to_string())
                );
                assert!(!state.can_add_to_cart());
            })
            .run();
    }

    #[test]
    fn answers_to_superseded_fetch_are_ignored() {
        let mut state = configured("M");
        state.loads_started = 2;
        state.pending_load = Some(2);
        let expected = state.clone();

        ReducerTest::new(ProductDetailReducer::new())
            .with_env(env())
            .given_state(state)
            .when_actions([
                ProductDetailAction::VariationsFailed {
                    load: 1,
                    message: "timeout".to_string(),
                },
                ProductDetailAction::VariationsLoaded {
                    load: 1,
                    variations: Vec::new(),
                },
            ])
            .then_state(move |state| assert_eq!(state, &expected))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn retry_numbers_fetches() {
        ReducerTest::new(ProductDetailReducer::new())
            .with_env(env())
            .given_state(ProductDetailState::new(rose()))
            .when_actions([
                ProductDetailAction::LoadVariations,
                ProductDetailAction::LoadVariations,
                ProductDetailAction::VariationsLoaded {
                    load: 1,
                    variations: sizes(),
                },
            ])
            .then_state(|state| {
                assert_eq!(state.pending_load, Some(2));
                assert_eq!(state.catalog, VariationCatalog::Loading);
            })
            .then_effects(|effects| assertions::assert_effects_count(effects, 2))
            .run();
    }

    #[test]
    fn quantity_never_below_one() {
        ReducerTest::new(ProductDetailReducer::new())
            .with_env(env())
            .given_state(loaded())
            .when_actions([
                ProductDetailAction::AdjustQuantity {
                    delta: QuantityDelta::Decrement,
                },
                ProductDetailAction::AdjustQuantity {
                    delta: QuantityDelta::Increment,
                },
                ProductDetailAction::AdjustQuantity {
                    delta: QuantityDelta::Increment,
                },
            ])
            .then_state(|state| assert_eq!(state.line.quantity(), 3))
            .run();
    }

    #[test]
    fn add_to_cart_rejected_without_selection() {
        let expected = loaded();
        ReducerTest::new(ProductDetailReducer::new())
            .with_env(env())
            .given_state(loaded())
            .when_action(ProductDetailAction::AddToCart)
            .then_state(move |state| assert_eq!(state, &expected))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn add_to_cart_calls_cart() {
        ReducerTest::new(ProductDetailReducer::new())
            .with_env(env())
            .given_state(configured("S"))
            .when_action(ProductDetailAction::AddToCart)
            .then_state(|state| assert_eq!(state.adds_in_flight, 1))
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_has_future_effect(effects);
            })
            .run();
    }

    #[test]
    fn accepted_line_shows_confirmation_then_dismisses() {
        let mut state = configured("S");
        state.adds_in_flight = 1;

        ReducerTest::new(ProductDetailReducer::new())
            .with_env(env())
            .given_state(state)
            .when_action(ProductDetailAction::AddedToCart { line: sample_line() })
            .then_state(|state| {
                assert_eq!(state.adds_in_flight, 0);
                assert_eq!(state.adds_confirmed, 1);
                assert_eq!(state.last_added, Some(sample_line()));
            })
            .then_effects(|effects| {
                assert!(matches!(
                    effects,
                    [Effect::Delay { duration, action }]
                        if *duration == CONFIRMATION_DURATION
                            && **action == ProductDetailAction::DismissConfirmation { confirmed: 1 }
                ));
            })
            .run();
    }

    #[test]
    fn stale_dismissal_keeps_newer_confirmation() {
        let mut state = configured("S");
        state.adds_confirmed = 2;
        state.last_added = Some(sample_line());

        ReducerTest::new(ProductDetailReducer::new())
            .with_env(env())
            .given_state(state)
            .when_action(ProductDetailAction::DismissConfirmation { confirmed: 1 })
            .then_state(|state| assert!(state.last_added.is_some()))
            .run();
    }

    #[test]
    fn cart_answer_without_add_is_ignored() {
        let expected = configured("S");
        ReducerTest::new(ProductDetailReducer::new())
            .with_env(env())
            .given_state(configured("S"))
            .when_actions([
                ProductDetailAction::AddedToCart { line: sample_line() },
                ProductDetailAction::AddToCartFailed {
                    message: "cart full".to_string(),
                },
            ])
            .then_state(move |state| assert_eq!(state, &expected))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn cart_failure_keeps_configuration() {
        let mut state = configured("S");
        state.adds_in_flight = 1;
        let line_before = state.line.clone();

        ReducerTest::new(ProductDetailReducer::new())
            .with_env(env())
            .given_state(state)
            .when_action(ProductDetailAction::AddToCartFailed {
                message: "cart full".to_string(),
            })
            .then_state(move |state| {
                assert_eq!(state.line, line_before);
                assert_eq!(state.error.as_deref(), Some("cart full"));
                assert_eq!(state.adds_in_flight, 0);
                assert_eq!(state.last_added, None);
            })
            .run();
    }
}
