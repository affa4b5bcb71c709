//! Declarative macros for building effects
//!
//! Collaborator calls are almost always an async block that maps a
//! `Result` onto a feedback action; these macros remove the boxing noise.

/// Create an `Effect::Future` from an async block
///
/// The block must evaluate to `Option<Action>`.
///
/// # Example
///
/// ```rust,ignore
/// use storefront_core::async_effect;
///
/// async_effect! {
///     match catalog.fetch_variations(&product_id).await {
///         Ok(variations) => Some(ProductDetailAction::VariationsLoaded { variations }),
///         Err(error) => Some(ProductDetailAction::VariationsFailed { message: error.to_string() }),
///     }
/// }
/// ```
#[macro_export]
macro_rules! async_effect {
    ($($body:tt)*) => {
        $crate::effect::Effect::Future(
            ::std::boxed::Box::pin(async move { $($body)* })
        )
    };
}

/// Create an `Effect::Delay` for scheduling an action later
///
/// # Example
///
/// ```rust,ignore
/// use storefront_core::delay;
/// use std::time::Duration;
///
/// delay! {
///     duration: Duration::from_secs(3),
///     action: ProductDetailAction::DismissConfirmation
/// }
/// ```
#[macro_export]
macro_rules! delay {
    (
        duration: $duration:expr,
        action: $action:expr
    ) => {
        $crate::effect::Effect::Delay {
            duration: $duration,
            action: ::std::boxed::Box::new($action),
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::effect::Effect;
    use std::time::Duration;

    #[derive(Clone, Debug, PartialEq)]
    enum TestAction {
        Loaded { count: usize },
        Expired,
    }

    #[test]
    fn async_effect_builds_future() {
        let effect = async_effect! {
            Some(TestAction::Loaded { count: 3 })
        };

        assert!(matches!(effect, Effect::Future(_)));
    }

    #[tokio::test]
    async fn async_effect_resolves_to_action() {
        let effect = async_effect! { Some(TestAction::Loaded { count: 2 }) };
        let Effect::Future(fut) = effect else {
            unreachable!("async_effect! always builds a future");
        };

        assert_eq!(fut.await, Some(TestAction::Loaded { count: 2 }));
    }

    #[test]
    fn delay_macro_builds_delay() {
        let effect = delay! {
            duration: Duration::from_secs(30),
            action: TestAction::Expired
        };

        assert!(matches!(effect, Effect::Delay { .. }));
    }
}
