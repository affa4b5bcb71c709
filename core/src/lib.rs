//! # Storefront Core
//!
//! Core traits and types shared by the storefront screens.
//!
//! Every screen is modelled as a reducer: a pure function that takes the
//! current state and one user (or collaborator) action and produces the next
//! state plus a list of effect descriptions. Effects are values, not execution;
//! the runtime crate runs them and feeds whatever action they produce back
//! into the reducer.
//!
//! ## Core Concepts
//!
//! - **State**: Owned, cloneable screen state
//! - **Action**: Every input to a reducer (keystrokes, taps, collaborator results)
//! - **Reducer**: `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Description of a side effect for the runtime to perform
//! - **Environment**: Collaborators injected behind traits
//!
//! ## Example
//!
//! ```
//! use storefront_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
//!
//! #[derive(Clone, Debug, Default)]
//! struct QuantityState {
//!     quantity: u32,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum QuantityAction {
//!     Increment,
//! }
//!
//! struct QuantityReducer;
//!
//! impl Reducer for QuantityReducer {
//!     type State = QuantityState;
//!     type Action = QuantityAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut QuantityState,
//!         action: QuantityAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<QuantityAction>; 4]> {
//!         match action {
//!             QuantityAction::Increment => state.quantity += 1,
//!         }
//!         smallvec![Effect::None]
//!     }
//! }
//!
//! let mut state = QuantityState::default();
//! QuantityReducer.reduce(&mut state, QuantityAction::Increment, &());
//! assert_eq!(state.quantity, 1);
//! ```

pub use chrono::{DateTime, Utc};
pub use smallvec::{SmallVec, smallvec};

mod effect_macros;

/// Reducer module - the core trait for screen logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`.
/// They hold all the screen's business rules and are deterministic and testable
/// without a runtime.
pub mod reducer {
    use super::SmallVec;
    use super::effect::Effect;

    /// The Reducer trait - core abstraction for screen logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected collaborators this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected collaborators
        type Environment;

        /// Reduce an action into a state change and effects
        ///
        /// Implementations must:
        /// 1. Reject actions that violate the screen's contract, leaving state untouched
        /// 2. Update state in place for accepted actions
        /// 3. Return descriptions of any collaborator calls to perform
        ///
        /// Most actions produce zero or one effect, so the result is stored
        /// inline up to four effects.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - side effect descriptions
///
/// Effects describe work for the runtime to perform. They are never executed
/// by the reducer itself.
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;
    use std::time::Duration;

    /// Effect type - describes a side effect to be executed
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can feed back into the reducer
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Dispatch an action after a delay
        Delay {
            /// How long to wait
            duration: Duration,
            /// Action to dispatch after the delay
            action: Box<Action>,
        },

        /// Arbitrary async computation, typically a collaborator call
        ///
        /// If the future resolves to `Some(action)`, the action is fed back
        /// into the reducer.
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),
    }

    // Futures are opaque, so Debug is written by hand.
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Delay { duration, action } => f
                    .debug_struct("Effect::Delay")
                    .field("duration", duration)
                    .field("action", action)
                    .finish(),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Whether this effect does nothing when executed
        #[must_use]
        pub const fn is_none(&self) -> bool {
            matches!(self, Effect::None)
        }
    }
}

/// Environment module - dependency injection traits
///
/// Screen-specific collaborators (authentication, catalog, cart) are declared
/// next to the screens that use them. Only cross-cutting dependencies live here.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time for testability
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::effect::Effect;
    use super::environment::{Clock, SystemClock};
    use std::time::Duration;

    #[derive(Clone, Debug)]
    enum TestAction {
        Ping,
    }

    #[test]
    fn only_none_is_none() {
        let effect: Effect<TestAction> = Effect::None;
        assert!(effect.is_none());
        assert!(format!("{effect:?}").contains("Effect::None"));
    }

    #[test]
    fn delay_is_not_none() {
        let effect = Effect::Delay {
            duration: Duration::from_millis(5),
            action: Box::new(TestAction::Ping),
        };
        assert!(!effect.is_none());
        assert!(format!("{effect:?}").contains("Effect::Delay"));
    }

    #[test]
    fn system_clock_moves_forward() {
        let clock = SystemClock;
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }
}
