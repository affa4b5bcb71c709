//! # Storefront Testing
//!
//! Testing utilities for storefront reducers.
//!
//! - [`ReducerTest`]: Given/When/Then harness for a single reduction or a short
//!   sequence of actions
//! - [`assertions`]: effect assertions
//! - [`FixedClock`]: deterministic time
//! - [`init_test_tracing`]: opt-in log output for a failing test
//!
//! ## Example
//!
//! ```ignore
//! use storefront_testing::{assertions, ReducerTest};
//!
//! ReducerTest::new(AuthReducer::new())
//!     .with_env(test_environment())
//!     .given_state(AuthState::sign_in())
//!     .when_action(AuthAction::ToggleMode)
//!     .then_state(|state| assert_eq!(state.mode, AuthMode::SignUp))
//!     .then_effects(assertions::assert_no_effects)
//!     .run();
//! ```

use chrono::{DateTime, Utc};
use storefront_core::environment::Clock;


pub use reducer_test::{ReducerTest, assertions};

/// Mock implementations of core environment traits
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// # Example
    ///
    /// ```
    /// use storefront_testing::mocks::FixedClock;
    /// use storefront_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock at the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Fixed clock at 2025-01-01 00:00:00 UTC
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(DateTime::<Utc>::UNIX_EPOCH + chrono::Duration::days(20_089))
    }
}

/// Install a `fmt` subscriber honouring `RUST_LOG`, once per test binary
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub use mocks::{FixedClock, test_clock};
