//! Sign-in / sign-up screen.
//!
//! The screen owns an email + password form. Submission is only possible
//! while the form aggregate is valid and no earlier submission is waiting for
//! an answer. A failed round trip leaves the form exactly as it was so the user
//! can retry without typing again.

use crate::environment::{AuthGrant, AuthService, Credentials, FieldValidator};
use crate::error::SubmitError;
use crate::form::{FieldUpdate, FormState, apply_or_reject};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use storefront_core::environment::Clock;
use storefront_core::{SmallVec, async_effect, effect::Effect, reducer::Reducer, smallvec};

/// Fields of the auth form
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AuthField {
    /// Account email
    Email,
    /// Account password
    Password,
}

impl AuthField {
    /// Every field, in form order
    pub const ALL: [Self; 2] = [Self::Email, Self::Password];
}

impl fmt::Display for AuthField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Email => write!(f, "email"),
            Self::Password => write!(f, "password"),
        }
    }
}

/// Whether the form signs in or creates an account
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum AuthMode {
    /// Sign in to an existing account
    #[default]
    SignIn,
    /// Create a new account
    SignUp,
}

impl AuthMode {
    /// The other mode
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::SignIn => Self::SignUp,
            Self::SignUp => Self::SignIn,
        }
    }
}

/// A signed-in session
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Account identifier
    pub user_id: String,
    /// Bearer token
    pub token: String,
    /// When the token stops being accepted
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Build a session from a grant received at `now`
    #[must_use]
    pub fn from_grant(grant: AuthGrant, now: DateTime<Utc>) -> Self {
        let expires_at = chrono::Duration::from_std(grant.expires_in)
            .ok()
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self {
            user_id: grant.user_id,
            token: grant.token,
            expires_at,
        }
    }

    /// Whether the session has expired at `now`
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// State of the auth screen
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthState {
    /// Email + password form
    pub form: FormState<AuthField>,
    /// Sign in or sign up
    pub mode: AuthMode,
    /// A submission is waiting for the service
    pub is_submitting: bool,
    /// Last service failure, shown verbatim
    pub error: Option<String>,
    /// Informational message (e.g. account created)
    pub notice: Option<String>,
    /// Session after a successful sign-in
    pub session: Option<Session>,
}

impl Default for AuthState {
    fn default() -> Self {
        Self::sign_in()
    }
}

impl AuthState {
    /// A blank form in sign-in mode
    #[must_use]
    pub fn sign_in() -> Self {
        Self::with_mode(AuthMode::SignIn)
    }

    /// A blank form in sign-up mode
    #[must_use]
    pub fn sign_up() -> Self {
        Self::with_mode(AuthMode::SignUp)
    }

    fn with_mode(mode: AuthMode) -> Self {
        Self {
            form: FormState::declare(AuthField::ALL),
            mode,
            is_submitting: false,
            error: None,
            notice: None,
            session: None,
        }
    }

    /// Whether the submit control is enabled
    #[must_use]
    pub const fn can_submit(&self) -> bool {
        self.form.form_is_valid() && !self.is_submitting
    }

    /// Credentials to submit
    ///
    /// # Errors
    ///
    /// - [`SubmitError::AlreadySubmitting`] while a submission is in flight
    /// - [`SubmitError::FormInvalid`] while any field is invalid
    pub fn credentials(&self) -> Result<Credentials, SubmitError> {
        if self.is_submitting {
            return Err(SubmitError::AlreadySubmitting);
        }
        if !self.form.form_is_valid() {
            return Err(SubmitError::FormInvalid);
        }
        Ok(Credentials::new(
            self.form.value(AuthField::Email).unwrap_or_default(),
            self.form.value(AuthField::Password).unwrap_or_default(),
        ))
    }

    /// Label of the submit control
    #[must_use]
    pub const fn submit_label(&self) -> &'static str {
        match self.mode {
            AuthMode::SignIn => "Sign in",
            AuthMode::SignUp => "Create account",
        }
    }

    /// Label of the mode switch
    #[must_use]
    pub const fn toggle_label(&self) -> &'static str {
        match self.mode {
            AuthMode::SignIn => "Create a new account",
            AuthMode::SignUp => "I want to sign in",
        }
    }
}

/// Shown after a successful sign-up
pub const ACCOUNT_CREATED_NOTICE: &str = "Your account was created. You can sign in now.";

/// Actions of the auth screen
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthAction {
    /// A field changed; validity was judged by the caller
    InputChanged(FieldUpdate<AuthField>),
    /// A field changed; validity is judged by the environment's validator
    FieldEdited {
        /// Edited field
        field: AuthField,
        /// New raw value
        value: String,
    },
    /// Switch between sign-in and sign-up
    ToggleMode,
    /// Submit the credentials
    Submit,
    /// The service accepted a sign-in
    SignedIn {
        /// Token grant
        grant: AuthGrant,
    },
    /// The service created the account
    SignedUp,
    /// The service refused or could not be reached
    AuthFailed {
        /// Message for the user
        message: String,
    },
    /// The user dismissed the error
    DismissError,
}

/// Collaborators of the auth screen
#[derive(Clone)]
pub struct AuthEnvironment {
    /// Authentication service
    pub auth: Arc<dyn AuthService>,
    /// Per-field validator
    pub validator: Arc<dyn FieldValidator<AuthField>>,
    /// Clock for session expiry
    pub clock: Arc<dyn Clock>,
}

impl AuthEnvironment {
    /// Creates a new `AuthEnvironment`
    #[must_use]
    pub fn new(
        auth: Arc<dyn AuthService>,
        validator: Arc<dyn FieldValidator<AuthField>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            auth,
            validator,
            clock,
        }
    }
}

/// Reducer for the auth screen
#[derive(Clone, Debug, Default)]
pub struct AuthReducer;

impl AuthReducer {
    /// Creates a new `AuthReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn submit(state: &mut AuthState, env: &AuthEnvironment) -> SmallVec<[Effect<AuthAction>; 4]> {
        let credentials = match state.credentials() {
            Ok(credentials) => credentials,
            Err(error) => {
                tracing::warn!(error = %error, "Rejected submit");
                return SmallVec::new();
            },
        };

        state.is_submitting = true;
        state.error = None;
        state.notice = None;
        tracing::info!(mode = ?state.mode, "Submitting credentials");

        let auth = Arc::clone(&env.auth);
        match state.mode {
            AuthMode::SignIn => smallvec![async_effect! {
                Some(match auth.login(&credentials).await {
                    Ok(grant) => AuthAction::SignedIn { grant },
                    Err(error) => AuthAction::AuthFailed { message: error.user_message() },
                })
            }],
            AuthMode::SignUp => smallvec![async_effect! {
                Some(match auth.signup(&credentials).await {
                    Ok(()) => AuthAction::SignedUp,
                    Err(error) => AuthAction::AuthFailed { message: error.user_message() },
                })
            }],
        }
    }
}

impl Reducer for AuthReducer {
    type State = AuthState;
    type Action = AuthAction;
    type Environment = AuthEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            AuthAction::InputChanged(update) => {
                apply_or_reject(&mut state.form, &update);
                SmallVec::new()
            },
            AuthAction::FieldEdited { field, value } => {
                let is_valid = env.validator.is_valid(field, &value);
                apply_or_reject(&mut state.form, &FieldUpdate::new(field, value, is_valid));
                SmallVec::new()
            },
            AuthAction::ToggleMode => {
                if state.is_submitting {
                    tracing::warn!("Rejected mode switch while submitting");
                    return SmallVec::new();
                }
                state.mode = state.mode.toggled();
                state.error = None;
                state.notice = None;
                SmallVec::new()
            },
            AuthAction::Submit => Self::submit(state, env),
            AuthAction::SignedIn { grant } => {
                if !state.is_submitting {
                    tracing::warn!("Ignored sign-in answer with no submission in flight");
                    return SmallVec::new();
                }
                state.is_submitting = false;
                state.session = Some(Session::from_grant(grant, env.clock.now()));
                tracing::info!("Signed in");
                SmallVec::new()
            },
            AuthAction::SignedUp => {
                if !state.is_submitting {
                    tracing::warn!("Ignored sign-up answer with no submission in flight");
                    return SmallVec::new();
                }
                state.is_submitting = false;
                state.mode = AuthMode::SignIn;
                state.notice = Some(ACCOUNT_CREATED_NOTICE.to_string());
                tracing::info!("Account created");
                SmallVec::new()
            },
            AuthAction::AuthFailed { message } => {
                if !state.is_submitting {
                    tracing::warn!("Ignored auth failure with no submission in flight");
                    return SmallVec::new();
                }
                state.is_submitting = false;
                tracing::info!(message = %message, "Authentication failed");
                state.error = Some(message);
                SmallVec::new()
            },
            AuthAction::DismissError => {
                state.error = None;
                SmallVec::new()
            },
        }
    }
}
