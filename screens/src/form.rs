//! Form validation aggregator.
//!
//! A form declares a fixed set of fields up front. Every keystroke produces a
//! [`FieldUpdate`] carrying the raw value and the validity computed by a field
//! validator; [`FormState::apply`] turns the current snapshot plus one update
//! into the next snapshot and recomputes the whole-form validity.
//!
//! Values and validities are stored in one entry per field, so they are always
//! replaced together. The field set is ordered by the field enum, which fixes
//! the traversal order of the aggregate.

use crate::error::FormError;
use std::collections::BTreeMap;
use std::fmt;
use storefront_core::{SmallVec, effect::Effect, reducer::Reducer};

/// A closed set of field identifiers for one form
///
/// Implemented by a fieldless enum per form. `Ord` fixes the traversal order
/// of the aggregate; `Display` names the field in logs and errors.
pub trait FormField: Copy + Ord + fmt::Debug + fmt::Display + Send + Sync + 'static {}

impl<T> FormField for T where T: Copy + Ord + fmt::Debug + fmt::Display + Send + Sync + 'static {}

/// Value and validity of one field
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldState {
    /// Raw field content
    pub value: String,
    /// Outcome of the field validator for `value`
    pub is_valid: bool,
}

impl FieldState {
    /// Create a field state
    #[must_use]
    pub fn new(value: impl Into<String>, is_valid: bool) -> Self {
        Self {
            value: value.into(),
            is_valid,
        }
    }

    /// An empty, not yet valid field
    #[must_use]
    pub const fn blank() -> Self {
        Self {
            value: String::new(),
            is_valid: false,
        }
    }
}

/// One edit of one field
#[derive(Clone, PartialEq, Eq)]
pub struct FieldUpdate<F> {
    /// Field being edited
    pub field: F,
    /// New raw value
    pub value: String,
    /// Validity of `value` as judged by the field validator
    pub is_valid: bool,
}

impl<F> FieldUpdate<F> {
    /// Create a field update
    #[must_use]
    pub fn new(field: F, value: impl Into<String>, is_valid: bool) -> Self {
        Self {
            field,
            value: value.into(),
            is_valid,
        }
    }
}

// Field values may be passwords; only their length is printed.
impl<F: fmt::Debug> fmt::Debug for FieldUpdate<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldUpdate")
            .field("field", &self.field)
            .field("value_len", &self.value.chars().count())
            .field("is_valid", &self.is_valid)
            .finish()
    }
}

/// Snapshot of a form: every declared field plus the aggregate validity
///
/// Snapshots are values. [`apply`](Self::apply) never modifies `self`, so an
/// earlier snapshot stays valid for comparison.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormState<F: FormField> {
    fields: BTreeMap<F, FieldState>,
    form_is_valid: bool,
}

impl<F: FormField> FormState<F> {
    /// Declare a form with initial field states
    ///
    /// # Errors
    ///
    /// Returns [`FormError::NoFields`] if `fields` is empty. The aggregate of
    /// an empty form is not defined.
    pub fn new(fields: impl IntoIterator<Item = (F, FieldState)>) -> Result<Self, FormError> {
        let fields: BTreeMap<F, FieldState> = fields.into_iter().collect();
        if fields.is_empty() {
            return Err(FormError::NoFields);
        }
        let form_is_valid = aggregate(&fields);
        Ok(Self {
            fields,
            form_is_valid,
        })
    }

    /// Declare a form whose fields all start empty and invalid
    ///
    /// # Errors
    ///
    /// Returns [`FormError::NoFields`] if `fields` is empty.
    pub fn blank(fields: &[F]) -> Result<Self, FormError> {
        Self::new(fields.iter().map(|field| (*field, FieldState::blank())))
    }

    /// Declare a form from a fixed, non-empty list of fields, all blank
    ///
    /// The non-empty precondition is checked at compile time.
    #[must_use]
    pub fn declare<const N: usize>(fields: [F; N]) -> Self {
        const { assert!(N > 0, "a form must declare at least one field") };
        let fields: BTreeMap<F, FieldState> = fields
            .into_iter()
            .map(|field| (field, FieldState::blank()))
            .collect();
        let form_is_valid = aggregate(&fields);
        Self {
            fields,
            form_is_valid,
        }
    }

    /// Apply one field update, producing the next snapshot
    ///
    /// The entry for `update.field` is replaced (value and validity together)
    /// and the aggregate is recomputed over every declared field.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::UnknownField`] if the field was not declared.
    /// Dropping such an update silently would leave the displayed and the
    /// recorded validity out of step.
    pub fn apply(&self, update: &FieldUpdate<F>) -> Result<Self, FormError> {
        if !self.fields.contains_key(&update.field) {
            return Err(FormError::UnknownField(update.field.to_string()));
        }

        let mut fields = self.fields.clone();
        fields.insert(
            update.field,
            FieldState::new(update.value.clone(), update.is_valid),
        );
        let form_is_valid = aggregate(&fields);

        Ok(Self {
            fields,
            form_is_valid,
        })
    }

    /// Whether every declared field is valid
    #[must_use]
    pub const fn form_is_valid(&self) -> bool {
        self.form_is_valid
    }

    /// Current state of a field, if declared
    #[must_use]
    pub fn field(&self, field: F) -> Option<&FieldState> {
        self.fields.get(&field)
    }

    /// Current raw value of a field, if declared
    #[must_use]
    pub fn value(&self, field: F) -> Option<&str> {
        self.fields.get(&field).map(|state| state.value.as_str())
    }

    /// Current validity of a field, if declared
    #[must_use]
    pub fn is_valid(&self, field: F) -> Option<bool> {
        self.fields.get(&field).map(|state| state.is_valid)
    }

    /// Declared fields in traversal order
    pub fn fields(&self) -> impl Iterator<Item = F> + '_ {
        self.fields.keys().copied()
    }

    /// Fields that are currently invalid, in traversal order
    pub fn invalid_fields(&self) -> impl Iterator<Item = F> + '_ {
        self.fields
            .iter()
            .filter(|(_, state)| !state.is_valid)
            .map(|(field, _)| *field)
    }
}

/// Logical AND over the ordered field set
fn aggregate<F: FormField>(fields: &BTreeMap<F, FieldState>) -> bool {
    fields.values().fold(true, |valid, state| valid && state.is_valid)
}

/// Apply `update` to `form` inside a reducer
///
/// An update naming an undeclared field is rejected: `form` is left as it was
/// and the violation is logged. Returns whether the update was applied.
pub fn apply_or_reject<F: FormField>(form: &mut FormState<F>, update: &FieldUpdate<F>) -> bool {
    match form.apply(update) {
        Ok(next) => {
            tracing::debug!(
                field = %update.field,
                is_valid = update.is_valid,
                form_is_valid = next.form_is_valid(),
                "Field updated"
            );
            *form = next;
            true
        },
        Err(error) => {
            tracing::warn!(error = %error, "Rejected field update");
            false
        },
    }
}

/// Actions accepted by [`FormReducer`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormAction<F> {
    /// A field's value and validity changed
    InputChanged(FieldUpdate<F>),
}

/// Reducer adapter around [`FormState::apply`]
///
/// Unknown fields are rejected: the state is left as it was and the violation
/// is logged.
#[derive(Debug, Clone, Copy)]
pub struct FormReducer<F> {
    _field: std::marker::PhantomData<F>,
}

impl<F> FormReducer<F> {
    /// Create a form reducer
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _field: std::marker::PhantomData,
        }
    }
}

impl<F> Default for FormReducer<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: FormField> Reducer for FormReducer<F> {
    type State = FormState<F>;
    type Action = FormAction<F>;
    type Environment = ();

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            FormAction::InputChanged(update) => {
                apply_or_reject(state, &update);
            },
        }

        SmallVec::new()
    }
}
