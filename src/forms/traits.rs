//! Traits for generator system standardization.

use super::validation::ValidationErrors;

/// Trait for validating request objects.
pub trait Validator {
    /// Validate the state of the object, reporting every problem at once.
    fn validate(&self) -> Result<(), ValidationErrors>;
}
