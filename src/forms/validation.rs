//! Input validation for generation requests.
//!
//! Messages are written for the office staff filling in the request, in
//! Polish, with a suggestion how to fix the value. All problems are
//! collected before reporting.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use utoipa::ToSchema;

use super::metadata;
use super::model::{Client, GenerationRequest};
use super::traits::Validator;

lazy_static! {
    static ref ZIP_CODE: Regex = Regex::new(r"^\d{2}-\d{3}$").unwrap();
}

/// Validation error with a user-facing message.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ValidationError {
    /// The field that failed validation
    pub field: String,
    pub message: String,
    /// How to fix the value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn empty_field(field: &str, label: &str) -> Self {
        Self::new(field, format!("{} nie może być puste", label))
            .with_suggestion(format!("Uzupełnij pole {}", label.to_lowercase()))
    }

    /// Identifier with the wrong number of digits.
    pub fn invalid_number(field: &str, label: &str, expected: &str, example: &str) -> Self {
        Self::new(field, format!("{} musi składać się z {} cyfr", label, expected))
            .with_suggestion(format!("Sprawdź {}, przykład: {}", label, example))
    }

    pub fn invalid_zip_code(field: &str) -> Self {
        Self::new(field, "Kod pocztowy ma nieprawidłowy format")
            .with_suggestion("Użyj formatu NN-NNN, przykład: 00-001")
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.field, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, ". {}", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Collection of validation errors with formatted output.
#[derive(Debug, Default, Clone, Serialize, ToSchema)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Numbered list of problems, for tool responses and error bodies.
    pub fn to_message(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }

        let mut parts = vec![format!(
            "Walidacja nie powiodła się: znaleziono {} błędów\n",
            self.errors.len()
        )];
        for (i, error) in self.errors.iter().enumerate() {
            parts.push(format!("{}. {}", i + 1, error));
        }
        parts.push(String::new());
        parts.push("Popraw powyższe dane i spróbuj ponownie.".to_string());

        parts.join("\n")
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_message())
    }
}

impl std::error::Error for ValidationErrors {}

// ============================================================================
// Validation functions
// ============================================================================

/// Digits-only identifier of one of the `lengths`; blank values are skipped.
pub fn validate_digits(
    value: Option<&str>,
    field: &str,
    label: &str,
    lengths: &[usize],
    example: &str,
    errors: &mut ValidationErrors,
) {
    let Some(trimmed) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return;
    };
    // separators are common in hand-typed numbers
    let compact: String = trimmed.chars().filter(|c| *c != '-' && *c != ' ').collect();
    if !compact.chars().all(|c| c.is_ascii_digit()) || !lengths.contains(&compact.len()) {
        let expected = lengths
            .iter()
            .map(usize::to_string)
            .collect::<Vec<_>>()
            .join(" lub ");
        errors.add(ValidationError::invalid_number(field, label, &expected, example));
    }
}

pub fn validate_zip_code(value: Option<&str>, field: &str, errors: &mut ValidationErrors) {
    if let Some(zip) = value.map(str::trim).filter(|v| !v.is_empty()) {
        if !ZIP_CODE.is_match(zip) {
            errors.add(ValidationError::invalid_zip_code(field));
        }
    }
}

/// Identity checks shared by every form.
pub fn validate_client(client: &Client, errors: &mut ValidationErrors) {
    let has_name = !client.full_name().is_empty()
        || client
            .company_name
            .as_deref()
            .is_some_and(|name| !name.trim().is_empty());
    if !has_name {
        errors.add(ValidationError::empty_field(
            "client.lastName",
            "Imię i nazwisko lub nazwa firmy",
        ));
    }

    validate_digits(client.nip.as_deref(), "client.nip", "NIP", &[10], "1234567890", errors);
    validate_digits(
        client.regon.as_deref(),
        "client.regon",
        "REGON",
        &[9, 14],
        "123456789",
        errors,
    );
    validate_digits(client.krs.as_deref(), "client.krs", "KRS", &[10], "0000123456", errors);
    validate_digits(
        client.pesel.as_deref(),
        "client.pesel",
        "PESEL",
        &[11],
        "80010112345",
        errors,
    );
    if let Some(address) = &client.address {
        validate_zip_code(address.zip_code.as_deref(), "client.address.zipCode", errors);
    }
}

impl Validator for GenerationRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.form_type.trim().is_empty() {
            errors.add(ValidationError::empty_field("formType", "Typ formularza"));
        }
        validate_client(&self.client, &mut errors);

        let needs_attorney = metadata::lookup(&self.form_type).is_some_and(|m| m.is_authorization());
        if needs_attorney {
            match &self.employee {
                None => errors.add(
                    ValidationError::new("employee", "Pełnomocnictwo wymaga wskazania pełnomocnika")
                        .with_suggestion("Wybierz pracownika biura jako pełnomocnika"),
                ),
                Some(employee) if employee.full_name().is_empty() => errors.add(
                    ValidationError::empty_field("employee.lastName", "Imię i nazwisko pełnomocnika"),
                ),
                Some(_) => {}
            }
        }

        errors.into_result()
    }
}
