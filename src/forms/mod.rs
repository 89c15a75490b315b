//! Form generation - Polish tax and authorization forms as PDF.
//!
//! - `metadata` - static catalog of form types
//! - `sections` / `composers` - drawn composition per form type
//! - `official` / `acroform` / `templates` - template filling
//! - `generator` - strategy selection with drawn fallback
//! - `export` - file naming and saving

pub mod acroform;
pub mod common;
pub mod composers;
pub mod export;
pub mod generator;
pub mod handlers;
pub mod layout;
pub mod metadata;
pub mod model;
pub mod official;
pub mod pdf;
pub mod sections;
pub mod templates;
pub mod traits;
pub mod validation;

pub use export::{download, export, generate_file_name, DirectorySink, DocumentSink, ExportError, SavedDocument};
pub use generator::{select_strategy, FormDocumentGenerator, Strategy};
pub use metadata::{Complexity, FormCategory, FormMetadata};
pub use model::{Address, AuxFields, Client, Employee, FieldValues, GenerationRequest};
pub use pdf::PdfError;
pub use templates::{CachedTemplateSource, FsTemplateSource, InMemoryTemplateSource, TemplateError, TemplateSource};
pub use traits::Validator;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Errors that can occur during form generation.
#[derive(Debug, Error)]
pub enum FormsError {
    #[error("unsupported form type: {0}")]
    UnsupportedFormType(String),
    #[error("template fill failed: {0}")]
    Template(#[from] TemplateError),
    #[error("PDF rendering failed: {0}")]
    Pdf(#[from] PdfError),
    #[error("export failed: {0}")]
    Export(#[from] ExportError),
}

/// Which path produced a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RenderStrategy {
    Template,
    Drawn,
}

impl RenderStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Template => "template",
            Self::Drawn => "drawn",
        }
    }
}

/// Result of a successful generation.
#[derive(Debug, Clone)]
pub struct GeneratedDocument {
    pub form_type: String,
    pub file_name: String,
    pub pdf: Vec<u8>,
    pub issued_on: NaiveDate,
    pub strategy: RenderStrategy,
    /// Fallbacks and missing required fields; empty on a clean run.
    pub warnings: Vec<String>,
}
