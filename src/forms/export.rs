//! File naming and saving of generated documents.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;
use utoipa::ToSchema;

use super::common::iso_date;
use super::generator::FormDocumentGenerator;
use super::model::{Client, GenerationRequest};
use super::{FormsError, GeneratedDocument};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("invalid file name '{0}'")]
    InvalidFileName(String),
    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// `{formType}_{lastName}_{firstName}_{YYYY-MM-DD}.pdf`
pub fn generate_file_name(form_type: &str, client: &Client, date: NaiveDate) -> String {
    format!(
        "{}_{}_{}_{}.pdf",
        form_type,
        client.last_name.trim(),
        client.first_name.trim(),
        iso_date(date)
    )
}

/// Where a saved document ended up.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SavedDocument {
    pub file_name: String,
    pub path: String,
    pub size_bytes: usize,
}

/// Destination for generated documents.
#[async_trait]
pub trait DocumentSink: Send + Sync {
    async fn save(&self, file_name: &str, pdf: &[u8]) -> Result<SavedDocument, ExportError>;
}

/// Writes documents into a directory, creating it on first use.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    root: PathBuf,
}

impl DirectorySink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl DocumentSink for DirectorySink {
    async fn save(&self, file_name: &str, pdf: &[u8]) -> Result<SavedDocument, ExportError> {
        let safe_name = sanitize_filename::sanitize(file_name);
        if safe_name.trim().is_empty() {
            return Err(ExportError::InvalidFileName(file_name.to_string()));
        }

        let io_error = |path: &PathBuf, source| ExportError::Io {
            path: path.display().to_string(),
            source,
        };

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| io_error(&self.root, e))?;
        let path = self.root.join(&safe_name);
        tokio::fs::write(&path, pdf)
            .await
            .map_err(|e| io_error(&path, e))?;

        log::info!("saved {} ({} bytes)", path.display(), pdf.len());
        Ok(SavedDocument {
            file_name: safe_name,
            path: path.display().to_string(),
            size_bytes: pdf.len(),
        })
    }
}

/// Hand a generated document to the sink. Failures are returned as-is.
pub async fn export(
    document: &GeneratedDocument,
    sink: &dyn DocumentSink,
) -> Result<SavedDocument, ExportError> {
    sink.save(&document.file_name, &document.pdf).await
}

/// Generate and save in one step.
pub async fn download(
    generator: &FormDocumentGenerator,
    request: &GenerationRequest,
    sink: &dyn DocumentSink,
) -> Result<(GeneratedDocument, SavedDocument), FormsError> {
    let document = generator.generate(request).await?;
    let saved = export(&document, sink).await?;
    Ok((document, saved))
}
