//! Template resources for template-backed form types.

use async_trait::async_trait;
use moka::future::Cache;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template '{0}' not found")]
    NotFound(String),
    #[error("failed to read template '{file}': {source}")]
    Io {
        file: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed template: {0}")]
    Malformed(String),
    #[error("template has no form field for required key '{0}'")]
    MissingField(String),
}

/// Template file registered for a form type, if any.
pub fn template_file(form_type: &str) -> Option<&'static str> {
    match form_type {
        "UPL-1P" => Some("UPL-1P.pdf"),
        "PEL" => Some("PEL.pdf"),
        "PIT-11" => Some("PIT-11.pdf"),
        "VAT-7" => Some("VAT-7.pdf"),
        "ZUS-ZUA" => Some("ZUS-ZUA.pdf"),
        _ => None,
    }
}

/// Provider of fillable template files.
#[async_trait]
pub trait TemplateSource: Send + Sync {
    async fn load(&self, file: &str) -> Result<Arc<Vec<u8>>, TemplateError>;
}

/// Templates read from a directory on disk.
#[derive(Debug, Clone)]
pub struct FsTemplateSource {
    root: PathBuf,
}

impl FsTemplateSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl TemplateSource for FsTemplateSource {
    async fn load(&self, file: &str) -> Result<Arc<Vec<u8>>, TemplateError> {
        let path = self.root.join(sanitize_filename::sanitize(file));
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Arc::new(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(TemplateError::NotFound(file.to_string())),
            Err(source) => Err(TemplateError::Io {
                file: file.to_string(),
                source,
            }),
        }
    }
}

/// Templates held in memory, keyed by file name.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTemplateSource {
    files: HashMap<String, Arc<Vec<u8>>>,
}

impl InMemoryTemplateSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, file: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.insert(file, bytes);
        self
    }

    pub fn insert(&mut self, file: impl Into<String>, bytes: Vec<u8>) {
        self.files.insert(file.into(), Arc::new(bytes));
    }
}

#[async_trait]
impl TemplateSource for InMemoryTemplateSource {
    async fn load(&self, file: &str) -> Result<Arc<Vec<u8>>, TemplateError> {
        self.files
            .get(file)
            .cloned()
            .ok_or_else(|| TemplateError::NotFound(file.to_string()))
    }
}

/// Keeps recently loaded templates in memory. Failed loads are not cached.
pub struct CachedTemplateSource<S> {
    inner: S,
    cache: Cache<String, Arc<Vec<u8>>>,
}

impl<S: TemplateSource> CachedTemplateSource<S> {
    pub fn new(inner: S, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .time_to_live(ttl)
            .max_capacity(32)
            .build();
        Self { inner, cache }
    }
}

#[async_trait]
impl<S: TemplateSource> TemplateSource for CachedTemplateSource<S> {
    async fn load(&self, file: &str) -> Result<Arc<Vec<u8>>, TemplateError> {
        if let Some(bytes) = self.cache.get(file).await {
            log::debug!("template cache hit for {}", file);
            return Ok(bytes);
        }

        let bytes = self.inner.load(file).await?;
        self.cache.insert(file.to_string(), bytes.clone()).await;
        Ok(bytes)
    }
}
