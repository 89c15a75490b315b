//! Shared application state handed to every handler.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::directory::Directory;
use crate::forms::{
    CachedTemplateSource, DirectorySink, DocumentSink, FormDocumentGenerator, FsTemplateSource,
};

#[derive(Clone)]
pub struct AppState {
    pub generator: FormDocumentGenerator,
    pub directory: Arc<Directory>,
    pub sink: Arc<dyn DocumentSink>,
}

impl AppState {
    pub fn new(
        generator: FormDocumentGenerator,
        directory: Arc<Directory>,
        sink: Arc<dyn DocumentSink>,
    ) -> Self {
        Self {
            generator,
            directory,
            sink,
        }
    }

    /// Load the directory seed and wire templates and output from config.
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let directory = Directory::load(&config.directory_file)?;

        let templates = CachedTemplateSource::new(
            FsTemplateSource::new(&config.templates_dir),
            config.template_cache_ttl,
        );
        log::info!(
            "Templates from {} (cache ttl {}s), output to {}",
            config.templates_dir.display(),
            config.template_cache_ttl.as_secs(),
            config.output_dir.display()
        );

        Ok(Self::new(
            FormDocumentGenerator::new(Arc::new(templates)),
            Arc::new(directory),
            Arc::new(DirectorySink::new(&config.output_dir)),
        ))
    }
}
