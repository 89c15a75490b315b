//! Dispatch and template/drawn fallback.

use std::sync::Arc;

use super::composers::{composer_for, Composer, FormContext};
use super::export::generate_file_name;
use super::metadata::{self, FormMetadata};
use super::model::{FieldValues, GenerationRequest};
use super::templates::{template_file, InMemoryTemplateSource, TemplateError, TemplateSource};
use super::{acroform, official, pdf, FormsError, GeneratedDocument, RenderStrategy};
use crate::metrics;

/// Distinguished form type filled from the built-in official template.
pub const OFFICIAL_FORM_TYPE: &str = "UPL-1";

/// How a form type is produced.
#[derive(Clone, Copy)]
pub enum Strategy {
    /// Built-in official template; never falls back.
    Official,
    /// Registered template file, drawn by `fallback` when filling fails.
    Template {
        file: &'static str,
        fallback: Composer,
    },
    Drawn(Composer),
}

impl std::fmt::Debug for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Official => f.write_str("Official"),
            Self::Template { file, .. } => f.debug_struct("Template").field("file", file).finish(),
            Self::Drawn(_) => f.write_str("Drawn"),
        }
    }
}

/// Strategy for a catalog entry; `None` means the type is not wired up.
pub fn select_strategy(meta: &FormMetadata) -> Option<Strategy> {
    if meta.form_type == OFFICIAL_FORM_TYPE {
        return Some(Strategy::Official);
    }
    let composer = composer_for(meta.form_type)?;
    Some(match template_file(meta.form_type) {
        Some(file) => Strategy::Template {
            file,
            fallback: composer,
        },
        None => Strategy::Drawn(composer),
    })
}

enum Rendered {
    Filled(Vec<u8>),
    Drawn(Vec<u8>),
}

impl Rendered {
    fn into_parts(self) -> (Vec<u8>, RenderStrategy) {
        match self {
            Self::Filled(pdf) => (pdf, RenderStrategy::Template),
            Self::Drawn(pdf) => (pdf, RenderStrategy::Drawn),
        }
    }
}

/// Produces pre-filled form PDFs.
///
/// Holds no per-request state; concurrent calls are independent.
#[derive(Clone)]
pub struct FormDocumentGenerator {
    templates: Arc<dyn TemplateSource>,
}

impl FormDocumentGenerator {
    pub fn new(templates: Arc<dyn TemplateSource>) -> Self {
        Self { templates }
    }

    /// Generator without template files; template-backed types are drawn.
    pub fn without_templates() -> Self {
        Self::new(Arc::new(InMemoryTemplateSource::new()))
    }

    pub async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GeneratedDocument, FormsError> {
        let meta = metadata::lookup(&request.form_type)
            .ok_or_else(|| FormsError::UnsupportedFormType(request.form_type.clone()))?;
        let strategy = select_strategy(meta)
            .ok_or_else(|| FormsError::UnsupportedFormType(request.form_type.clone()))?;

        let issued_on = request.issued_on();
        let request = &request.clone().on(issued_on);
        let values = request.field_values();
        let mut warnings = missing_required_warnings(meta, &values);

        let ctx = FormContext {
            meta,
            request,
            values: &values,
            issued_on,
        };

        let rendered = match strategy {
            Strategy::Official => Rendered::Filled(official::fill(&values, meta)?),
            Strategy::Template { file, fallback } => {
                match self.fill_template(file, &values, meta).await {
                    Ok(pdf) => Rendered::Filled(pdf),
                    Err(err) => {
                        log::warn!(
                            "template fill for {} failed ({}), drawing the form instead",
                            meta.form_type,
                            err
                        );
                        metrics::record_fallback(meta.form_type);
                        warnings.push(format!(
                            "Nie udało się wypełnić szablonu {file}: {err}. Formularz wygenerowano bez szablonu."
                        ));
                        Rendered::Drawn(pdf::render(&fallback(&ctx))?)
                    }
                }
            }
            Strategy::Drawn(composer) => Rendered::Drawn(pdf::render(&composer(&ctx))?),
        };

        let (pdf, strategy) = rendered.into_parts();
        metrics::record_generated(meta.form_type, strategy.as_str());
        log::info!(
            "generated {} for {} ({}, {} bytes, {} warnings)",
            meta.form_type,
            request.client.full_name(),
            strategy.as_str(),
            pdf.len(),
            warnings.len()
        );

        Ok(GeneratedDocument {
            form_type: meta.form_type.to_string(),
            file_name: generate_file_name(meta.form_type, &request.client, issued_on),
            pdf,
            issued_on,
            strategy,
            warnings,
        })
    }

    async fn fill_template(
        &self,
        file: &str,
        values: &FieldValues,
        meta: &FormMetadata,
    ) -> Result<Vec<u8>, TemplateError> {
        let template = self.templates.load(file).await?;
        acroform::fill_template(&template, &meta.listed_values(values), meta.required_fields)
    }
}

fn missing_required_warnings(meta: &FormMetadata, values: &FieldValues) -> Vec<String> {
    meta.required_fields
        .iter()
        .filter(|key| !values.contains_key(**key))
        .map(|key| format!("Brak wymaganego pola '{key}' dla formularza {}", meta.form_type))
        .collect()
}
