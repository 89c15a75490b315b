//! HTTP surface of the form generator.

use actix_web::http::header::{
    Charset, ContentDisposition, DispositionParam, DispositionType, ExtendedValue,
};
use actix_web::{web, HttpResponse, Responder};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::{IntoParams, ToSchema};

use super::export::export;
use super::generator::{select_strategy, Strategy};
use super::metadata::{self, Complexity, FormCategory, FormMetadata};
use super::model::{AuxFields, Client, Employee, GenerationRequest};
use super::pdf::encode_win_ansi;
use super::traits::Validator;
use super::validation::ValidationErrors;
use super::{FormsError, GeneratedDocument, RenderStrategy};
use crate::directory::Directory;
use crate::state::AppState;
use crate::{ErrorResponse, ValidationErrorResponse};

/// Catalog entry as served over HTTP.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormSummary {
    pub form_type: String,
    pub name: String,
    pub description: String,
    pub complexity: Complexity,
    pub category: FormCategory,
    pub required_fields: Vec<String>,
    pub optional_fields: Vec<String>,
    /// "official", "template" or "drawn"
    pub strategy: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_file: Option<String>,
}

impl From<&FormMetadata> for FormSummary {
    fn from(meta: &FormMetadata) -> Self {
        let (strategy, template_file) = match select_strategy(meta) {
            Some(Strategy::Official) => ("official", None),
            Some(Strategy::Template { file, .. }) => ("template", Some(file.to_string())),
            Some(Strategy::Drawn(_)) | None => ("drawn", None),
        };
        Self {
            form_type: meta.form_type.to_string(),
            name: meta.name.to_string(),
            description: meta.description.to_string(),
            complexity: meta.complexity,
            category: meta.category,
            required_fields: meta.required_fields.iter().map(|f| f.to_string()).collect(),
            optional_fields: meta.optional_fields.iter().map(|f| f.to_string()).collect(),
            strategy: strategy.to_string(),
            template_file,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FormsQuery {
    /// pelnomocnictwa, pit, vat, cit, zus, jpk or inne
    pub category: Option<String>,
    /// simple, medium or complex
    pub complexity: Option<String>,
}

/// Generation request as posted by the frontend.
///
/// Either `clientId` (looked up in the directory) or an inline `client`
/// must be given; the same goes for the optional employee.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateFormBody {
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub client: Option<Client>,
    #[serde(default)]
    pub employee_id: Option<String>,
    #[serde(default)]
    pub employee: Option<Employee>,
    pub form_type: String,
    #[serde(default)]
    pub fields: AuxFields,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExportResponse {
    pub file_name: String,
    pub path: String,
    pub strategy: RenderStrategy,
    pub warnings: Vec<String>,
    pub size_bytes: usize,
}

/// Why a posted body could not become a [`GenerationRequest`].
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Nieobsługiwany typ formularza: {0}")]
    UnknownFormType(String),
    #[error("Podaj clientId albo dane klienta (client)")]
    MissingClient,
    #[error("Nie znaleziono klienta o ID '{0}'")]
    ClientNotFound(String),
    #[error("Nie znaleziono pracownika o ID '{0}'")]
    EmployeeNotFound(String),
    #[error("{0}")]
    Invalid(ValidationErrors),
}

impl RequestError {
    fn into_response(self) -> HttpResponse {
        match self {
            Self::UnknownFormType(_) | Self::MissingClient => {
                HttpResponse::BadRequest().json(ErrorResponse::bad_request(&self.to_string()))
            }
            Self::ClientNotFound(_) | Self::EmployeeNotFound(_) => {
                HttpResponse::NotFound().json(ErrorResponse::not_found(&self.to_string()))
            }
            Self::Invalid(errors) => {
                HttpResponse::UnprocessableEntity().json(ValidationErrorResponse::new(errors))
            }
        }
    }
}

impl GenerateFormBody {
    /// Resolve directory references and validate.
    ///
    /// Checks run in order: form type, client, employee, then field validation.
    pub fn resolve(self, directory: &Directory) -> Result<GenerationRequest, RequestError> {
        if metadata::lookup(&self.form_type).is_none() {
            return Err(RequestError::UnknownFormType(self.form_type));
        }

        let client = match (self.client_id, self.client) {
            (Some(id), _) => directory
                .client(&id)
                .ok_or(RequestError::ClientNotFound(id))?,
            (None, Some(client)) => client,
            (None, None) => return Err(RequestError::MissingClient),
        };
        let employee = match (self.employee_id, self.employee) {
            (Some(id), _) => Some(
                directory
                    .employee(&id)
                    .ok_or(RequestError::EmployeeNotFound(id))?,
            ),
            (None, employee) => employee,
        };

        let request = GenerationRequest {
            client,
            employee,
            form_type: self.form_type,
            fields: self.fields,
            date: self.date,
        };
        request.validate().map_err(RequestError::Invalid)?;
        Ok(request)
    }
}

fn forms_error_response(err: FormsError) -> HttpResponse {
    match err {
        FormsError::UnsupportedFormType(form_type) => HttpResponse::BadRequest().json(
            ErrorResponse::bad_request(&format!("Nieobsługiwany typ formularza: {}", form_type)),
        ),
        other => {
            log::error!("Form generation failed: {}", other);
            HttpResponse::InternalServerError().json(ErrorResponse::internal_error(&other.to_string()))
        }
    }
}

/// Plain-ASCII stand-in for the `filename` parameter; the exact name goes
/// into `filename*`.
fn ascii_file_name(file_name: &str) -> String {
    encode_win_ansi(file_name)
        .into_iter()
        .map(|byte| match byte {
            b'"' | b'\\' | b'?' => '_',
            0x20..=0x7e => byte as char,
            _ => '_',
        })
        .collect()
}

fn attachment(file_name: &str) -> ContentDisposition {
    ContentDisposition {
        disposition: DispositionType::Attachment,
        parameters: vec![
            DispositionParam::Filename(ascii_file_name(file_name)),
            DispositionParam::FilenameExt(ExtendedValue {
                charset: Charset::Ext("UTF-8".to_string()),
                language_tag: None,
                value: file_name.as_bytes().to_vec(),
            }),
        ],
    }
}

fn pdf_response(document: GeneratedDocument) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header(attachment(&document.file_name))
        .insert_header(("X-Form-Strategy", document.strategy.as_str()))
        .insert_header(("X-Form-Warnings", document.warnings.len().to_string()))
        .body(document.pdf)
}

/// Catalog entries matching the optional category and complexity names.
pub fn filter_forms(
    category: Option<&str>,
    complexity: Option<&str>,
) -> Result<Vec<FormSummary>, String> {
    let category = category.map(str::parse::<FormCategory>).transpose()?;
    let complexity = complexity.map(str::parse::<Complexity>).transpose()?;

    let forms: Vec<&FormMetadata> = match (category, complexity) {
        (Some(category), complexity) => metadata::by_category(category)
            .into_iter()
            .filter(|meta| complexity.map_or(true, |c| meta.complexity == c))
            .collect(),
        (None, Some(complexity)) => metadata::by_complexity(complexity),
        (None, None) => metadata::all().iter().collect(),
    };
    Ok(forms.into_iter().map(FormSummary::from).collect())
}

#[utoipa::path(
    get,
    path = "/api/forms",
    tag = "Forms",
    params(FormsQuery),
    responses(
        (status = 200, description = "Supported form types", body = Vec<FormSummary>),
        (status = 400, description = "Unknown category or complexity", body = ErrorResponse)
    )
)]
pub async fn list_forms(query: web::Query<FormsQuery>) -> impl Responder {
    match filter_forms(query.category.as_deref(), query.complexity.as_deref()) {
        Ok(forms) => HttpResponse::Ok().json(forms),
        Err(e) => HttpResponse::BadRequest().json(ErrorResponse::bad_request(&e)),
    }
}

#[utoipa::path(
    get,
    path = "/api/forms/{form_type}",
    tag = "Forms",
    params(
        ("form_type" = String, Path, description = "Form type tag, e.g. UPL-1")
    ),
    responses(
        (status = 200, description = "Form found", body = FormSummary),
        (status = 404, description = "Unknown form type", body = ErrorResponse)
    )
)]
pub async fn get_form(path: web::Path<String>) -> impl Responder {
    let form_type = path.into_inner();
    match metadata::lookup(&form_type) {
        Some(meta) => HttpResponse::Ok().json(FormSummary::from(meta)),
        None => HttpResponse::NotFound().json(ErrorResponse::not_found(&format!(
            "Form type '{}' not found",
            form_type
        ))),
    }
}

#[utoipa::path(
    post,
    path = "/api/forms/generate",
    tag = "Forms",
    request_body = GenerateFormBody,
    responses(
        (status = 200, description = "Generated PDF", content_type = "application/pdf", body = Vec<u8>),
        (status = 400, description = "Unknown form type or missing client", body = ErrorResponse),
        (status = 404, description = "Client or employee not found", body = ErrorResponse),
        (status = 422, description = "Invalid request data", body = ValidationErrorResponse),
        (status = 500, description = "Generation failed", body = ErrorResponse)
    )
)]
pub async fn generate_form(
    state: web::Data<AppState>,
    body: web::Json<GenerateFormBody>,
) -> impl Responder {
    let request = match body.into_inner().resolve(&state.directory) {
        Ok(request) => request,
        Err(e) => return e.into_response(),
    };

    match state.generator.generate(&request).await {
        Ok(document) => pdf_response(document),
        Err(e) => forms_error_response(e),
    }
}

#[utoipa::path(
    post,
    path = "/api/forms/export",
    tag = "Forms",
    request_body = GenerateFormBody,
    responses(
        (status = 200, description = "PDF saved to the output directory", body = ExportResponse),
        (status = 400, description = "Unknown form type or missing client", body = ErrorResponse),
        (status = 404, description = "Client or employee not found", body = ErrorResponse),
        (status = 422, description = "Invalid request data", body = ValidationErrorResponse),
        (status = 500, description = "Generation or saving failed", body = ErrorResponse)
    )
)]
pub async fn export_form(
    state: web::Data<AppState>,
    body: web::Json<GenerateFormBody>,
) -> impl Responder {
    let request = match body.into_inner().resolve(&state.directory) {
        Ok(request) => request,
        Err(e) => return e.into_response(),
    };

    let document = match state.generator.generate(&request).await {
        Ok(document) => document,
        Err(e) => return forms_error_response(e),
    };
    match export(&document, state.sink.as_ref()).await {
        Ok(saved) => HttpResponse::Ok().json(ExportResponse {
            file_name: saved.file_name,
            path: saved.path,
            strategy: document.strategy,
            warnings: document.warnings,
            size_bytes: saved.size_bytes,
        }),
        Err(e) => forms_error_response(e.into()),
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/forms").route(web::get().to(list_forms)))
        .service(web::resource("/forms/generate").route(web::post().to(generate_form)))
        .service(web::resource("/forms/export").route(web::post().to(export_form)))
        .service(web::resource("/forms/{form_type}").route(web::get().to(get_form)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_reports_strategy() {
        let upl1 = FormSummary::from(metadata::lookup("UPL-1").unwrap());
        assert_eq!(upl1.strategy, "official");
        let pel = FormSummary::from(metadata::lookup("PEL").unwrap());
        assert_eq!(pel.strategy, "template");
        assert_eq!(pel.template_file.as_deref(), Some("PEL.pdf"));
        let pit36 = FormSummary::from(metadata::lookup("PIT-36").unwrap());
        assert_eq!(pit36.strategy, "drawn");
        assert!(pit36.template_file.is_none());
    }

    #[test]
    fn test_filter_forms() {
        let zus = filter_forms(Some("zus"), None).unwrap();
        assert_eq!(zus.len(), 3);
        assert!(zus.iter().all(|f| f.category == FormCategory::Zus));
        assert_eq!(filter_forms(None, None).unwrap().len(), metadata::all().len());
        assert!(filter_forms(Some("podatki"), None).is_err());
        assert!(filter_forms(None, Some("hard")).is_err());

        let simple = filter_forms(None, Some("simple")).unwrap();
        assert_eq!(simple.len(), metadata::by_complexity(Complexity::Simple).len());

        let both = filter_forms(Some("pelnomocnictwa"), Some("complex")).unwrap();
        assert!(both.iter().any(|f| f.form_type == "UPL-1"));
        assert!(both
            .iter()
            .all(|f| f.category == FormCategory::Pelnomocnictwa && f.complexity == Complexity::Complex));
    }

    #[test]
    fn test_ascii_file_name() {
        assert_eq!(
            ascii_file_name("PIT-37_Wiśniewski_Piotr_2025-01-15.pdf"),
            "PIT-37_Wisniewski_Piotr_2025-01-15.pdf"
        );
        assert_eq!(ascii_file_name("a\"b.pdf"), "a_b.pdf");
    }

    #[test]
    fn test_body_resolution_order() {
        let directory = Directory::from_json(
            r#"{"clients":[{"id":"1","firstName":"Jan","lastName":"Kowalski"}]}"#,
        )
        .unwrap();
        let body = |json: &str| serde_json::from_str::<GenerateFormBody>(json).unwrap();

        assert!(matches!(
            body(r#"{"formType":"FOO-99","clientId":"9"}"#).resolve(&directory),
            Err(RequestError::UnknownFormType(_))
        ));
        assert!(matches!(
            body(r#"{"formType":"PIT-37","clientId":"9"}"#).resolve(&directory),
            Err(RequestError::ClientNotFound(id)) if id == "9"
        ));
        assert!(matches!(
            body(r#"{"formType":"PIT-37"}"#).resolve(&directory),
            Err(RequestError::MissingClient)
        ));
        assert!(matches!(
            body(r#"{"formType":"PEL","clientId":"1"}"#).resolve(&directory),
            Err(RequestError::Invalid(errors)) if errors.len() == 1
        ));

        let request = body(r#"{"formType":"PIT-37","clientId":"1","fields":{"year":"2024"}}"#)
            .resolve(&directory)
            .unwrap();
        assert_eq!(request.client.last_name, "Kowalski");
        assert_eq!(request.field("year"), Some("2024"));
    }
}
