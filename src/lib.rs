use actix_cors::Cors;
use actix_web::http::header::{self, HeaderName};
use actix_web::middleware::{Compress, Logger};
use actix_web::{web, App, HttpServer};
use actix_web_prometheus::PrometheusMetricsBuilder;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub mod config;
pub mod directory;
pub mod forms;
pub mod mcp;
pub mod metrics;
pub mod state;

pub use crate::config::AppConfig;
pub use crate::state::AppState;

use crate::forms::validation::{ValidationError, ValidationErrors};
use crate::mcp::tools::ToolRegistry;
use crate::mcp::{McpService, McpState};

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_type: &str, message: &str) -> Self {
        Self {
            error: error_type.to_string(),
            message: message.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn not_found(message: &str) -> Self {
        Self::new("NotFound", message)
    }

    pub fn bad_request(message: &str) -> Self {
        Self::new("BadRequest", message)
    }

    pub fn internal_error(message: &str) -> Self {
        Self::new("InternalServerError", message)
    }
}

/// 422 body listing every invalid field.
#[derive(Serialize, ToSchema)]
pub struct ValidationErrorResponse {
    pub error: String,
    pub message: String,
    pub errors: Vec<ValidationError>,
    pub timestamp: String,
}

impl ValidationErrorResponse {
    pub fn new(errors: ValidationErrors) -> Self {
        Self {
            error: "ValidationError".to_string(),
            message: errors.to_message(),
            errors: errors.errors().to_vec(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::forms::handlers::list_forms,
        crate::forms::handlers::get_form,
        crate::forms::handlers::generate_form,
        crate::forms::handlers::export_form,
        crate::directory::routes::list_clients,
        crate::directory::routes::get_client,
        crate::directory::routes::create_client,
        crate::directory::routes::list_employees,
        crate::metrics::forms_metrics
    ),
    components(
        schemas(
            forms::handlers::FormSummary,
            forms::handlers::GenerateFormBody,
            forms::handlers::ExportResponse,
            forms::Client,
            forms::Employee,
            forms::Address,
            forms::Complexity,
            forms::FormCategory,
            forms::RenderStrategy,
            ValidationError,
            ValidationErrorResponse,
            ErrorResponse,
        )
    ),
    tags(
        (name = "Forms", description = "Form catalog and PDF generation."),
        (name = "Clients", description = "Clients of the accounting office."),
        (name = "Employees", description = "Office staff acting as attorney or preparer."),
        (name = "Metrics", description = "Generator counters.")
    ),
    servers(
        (url = "http://127.0.0.1:8080", description = "Localhost")
    )
)]
pub struct ApiDoc;

/// Routes under `/api`, `/mcp` and `/metrics/forms`.
///
/// Expects `web::Data<AppState>` and `web::Data<McpState>` to be registered.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .configure(forms::handlers::config)
            .configure(directory::routes::config),
    )
    .configure(mcp::config)
    .configure(metrics::config);
}

pub fn mcp_state(state: &AppState) -> McpState {
    McpState::new(McpService::new(ToolRegistry::new(
        state.generator.clone(),
        state.directory.clone(),
    )))
}

pub async fn run() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };
    let app_state = match AppState::from_config(&config) {
        Ok(state) => state,
        Err(e) => {
            log::error!(
                "Failed to initialize application state. Check FORMS_DIRECTORY_FILE ({}). Error: {:#}",
                config.directory_file.display(),
                e
            );
            std::process::exit(1);
        }
    };
    let mcp_state = web::Data::new(mcp_state(&app_state));
    let app_state = web::Data::new(app_state);

    let prometheus = PrometheusMetricsBuilder::new("formularze_server")
        .endpoint("/metrics")
        .build()
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    let openapi = ApiDoc::openapi();
    let allowed_origins = config.allowed_origins.clone();

    log::info!("Starting server at http://{}:{}", config.host, config.port);

    HttpServer::new(move || {
        let cors = allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "POST", "OPTIONS"])
            .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
            .expose_headers(vec![
                header::CONTENT_DISPOSITION,
                HeaderName::from_static("x-form-strategy"),
                HeaderName::from_static("x-form-warnings"),
            ])
            .max_age(3600);

        App::new()
            .wrap(Compress::default())
            .wrap(prometheus.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(app_state.clone())
            .app_data(mcp_state.clone())
            .configure(configure)
            .service(SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-doc/openapi.json", openapi.clone()))
    })
    .keep_alive(actix_web::http::KeepAlive::Os)
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
