use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::forms::validation::{validate_client, ValidationErrors};
use crate::forms::{Client, Employee};
use crate::state::AppState;
use crate::{ErrorResponse, ValidationErrorResponse};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ClientQuery {
    /// Name, company or NIP fragment
    pub q: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/clients",
    tag = "Clients",
    params(ClientQuery),
    responses(
        (status = 200, description = "Clients, optionally filtered", body = Vec<Client>)
    )
)]
pub async fn list_clients(
    state: web::Data<AppState>,
    query: web::Query<ClientQuery>,
) -> impl Responder {
    let clients = match query.q.as_deref() {
        Some(q) => state.directory.search_clients(q),
        None => state.directory.clients(),
    };
    HttpResponse::Ok().json(clients)
}

#[utoipa::path(
    get,
    path = "/api/clients/{id}",
    tag = "Clients",
    params(
        ("id" = String, Path, description = "Client ID")
    ),
    responses(
        (status = 200, description = "Client found", body = Client),
        (status = 404, description = "Client not found", body = ErrorResponse)
    )
)]
pub async fn get_client(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();
    match state.directory.client(&id) {
        Some(client) => HttpResponse::Ok().json(client),
        None => HttpResponse::NotFound().json(ErrorResponse::not_found(&format!(
            "Nie znaleziono klienta o ID '{}'",
            id
        ))),
    }
}

#[utoipa::path(
    post,
    path = "/api/clients",
    tag = "Clients",
    request_body = Client,
    responses(
        (status = 201, description = "Client created", body = Client),
        (status = 422, description = "Invalid client data", body = ValidationErrorResponse),
        (status = 500, description = "No client id left to assign", body = ErrorResponse)
    )
)]
pub async fn create_client(
    state: web::Data<AppState>,
    item: web::Json<Client>,
) -> impl Responder {
    let client = item.into_inner();
    let mut errors = ValidationErrors::new();
    validate_client(&client, &mut errors);
    if !errors.is_empty() {
        return HttpResponse::UnprocessableEntity().json(ValidationErrorResponse::new(errors));
    }

    let created = match state.directory.add_client(client) {
        Ok(created) => created,
        Err(e) => {
            log::error!("Failed to create client: {}", e);
            return HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error(&e.to_string()));
        }
    };
    log::info!(
        "Client {} created with ID {}",
        created.full_name(),
        created.id.as_deref().unwrap_or_default()
    );
    HttpResponse::Created().json(created)
}

#[utoipa::path(
    get,
    path = "/api/employees",
    tag = "Employees",
    responses(
        (status = 200, description = "Office employees who can act as attorney or preparer", body = Vec<Employee>)
    )
)]
pub async fn list_employees(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.directory.employees())
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/clients")
            .route(web::get().to(list_clients))
            .route(web::post().to(create_client)),
    )
    .service(web::resource("/clients/{id}").route(web::get().to(get_client)))
    .service(web::resource("/employees").route(web::get().to(list_employees)));
}
