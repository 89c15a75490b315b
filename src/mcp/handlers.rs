//! Stateless HTTP transport for MCP: one JSON-RPC message per POST.

use actix_web::{web, HttpResponse, Responder};

use crate::mcp::rpc::{RpcRequest, RpcResponse};
use crate::mcp::service::McpService;

pub struct McpState {
    pub service: McpService,
}

impl McpState {
    pub fn new(service: McpService) -> Self {
        Self { service }
    }
}

/// POST /mcp
pub async fn rpc_handler(state: web::Data<McpState>, body: web::Bytes) -> impl Responder {
    let request: RpcRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(err) => {
            log::warn!("Malformed MCP request: {}", err);
            return HttpResponse::Ok().json(RpcResponse::parse_error(format!(
                "Invalid JSON-RPC message: {}",
                err
            )));
        }
    };
    log::info!("Received MCP request: {}", request.method);

    match state.service.handle_request(request).await {
        Some(response) => HttpResponse::Ok().json(response),
        // Notifications
        None => HttpResponse::Accepted().finish(),
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/mcp").route(web::post().to(rpc_handler)));
}
