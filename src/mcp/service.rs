//! MCP Service - Core JSON-RPC 2.0 request handler.

use crate::mcp::rpc::{RpcRequest, RpcResponse, INVALID_REQUEST, JSONRPC_VERSION};
use crate::mcp::tools::registry::ToolDescriptor;
use crate::mcp::tools::ToolRegistry;
use log::{info, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

pub const PROTOCOL_VERSION: &str = "2024-11-05";

#[derive(Clone)]
pub struct McpService {
    registry: Arc<ToolRegistry>,
}

impl McpService {
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    /// `None` for notifications, which get no response body.
    pub async fn handle_request(&self, request: RpcRequest) -> Option<RpcResponse> {
        if request.jsonrpc != JSONRPC_VERSION {
            warn!("received unsupported jsonrpc version: {}", request.jsonrpc);
            return Some(RpcResponse::error(
                request.id,
                INVALID_REQUEST,
                "Unsupported jsonrpc version (expected 2.0)",
            ));
        }

        let RpcRequest {
            method, params, id, ..
        } = request;

        match method.as_str() {
            "initialize" => Some(self.handle_initialize(id, params)),
            "tools/list" => Some(self.handle_list_tools(id)),
            "tools/call" => Some(self.handle_call_tool(id, params).await),
            "ping" => Some(RpcResponse::success(id, json!({}))),
            method if method.starts_with("notifications/") => {
                info!("received client notification: {}", method);
                None
            }
            other => Some(RpcResponse::method_not_found(id, other)),
        }
    }

    fn handle_initialize(&self, id: Option<Value>, params: Option<Value>) -> RpcResponse {
        let parsed: InitializeParams = match parse_params(params) {
            Ok(value) => value,
            Err(message) => return RpcResponse::invalid_params(id, message),
        };

        info!(
            "client requested initialization: {} v{} (protocol {})",
            parsed.client_info.name,
            parsed.client_info.version.as_deref().unwrap_or("unknown"),
            parsed.protocol_version
        );

        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            server_info: ImplementationInfo {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: Some("Generator formularzy biura rachunkowego".to_string()),
            },
            capabilities: ServerCapabilities {
                tools: ToolsCapability {
                    list_changed: false,
                },
            },
        };

        RpcResponse::from_serializable(id, &result)
    }

    fn handle_list_tools(&self, id: Option<Value>) -> RpcResponse {
        let payload = ListToolsResult {
            tools: self.registry.list_tools(),
            next_cursor: None,
        };
        RpcResponse::from_serializable(id, &payload)
    }

    async fn handle_call_tool(&self, id: Option<Value>, params: Option<Value>) -> RpcResponse {
        let parsed: CallToolParams = match parse_params(params) {
            Ok(value) => value,
            Err(message) => return RpcResponse::invalid_params(id, message),
        };

        info!("calling tool {}", parsed.name);
        let result = self.registry.call_tool(&parsed.name, parsed.arguments).await;
        if result.is_error {
            warn!("tool {} returned an error", parsed.name);
        }
        RpcResponse::from_serializable(id, &result)
    }
}

#[derive(Debug, Deserialize)]
struct InitializeParams {
    #[serde(rename = "protocolVersion")]
    protocol_version: String,
    #[serde(rename = "clientInfo")]
    client_info: ClientInfo,
}

#[derive(Debug, Deserialize)]
struct ClientInfo {
    name: String,
    #[serde(default)]
    version: Option<String>,
}

#[derive(Debug, Serialize)]
struct InitializeResult {
    #[serde(rename = "protocolVersion")]
    protocol_version: String,
    #[serde(rename = "serverInfo")]
    server_info: ImplementationInfo,
    capabilities: ServerCapabilities,
}

#[derive(Debug, Serialize)]
struct ImplementationInfo {
    name: String,
    version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
}

#[derive(Debug, Serialize)]
struct ServerCapabilities {
    tools: ToolsCapability,
}

#[derive(Debug, Serialize)]
struct ToolsCapability {
    #[serde(rename = "listChanged")]
    list_changed: bool,
}

#[derive(Debug, Serialize)]
struct ListToolsResult {
    tools: Vec<ToolDescriptor>,
    #[serde(rename = "nextCursor")]
    #[serde(skip_serializing_if = "Option::is_none")]
    next_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CallToolParams {
    name: String,
    #[serde(default)]
    arguments: Option<Value>,
}

fn parse_params<T: DeserializeOwned>(params: Option<Value>) -> Result<T, String> {
    serde_json::from_value(params.unwrap_or(Value::Null)).map_err(|err| err.to_string())
}
