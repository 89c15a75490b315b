//! MCP (Model Context Protocol) endpoint.
//!
//! JSON-RPC 2.0 over stateless HTTP POST, exposing the form catalog,
//! form generation and the client directory as tools.

pub mod content;
pub mod handlers;
pub mod rpc;
pub mod service;
pub mod tools;

pub use handlers::{config, McpState};
pub use service::McpService;
