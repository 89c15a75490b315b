//! MCP tools: descriptors and argument types per tool, routed by the registry.

pub mod clients;
pub mod forms;
pub mod registry;

pub use registry::ToolRegistry;
