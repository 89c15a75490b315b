//! Directory lookup tool.

use serde::Deserialize;
use serde_json::json;

use super::registry::ToolDescriptor;

pub const LIST_CLIENTS_TOOL: &str = "list_clients";

#[derive(Debug, Default, Deserialize)]
pub struct ListClientsRequest {
    /// Name, company or NIP fragment
    #[serde(default)]
    pub query: Option<String>,
}

pub fn list_clients_descriptor() -> ToolDescriptor {
    ToolDescriptor {
        name: LIST_CLIENTS_TOOL.to_string(),
        description: concat!(
            "Wyszukuje klientów biura po imieniu i nazwisku, nazwie firmy lub NIP. ",
            "Zwraca ID potrzebne w generate_form oraz listę pracowników biura."
        )
        .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Fragment nazwiska, nazwy firmy lub NIP (opcjonalnie)"
                }
            }
        }),
    }
}
