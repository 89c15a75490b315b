//! Tool registry - central routing for MCP tools.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::directory::Directory;
use crate::forms::handlers::{filter_forms, GenerateFormBody};
use crate::forms::{Client, Employee, FormDocumentGenerator, GeneratedDocument};
use crate::mcp::content::{ContentItem, ToolResult};

use super::clients::{self, ListClientsRequest};
use super::forms::{self, ListFormsRequest};

/// Tool descriptor as listed by `tools/list`.
#[derive(Debug, Serialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

#[derive(Debug, Serialize)]
struct DirectoryListing {
    clients: Vec<Client>,
    employees: Vec<Employee>,
}

pub struct ToolRegistry {
    generator: FormDocumentGenerator,
    directory: Arc<Directory>,
}

impl ToolRegistry {
    pub fn new(generator: FormDocumentGenerator, directory: Arc<Directory>) -> Self {
        Self {
            generator,
            directory,
        }
    }

    pub fn list_tools(&self) -> Vec<ToolDescriptor> {
        vec![
            forms::list_forms_descriptor(),
            forms::generate_form_descriptor(),
            clients::list_clients_descriptor(),
        ]
    }

    pub async fn call_tool(&self, name: &str, arguments: Option<Value>) -> ToolResult {
        match name {
            forms::LIST_FORMS_TOOL => self.call_list_forms(arguments),
            forms::GENERATE_FORM_TOOL => self.call_generate_form(arguments).await,
            clients::LIST_CLIENTS_TOOL => self.call_list_clients(arguments),
            _ => ToolResult::error(format!(
                "Narzędzie '{}' nie istnieje. Dostępne narzędzia: {}, {}, {}",
                name,
                forms::LIST_FORMS_TOOL,
                forms::GENERATE_FORM_TOOL,
                clients::LIST_CLIENTS_TOOL,
            )),
        }
    }

    fn call_list_forms(&self, arguments: Option<Value>) -> ToolResult {
        let request = match parse_arguments::<Option<ListFormsRequest>>(arguments) {
            Ok(req) => req.unwrap_or_default(),
            Err(err) => return ToolResult::error(err),
        };

        match filter_forms(request.category.as_deref(), request.complexity.as_deref()) {
            Ok(forms) => ToolResult::json(&forms),
            Err(err) => ToolResult::error(err),
        }
    }

    async fn call_generate_form(&self, arguments: Option<Value>) -> ToolResult {
        let body = match parse_arguments::<GenerateFormBody>(arguments) {
            Ok(body) => body,
            Err(err) => return ToolResult::error(err),
        };

        let request = match body.resolve(&self.directory) {
            Ok(request) => request,
            Err(err) => return ToolResult::error(err.to_string()),
        };

        match self.generator.generate(&request).await {
            Ok(doc) => success_result(doc),
            Err(err) => ToolResult::error(format!("Nie udało się wygenerować formularza: {}", err)),
        }
    }

    fn call_list_clients(&self, arguments: Option<Value>) -> ToolResult {
        let request = match parse_arguments::<Option<ListClientsRequest>>(arguments) {
            Ok(req) => req.unwrap_or_default(),
            Err(err) => return ToolResult::error(err),
        };

        let clients = match request.query.as_deref() {
            Some(query) => self.directory.search_clients(query),
            None => self.directory.clients(),
        };
        ToolResult::json(&DirectoryListing {
            clients,
            employees: self.directory.employees(),
        })
    }
}

fn success_result(doc: GeneratedDocument) -> ToolResult {
    let mut text = format!(
        "Formularz {} został wygenerowany.\nPlik: {}\nData: {}\nSposób: {}",
        doc.form_type,
        doc.file_name,
        doc.issued_on,
        doc.strategy.as_str()
    );
    if !doc.warnings.is_empty() {
        text.push_str("\nUwagi:");
        for warning in &doc.warnings {
            text.push_str("\n- ");
            text.push_str(warning);
        }
    }

    ToolResult::success(vec![
        ContentItem::text(text),
        ContentItem::pdf(&doc.pdf, &doc.file_name),
    ])
}

fn parse_arguments<T: for<'de> Deserialize<'de>>(arguments: Option<Value>) -> Result<T, String> {
    let value = arguments.unwrap_or(Value::Null);
    serde_json::from_value(value).map_err(|err| format!("Nieprawidłowe argumenty: {}", err))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ToolRegistry {
        let directory = Directory::from_json(
            r#"{
                "clients": [{"id":"1","firstName":"Anna","lastName":"Nowak","nip":"9876543210"}],
                "employees": [{"id":"2","firstName":"Katarzyna","lastName":"Zielińska"}]
            }"#,
        )
        .unwrap();
        ToolRegistry::new(FormDocumentGenerator::without_templates(), Arc::new(directory))
    }

    #[test]
    fn test_list_tools() {
        let names: Vec<_> = registry().list_tools().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["list_forms", "generate_form", "list_clients"]);
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let result = registry().call_tool("generate_letter", None).await;
        assert!(result.is_error);
        assert!(result.content[0].text.as_deref().unwrap().contains("generate_form"));
    }

    #[tokio::test]
    async fn test_list_forms_without_arguments() {
        let result = registry().call_tool(forms::LIST_FORMS_TOOL, None).await;
        assert!(!result.is_error);
        assert!(result.content[0].text.as_deref().unwrap().contains("\"UPL-1\""));
    }

    #[tokio::test]
    async fn test_generate_form_returns_pdf() {
        let args = serde_json::json!({
            "formType": "UPL-1",
            "clientId": "1",
            "employeeId": "2",
            "date": "2025-01-15"
        });
        let result = registry().call_tool(forms::GENERATE_FORM_TOOL, Some(args)).await;
        assert!(!result.is_error, "{:?}", result.content[0].text);
        assert_eq!(result.content.len(), 2);

        let pdf = &result.content[1];
        assert_eq!(pdf.content_type, "resource");
        assert_eq!(
            pdf.metadata.as_ref().unwrap().filename,
            "UPL-1_Nowak_Anna_2025-01-15.pdf"
        );
        let bytes = pdf.decode_data().unwrap().unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn test_generate_form_reports_validation() {
        let args = serde_json::json!({ "formType": "PEL", "clientId": "1" });
        let result = registry().call_tool(forms::GENERATE_FORM_TOOL, Some(args)).await;
        assert!(result.is_error);
        assert!(result.content[0].text.as_deref().unwrap().contains("pełnomocnika"));
    }

    #[tokio::test]
    async fn test_list_clients_search() {
        let args = serde_json::json!({ "query": "987" });
        let result = registry().call_tool(clients::LIST_CLIENTS_TOOL, Some(args)).await;
        let text = result.content[0].text.as_deref().unwrap();
        assert!(text.contains("Nowak"));
        assert!(text.contains("Zielińska"));
    }
}
