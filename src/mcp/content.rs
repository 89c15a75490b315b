//! Content items returned from tool calls.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::Utc;
use serde::{Deserialize, Serialize};

pub const PDF_MIME: &str = "application/pdf";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FileMetadata {
    pub filename: String,
    pub mime_type: String,
    pub size_bytes: usize,
    /// RFC 3339
    pub created_at: String,
}

impl FileMetadata {
    pub fn new(filename: impl Into<String>, mime_type: impl Into<String>, size_bytes: usize) -> Self {
        Self {
            filename: filename.into(),
            mime_type: mime_type.into(),
            size_bytes,
            created_at: Utc::now().to_rfc3339(),
        }
    }
}

/// Content item in a tool result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentItem {
    #[serde(rename = "type")]
    pub content_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Base64 payload of a resource item
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(rename = "mimeType", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<FileMetadata>,
}

impl ContentItem {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content_type: "text".to_string(),
            text: Some(text.into()),
            data: None,
            mime_type: None,
            metadata: None,
        }
    }

    /// Pretty-printed JSON as a text item.
    pub fn json<T: Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json::to_string_pretty(value).map(Self::text)
    }

    pub fn resource(data: &[u8], mime_type: &str, filename: &str) -> Self {
        Self {
            content_type: "resource".to_string(),
            text: Some(format!("Plik: {}", filename)),
            data: Some(BASE64.encode(data)),
            mime_type: Some(mime_type.to_string()),
            metadata: Some(FileMetadata::new(filename, mime_type, data.len())),
        }
    }

    pub fn pdf(data: &[u8], filename: &str) -> Self {
        Self::resource(data, PDF_MIME, filename)
    }

    /// Raw bytes of a resource item.
    pub fn decode_data(&self) -> Option<Result<Vec<u8>, base64::DecodeError>> {
        self.data.as_ref().map(|data| BASE64.decode(data))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    pub content: Vec<ContentItem>,
    #[serde(rename = "isError")]
    pub is_error: bool,
}

impl ToolResult {
    pub fn success(content: Vec<ContentItem>) -> Self {
        Self {
            content,
            is_error: false,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![ContentItem::text(message)],
            is_error: true,
        }
    }

    pub fn json<T: Serialize>(value: &T) -> Self {
        match ContentItem::json(value) {
            Ok(item) => Self::success(vec![item]),
            Err(err) => Self::error(format!("Nie udało się zserializować wyniku: {}", err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_resource() {
        let item = ContentItem::pdf(b"%PDF-1.5", "PIT-37_Nowak_Anna_2025-01-15.pdf");
        assert_eq!(item.content_type, "resource");
        assert_eq!(item.mime_type.as_deref(), Some(PDF_MIME));
        assert_eq!(item.metadata.as_ref().unwrap().size_bytes, 8);
        assert_eq!(item.decode_data().unwrap().unwrap(), b"%PDF-1.5");
    }

    #[test]
    fn test_serialized_field_names() {
        let json = serde_json::to_value(ToolResult::success(vec![ContentItem::pdf(b"x", "a.pdf")]))
            .unwrap();
        assert_eq!(json["isError"], false);
        assert_eq!(json["content"][0]["type"], "resource");
        assert_eq!(json["content"][0]["mimeType"], PDF_MIME);
        assert_eq!(json["content"][0]["metadata"]["sizeBytes"], 1);
    }

    #[test]
    fn test_error_result() {
        let result = ToolResult::error("Błąd");
        assert!(result.is_error);
        assert_eq!(result.content[0].text.as_deref(), Some("Błąd"));
    }
}
