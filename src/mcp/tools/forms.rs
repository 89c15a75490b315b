//! Form catalog and generation tools.

use serde::Deserialize;
use serde_json::{json, Value};

use super::registry::ToolDescriptor;

pub const LIST_FORMS_TOOL: &str = "list_forms";
pub const GENERATE_FORM_TOOL: &str = "generate_form";

#[derive(Debug, Default, Deserialize)]
pub struct ListFormsRequest {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub complexity: Option<String>,
}

pub fn list_forms_descriptor() -> ToolDescriptor {
    ToolDescriptor {
        name: LIST_FORMS_TOOL.to_string(),
        description: concat!(
            "Lista obsługiwanych formularzy podatkowych i pełnomocnictw ",
            "(UPL-1, PEL, PIT, VAT, CIT, ZUS, JPK, NIP-8) wraz z polami wymaganymi. ",
            "Wynik można zawęzić kategorią lub poziomem złożoności."
        )
        .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "category": {
                    "type": "string",
                    "enum": ["pelnomocnictwa", "pit", "vat", "cit", "zus", "jpk", "inne"],
                    "description": "Kategoria formularza (opcjonalnie)"
                },
                "complexity": {
                    "type": "string",
                    "enum": ["simple", "medium", "complex"],
                    "description": "Poziom złożoności (opcjonalnie)"
                }
            }
        }),
    }
}

pub fn generate_form_descriptor() -> ToolDescriptor {
    ToolDescriptor {
        name: GENERATE_FORM_TOOL.to_string(),
        description: concat!(
            "Generuje wstępnie wypełniony formularz PDF dla klienta biura rachunkowego. ",
            "[WAŻNE] ",
            "(1) Najpierw sprawdź typ formularza narzędziem list_forms. ",
            "(2) Wskaż klienta przez clientId (list_clients) albo podaj jego dane. ",
            "(3) Pełnomocnictwa (UPL-1, UPL-1P, PEL, OPL-1, PPS-1) wymagają pracownika ",
            "jako pełnomocnika (employeeId). ",
            "(4) Nie używaj przykładowych danych osobowych."
        )
        .to_string(),
        input_schema: input_schema(),
    }
}

fn input_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "formType": { "type": "string", "description": "Typ formularza, np. UPL-1, PIT-37, VAT-7" },
            "clientId": { "type": "string", "description": "ID klienta z katalogu" },
            "client": {
                "type": "object",
                "description": "Dane klienta, gdy brak clientId",
                "properties": {
                    "firstName": { "type": "string" },
                    "lastName": { "type": "string" },
                    "companyName": { "type": "string" },
                    "nip": { "type": "string", "description": "NIP (10 cyfr)" },
                    "regon": { "type": "string", "description": "REGON (9 lub 14 cyfr)" },
                    "pesel": { "type": "string", "description": "PESEL (11 cyfr)" },
                    "address": {
                        "type": "object",
                        "properties": {
                            "street": { "type": "string" },
                            "city": { "type": "string" },
                            "zipCode": { "type": "string", "description": "Format NN-NNN" }
                        }
                    }
                }
            },
            "employeeId": { "type": "string", "description": "ID pracownika biura (pełnomocnik, sporządzający)" },
            "fields": {
                "type": "object",
                "description": "Pola dodatkowe, np. year, period, taxOffice, income, tax",
                "additionalProperties": { "type": "string" }
            },
            "date": { "type": "string", "format": "date", "description": "Data wystawienia (domyślnie dziś)" }
        },
        "required": ["formType"]
    })
}
