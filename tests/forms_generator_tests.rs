mod common;

use std::sync::Arc;

use formularze_server::forms::acroform::{build_template, read_field_values, TemplateField};
use formularze_server::forms::composers::{composer_for, FormContext};
use formularze_server::forms::layout::PageWriter;
use formularze_server::forms::metadata::{self, Complexity, FormCategory};
use formularze_server::forms::{
    generate_file_name, Client, FormDocumentGenerator, FormsError, GenerationRequest,
    InMemoryTemplateSource, RenderStrategy,
};

use common::{issue_date, kowalski, request, zielinska};

fn template_with_fields(names: &[&str]) -> Vec<u8> {
    let mut writer = PageWriter::new();
    writer.title(&["Szablon testowy"]);
    let fields: Vec<TemplateField> = names
        .iter()
        .enumerate()
        .map(|(i, name)| TemplateField {
            name: name.to_string(),
            page: 0,
            x: 75.0,
            y: 40.0 + i as f32 * 8.0,
            width: 100.0,
            height: 6.0,
        })
        .collect();
    build_template(&writer.finish(), &fields).unwrap()
}

#[tokio::test]
async fn test_every_form_type_generates_for_a_minimal_client() {
    let generator = FormDocumentGenerator::without_templates();
    for meta in metadata::all() {
        let request = GenerationRequest::new(Client::new("Jan", "Kowalski"), None, meta.form_type)
            .on(issue_date());
        let document = generator
            .generate(&request)
            .await
            .unwrap_or_else(|e| panic!("{} failed: {}", meta.form_type, e));

        assert!(!document.pdf.is_empty(), "{} produced no bytes", meta.form_type);
        assert!(
            lopdf::Document::load_mem(&document.pdf).is_ok(),
            "{} is not a loadable PDF",
            meta.form_type
        );
    }
}

#[tokio::test]
async fn test_unknown_form_type_produces_no_document() {
    let generator = FormDocumentGenerator::without_templates();
    let result = generator.generate(&request("FOO-99")).await;
    assert!(matches!(result, Err(FormsError::UnsupportedFormType(tag)) if tag == "FOO-99"));
}

#[tokio::test]
async fn test_generation_is_idempotent() {
    let generator = FormDocumentGenerator::without_templates();
    for form_type in ["UPL-1", "PEL", "PIT-37", "CIT-8", "ZUS-ZUA"] {
        let first = generator.generate(&request(form_type)).await.unwrap();
        let second = generator.generate(&request(form_type)).await.unwrap();
        assert_eq!(first.pdf, second.pdf, "{} differs between runs", form_type);
        assert_eq!(first.file_name, second.file_name);
    }
}

#[tokio::test]
async fn test_authorization_forms_fall_back_when_templates_are_unavailable() {
    let generator = FormDocumentGenerator::without_templates();
    for meta in metadata::by_category(FormCategory::Pelnomocnictwa) {
        let document = generator.generate(&request(meta.form_type)).await.unwrap();
        assert!(document.pdf.starts_with(b"%PDF"));

        if meta.form_type == "UPL-1" {
            assert_eq!(document.strategy, RenderStrategy::Template);
            assert!(document.warnings.is_empty());
        } else if matches!(meta.form_type, "UPL-1P" | "PEL") {
            assert_eq!(document.strategy, RenderStrategy::Drawn);
            assert_eq!(document.warnings.len(), 1, "{:?}", document.warnings);
        } else {
            assert_eq!(document.strategy, RenderStrategy::Drawn);
        }
    }
}

#[tokio::test]
async fn test_registered_template_is_filled() {
    let template = template_with_fields(&["firstName", "lastName", "nip", "year", "taxOffice"]);
    let generator = FormDocumentGenerator::new(Arc::new(
        InMemoryTemplateSource::new().with("PIT-11.pdf", template),
    ));

    let request = request("PIT-11").with_field("year", "2024");
    let document = generator.generate(&request).await.unwrap();
    assert_eq!(document.strategy, RenderStrategy::Template);
    assert!(document.warnings.is_empty(), "{:?}", document.warnings);

    let values = read_field_values(&document.pdf).unwrap();
    assert_eq!(values.get("nip").map(String::as_str), Some("1234567890"));
    assert_eq!(values.get("year").map(String::as_str), Some("2024"));
    assert_eq!(values.get("lastName").map(String::as_str), Some("Kowalski"));
    assert!(!values.contains_key("taxOffice"));
}

#[tokio::test]
async fn test_template_fill_skips_keys_the_form_does_not_list() {
    let template =
        template_with_fields(&["firstName", "lastName", "nip", "year", "pesel", "internalNote"]);
    let generator = FormDocumentGenerator::new(Arc::new(
        InMemoryTemplateSource::new().with("PIT-11.pdf", template),
    ));

    let request = request("PIT-11")
        .with_field("year", "2024")
        .with_field("internalNote", "NIE DRUKOWAC");
    let document = generator.generate(&request).await.unwrap();
    assert_eq!(document.strategy, RenderStrategy::Template);

    let values = read_field_values(&document.pdf).unwrap();
    assert_eq!(values.get("firstName").map(String::as_str), Some("Jan"));
    assert_eq!(values.get("year").map(String::as_str), Some("2024"));
    assert!(!values.contains_key("internalNote"), "{:?}", values);
    assert!(!values.contains_key("pesel"), "{:?}", values);
}

#[tokio::test]
async fn test_template_without_required_field_falls_back() {
    let template = template_with_fields(&["firstName", "lastName", "nip"]);
    let generator = FormDocumentGenerator::new(Arc::new(
        InMemoryTemplateSource::new().with("PIT-11.pdf", template),
    ));

    let document = generator
        .generate(&request("PIT-11").with_field("year", "2024"))
        .await
        .unwrap();
    assert_eq!(document.strategy, RenderStrategy::Drawn);
    assert_eq!(document.warnings.len(), 1);
    assert!(document.warnings[0].contains("year"));
}

#[test]
fn test_identity_detail_follows_complexity_across_catalog() {
    let full = kowalski();
    let employee = zielinska();
    let extended = ["REGON:", "KRS:", "Adres:", "Telefon:", "E-mail:"];

    for meta in metadata::all() {
        let Some(composer) = composer_for(meta.form_type) else {
            continue;
        };
        let request = GenerationRequest::new(full.clone(), Some(employee.clone()), meta.form_type)
            .on(issue_date());
        let values = request.field_values();
        let drawing = composer(&FormContext {
            meta,
            request: &request,
            values: &values,
            issued_on: issue_date(),
        });

        assert!(drawing.has_line_starting_with("NIP:"), "{}", meta.form_type);
        for prefix in extended {
            let present = drawing.has_line_starting_with(prefix);
            match meta.complexity {
                Complexity::Simple => assert!(!present, "{} prints {}", meta.form_type, prefix),
                Complexity::Medium | Complexity::Complex => {
                    assert!(present, "{} lacks {}", meta.form_type, prefix)
                }
            }
        }
    }
}

#[test]
fn test_file_name_example() {
    let date = chrono::NaiveDate::from_ymd_opt(2024, 12, 1).unwrap();
    assert_eq!(
        generate_file_name("UPL-1", &Client::new("Jan", "Kowalski"), date),
        "UPL-1_Kowalski_Jan_2024-12-01.pdf"
    );
}
