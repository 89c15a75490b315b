mod common;

use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App};
use serde_json::{json, Value};

use formularze_server::{configure, mcp_state, ErrorResponse};

macro_rules! test_app {
    ($dir:expr) => {{
        let state = common::test_state($dir);
        let mcp = web::Data::new(mcp_state(&state));
        test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .app_data(mcp)
                .configure(configure),
        )
        .await
    }};
}

#[actix_web::test]
async fn test_list_forms_filters_by_category() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app!(dir.path());

    let req = test::TestRequest::get().uri("/api/forms?category=vat").to_request();
    let forms: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    let types: Vec<_> = forms.iter().map(|f| f["formType"].as_str().unwrap()).collect();
    assert_eq!(types, vec!["VAT-7", "VAT-UE", "VAT-R"]);

    let req = test::TestRequest::get().uri("/api/forms?complexity=impossible").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_get_form() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app!(dir.path());

    let req = test::TestRequest::get().uri("/api/forms/UPL-1").to_request();
    let form: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(form["strategy"], "official");
    assert_eq!(form["category"], "pelnomocnictwa");

    let req = test::TestRequest::get().uri("/api/forms/FOO-99").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.error, "NotFound");
}

#[actix_web::test]
async fn test_generate_returns_pdf_attachment() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app!(dir.path());

    let req = test::TestRequest::post()
        .uri("/api/forms/generate")
        .set_json(json!({
            "formType": "PIT-37",
            "clientId": "3",
            "fields": { "year": "2024" },
            "date": "2025-01-15"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let headers = resp.headers();
    assert_eq!(headers.get(header::CONTENT_TYPE).unwrap(), "application/pdf");
    let disposition = headers
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment"));
    assert!(disposition.contains("PIT-37_Wisniewski_Piotr_2025-01-15.pdf"));
    assert_eq!(headers.get("X-Form-Strategy").unwrap(), "drawn");
    assert_eq!(headers.get("X-Form-Warnings").unwrap(), "0");

    let body = test::read_body(resp).await;
    assert!(body.starts_with(b"%PDF"));
}

#[actix_web::test]
async fn test_generate_error_statuses() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app!(dir.path());

    let cases = [
        (json!({ "formType": "FOO-99", "clientId": "1" }), StatusCode::BAD_REQUEST),
        (json!({ "formType": "PIT-37" }), StatusCode::BAD_REQUEST),
        (json!({ "formType": "PIT-37", "clientId": "404" }), StatusCode::NOT_FOUND),
        (
            json!({ "formType": "UPL-1", "clientId": "1", "employeeId": "404" }),
            StatusCode::NOT_FOUND,
        ),
        (json!({ "formType": "UPL-1", "clientId": "1" }), StatusCode::UNPROCESSABLE_ENTITY),
        (
            json!({ "formType": "NIP-8", "client": { "firstName": "Ewa", "lastName": "Mazur", "nip": "12-34" } }),
            StatusCode::UNPROCESSABLE_ENTITY,
        ),
    ];

    for (body, expected) in cases {
        let req = test::TestRequest::post()
            .uri("/api/forms/generate")
            .set_json(&body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), expected, "{}", body);
    }
}

#[actix_web::test]
async fn test_validation_lists_every_problem() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app!(dir.path());

    let req = test::TestRequest::post()
        .uri("/api/forms/generate")
        .set_json(json!({
            "formType": "PEL",
            "client": {
                "firstName": "Ewa",
                "lastName": "Mazur",
                "nip": "123",
                "address": { "zipCode": "00001" }
            }
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "ValidationError");
    let fields: Vec<_> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(fields, vec!["client.nip", "client.address.zipCode", "employee"]);
}

#[actix_web::test]
async fn test_export_saves_to_output_directory() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app!(dir.path());

    let req = test::TestRequest::post()
        .uri("/api/forms/export")
        .set_json(json!({
            "formType": "PEL",
            "clientId": "2",
            "employeeId": "1",
            "date": "2025-01-15"
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["fileName"], "PEL_Nowak_Anna_2025-01-15.pdf");
    assert_eq!(body["strategy"], "drawn");
    assert_eq!(body["warnings"].as_array().unwrap().len(), 1);
    let saved = std::fs::read(dir.path().join("PEL_Nowak_Anna_2025-01-15.pdf")).unwrap();
    assert_eq!(saved.len() as u64, body["sizeBytes"].as_u64().unwrap());
}

#[actix_web::test]
async fn test_clients_endpoints() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app!(dir.path());

    let req = test::TestRequest::get().uri("/api/clients?q=kowal").to_request();
    let clients: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(clients.len(), 2);

    let req = test::TestRequest::get().uri("/api/clients/404").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::post()
        .uri("/api/clients")
        .set_json(json!({ "firstName": "Ewa", "lastName": "Mazur", "nip": "5252525252" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["id"], "5");

    let req = test::TestRequest::get().uri("/api/clients/5").to_request();
    let fetched: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched["lastName"], "Mazur");

    let req = test::TestRequest::post()
        .uri("/api/clients")
        .set_json(json!({ "firstName": "", "lastName": "" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNPROCESSABLE_ENTITY
    );

    let req = test::TestRequest::get().uri("/api/employees").to_request();
    let employees: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(employees.len(), 3);
}

#[actix_web::test]
async fn test_forms_metrics_endpoint() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app!(dir.path());

    let req = test::TestRequest::post()
        .uri("/api/forms/generate")
        .set_json(json!({ "formType": "NIP-8", "clientId": "1" }))
        .to_request();
    assert!(test::call_service(&app, req).await.status().is_success());

    let req = test::TestRequest::get().uri("/metrics/forms").to_request();
    let body = test::call_and_read_body(&app, req).await;
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("forms_generated_total"));
    assert!(text.contains("form_type=\"NIP-8\""));
}
