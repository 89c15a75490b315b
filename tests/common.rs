#![allow(dead_code)]

use chrono::NaiveDate;
use std::sync::Arc;

use formularze_server::directory::Directory;
use formularze_server::forms::common::get_static_dir;
use formularze_server::forms::{
    Address, Client, DirectorySink, Employee, FormDocumentGenerator, GenerationRequest,
};
use formularze_server::AppState;

pub fn issue_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
}

/// Fully filled client, valid under every identity check.
pub fn kowalski() -> Client {
    Client {
        id: Some("1".into()),
        company_name: Some("Tech Solutions Sp. z o.o.".into()),
        nip: Some("1234567890".into()),
        regon: Some("123456789".into()),
        krs: Some("0000123456".into()),
        pesel: Some("80010112345".into()),
        address: Some(Address {
            street: Some("ul. Biznesowa 123".into()),
            city: Some("Warszawa".into()),
            zip_code: Some("00-001".into()),
            ..Address::default()
        }),
        phone: Some("+48 123 456 789".into()),
        emails: vec!["jan.kowalski@firma.pl".into()],
        ..Client::new("Jan", "Kowalski")
    }
}

pub fn zielinska() -> Employee {
    Employee {
        position: Some("Główna księgowa".into()),
        ..Employee::new("Katarzyna", "Zielińska")
    }
}

pub fn request(form_type: &str) -> GenerationRequest {
    GenerationRequest::new(kowalski(), Some(zielinska()), form_type).on(issue_date())
}

pub fn seeded_directory() -> Arc<Directory> {
    Arc::new(Directory::load(get_static_dir().join("directory.json")).unwrap())
}

/// State with no template files and output written under `output_dir`.
pub fn test_state(output_dir: &std::path::Path) -> AppState {
    AppState::new(
        FormDocumentGenerator::without_templates(),
        seeded_directory(),
        Arc::new(DirectorySink::new(output_dir)),
    )
}
