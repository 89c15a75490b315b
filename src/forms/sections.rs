//! Reusable sections of a synthesized form.
//!
//! Identity detail is picked from the form's complexity tier: `simple` forms
//! print the basic identity (name, company, NIP), everything else prints the
//! comprehensive one. Every line is printed only when its value is present.

use chrono::NaiveDate;

use super::common::{format_polish_date, non_blank};
use super::layout::PageWriter;
use super::metadata::Complexity;
use super::model::{Client, Employee};

pub const NAME_LABEL: &str = "Imię i nazwisko/Nazwa";
pub const COMPANY_LABEL: &str = "Firma";
pub const NIP_LABEL: &str = "NIP";
pub const REGON_LABEL: &str = "REGON";
pub const KRS_LABEL: &str = "KRS";
pub const ADDRESS_LABEL: &str = "Adres";
pub const PHONE_LABEL: &str = "Telefon";
pub const EMAIL_LABEL: &str = "E-mail";

const BLANK: &str = "________________";
const SECTION_GAP_MM: f32 = 5.0;

/// How much of the client record an identity section prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityDetail {
    Basic,
    Comprehensive,
}

impl From<Complexity> for IdentityDetail {
    fn from(complexity: Complexity) -> Self {
        match complexity {
            Complexity::Simple => Self::Basic,
            Complexity::Medium | Complexity::Complex => Self::Comprehensive,
        }
    }
}

/// `"{label}: {value}"`, skipped when the value is blank.
pub fn labeled(writer: &mut PageWriter, label: &str, value: Option<&str>) {
    if let Some(value) = non_blank(value) {
        writer.line(&format!("{label}: {value}"));
    }
}

/// `"{label}: {value}"`, or a labeled blank to fill in by hand.
pub fn labeled_or_blank(writer: &mut PageWriter, label: &str, value: Option<&str>) {
    let value = non_blank(value).unwrap_or(BLANK);
    writer.line(&format!("{label}: {value}"));
}

pub fn identity_section(
    writer: &mut PageWriter,
    heading: &str,
    client: &Client,
    detail: IdentityDetail,
) {
    writer.heading(heading);
    match detail {
        IdentityDetail::Basic => basic_identity(writer, client),
        IdentityDetail::Comprehensive => comprehensive_identity(writer, client),
    }
    writer.gap(SECTION_GAP_MM);
}

fn basic_identity(writer: &mut PageWriter, client: &Client) {
    labeled(writer, NAME_LABEL, Some(&client.full_name()));
    labeled(writer, COMPANY_LABEL, client.company_name.as_deref());
    labeled(writer, NIP_LABEL, client.nip.as_deref());
}

fn comprehensive_identity(writer: &mut PageWriter, client: &Client) {
    basic_identity(writer, client);
    labeled(writer, REGON_LABEL, client.regon.as_deref());
    labeled(writer, KRS_LABEL, client.krs.as_deref());
    labeled(writer, ADDRESS_LABEL, client.formatted_address().as_deref());
    labeled(writer, PHONE_LABEL, client.phone.as_deref());
    labeled(writer, EMAIL_LABEL, client.first_email());
}

/// Attorney block of an authorization form.
pub fn attorney_section(writer: &mut PageWriter, employee: Option<&Employee>) {
    writer.heading("PEŁNOMOCNIK:");
    if let Some(employee) = employee {
        labeled(writer, "Imię i nazwisko", Some(&employee.full_name()));
        labeled(writer, "Stanowisko", employee.position.as_deref());
    }
    writer.gap(SECTION_GAP_MM * 2.0);
}

/// "Upoważniam do:" followed by the numbered scope lines.
pub fn scope_section(writer: &mut PageWriter, scope: &[&str]) {
    writer.heading("ZAKRES PEŁNOMOCNICTWA:");
    writer.line("Upoważniam do:");
    for (i, item) in scope.iter().enumerate() {
        writer.line(&format!("{}. {}", i + 1, item));
    }
    writer.gap(SECTION_GAP_MM * 2.0);
}

/// Issue date followed by the signature blocks.
pub fn closing_section(writer: &mut PageWriter, issued_on: NaiveDate, captions: &[&str]) {
    writer.line(&format!("Data wystawienia: {}", format_polish_date(issued_on)));
    writer.gap(13.0);
    writer.signatures(captions);
}
