//! Built-in official UPL-1 layout.
//!
//! UPL-1 is always produced by filling this AcroForm template, so its
//! template is guaranteed to exist and the form never falls back to drawn
//! text.

use super::acroform::{self, TemplateField};
use super::composers::TAX_OFFICE_SCOPE;
use super::layout::{Drawing, PageWriter, LINE_STEP_MM};
use super::metadata::FormMetadata;
use super::model::FieldValues;
use super::FormsError;

const FIELD_X_MM: f32 = 75.0;
const FIELD_WIDTH_MM: f32 = 115.0;
const FIELD_HEIGHT_MM: f32 = 6.0;
/// Distance from the label baseline up to the top of its input box.
const FIELD_RISE_MM: f32 = 4.5;

const PRINCIPAL_FIELDS: &[(&str, &str)] = &[
    ("Imię", "firstName"),
    ("Nazwisko", "lastName"),
    ("Nazwa firmy", "companyName"),
    ("NIP", "nip"),
    ("PESEL", "pesel"),
    ("REGON", "regon"),
    ("KRS", "krs"),
    ("Adres", "address"),
    ("Telefon", "phone"),
    ("E-mail", "email"),
];

const ATTORNEY_FIELDS: &[(&str, &str)] = &[
    ("Imię", "employeeFirstName"),
    ("Nazwisko", "employeeLastName"),
    ("Stanowisko", "employeePosition"),
];

struct TemplateWriter {
    writer: PageWriter,
    fields: Vec<TemplateField>,
}

impl TemplateWriter {
    fn labeled_field(&mut self, label: &str, name: &str) {
        self.writer.line(&format!("{label}:"));
        // line() may have started a new page, so read the position back
        let baseline = self.writer.cursor() - LINE_STEP_MM;
        self.fields.push(TemplateField {
            name: name.to_string(),
            page: self.writer.page_index(),
            x: FIELD_X_MM,
            y: baseline - FIELD_RISE_MM,
            width: FIELD_WIDTH_MM,
            height: FIELD_HEIGHT_MM,
        });
    }
}

/// Static labels and field positions of the UPL-1 template.
pub fn layout() -> (Drawing, Vec<TemplateField>) {
    let mut t = TemplateWriter {
        writer: PageWriter::new(),
        fields: Vec::new(),
    };

    t.writer.title(&["UPL-1", "PEŁNOMOCNICTWO DO PODPISYWANIA DEKLARACJI"]);

    t.writer.heading("A. MIEJSCE SKŁADANIA PEŁNOMOCNICTWA");
    t.labeled_field("Urząd skarbowy", "taxOffice");
    t.writer.gap(3.0);

    t.writer.heading("B. DANE MOCODAWCY");
    for (label, name) in PRINCIPAL_FIELDS {
        t.labeled_field(label, name);
    }
    t.writer.gap(3.0);

    t.writer.heading("C. DANE PEŁNOMOCNIKA");
    for (label, name) in ATTORNEY_FIELDS {
        t.labeled_field(label, name);
    }
    t.writer.gap(3.0);

    t.writer.heading("D. ZAKRES PEŁNOMOCNICTWA");
    t.writer.line("Upoważniam do:");
    for (i, item) in TAX_OFFICE_SCOPE.iter().enumerate() {
        t.writer.line(&format!("{}. {}", i + 1, item));
    }
    t.labeled_field("Obowiązuje od", "startDate");
    t.writer.gap(3.0);

    t.writer.heading("E. PODPISY");
    t.labeled_field("Data wystawienia", "issueDate");
    t.writer.gap(13.0);
    t.writer
        .signatures(&["(Podpis mocodawcy)", "(Podpis pełnomocnika)"]);

    (t.writer.finish(), t.fields)
}

/// The empty UPL-1 template as PDF bytes.
pub fn template() -> Result<Vec<u8>, FormsError> {
    let (drawing, fields) = layout();
    Ok(acroform::build_template(&drawing, &fields)?)
}

/// Fill the UPL-1 template. Errors propagate; there is no fallback.
pub fn fill(values: &FieldValues, meta: &FormMetadata) -> Result<Vec<u8>, FormsError> {
    let template = template()?;
    Ok(acroform::fill_template(
        &template,
        &meta.listed_values(values),
        meta.required_fields,
    )?)
}
