//! Fillable forms: building AcroForm templates and writing field values.

use lopdf::{dictionary, Document, Object, ObjectId, StringFormat};
use std::collections::BTreeMap;

use super::layout::Drawing;
use super::model::FieldValues;
use super::pdf::{self, mm_to_pt, page_y, PdfError, REGULAR_FONT};
use super::templates::TemplateError;

const DEFAULT_APPEARANCE: &str = "/Helv 10 Tf 0 g";
const MAX_FIELD_DEPTH: usize = 16;

/// A text field placed on a template page. Millimetres, top-left origin.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateField {
    pub name: String,
    pub page: usize,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl TemplateField {
    fn rect(&self) -> Vec<Object> {
        let left = mm_to_pt(self.x);
        let bottom = page_y(self.y + self.height);
        let right = mm_to_pt(self.x + self.width);
        let top = page_y(self.y);
        [left, bottom, right, top]
            .into_iter()
            .map(|v| Object::Integer(v.round() as i64))
            .collect()
    }
}

/// Render `drawing` and add a text widget for every field.
///
/// Fields pointing past the last page are skipped.
pub fn build_template(drawing: &Drawing, fields: &[TemplateField]) -> Result<Vec<u8>, PdfError> {
    let pdf::RenderedPages {
        mut document,
        catalog_id,
        page_ids,
        regular_font_id,
    } = pdf::build_document(drawing);

    let mut annotations: BTreeMap<ObjectId, Vec<Object>> = BTreeMap::new();
    let mut field_refs = Vec::new();
    for field in fields {
        let Some(&page_id) = page_ids.get(field.page) else {
            log::warn!("skipping template field {} on missing page {}", field.name, field.page);
            continue;
        };
        let widget_id = document.add_object(dictionary! {
            "Type" => "Annot",
            "Subtype" => "Widget",
            "FT" => "Tx",
            "T" => Object::string_literal(field.name.as_str()),
            "Rect" => field.rect(),
            "P" => page_id,
            "F" => 4,
            "DA" => Object::string_literal(DEFAULT_APPEARANCE),
        });
        annotations.entry(page_id).or_default().push(widget_id.into());
        field_refs.push(Object::Reference(widget_id));
    }

    for (page_id, annots) in annotations {
        document
            .get_object_mut(page_id)
            .and_then(Object::as_dict_mut)?
            .set("Annots", annots);
    }

    document
        .get_object_mut(catalog_id)
        .and_then(Object::as_dict_mut)?
        .set(
            "AcroForm",
            dictionary! {
                "Fields" => field_refs,
                "DA" => Object::string_literal(DEFAULT_APPEARANCE),
                "DR" => dictionary! {
                    "Font" => dictionary! { REGULAR_FONT => regular_font_id },
                },
            },
        );

    pdf::save(&mut document)
}

/// Write `values` into the template's text fields.
///
/// Every key in `required` must exist as a form field; values are written
/// for whichever fields have data. Viewers regenerate appearances.
pub fn fill_template(
    template: &[u8],
    values: &FieldValues,
    required: &[&str],
) -> Result<Vec<u8>, TemplateError> {
    let mut document = load(template)?;
    let fields = collect_fields(&document)?;

    if let Some(missing) = required
        .iter()
        .copied()
        .find(|key| !fields.iter().any(|(name, _)| name.as_str() == *key))
    {
        return Err(TemplateError::MissingField(missing.to_string()));
    }

    for (name, id) in &fields {
        if let Some(value) = values.get(name) {
            document
                .get_object_mut(*id)
                .and_then(Object::as_dict_mut)
                .map_err(malformed)?
                .set("V", text_string(value));
        }
    }

    set_need_appearances(&mut document)?;
    pdf::save(&mut document).map_err(|e| TemplateError::Malformed(e.to_string()))
}

/// Current values of every named text field.
pub fn read_field_values(pdf_bytes: &[u8]) -> Result<BTreeMap<String, String>, TemplateError> {
    let document = load(pdf_bytes)?;
    let mut values = BTreeMap::new();
    for (name, id) in collect_fields(&document)? {
        let dict = document.get_object(id).and_then(Object::as_dict).map_err(malformed)?;
        if let Ok(Object::String(bytes, _)) = dict.get(b"V") {
            values.insert(name, decode_text(bytes));
        }
    }
    Ok(values)
}

fn load(bytes: &[u8]) -> Result<Document, TemplateError> {
    Document::load_mem(bytes).map_err(malformed)
}

fn malformed(error: lopdf::Error) -> TemplateError {
    TemplateError::Malformed(error.to_string())
}

fn acroform_id(document: &Document) -> Result<Option<ObjectId>, TemplateError> {
    let catalog = document.catalog().map_err(malformed)?;
    match catalog.get(b"AcroForm") {
        Ok(Object::Reference(id)) => Ok(Some(*id)),
        Ok(Object::Dictionary(_)) => Ok(None),
        _ => Err(TemplateError::Malformed("document has no AcroForm".into())),
    }
}

/// Fully qualified names of terminal fields with their object ids.
fn collect_fields(document: &Document) -> Result<Vec<(String, ObjectId)>, TemplateError> {
    let acroform = match acroform_id(document)? {
        Some(id) => document.get_object(id).and_then(Object::as_dict),
        None => document
            .catalog()
            .and_then(|catalog| catalog.get(b"AcroForm"))
            .and_then(Object::as_dict),
    }
    .map_err(malformed)?;

    let roots = acroform
        .get(b"Fields")
        .and_then(Object::as_array)
        .map_err(malformed)?;

    let mut fields = Vec::new();
    for root in roots {
        if let Ok(id) = root.as_reference() {
            walk_field(document, id, None, 0, &mut fields);
        }
    }
    Ok(fields)
}

fn walk_field(
    document: &Document,
    id: ObjectId,
    parent: Option<&str>,
    depth: usize,
    out: &mut Vec<(String, ObjectId)>,
) {
    if depth > MAX_FIELD_DEPTH {
        return;
    }
    let Ok(dict) = document.get_object(id).and_then(Object::as_dict) else {
        return;
    };

    let partial = match dict.get(b"T") {
        Ok(Object::String(bytes, _)) => Some(decode_text(bytes)),
        _ => None,
    };
    let name = match (parent, partial) {
        (Some(parent), Some(partial)) => format!("{parent}.{partial}"),
        (None, Some(partial)) => partial,
        (Some(parent), None) => parent.to_string(),
        (None, None) => return,
    };

    let named_kids: Vec<ObjectId> = dict
        .get(b"Kids")
        .and_then(Object::as_array)
        .map(|kids| {
            kids.iter()
                .filter_map(|kid| kid.as_reference().ok())
                .filter(|kid| {
                    document
                        .get_object(*kid)
                        .and_then(Object::as_dict)
                        .map(|kid| kid.has(b"T"))
                        .unwrap_or(false)
                })
                .collect()
        })
        .unwrap_or_default();

    if named_kids.is_empty() {
        out.push((name, id));
    } else {
        for kid in named_kids {
            walk_field(document, kid, Some(&name), depth + 1, out);
        }
    }
}

fn set_need_appearances(document: &mut Document) -> Result<(), TemplateError> {
    let acroform = match acroform_id(document)? {
        Some(id) => document.get_object_mut(id).and_then(Object::as_dict_mut),
        None => {
            let root = document
                .trailer
                .get(b"Root")
                .and_then(Object::as_reference)
                .map_err(malformed)?;
            document
                .get_object_mut(root)
                .and_then(Object::as_dict_mut)
                .and_then(|catalog| catalog.get_mut(b"AcroForm"))
                .and_then(Object::as_dict_mut)
        }
    }
    .map_err(malformed)?;

    acroform.set("NeedAppearances", true);
    Ok(())
}

/// PDF text string: literal for ASCII, UTF-16BE with a byte order mark otherwise.
fn text_string(value: &str) -> Object {
    if value.is_ascii() {
        return Object::string_literal(value);
    }
    let mut bytes = vec![0xfe, 0xff];
    for unit in value.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

fn decode_text(bytes: &[u8]) -> String {
    if let Some(utf16) = bytes.strip_prefix(&[0xfe, 0xff]) {
        let units: Vec<u16> = utf16
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    bytes.iter().map(|&b| b as char).collect()
}
