//! PDF canvas: turns a [`Drawing`] into a lopdf document.
//!
//! Text uses the standard Type1 Helvetica family with WinAnsi encoding, so
//! no font files are embedded. Polish letters outside WinAnsi are written
//! with their base Latin letter.

use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use thiserror::Error;

use super::layout::{Align, Drawing, FontStyle, TextOp, PAGE_HEIGHT_MM, PAGE_WIDTH_MM};

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("PDF structure error: {0}")]
    Lopdf(#[from] lopdf::Error),
    #[error("failed to serialize PDF: {0}")]
    Save(String),
}

const PT_PER_MM: f32 = 72.0 / 25.4;

/// Name of the regular font in page and form resources.
pub const REGULAR_FONT: &str = "Helv";

/// A freshly built document and the ids callers may want to extend.
pub struct RenderedPages {
    pub document: Document,
    pub catalog_id: ObjectId,
    pub page_ids: Vec<ObjectId>,
    pub regular_font_id: ObjectId,
}

pub fn mm_to_pt(mm: f32) -> f32 {
    mm * PT_PER_MM
}

/// Flip a top-down millimetre `y` into PDF user space.
pub fn page_y(mm_from_top: f32) -> f32 {
    mm_to_pt(PAGE_HEIGHT_MM - mm_from_top)
}

/// Build an A4 document with one page per drawing page.
///
/// An empty drawing still yields a single blank page.
pub fn build_document(drawing: &Drawing) -> RenderedPages {
    let mut document = Document::with_version("1.5");
    let pages_id = document.new_object_id();

    let font = |document: &mut Document, base: &str| {
        document.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => base.to_string(),
            "Encoding" => "WinAnsiEncoding",
        })
    };
    let regular_font_id = font(&mut document, "Helvetica");
    let bold_font_id = font(&mut document, "Helvetica-Bold");
    let italic_font_id = font(&mut document, "Helvetica-Oblique");

    let resources_id = document.add_object(dictionary! {
        "Font" => dictionary! {
            REGULAR_FONT => regular_font_id,
            "HeBo" => bold_font_id,
            "HeOb" => italic_font_id,
        },
    });

    let media_box = vec![
        0.into(),
        0.into(),
        (mm_to_pt(PAGE_WIDTH_MM).round() as i64).into(),
        (mm_to_pt(PAGE_HEIGHT_MM).round() as i64).into(),
    ];

    let empty = Vec::new();
    let pages: Vec<&Vec<TextOp>> = if drawing.pages().is_empty() {
        vec![&empty]
    } else {
        drawing.pages().iter().collect()
    };

    let mut page_ids = Vec::with_capacity(pages.len());
    for ops in pages {
        let content_id = document.add_object(Stream::new(dictionary! {}, page_content(ops)));
        let page_id = document.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => media_box.clone(),
        });
        page_ids.push(page_id);
    }

    document.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => page_ids.iter().map(|id| Object::Reference(*id)).collect::<Vec<_>>(),
            "Count" => page_ids.len() as i64,
        }),
    );

    let catalog_id = document.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    document.trailer.set("Root", catalog_id);

    RenderedPages {
        document,
        catalog_id,
        page_ids,
        regular_font_id,
    }
}

/// Render a drawing straight to PDF bytes.
pub fn render(drawing: &Drawing) -> Result<Vec<u8>, PdfError> {
    let mut rendered = build_document(drawing);
    save(&mut rendered.document)
}

pub fn save(document: &mut Document) -> Result<Vec<u8>, PdfError> {
    let mut buffer = Vec::new();
    document
        .save_to(&mut buffer)
        .map_err(|e| PdfError::Save(e.to_string()))?;
    Ok(buffer)
}

fn font_name(style: FontStyle) -> &'static str {
    match style {
        FontStyle::Normal => REGULAR_FONT,
        FontStyle::Bold => "HeBo",
        FontStyle::Italic => "HeOb",
    }
}

fn page_content(ops: &[TextOp]) -> Vec<u8> {
    let mut content = Vec::new();
    for op in ops {
        let encoded = encode_win_ansi(&op.text);
        let x = match op.align {
            Align::Left => mm_to_pt(op.x),
            Align::Center => mm_to_pt(op.x) - text_width(&encoded, op.size, op.style) / 2.0,
        };
        let y = page_y(op.y);

        content.extend_from_slice(
            format!(
                "BT /{} {} Tf {:.2} {:.2} Td (",
                font_name(op.style),
                op.size,
                x,
                y
            )
            .as_bytes(),
        );
        write_literal(&mut content, &encoded);
        content.extend_from_slice(b") Tj ET\n");
    }
    content
}

/// Escape bytes for a PDF literal string body.
fn write_literal(out: &mut Vec<u8>, bytes: &[u8]) {
    for &byte in bytes {
        match byte {
            b'(' | b')' | b'\\' => {
                out.push(b'\\');
                out.push(byte);
            }
            0x20..=0x7e => out.push(byte),
            _ => out.extend_from_slice(format!("\\{:03o}", byte).as_bytes()),
        }
    }
}

/// Encode text for a WinAnsi Type1 font.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' => c as u8,
            '\u{a0}'..='\u{ff}' => c as u32 as u8,
            'ą' => b'a',
            'Ą' => b'A',
            'ć' => b'c',
            'Ć' => b'C',
            'ę' => b'e',
            'Ę' => b'E',
            'ł' => b'l',
            'Ł' => b'L',
            'ń' => b'n',
            'Ń' => b'N',
            'ś' => b's',
            'Ś' => b'S',
            'ź' | 'ż' => b'z',
            'Ź' | 'Ż' => b'Z',
            '€' => 0x80,
            '„' => 0x84,
            '”' => 0x94,
            '–' => 0x96,
            '—' => 0x97,
            _ => b'?',
        })
        .collect()
}

/// Width in points of WinAnsi-encoded text set in Helvetica.
///
/// Bold is measured with the regular metrics.
/// Width in points of WinAnsi-encoded text; oblique shares the regular metrics.
pub fn text_width(encoded: &[u8], size: f32, style: FontStyle) -> f32 {
    let widths = match style {
        FontStyle::Bold => &HELVETICA_BOLD_WIDTHS,
        FontStyle::Normal | FontStyle::Italic => &HELVETICA_WIDTHS,
    };
    let units: u32 = encoded.iter().map(|&byte| glyph_width(widths, byte)).sum();
    units as f32 * size / 1000.0
}

fn glyph_width(widths: &[u32; 95], byte: u8) -> u32 {
    match byte {
        32..=126 => widths[(byte - 32) as usize],
        _ => 556,
    }
}

#[rustfmt::skip]
const HELVETICA_WIDTHS: [u32; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u32; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::layout::PageWriter;

    fn sample() -> Drawing {
        let mut writer = PageWriter::new();
        writer.title(&["PEŁNOMOCNICTWO (PEL)"]);
        writer.line("Imię i nazwisko/Nazwa: Jan Kowalski");
        writer.finish()
    }

    #[test]
    fn test_polish_letters_are_transliterated() {
        assert_eq!(encode_win_ansi("Łódź"), vec![b'L', 0xf3, b'd', b'z']);
        assert_eq!(encode_win_ansi("żółć"), vec![b'z', 0xf3, b'l', b'c']);
        assert_eq!(encode_win_ansi("日"), vec![b'?']);
    }

    #[test]
    fn test_literal_escaping() {
        let mut out = Vec::new();
        write_literal(&mut out, &encode_win_ansi("(a\\b) ó"));
        assert_eq!(out, b"\\(a\\\\b\\) \\363".to_vec());
    }

    #[test]
    fn test_render_produces_loadable_pdf() {
        let bytes = render(&sample()).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let document = Document::load_mem(&bytes).unwrap();
        let pages = document.get_pages();
        assert_eq!(pages.len(), 1);
        let page_id = *pages.values().next().unwrap();
        let content = document.get_page_content(page_id).unwrap();
        let content = String::from_utf8_lossy(&content);
        assert!(content.contains("(PELNOMOCNICTWO \\(PEL\\)) Tj"));
        assert!(content.contains("/HeBo 16 Tf"));
    }

    #[test]
    fn test_render_is_deterministic() {
        assert_eq!(render(&sample()).unwrap(), render(&sample()).unwrap());
    }

    #[test]
    fn test_empty_drawing_has_one_page() {
        let bytes = render(&Drawing::default()).unwrap();
        let document = Document::load_mem(&bytes).unwrap();
        assert_eq!(document.get_pages().len(), 1);
    }

    #[test]
    fn test_helvetica_text_width() {
        let encoded = encode_win_ansi("AB");
        assert_eq!(text_width(&encoded, 10.0, FontStyle::Normal), 13.34);
        assert_eq!(text_width(&encoded, 10.0, FontStyle::Italic), 13.34);
    }

    #[test]
    fn test_bold_titles_are_measured_with_bold_widths() {
        let encoded = encode_win_ansi("AB");
        assert_eq!(text_width(&encoded, 10.0, FontStyle::Bold), 14.44);

        let encoded = encode_win_ansi("Rok");
        assert!(
            text_width(&encoded, 12.0, FontStyle::Bold)
                > text_width(&encoded, 12.0, FontStyle::Normal)
        );
    }
}
