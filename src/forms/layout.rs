//! Draw instructions for synthesized pages.
//!
//! Coordinates are millimetres on an A4 page with the origin in the top-left
//! corner and `y` pointing down, the way paper forms are measured. The PDF
//! canvas converts them to points.

pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;
pub const LEFT_MM: f32 = 20.0;
pub const RIGHT_COLUMN_MM: f32 = 120.0;

const TOP_MM: f32 = 20.0;
const BOTTOM_LIMIT_MM: f32 = 280.0;
const TITLE_STEP_MM: f32 = 10.0;
const HEADING_STEP_MM: f32 = 10.0;
pub const LINE_STEP_MM: f32 = 7.0;

pub const TITLE_SIZE: f32 = 16.0;
pub const BODY_SIZE: f32 = 11.0;
pub const NOTE_SIZE: f32 = 10.0;
pub const CAPTION_SIZE: f32 = 9.0;

const SIGNATURE_RULE: &str = "_______________________________";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontStyle {
    Normal,
    Bold,
    Italic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    /// `x` is the centre of the text.
    Center,
}

/// A single piece of text placed on a page.
#[derive(Debug, Clone, PartialEq)]
pub struct TextOp {
    pub x: f32,
    pub y: f32,
    pub text: String,
    pub style: FontStyle,
    pub size: f32,
    pub align: Align,
}

/// Composed pages, ready for the PDF canvas.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Drawing {
    pages: Vec<Vec<TextOp>>,
}

impl Drawing {
    pub fn pages(&self) -> &[Vec<TextOp>] {
        &self.pages
    }

    pub fn is_empty(&self) -> bool {
        self.pages.iter().all(Vec::is_empty)
    }

    /// All text in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().flatten().map(|op| op.text.as_str())
    }

    /// Whether some line starts with `prefix`.
    pub fn has_line_starting_with(&self, prefix: &str) -> bool {
        self.texts().any(|text| text.starts_with(prefix))
    }
}

/// Writes text top to bottom, moving to a new page when the bottom margin
/// is reached.
#[derive(Debug)]
pub struct PageWriter {
    pages: Vec<Vec<TextOp>>,
    y: f32,
}

impl Default for PageWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl PageWriter {
    pub fn new() -> Self {
        Self {
            pages: vec![Vec::new()],
            y: TOP_MM,
        }
    }

    /// Current baseline, in millimetres from the top of the page.
    pub fn cursor(&self) -> f32 {
        self.y
    }

    /// Zero-based index of the page being written.
    pub fn page_index(&self) -> usize {
        self.pages.len() - 1
    }

    /// Bold, centred title lines; body text starts two steps below.
    pub fn title(&mut self, lines: &[&str]) {
        for line in lines {
            self.place(PAGE_WIDTH_MM / 2.0, line, FontStyle::Bold, TITLE_SIZE, Align::Center);
            self.y += TITLE_STEP_MM;
        }
        self.y += TITLE_STEP_MM;
    }

    pub fn heading(&mut self, text: &str) {
        self.ensure_room(HEADING_STEP_MM + LINE_STEP_MM);
        self.place(LEFT_MM, text, FontStyle::Bold, BODY_SIZE, Align::Left);
        self.y += HEADING_STEP_MM;
    }

    pub fn line(&mut self, text: &str) {
        self.ensure_room(LINE_STEP_MM);
        self.place(LEFT_MM, text, FontStyle::Normal, BODY_SIZE, Align::Left);
        self.y += LINE_STEP_MM;
    }

    pub fn gap(&mut self, mm: f32) {
        self.y += mm;
    }

    /// Signature rules with captions underneath, one column per caption.
    pub fn signatures(&mut self, captions: &[&str]) {
        self.ensure_room(LINE_STEP_MM * 2.0);
        let columns = [LEFT_MM, RIGHT_COLUMN_MM];
        for (x, _) in columns.iter().zip(captions) {
            self.place(*x, SIGNATURE_RULE, FontStyle::Normal, BODY_SIZE, Align::Left);
        }
        self.y += LINE_STEP_MM;
        for (x, caption) in columns.iter().zip(captions) {
            self.place(*x, caption, FontStyle::Normal, CAPTION_SIZE, Align::Left);
        }
        self.y += LINE_STEP_MM;
    }

    /// Italic footnote lines.
    pub fn note(&mut self, lines: &[&str]) {
        for line in lines {
            self.ensure_room(LINE_STEP_MM);
            self.place(LEFT_MM, line, FontStyle::Italic, NOTE_SIZE, Align::Left);
            self.y += LINE_STEP_MM;
        }
    }

    pub fn finish(self) -> Drawing {
        Drawing { pages: self.pages }
    }

    fn ensure_room(&mut self, needed: f32) {
        if self.y + needed > BOTTOM_LIMIT_MM {
            self.pages.push(Vec::new());
            self.y = TOP_MM;
        }
    }

    fn place(&mut self, x: f32, text: &str, style: FontStyle, size: f32, align: Align) {
        let op = TextOp {
            x,
            y: self.y,
            text: text.to_string(),
            style,
            size,
            align,
        };
        if let Some(page) = self.pages.last_mut() {
            page.push(op);
        }
    }
}
