use crate::types::*;
use lopdf::Document as PdfDocument;
use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str};
use std::path::Path;

// US Letter in points (72 DPI)
const LETTER_WIDTH: f32 = 612.0;
const LETTER_HEIGHT: f32 = 792.0;

const TEXT_ORIGIN: (f32, f32) = (100.0, 750.0);
const FONT_SIZE: f32 = 12.0;
const FONT_NAME: Name<'static> = Name(b"F1");

pub struct PdfProcessor;

impl PdfProcessor {
    pub fn new() -> Self {
        Self
    }

    /// Create a single-page Letter PDF with `text` drawn in one show operation near the top-left.
    ///
    /// There is no wrapping or pagination: text longer than the page runs off it.
    pub fn render_text_pdf(&self, text: &str) -> Vec<u8> {
        let pdf_bytes = write_pages(&[text]);
        log::info!(
            "Created PDF from {} characters of text: {} bytes",
            text.chars().count(),
            pdf_bytes.len()
        );
        pdf_bytes
    }

    /// Extract the text of every page, in page order, joined with nothing in between.
    pub fn extract_text(&self, path: &Path) -> Result<String, ConversionError> {
        let doc = PdfDocument::load(path)?;
        let pages = doc.get_pages();

        let mut text = String::new();
        for page_number in pages.keys() {
            let page_text = doc.extract_text(&[*page_number])?;
            log::debug!("Page {}: {} characters", page_number, page_text.len());
            text.push_str(&page_text);
        }

        log::info!(
            "Extracted {} characters from {} pages of {}",
            text.len(),
            pages.len(),
            path.display()
        );
        Ok(text)
    }
}

impl Default for PdfProcessor {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a PDF with one page per entry in `pages`, all sharing a Helvetica font.
pub(crate) fn write_pages(pages: &[&str]) -> Vec<u8> {
    let catalog_id = Ref::new(1);
    let page_tree_id = Ref::new(2);
    let font_id = Ref::new(3);
    let mut next_id = 4;

    let page_ids: Vec<(Ref, Ref)> = pages
        .iter()
        .map(|_| {
            let ids = (Ref::new(next_id), Ref::new(next_id + 1));
            next_id += 2;
            ids
        })
        .collect();

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(page_tree_id);
    pdf.pages(page_tree_id)
        .kids(page_ids.iter().map(|(page_id, _)| *page_id))
        .count(page_ids.len() as i32);

    pdf.type1_font(font_id)
        .base_font(Name(b"Helvetica"))
        .encoding_predefined(Name(b"WinAnsiEncoding"));

    for (text, (page_id, content_id)) in pages.iter().zip(&page_ids) {
        let mut page = pdf.page(*page_id);
        page.media_box(Rect::new(0.0, 0.0, LETTER_WIDTH, LETTER_HEIGHT));
        page.parent(page_tree_id);
        page.contents(*content_id);
        page.resources().fonts().pair(FONT_NAME, font_id);
        page.finish();

        let encoded = encode_win_ansi(text);
        let mut content = Content::new();
        content.begin_text();
        content.set_font(FONT_NAME, FONT_SIZE);
        content.next_line(TEXT_ORIGIN.0, TEXT_ORIGIN.1);
        content.show(Str(&encoded));
        content.end_text();
        pdf.stream(*content_id, &content.finish());
    }

    pdf.finish()
}

/// WinAnsi agrees with Latin-1 outside 0x80..=0x9F; anything else becomes '?'.
fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c as u32 {
            code @ 0x00..=0x7F => code as u8,
            code @ 0xA0..=0xFF => code as u8,
            _ => b'?',
        })
        .collect()
}
