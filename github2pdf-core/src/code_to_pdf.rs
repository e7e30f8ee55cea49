//! # code_to_pdf: render file entries into a single paginated PDF
//!
//! Rendering happens in two steps:
//!
//! 1. [`layout_document`] paginates the entries into [`LaidOutPage`]s made of
//!    positioned text lines. Each entry becomes a `File: {path}` heading, a
//!    12 pt gap, its content as preformatted monospace lines, and a 24 pt gap.
//! 2. [`render_pdf`] turns those pages into `printpdf` operations using the
//!    built-in Helvetica-Bold and Courier fonts, so no font files are needed.
//!    Those fonts are declared with `/WinAnsiEncoding`, so every line is
//!    encoded to Windows-1252 before it is written; characters outside that
//!    code page become `?`.
//!
//! [`write_pdf`] runs both steps and writes the result atomically.
//!
//! All coordinates are in PDF points measured from the bottom-left corner.

use std::io::Write;
use std::path::Path;

use encoding_rs::WINDOWS_1252;
use printpdf::{BuiltinFont, DictItem, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, Point, Pt};
use tracing::{debug, error, info};

use crate::contract::FileEntry;

const TAB_WIDTH: usize = 4;
const UNMAPPABLE: u8 = b'?';

/// Page geometry and typography, in points.
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    pub page_width: f32,
    pub page_height: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    pub heading_font_size: f32,
    pub heading_leading: f32,
    /// Assumed advance of one heading character, in ems. Headings wrap once
    /// they would pass the right margin at this width.
    pub heading_char_width: f32,
    pub code_font_size: f32,
    pub code_leading: f32,
    pub space_after_heading: f32,
    pub space_after_block: f32,
}

impl PageLayout {
    /// Heading characters that fit between the side margins, never less than one.
    pub fn heading_chars_per_line(&self) -> usize {
        let usable = self.page_width - self.margin_left - self.margin_right;
        let per_char = self.heading_font_size * self.heading_char_width;
        ((usable / per_char).floor() as usize).max(1)
    }
}

impl Default for PageLayout {
    /// US Letter, half-inch top and bottom margins, one-inch side margins.
    fn default() -> Self {
        Self {
            page_width: 612.0,
            page_height: 792.0,
            margin_top: 36.0,
            margin_bottom: 36.0,
            margin_left: 72.0,
            margin_right: 72.0,
            heading_font_size: 14.0,
            heading_leading: 16.8,
            heading_char_width: 0.6,
            code_font_size: 8.0,
            code_leading: 8.8,
            space_after_heading: 12.0,
            space_after_block: 24.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Heading,
    Code,
}

/// One line of text at a fixed position on a page.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub kind: LineKind,
    pub x: f32,
    /// Baseline height above the bottom page edge.
    pub baseline: f32,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LaidOutPage {
    pub lines: Vec<PlacedLine>,
}

#[derive(Debug, thiserror::Error)]
pub enum CodeToPdfError {
    #[error("failed to write PDF: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to move PDF into place: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// Expand tabs and drop carriage returns so the block renders as it reads in an editor.
fn preformat_line(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut column = 0;
    for ch in line.chars() {
        match ch {
            '\t' => {
                let pad = TAB_WIDTH - column % TAB_WIDTH;
                out.extend(std::iter::repeat(' ').take(pad));
                column += pad;
            }
            '\r' => {}
            _ => {
                out.push(ch);
                column += 1;
            }
        }
    }
    out
}

/// Split a heading into lines of at most `max_chars` characters, breaking
/// after the last `/` that fits and mid-segment only when none does.
fn wrap_heading(text: &str, max_chars: usize) -> Vec<String> {
    let mut rest: Vec<char> = text.chars().collect();
    let mut lines = Vec::new();
    while rest.len() > max_chars {
        let cut = rest[..max_chars]
            .iter()
            .rposition(|&c| c == '/')
            .map(|i| i + 1)
            .unwrap_or(max_chars);
        lines.push(rest.drain(..cut).collect());
    }
    lines.push(rest.into_iter().collect());
    lines
}

/// Encode `text` as Windows-1252, the byte layout `/WinAnsiEncoding` fonts expect.
pub fn win_ansi_bytes(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    let mut buf = [0u8; 4];
    for ch in text.chars() {
        let (bytes, _, unmappable) = WINDOWS_1252.encode(ch.encode_utf8(&mut buf));
        if unmappable {
            out.push(UNMAPPABLE);
        } else {
            out.extend_from_slice(&bytes);
        }
    }
    out
}

struct Paginator<'a> {
    layout: &'a PageLayout,
    pages: Vec<LaidOutPage>,
    cursor: f32,
}

impl<'a> Paginator<'a> {
    fn new(layout: &'a PageLayout) -> Self {
        Self {
            layout,
            pages: vec![LaidOutPage::default()],
            cursor: layout.page_height - layout.margin_top,
        }
    }

    fn top(&self) -> f32 {
        self.layout.page_height - self.layout.margin_top
    }

    fn at_page_top(&self) -> bool {
        self.cursor >= self.top()
    }

    fn new_page(&mut self) {
        self.pages.push(LaidOutPage::default());
        self.cursor = self.top();
    }

    /// Spacers vanish at the top of a page.
    fn space(&mut self, amount: f32) {
        if !self.at_page_top() {
            self.cursor -= amount;
        }
    }

    fn place(&mut self, kind: LineKind, text: String) {
        let (font_size, leading) = match kind {
            LineKind::Heading => (self.layout.heading_font_size, self.layout.heading_leading),
            LineKind::Code => (self.layout.code_font_size, self.layout.code_leading),
        };
        if self.cursor - leading < self.layout.margin_bottom && !self.at_page_top() {
            self.new_page();
        }
        let line = PlacedLine {
            kind,
            x: self.layout.margin_left,
            baseline: self.cursor - font_size,
            text,
        };
        if let Some(page) = self.pages.last_mut() {
            page.lines.push(line);
        }
        self.cursor -= leading;
    }
}

/// Paginate `entries` in order. An empty input yields a single empty page.
///
/// A heading longer than [`PageLayout::heading_chars_per_line`] continues on
/// further heading lines; code lines are never wrapped.
pub fn layout_document(entries: &[FileEntry], layout: &PageLayout) -> Vec<LaidOutPage> {
    let mut paginator = Paginator::new(layout);
    let heading_width = layout.heading_chars_per_line();
    for entry in entries {
        for heading in wrap_heading(&format!("File: {}", entry.path), heading_width) {
            paginator.place(LineKind::Heading, heading);
        }
        paginator.space(layout.space_after_heading);
        for line in entry.content.lines() {
            paginator.place(LineKind::Code, preformat_line(line));
        }
        paginator.space(layout.space_after_block);
    }
    paginator.pages
}

fn pt_to_mm(pt: f32) -> Mm {
    Mm(pt * 25.4 / 72.0)
}

fn page_ops(page: &LaidOutPage, layout: &PageLayout) -> Vec<Op> {
    let mut ops = Vec::with_capacity(page.lines.len() * 5);
    for line in &page.lines {
        let (font, size) = match line.kind {
            LineKind::Heading => (BuiltinFont::HelveticaBold, layout.heading_font_size),
            LineKind::Code => (BuiltinFont::Courier, layout.code_font_size),
        };
        ops.push(Op::StartTextSection);
        ops.push(Op::SetTextCursor {
            pos: Point::new(pt_to_mm(line.x), pt_to_mm(line.baseline)),
        });
        ops.push(Op::SetFontSizeBuiltinFont {
            size: Pt(size),
            font,
        });
        // printpdf writes builtin-font text as UTF-8, so the string operand is built here.
        ops.push(Op::Unknown {
            key: "Tj".to_string(),
            value: vec![DictItem::Bytes(win_ansi_bytes(&line.text))],
        });
        ops.push(Op::EndTextSection);
    }
    ops
}

/// Font resources are only registered for fonts seen in a `WriteTextBuiltinFont`
/// op. Empty text emits no operator.
fn register_fonts(ops: &mut Vec<Op>) {
    for font in [BuiltinFont::HelveticaBold, BuiltinFont::Courier] {
        ops.push(Op::WriteTextBuiltinFont {
            items: Vec::new(),
            font,
        });
    }
}

/// Render laid-out pages into PDF bytes.
pub fn render_pdf(title: &str, pages: &[LaidOutPage], layout: &PageLayout) -> Vec<u8> {
    let pdf_pages: Vec<PdfPage> = pages
        .iter()
        .enumerate()
        .map(|(index, page)| {
            let mut ops = page_ops(page, layout);
            if index == 0 {
                register_fonts(&mut ops);
            }
            PdfPage::new(
                pt_to_mm(layout.page_width),
                pt_to_mm(layout.page_height),
                ops,
            )
        })
        .collect();

    // The raw `Tj` operators are `Op::Unknown`, which secure mode drops.
    let options = PdfSaveOptions {
        secure: false,
        ..PdfSaveOptions::default()
    };
    let mut doc = PdfDocument::new(title);
    let mut warnings = Vec::new();
    let bytes = doc.with_pages(pdf_pages).save(&options, &mut warnings);
    if !warnings.is_empty() {
        debug!(count = warnings.len(), "printpdf reported warnings while saving");
    }
    bytes
}

/// Lay out and render `entries`, writing the PDF to `output_path`.
///
/// The bytes are written to a temporary file next to `output_path` and moved
/// into place once complete, so a failed run never leaves a truncated PDF.
pub fn write_pdf(
    entries: &[FileEntry],
    layout: &PageLayout,
    output_path: &Path,
) -> Result<(), CodeToPdfError> {
    let pages = layout_document(entries, layout);
    let title = output_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("github2pdf");
    let bytes = render_pdf(title, &pages, layout);

    let dir = match output_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| {
        error!(error = ?e, dir = %dir.display(), "Failed to create temp file for PDF output");
        e
    })?;
    tmp.write_all(&bytes)?;
    tmp.persist(output_path).map_err(|e| {
        error!(error = ?e.error, path = %output_path.display(), "Failed to persist PDF");
        e
    })?;

    info!(
        path = %output_path.display(),
        files = entries.len(),
        pages = pages.len(),
        size = bytes.len(),
        "Wrote PDF"
    );
    Ok(())
}
