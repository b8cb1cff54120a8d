//! PDF rendering of reports via printpdf.
//!
//! Layout mirrors the report structure: for each sheet, in report order, the
//! sheet name as a bold heading followed by one `"<column>: <value>"` line
//! per column result.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use printpdf::image_crate::codecs::png::PngDecoder;
use printpdf::{
    BuiltinFont, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference,
};

use crate::report::Report;

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 15.0;
const LINE_HEIGHT: f32 = 9.0;
const HEADING_SIZE: f32 = 16.0;
const BODY_SIZE: f32 = 12.0;
const CHART_WIDTH_MM: f32 = 180.0;
const MM_PER_INCH: f32 = 25.4;

/// Write the summary PDF: sheet headings and per-column result lines.
pub fn write_summary_pdf(report: &Report, path: &Path) -> Result<()> {
    let (doc, page, layer) = PdfDocument::new(
        "Spreadsheet Report",
        Mm(PAGE_WIDTH),
        Mm(PAGE_HEIGHT),
        "Layer 1",
    );
    let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
    let regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;
    let mut cursor = PageCursor::new(&doc, doc.get_page(page).get_layer(layer));

    write_report_lines(report, &mut cursor, &bold, &regular);

    save(doc, path)
}

/// Write the detailed PDF: a titled summary followed by a "Graphs" page
/// embedding the pre-rendered per-sheet totals chart.
pub fn write_detailed_pdf(report: &Report, chart_png: &Path, path: &Path) -> Result<()> {
    let (doc, page, layer) = PdfDocument::new(
        "Report Details",
        Mm(PAGE_WIDTH),
        Mm(PAGE_HEIGHT),
        "Layer 1",
    );
    let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
    let regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;
    let mut cursor = PageCursor::new(&doc, doc.get_page(page).get_layer(layer));

    cursor.line("Report Details", HEADING_SIZE, &bold);
    write_report_lines(report, &mut cursor, &bold, &regular);

    cursor.new_page();
    cursor.line("Graphs", HEADING_SIZE, &bold);
    embed_chart(&cursor.layer, chart_png)?;

    save(doc, path)
}

fn write_report_lines(
    report: &Report,
    cursor: &mut PageCursor,
    bold: &IndirectFontRef,
    regular: &IndirectFontRef,
) {
    for (sheet, result) in report.iter() {
        cursor.line(sheet, HEADING_SIZE, bold);
        for (column, value) in result {
            let text = format!("{}: {}", column, format_value(*value));
            cursor.line(&text, BODY_SIZE, regular);
        }
    }
}

/// Embed the chart PNG scaled to the content width, anchored below the page
/// heading.
fn embed_chart(layer: &PdfLayerReference, chart_png: &Path) -> Result<()> {
    let file = File::open(chart_png)
        .with_context(|| format!("Failed to open chart image: {}", chart_png.display()))?;
    let decoder = PngDecoder::new(file)
        .with_context(|| format!("Failed to decode chart image: {}", chart_png.display()))?;
    let image = Image::try_from(decoder)
        .with_context(|| format!("Failed to embed chart image: {}", chart_png.display()))?;

    let px_width = image.image.width.0 as f32;
    let px_height = image.image.height.0 as f32;
    let dpi = px_width * MM_PER_INCH / CHART_WIDTH_MM;
    let height_mm = px_height * MM_PER_INCH / dpi;

    image.add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(MARGIN)),
            translate_y: Some(Mm((PAGE_HEIGHT - 30.0 - height_mm).max(MARGIN))),
            dpi: Some(dpi),
            ..Default::default()
        },
    );
    Ok(())
}

fn save(doc: PdfDocumentReference, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create PDF file: {}", path.display()))?;
    doc.save(&mut BufWriter::new(file))
        .with_context(|| format!("Failed to write PDF: {}", path.display()))?;
    Ok(())
}

/// Tracks the write position on the current page, starting a fresh page when
/// the bottom margin is reached.
struct PageCursor<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    y: f32,
}

impl<'a> PageCursor<'a> {
    fn new(doc: &'a PdfDocumentReference, layer: PdfLayerReference) -> Self {
        PageCursor {
            doc,
            layer,
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    fn line(&mut self, text: &str, size: f32, font: &IndirectFontRef) {
        if self.y < MARGIN {
            self.new_page();
        }
        self.layer.use_text(text, size, Mm(MARGIN), Mm(self.y), font);
        self.y -= LINE_HEIGHT;
    }

    fn new_page(&mut self) {
        let (page, layer) = self
            .doc
            .add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = PAGE_HEIGHT - MARGIN;
    }
}

/// Format results like JSON numbers: integral values print without a
/// trailing fraction, so a sum of whole cells reads `60`, not `60.0`.
fn format_value(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}
