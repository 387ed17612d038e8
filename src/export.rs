//! Spreadsheet and PDF export of filtered record collections.

use std::ops::Range;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use printpdf::path::PaintMode;
use printpdf::{BuiltinFont, Color as PdfColor, IndirectFontRef, Mm, PdfDocument, PdfLayerReference, Rect, Rgb};
use rust_xlsxwriter::{Color, Format, FormatBorder, Workbook};
use tracing::info;

use crate::error::Result;
use crate::models::{Lookup, Record, Value};
use crate::table::format_number;

/// Field key and the header shown for it in exported files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportColumn {
    pub key: &'static str,
    pub header: &'static str,
}

impl ExportColumn {
    pub const fn new(key: &'static str, header: &'static str) -> Self {
        Self { key, header }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Excel,
    Pdf,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Excel => "xlsx",
            Self::Pdf => "pdf",
        }
    }

    fn filter_name(self) -> &'static str {
        match self {
            Self::Excel => "Excel Files",
            Self::Pdf => "PDF Files",
        }
    }
}

/// Values extracted from records, detached from the store so they can be
/// written off the UI thread.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportTable {
    pub dataset: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl ExportTable {
    pub fn build<T: Record>(records: &[&T], columns: &[ExportColumn], lookup: &dyn Lookup) -> Self {
        Self {
            dataset: T::DATASET.to_string(),
            headers: columns.iter().map(|c| c.header.to_string()).collect(),
            rows: records
                .iter()
                .map(|r| columns.iter().map(|c| r.field(c.key, lookup)).collect())
                .collect(),
        }
    }
}

/// Write the table to an `.xlsx` workbook with a single `Data` sheet.
pub fn export_to_excel(table: &ExportTable, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    worksheet.set_name("Data")?;

    // Header format
    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0x4472C4))
        .set_font_color(Color::White)
        .set_border(FormatBorder::Thin);

    for (col, header) in table.headers.iter().enumerate() {
        let col = col as u16;
        worksheet.write_string_with_format(0, col, header, &header_format)?;
        worksheet.set_column_width(col, header.chars().count().max(15) as f64)?;
    }

    for (idx, values) in table.rows.iter().enumerate() {
        let row = (idx + 1) as u32;
        for (col, value) in values.iter().enumerate() {
            let col = col as u16;
            match value {
                Value::Empty => {}
                Value::Id(id) => {
                    worksheet.write_number(row, col, id.0 as f64)?;
                }
                Value::Integer(n) => {
                    worksheet.write_number(row, col, *n as f64)?;
                }
                Value::Decimal(n) => {
                    worksheet.write_number(row, col, *n)?;
                }
                Value::Bool(b) => {
                    worksheet.write_boolean(row, col, *b)?;
                }
                other => {
                    worksheet.write_string(row, col, other.to_string())?;
                }
            }
        }
    }

    // Autofilter
    if !table.rows.is_empty() && !table.headers.is_empty() {
        let last_row = table.rows.len() as u32;
        worksheet.autofilter(0, 0, last_row, (table.headers.len() - 1) as u16)?;
    }

    // Freeze top row
    worksheet.set_freeze_panes(1, 0)?;

    workbook.save(path)?;
    info!("Exported {} {} rows to {}", table.rows.len(), table.dataset, path.display());
    Ok(())
}

/// Text shown for a value in the PDF body.
pub fn format_pdf_value(value: &Value) -> String {
    match value {
        Value::Empty => "-".to_string(),
        Value::Text(s) if s.is_empty() => "-".to_string(),
        Value::Bool(true) => "Yes".to_string(),
        Value::Bool(false) => "No".to_string(),
        Value::Integer(n) => format_number(*n as f64),
        Value::Decimal(n) => format_number(*n),
        other => other.to_string(),
    }
}

const MARGIN: f32 = 15.0;
const TITLE_BLOCK: f32 = 22.0;
const BODY_FONT_SIZE: f32 = 8.0;
const LINE_HEIGHT: f32 = 3.5;
const CELL_PADDING: f32 = 3.5;
/// Helvetica at 8pt averages about 1.5mm per glyph; wide glyphs need the slack.
const GLYPH_WIDTH: f32 = 1.6;
/// Tables with more columns than this are laid out in landscape.
const PORTRAIT_MAX_COLUMNS: usize = 6;

const HEADER_FILL: (u8, u8, u8) = (79, 70, 229);
const BAND_FILL: (u8, u8, u8) = (249, 250, 251);

/// Page dimensions in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PageSize {
    width: f32,
    height: f32,
}

const PORTRAIT: PageSize = PageSize {
    width: 210.0,
    height: 297.0,
};
const LANDSCAPE: PageSize = PageSize {
    width: 297.0,
    height: 210.0,
};

/// One table row with every cell broken into lines.
#[derive(Debug, Clone, PartialEq)]
struct PdfRow {
    cells: Vec<Vec<String>>,
}

impl PdfRow {
    fn new<'a>(texts: impl Iterator<Item = &'a str>, max_chars: usize) -> Self {
        Self {
            cells: texts.map(|text| wrap_text(text, max_chars)).collect(),
        }
    }

    /// Height of the tallest cell.
    fn height(&self) -> f32 {
        let lines = self.cells.iter().map(Vec::len).max().unwrap_or(1).max(1);
        lines as f32 * LINE_HEIGHT + CELL_PADDING
    }
}

/// Geometry and wrapped text of a PDF report, computed before drawing.
#[derive(Debug, Clone, PartialEq)]
struct PdfLayout {
    page: PageSize,
    col_width: f32,
    max_chars: usize,
    header: PdfRow,
    body: Vec<PdfRow>,
}

impl PdfLayout {
    fn new(table: &ExportTable) -> Self {
        let page = if table.headers.len() > PORTRAIT_MAX_COLUMNS {
            LANDSCAPE
        } else {
            PORTRAIT
        };
        let col_width = (page.width - 2.0 * MARGIN) / table.headers.len().max(1) as f32;
        let max_chars = ((col_width - 2.0) / GLYPH_WIDTH).max(1.0) as usize;

        let header = PdfRow::new(table.headers.iter().map(String::as_str), max_chars);
        let body = table
            .rows
            .iter()
            .map(|row| {
                let texts: Vec<String> = row.iter().map(format_pdf_value).collect();
                PdfRow::new(texts.iter().map(String::as_str), max_chars)
            })
            .collect();

        Self {
            page,
            col_width,
            max_chars,
            header,
            body,
        }
    }

    fn pages(&self) -> Vec<Range<usize>> {
        let heights: Vec<f32> = self.body.iter().map(PdfRow::height).collect();
        paginate(&heights, self.header.height(), self.page.height)
    }
}

/// Greedy word wrap to at most `max_chars` characters per line. Words longer
/// than a line are split across lines; no character other than the
/// separating whitespace is dropped.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut len = 0;

    for word in text.split_whitespace() {
        let mut chars: Vec<char> = word.chars().collect();
        if len > 0 && len + 1 + chars.len() > max_chars {
            lines.push(std::mem::take(&mut current));
            len = 0;
        }
        if len > 0 {
            current.push(' ');
            len += 1;
        }
        while len + chars.len() > max_chars {
            let take = max_chars - len;
            current.extend(chars.drain(..take));
            lines.push(std::mem::take(&mut current));
            len = 0;
        }
        len += chars.len();
        current.extend(chars);
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Body rows that go on each page, given each row's height. Every page
/// repeats the header row and the first page also carries the title block.
/// A row taller than a page still gets a page of its own. There is always
/// at least one page.
fn paginate(heights: &[f32], header_height: f32, page_height: f32) -> Vec<Range<usize>> {
    let usable = page_height - 2.0 * MARGIN - header_height;

    let mut pages = Vec::new();
    let mut start = 0;
    let mut available = usable - TITLE_BLOCK;
    let mut used = 0.0;
    for (i, height) in heights.iter().enumerate() {
        if i > start && used + height > available {
            pages.push(start..i);
            start = i;
            available = usable;
            used = 0.0;
        }
        used += height;
    }
    pages.push(start..heights.len());
    pages
}

fn rgb((r, g, b): (u8, u8, u8)) -> PdfColor {
    PdfColor::Rgb(Rgb::new(f32::from(r) / 255.0, f32::from(g) / 255.0, f32::from(b) / 255.0, None))
}

fn fill_row(layer: &PdfLayerReference, page: PageSize, top: f32, height: f32, fill: (u8, u8, u8)) {
    layer.set_fill_color(rgb(fill));
    let rect = Rect::new(Mm(MARGIN), Mm(top - height), Mm(page.width - MARGIN), Mm(top)).with_mode(PaintMode::Fill);
    layer.add_rect(rect);
}

fn write_row(layer: &PdfLayerReference, row: &PdfRow, top: f32, col_width: f32, font: &IndirectFontRef) {
    for (i, lines) in row.cells.iter().enumerate() {
        let x = MARGIN + 1.0 + i as f32 * col_width;
        for (line_no, line) in lines.iter().enumerate() {
            let y = top - 5.0 - line_no as f32 * LINE_HEIGHT;
            layer.use_text(line.as_str(), BODY_FONT_SIZE, Mm(x), Mm(y), font);
        }
    }
}

/// Render the table as an A4 PDF report, landscape for wide tables.
pub fn render_pdf(table: &ExportTable, generated_on: NaiveDate) -> Result<Vec<u8>> {
    let layout = PdfLayout::new(table);
    let page = layout.page;
    let title = format!("Report: {}", table.dataset);
    let (doc, first_page, first_layer) = PdfDocument::new(&title, Mm(page.width), Mm(page.height), "Layer 1");
    let regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;
    let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;

    for (page_no, rows) in layout.pages().into_iter().enumerate() {
        let layer = if page_no == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (next, layer) = doc.add_page(Mm(page.width), Mm(page.height), format!("Layer {}", page_no + 1));
            doc.get_page(next).get_layer(layer)
        };

        let mut top = page.height - MARGIN;
        if page_no == 0 {
            layer.set_fill_color(rgb((0, 0, 0)));
            layer.use_text(&title, 16.0, Mm(MARGIN), Mm(top - 6.0), &bold);
            layer.use_text(
                format!("Generated on: {}", generated_on.format("%Y-%m-%d")),
                10.0,
                Mm(MARGIN),
                Mm(top - 14.0),
                &regular,
            );
            top -= TITLE_BLOCK;
        }

        let header_height = layout.header.height();
        fill_row(&layer, page, top, header_height, HEADER_FILL);
        layer.set_fill_color(rgb((255, 255, 255)));
        write_row(&layer, &layout.header, top, layout.col_width, &bold);
        top -= header_height;

        for (offset, row) in layout.body[rows].iter().enumerate() {
            let height = row.height();
            if offset % 2 == 1 {
                fill_row(&layer, page, top, height, BAND_FILL);
            }
            layer.set_fill_color(rgb((31, 41, 55)));
            write_row(&layer, row, top, layout.col_width, &regular);
            top -= height;
        }
    }

    Ok(doc.save_to_bytes()?)
}

/// Write the table to a PDF file.
pub fn export_to_pdf(table: &ExportTable, path: &Path, generated_on: NaiveDate) -> Result<()> {
    let bytes = render_pdf(table, generated_on)?;
    std::fs::write(path, bytes)?;
    info!("Exported {} {} rows to {}", table.rows.len(), table.dataset, path.display());
    Ok(())
}

/// Open save file dialog and return selected path.
pub fn show_save_dialog(default_name: &str, format: ExportFormat, directory: &Path) -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_directory(directory)
        .set_file_name(default_name)
        .add_filter(format.filter_name(), &[format.extension()])
        .save_file()
}

/// Default file name for an export, e.g. `payments.xlsx`.
pub fn generate_export_filename(dataset: &str, format: ExportFormat) -> String {
    format!("{dataset}.{}", format.extension())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Payment, RecordId, Reservation};
    use crate::pages::Page;
    use crate::store::Store;
    use calamine::{open_workbook, Data, Reader, Xlsx};
    use tempfile::TempDir;

    const PAYMENT_COLUMNS: &[ExportColumn] = &[
        ExportColumn::new("id", "ID"),
        ExportColumn::new("reservation_code", "Reservation"),
        ExportColumn::new("tourist", "Tourist"),
        ExportColumn::new("amount", "Amount"),
        ExportColumn::new("status", "Status"),
        ExportColumn::new("notes", "Notes"),
    ];

    fn payments_table(store: &Store) -> ExportTable {
        let records: Vec<&Payment> = store.payments.iter().collect();
        ExportTable::build(&records, PAYMENT_COLUMNS, store)
    }

    fn read_sheet(path: &Path) -> calamine::Range<Data> {
        let mut workbook: Xlsx<_> = open_workbook(path).unwrap();
        workbook.worksheet_range("Data").unwrap()
    }

    #[test]
    fn test_build_table_resolves_joins() {
        let store = Store::seeded();
        let table = payments_table(&store);
        assert_eq!(table.dataset, "payments");
        assert_eq!(table.headers, vec!["ID", "Reservation", "Tourist", "Amount", "Status", "Notes"]);
        assert_eq!(table.rows.len(), 5);
        assert_eq!(table.rows[0][1], Value::text("RES-2024-001"));
        assert_eq!(table.rows[0][2], Value::text("Ana Martínez"));
    }

    #[test]
    fn test_excel_round_trip() {
        let store = Store::seeded();
        let table = payments_table(&store);
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(generate_export_filename("payments", ExportFormat::Excel));

        export_to_excel(&table, &path).unwrap();

        let range = read_sheet(&path);
        assert_eq!(range.height(), 6);
        let header: Vec<String> = range.rows().next().unwrap().iter().map(|c| c.to_string()).collect();
        assert_eq!(header, vec!["ID", "Reservation", "Tourist", "Amount", "Status", "Notes"]);
        assert_eq!(range.get_value((1, 3)), Some(&Data::Float(3000.0)));
        assert_eq!(range.get_value((1, 4)), Some(&Data::String("Completed".to_string())));
    }

    #[test]
    fn test_excel_empty_collection_is_header_only() {
        let store = Store::new();
        let table = payments_table(&store);
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("payments.xlsx");

        export_to_excel(&table, &path).unwrap();

        let range = read_sheet(&path);
        assert_eq!(range.height(), 1);
        assert_eq!(range.get_value((0, 0)), Some(&Data::String("ID".to_string())));
    }

    #[test]
    fn test_format_pdf_value() {
        assert_eq!(format_pdf_value(&Value::Empty), "-");
        assert_eq!(format_pdf_value(&Value::Bool(true)), "Yes");
        assert_eq!(format_pdf_value(&Value::Bool(false)), "No");
        assert_eq!(format_pdf_value(&Value::Decimal(8756.0)), "8,756");
        assert_eq!(format_pdf_value(&Value::from(RecordId(12))), "12");
        assert_eq!(format_pdf_value(&Value::from(RecordId(1234))), "1234");
        assert_eq!(format_pdf_value(&Value::text("PayPal")), "PayPal");
    }

    /// Concatenated text of every page, restricted to ASCII letters and digits
    /// so line breaks and font encoding do not matter.
    fn pdf_text(bytes: &[u8]) -> String {
        let doc = lopdf::Document::load_mem(bytes).unwrap();
        let pages: Vec<u32> = doc.get_pages().keys().copied().collect();
        squash(&doc.extract_text(&pages).unwrap())
    }

    fn squash(text: &str) -> String {
        text.chars().filter(char::is_ascii_alphanumeric).collect()
    }

    fn reservations_table(store: &Store) -> ExportTable {
        let records: Vec<&Reservation> = store.reservations.iter().collect();
        ExportTable::build(&records, Reservation::EXPORT, store)
    }

    #[test]
    fn test_wrap_text_keeps_every_character() {
        assert_eq!(wrap_text("Payment Method", 9), vec!["Payment", "Method"]);
        assert_eq!(wrap_text("ana@ejemplo.com", 9), vec!["ana@ejemp", "lo.com"]);
        assert_eq!(wrap_text("Short", 20), vec!["Short"]);
        assert_eq!(wrap_text("", 5), vec![""]);
        assert_eq!(wrap_text("a bb ccc", 4), vec!["a bb", "ccc"]);
    }

    #[test]
    fn test_wide_tables_wrap_instead_of_cutting() {
        let store = Store::seeded();
        let table = reservations_table(&store);
        let layout = PdfLayout::new(&table);

        assert!(table.headers.len() > PORTRAIT_MAX_COLUMNS);
        assert_eq!(layout.page, LANDSCAPE);

        let expected_rows = std::iter::once(table.headers.clone())
            .chain(table.rows.iter().map(|row| row.iter().map(format_pdf_value).collect()));
        let laid_out = std::iter::once(&layout.header).chain(&layout.body);
        for (texts, row) in expected_rows.zip(laid_out) {
            assert_eq!(texts.len(), row.cells.len());
            for (text, lines) in texts.iter().zip(&row.cells) {
                let joined: String = lines.concat().split_whitespace().collect();
                let original: String = text.split_whitespace().collect();
                assert_eq!(joined, original);
                assert!(lines.iter().all(|l| l.chars().count() <= layout.max_chars), "{lines:?}");
            }
        }
    }

    #[test]
    fn test_row_height_follows_tallest_cell() {
        let row = PdfRow::new(["one", "two lines here"].into_iter(), 5);
        assert_eq!(row.cells[1], vec!["two", "lines", "here"]);
        assert_eq!(row.height(), 3.0 * LINE_HEIGHT + CELL_PADDING);
    }

    #[test]
    fn test_paginate_covers_every_row_once() {
        assert_eq!(paginate(&[], 7.0, PORTRAIT.height), vec![0..0]);
        assert_eq!(paginate(&[7.0; 3], 7.0, PORTRAIT.height), vec![0..3]);

        let pages = paginate(&[7.0; 250], 7.0, PORTRAIT.height);
        assert!(pages.len() > 1);
        assert_eq!(pages.first().unwrap().start, 0);
        assert_eq!(pages.last().unwrap().end, 250);
        for pair in pages.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
        assert!(pages[1].len() > pages[0].len());

        // Taller rows mean fewer rows per page
        let tall = paginate(&[14.0; 250], 7.0, PORTRAIT.height);
        assert!(tall[1].len() < pages[1].len());

        // A row taller than the page still gets placed
        assert_eq!(paginate(&[500.0, 7.0], 7.0, PORTRAIT.height), vec![0..1, 1..2]);
    }

    #[test]
    fn test_pdf_contains_full_headers_and_cells() {
        let store = Store::seeded();
        let table = reservations_table(&store);
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("reservations.pdf");

        export_to_pdf(&table, &path, date).unwrap();
        let text = pdf_text(&std::fs::read(&path).unwrap());

        for header in &table.headers {
            assert!(text.contains(&squash(header)), "missing header {header}");
        }
        for row in &table.rows {
            let cells: String = row.iter().map(|v| squash(&format_pdf_value(v))).collect();
            assert!(text.contains(&cells), "missing row {cells}");
        }
        assert!(text.contains("anaejemplocom"));
        assert!(text.contains("PaymentMethod"));
    }

    #[test]
    fn test_pdf_empty_collection_is_header_only() {
        let table = payments_table(&Store::new());
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

        let text = pdf_text(&render_pdf(&table, date).unwrap());

        let expected = squash(&format!(
            "Report: payments Generated on: 2024-03-01 {}",
            table.headers.join(" ")
        ));
        assert_eq!(text, expected);
    }

    #[test]
    fn test_export_filename() {
        assert_eq!(generate_export_filename("tourists", ExportFormat::Pdf), "tourists.pdf");
        assert_eq!(generate_export_filename("tourists", ExportFormat::Excel), "tourists.xlsx");
    }
}
