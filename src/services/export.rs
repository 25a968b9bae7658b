// src/services/export.rs
//
// Byte renderers for the results table. Each one consumes the rows produced by
// `results::aggregate` verbatim and only decides on layout.

use printpdf::{
    BuiltinFont, Color, Greyscale, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, Point, Pt, Rgb,
    TextItem,
};
use rust_xlsxwriter::{Format, Workbook};
use serde::Deserialize;

use crate::{error::AppError, models::result::ResultRow};

/// Column order shared by every tabular export.
pub const COLUMNS: [&str; 6] = ["name", "email", "class", "correct", "total", "percent"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Xlsx,
    Pdf,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Pdf => "pdf",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            ExportFormat::Pdf => "application/pdf",
        }
    }

    /// Renders already-materialized rows into the format's bytes.
    pub fn render(self, title: &str, rows: &[ResultRow]) -> Result<Vec<u8>, AppError> {
        match self {
            ExportFormat::Csv => Ok(build_csv(rows)),
            ExportFormat::Xlsx => build_xlsx(rows),
            ExportFormat::Pdf => Ok(build_pdf(title, rows)),
        }
    }
}

/// Escapes CSV field to prevent formula injection attacks.
/// Prefixes dangerous characters (=, +, @, -, tab, newline) with a tab and
/// quotes fields containing separators.
fn escape_csv_field(value: &str) -> String {
    let sanitized = if value.starts_with(['=', '+', '@', '-', '\t', '\r', '\n']) {
        format!("\t{}", value)
    } else {
        value.to_string()
    };

    if sanitized.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", sanitized.replace('"', "\"\""))
    } else {
        sanitized
    }
}

pub fn build_csv(rows: &[ResultRow]) -> Vec<u8> {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(COLUMNS.join(","));

    for row in rows {
        lines.push(format!(
            "{},{},{},{},{},{}",
            escape_csv_field(&row.name),
            escape_csv_field(&row.email),
            escape_csv_field(&row.class_name),
            row.score.correct,
            row.score.total,
            row.score.percent
        ));
    }

    lines.join("\n").into_bytes()
}

pub fn build_xlsx(rows: &[ResultRow]) -> Result<Vec<u8>, AppError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Results")?;

    let header_format = Format::new().set_bold();
    for (col, header) in COLUMNS.iter().enumerate() {
        worksheet.set_column_width(col as u16, 20)?;
        worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }

    for (idx, row) in rows.iter().enumerate() {
        let r = idx as u32 + 1;
        worksheet.write_string(r, 0, &row.name)?;
        worksheet.write_string(r, 1, &row.email)?;
        worksheet.write_string(r, 2, &row.class_name)?;
        worksheet.write_number(r, 3, row.score.correct as f64)?;
        worksheet.write_number(r, 4, row.score.total as f64)?;
        worksheet.write_number(r, 5, row.score.percent as f64)?;
    }

    Ok(workbook.save_to_buffer()?)
}

/// One PDF body line per result row.
pub fn pdf_line(row: &ResultRow) -> String {
    format!(
        "{} | {} | class: {} | score: {}/{} ({}%)",
        row.name, row.email, row.class_name, row.score.correct, row.score.total, row.score.percent
    )
}

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 15.0;
const LINE_STEP_MM: f32 = 7.0;

pub fn build_pdf(title: &str, rows: &[ResultRow]) -> Vec<u8> {
    let pages = pdf_page_ops(title, rows)
        .into_iter()
        .map(|ops| PdfPage::new(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), ops))
        .collect();

    let mut warnings = Vec::new();
    PdfDocument::new("Exam Results")
        .with_pages(pages)
        .save(&PdfSaveOptions::default(), &mut warnings)
}

/// Drawing operations per page: the title, then one `pdf_line` per row.
fn pdf_page_ops(title: &str, rows: &[ResultRow]) -> Vec<Vec<Op>> {
    let accent_color = Color::Rgb(Rgb {
        r: 0.16,
        g: 0.4,
        b: 0.69,
        icc_profile: None,
    });
    let text_color = Color::Greyscale(Greyscale::new(0.08, None));

    let mut pages = Vec::new();
    let mut ops = Vec::new();
    push_pdf_text(
        &mut ops,
        Point::new(Mm(MARGIN_MM), Mm(PAGE_HEIGHT_MM - 20.0)),
        BuiltinFont::HelveticaBold,
        16.0,
        20.0,
        format!("Exam Results: {title}"),
        &accent_color,
    );
    let mut y = PAGE_HEIGHT_MM - 32.0;

    if rows.is_empty() {
        push_pdf_text(
            &mut ops,
            Point::new(Mm(MARGIN_MM), Mm(y)),
            BuiltinFont::HelveticaOblique,
            11.0,
            14.0,
            "No attempts yet".into(),
            &text_color,
        );
    }

    for row in rows {
        if y < MARGIN_MM {
            pages.push(std::mem::take(&mut ops));
            y = PAGE_HEIGHT_MM - 20.0;
        }
        push_pdf_text(
            &mut ops,
            Point::new(Mm(MARGIN_MM), Mm(y)),
            BuiltinFont::Helvetica,
            12.0,
            14.0,
            pdf_line(row),
            &text_color,
        );
        y -= LINE_STEP_MM;
    }
    pages.push(ops);
    pages
}

fn push_pdf_text(
    ops: &mut Vec<Op>,
    pos: Point,
    font: BuiltinFont,
    font_size: f32,
    line_height: f32,
    text: String,
    color: &Color,
) {
    ops.extend([
        Op::StartTextSection,
        Op::SetTextCursor { pos },
        Op::SetFontSizeBuiltinFont {
            size: Pt(font_size),
            font,
        },
        Op::SetLineHeight {
            lh: Pt(line_height),
        },
        Op::SetFillColor { col: color.clone() },
        Op::WriteTextBuiltinFont {
            items: vec![TextItem::Text(text)],
            font,
        },
        Op::EndTextSection,
    ]);
}
