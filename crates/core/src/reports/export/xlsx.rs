//! Excel workbook encoding.

use std::collections::HashSet;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::utility::column_number_to_name;
use rust_xlsxwriter::{Format, Formula, Workbook, Worksheet};
use stocktally_shared::types::format_money;
use tracing::warn;

use crate::reports::error::ReportError;
use crate::reports::types::{CellValue, ReportDocument, Sheet, SumOf};

/// Longest worksheet name Excel accepts.
pub const MAX_SHEET_NAME_LEN: usize = 31;

const FORBIDDEN_CHARS: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

/// Excel reserves this name for change tracking.
const RESERVED_NAME: &str = "history";

const MONEY_FORMAT: &str = "0.00";

struct CellFormats {
    plain: Format,
    bold: Format,
    money: Format,
    bold_money: Format,
}

impl CellFormats {
    fn new() -> Self {
        Self {
            plain: Format::new(),
            bold: Format::new().set_bold(),
            money: Format::new().set_num_format(MONEY_FORMAT),
            bold_money: Format::new().set_bold().set_num_format(MONEY_FORMAT),
        }
    }

    fn text(&self, bold: bool) -> &Format {
        if bold { &self.bold } else { &self.plain }
    }

    fn amount(&self, bold: bool) -> &Format {
        if bold { &self.bold_money } else { &self.money }
    }
}

/// Encodes `document` as an `.xlsx` workbook.
///
/// A document without sheets still yields a workbook with one empty worksheet.
pub fn render(document: &ReportDocument) -> Result<Vec<u8>, ReportError> {
    let names = sheet_names(document)?;
    let formats = CellFormats::new();
    let mut workbook = Workbook::new();

    for (sheet, name) in document.sheets.iter().zip(&names) {
        let worksheet = workbook.add_worksheet().set_name(name)?;
        write_sheet(worksheet, sheet, &formats)?;
    }

    if document.is_empty() {
        workbook.add_worksheet();
    }

    Ok(workbook.save_to_buffer()?)
}

fn write_sheet(
    worksheet: &mut Worksheet,
    sheet: &Sheet,
    formats: &CellFormats,
) -> Result<(), ReportError> {
    for (r, row) in sheet.rows.iter().enumerate() {
        let row_idx = u32::try_from(r)
            .map_err(|_| ReportError::serialization(format!("row {r} out of range")))?;

        for (c, cell) in row.cells.iter().enumerate() {
            let col_idx = u16::try_from(c)
                .map_err(|_| ReportError::serialization(format!("column {c} out of range")))?;

            match &cell.value {
                CellValue::Blank => {
                    if cell.bold {
                        worksheet.write_blank(row_idx, col_idx, formats.text(true))?;
                    }
                }
                CellValue::Text(s) => {
                    worksheet.write_string_with_format(row_idx, col_idx, s, formats.text(cell.bold))?;
                }
                CellValue::Integer(n) => {
                    // quantities are far below 2^53
                    #[allow(clippy::cast_precision_loss)]
                    let n = *n as f64;
                    worksheet.write_number_with_format(row_idx, col_idx, n, formats.text(cell.bold))?;
                }
                CellValue::Decimal(d) => {
                    worksheet.write_number_with_format(
                        row_idx,
                        col_idx,
                        decimal_to_f64(*d)?,
                        formats.amount(cell.bold),
                    )?;
                }
                CellValue::Sum(sum) => {
                    let formula = Formula::new(sum_formula(sum)).set_result(format_money(sum.value));
                    worksheet.write_formula_with_format(
                        row_idx,
                        col_idx,
                        formula,
                        formats.amount(cell.bold),
                    )?;
                }
            }
        }
    }

    worksheet.autofit();
    Ok(())
}

/// Returns the `SUM` formula over the spans of `sum`, e.g. `SUM(F3:F4,F7)`.
#[must_use]
pub fn sum_formula(sum: &SumOf) -> String {
    let col = column_number_to_name(sum.column);
    let refs: Vec<String> = sum
        .spans
        .iter()
        .map(|span| {
            if span.first == span.last {
                format!("{col}{}", span.first)
            } else {
                format!("{col}{}:{col}{}", span.first, span.last)
            }
        })
        .collect();
    format!("SUM({})", refs.join(","))
}

/// Converts an amount for the float-only cell store, at display time only.
fn decimal_to_f64(amount: Decimal) -> Result<f64, ReportError> {
    amount
        .to_f64()
        .ok_or_else(|| ReportError::serialization(format!("amount {amount} cannot be stored")))
}

/// Worksheet names for every sheet, sanitized and unique.
///
/// # Errors
///
/// Returns `InvalidSheetName` when a title has nothing usable left after
/// sanitization.
pub fn sheet_names(document: &ReportDocument) -> Result<Vec<String>, ReportError> {
    let mut taken: HashSet<String> = HashSet::from([RESERVED_NAME.to_string()]);
    let mut names = Vec::with_capacity(document.sheets.len());

    for sheet in &document.sheets {
        let base = sanitize_sheet_name(&sheet.title)
            .ok_or_else(|| ReportError::InvalidSheetName(sheet.title.clone()))?;
        let name = unique_name(&base, &mut taken)
            .ok_or_else(|| ReportError::InvalidSheetName(sheet.title.clone()))?;

        if name != sheet.title {
            warn!(title = %sheet.title, name = %name, "Sheet title adjusted for spreadsheet");
        }
        names.push(name);
    }

    Ok(names)
}

fn is_edge_junk(c: char) -> bool {
    c == '\'' || c.is_whitespace()
}

/// Strips forbidden characters, edge apostrophes and overlong tails.
fn sanitize_sheet_name(title: &str) -> Option<String> {
    let cleaned: String = title
        .chars()
        .filter(|c| !FORBIDDEN_CHARS.contains(c) && !c.is_control())
        .collect();
    let name = fit(cleaned.trim_matches(is_edge_junk), MAX_SHEET_NAME_LEN);

    (!name.is_empty()).then_some(name)
}

/// Truncates to `max` characters without leaving a trailing apostrophe.
fn fit(name: &str, max: usize) -> String {
    let truncated: String = name.chars().take(max).collect();
    truncated.trim_end_matches(is_edge_junk).to_string()
}

/// Appends ` (2)`, ` (3)`, ... until the name is unused, ignoring case.
fn unique_name(base: &str, taken: &mut HashSet<String>) -> Option<String> {
    if taken.insert(base.to_lowercase()) {
        return Some(base.to_string());
    }

    for n in 2..=taken.len() + 1 {
        let suffix = format!(" ({n})");
        let stem = fit(base, MAX_SHEET_NAME_LEN - suffix.chars().count());
        if stem.is_empty() {
            return None;
        }
        let candidate = format!("{stem}{suffix}");
        if taken.insert(candidate.to_lowercase()) {
            return Some(candidate);
        }
    }

    None
}
