//! Abstract report document: sheets of rows of typed cells.

use rust_decimal::Decimal;
use serde::Serialize;
use stocktally_shared::types::format_money;

/// Inclusive span of 1-based spreadsheet rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RowSpan {
    /// First row.
    pub first: u32,
    /// Last row.
    pub last: u32,
}

impl RowSpan {
    /// A span covering one row.
    #[must_use]
    pub const fn single(row: u32) -> Self {
        Self {
            first: row,
            last: row,
        }
    }
}

/// A total that can also be expressed as a `SUM` over cells of one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SumOf {
    /// 0-based column index of the summed cells.
    pub column: u16,
    /// Row spans being summed.
    pub spans: Vec<RowSpan>,
    /// The computed sum.
    pub value: Decimal,
}

/// Typed value of a cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum CellValue {
    /// Nothing.
    Blank,
    /// Text.
    Text(String),
    /// Whole number.
    Integer(i64),
    /// Money amount.
    Decimal(Decimal),
    /// Computed total backed by a cell range.
    Sum(SumOf),
}

impl CellValue {
    /// Numeric value, for numeric cells.
    #[must_use]
    pub fn amount(&self) -> Option<Decimal> {
        match self {
            Self::Integer(n) => Some(Decimal::from(*n)),
            Self::Decimal(d) => Some(*d),
            Self::Sum(sum) => Some(sum.value),
            Self::Blank | Self::Text(_) => None,
        }
    }

    /// Text a reader sees; blank cells render as an empty string.
    #[must_use]
    pub fn display(&self) -> String {
        match self {
            Self::Blank => String::new(),
            Self::Text(s) => s.clone(),
            Self::Integer(n) => n.to_string(),
            Self::Decimal(d) => format_money(*d),
            Self::Sum(sum) => format_money(sum.value),
        }
    }
}

/// One cell with its style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cell {
    /// Value.
    pub value: CellValue,
    /// Rendered in bold.
    pub bold: bool,
}

impl Cell {
    /// An empty cell.
    #[must_use]
    pub const fn blank() -> Self {
        Self {
            value: CellValue::Blank,
            bold: false,
        }
    }

    /// A text cell.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            value: CellValue::Text(value.into()),
            bold: false,
        }
    }

    /// A whole-number cell.
    #[must_use]
    pub fn integer(value: impl Into<i64>) -> Self {
        Self {
            value: CellValue::Integer(value.into()),
            bold: false,
        }
    }

    /// A money cell.
    #[must_use]
    pub const fn decimal(value: Decimal) -> Self {
        Self {
            value: CellValue::Decimal(value),
            bold: false,
        }
    }

    /// A formula-backed total cell.
    #[must_use]
    pub const fn sum(sum: SumOf) -> Self {
        Self {
            value: CellValue::Sum(sum),
            bold: false,
        }
    }

    /// The same cell, bold.
    #[must_use]
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

/// Ordered cells of a row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Row {
    /// Cells, left to right.
    pub cells: Vec<Cell>,
}

impl Row {
    /// Creates a row from cells.
    #[must_use]
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { cells }
    }

    /// Cell at 0-based `column`, if present.
    #[must_use]
    pub fn cell(&self, column: usize) -> Option<&Cell> {
        self.cells.get(column)
    }

    /// Whether any cell is styled bold.
    #[must_use]
    pub fn is_bold(&self) -> bool {
        self.cells.iter().any(|c| c.bold)
    }
}

/// A titled page of rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sheet {
    /// Title.
    pub title: String,
    /// Rows; the first one is the column header.
    pub rows: Vec<Row>,
}

/// Ordered sheets making up one export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportDocument {
    /// Sheets in output order.
    pub sheets: Vec<Sheet>,
}

impl ReportDocument {
    /// Whether the document has no sheets at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_cell_display() {
        assert_eq!(Cell::blank().value.display(), "");
        assert_eq!(Cell::integer(3).value.display(), "3");
        assert_eq!(Cell::decimal(dec!(10)).value.display(), "10.00");
        assert_eq!(Cell::text("TOTAL").value.display(), "TOTAL");
    }

    #[test]
    fn test_cell_amount() {
        assert_eq!(Cell::integer(3).value.amount(), Some(dec!(3)));
        assert_eq!(Cell::text("x").value.amount(), None);
        let sum = SumOf {
            column: 4,
            spans: Vec::new(),
            value: dec!(1.25),
        };
        assert_eq!(Cell::sum(sum).value.amount(), Some(dec!(1.25)));
    }
}
