//! Lays aggregated buckets out as report sheets.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::aggregate::{Aggregation, DayBucket, WeekBucket};
use super::types::{Cell, ReportDocument, Row, RowSpan, Sheet, SumOf};
use crate::sales::SaleFact;

/// Column schema of the day sheet.
pub const DAY_HEADERS: [&str; 6] = ["ID No.", "Item", "Quantity Sold", "Price", "Total", "Date"];

/// Column schema of week sheets (week and month periods).
pub const WEEK_HEADERS: [&str; 6] = ["Date", "ID No.", "Item", "Quantity Sold", "Price", "Total"];

/// Label of the closing row of every sheet.
pub const TOTAL_LABEL: &str = "TOTAL";

/// Label of the closing row of every day section.
pub const SUBTOTAL_LABEL: &str = "Subtotal";

const DAY_LABEL_COL: u16 = 1;
const DAY_TOTAL_COL: u16 = 4;
const WEEK_LABEL_COL: u16 = 2;
const WEEK_TOTAL_COL: u16 = 5;

/// Append-only row log for one sheet.
///
/// Row numbers handed out are 1-based, matching spreadsheet addressing.
struct SheetBuilder {
    title: String,
    width: usize,
    rows: Vec<Row>,
}

impl SheetBuilder {
    fn new(title: String, headers: &[&str]) -> Self {
        let mut builder = Self {
            title,
            width: headers.len(),
            rows: Vec::new(),
        };
        builder.push(headers.iter().map(|h| Cell::text(*h)).collect());
        builder
    }

    /// Appends a row, padding it to the sheet width, and returns its number.
    fn push(&mut self, mut cells: Vec<Cell>) -> u32 {
        if cells.len() < self.width {
            cells.resize(self.width, Cell::blank());
        }
        self.rows.push(Row::new(cells));
        self.last_row()
    }

    fn last_row(&self) -> u32 {
        u32::try_from(self.rows.len()).unwrap_or(u32::MAX)
    }

    /// Appends a bold `label` / `total` row.
    fn push_total(&mut self, label_col: u16, label: &str, total_col: u16, total: Cell) -> u32 {
        let mut cells = vec![Cell::blank(); self.width];
        cells[usize::from(label_col)] = Cell::text(label).bold();
        cells[usize::from(total_col)] = total.bold();
        self.push(cells)
    }

    fn finish(self) -> Sheet {
        Sheet {
            title: self.title,
            rows: self.rows,
        }
    }
}

/// Builds report documents from aggregated buckets.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportBuilder {
    formula_totals: bool,
}

impl ReportBuilder {
    /// Creates a builder that writes totals as plain values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            formula_totals: false,
        }
    }

    /// Writes subtotals and totals as `SUM` cells over the rows they cover.
    #[must_use]
    pub const fn with_formula_totals(mut self, enabled: bool) -> Self {
        self.formula_totals = enabled;
        self
    }

    /// Lays out `aggregation` as a document.
    ///
    /// Totals come from the bucket sums; the written rows are never re-read.
    #[must_use]
    pub fn build(&self, aggregation: &Aggregation, reference_date: NaiveDate) -> ReportDocument {
        let sheets = match aggregation {
            Aggregation::Day(day) => vec![self.day_sheet(day)],
            Aggregation::Week(week) => {
                let title = format!("Week of {}", reference_date.format("%Y-%m-%d"));
                vec![self.week_sheet(title, week)]
            }
            Aggregation::Month(weeks) => weeks
                .iter()
                .map(|week| self.week_sheet(format!("Week {}", week.iso_week()), week))
                .collect(),
        };

        ReportDocument { sheets }
    }

    fn day_sheet(&self, day: &DayBucket) -> Sheet {
        let mut sheet = SheetBuilder::new(day.date.format("%Y-%m-%d").to_string(), &DAY_HEADERS);

        let first = sheet.last_row() + 1;
        for sale in &day.sales {
            sheet.push(vec![
                Cell::text(sale.sale_id.as_str()),
                Cell::text(sale.item_name.as_str()),
                Cell::integer(sale.quantity),
                Cell::decimal(sale.unit_price),
                Cell::decimal(sale.line_total()),
                Cell::text(sale.sale_timestamp.format("%Y-%m-%d %H:%M").to_string()),
            ]);
        }
        let spans = span_from(first, sheet.last_row());

        let total = self.total_cell(DAY_TOTAL_COL, spans, day.subtotal);
        sheet.push_total(DAY_LABEL_COL, TOTAL_LABEL, DAY_TOTAL_COL, total);
        sheet.finish()
    }

    fn week_sheet(&self, title: String, week: &WeekBucket) -> Sheet {
        let mut sheet = SheetBuilder::new(title, &WEEK_HEADERS);
        let mut subtotal_rows = Vec::with_capacity(week.days.len());

        for day in &week.days {
            sheet.push(vec![Cell::text(day.label())]);

            let first = sheet.last_row() + 1;
            for sale in &day.sales {
                sheet.push(week_sale_row(sale));
            }
            let spans = span_from(first, sheet.last_row());

            let subtotal = self.total_cell(WEEK_TOTAL_COL, spans, day.subtotal);
            let row = sheet.push_total(WEEK_LABEL_COL, SUBTOTAL_LABEL, WEEK_TOTAL_COL, subtotal);
            subtotal_rows.push(RowSpan::single(row));
        }

        let total = self.total_cell(WEEK_TOTAL_COL, subtotal_rows, week.subtotal);
        sheet.push_total(WEEK_LABEL_COL, TOTAL_LABEL, WEEK_TOTAL_COL, total);
        sheet.finish()
    }

    fn total_cell(&self, column: u16, spans: Vec<RowSpan>, value: Decimal) -> Cell {
        if self.formula_totals && !spans.is_empty() {
            Cell::sum(SumOf {
                column,
                spans,
                value,
            })
        } else {
            Cell::decimal(value)
        }
    }
}

fn week_sale_row(sale: &SaleFact) -> Vec<Cell> {
    vec![
        Cell::blank(),
        Cell::text(sale.sale_id.as_str()),
        Cell::text(sale.item_name.as_str()),
        Cell::integer(sale.quantity),
        Cell::decimal(sale.unit_price),
        Cell::decimal(sale.line_total()),
    ]
}

/// The rows `first..=last`, or nothing when no row was written.
fn span_from(first: u32, last: u32) -> Vec<RowSpan> {
    if last < first {
        Vec::new()
    } else {
        vec![RowSpan { first, last }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::aggregate::Aggregator;
    use crate::reports::period::ReportPeriod;
    use crate::reports::types::CellValue;
    use crate::sales::SaleId;
    use rust_decimal_macros::dec;
    use stocktally_shared::types::UserId;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sale(id: &str, owner: UserId, on: NaiveDate, qty: u32, price: Decimal) -> SaleFact {
        SaleFact {
            sale_id: SaleId::new(id),
            item_name: format!("item-{id}"),
            quantity: qty,
            unit_price: price,
            sale_timestamp: on.and_hms_opt(9, 15, 0).unwrap(),
            owner,
        }
    }

    fn texts(row: &Row) -> Vec<String> {
        row.cells.iter().map(|c| c.value.display()).collect()
    }

    fn build(period: ReportPeriod, records: &[SaleFact], owner: UserId, on: NaiveDate) -> ReportDocument {
        let agg = Aggregator::aggregate(period, owner, records, on);
        ReportBuilder::new().build(&agg, on)
    }

    #[test]
    fn test_day_sheet_one_sale() {
        let owner = UserId::new();
        let today = date(2024, 1, 15);
        let doc = build(
            ReportPeriod::Day,
            &[sale("2024-0115-0001", owner, today, 3, dec!(10.00))],
            owner,
            today,
        );

        assert_eq!(doc.sheets.len(), 1);
        let sheet = &doc.sheets[0];
        assert_eq!(sheet.title, "2024-01-15");
        assert_eq!(sheet.rows.len(), 3);
        assert_eq!(texts(&sheet.rows[0]), DAY_HEADERS.map(String::from).to_vec());
        assert_eq!(
            texts(&sheet.rows[1]),
            vec!["2024-0115-0001", "item-2024-0115-0001", "3", "10.00", "30.00", "2024-01-15 09:15"]
        );

        let total = &sheet.rows[2];
        assert_eq!(texts(total), vec!["", "TOTAL", "", "", "30.00", ""]);
        assert!(total.cells[1].bold);
        assert!(total.cells[4].bold);
        assert_eq!(total.cells[4].value.amount(), Some(dec!(30.00)));
    }

    #[test]
    fn test_day_sheet_without_sales() {
        let doc = build(ReportPeriod::Day, &[], UserId::new(), date(2024, 1, 15));

        let sheet = &doc.sheets[0];
        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(sheet.rows[1].cells[1].value, CellValue::Text("TOTAL".into()));
        assert_eq!(sheet.rows[1].cells[4].value, CellValue::Decimal(Decimal::ZERO));
    }

    #[test]
    fn test_week_sheet_sections() {
        let owner = UserId::new();
        let records = vec![
            sale("a", owner, date(2024, 1, 15), 2, dec!(5)),
            sale("b", owner, date(2024, 1, 17), 1, dec!(20)),
        ];
        let doc = build(ReportPeriod::Week, &records, owner, date(2024, 1, 17));

        assert_eq!(doc.sheets.len(), 1);
        let sheet = &doc.sheets[0];
        assert_eq!(sheet.title, "Week of 2024-01-17");
        let rendered: Vec<Vec<String>> = sheet.rows.iter().map(texts).collect();
        assert_eq!(
            rendered,
            vec![
                vec!["Date", "ID No.", "Item", "Quantity Sold", "Price", "Total"],
                vec!["Monday, 2024-01-15", "", "", "", "", ""],
                vec!["", "a", "item-a", "2", "5.00", "10.00"],
                vec!["", "", "Subtotal", "", "", "10.00"],
                vec!["Wednesday, 2024-01-17", "", "", "", "", ""],
                vec!["", "b", "item-b", "1", "20.00", "20.00"],
                vec!["", "", "Subtotal", "", "", "20.00"],
                vec!["", "", "TOTAL", "", "", "30.00"],
            ]
        );
        assert!(sheet.rows[3].cells[2].bold && sheet.rows[3].cells[5].bold);
        assert!(sheet.rows[7].cells[2].bold && sheet.rows[7].cells[5].bold);
        assert!(!sheet.rows[2].is_bold());
    }

    #[test]
    fn test_week_without_sales_has_header_and_total() {
        let doc = build(ReportPeriod::Week, &[], UserId::new(), date(2024, 1, 17));
        let sheet = &doc.sheets[0];
        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(texts(&sheet.rows[1]), vec!["", "", "TOTAL", "", "", "0.00"]);
    }

    #[test]
    fn test_month_one_sheet_per_non_empty_week() {
        let owner = UserId::new();
        let records = vec![
            sale("a", owner, date(2024, 1, 2), 1, dec!(1)),
            sale("b", owner, date(2024, 1, 3), 1, dec!(2)),
            sale("c", owner, date(2024, 1, 30), 1, dec!(4)),
        ];
        let doc = build(ReportPeriod::Month, &records, owner, date(2024, 1, 9));

        let titles: Vec<&str> = doc.sheets.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Week 1", "Week 5"]);
        let first_total = doc.sheets[0].rows.last().unwrap();
        assert_eq!(first_total.cells[5].value.amount(), Some(dec!(3)));
        let second_total = doc.sheets[1].rows.last().unwrap();
        assert_eq!(second_total.cells[5].value.amount(), Some(dec!(4)));
    }

    #[test]
    fn test_month_without_sales_has_no_sheets() {
        let doc = build(ReportPeriod::Month, &[], UserId::new(), date(2024, 1, 9));
        assert!(doc.is_empty());
    }

    #[test]
    fn test_formula_totals_reference_written_rows() {
        let owner = UserId::new();
        let records = vec![
            sale("a", owner, date(2024, 1, 15), 2, dec!(5)),
            sale("b", owner, date(2024, 1, 15), 1, dec!(1)),
            sale("c", owner, date(2024, 1, 17), 1, dec!(20)),
        ];
        let on = date(2024, 1, 17);
        let agg = Aggregator::aggregate(ReportPeriod::Week, owner, &records, on);
        let doc = ReportBuilder::new().with_formula_totals(true).build(&agg, on);
        let rows = &doc.sheets[0].rows;

        // 1 header, 2 day, 3-4 sales, 5 subtotal, 6 day, 7 sale, 8 subtotal, 9 total
        let CellValue::Sum(first) = &rows[4].cells[5].value else {
            panic!("expected formula subtotal");
        };
        assert_eq!(first.column, 5);
        assert_eq!(first.spans, vec![RowSpan { first: 3, last: 4 }]);
        assert_eq!(first.value, dec!(11));

        let CellValue::Sum(total) = &rows[8].cells[5].value else {
            panic!("expected formula total");
        };
        assert_eq!(total.spans, vec![RowSpan::single(5), RowSpan::single(8)]);
        assert_eq!(total.value, dec!(31));
    }

    #[test]
    fn test_formula_totals_on_empty_day_fall_back_to_value() {
        let today = date(2024, 1, 15);
        let agg = Aggregator::aggregate(ReportPeriod::Day, UserId::new(), &[], today);
        let doc = ReportBuilder::new().with_formula_totals(true).build(&agg, today);
        assert_eq!(doc.sheets[0].rows[1].cells[4].value, CellValue::Decimal(Decimal::ZERO));
    }
}
