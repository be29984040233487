//! Paginated PDF encoding.
//!
//! Sheets are laid out top to bottom, one text line per row with cells
//! joined by ` | `. Each sheet starts on a fresh page and a page break is
//! inserted whenever the next line would fall below the bottom margin.

use printpdf::{BuiltinFont, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, Point, Pt, TextItem};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use stocktally_shared::config::PdfConfig;
use tracing::{debug, warn};

use crate::reports::error::ReportError;
use crate::reports::types::{ReportDocument, Row};

/// Separator placed between the cells of a row.
pub const CELL_SEPARATOR: &str = " | ";

const DOCUMENT_TITLE: &str = "Sales Report";

/// Windows-1252 characters outside Latin-1 that the builtin fonts can draw.
const WIN_ANSI_EXTRAS: &str = "\u{20AC}\u{201A}\u{0192}\u{201E}\u{2026}\u{2020}\u{2021}\u{02C6}\u{2030}\u{0160}\u{2039}\u{0152}\u{017D}\u{2018}\u{2019}\u{201C}\u{201D}\u{2022}\u{2013}\u{2014}\u{02DC}\u{2122}\u{0161}\u{203A}\u{0153}\u{017E}\u{0178}";

/// One line of text at a fixed height on a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedLine {
    /// Text to draw.
    pub text: String,
    /// Baseline height from the bottom edge, in millimetres.
    pub y_mm: Decimal,
    /// Sheet title line (bold, larger).
    pub is_title: bool,
}

/// Lines of one page, top to bottom.
pub type PageLines = Vec<PlacedLine>;

/// Vertical cursor over the page content area.
struct Paginator<'a> {
    layout: &'a PdfConfig,
    top: Decimal,
    y: Decimal,
    current: PageLines,
    pages: Vec<PageLines>,
}

impl<'a> Paginator<'a> {
    fn new(layout: &'a PdfConfig) -> Result<Self, ReportError> {
        let top = layout.page_height_mm - layout.margin_mm;
        if top <= layout.margin_mm
            || layout.line_height_mm <= Decimal::ZERO
            || layout.title_gap_mm <= Decimal::ZERO
        {
            return Err(ReportError::serialization(
                "page layout leaves no room for content",
            ));
        }
        Ok(Self {
            layout,
            top,
            y: top,
            current: Vec::new(),
            pages: Vec::new(),
        })
    }

    fn place(&mut self, text: String, is_title: bool, advance: Decimal) {
        if self.y < self.layout.margin_mm {
            self.break_page();
        }
        self.current.push(PlacedLine {
            text,
            y_mm: self.y,
            is_title,
        });
        self.y -= advance;
    }

    fn break_page(&mut self) {
        if !self.current.is_empty() {
            self.pages.push(std::mem::take(&mut self.current));
        }
        self.y = self.top;
    }

    fn finish(mut self) -> Vec<PageLines> {
        self.break_page();
        self.pages
    }
}

/// Assigns every title and row of `document` to a page and height.
pub fn paginate(
    document: &ReportDocument,
    layout: &PdfConfig,
) -> Result<Vec<PageLines>, ReportError> {
    let mut paginator = Paginator::new(layout)?;

    for sheet in &document.sheets {
        paginator.place(
            format!("{DOCUMENT_TITLE}: {}", sheet.title),
            true,
            layout.title_gap_mm,
        );
        for row in &sheet.rows {
            paginator.place(row_text(row), false, layout.line_height_mm);
        }
        paginator.break_page();
    }

    Ok(paginator.finish())
}

/// Cells of `row` joined by the separator, blanks as empty strings.
#[must_use]
pub fn row_text(row: &Row) -> String {
    row.cells
        .iter()
        .map(|c| c.value.display())
        .collect::<Vec<_>>()
        .join(CELL_SEPARATOR)
}

/// Returns whether the builtin Helvetica faces can draw `c`.
fn builtin_font_can_draw(c: char) -> bool {
    matches!(c, ' '..='~' | '\u{A0}'..='\u{FF}') || WIN_ANSI_EXTRAS.contains(c)
}

fn check_encodable(plan: &[PageLines]) -> Result<(), ReportError> {
    match plan
        .iter()
        .flatten()
        .find(|line| !line.text.chars().all(builtin_font_can_draw))
    {
        Some(line) => Err(ReportError::serialization(format!(
            "text {:?} cannot be drawn with the builtin PDF font",
            line.text
        ))),
        None => Ok(()),
    }
}

/// Encodes `document` as a PDF.
///
/// A document without sheets yields a single blank page.
///
/// # Errors
///
/// Returns `Serialization` when the layout is degenerate or a line holds
/// characters the builtin fonts cannot draw.
pub fn render(document: &ReportDocument, layout: &PdfConfig) -> Result<Vec<u8>, ReportError> {
    let plan = paginate(document, layout)?;
    check_encodable(&plan)?;

    let mut pages: Vec<PdfPage> = plan
        .iter()
        .map(|lines| page(layout, page_ops(lines, layout)))
        .collect();
    if pages.is_empty() {
        pages.push(page(layout, Vec::new()));
    }
    let page_count = pages.len();

    let mut pdf = PdfDocument::new(DOCUMENT_TITLE);
    pdf.with_pages(pages);
    let mut warnings = Vec::new();
    let bytes = pdf.save(&PdfSaveOptions::default(), &mut warnings);
    for warning in &warnings {
        warn!(?warning, "PDF encoder reported a problem");
    }

    debug!(
        pages = page_count,
        warnings = warnings.len(),
        bytes = bytes.len(),
        "Rendered PDF"
    );
    Ok(bytes)
}

fn page(layout: &PdfConfig, ops: Vec<Op>) -> PdfPage {
    PdfPage::new(mm(layout.page_width_mm), mm(layout.page_height_mm), ops)
}

fn page_ops(lines: &[PlacedLine], layout: &PdfConfig) -> Vec<Op> {
    let mut ops = Vec::with_capacity(lines.len() * 5);
    for line in lines {
        let (font, size) = if line.is_title {
            (BuiltinFont::HelveticaBold, layout.title_font_size_pt)
        } else {
            (BuiltinFont::Helvetica, layout.body_font_size_pt)
        };
        ops.extend([
            Op::StartTextSection,
            Op::SetTextCursor {
                pos: Point::new(mm(layout.margin_mm), mm(line.y_mm)),
            },
            Op::SetFontSizeBuiltinFont {
                size: Pt(to_f32(size)),
                font,
            },
            Op::WriteTextBuiltinFont {
                items: vec![TextItem::Text(line.text.clone())],
                font,
            },
            Op::EndTextSection,
        ]);
    }
    ops
}

/// Layout is computed in decimals; floats appear only at the drawing API.
fn to_f32(value: Decimal) -> f32 {
    value.to_f32().unwrap_or_default()
}

fn mm(value: Decimal) -> Mm {
    Mm(to_f32(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::types::{Cell, Sheet};
    use rust_decimal_macros::dec;

    fn sheet(title: &str, rows: usize) -> Sheet {
        let mut all = vec![Row::new(vec![Cell::text("Date"), Cell::text("Total")])];
        all.extend((0..rows).map(|i| {
            Row::new(vec![Cell::blank(), Cell::decimal(Decimal::from(i))])
        }));
        Sheet {
            title: title.to_string(),
            rows: all,
        }
    }

    #[test]
    fn test_row_text_joins_cells() {
        let row = Row::new(vec![
            Cell::blank(),
            Cell::text("a"),
            Cell::integer(2),
            Cell::decimal(dec!(5)),
        ]);
        assert_eq!(row_text(&row), " | a | 2 | 5.00");
    }

    #[test]
    fn test_single_sheet_fits_one_page() {
        let document = ReportDocument {
            sheets: vec![sheet("2024-01-15", 3)],
        };
        let pages = paginate(&document, &PdfConfig::default()).unwrap();

        assert_eq!(pages.len(), 1);
        let lines = &pages[0];
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0].text, "Sales Report: 2024-01-15");
        assert!(lines[0].is_title);
        // A4: 297 - 20 margin, then a 15 mm title gap and 7 mm rows.
        assert_eq!(lines[0].y_mm, dec!(277));
        assert_eq!(lines[1].y_mm, dec!(262));
        assert_eq!(lines[2].y_mm, dec!(255));
        assert_eq!(lines[1].text, "Date | Total");
    }

    #[test]
    fn test_long_sheet_breaks_pages() {
        // Title plus 41 rows: 35 rows fit under the title on A4.
        let document = ReportDocument {
            sheets: vec![sheet("Week 3", 40)],
        };
        let pages = paginate(&document, &PdfConfig::default()).unwrap();

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].len(), 36);
        assert_eq!(pages[1].len(), 6);
        assert_eq!(pages[1][0].y_mm, dec!(277));
        assert!(pages.iter().flatten().all(|l| l.y_mm >= dec!(20)));
    }

    #[test]
    fn test_each_sheet_starts_a_page() {
        let document = ReportDocument {
            sheets: vec![sheet("Week 1", 1), sheet("Week 2", 1)],
        };
        let pages = paginate(&document, &PdfConfig::default()).unwrap();

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[1][0].text, "Sales Report: Week 2");
    }

    #[test]
    fn test_degenerate_layout_is_rejected() {
        let layout = PdfConfig {
            margin_mm: dec!(150),
            ..PdfConfig::default()
        };
        assert!(matches!(
            paginate(&ReportDocument::default(), &layout),
            Err(ReportError::Serialization(_))
        ));
    }

    #[test]
    fn test_render_produces_pdf() {
        let document = ReportDocument {
            sheets: vec![sheet("2024-01-15", 2)],
        };
        let bytes = render(&document, &PdfConfig::default()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_rejects_text_outside_builtin_font() {
        let mut daily = sheet("2024-01-15", 0);
        daily.rows.push(Row::new(vec![Cell::text("2024-0115-0001"), Cell::text("緑茶")]));
        let document = ReportDocument {
            sheets: vec![daily],
        };

        let result = render(&document, &PdfConfig::default());

        assert!(matches!(result, Err(ReportError::Serialization(msg)) if msg.contains("緑茶")));
    }

    #[test]
    fn test_render_accepts_western_european_text() {
        let mut daily = sheet("2024-01-15", 0);
        daily.rows.push(Row::new(vec![
            Cell::text("Crème brûlée"),
            Cell::text("Café \u{2013} 5 \u{20AC}"),
        ]));
        let document = ReportDocument {
            sheets: vec![daily],
        };

        let bytes = render(&document, &PdfConfig::default()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_empty_document() {
        let bytes = render(&ReportDocument::default(), &PdfConfig::default()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
