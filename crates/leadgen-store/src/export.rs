//! Spreadsheet export of the lead collection.
//!
//! The workbook is built in memory; nothing touches the filesystem. The
//! header row comes from the first lead's fields, so a collection whose
//! first lead carries no aggregator flags exports without flag columns.

use leadgen_core::{CellValue, Lead};
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook};

use crate::error::ExportError;

pub const EXPORT_FILE_NAME: &str = "leadsData.xlsx";
pub const SHEET_NAME: &str = "Leads";

const HEADER_FILL: u32 = 0x1F_49_7D;

/// Renders `leads` as an `.xlsx` workbook and returns its bytes.
///
/// # Errors
///
/// - [`ExportError::Empty`] if `leads` is empty.
/// - [`ExportError::TooManyRows`] past the worksheet row limit.
/// - [`ExportError::Xlsx`] if the workbook cannot be assembled.
pub fn render_workbook(leads: &[Lead]) -> Result<Vec<u8>, ExportError> {
    let headers = header_row(leads).ok_or(ExportError::Empty)?;

    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::White)
        .set_background_color(Color::RGB(HEADER_FILL))
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_border(FormatBorder::Thin);
    let cell_format = Format::new()
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter);

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, name) in (0u16..).zip(&headers) {
        sheet.write_string_with_format(0, col, *name, &header_format)?;
    }

    for (idx, lead) in leads.iter().enumerate() {
        let row = u32::try_from(idx + 1).map_err(|_| ExportError::TooManyRows(leads.len()))?;
        for (col, value) in (0u16..).zip(row_values(lead, &headers)) {
            match value {
                Some(CellValue::Text(s)) => {
                    sheet.write_string_with_format(row, col, s, &cell_format)?;
                }
                Some(CellValue::Number(n)) => {
                    sheet.write_number_with_format(row, col, n, &cell_format)?;
                }
                None => {
                    sheet.write_blank(row, col, &cell_format)?;
                }
            }
        }
    }

    sheet.autofit();
    tracing::info!(rows = leads.len(), columns = headers.len(), "rendered lead workbook");
    Ok(workbook.save_to_buffer()?)
}

/// Column names taken from the first lead, or `None` for an empty slice.
fn header_row(leads: &[Lead]) -> Option<Vec<&'static str>> {
    leads
        .first()
        .map(|first| first.columns().into_iter().map(|(key, _)| key).collect())
}

/// One lead's cells in `headers` order; a column the lead lacks is `None`.
fn row_values(lead: &Lead, headers: &[&'static str]) -> Vec<Option<CellValue>> {
    let mut cells = lead.columns();
    headers
        .iter()
        .map(|name| {
            cells
                .iter()
                .position(|(key, _)| key == name)
                .map(|i| cells.swap_remove(i).1)
        })
        .collect()
}
