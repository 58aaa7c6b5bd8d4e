use anyhow::Context;
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};

use super::{kind::EntryKind, repo_types::Entry};

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Renders entries as a single-sheet workbook held entirely in memory.
/// Columns: label, amount, date. Dates are real date cells (UTC) shown as
/// `yyyy-mm-dd`.
pub fn render_workbook(kind: EntryKind, entries: &[Entry]) -> anyhow::Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let date_fmt = Format::new().set_num_format("yyyy-mm-dd");

    let sheet = workbook.add_worksheet();
    sheet.set_name(kind.title()).context("name worksheet")?;
    sheet.set_column_width(2, 12.0).context("size date column")?;

    for (col, header) in [kind.label_header(), "Amount", "Date"].into_iter().enumerate() {
        sheet
            .write_string_with_format(0, col as u16, header, &bold)
            .context("write header")?;
    }

    for (i, e) in entries.iter().enumerate() {
        let row = (i + 1) as u32;
        let date = ExcelDateTime::from_timestamp(e.date.unix_timestamp())
            .context("convert entry date")?;
        sheet.write_string(row, 0, &e.label).context("write label")?;
        sheet.write_number(row, 1, e.amount).context("write amount")?;
        sheet
            .write_datetime_with_format(row, 2, &date, &date_fmt)
            .context("write date")?;
    }

    workbook.save_to_buffer().context("serialize workbook")
}
