//! Spreadsheet export.

mod excel;

pub use excel::{default_file_name, write_workbook, write_workbook_to_buffer, DETAIL_SHEET, SUMMARY_SHEET};
