use std::path::Path;

use rust_xlsxwriter::{Format, FormatBorder, Workbook};

use crate::error::ExtractError;
use crate::model::{ColumnKey, CombinedFrame};

fn build_workbook(frame: &CombinedFrame, sheet_name: &str) -> Result<Workbook, ExtractError> {
    let too_large = || ExtractError::SheetTooLarge {
        rows: frame.rows.len(),
        columns: frame.columns.len(),
    };

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name)?;

    let header_format = Format::new().set_bold().set_border(FormatBorder::Thin);
    for (index, column) in frame.columns.iter().enumerate() {
        let col = u16::try_from(index).map_err(|_| too_large())?;
        match column {
            ColumnKey::Named(name) => {
                worksheet.write_string_with_format(0, col, name, &header_format)?;
            }
            ColumnKey::Position(position) => match u32::try_from(*position) {
                Ok(number) => {
                    worksheet.write_number_with_format(0, col, f64::from(number), &header_format)?;
                }
                Err(_) => {
                    worksheet.write_string_with_format(
                        0,
                        col,
                        position.to_string(),
                        &header_format,
                    )?;
                }
            },
        }
    }

    for (row_index, data_row) in frame.rows.iter().enumerate() {
        let row = u32::try_from(row_index + 1).map_err(|_| too_large())?;
        for (index, value) in data_row.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            let col = u16::try_from(index).map_err(|_| too_large())?;
            worksheet.write_string(row, col, value)?;
        }
    }

    worksheet.autofit();
    Ok(workbook)
}

/// Writes the frame to a single-sheet workbook at `path`.
///
/// # Errors
///
/// Fails when the sheet name is invalid, the frame exceeds worksheet limits, or the file
/// cannot be written.
pub fn write_xlsx(
    path: &Path,
    frame: &CombinedFrame,
    sheet_name: &str,
) -> Result<(), ExtractError> {
    let mut workbook = build_workbook(frame, sheet_name)?;
    workbook.save(path)?;
    Ok(())
}

/// # Errors
///
/// Same as [`write_xlsx`], minus file I/O.
pub fn write_xlsx_to_buffer(
    frame: &CombinedFrame,
    sheet_name: &str,
) -> Result<Vec<u8>, ExtractError> {
    let mut workbook = build_workbook(frame, sheet_name)?;
    Ok(workbook.save_to_buffer()?)
}
