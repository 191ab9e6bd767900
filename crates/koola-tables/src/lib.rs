mod aggregate;
mod csv_out;
mod error;
mod header;
mod merge;
mod model;
mod normalize;
mod options;
mod pdf_reader;
mod table_detect;
mod table_parse;
mod warning;
mod xlsx_out;

use std::path::Path;

use crate::csv_out::write_csv;
use crate::pdf_reader::{read_pdf_pages, read_pdf_pages_from_bytes};
use crate::warning::WarningCode;

pub use aggregate::{Aggregation, aggregate, aggregate_with_mode};
pub use error::ExtractError;
pub use model::{Cell, CleanedFrame, ColumnKey, CombinedFrame, PageText, RawTable};
pub use normalize::normalize_table;
pub use options::{DEFAULT_SHEET_NAME, ExtractOptions, HeaderMode, OutputFormat, PageSelection};
pub use table_detect::{LocatedPage, StaticPage, TablePage, TextTableLocator};
pub use warning::{ExtractWarning, WarningCode as ExtractWarningCode};
pub use xlsx_out::{write_xlsx, write_xlsx_to_buffer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionReport {
    pub page_count: usize,
    pub row_count: usize,
    pub table_count: usize,
    pub warnings: Vec<ExtractWarning>,
}

fn validate_options(options: &ExtractOptions) -> Result<(), ExtractError> {
    if options.min_cols < 2 {
        return Err(ExtractError::InvalidOption(
            "min_cols must be at least 2".to_string(),
        ));
    }
    if options.sheet_name.trim().is_empty() {
        return Err(ExtractError::InvalidOption(
            "sheet_name must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn extract_from_pages(
    pages: &[PageText],
    options: &ExtractOptions,
) -> Result<(CombinedFrame, ExtractionReport), ExtractError> {
    let mut warnings = pages
        .iter()
        .filter(|page| page.text.trim().is_empty())
        .map(|page| {
            ExtractWarning::new(WarningCode::PageWithoutText, "no text could be read from page")
                .with_page(page.page_number)
        })
        .collect::<Vec<_>>();

    let locator = TextTableLocator::new(options.min_cols);
    let located = pages
        .iter()
        .map(|page| LocatedPage::new(page, locator))
        .collect::<Vec<_>>();
    let aggregation = aggregate_with_mode(&located, options.header_mode)?;
    warnings.extend(aggregation.warnings);

    let report = ExtractionReport {
        page_count: pages.len(),
        row_count: aggregation.frame.row_count,
        table_count: aggregation.frame.table_count,
        warnings,
    };
    Ok((aggregation.frame, report))
}

/// Reads every selected page of a PDF and combines all of its tables.
///
/// # Errors
///
/// Fails with [`ExtractError::NoTablesFound`] when the document holds no usable table, or
/// with the decoding error when the bytes are not a readable PDF.
pub fn extract_pdf_bytes(
    input_pdf: &[u8],
    options: &ExtractOptions,
) -> Result<(CombinedFrame, ExtractionReport), ExtractError> {
    validate_options(options)?;
    let locator = TextTableLocator::new(options.min_cols);
    let pages = read_pdf_pages_from_bytes(input_pdf, options.pages.as_ref(), &locator)?;
    extract_from_pages(&pages, options)
}

/// Converts an in-memory PDF to an in-memory xlsx workbook.
///
/// # Errors
///
/// See [`extract_pdf_bytes`]; workbook serialization errors are returned as
/// [`ExtractError::Xlsx`].
pub fn extract_pdf_bytes_to_xlsx(
    input_pdf: &[u8],
    options: &ExtractOptions,
) -> Result<(Vec<u8>, ExtractionReport), ExtractError> {
    let (frame, report) = extract_pdf_bytes(input_pdf, options)?;
    let workbook = write_xlsx_to_buffer(&frame, &options.sheet_name)?;
    Ok((workbook, report))
}

/// Converts a PDF file and writes the combined table to `output` in the given format.
///
/// # Errors
///
/// See [`extract_pdf_bytes`]; also fails on I/O errors while reading or writing.
pub fn extract_pdf_to_file(
    input_pdf: &Path,
    output: &Path,
    format: OutputFormat,
    options: &ExtractOptions,
) -> Result<ExtractionReport, ExtractError> {
    validate_options(options)?;
    let locator = TextTableLocator::new(options.min_cols);
    let pages = read_pdf_pages(input_pdf, options.pages.as_ref(), &locator)?;
    let (frame, report) = extract_from_pages(&pages, options)?;
    match format {
        OutputFormat::Xlsx => write_xlsx(output, &frame, &options.sheet_name)?,
        OutputFormat::Csv => write_csv(output, &frame, options.delimiter)?,
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::{ExtractOptions, extract_from_pages, validate_options};
    use crate::error::ExtractError;
    use crate::model::{ColumnKey, PageText};
    use crate::warning::WarningCode;

    #[test]
    fn rejects_min_cols_below_two() {
        let options = ExtractOptions {
            min_cols: 1,
            ..ExtractOptions::default()
        };
        assert!(matches!(
            validate_options(&options),
            Err(ExtractError::InvalidOption(_))
        ));
    }

    #[test]
    fn combines_text_pages_and_flags_blank_ones() {
        let pages = vec![
            PageText {
                page_number: 1,
                text: "Name  Age\nAlice  30\nBob  25".to_string(),
            },
            PageText {
                page_number: 2,
                text: String::new(),
            },
        ];

        let (frame, report) =
            extract_from_pages(&pages, &ExtractOptions::default()).expect("table should be found");
        assert_eq!(
            frame.columns,
            vec![
                ColumnKey::Named("Name".to_string()),
                ColumnKey::Named("Age".to_string())
            ]
        );
        assert_eq!(report.row_count, 2);
        assert_eq!(report.page_count, 2);
        assert_eq!(report.warnings[0].code, WarningCode::PageWithoutText);
        assert_eq!(report.warnings[0].page, Some(2));
    }
}
