use std::path::Path;

use csv::WriterBuilder;

use crate::error::ExtractError;
use crate::model::CombinedFrame;

pub(crate) fn write_csv(
    path: &Path,
    frame: &CombinedFrame,
    delimiter: u8,
) -> Result<(), ExtractError> {
    let mut writer = WriterBuilder::new().delimiter(delimiter).from_path(path)?;
    writer.write_record(frame.header_labels())?;
    for row in &frame.rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}
