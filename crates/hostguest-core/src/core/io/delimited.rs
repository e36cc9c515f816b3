use super::error::RenderError;
use super::number::value_text;
use crate::core::models::record::{Cell, FIELD_NAMES, MeasurementTable};

/// Field delimiter of the flat table.
pub const DELIMITER: u8 = b';';

fn cell_text(cell: Cell<'_>) -> String {
    match cell {
        Cell::Text(text) => text.to_string(),
        Cell::Number(value) => value_text(value),
        Cell::Missing => String::new(),
    }
}

/// Flattens the table into `;`-delimited rows with an `ID` column followed by every field.
pub fn render_delimited(table: &MeasurementTable) -> Result<String, RenderError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(DELIMITER)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    let header = std::iter::once("ID").chain(FIELD_NAMES.iter().copied());
    writer.write_record(header)?;

    for record in table.iter() {
        let row = std::iter::once(record.id.to_string())
            .chain(record.cells().into_iter().map(cell_text));
        writer.write_record(row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| RenderError::Flush(e.to_string()))?;
    Ok(String::from_utf8(bytes)?)
}
