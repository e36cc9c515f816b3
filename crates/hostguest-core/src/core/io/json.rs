use super::error::RenderError;
use crate::core::models::record::MeasurementTable;

/// Renders the table as a pretty-printed JSON object keyed by system id, in table order.
pub fn render_json(table: &MeasurementTable) -> Result<String, RenderError> {
    Ok(serde_json::to_string_pretty(table)?)
}
