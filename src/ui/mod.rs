/// UI layer: filter side panel, top bar and the chart renderer. Everything
/// here consumes prepared pipeline results; no filtering or aggregation
/// happens in widget code.
pub mod charts;
pub mod panels;

use crate::data::model::Value;

/// Widget label for a cell value; nulls render as a visible placeholder
/// instead of an empty string.
pub fn value_label(value: &Value) -> String {
    if value.is_null() {
        "(missing)".to_string()
    } else {
        value.to_string()
    }
}
