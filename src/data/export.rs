use anyhow::{Context, Result};

use super::model::{DatasetProfile, Table, Value};

// ---------------------------------------------------------------------------
// Filtered-table export
// ---------------------------------------------------------------------------

/// Suggested download name for the filtered table.
pub fn export_file_name(profile: DatasetProfile) -> String {
    format!("filtered_data_{}.csv", profile.key())
}

/// Serialize a table as CSV: header row in column order, no index column.
/// Dates render as ISO-8601, nulls as empty cells.
pub fn to_csv(table: &Table) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(&table.columns)
        .context("writing CSV header")?;

    for row in &table.rows {
        let record: Vec<String> = table
            .columns
            .iter()
            .map(|col| row.get(col).unwrap_or(&Value::Null).to_string())
            .collect();
        writer.write_record(&record).context("writing CSV row")?;
    }

    let bytes = writer.into_inner().context("flushing CSV writer")?;
    String::from_utf8(bytes).context("CSV output is not UTF-8")
}
