use thiserror::Error;

/// Failures surfaced by the data pipeline. Every variant is recovered at the
/// boundary of the component that detects it and shown as an informational
/// message; nothing here aborts the session.
#[derive(Debug, Error)]
pub enum DataError {
    /// The expected file exists at none of the candidate locations. The
    /// message tells the user how to fix it.
    #[error("{0}")]
    NotFound(String),

    /// The input could not be parsed as delimited tabular data.
    #[error("could not parse '{name}': {reason}")]
    ParseError { name: String, reason: String },

    /// An expected column is absent; only the dependent feature is disabled.
    #[error("column '{0}' not available in this dataset")]
    MissingColumn(String),

    /// A chart's prerequisites are not met (e.g. too few numeric columns).
    #[error("{0}")]
    InsufficientData(String),
}
