use thiserror::Error;

/// Reasons a results file cannot be turned into a dataset. `load_file`
/// reports every failure under a "dataset unavailable: <path>" context.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("unsupported file extension .{0}")]
    UnsupportedFormat(String),

    #[error("sheet '{sheet}' not found (available: {available})")]
    MissingSheet { sheet: String, available: String },

    #[error("sheet '{0}' has no header row")]
    EmptySheet(String),

    #[error("required column '{0}' is missing")]
    MissingColumn(String),

    #[error("row {row} has {found} cells but the header has {expected}")]
    RaggedRow {
        row: usize,
        found: usize,
        expected: usize,
    },
}
