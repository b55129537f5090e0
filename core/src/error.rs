use thiserror::Error;

/// Failures raised while loading artifacts or running the scoring pipeline.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("query vector has dimension {query} but listing matrix has dimension {matrix}")]
    DimensionMismatch { query: usize, matrix: usize },

    #[error("listing matrix has {rows} rows but dataset has {listings} listings")]
    RowCountMismatch { rows: usize, listings: usize },

    #[error("corrupt model artifacts: {0}")]
    CorruptModel(String),

    #[error("dataset is missing required column '{0}'")]
    MissingColumn(String),

    #[error("row {row}: cannot parse column '{column}' value {value:?} as a number")]
    InvalidNumber { row: usize, column: String, value: String },

    #[error("unknown stemmer language '{0}'")]
    UnknownLanguage(String),
}
