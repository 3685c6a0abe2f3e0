use thiserror::Error;

/// Errors raised while reading and shaping the source tables.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("{file}: missing column '{column}'")]
    MissingColumn { file: String, column: String },

    #[error("{file}, row {row}: '{value}' is not a valid year")]
    InvalidYear {
        file: String,
        row: usize,
        value: String,
    },

    #[error("invalid {field}: '{value}'")]
    InvalidValue { field: String, value: String },

    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("{0}: expected a directory with the five source CSVs or a merged snapshot")]
    NotFound(String),
}
