use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Failures that abort a single load or render request.
///
/// "Nothing found" situations (empty directory, team without rows, filters
/// matching nothing) are never reported through this type.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AnalysisError {
    #[error("failed to read workbook {path}: {source}")]
    Workbook {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("sheet '{sheet}' not found in {path}")]
    MissingSheet { path: PathBuf, sheet: String },

    #[error("missing column '{column}'")]
    MissingColumn { column: String },

    #[error("invalid value '{value}' in column '{column}' at row {row}")]
    InvalidCell {
        column: String,
        row: usize,
        value: String,
    },

    #[error("export failed: {0}")]
    Export(#[from] rust_xlsxwriter::XlsxError),
}

impl AnalysisError {
    pub fn missing_column(column: &str) -> Self {
        Self::MissingColumn {
            column: column.to_string(),
        }
    }

    /// True for errors caused by an incompatible source file rather than I/O.
    pub fn is_schema_mismatch(&self) -> bool {
        matches!(
            self,
            Self::MissingColumn { .. } | Self::InvalidCell { .. } | Self::MissingSheet { .. }
        )
    }
}
