use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetricsError {
    /// The grouping key could not be resolved under any known alias.
    #[error("Missing required column: {field} (expected one of: {aliases})")]
    MissingRequiredColumn {
        field: &'static str,
        aliases: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MetricsError>;
