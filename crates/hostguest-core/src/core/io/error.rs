use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV serialization failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("LaTeX rendering failed: {0}")]
    Latex(#[from] std::fmt::Error),

    #[error("Rendered table is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("Failed to finish writing rendered table: {0}")]
    Flush(String),
}
