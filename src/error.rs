use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("LINE API error: {0}")]
    Line(String),
    #[error("request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid request: {0}")]
    Invalid(String),
    #[error("configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// The string shown to the user in the webview. The backend-provided
    /// message is surfaced directly; callers substitute their own fallback
    /// text when they need a friendlier one.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Database(e) => e.to_string(),
            AppError::Http(e) => e.to_string(),
            AppError::Line(m) | AppError::Invalid(m) | AppError::Config(m) => m.clone(),
        }
    }
}
