use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("issue tracker error: {0}")]
    IssueTracker(String),
    #[error("sitemap error: {0}")]
    Sitemap(String),
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("table error: {0}")]
    Table(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
