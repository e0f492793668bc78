use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("The selector you are trying to scrape for is invalid. Selector: {0}")]
    Selector(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Handoff serialization error: {0}")]
    Handoff(#[from] serde_json::Error),

    #[error("Reqwest Error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Database Error: {0}")]
    Database(#[from] sqlx::Error),
}
