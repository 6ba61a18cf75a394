use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read trace file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse trace file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid trace structure: {0}")]
    InvalidStructure(String),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),
}

pub type Result<T> = std::result::Result<T, Error>;
