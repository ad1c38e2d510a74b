//! Runtime errors

use thiserror::Error;

use timelab_core::TimeLabError;

#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error(transparent)]
    Engine(#[from] TimeLabError),

    #[error("Cannot read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Logging setup failed: {0}")]
    Logging(String),
}

pub type RuntimeResult<T> = Result<T, RuntimeError>;
