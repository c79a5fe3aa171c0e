use std::result::Result as StdResult;

use thiserror::Error;

/// Convenient result type for the engine crate.
pub type Result<T> = StdResult<T, Error>;

/// Unified error type for the hookbind engine.
#[derive(Debug, Error)]
pub enum Error {
    /// Errors originating from the definition layer.
    #[error("Definition error: {0}")]
    Def(#[from] hookdef::Error),
}
