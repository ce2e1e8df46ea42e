//! Launcher error type.
//!
//! Two validation failures carry a defined exit code. Everything else is an
//! `Other` error that is reported but leaves the exit status at 0.

use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum LaunchError {
    #[error("Config is missing 'model' parameter")]
    MissingModel,

    #[error("{}: No such model is found", .0.display())]
    ModelNotFound(PathBuf),

    #[error("{0:#}")]
    Other(#[from] anyhow::Error),
}

impl LaunchError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::MissingModel | Self::ModelNotFound(_) => 1,
            Self::Other(_) => 0,
        }
    }
}
