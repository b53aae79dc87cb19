//! Error types for the Trackline application.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur running the roster pipeline.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Grid(#[from] trackline_grid::GridError),

    #[error(transparent)]
    Core(#[from] trackline_core::CoreError),

    #[error("config file not found: {0}")]
    MissingConfig(PathBuf),

    #[error("invalid config: {0}")]
    InvalidConfig(#[from] toml::de::Error),

    #[error("roster sheet is empty: {0}")]
    EmptySheet(PathBuf),
}

pub type Result<T> = std::result::Result<T, AppError>;
