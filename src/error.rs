//! Engine error type
//!
//! None of these ever reach the host page: the browser backdrop logs them and
//! stays inert.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("no browser window available")]
    NoWindow,
    #[error("canvas element '{0}' not found")]
    CanvasNotFound(String),
    #[error("element '{0}' is not a canvas")]
    NotACanvas(String),
    #[error("2d drawing context unavailable")]
    NoContext,
    #[error("host call failed: {0}")]
    Host(String),
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
    #[error("failed to parse settings: {0}")]
    SettingsParse(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
