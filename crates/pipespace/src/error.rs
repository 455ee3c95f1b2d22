//! Error types for Pipespace operations.
//!
//! This module provides the main error type [`PipespaceError`] which wraps
//! the error of every processing stage.

use std::io;

use thiserror::Error;

use crate::{export, layout::LayoutError, session::SessionError};

/// The main error type for Pipespace operations.
///
/// # Export Variant
///
/// The `Export` variant keeps the concrete [`export::Error`] so callers can
/// list every unresolved pipe of a refused export individually.
#[derive(Debug, Error)]
pub enum PipespaceError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("Export error: {0}")]
    Export(#[from] export::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}
