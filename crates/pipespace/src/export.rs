//! Export of drafted documents.
//!
//! This module provides the [`Exporter`] trait that turns a [`CadDocument`]
//! into an output format. It is the final stage of the Pipespace pipeline.
//!
//! # Pipeline Position
//!
//! ```text
//! Row
//!     ↓ layout
//! RowLayout
//!     ↓ emit
//! CadDocument
//!     ↓ export (this module)
//! Output File
//! ```
//!
//! # Available Backends
//!
//! - [`dxf`]: DXF R12 text via [`dxf::DxfWriter`]
//! - [`svg`]: SVG preview via [`svg::SvgBuilder`]
//!
//! # Error Handling
//!
//! Export operations return [`Error`]. A document is never produced for a
//! row with unresolved dimensions, so [`Error::Unresolved`] is raised before
//! any byte is written.

pub mod dxf;
pub mod svg;

use std::fmt;

use pipespace_core::{MissingDimension, drafting::CadDocument};

use crate::layout::LayoutError;

/// Abstraction for document export backends.
pub trait Exporter {
    /// Exports a drafted document to the backend's output format.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if the document cannot be converted to the
    /// target format, or [`Error::Io`] if writing the output fails.
    fn export_document(&mut self, doc: &CadDocument) -> Result<(), Error>;
}

/// A pipe that blocks export, with its 1-based row position.
#[derive(Debug, Clone, PartialEq)]
pub struct UnresolvedPipe {
    position: usize,
    missing: MissingDimension,
}

impl UnresolvedPipe {
    pub fn new(position: usize, missing: MissingDimension) -> Self {
        Self { position, missing }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn missing(&self) -> &MissingDimension {
        &self.missing
    }
}

impl fmt::Display for UnresolvedPipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pipe {}: {}", self.position, self.missing)
    }
}

/// Errors that can occur while drafting or exporting a document.
#[derive(Debug)]
pub enum Error {
    /// One or more pipes lack a dimension the current mode needs.
    Unresolved(Vec<UnresolvedPipe>),
    /// The layout has no envelope spacing.
    Incomplete(LayoutError),
    /// A rendering or conversion failure described by `message`.
    Render(String),
    /// An I/O error encountered while writing output.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unresolved(pipes) => {
                write!(f, "cannot export, {} pipe(s) unresolved", pipes.len())?;
                for pipe in pipes {
                    write!(f, "; {pipe}")?;
                }
                Ok(())
            }
            Self::Incomplete(err) => write!(f, "cannot export, {err}"),
            Self::Render(msg) => write!(f, "Render error: {msg}"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Unresolved(_) | Self::Render(_) => None,
            Self::Incomplete(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}
