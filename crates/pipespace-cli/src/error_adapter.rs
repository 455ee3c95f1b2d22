//! Error adapter for converting PipespaceError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.
//!
//! # Multi-Error Support
//!
//! When an export is refused because several pipes have unresolved
//! dimensions, each pipe is reported independently.

use std::fmt;

use miette::Diagnostic as MietteDiagnostic;

use pipespace::{
    PipespaceError, export,
    lookup::{DimensionLookup, StandardDimensions},
    pipe::DimensionKind,
};

/// Adapter for a single pipe that blocks export.
pub struct UnresolvedAdapter<'a>(pub &'a export::UnresolvedPipe);

impl fmt::Debug for UnresolvedAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for UnresolvedAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Export failed: {}", self.0)
    }
}

impl std::error::Error for UnresolvedAdapter<'_> {}

impl MietteDiagnostic for UnresolvedAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new("pipespace::export::unresolved"))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(suggestion(self.0)))
    }
}

/// Help text pointing at sizes or classes the standard tables do cover.
fn suggestion(pipe: &export::UnresolvedPipe) -> String {
    let table = StandardDimensions;
    let missing = pipe.missing();
    let Some(nominal) = missing.nominal() else {
        return format!("Set a size and class for Pipe {}", pipe.position());
    };

    match missing.dimension() {
        DimensionKind::PipeOuterDiameter => {
            let sizes: Vec<f64> = table.sizes().collect();
            match (sizes.first(), sizes.last()) {
                (Some(min), Some(max)) => format!(
                    "NPS {}\" is not a standard pipe size; select a size from {min} to {max}",
                    nominal.size()
                ),
                _ => format!("NPS {}\" is not a standard pipe size", nominal.size()),
            }
        }
        DimensionKind::FlangeOuterDiameter => {
            let classes: Vec<String> = table
                .classes()
                .map(|class| class.to_string())
                .filter(|class| table.flange_outer_diameter(class, nominal.size()).is_some())
                .collect();
            if classes.is_empty() {
                format!(
                    "No standard flange exists for NPS {}\"; select another size",
                    nominal.size()
                )
            } else {
                format!(
                    "NPS {}\" flanges are available in Class {}",
                    nominal.size(),
                    classes.join(", ")
                )
            }
        }
    }
}

/// Adapter for [`PipespaceError`] variants without per-pipe detail.
pub struct ErrorAdapter<'a>(pub &'a PipespaceError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            PipespaceError::Io(_) => "pipespace::io",
            PipespaceError::Session(_) => "pipespace::session",
            PipespaceError::Layout(_) => "pipespace::layout",
            PipespaceError::Export(_) => "pipespace::export",
            PipespaceError::Config(_) => "pipespace::config",
        };
        Some(Box::new(code))
    }
}

/// A reportable error that can be rendered by miette.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// One pipe with an unresolved dimension.
    Unresolved(UnresolvedAdapter<'a>),
    /// Any other error.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Unresolved(u) => fmt::Display::fmt(u, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Unresolved(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Unresolved(u) => u.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Unresolved(u) => u.help(),
            Reportable::Error(e) => e.help(),
        }
    }
}

/// Convert a [`PipespaceError`] into a list of reportable errors.
///
/// A refused export yields one [`Reportable`] per unresolved pipe. Other
/// errors yield a single [`Reportable`].
pub fn to_reportables(err: &PipespaceError) -> Vec<Reportable<'_>> {
    match err {
        PipespaceError::Export(export::Error::Unresolved(pipes)) => pipes
            .iter()
            .map(|pipe| Reportable::Unresolved(UnresolvedAdapter(pipe)))
            .collect(),
        _ => vec![Reportable::Error(ErrorAdapter(err))],
    }
}
