//! Pipespace CLI library
//!
//! This module contains the core CLI logic for the Pipespace spacing tool.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::fs;

use log::info;

use pipespace::{ArrangementBuilder, PipespaceError, session::Session};

/// Run the Pipespace CLI application
///
/// This function loads the session file, applies the command-line
/// overrides, and writes the DXF drawing plus any requested extras.
/// Every output is rendered before the first file is written, so a failed
/// export leaves no output files behind.
///
/// # Errors
///
/// Returns `PipespaceError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Malformed sessions
/// - Layout errors
/// - Export errors, naming every unresolved pipe
pub fn run(args: &Args) -> Result<(), PipespaceError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing session"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let text = fs::read_to_string(&args.input)?;
    let mut session = Session::from_json(&text)?;
    if let Some(gap) = args.gap {
        session = session.with_gap(gap);
    }
    if let Some(mode) = args.mode {
        session = session.with_mode(mode);
    }

    let builder = ArrangementBuilder::new(app_config);
    let row = builder.row_from_session(&session);

    let report = if args.report {
        Some(builder.report(&row)?)
    } else {
        None
    };
    let dxf = builder.render_dxf(&row)?;
    let svg = match &args.svg {
        Some(_) => Some(builder.render_svg(&row)?),
        None => None,
    };
    let saved_session = match &args.save_session {
        Some(_) => Some(session.to_json_pretty()?),
        None => None,
    };

    if let Some(report) = report {
        println!("{report}");
    }

    fs::write(&args.output, dxf)?;
    info!(output_file = args.output; "DXF exported successfully");

    if let (Some(path), Some(svg)) = (&args.svg, svg) {
        fs::write(path, svg)?;
        info!(output_file = path; "SVG preview exported successfully");
    }

    if let (Some(path), Some(saved)) = (&args.save_session, saved_session) {
        fs::write(path, saved)?;
        info!(output_file = path; "Session saved");
    }

    Ok(())
}
