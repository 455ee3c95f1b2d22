//! Pipespace - safe spacing and CAD layout for rows of parallel pipelines
//!
//! This library computes center-to-center clearances between adjacent
//! pipes, lays a row of pipes out along one axis and drafts the result as a
//! DXF document or an SVG preview. Rows are usually loaded from JSON
//! sessions.

pub mod clearance;
pub mod config;
pub mod emit;
pub mod export;
pub mod layout;
pub mod report;
pub mod row;
pub mod session;

mod error;

pub use pipespace_core::{drafting, geometry, lookup, pipe};

pub use error::PipespaceError;

use log::{debug, info, trace};

use pipespace_core::{drafting::CadDocument, lookup::StandardDimensions};

use config::AppConfig;
use emit::Emitter;
use export::{Exporter, dxf, svg::SvgBuilder};
use layout::{LayoutEngine, RowLayout};
use report::Report;
use row::Row;
use session::Session;

/// Builder for laying out and drafting pipe rows.
///
/// This provides an API for processing a row through the layout, emission
/// and export stages. It holds no state besides its configuration and can
/// be reused for any number of rows.
///
/// # Examples
///
/// ```rust,no_run
/// use pipespace::{ArrangementBuilder, config::AppConfig, session::Session};
///
/// let text = std::fs::read_to_string("row.json").expect("Failed to read");
/// let session = Session::from_json(&text).expect("Failed to load session");
///
/// let builder = ArrangementBuilder::new(AppConfig::default());
/// let row = builder.row_from_session(&session);
///
/// let dxf = builder.render_dxf(&row).expect("Failed to render");
/// println!("{}", builder.report(&row).expect("Failed to lay out"));
/// ```
#[derive(Debug, Default)]
pub struct ArrangementBuilder {
    config: AppConfig,
}

impl ArrangementBuilder {
    /// Create a new arrangement builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Resolve a session's pipes against the standard dimension tables.
    pub fn row_from_session(&self, session: &Session) -> Row {
        info!(pipes = session.len(); "Building row from session");
        let row = session.to_row(&StandardDimensions);
        trace!(row:?; "Resolved row");
        row
    }

    /// Lay out a row.
    ///
    /// # Errors
    ///
    /// Returns `PipespaceError::Layout` for rows shorter than two pipes.
    /// A layout with failed pairs is still returned; check
    /// [`RowLayout::is_complete`].
    pub fn layout(&self, row: &Row) -> Result<RowLayout, PipespaceError> {
        let engine =
            LayoutEngine::new().with_reference_margin(self.config.layout().reference_margin());
        Ok(engine.layout(row)?)
    }

    /// Draft a laid-out row.
    ///
    /// # Errors
    ///
    /// Returns `PipespaceError::Export` naming every unresolved pipe, or if
    /// the layout is incomplete.
    pub fn emit(&self, row: &Row, layout: &RowLayout) -> Result<CadDocument, PipespaceError> {
        let emitter = Emitter::new().with_text_height(self.config.drafting().text_height());
        Ok(emitter.emit(layout, row)?)
    }

    /// Render a row to DXF text.
    ///
    /// # Errors
    ///
    /// Returns `PipespaceError` for layout or export errors. No text is
    /// produced unless every required dimension is resolved.
    pub fn render_dxf(&self, row: &Row) -> Result<String, PipespaceError> {
        let doc = self.draft(row)?;
        let text = dxf::to_dxf_string(&doc)?;
        info!(bytes = text.len(); "DXF rendered successfully");
        Ok(text)
    }

    /// Render a row to an SVG preview.
    ///
    /// # Errors
    ///
    /// Returns `PipespaceError` for layout or export errors.
    pub fn render_svg(&self, row: &Row) -> Result<String, PipespaceError> {
        let doc = self.draft(row)?;

        let drafting = self.config.drafting();
        let mut exporter = SvgBuilder::new(Vec::new())
            .with_scale(drafting.preview_scale())
            .with_padding(drafting.preview_padding())
            .with_background(drafting.preview_background())
            .build()?;
        exporter.export_document(&doc)?;

        let svg = String::from_utf8(exporter.into_inner())
            .map_err(|err| export::Error::Render(err.to_string()))?;
        info!("SVG rendered successfully");
        Ok(svg)
    }

    /// Build the per-pipe report for a row.
    ///
    /// # Errors
    ///
    /// Returns `PipespaceError::Layout` for rows shorter than two pipes.
    pub fn report(&self, row: &Row) -> Result<Report, PipespaceError> {
        let layout = self.layout(row)?;
        Ok(report::build_report(row, &layout))
    }

    fn draft(&self, row: &Row) -> Result<CadDocument, PipespaceError> {
        let layout = self.layout(row)?;
        let doc = self.emit(row, &layout)?;
        debug!(entities = doc.len(); "Row drafted");
        Ok(doc)
    }
}
