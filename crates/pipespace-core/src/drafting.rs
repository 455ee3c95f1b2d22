//! Drafting model for CAD interchange output.
//!
//! This module holds the format-neutral description of a drawing: the fixed
//! layer table, line types, and the closed set of entities a pipe
//! arrangement is drawn with. Serializers in the `pipespace` crate turn a
//! [`CadDocument`] into DXF or an SVG preview.
//!
//! # Overview
//!
//! - [`Layer`]: The six fixed layers, each with a colour index and line type
//! - [`LineType`]: Solid and dash-dot centerline styles
//! - [`EntityKind`]: Line, circle, arc and text geometry
//! - [`Entity`]: An entity tagged with its layer
//! - [`CadDocument`]: Ordered, append-only entity list plus the fixed header

mod document;
mod entity;
mod layer;

pub use document::{CadDocument, Header};
pub use entity::{Entity, EntityKind};
pub use layer::{Layer, LineType};
