//! Drawing entities.

use crate::{
    drafting::Layer,
    geometry::{Bounds, Point},
};

/// Geometry of a single drawing entity.
///
/// Angles are degrees, counter-clockwise from +X.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityKind {
    Line {
        start: Point,
        end: Point,
    },
    Circle {
        center: Point,
        radius: f64,
    },
    /// Counter-clockwise arc from `start_angle` to `end_angle`.
    Arc {
        center: Point,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
    },
    Text {
        position: Point,
        height: f64,
        rotation: f64,
        value: String,
    },
}

impl EntityKind {
    /// Returns `true` for circles and arcs whose radius is zero or negative.
    pub fn is_degenerate(&self) -> bool {
        match self {
            Self::Circle { radius, .. } | Self::Arc { radius, .. } => !(*radius > 0.0),
            Self::Line { .. } | Self::Text { .. } => false,
        }
    }

    /// Approximate extent of the entity. Text contributes its insertion point.
    pub fn bounds(&self) -> Bounds {
        match self {
            Self::Line { start, end } => Bounds::from_corners(*start, *end),
            Self::Circle { center, radius } | Self::Arc { center, radius, .. } => {
                Bounds::around_circle(*center, *radius)
            }
            Self::Text { position, .. } => Bounds::from_corners(*position, *position),
        }
    }
}

/// An entity tagged with the layer it is drawn on.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    layer: Layer,
    kind: EntityKind,
}

impl Entity {
    pub fn new(layer: Layer, kind: EntityKind) -> Self {
        Self { layer, kind }
    }

    pub fn layer(&self) -> Layer {
        self.layer
    }

    pub fn kind(&self) -> &EntityKind {
        &self.kind
    }
}
