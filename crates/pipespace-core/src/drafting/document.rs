//! The CAD document container.

use log::trace;

use crate::drafting::{Entity, EntityKind, Layer};

/// Fixed drawing header: format version and metric millimetre units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    version: &'static str,
    metric: bool,
    insertion_units: u8,
    angle_units: u8,
}

impl Header {
    /// R12 interchange version identifier.
    pub fn version(&self) -> &'static str {
        self.version
    }

    /// `true` for metric drawings.
    pub fn metric(&self) -> bool {
        self.metric
    }

    /// Insertion unit code; 4 is millimetres.
    pub fn insertion_units(&self) -> u8 {
        self.insertion_units
    }

    /// Angle unit code; 0 is decimal degrees.
    pub fn angle_units(&self) -> u8 {
        self.angle_units
    }
}

impl Default for Header {
    fn default() -> Self {
        Self {
            version: "AC1009",
            metric: true,
            insertion_units: 4,
            angle_units: 0,
        }
    }
}

/// An ordered, append-only list of drawing entities.
///
/// Circles and arcs with a zero or negative radius are dropped on insertion
/// so the document never holds degenerate geometry.
///
/// # Example
///
/// ```
/// # use pipespace_core::drafting::{CadDocument, EntityKind, Layer};
/// # use pipespace_core::geometry::Point;
/// let mut doc = CadDocument::new();
/// doc.push(Layer::Pipe, EntityKind::Circle { center: Point::new(0.0, 0.0), radius: 84.0 });
/// doc.push(Layer::PipeInsulation, EntityKind::Circle { center: Point::new(0.0, 0.0), radius: 0.0 });
/// assert_eq!(doc.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CadDocument {
    header: Header,
    entities: Vec<Entity>,
}

impl CadDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entity, returning `false` if it was suppressed as degenerate.
    pub fn push(&mut self, layer: Layer, kind: EntityKind) -> bool {
        if kind.is_degenerate() {
            trace!(layer = layer.name(), kind:?; "Suppressed degenerate entity");
            return false;
        }
        self.entities.push(Entity::new(layer, kind));
        true
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    /// The fixed layer table.
    pub fn layers(&self) -> &'static [Layer] {
        &Layer::ALL
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    #[test]
    fn test_header_defaults_to_metric_millimetres() {
        let header = Header::default();
        assert_eq!(header.version(), "AC1009");
        assert!(header.metric());
        assert_eq!(header.insertion_units(), 4);
        assert_eq!(header.angle_units(), 0);
    }

    #[test]
    fn test_push_keeps_order() {
        let mut doc = CadDocument::new();
        let origin = Point::new(0.0, 0.0);
        doc.push(
            Layer::Pipe,
            EntityKind::Line {
                start: origin,
                end: Point::new(10.0, 0.0),
            },
        );
        doc.push(Layer::Centerline, EntityKind::Circle { center: origin, radius: 2.0 });

        let layers: Vec<_> = doc.entities().iter().map(|e| e.layer()).collect();
        assert_eq!(layers, vec![Layer::Pipe, Layer::Centerline]);
    }

    #[test]
    fn test_push_suppresses_degenerate_arc() {
        let mut doc = CadDocument::new();
        let pushed = doc.push(
            Layer::Pipe,
            EntityKind::Arc {
                center: Point::new(0.0, 0.0),
                radius: 0.0,
                start_angle: 90.0,
                end_angle: 270.0,
            },
        );
        assert!(!pushed);
        assert!(doc.is_empty());
    }
}
