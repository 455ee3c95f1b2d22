//! SVG preview of a drafted document.
//!
//! The preview mirrors the DXF output: the Y axis is flipped so the row
//! stands on its baseline, layers are stroked with their colour index, the
//! centerline layer is dashed with its line type pattern and labels keep
//! their rotation.

use std::io::Write;

use log::{debug, info};
use svg::{Document, node::element as svg_element};

use pipespace_core::{
    drafting::{CadDocument, Entity, EntityKind, Layer},
    geometry::{Bounds, Point},
};

use crate::export::{self, Exporter};

/// Approximate glyph advance as a fraction of the text height.
const GLYPH_ASPECT: f64 = 0.6;
const STROKE_WIDTH: f64 = 1.0;

/// Builder for [`Svg`] exporters.
///
/// # Examples
///
/// ```
/// # use pipespace::export::svg::SvgBuilder;
/// let exporter = SvgBuilder::new(Vec::new())
///     .with_scale(0.5)
///     .with_padding(50.0)
///     .build()
///     .unwrap();
/// ```
pub struct SvgBuilder<W: Write> {
    writer: W,
    scale: f64,
    padding: f64,
    background: String,
}

impl<W: Write> SvgBuilder<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            scale: 0.5,
            padding: 50.0,
            background: "#1e1e1e".to_string(),
        }
    }

    /// Pixels per drawing unit.
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Margin around the drawing, in drawing units.
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_background(mut self, background: impl Into<String>) -> Self {
        self.background = background.into();
        self
    }

    /// # Errors
    ///
    /// Returns [`export::Error::Render`] for a non-positive scale or a
    /// negative padding.
    pub fn build(self) -> Result<Svg<W>, export::Error> {
        if !(self.scale > 0.0) {
            return Err(export::Error::Render(format!(
                "SVG scale must be positive, got {}",
                self.scale
            )));
        }
        if !(self.padding >= 0.0) {
            return Err(export::Error::Render(format!(
                "SVG padding must not be negative, got {}",
                self.padding
            )));
        }
        Ok(Svg {
            writer: self.writer,
            scale: self.scale,
            padding: self.padding,
            background: self.background,
        })
    }
}

/// SVG exporter writing to `W`.
pub struct Svg<W: Write> {
    writer: W,
    scale: f64,
    padding: f64,
    background: String,
}

impl<W: Write> Svg<W> {
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Renders `doc` to an SVG document.
    ///
    /// # Errors
    ///
    /// Returns [`export::Error::Render`] for a document with no entities.
    pub fn render_document(&self, doc: &CadDocument) -> Result<Document, export::Error> {
        let content = doc
            .entities()
            .iter()
            .map(visual_bounds)
            .reduce(|acc, b| acc.merge(&b))
            .ok_or_else(|| export::Error::Render("document has no entities".to_string()))?
            .expand(self.padding);

        let frame = Frame {
            bounds: content,
            scale: self.scale,
        };
        let width = content.width() * self.scale;
        let height = content.height() * self.scale;
        debug!(width, height; "SVG dimensions");

        let background = svg_element::Rectangle::new()
            .set("x", 0)
            .set("y", 0)
            .set("width", width)
            .set("height", height)
            .set("fill", self.background.as_str());

        let mut group = svg_element::Group::new()
            .set("fill", "none")
            .set("stroke-width", STROKE_WIDTH);
        for entity in doc.entities() {
            group = group.add(frame.render_entity(entity));
        }

        Ok(Document::new()
            .set("viewBox", format!("0 0 {width} {height}"))
            .set("width", width)
            .set("height", height)
            .add(background)
            .add(group))
    }
}

impl<W: Write> Exporter for Svg<W> {
    fn export_document(&mut self, doc: &CadDocument) -> Result<(), export::Error> {
        info!(entities = doc.len(); "Writing SVG preview");
        let document = self.render_document(doc)?;
        svg::write(&mut self.writer, &document)?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Maps drawing coordinates onto the Y-down SVG canvas.
struct Frame {
    bounds: Bounds,
    scale: f64,
}

impl Frame {
    fn map(&self, point: Point) -> Point {
        Point::new(
            (point.x() - self.bounds.min_x()) * self.scale,
            (self.bounds.max_y() - point.y()) * self.scale,
        )
    }

    fn render_entity(&self, entity: &Entity) -> Box<dyn svg::Node> {
        let layer = entity.layer();
        let color = aci_color(layer.color_index());

        match entity.kind() {
            EntityKind::Line { start, end } => {
                let (a, b) = (self.map(*start), self.map(*end));
                let mut line = svg_element::Line::new()
                    .set("x1", a.x())
                    .set("y1", a.y())
                    .set("x2", b.x())
                    .set("y2", b.y())
                    .set("stroke", color);
                if let Some(dasharray) = self.dasharray(layer) {
                    line = line.set("stroke-dasharray", dasharray);
                }
                Box::new(line)
            }
            EntityKind::Circle { center, radius } => {
                let c = self.map(*center);
                Box::new(
                    svg_element::Circle::new()
                        .set("cx", c.x())
                        .set("cy", c.y())
                        .set("r", radius * self.scale)
                        .set("stroke", color),
                )
            }
            EntityKind::Arc {
                center,
                radius,
                start_angle,
                end_angle,
            } => {
                let on_arc = |degrees: f64| {
                    let rad = degrees.to_radians();
                    self.map(Point::new(
                        center.x() + radius * rad.cos(),
                        center.y() + radius * rad.sin(),
                    ))
                };
                let (from, to) = (on_arc(*start_angle), on_arc(*end_angle));
                let sweep = (end_angle - start_angle).rem_euclid(360.0);
                let large_arc = u8::from(sweep > 180.0);
                let r = radius * self.scale;
                // Counter-clockwise in drawing space is sweep-flag 1 once Y is flipped.
                let data = format!(
                    "M {} {} A {r} {r} 0 {large_arc} 1 {} {}",
                    from.x(),
                    from.y(),
                    to.x(),
                    to.y()
                );
                Box::new(svg_element::Path::new().set("d", data).set("stroke", color))
            }
            EntityKind::Text {
                position,
                height,
                rotation,
                value,
            } => {
                let p = self.map(*position);
                Box::new(
                    svg_element::Text::new(value.as_str())
                        .set("x", p.x())
                        .set("y", p.y())
                        .set("font-family", "monospace")
                        .set("font-size", height * self.scale)
                        .set("fill", color)
                        .set("stroke", "none")
                        .set("transform", format!("rotate({} {} {})", -rotation, p.x(), p.y())),
                )
            }
        }
    }

    fn dasharray(&self, layer: Layer) -> Option<String> {
        let pattern = layer.line_type().pattern();
        if pattern.is_empty() {
            return None;
        }
        let dashes: Vec<String> = pattern
            .iter()
            .map(|element| (element.abs() * self.scale).to_string())
            .collect();
        Some(dashes.join(","))
    }
}

/// Bounds including an estimate of the label extent.
fn visual_bounds(entity: &Entity) -> Bounds {
    match entity.kind() {
        EntityKind::Text {
            position,
            height,
            rotation,
            value,
        } => {
            let length = value.chars().count() as f64 * height * GLYPH_ASPECT;
            let (sin, cos) = rotation.to_radians().sin_cos();
            let run = Point::new(length * cos, length * sin);
            let rise = Point::new(-height * sin, height * cos);
            let far = position.add_point(run);
            Bounds::from_corners(*position, far)
                .merge(&Bounds::from_corners(position.add_point(rise), far.add_point(rise)))
        }
        kind => kind.bounds(),
    }
}

/// Display colour for an AutoCAD colour index on a dark background.
fn aci_color(index: u8) -> &'static str {
    match index {
        1 => "#ff0000",
        2 => "#ffff00",
        3 => "#00ff00",
        4 => "#00ffff",
        5 => "#0000ff",
        6 => "#ff00ff",
        _ => "#ffffff",
    }
}
