//! CAD document emission.
//!
//! [`Emitter`] turns a [`RowLayout`] and the [`Row`] it was derived from
//! into a [`CadDocument`]. Entities are pushed in a fixed order: the shared
//! baseline, then per pipe in row order the body circle, the two
//! flow-direction arcs, the insulation circle, the flange circles (pipe-to-flange
//! mode only), the centerline and the label.

use log::{debug, info};

use pipespace_core::{
    ClearanceMode, PipeDescriptor,
    drafting::{CadDocument, EntityKind, Layer},
    geometry::Point,
};

use crate::{
    export::{Error, UnresolvedPipe},
    layout::RowLayout,
    row::Row,
};

/// Default label height in drawing units.
pub const DEFAULT_TEXT_HEIGHT: f64 = 15.0;

/// Labels read bottom-to-top along the centerline.
const LABEL_ROTATION: f64 = 90.0;

/// Builds drafting documents from laid-out rows.
#[derive(Debug, Clone, Copy)]
pub struct Emitter {
    text_height: f64,
}

impl Default for Emitter {
    fn default() -> Self {
        Self {
            text_height: DEFAULT_TEXT_HEIGHT,
        }
    }
}

impl Emitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text_height(mut self, text_height: f64) -> Self {
        self.text_height = text_height;
        self
    }

    /// Emits the document for `row` using its precomputed `layout`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unresolved`] listing every pipe that lacks a
    /// dimension required by the row's mode, and [`Error::Incomplete`] if the
    /// layout withheld its envelope spacing. Returns [`Error::Render`] if
    /// `layout` was not computed from a row of the same length and mode.
    /// Nothing is emitted in any of these cases.
    pub fn emit(&self, layout: &RowLayout, row: &Row) -> Result<CadDocument, Error> {
        let mode = row.mode();
        if layout.pipes().len() != row.len() {
            return Err(Error::Render(format!(
                "layout has {} pipes but the row has {}",
                layout.pipes().len(),
                row.len()
            )));
        }
        if layout.mode() != mode {
            return Err(Error::Render(format!(
                "layout was computed for {} but the row uses {}",
                layout.mode(),
                mode
            )));
        }
        let unresolved: Vec<UnresolvedPipe> = row
            .pipes()
            .iter()
            .enumerate()
            .filter_map(|(i, pipe)| {
                pipe.require_for(mode)
                    .err()
                    .map(|missing| UnresolvedPipe::new(i + 1, missing))
            })
            .collect();
        if !unresolved.is_empty() {
            return Err(Error::Unresolved(unresolved));
        }

        let envelope = layout.envelope_spacing().map_err(Error::Incomplete)?;
        let reference_y = layout.reference_line_y();

        info!(pipes = row.len(), mode = mode.code(); "Emitting CAD document");

        let mut doc = CadDocument::new();
        doc.push(
            Layer::Pipe,
            EntityKind::Line {
                start: Point::new(0.0, 0.0),
                end: Point::new(envelope, 0.0),
            },
        );

        for (pipe, placed) in row.pipes().iter().zip(layout.pipes()) {
            let center = placed.center().ok_or_else(|| {
                Error::Render(format!("pipe `{}` has no position", pipe.name()))
            })?;
            self.emit_pipe(&mut doc, pipe, center, mode, reference_y);
        }

        debug!(entities = doc.len(); "CAD document emitted");
        Ok(doc)
    }

    fn emit_pipe(
        &self,
        doc: &mut CadDocument,
        pipe: &PipeDescriptor,
        center: Point,
        mode: ClearanceMode,
        reference_y: f64,
    ) {
        let radius = pipe.radius().unwrap_or_default();
        let quarter = radius / 2.0;

        doc.push(Layer::Pipe, EntityKind::Circle { center, radius });
        doc.push(
            Layer::Pipe,
            EntityKind::Arc {
                center: center.add_point(Point::new(0.0, quarter)),
                radius: quarter,
                start_angle: 90.0,
                end_angle: 270.0,
            },
        );
        doc.push(
            Layer::Pipe,
            EntityKind::Arc {
                center: center.add_point(Point::new(0.0, -quarter)),
                radius: quarter,
                start_angle: 270.0,
                end_angle: 90.0,
            },
        );

        if pipe.insulation() > 0.0 {
            doc.push(
                Layer::PipeInsulation,
                EntityKind::Circle {
                    center,
                    radius: radius + pipe.insulation(),
                },
            );
        }

        if mode.uses_flanges() {
            let flange = pipe.flange();
            if let Some(flange_od) = flange.outer_diameter() {
                let flange_radius = flange_od / 2.0;
                doc.push(
                    Layer::Flange,
                    EntityKind::Circle {
                        center,
                        radius: flange_radius,
                    },
                );
                if flange.insulation() > 0.0 {
                    doc.push(
                        Layer::FlangeInsulation,
                        EntityKind::Circle {
                            center,
                            radius: flange_radius + flange.insulation(),
                        },
                    );
                }
            }
        }

        let top = center.with_y(reference_y);
        doc.push(Layer::Centerline, EntityKind::Line { start: center, end: top });
        doc.push(
            Layer::Text,
            EntityKind::Text {
                position: top,
                height: self.text_height,
                rotation: LABEL_ROTATION,
                value: sanitize_label(pipe.name()),
            },
        );
    }
}

/// Replaces control characters, which would break line-based output formats.
fn sanitize_label(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}


#[cfg(test)]
mod proptest_tests {
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    use super::*;
    use crate::{clearance::round_up, layout::layout};

    /// The baseline length matches the envelope re-derived from the inputs.
    fn check_baseline_matches_inputs(
        pipes: Vec<(f64, f64)>,
        gap: f64,
    ) -> Result<(), TestCaseError> {
        let descriptors: Vec<PipeDescriptor> = pipes
            .iter()
            .map(|&(od, ins)| PipeDescriptor::new("p", od).with_insulation(ins))
            .collect();
        let row = Row::new(descriptors, gap, ClearanceMode::PipeToPipe);
        let doc = Emitter::new().emit(&layout(&row).unwrap(), &row).unwrap();

        let EntityKind::Line { end, .. } = doc.entities()[0].kind() else {
            return Err(TestCaseError::fail("first entity is not the baseline"));
        };

        let body = |(od, ins): (f64, f64)| od / 2.0 + ins;
        let pairs: f64 = pipes
            .windows(2)
            .map(|w| round_up(body(w[0]) + body(w[1]) + gap))
            .sum();
        let expected = pairs + body(pipes[0]) + body(pipes[pipes.len() - 1]);

        prop_assert!(approx_eq!(f64, end.x(), expected, epsilon = 1e-6));
        Ok(())
    }

    proptest! {
        #[test]
        fn baseline_matches_inputs(
            pipes in proptest::collection::vec((1.0f64..1200.0, 0.0f64..200.0), 2..12),
            gap in 0.0f64..500.0,
        ) {
            check_baseline_matches_inputs(pipes, gap)?;
        }
    }
}
