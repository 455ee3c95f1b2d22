//! Row layout: absolute positions for every pipe in a row.
//!
//! The engine walks adjacent pairs in row order, asks the
//! [`clearance`](crate::clearance) calculator for each distance and
//! accumulates a horizontal cursor. The first pipe sits one radius from the
//! origin so its body does not cross `x = 0`.
//!
//! # Pipeline Position
//!
//! ```text
//! Session / form attributes
//!     ↓ resolve (dimension lookup)
//! Row
//!     ↓ layout (this module)
//! RowLayout
//!     ↓ emit
//! CadDocument
//!     ↓ export
//! DXF / SVG
//! ```
//!
//! # Failure Policy
//!
//! A pair whose clearance cannot be computed is recorded as a failed
//! [`PairClearance`] and layout continues with the remaining pairs. Pipes
//! after a failed pair have no horizontal position, and the envelope
//! spacing is withheld ([`LayoutStatus::Incomplete`]).

use std::fmt;

use log::{debug, info, trace, warn};
use thiserror::Error;

use pipespace_core::{ClearanceMode, geometry::Point};

use crate::{
    clearance::{ClearanceError, clearance},
    row::Row,
};

/// Default clearance between the tallest feature and the reference line.
pub const DEFAULT_REFERENCE_MARGIN: f64 = 100.0;

/// Row-level layout errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("a row needs at least 2 pipes, got {count}")]
    InsufficientPipes { count: usize },

    #[error("spacing incomplete, clearance could not be computed for {}", PairList(.failed_pairs))]
    Incomplete { failed_pairs: Vec<usize> },
}

/// Formats pair indices as 1-based `Pipe i - Pipe j` ranges.
struct PairList<'a>(&'a [usize]);

impl fmt::Display for PairList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (n, first) in self.0.iter().enumerate() {
            if n > 0 {
                f.write_str(", ")?;
            }
            write!(f, "Pipe {} - Pipe {}", first + 1, first + 2)?;
        }
        Ok(())
    }
}

/// Position of one pipe.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlacedPipe {
    x: Option<f64>,
    y: Option<f64>,
}

impl PlacedPipe {
    /// Horizontal center, unknown after a failed pair.
    pub fn x(&self) -> Option<f64> {
        self.x
    }

    /// Vertical center, unknown if the pipe diameter is unresolved.
    pub fn y(&self) -> Option<f64> {
        self.y
    }

    pub fn center(&self) -> Option<Point> {
        Some(Point::new(self.x?, self.y?))
    }
}

/// Clearance between pipe `first` and pipe `first + 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct PairClearance {
    first: usize,
    outcome: Result<f64, ClearanceError>,
}

impl PairClearance {
    /// Zero-based index of the first pipe of the pair.
    pub fn first(&self) -> usize {
        self.first
    }

    /// Zero-based index of the second pipe of the pair.
    pub fn second(&self) -> usize {
        self.first + 1
    }

    pub fn outcome(&self) -> &Result<f64, ClearanceError> {
        &self.outcome
    }

    pub fn distance(&self) -> Option<f64> {
        self.outcome.as_ref().ok().copied()
    }

    pub fn error(&self) -> Option<&ClearanceError> {
        self.outcome.as_ref().err()
    }
}

/// Whether every pairwise clearance succeeded.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutStatus {
    Complete { envelope_spacing: f64 },
    Incomplete { failed_pairs: Vec<usize> },
}

/// The derived layout of a [`Row`].
#[derive(Debug, Clone, PartialEq)]
pub struct RowLayout {
    mode: ClearanceMode,
    pipes: Vec<PlacedPipe>,
    pairs: Vec<PairClearance>,
    reference_line_y: f64,
    status: LayoutStatus,
}

impl RowLayout {
    pub fn mode(&self) -> ClearanceMode {
        self.mode
    }

    /// Positions in row order.
    pub fn pipes(&self) -> &[PlacedPipe] {
        &self.pipes
    }

    /// Pairwise clearances in row order; one fewer than pipes.
    pub fn pairs(&self) -> &[PairClearance] {
        &self.pairs
    }

    /// Clearance from pipe `index` to the next pipe, `None` for the last pipe.
    pub fn forward(&self, index: usize) -> Option<&PairClearance> {
        self.pairs.get(index)
    }

    /// Shared height of every centerline top and label.
    pub fn reference_line_y(&self) -> f64 {
        self.reference_line_y
    }

    pub fn status(&self) -> &LayoutStatus {
        &self.status
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.status, LayoutStatus::Complete { .. })
    }

    /// Outer-to-outer span of the insulated end pipes.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Incomplete`] if any pairwise clearance failed.
    pub fn envelope_spacing(&self) -> Result<f64, LayoutError> {
        match &self.status {
            LayoutStatus::Complete { envelope_spacing } => Ok(*envelope_spacing),
            LayoutStatus::Incomplete { failed_pairs } => Err(LayoutError::Incomplete {
                failed_pairs: failed_pairs.clone(),
            }),
        }
    }
}

/// Row layout engine.
///
/// # Examples
///
/// ```
/// # use pipespace::{layout::LayoutEngine, row::Row};
/// # use pipespace_core::{ClearanceMode, PipeDescriptor};
/// let row = Row::new(
///     vec![PipeDescriptor::new("A", 168.0), PipeDescriptor::new("B", 168.0)],
///     25.0,
///     ClearanceMode::PipeToPipe,
/// );
///
/// let layout = LayoutEngine::new().layout(&row).unwrap();
/// assert_eq!(layout.pipes()[1].x(), Some(279.0));
/// assert_eq!(layout.envelope_spacing(), Ok(363.0));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct LayoutEngine {
    reference_margin: f64,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self {
            reference_margin: DEFAULT_REFERENCE_MARGIN,
        }
    }
}

impl LayoutEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the clearance between the tallest feature and the reference line.
    pub fn with_reference_margin(mut self, margin: f64) -> Self {
        self.reference_margin = margin;
        self
    }

    /// Lays out `row`.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InsufficientPipes`] for rows shorter than two
    /// pipes. Failed pairs do not abort layout; see [`RowLayout::status`].
    pub fn layout(&self, row: &Row) -> Result<RowLayout, LayoutError> {
        let pipes = row.pipes();
        if pipes.len() < 2 {
            return Err(LayoutError::InsufficientPipes { count: pipes.len() });
        }

        info!(pipes = pipes.len(), gap = row.gap(), mode = row.mode().code(); "Laying out row");

        let pairs: Vec<PairClearance> = pipes
            .windows(2)
            .enumerate()
            .map(|(first, pair)| {
                let outcome = clearance(&pair[0], &pair[1], row.gap(), row.mode());
                match &outcome {
                    Ok(distance) => debug!(first, distance; "Pair clearance"),
                    Err(err) => warn!(first, err:%; "Pair clearance failed"),
                }
                PairClearance { first, outcome }
            })
            .collect();

        let mut cursor = pipes[0].radius();
        let mut placed = Vec::with_capacity(pipes.len());
        for (i, pipe) in pipes.iter().enumerate() {
            if i > 0 {
                cursor = cursor.zip(pairs[i - 1].distance()).map(|(x, d)| x + d);
            }
            placed.push(PlacedPipe {
                x: cursor,
                y: pipe.center_y(),
            });
        }

        let failed_pairs: Vec<usize> = pairs
            .iter()
            .filter(|pair| pair.error().is_some())
            .map(PairClearance::first)
            .collect();

        let status = if failed_pairs.is_empty() {
            let sum: f64 = pairs.iter().filter_map(PairClearance::distance).sum();
            // Every pipe belongs to a successful pair, so both ends are resolved.
            let first = pipes[0].insulated_radius().unwrap_or_default();
            let last = pipes[pipes.len() - 1].insulated_radius().unwrap_or_default();
            LayoutStatus::Complete {
                envelope_spacing: sum + first + last,
            }
        } else {
            LayoutStatus::Incomplete { failed_pairs }
        };

        let tallest = pipes
            .iter()
            .filter_map(|pipe| Some(pipe.center_y()? + pipe.top_extent()?))
            .reduce(f64::max)
            .unwrap_or(0.0);
        let reference_line_y = tallest + self.reference_margin;

        let layout = RowLayout {
            mode: row.mode(),
            pipes: placed,
            pairs,
            reference_line_y,
            status,
        };

        info!(complete = layout.is_complete(), reference_line_y; "Layout calculated");
        trace!(layout:?; "Row layout");

        Ok(layout)
    }
}

/// Lays out `row` with the default reference margin.
///
/// # Errors
///
/// See [`LayoutEngine::layout`].
pub fn layout(row: &Row) -> Result<RowLayout, LayoutError> {
    LayoutEngine::default().layout(row)
}


#[cfg(test)]
mod proptest_tests {
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    use pipespace_core::{Flange, PipeDescriptor};

    use super::*;
    use crate::clearance::round_up;

    fn pipe_strategy() -> impl Strategy<Value = PipeDescriptor> {
        (
            1.0f64..1200.0,
            0.0f64..200.0,
            proptest::option::of(1.0f64..1500.0),
            0.0f64..200.0,
        )
            .prop_map(|(od, ins, flange_od, flange_ins)| {
                PipeDescriptor::new("p", od)
                    .with_insulation(ins)
                    .with_flange(Flange::new(flange_od, flange_ins))
            })
    }

    /// Identical pipes land at `radius + i * distance`.
    fn check_uniform_row_positions(
        od: f64,
        ins: f64,
        gap: f64,
        count: usize,
    ) -> Result<(), TestCaseError> {
        let pipe = PipeDescriptor::new("p", od).with_insulation(ins);
        let row = Row::new(vec![pipe; count], gap, ClearanceMode::PipeToPipe);
        let layout = layout(&row).unwrap();
        let distance = round_up(od / 2.0 + ins + od / 2.0 + ins + gap);

        for (i, placed) in layout.pipes().iter().enumerate() {
            let expected = od / 2.0 + i as f64 * distance;
            prop_assert!(approx_eq!(f64, placed.x().unwrap(), expected, epsilon = 1e-6));
        }
        Ok(())
    }

    /// Thickening insulation or enlarging a flange never lowers the reference line.
    fn check_reference_line_is_monotonic(
        pipes: Vec<PipeDescriptor>,
        index: usize,
        extra: f64,
    ) -> Result<(), TestCaseError> {
        let index = index % pipes.len();
        let before = layout(&Row::new(pipes.clone(), 25.0, ClearanceMode::PipeToPipe))
            .unwrap()
            .reference_line_y();

        let target = &pipes[index];
        let thicker = target.clone().with_insulation(target.insulation() + extra);
        let bigger_flange = target.clone().with_flange(Flange::new(
            Some(target.flange().outer_diameter().unwrap_or(1.0) + extra),
            target.flange().insulation(),
        ));

        for changed in [thicker, bigger_flange] {
            let mut modified = pipes.clone();
            modified[index] = changed;
            let after = layout(&Row::new(modified, 25.0, ClearanceMode::PipeToPipe))
                .unwrap()
                .reference_line_y();
            prop_assert!(after >= before, "{after} < {before}");
        }
        Ok(())
    }

    /// The envelope equals the pair sum plus both insulated end radii.
    fn check_envelope_rederivation(pipes: Vec<PipeDescriptor>, gap: f64) -> Result<(), TestCaseError> {
        let row = Row::new(pipes.clone(), gap, ClearanceMode::PipeToPipe);
        let layout = layout(&row).unwrap();

        let pairs: f64 = pipes
            .windows(2)
            .map(|w| round_up(w[0].insulated_radius().unwrap() + w[1].insulated_radius().unwrap() + gap))
            .sum();
        let expected = pairs
            + pipes[0].insulated_radius().unwrap()
            + pipes[pipes.len() - 1].insulated_radius().unwrap();

        prop_assert!(approx_eq!(f64, layout.envelope_spacing().unwrap(), expected, epsilon = 1e-6));
        Ok(())
    }

    proptest! {
        #[test]
        fn uniform_row_positions(
            od in 1.0f64..1200.0,
            ins in 0.0f64..200.0,
            gap in 0.0f64..500.0,
            count in 2usize..30,
        ) {
            check_uniform_row_positions(od, ins, gap, count)?;
        }

        #[test]
        fn reference_line_is_monotonic(
            pipes in proptest::collection::vec(pipe_strategy(), 2..10),
            index in 0usize..10,
            extra in 0.0f64..300.0,
        ) {
            check_reference_line_is_monotonic(pipes, index, extra)?;
        }

        #[test]
        fn envelope_rederivation(
            pipes in proptest::collection::vec(pipe_strategy(), 2..10),
            gap in 0.0f64..500.0,
        ) {
            check_envelope_rederivation(pipes, gap)?;
        }
    }
}
