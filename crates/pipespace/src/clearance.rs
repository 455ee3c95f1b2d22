//! Minimum center-to-center distance between two adjacent pipes.
//!
//! Both modes round the raw distance up to the next multiple of
//! [`ROUNDING_INCREMENT`]; a clearance is never rounded down.

use thiserror::Error;

use pipespace_core::{ClearanceMode, MissingDimension, PipeDescriptor};

/// Spacing is rounded up to whole multiples of this many millimetres.
pub const ROUNDING_INCREMENT: f64 = 5.0;

/// Errors from a single pairwise clearance calculation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClearanceError {
    #[error("{0}")]
    MissingDimension(#[from] MissingDimension),
}

impl ClearanceError {
    /// The dimension that could not be resolved.
    pub fn missing(&self) -> &MissingDimension {
        match self {
            Self::MissingDimension(missing) => missing,
        }
    }
}

/// Rounds `raw` up to the next multiple of [`ROUNDING_INCREMENT`].
///
/// # Examples
///
/// ```
/// # use pipespace::clearance::round_up;
/// assert_eq!(round_up(193.0), 195.0);
/// assert_eq!(round_up(195.0), 195.0);
/// assert_eq!(round_up(0.1), 5.0);
/// ```
pub fn round_up(raw: f64) -> f64 {
    (raw / ROUNDING_INCREMENT).ceil() * ROUNDING_INCREMENT
}

/// Computes the safe center-to-center distance from pipe `a` to pipe `b`.
///
/// - [`ClearanceMode::PipeToPipe`]: both insulated bodies plus `gap`.
/// - [`ClearanceMode::PipeToFlange`]: the larger of `a`'s insulated body to
///   `b`'s insulated flange and the reverse, plus `gap`.
///
/// # Errors
///
/// Returns [`ClearanceError::MissingDimension`] if either pipe's outer
/// diameter is unresolved, or, in pipe-to-flange mode, either flange outer
/// diameter is unresolved.
///
/// # Examples
///
/// ```
/// # use pipespace::clearance::clearance;
/// # use pipespace_core::{ClearanceMode, PipeDescriptor};
/// let a = PipeDescriptor::new("A", 168.0);
/// let b = PipeDescriptor::new("B", 168.0);
/// assert_eq!(clearance(&a, &b, 25.0, ClearanceMode::PipeToPipe), Ok(195.0));
/// ```
pub fn clearance(
    a: &PipeDescriptor,
    b: &PipeDescriptor,
    gap: f64,
    mode: ClearanceMode,
) -> Result<f64, ClearanceError> {
    let a_body = a.require_outer_diameter()? / 2.0 + a.insulation();
    let b_body = b.require_outer_diameter()? / 2.0 + b.insulation();

    let raw = match mode {
        ClearanceMode::PipeToPipe => a_body + b_body + gap,
        ClearanceMode::PipeToFlange => {
            let a_flange = a.require_flange_diameter()? / 2.0 + a.flange().insulation();
            let b_flange = b.require_flange_diameter()? / 2.0 + b.flange().insulation();
            let d1 = a_body + b_flange + gap;
            let d2 = b_body + a_flange + gap;
            d1.max(d2)
        }
    };

    Ok(round_up(raw))
}
