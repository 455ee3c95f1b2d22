//! Per-pipe attributes and clearance modes.
//!
//! A [`PipeDescriptor`] is one pipeline in a row. Its outer diameter comes
//! from a dimension lookup and may be unresolved; flange data is carried as
//! a [`Flange`] variant so that the pipe-to-flange precondition can be
//! checked with [`PipeDescriptor::require_for`] before any spacing is done.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How adjacent pipes must clear each other.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClearanceMode {
    /// Insulated pipe body to insulated pipe body. Flange data is ignored.
    #[default]
    #[serde(rename = "pp")]
    PipeToPipe,
    /// Insulated pipe body to the neighbour's insulated flange, checked in
    /// both directions.
    #[serde(rename = "pf")]
    PipeToFlange,
}

impl ClearanceMode {
    /// Returns the short code used in session files (`pp` / `pf`).
    pub fn code(self) -> &'static str {
        match self {
            Self::PipeToPipe => "pp",
            Self::PipeToFlange => "pf",
        }
    }

    /// Returns a human-readable label for reports.
    pub fn label(self) -> &'static str {
        match self {
            Self::PipeToPipe => "Pipe-to-Pipe",
            Self::PipeToFlange => "Pipe-to-Flange",
        }
    }

    /// Returns `true` if flange geometry takes part in this mode.
    pub fn uses_flanges(self) -> bool {
        matches!(self, Self::PipeToFlange)
    }
}

impl FromStr for ClearanceMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pp" | "pipe-to-pipe" | "pipe" => Ok(Self::PipeToPipe),
            "pf" | "pipe-to-flange" | "flange" => Ok(Self::PipeToFlange),
            _ => Err(format!(
                "invalid clearance mode `{s}`, valid values: pp, pf"
            )),
        }
    }
}

impl fmt::Display for ClearanceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The size/class codes a pipe was looked up with.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NominalSize {
    size: String,
    class: String,
}

impl NominalSize {
    pub fn new(size: impl Into<String>, class: impl Into<String>) -> Self {
        Self {
            size: size.into(),
            class: class.into(),
        }
    }

    /// Nominal pipe size code, e.g. `"6"` or `"1.5"`.
    pub fn size(&self) -> &str {
        &self.size
    }

    /// Pressure class code, e.g. `"300"`.
    pub fn class(&self) -> &str {
        &self.class
    }
}

impl fmt::Display for NominalSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NPS {}\" - Class {}", self.size, self.class)
    }
}

/// Which diameter of a pipe could not be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DimensionKind {
    PipeOuterDiameter,
    FlangeOuterDiameter,
}

impl fmt::Display for DimensionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PipeOuterDiameter => f.write_str("pipe outer diameter"),
            Self::FlangeOuterDiameter => f.write_str("flange outer diameter"),
        }
    }
}

/// A required diameter is unknown for the pipe's size/class combination.
#[derive(Debug, Clone, PartialEq, Error)]
pub struct MissingDimension {
    pipe: String,
    nominal: Option<NominalSize>,
    dimension: DimensionKind,
}

impl MissingDimension {
    pub fn new(pipe: impl Into<String>, nominal: Option<NominalSize>, dimension: DimensionKind) -> Self {
        Self {
            pipe: pipe.into(),
            nominal,
            dimension,
        }
    }

    /// Name of the offending pipe.
    pub fn pipe(&self) -> &str {
        &self.pipe
    }

    /// Size/class combination the lookup failed for, if the pipe was looked up.
    pub fn nominal(&self) -> Option<&NominalSize> {
        self.nominal.as_ref()
    }

    pub fn dimension(&self) -> DimensionKind {
        self.dimension
    }
}

impl fmt::Display for MissingDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no {} for pipe `{}`", self.dimension, self.pipe)?;
        if let Some(nominal) = &self.nominal {
            write!(f, " [{nominal}]")?;
        }
        Ok(())
    }
}

/// Flange data for a pipe.
///
/// The insulation thickness is user input and is kept even when the
/// flange outer diameter could not be resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Flange {
    Resolved { outer_diameter: f64, insulation: f64 },
    Unresolved { insulation: f64 },
}

impl Default for Flange {
    fn default() -> Self {
        Self::Unresolved { insulation: 0.0 }
    }
}

impl Flange {
    /// Builds flange data from an optional lookup result.
    ///
    /// Non-positive or non-finite diameters count as unresolved. Negative
    /// or non-finite insulation reads as zero.
    pub fn new(outer_diameter: Option<f64>, insulation: f64) -> Self {
        let insulation = thickness(insulation);
        match outer_diameter {
            Some(outer_diameter) if is_diameter(outer_diameter) => Self::Resolved {
                outer_diameter,
                insulation,
            },
            _ => Self::Unresolved { insulation },
        }
    }

    pub fn outer_diameter(&self) -> Option<f64> {
        match self {
            Self::Resolved { outer_diameter, .. } => Some(*outer_diameter),
            Self::Unresolved { .. } => None,
        }
    }

    pub fn insulation(&self) -> f64 {
        match self {
            Self::Resolved { insulation, .. } | Self::Unresolved { insulation } => *insulation,
        }
    }

    /// Radius of the insulated flange edge, if the flange is resolved.
    pub fn insulated_radius(&self) -> Option<f64> {
        self.outer_diameter()
            .map(|diameter| diameter / 2.0 + self.insulation())
    }
}

/// Vertical displacement of a pipe centerline (BOP).
///
/// The stored value survives toggling; only an enabled offset moves the pipe.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct BaseOffset {
    enabled: bool,
    value: f64,
}

impl BaseOffset {
    /// A non-finite `value` is stored as zero.
    pub fn new(enabled: bool, value: f64) -> Self {
        let value = if value.is_finite() { value } else { 0.0 };
        Self { enabled, value }
    }

    /// An enabled offset of `value` millimetres.
    pub fn enabled(value: f64) -> Self {
        Self::new(true, value)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// The stored value, regardless of the enabled flag.
    pub fn stored(&self) -> f64 {
        self.value
    }

    /// The displacement actually applied to the centerline.
    pub fn effective(&self) -> f64 {
        if self.enabled { self.value } else { 0.0 }
    }
}

/// One pipeline segment in a row.
///
/// # Examples
///
/// ```
/// # use pipespace_core::{BaseOffset, Flange, PipeDescriptor};
/// let pipe = PipeDescriptor::new("Steam", 168.0)
///     .with_insulation(50.0)
///     .with_flange(Flange::new(Some(279.0), 0.0))
///     .with_base_offset(BaseOffset::enabled(20.0));
///
/// assert_eq!(pipe.center_y(), Some(104.0));
/// assert_eq!(pipe.top_extent(), Some(139.5));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PipeDescriptor {
    name: String,
    nominal: Option<NominalSize>,
    outer_diameter: Option<f64>,
    insulation: f64,
    flange: Flange,
    base_offset: BaseOffset,
}

impl PipeDescriptor {
    /// Creates a pipe with the given outer diameter, no insulation, no
    /// flange data and no base offset.
    ///
    /// Pass `None` (or a non-positive value) for a diameter the lookup could
    /// not resolve.
    pub fn new(name: impl Into<String>, outer_diameter: impl Into<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            nominal: None,
            outer_diameter: outer_diameter.into().filter(|d| is_diameter(*d)),
            insulation: 0.0,
            flange: Flange::default(),
            base_offset: BaseOffset::default(),
        }
    }

    /// Sets the pipe insulation thickness. Negative or non-finite values
    /// read as zero.
    pub fn with_insulation(mut self, insulation: f64) -> Self {
        self.insulation = thickness(insulation);
        self
    }

    pub fn with_flange(mut self, flange: Flange) -> Self {
        self.flange = flange;
        self
    }

    pub fn with_base_offset(mut self, base_offset: BaseOffset) -> Self {
        self.base_offset = base_offset;
        self
    }

    /// Records the size/class codes used for lookups, for diagnostics.
    pub fn with_nominal(mut self, nominal: NominalSize) -> Self {
        self.nominal = Some(nominal);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn nominal(&self) -> Option<&NominalSize> {
        self.nominal.as_ref()
    }

    pub fn outer_diameter(&self) -> Option<f64> {
        self.outer_diameter
    }

    pub fn radius(&self) -> Option<f64> {
        self.outer_diameter.map(|d| d / 2.0)
    }

    pub fn insulation(&self) -> f64 {
        self.insulation
    }

    /// Radius of the insulated pipe body.
    pub fn insulated_radius(&self) -> Option<f64> {
        self.radius().map(|r| r + self.insulation)
    }

    pub fn flange(&self) -> &Flange {
        &self.flange
    }

    pub fn base_offset(&self) -> BaseOffset {
        self.base_offset
    }

    /// Vertical center of the pipe: radius plus effective base offset.
    pub fn center_y(&self) -> Option<f64> {
        self.radius().map(|r| r + self.base_offset.effective())
    }

    /// Highest point of any visible feature, relative to the pipe center.
    ///
    /// Considers the body, body insulation and, when the flange is resolved,
    /// the flange and flange insulation.
    pub fn top_extent(&self) -> Option<f64> {
        let radius = self.radius()?;
        let mut extent = radius.max(radius + self.insulation);
        if let Some(flange_od) = self.flange.outer_diameter() {
            let flange_radius = flange_od / 2.0;
            extent = extent
                .max(flange_radius)
                .max(flange_radius + self.flange.insulation());
        }
        Some(extent)
    }

    /// Returns the outer diameter or the matching [`MissingDimension`].
    pub fn require_outer_diameter(&self) -> Result<f64, MissingDimension> {
        self.outer_diameter
            .ok_or_else(|| self.missing(DimensionKind::PipeOuterDiameter))
    }

    /// Returns the flange outer diameter or the matching [`MissingDimension`].
    pub fn require_flange_diameter(&self) -> Result<f64, MissingDimension> {
        self.flange
            .outer_diameter()
            .ok_or_else(|| self.missing(DimensionKind::FlangeOuterDiameter))
    }

    /// Checks that every dimension the given mode needs is resolved.
    pub fn require_for(&self, mode: ClearanceMode) -> Result<(), MissingDimension> {
        self.require_outer_diameter()?;
        if mode.uses_flanges() {
            self.require_flange_diameter()?;
        }
        Ok(())
    }

    fn missing(&self, dimension: DimensionKind) -> MissingDimension {
        MissingDimension::new(self.name.clone(), self.nominal.clone(), dimension)
    }
}

fn is_diameter(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn thickness(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_clearance_mode_from_str() {
        assert_eq!("pp".parse::<ClearanceMode>(), Ok(ClearanceMode::PipeToPipe));
        assert_eq!("PF".parse::<ClearanceMode>(), Ok(ClearanceMode::PipeToFlange));
        assert_eq!(
            "pipe-to-flange".parse::<ClearanceMode>(),
            Ok(ClearanceMode::PipeToFlange)
        );
        assert!("sideways".parse::<ClearanceMode>().is_err());
    }

    #[test]
    fn test_clearance_mode_codes() {
        assert_eq!(ClearanceMode::PipeToPipe.code(), "pp");
        assert_eq!(ClearanceMode::PipeToFlange.code(), "pf");
        assert_eq!(ClearanceMode::PipeToFlange.to_string(), "Pipe-to-Flange");
    }

    #[test]
    fn test_base_offset_disabled_is_zero() {
        let bop = BaseOffset::new(false, 250.0);
        assert_eq!(bop.effective(), 0.0);
        assert_eq!(bop.stored(), 250.0);
        assert_eq!(BaseOffset::enabled(250.0).effective(), 250.0);
    }

    #[test]
    fn test_flange_non_positive_diameter_is_unresolved() {
        assert_eq!(Flange::new(Some(0.0), 10.0), Flange::Unresolved { insulation: 10.0 });
        assert_eq!(Flange::new(None, -3.0).insulation(), 0.0);
    }

    #[test]
    fn test_non_finite_values_read_as_zero() {
        let pipe = PipeDescriptor::new("A", f64::INFINITY)
            .with_insulation(f64::INFINITY)
            .with_flange(Flange::new(Some(f64::NAN), f64::NEG_INFINITY))
            .with_base_offset(BaseOffset::enabled(f64::NAN));

        assert_eq!(pipe.outer_diameter(), None);
        assert_eq!(pipe.insulation(), 0.0);
        assert_eq!(*pipe.flange(), Flange::Unresolved { insulation: 0.0 });
        assert_eq!(pipe.base_offset().effective(), 0.0);

        let pipe = PipeDescriptor::new("B", 168.0).with_insulation(f64::NAN);
        assert_eq!(pipe.insulation(), 0.0);
        assert_approx_eq!(f64, pipe.center_y().unwrap(), 84.0);
    }

    #[test]
    fn test_center_y_uses_effective_offset() {
        let pipe = PipeDescriptor::new("A", 219.0).with_base_offset(BaseOffset::new(false, 40.0));
        assert_approx_eq!(f64, pipe.center_y().unwrap(), 109.5);

        let pipe = pipe.with_base_offset(BaseOffset::enabled(40.0));
        assert_approx_eq!(f64, pipe.center_y().unwrap(), 149.5);
    }

    #[test]
    fn test_top_extent_picks_tallest_feature() {
        let pipe = PipeDescriptor::new("A", 100.0).with_insulation(10.0);
        assert_approx_eq!(f64, pipe.top_extent().unwrap(), 60.0);

        let pipe = pipe.with_flange(Flange::new(Some(200.0), 5.0));
        assert_approx_eq!(f64, pipe.top_extent().unwrap(), 105.0);
    }

    #[test]
    fn test_top_extent_unresolved_pipe() {
        assert_eq!(PipeDescriptor::new("A", None).top_extent(), None);
    }

    #[test]
    fn test_require_for_pipe_to_pipe_ignores_flange() {
        let pipe = PipeDescriptor::new("A", 168.0);
        assert!(pipe.require_for(ClearanceMode::PipeToPipe).is_ok());

        let err = pipe.require_for(ClearanceMode::PipeToFlange).unwrap_err();
        assert_eq!(err.dimension(), DimensionKind::FlangeOuterDiameter);
        assert_eq!(err.pipe(), "A");
    }

    #[test]
    fn test_missing_dimension_display_names_combination() {
        let pipe = PipeDescriptor::new("Steam", 355.6).with_nominal(NominalSize::new("14", "2500"));
        let err = pipe.require_flange_diameter().unwrap_err();
        assert_eq!(
            err.to_string(),
            "no flange outer diameter for pipe `Steam` [NPS 14\" - Class 2500]"
        );
    }

    #[test]
    fn test_negative_insulation_is_clamped() {
        let pipe = PipeDescriptor::new("A", 60.3).with_insulation(-5.0);
        assert_eq!(pipe.insulation(), 0.0);
    }
}
