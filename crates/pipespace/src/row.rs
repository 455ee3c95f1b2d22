//! Immutable pipe rows and the form attributes they are built from.
//!
//! A [`Row`] is rebuilt from the current [`PipeInput`]s on every
//! recomputation and never mutated afterwards; layouts are pure
//! derivations of it.

use log::{debug, warn};

use pipespace_core::{
    BaseOffset, ClearanceMode, Flange, NominalSize, PipeDescriptor, lookup::DimensionLookup,
};

/// Attributes of one pipe as collected from the user, before lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct PipeInput {
    name: String,
    size: String,
    class: String,
    insulation: f64,
    flange_insulation: f64,
    base_offset: BaseOffset,
}

impl PipeInput {
    pub fn new(name: impl Into<String>, size: impl Into<String>, class: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size: size.into(),
            class: class.into(),
            insulation: 0.0,
            flange_insulation: 0.0,
            base_offset: BaseOffset::default(),
        }
    }

    pub fn with_insulation(mut self, insulation: f64) -> Self {
        self.insulation = insulation;
        self
    }

    pub fn with_flange_insulation(mut self, flange_insulation: f64) -> Self {
        self.flange_insulation = flange_insulation;
        self
    }

    pub fn with_base_offset(mut self, base_offset: BaseOffset) -> Self {
        self.base_offset = base_offset;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> &str {
        &self.size
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn insulation(&self) -> f64 {
        self.insulation
    }

    pub fn flange_insulation(&self) -> f64 {
        self.flange_insulation
    }

    pub fn base_offset(&self) -> BaseOffset {
        self.base_offset
    }

    /// Resolves the pipe's diameters through `lookup`.
    ///
    /// `position` is the 1-based position in the row, used to label pipes
    /// without a name. Unknown sizes or classes leave the matching diameter
    /// unresolved.
    pub fn resolve(&self, position: usize, lookup: &dyn DimensionLookup) -> PipeDescriptor {
        let name = match self.name.trim() {
            "" => format!("Pipe {position}"),
            name => name.to_string(),
        };

        let pipe_od = lookup.pipe_outer_diameter(&self.size);
        let flange_od = lookup.flange_outer_diameter(&self.class, &self.size);
        if pipe_od.is_none() {
            warn!(pipe = name, size = self.size; "Unknown nominal pipe size");
        }
        debug!(pipe = name, pipe_od:?, flange_od:?; "Resolved pipe dimensions");

        PipeDescriptor::new(name, pipe_od)
            .with_nominal(NominalSize::new(self.size.clone(), self.class.clone()))
            .with_insulation(self.insulation)
            .with_flange(Flange::new(flange_od, self.flange_insulation))
            .with_base_offset(self.base_offset)
    }
}

/// An ordered row of pipes sharing one gap and one clearance mode.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pipes: Vec<PipeDescriptor>,
    gap: f64,
    mode: ClearanceMode,
}

impl Row {
    /// Creates a row. A negative or non-finite gap is treated as zero.
    ///
    /// Row length is not checked here; the layout engine rejects rows with
    /// fewer than two pipes.
    pub fn new(pipes: Vec<PipeDescriptor>, gap: f64, mode: ClearanceMode) -> Self {
        Self {
            pipes,
            gap: if gap.is_finite() { gap.max(0.0) } else { 0.0 },
            mode,
        }
    }

    /// Resolves every input through `lookup` and builds a row from them.
    pub fn resolve(
        inputs: &[PipeInput],
        gap: f64,
        mode: ClearanceMode,
        lookup: &dyn DimensionLookup,
    ) -> Self {
        let pipes = inputs
            .iter()
            .enumerate()
            .map(|(i, input)| input.resolve(i + 1, lookup))
            .collect();
        Self::new(pipes, gap, mode)
    }

    pub fn pipes(&self) -> &[PipeDescriptor] {
        &self.pipes
    }

    pub fn gap(&self) -> f64 {
        self.gap
    }

    pub fn mode(&self) -> ClearanceMode {
        self.mode
    }

    pub fn len(&self) -> usize {
        self.pipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pipes.is_empty()
    }
}
