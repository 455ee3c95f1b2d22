//! Fixed layer table and line types.

/// Line style used by a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineType {
    /// Solid line. Built into every CAD tool, so it is never declared.
    Continuous,
    /// Dash-dot centerline.
    Center,
}

impl LineType {
    /// Line types that must be declared in the line type table.
    pub const DECLARED: [LineType; 1] = [LineType::Center];

    pub fn name(self) -> &'static str {
        match self {
            Self::Continuous => "CONTINUOUS",
            Self::Center => "CENTER",
        }
    }

    /// ASCII sketch shown by CAD tools in line type pickers.
    pub fn description(self) -> &'static str {
        match self {
            Self::Continuous => "Solid line",
            Self::Center => "Center ____ _ ____ _ ____",
        }
    }

    /// Nominal pattern length written alongside the dash elements.
    pub fn pattern_length(self) -> f64 {
        match self {
            Self::Continuous => 0.0,
            Self::Center => 50.0,
        }
    }

    /// Dash elements: positive values are dashes, negative values are gaps.
    pub fn pattern(self) -> &'static [f64] {
        match self {
            Self::Continuous => &[],
            Self::Center => &[30.0, -5.0, 5.0, -5.0],
        }
    }
}

/// Drawing layers, in table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Layer {
    /// Pipe body outlines, flow glyph and the common bottom line
    Pipe,
    /// Insulated pipe body outline
    PipeInsulation,
    /// Flange outline
    Flange,
    /// Insulated flange outline
    FlangeInsulation,
    /// Pipe name labels
    Text,
    /// Vertical center markers
    Centerline,
}

impl Layer {
    /// Every layer, in the order the layer table declares them.
    pub const ALL: [Layer; 6] = [
        Layer::Pipe,
        Layer::PipeInsulation,
        Layer::Flange,
        Layer::FlangeInsulation,
        Layer::Text,
        Layer::Centerline,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Pipe => "PIPE",
            Self::PipeInsulation => "PIPE_INSUL",
            Self::Flange => "FLANGE",
            Self::FlangeInsulation => "FLANGE_INSUL",
            Self::Text => "TEXT",
            Self::Centerline => "CENTERLINE",
        }
    }

    /// AutoCAD colour index (1 red, 2 yellow, 3 green, 4 cyan, 7 white/black).
    pub fn color_index(self) -> u8 {
        match self {
            Self::Pipe | Self::Text => 7,
            Self::PipeInsulation => 3,
            Self::Flange => 2,
            Self::FlangeInsulation => 4,
            Self::Centerline => 1,
        }
    }

    pub fn line_type(self) -> LineType {
        match self {
            Self::Centerline => LineType::Center,
            _ => LineType::Continuous,
        }
    }
}
