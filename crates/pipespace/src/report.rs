//! Per-pipe report rows.
//!
//! A [`Report`] lays the numbers of a computed row out for people: one
//! [`ReportRow`] per pipe with its resolved dimensions and the forward
//! clearance to the next pipe. It renders as a plain-text table through
//! [`Display`](std::fmt::Display) and serializes with serde.

use std::fmt;

use serde::Serialize;

use pipespace_core::{ClearanceMode, PipeDescriptor};

use crate::{layout::RowLayout, row::Row};

/// Clearance from a pipe to the next one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Forward {
    /// Distance to pipe `next` (1-based).
    To { next: usize, distance: f64 },
    /// The pair clearance could not be computed.
    Unresolved { next: usize },
    /// Last pipe of the row.
    None,
}

impl fmt::Display for Forward {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::To { next, distance } => write!(f, "Pipe {} - Pipe {next}: {distance}", next - 1),
            Self::Unresolved { next } => write!(f, "Pipe {} - Pipe {next}: unresolved", next - 1),
            Self::None => f.write_str("-"),
        }
    }
}

/// Report line for one pipe.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub index: usize,
    pub name: String,
    pub size: Option<String>,
    pub class: Option<String>,
    pub pipe_outer_diameter: Option<f64>,
    pub flange_outer_diameter: Option<f64>,
    pub insulation: f64,
    pub flange_insulation: f64,
    pub base_offset: f64,
    pub forward: Forward,
}

impl ReportRow {
    /// Display label, `Pipe N`.
    pub fn label(&self) -> String {
        format!("Pipe {}", self.index)
    }

    fn from_pipe(index: usize, pipe: &PipeDescriptor, forward: Forward) -> Self {
        Self {
            index,
            name: pipe.name().to_string(),
            size: pipe.nominal().map(|n| n.size().to_string()),
            class: pipe.nominal().map(|n| n.class().to_string()),
            pipe_outer_diameter: pipe.outer_diameter(),
            flange_outer_diameter: pipe.flange().outer_diameter(),
            insulation: pipe.insulation(),
            flange_insulation: pipe.flange().insulation(),
            base_offset: pipe.base_offset().effective(),
            forward,
        }
    }
}

/// Tabular summary of a laid-out row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub mode: ClearanceMode,
    pub gap: f64,
    pub envelope_spacing: Option<f64>,
    pub rows: Vec<ReportRow>,
}

/// Builds the report for `row` from its `layout`.
pub fn build_report(row: &Row, layout: &RowLayout) -> Report {
    let count = row.len();
    let rows = row
        .pipes()
        .iter()
        .enumerate()
        .map(|(i, pipe)| {
            let forward = match layout.forward(i) {
                _ if i + 1 == count => Forward::None,
                Some(pair) => match pair.distance() {
                    Some(distance) => Forward::To {
                        next: i + 2,
                        distance,
                    },
                    None => Forward::Unresolved { next: i + 2 },
                },
                None => Forward::None,
            };
            ReportRow::from_pipe(i + 1, pipe, forward)
        })
        .collect();

    Report {
        mode: row.mode(),
        gap: row.gap(),
        envelope_spacing: layout.envelope_spacing().ok(),
        rows,
    }
}

const HEADINGS: [&str; 10] = [
    "a/a",
    "Pipeline",
    "Size",
    "Class",
    "Pipe OD",
    "Flange OD",
    "Insulation",
    "Flange Ins",
    "BOP",
    "Center to Center",
];

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Pipe Spacing Calculation Report")?;
        writeln!(f, "Calculation Logic: {}", self.mode.label())?;
        writeln!(f, "Required Gap: {} mm", self.gap)?;
        writeln!(f)?;

        let cells: Vec<[String; 10]> = self.rows.iter().map(row_cells).collect();
        let mut widths = HEADINGS.map(str::len);
        for row in &cells {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        write_line(f, &HEADINGS.map(str::to_string), &widths)?;
        for row in &cells {
            write_line(f, row, &widths)?;
        }

        writeln!(f)?;
        match self.envelope_spacing {
            Some(spacing) => write!(f, "Envelope Spacing: {spacing} mm"),
            None => write!(f, "Envelope Spacing: incomplete"),
        }
    }
}

fn row_cells(row: &ReportRow) -> [String; 10] {
    let mm = |value: Option<f64>| value.map_or_else(|| "-".to_string(), |v| v.to_string());
    [
        row.label(),
        row.name.clone(),
        row.size.as_ref().map_or_else(|| "-".to_string(), |s| format!("{s}\"")),
        row.class.clone().unwrap_or_else(|| "-".to_string()),
        mm(row.pipe_outer_diameter),
        mm(row.flange_outer_diameter),
        row.insulation.to_string(),
        row.flange_insulation.to_string(),
        row.base_offset.to_string(),
        row.forward.to_string(),
    ]
}

fn write_line(f: &mut fmt::Formatter<'_>, cells: &[String; 10], widths: &[usize; 10]) -> fmt::Result {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect();
    writeln!(f, "{}", line.join("  ").trim_end())
}

#[cfg(test)]
mod tests {
    use pipespace_core::{BaseOffset, Flange, NominalSize};

    use super::*;
    use crate::layout::layout;

    fn sample_row(mode: ClearanceMode) -> Row {
        Row::new(
            vec![
                PipeDescriptor::new("Steam", 168.3)
                    .with_nominal(NominalSize::new("6", "150"))
                    .with_flange(Flange::new(Some(279.0), 0.0)),
                PipeDescriptor::new("Water", 219.1)
                    .with_nominal(NominalSize::new("8", "150"))
                    .with_insulation(50.0)
                    .with_base_offset(BaseOffset::enabled(20.0))
                    .with_flange(Flange::new(Some(343.0), 0.0)),
                PipeDescriptor::new("Drain", 60.3)
                    .with_nominal(NominalSize::new("2", "2500"))
                    .with_flange(Flange::new(None, 0.0)),
            ],
            25.0,
            mode,
        )
    }

    #[test]
    fn test_forward_clearances() {
        let row = sample_row(ClearanceMode::PipeToPipe);
        let report = build_report(&row, &layout(&row).unwrap());

        // 84.15 + 109.55 + 50 + 25 = 268.7
        assert_eq!(
            report.rows[0].forward,
            Forward::To {
                next: 2,
                distance: 270.0
            }
        );
        assert!(matches!(report.rows[1].forward, Forward::To { next: 3, .. }));
        assert_eq!(report.rows[2].forward, Forward::None);
        assert!(report.envelope_spacing.is_some());
        assert_eq!(report.rows[1].base_offset, 20.0);
    }

    #[test]
    fn test_unresolved_pair_is_reported() {
        let row = sample_row(ClearanceMode::PipeToFlange);
        let report = build_report(&row, &layout(&row).unwrap());

        assert!(matches!(report.rows[0].forward, Forward::To { next: 2, .. }));
        assert_eq!(report.rows[1].forward, Forward::Unresolved { next: 3 });
        assert_eq!(report.rows[2].flange_outer_diameter, None);
        assert_eq!(report.envelope_spacing, None);
    }

    #[test]
    fn test_display_table() {
        let row = sample_row(ClearanceMode::PipeToFlange);
        let text = build_report(&row, &layout(&row).unwrap()).to_string();

        assert!(text.contains("Calculation Logic: Pipe-to-Flange"));
        assert!(text.contains("Required Gap: 25 mm"));
        assert!(text.contains("Pipe 1 - Pipe 2: "));
        assert!(text.contains("Pipe 2 - Pipe 3: unresolved"));
        assert!(text.contains("6\""));
        assert!(text.ends_with("Envelope Spacing: incomplete"));
    }

    #[test]
    fn test_serializes_forward_with_kind_tag() {
        let row = sample_row(ClearanceMode::PipeToPipe);
        let report = build_report(&row, &layout(&row).unwrap());
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["mode"], "pp");
        assert_eq!(json["rows"][0]["forward"]["kind"], "to");
        assert_eq!(json["rows"][0]["forward"]["next"], 2);
        assert_eq!(json["rows"][2]["forward"]["kind"], "none");
    }
}
