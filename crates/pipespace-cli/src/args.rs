//! Command-line argument definitions for the Pipespace CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments select the session to load, the outputs to
//! write, overrides for the session settings, the configuration file and
//! logging verbosity.

use clap::Parser;

use pipespace::pipe::ClearanceMode;

/// Command-line arguments for the Pipespace spacing tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input session file (JSON)
    #[arg(help = "Path to the session file")]
    pub input: String,

    /// Path to the output DXF file
    #[arg(short, long, default_value = "out.dxf")]
    pub output: String,

    /// Also write an SVG preview to this path
    #[arg(long)]
    pub svg: Option<String>,

    /// Print the spacing report to stdout
    #[arg(long)]
    pub report: bool,

    /// Override the session's clearance gap, in millimetres
    #[arg(long, value_parser = parse_gap)]
    pub gap: Option<f64>,

    /// Override the session's clearance mode (pp or pf)
    #[arg(long)]
    pub mode: Option<ClearanceMode>,

    /// Write the session, with overrides applied, to this path
    #[arg(long)]
    pub save_session: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

/// Parses a gap in millimetres; it must be finite and non-negative.
fn parse_gap(value: &str) -> Result<f64, String> {
    let gap: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("`{value}` is not a number"))?;
    if !gap.is_finite() || gap < 0.0 {
        return Err(format!("gap must be a finite, non-negative number, got `{value}`"));
    }
    Ok(gap)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_overrides() {
        let args = Args::try_parse_from([
            "pipespace",
            "rack.json",
            "--mode",
            "pf",
            "--gap",
            "30",
            "--svg",
            "rack.svg",
            "--report",
        ])
        .unwrap();

        assert_eq!(args.input, "rack.json");
        assert_eq!(args.output, "out.dxf");
        assert_eq!(args.mode, Some(ClearanceMode::PipeToFlange));
        assert_eq!(args.gap, Some(30.0));
        assert_eq!(args.svg.as_deref(), Some("rack.svg"));
        assert!(args.report);
    }

    #[test]
    fn test_rejects_non_finite_gap() {
        for gap in ["inf", "NaN", "1e999", "-5"] {
            assert!(
                Args::try_parse_from(["pipespace", "rack.json", "--gap", gap]).is_err(),
                "gap `{gap}` should be rejected"
            );
        }
    }

    #[test]
    fn test_rejects_unknown_mode() {
        assert!(Args::try_parse_from(["pipespace", "rack.json", "--mode", "zz"]).is_err());
    }
}
