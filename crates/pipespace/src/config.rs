//! Configuration types for Pipespace layout and drafting.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from a
//! TOML file; every field is optional and falls back to its default.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining layout and drafting settings.
//! - [`LayoutConfig`] - Reference line placement.
//! - [`DraftingConfig`] - Label height and SVG preview appearance.
//!
//! # Example
//!
//! ```
//! # use pipespace::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.layout().reference_margin(), 100.0);
//! assert_eq!(config.drafting().text_height(), 15.0);
//! ```

use serde::Deserialize;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Drafting configuration section.
    #[serde(default)]
    drafting: DraftingConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(layout: LayoutConfig, drafting: DraftingConfig) -> Self {
        Self { layout, drafting }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the drafting configuration.
    pub fn drafting(&self) -> &DraftingConfig {
        &self.drafting
    }
}

/// Row layout settings.
#[derive(Debug, Clone, Deserialize)]
pub struct LayoutConfig {
    /// Clearance in millimetres between the tallest feature of the row and
    /// the shared reference line.
    #[serde(default = "default_reference_margin")]
    reference_margin: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            reference_margin: default_reference_margin(),
        }
    }
}

impl LayoutConfig {
    pub fn new(reference_margin: f64) -> Self {
        Self { reference_margin }
    }

    pub fn reference_margin(&self) -> f64 {
        self.reference_margin
    }
}

/// Drafting and preview settings.
#[derive(Debug, Clone, Deserialize)]
pub struct DraftingConfig {
    /// Height of the pipe name labels, in millimetres.
    #[serde(default = "default_text_height")]
    text_height: f64,

    /// Pixels per millimetre in the SVG preview.
    #[serde(default = "default_preview_scale")]
    preview_scale: f64,

    /// Margin around the drawing in the SVG preview, in millimetres.
    #[serde(default = "default_preview_padding")]
    preview_padding: f64,

    /// Background colour of the SVG preview, as a CSS colour string.
    #[serde(default = "default_preview_background")]
    preview_background: String,
}

impl Default for DraftingConfig {
    fn default() -> Self {
        Self {
            text_height: default_text_height(),
            preview_scale: default_preview_scale(),
            preview_padding: default_preview_padding(),
            preview_background: default_preview_background(),
        }
    }
}

impl DraftingConfig {
    pub fn text_height(&self) -> f64 {
        self.text_height
    }

    pub fn preview_scale(&self) -> f64 {
        self.preview_scale
    }

    pub fn preview_padding(&self) -> f64 {
        self.preview_padding
    }

    pub fn preview_background(&self) -> &str {
        &self.preview_background
    }

    /// Checks that sizes are positive.
    ///
    /// # Errors
    ///
    /// Returns a message naming the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.text_height > 0.0) {
            return Err(format!("text_height must be positive, got {}", self.text_height));
        }
        if !(self.preview_scale > 0.0) {
            return Err(format!(
                "preview_scale must be positive, got {}",
                self.preview_scale
            ));
        }
        if self.preview_padding < 0.0 {
            return Err(format!(
                "preview_padding must not be negative, got {}",
                self.preview_padding
            ));
        }
        Ok(())
    }
}

fn default_reference_margin() -> f64 {
    100.0
}

fn default_text_height() -> f64 {
    15.0
}

fn default_preview_scale() -> f64 {
    0.5
}

fn default_preview_padding() -> f64 {
    50.0
}

fn default_preview_background() -> String {
    "#1e1e1e".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.layout().reference_margin(), 100.0);
        assert_eq!(config.drafting().preview_scale(), 0.5);
        assert_eq!(config.drafting().preview_background(), "#1e1e1e");
        assert!(config.drafting().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_text_height() {
        let drafting = DraftingConfig {
            text_height: 0.0,
            ..DraftingConfig::default()
        };
        assert!(drafting.validate().unwrap_err().contains("text_height"));
    }
}
