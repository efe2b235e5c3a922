//! Compiler configuration

use crate::color::Color;
use crate::error::{FormError, Result};
use crate::forms::{BorderStyle, WidgetAppearance};
use crate::layout::PlacementConfig;
use crate::scan::ScanOptions;
use serde::{Deserialize, Serialize};

/// Border styling for emitted widgets
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    pub required_border_color: Color,
    pub required_border_width: f64,
    pub default_border_color: Color,
    pub default_border_width: f64,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            required_border_color: Color::red(),
            required_border_width: 1.0,
            default_border_color: Color::Rgb(0.0, 0.5, 1.0),
            default_border_width: 0.6,
        }
    }
}

impl StyleConfig {
    /// Appearance for a field, red when required
    pub fn appearance(&self, required: bool) -> WidgetAppearance {
        let (color, width) = if required {
            (self.required_border_color, self.required_border_width)
        } else {
            (self.default_border_color, self.default_border_width)
        };
        WidgetAppearance {
            border_color: Some(color),
            background_color: None,
            border_width: width,
            border_style: BorderStyle::Solid,
        }
    }
}

/// Everything a compile run can be tuned with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    pub placement: PlacementConfig,
    pub style: StyleConfig,
    /// Font size assumed for text runs that do not report one
    pub default_font_size: f64,
    /// Leave a diagnostic note beside every tag that was not converted
    pub annotate_failures: bool,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            placement: PlacementConfig::default(),
            style: StyleConfig::default(),
            default_font_size: 12.0,
            annotate_failures: true,
        }
    }
}

impl CompilerConfig {
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            line_tolerance: self.placement.line_tolerance,
            min_cell_coverage: self.placement.min_cell_coverage,
        }
    }

    /// Reject values that would produce degenerate widgets.
    ///
    /// Deserialization accepts any number, so a loaded config is checked here
    /// before a run uses it.
    pub fn validate(&self) -> Result<()> {
        let checks = [
            ("default_font_size", self.default_font_size, false),
            ("placement.cell_margin", self.placement.cell_margin, true),
            ("placement.line_tolerance", self.placement.line_tolerance, true),
            ("style.required_border_width", self.style.required_border_width, true),
            ("style.default_border_width", self.style.default_border_width, true),
        ];
        for (key, value, zero_allowed) in checks {
            let in_range = if zero_allowed { value >= 0.0 } else { value > 0.0 };
            if !value.is_finite() || !in_range {
                let bound = if zero_allowed { "zero or more" } else { "positive" };
                return Err(FormError::InvalidConfig(format!("{key} must be {bound}, got {value}")));
            }
        }

        let coverage = self.placement.min_cell_coverage;
        if !(coverage > 0.0 && coverage <= 1.0) {
            return Err(FormError::InvalidConfig(format!(
                "placement.min_cell_coverage must lie in (0, 1], got {coverage}"
            )));
        }
        Ok(())
    }

    /// Font size for a run, falling back to the configured default
    pub fn font_size(&self, reported: Option<f64>) -> f64 {
        reported
            .filter(|size| size.is_finite() && *size > 0.0)
            .unwrap_or(self.default_font_size)
    }
}
