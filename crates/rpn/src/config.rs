use std::{fs, path::Path, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Configuration of the anchor template and the grid it is tiled over.
///
/// Stored as TOML, every field is optional and falls back to its default:
///
/// ```toml
/// base_size = 16.0
/// ratios = [0.5, 1.0, 2.0]
/// scales = [16.0, 32.0, 64.0]
///
/// [grid]
/// tiles_x = 32
/// tiles_y = 32
/// stride_x = 16.0
/// stride_y = 16.0
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnchorConfig {
    /// Side length of the square base anchor, in pixels.
    pub base_size: f32,
    /// Aspect ratios (width:height) of the template anchors.
    pub ratios: Vec<f32>,
    /// Scales applied to the base size, the anchor area is `(scale * base_size)^2`.
    pub scales: Vec<f32>,
    pub grid: GridConfig,
}

impl Default for AnchorConfig {
    fn default() -> Self {
        Self {
            base_size: 16.0,
            ratios: vec![0.5, 1.0, 2.0],
            scales: vec![16.0, 32.0, 64.0],
            grid: GridConfig::default(),
        }
    }
}

/// The grid the anchor template is repeated over.
///
/// Strides may be negative to pad anchors in the negative direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub tiles_x: usize,
    pub tiles_y: usize,
    pub stride_x: f32,
    pub stride_y: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            tiles_x: 32,
            tiles_y: 32,
            stride_x: 16.0,
            stride_y: 16.0,
        }
    }
}

// NaN is not positive
fn is_positive(value: f32) -> bool {
    value > 0.0
}

impl AnchorConfig {
    /// Load and validate a configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let config: Self = contents.parse()?;

        tracing::debug!(?path, ?config, "loaded anchor configuration");

        Ok(config)
    }

    /// Check that the base size and every ratio and scale are strictly positive.
    pub fn validate(&self) -> Result<()> {
        if !is_positive(self.base_size) {
            return Err(Error::InvalidConfig(format!(
                "base_size must be positive, got {}",
                self.base_size
            )));
        }

        if let Some(ratio) = self.ratios.iter().find(|r| !is_positive(**r)) {
            return Err(Error::InvalidConfig(format!(
                "ratios must be positive, got {ratio}"
            )));
        }

        if let Some(scale) = self.scales.iter().find(|s| !is_positive(**s)) {
            return Err(Error::InvalidConfig(format!(
                "scales must be positive, got {scale}"
            )));
        }

        if self.ratios.is_empty() || self.scales.is_empty() {
            tracing::warn!("anchor configuration produces an empty template");
        }

        Ok(())
    }

    /// Number of anchors in the template.
    #[must_use]
    pub fn num_template_anchors(&self) -> usize {
        self.ratios.len() * self.scales.len()
    }

    /// Number of anchors after tiling the template over the grid.
    #[must_use]
    pub fn num_tiled_anchors(&self) -> usize {
        self.num_template_anchors() * self.grid.tiles_x * self.grid.tiles_y
    }
}

impl FromStr for AnchorConfig {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
}
