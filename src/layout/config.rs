//! Configuration for the layout engine

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading a layout configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read layout config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse layout config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("spacing '{field}' must not be negative (got {value})")]
    NegativeSpacing { field: &'static str, value: f64 },
}

/// Spacing and sizing knobs for [`LayoutCalculator`](super::LayoutCalculator)
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct LayoutConfig {
    /// Width given to nodes without a size, and minimum column width
    pub node_default_width: f64,

    /// Height given to nodes without a size, and height of collapsed placeholders
    pub node_default_height: f64,

    /// Gap between two rows
    pub vertical_cell_spacing: f64,

    /// Gap between two columns
    pub horizontal_cell_spacing: f64,

    /// Distance between parallel return lanes
    pub flow_spacing: f64,

    /// Margin added around flow bounds
    pub flow_padding: f64,

    /// Keep the entry node on its row instead of lifting it
    pub disable_vertical_displacement: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_default_width: 150.0,
            node_default_height: 60.0,
            vertical_cell_spacing: 30.0,
            horizontal_cell_spacing: 60.0,
            flow_spacing: 15.0,
            flow_padding: 5.0,
            disable_vertical_displacement: false,
        }
    }
}

impl LayoutConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load a configuration from a TOML string. Missing keys keep their defaults.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: LayoutConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject negative spacing values
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("node-default-width", self.node_default_width),
            ("node-default-height", self.node_default_height),
            ("vertical-cell-spacing", self.vertical_cell_spacing),
            ("horizontal-cell-spacing", self.horizontal_cell_spacing),
            ("flow-spacing", self.flow_spacing),
            ("flow-padding", self.flow_padding),
        ];
        match fields.into_iter().find(|(_, value)| *value < 0.0) {
            Some((field, value)) => Err(ConfigError::NegativeSpacing { field, value }),
            None => Ok(()),
        }
    }

    /// Set the size used for nodes without one
    pub fn with_node_default_size(mut self, width: f64, height: f64) -> Self {
        self.node_default_width = width;
        self.node_default_height = height;
        self
    }

    /// Set the gaps between rows and columns
    pub fn with_cell_spacing(mut self, horizontal: f64, vertical: f64) -> Self {
        self.horizontal_cell_spacing = horizontal;
        self.vertical_cell_spacing = vertical;
        self
    }

    pub fn with_flow_spacing(mut self, spacing: f64) -> Self {
        self.flow_spacing = spacing;
        self
    }

    pub fn with_flow_padding(mut self, padding: f64) -> Self {
        self.flow_padding = padding;
        self
    }

    pub fn with_vertical_displacement(mut self, enabled: bool) -> Self {
        self.disable_vertical_displacement = !enabled;
        self
    }
}
