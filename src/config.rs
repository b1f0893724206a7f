use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::render::color::FillScheme;
use crate::state::selection::Selection;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            top: 80.0,
            right: 60.0,
            bottom: 60.0,
            left: 100.0,
        }
    }
}

/// Plot configuration. Every field has a default, so a config file only
/// needs to name what it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    /// Full canvas width including margins.
    pub width: f32,
    /// Full canvas height including margins.
    pub height: f32,
    pub margin: Margin,
    /// Shared duration of every transition in one render.
    pub transition_ms: u64,
    /// Radius a mark settles at after entering or updating.
    pub mark_radius: f32,
    pub fill: FillScheme,
    pub default_selection: Selection,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            margin: Margin::default(),
            transition_ms: 250,
            mark_radius: 5.0,
            fill: FillScheme::default(),
            default_selection: Selection::default(),
        }
    }
}

impl PlotConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&text)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Plot area width, inside the margins.
    pub fn inner_width(&self) -> f32 {
        (self.width - self.margin.left - self.margin.right).max(0.0)
    }

    /// Plot area height, inside the margins.
    pub fn inner_height(&self) -> f32 {
        (self.height - self.margin.top - self.margin.bottom).max(0.0)
    }

    pub fn transition_secs(&self) -> f64 {
        self.transition_ms as f64 / 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::attribute::Attribute;

    #[test]
    fn defaults_match_canvas_layout() {
        let c = PlotConfig::default();
        assert_eq!(c.inner_width(), 640.0);
        assert_eq!(c.inner_height(), 460.0);
        assert_eq!(c.transition_secs(), 0.25);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let c: PlotConfig = serde_json::from_str(
            r#"{ "transition_ms": 1000, "fill": "temperature", "default_selection": { "x": "snow" } }"#,
        )
        .unwrap();
        assert_eq!(c.transition_ms, 1000);
        assert_eq!(c.fill, FillScheme::Temperature);
        assert_eq!(c.default_selection.x, Attribute::Snow);
        assert_eq!(c.default_selection.y, Attribute::TempMax);
        assert_eq!(c.default_selection.state, "MD");
        assert_eq!(c.width, 800.0);
    }

    #[test]
    fn unknown_attribute_is_rejected() {
        let res: Result<PlotConfig, _> =
            serde_json::from_str(r#"{ "default_selection": { "x": "TMIN" } }"#);
        assert!(res.is_err());
    }
}
