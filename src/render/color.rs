use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::data::observation::Observation;

/// Decides the fill of a mark. Evaluated on enter and again on every update.
pub trait FillRule: Send + Sync {
    fn fill(&self, obs: &Observation) -> Color32;
}

/// Every mark gets the same color.
#[derive(Debug, Clone, Copy)]
pub struct ConstantFill(pub Color32);

impl Default for ConstantFill {
    fn default() -> Self {
        ConstantFill(Color32::from_rgb(0x61, 0xaf, 0xef))
    }
}

impl FillRule for ConstantFill {
    fn fill(&self, _obs: &Observation) -> Color32 {
        self.0
    }
}

/// Upper bounds (inclusive, °F) of the average-temperature bands.
pub const TEMPERATURE_BANDS: [f64; 4] = [32.0, 50.0, 65.0, 85.0];

/// Five fixed colors, coldest first; the last one covers everything above 85.
pub const TEMPERATURE_COLORS: [Color32; 5] = [
    Color32::from_rgb(0x45, 0x75, 0xb4),
    Color32::from_rgb(0x91, 0xbf, 0xdb),
    Color32::from_rgb(0xfe, 0xe0, 0x90),
    Color32::from_rgb(0xfc, 0x8d, 0x59),
    Color32::from_rgb(0xd7, 0x30, 0x27),
];

/// Fill for rows without an average temperature.
pub const MISSING_TEMPERATURE: Color32 = Color32::from_rgb(0x99, 0x99, 0x99);

/// Colors marks by average temperature band.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemperatureBands;

impl TemperatureBands {
    pub fn color_for(temp_avg: f64) -> Color32 {
        if temp_avg.is_nan() {
            return MISSING_TEMPERATURE;
        }
        let band = TEMPERATURE_BANDS
            .iter()
            .position(|&upper| temp_avg <= upper)
            .unwrap_or(TEMPERATURE_BANDS.len());
        TEMPERATURE_COLORS[band]
    }
}

impl FillRule for TemperatureBands {
    fn fill(&self, obs: &Observation) -> Color32 {
        Self::color_for(obs.temp_avg)
    }
}

/// Configurable choice of fill rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FillScheme {
    #[default]
    Constant,
    Temperature,
}

impl FillScheme {
    pub fn rule(&self) -> Box<dyn FillRule> {
        match self {
            FillScheme::Constant => Box::new(ConstantFill::default()),
            FillScheme::Temperature => Box::new(TemperatureBands),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FillScheme::Constant => "Constant",
            FillScheme::Temperature => "Temperature bands",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_edges_are_inclusive() {
        assert_eq!(TemperatureBands::color_for(32.0), TEMPERATURE_COLORS[0]);
        assert_eq!(TemperatureBands::color_for(32.5), TEMPERATURE_COLORS[1]);
        assert_eq!(TemperatureBands::color_for(50.0), TEMPERATURE_COLORS[1]);
        assert_eq!(TemperatureBands::color_for(65.0), TEMPERATURE_COLORS[2]);
        assert_eq!(TemperatureBands::color_for(85.0), TEMPERATURE_COLORS[3]);
        assert_eq!(TemperatureBands::color_for(85.1), TEMPERATURE_COLORS[4]);
        assert_eq!(TemperatureBands::color_for(-40.0), TEMPERATURE_COLORS[0]);
    }

    #[test]
    fn missing_temperature_is_gray() {
        assert_eq!(TemperatureBands::color_for(f64::NAN), MISSING_TEMPERATURE);
    }

    #[test]
    fn constant_ignores_row() {
        let mut obs = Observation::blank("S1", "MD");
        obs.temp_avg = 99.0;
        assert_eq!(ConstantFill::default().fill(&obs), Color32::from_rgb(0x61, 0xaf, 0xef));
    }
}
