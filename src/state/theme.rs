use egui::{Color32, Visuals};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Theme {
    Dark,
    Light,
}

impl Theme {
    pub fn toggle(&self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn visuals(&self) -> Visuals {
        match self {
            Theme::Dark => Visuals::dark(),
            Theme::Light => Visuals::light(),
        }
    }

    pub fn plot_bg(&self) -> Color32 {
        match self {
            Theme::Dark => Color32::from_rgb(20, 20, 20),
            Theme::Light => Color32::from_rgb(255, 255, 255),
        }
    }

    /// Axis lines, ticks and tick labels.
    pub fn axis_color(&self) -> Color32 {
        match self {
            Theme::Dark => Color32::from_gray(190),
            Theme::Light => Color32::from_gray(40),
        }
    }

    /// Outline drawn around the hovered mark.
    pub fn hover_outline(&self) -> Color32 {
        match self {
            Theme::Dark => Color32::WHITE,
            Theme::Light => Color32::BLACK,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::Light
    }
}
