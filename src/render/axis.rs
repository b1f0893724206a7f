use crate::render::scale::{format_tick_value, LinearScale};

/// Approximate tick count per axis.
pub const TICK_COUNT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisSide {
    Bottom,
    Left,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    /// Offset along the axis in plot-local pixels.
    pub offset: f32,
    pub label: String,
}

/// One axis of the current frame. Rebuilt outright on every render.
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    pub side: AxisSide,
    pub title: String,
    pub ticks: Vec<Tick>,
    /// Pixel extent of the axis line.
    pub span: (f32, f32),
}

impl Axis {
    pub fn build(side: AxisSide, scale: &LinearScale, title: &str) -> Self {
        let ticks = scale
            .ticks(TICK_COUNT)
            .into_iter()
            .map(|v| Tick {
                offset: scale.map(v) as f32,
                label: format_tick_value(v),
            })
            .collect();
        let (r0, r1) = scale.range();
        Self {
            side,
            title: title.to_string(),
            ticks,
            span: (r0.min(r1) as f32, r0.max(r1) as f32),
        }
    }
}
