use egui::{Color32, Pos2};

/// Cubic in-out easing over `t` in `[0, 1]`.
pub fn ease_cubic_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0) * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let t = t - 2.0;
        (t * t * t + 2.0) / 2.0
    }
}

fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

fn lerp_u8(a: u8, b: u8, t: f32) -> u8 {
    lerp_f32(a as f32, b as f32, t).round().clamp(0.0, 255.0) as u8
}

pub fn lerp_color(a: Color32, b: Color32, t: f32) -> Color32 {
    let [ar, ag, ab, aa] = a.to_srgba_unmultiplied();
    let [br, bg, bb, ba] = b.to_srgba_unmultiplied();
    Color32::from_rgba_unmultiplied(
        lerp_u8(ar, br, t),
        lerp_u8(ag, bg, t),
        lerp_u8(ab, bb, t),
        lerp_u8(aa, ba, t),
    )
}

/// The animatable attributes of one mark, in plot-local pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkVisual {
    pub center: Pos2,
    pub radius: f32,
    pub fill: Color32,
}

impl MarkVisual {
    pub fn lerp(&self, to: &MarkVisual, t: f32) -> MarkVisual {
        MarkVisual {
            center: self.center.lerp(to.center, t),
            radius: lerp_f32(self.radius, to.radius, t),
            fill: lerp_color(self.fill, to.fill, t),
        }
    }
}

/// A single timed interpolation between two visual states.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub from: MarkVisual,
    pub to: MarkVisual,
    /// Start time in seconds, on the same clock as the `now` passed to [`Transition::sample`].
    pub start: f64,
    pub duration: f64,
}

impl Transition {
    pub fn new(from: MarkVisual, to: MarkVisual, start: f64, duration: f64) -> Self {
        Self {
            from,
            to,
            start,
            duration,
        }
    }

    /// Linear progress in `[0, 1]`.
    pub fn progress(&self, now: f64) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        ((now - self.start) / self.duration).clamp(0.0, 1.0) as f32
    }

    pub fn is_finished(&self, now: f64) -> bool {
        self.progress(now) >= 1.0
    }

    /// Interpolated visual state at `now`.
    pub fn sample(&self, now: f64) -> MarkVisual {
        let t = self.progress(now);
        if t >= 1.0 {
            return self.to;
        }
        self.from.lerp(&self.to, ease_cubic_in_out(t))
    }
}
