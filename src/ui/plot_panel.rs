use crate::config::PlotConfig;
use crate::render::axis::{Axis, AxisSide};
use crate::render::engine::{MarkPhase, RenderEngine};
use crate::state::theme::Theme;

/// Fill opacity of every mark.
const MARK_OPACITY: f32 = 0.5;
/// Outline width of the hovered mark.
const HOVER_STROKE_WIDTH: f32 = 4.0;
const TICK_LENGTH: f32 = 6.0;

/// Result of painting one frame of the plot.
pub struct PlotResponse {
    /// Dataset row under the pointer, with the pointer position.
    pub hovered: Option<(usize, egui::Pos2)>,
}

/// Paint the canvas: axes, titles and every mark sampled at `now`.
pub fn show_plot(
    ui: &mut egui::Ui,
    engine: &RenderEngine,
    config: &PlotConfig,
    theme: &Theme,
    now: f64,
) -> PlotResponse {
    let (canvas, response) = ui.allocate_exact_size(
        egui::vec2(config.width, config.height),
        egui::Sense::hover(),
    );
    let painter = ui.painter_at(canvas);
    painter.rect_filled(canvas, 0.0, theme.plot_bg());

    let origin = canvas.min + egui::vec2(config.margin.left, config.margin.top);
    let inner = egui::vec2(config.inner_width(), config.inner_height());

    let frame = engine.frame();
    draw_axis(&painter, &frame.x_axis, origin, inner, theme);
    draw_axis(&painter, &frame.y_axis, origin, inner, theme);
    draw_axis_titles(&painter, frame.x_axis.title.as_str(), frame.y_axis.title.as_str(), origin, inner, config, theme);

    let hovered = response
        .hover_pos()
        .and_then(|pos| engine.hit_test((pos - origin).to_pos2()).map(|row| (row, pos)));

    for mark in engine.marks_at(now) {
        let center = origin + mark.visual.center.to_vec2();
        let is_hovered =
            mark.phase != MarkPhase::Exiting && hovered.is_some_and(|(row, _)| row == mark.row);
        let stroke = if is_hovered {
            egui::Stroke::new(HOVER_STROKE_WIDTH, theme.hover_outline())
        } else {
            egui::Stroke::NONE
        };
        painter.circle(
            center,
            mark.visual.radius,
            mark.visual.fill.gamma_multiply(MARK_OPACITY),
            stroke,
        );
    }

    PlotResponse { hovered }
}

fn draw_axis(
    painter: &egui::Painter,
    axis: &Axis,
    origin: egui::Pos2,
    inner: egui::Vec2,
    theme: &Theme,
) {
    let color = theme.axis_color();
    let stroke = egui::Stroke::new(1.0, color);
    let font = egui::FontId::proportional(10.0);
    let (a, b) = axis.span;

    match axis.side {
        AxisSide::Bottom => {
            let y = origin.y + inner.y;
            painter.line_segment(
                [egui::pos2(origin.x + a, y), egui::pos2(origin.x + b, y)],
                stroke,
            );
            for tick in &axis.ticks {
                let x = origin.x + tick.offset;
                painter.line_segment([egui::pos2(x, y), egui::pos2(x, y + TICK_LENGTH)], stroke);
                painter.text(
                    egui::pos2(x, y + TICK_LENGTH + 3.0),
                    egui::Align2::CENTER_TOP,
                    &tick.label,
                    font.clone(),
                    color,
                );
            }
        }
        AxisSide::Left => {
            let x = origin.x;
            painter.line_segment(
                [egui::pos2(x, origin.y + a), egui::pos2(x, origin.y + b)],
                stroke,
            );
            for tick in &axis.ticks {
                let y = origin.y + tick.offset;
                painter.line_segment([egui::pos2(x - TICK_LENGTH, y), egui::pos2(x, y)], stroke);
                painter.text(
                    egui::pos2(x - TICK_LENGTH - 3.0, y),
                    egui::Align2::RIGHT_CENTER,
                    &tick.label,
                    font.clone(),
                    color,
                );
            }
        }
    }
}

fn draw_axis_titles(
    painter: &egui::Painter,
    x_title: &str,
    y_title: &str,
    origin: egui::Pos2,
    inner: egui::Vec2,
    config: &PlotConfig,
    theme: &Theme,
) {
    let color = theme.axis_color();
    let font = egui::FontId::proportional(13.0);

    painter.text(
        egui::pos2(origin.x + inner.x / 2.0, origin.y + inner.y + config.margin.bottom - 20.0),
        egui::Align2::CENTER_CENTER,
        x_title,
        font.clone(),
        color,
    );

    // Rotated a quarter turn counter-clockwise, centered on the left margin.
    let galley = painter.layout_no_wrap(y_title.to_string(), font, color);
    let size = galley.rect.size();
    let center = egui::pos2(origin.x - config.margin.left + 40.0, origin.y + inner.y / 2.0);
    let pos = egui::pos2(center.x - size.y / 2.0, center.y + size.x / 2.0);
    painter.add(
        egui::epaint::TextShape::new(pos, galley, color)
            .with_angle(-std::f32::consts::FRAC_PI_2),
    );
}
