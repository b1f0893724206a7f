use crate::data::observation::Observation;

/// Offset of the tooltip's top-left corner from the pointer.
pub const TOOLTIP_OFFSET: egui::Vec2 = egui::vec2(20.0, -28.0);

fn fmt_value(v: f64) -> String {
    if v.is_nan() {
        "n/a".to_string()
    } else {
        format!("{v}")
    }
}

/// Body lines shown under the station heading.
pub fn tooltip_lines(obs: &Observation) -> Vec<String> {
    let date = match (obs.date, obs.month) {
        (Some(code), Some(month)) => format!("Date: {code} (month {month})"),
        (Some(code), None) => format!("Date: {code}"),
        (None, _) => "Date: n/a".to_string(),
    };
    vec![
        date,
        format!("Average wind speed: {}", fmt_value(obs.avg_wind)),
        format!("Latitude: {}", fmt_value(obs.latitude)),
        format!("Longitude: {}", fmt_value(obs.longitude)),
        format!("Elevation: {}", fmt_value(obs.elevation)),
        format!("Minimum temperature: {}", fmt_value(obs.temp_min)),
        format!("Maximum temperature: {}", fmt_value(obs.temp_max)),
        format!("Average temperature: {}", fmt_value(obs.temp_avg)),
        format!("Snow: {}", fmt_value(obs.snow)),
        format!("Precipitation: {}", fmt_value(obs.precipitation)),
    ]
}

/// Paint the detail panel for `obs` next to the pointer, on the tooltip layer.
pub fn show_tooltip(ctx: &egui::Context, obs: &Observation, pointer: egui::Pos2) {
    let painter = ctx.layer_painter(egui::LayerId::new(
        egui::Order::Tooltip,
        egui::Id::new("station_tooltip"),
    ));
    let visuals = ctx.style().visuals.clone();
    let text_color = visuals.text_color();

    let heading = painter.layout_no_wrap(
        format!("Weather station: {}", obs.station),
        egui::FontId::proportional(13.0),
        visuals.strong_text_color(),
    );
    let body = painter.layout_no_wrap(
        tooltip_lines(obs).join("\n"),
        egui::FontId::proportional(12.0),
        text_color,
    );

    let pad = 6.0;
    let origin = pointer + TOOLTIP_OFFSET;
    let width = heading.rect.width().max(body.rect.width());
    let height = heading.rect.height() + 4.0 + body.rect.height();
    let bg_rect = egui::Rect::from_min_size(
        origin,
        egui::vec2(width + 2.0 * pad, height + 2.0 * pad),
    );

    painter.rect_filled(bg_rect, 4.0, visuals.window_fill.gamma_multiply(0.95));
    painter.rect_stroke(
        bg_rect,
        4.0,
        visuals.window_stroke,
        egui::StrokeKind::Outside,
    );
    let text_pos = origin + egui::vec2(pad, pad);
    let heading_height = heading.rect.height();
    painter.galley(text_pos, heading, text_color);
    painter.galley(text_pos + egui::vec2(0.0, heading_height + 4.0), body, text_color);
}
