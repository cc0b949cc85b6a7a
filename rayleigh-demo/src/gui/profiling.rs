use egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2};
use rayleigh_core::FrameTimingEvent;
use std::collections::VecDeque;

/// Format time in microseconds to the most appropriate unit (µs, ms, or s)
fn format_time_auto(time_us: u64) -> String {
    let time_us_f = time_us as f64;

    if time_us < 1_000 {
        format!("{:.2} µs", time_us_f)
    } else if time_us < 1_000_000 {
        format!("{:.2} ms", time_us_f / 1_000.0)
    } else {
        format!("{:.2} s", time_us_f / 1_000_000.0)
    }
}

/// One plotted series: picks a timing field and how to stroke it
struct Series {
    label: &'static str,
    color: Color32,
    width: f32,
    value: fn(&FrameTimingEvent) -> u64,
}

const SERIES: [Series; 3] = [
    Series {
        label: "Total",
        color: Color32::WHITE,
        width: 2.0,
        value: |t| t.total_time_us,
    },
    Series {
        label: "Update",
        color: Color32::LIGHT_BLUE,
        width: 1.5,
        value: |t| t.update_time_us,
    },
    Series {
        label: "Tally",
        color: Color32::YELLOW,
        width: 1.5,
        value: |t| t.tally_time_us,
    },
];

/// Draw a performance profiling widget showing step timing history
///
/// # Arguments
/// * `ui` - The egui UI context
/// * `timing_history` - History of per-step timing events
/// * `frame_budget_us` - Time available per animation frame in microseconds
pub fn draw_profiling_widget(
    ui: &mut egui::Ui,
    timing_history: &VecDeque<FrameTimingEvent>,
    frame_budget_us: u64,
) {
    ui.collapsing("Performance Profiling", |ui| {
        let Some(latest) = timing_history.back() else {
            ui.label("No timing data available yet...");
            return;
        };

        let utilization =
            (latest.total_time_us as f32 / frame_budget_us.max(1) as f32 * 100.0).min(999.0);

        ui.heading("Current Step");
        ui.label(format!(
            "Total: {} ({:.1}%)",
            format_time_auto(latest.total_time_us),
            utilization
        ));
        ui.label(format!("Update: {}", format_time_auto(latest.update_time_us)));
        ui.label(format!("Tally: {}", format_time_auto(latest.tally_time_us)));
        ui.label(format!("Segments: {}", latest.segment_count));
        ui.label(format!("Budget: {}", format_time_auto(frame_budget_us)));

        if utilization > 90.0 {
            ui.colored_label(Color32::RED, "⚠ WARNING: Step exceeds frame budget soon!");
        } else if utilization > 70.0 {
            ui.colored_label(Color32::YELLOW, "⚠ Caution: High CPU usage");
        }

        ui.add_space(10.0);

        let (response, painter) =
            ui.allocate_painter(Vec2::new(ui.available_width(), 200.0), egui::Sense::hover());
        let rect = response.rect;
        painter.rect_filled(rect, 0.0, Color32::from_gray(20));

        if timing_history.len() < 2 {
            return;
        }

        let peak = timing_history
            .iter()
            .map(|t| t.total_time_us)
            .max()
            .unwrap_or(frame_budget_us);
        let max_y_value = (frame_budget_us as f32 * 1.2).max(peak as f32).max(1.0);
        let to_y = |time_us: u64| rect.max.y - (time_us as f32 / max_y_value) * rect.height();

        let budget_y = to_y(frame_budget_us);
        painter.line_segment(
            [Pos2::new(rect.min.x, budget_y), Pos2::new(rect.max.x, budget_y)],
            Stroke::new(2.0, Color32::RED),
        );
        painter.text(
            Pos2::new(rect.max.x - 5.0, budget_y - 5.0),
            egui::Align2::RIGHT_BOTTOM,
            format_time_auto(frame_budget_us),
            egui::FontId::proportional(10.0),
            Color32::RED,
        );

        let x_step = rect.width() / (timing_history.len() - 1) as f32;
        for series in &SERIES {
            let points: Vec<Pos2> = timing_history
                .iter()
                .enumerate()
                .map(|(i, timing)| {
                    Pos2::new(rect.min.x + i as f32 * x_step, to_y((series.value)(timing)))
                })
                .collect();
            for window in points.windows(2) {
                painter.line_segment(
                    [window[0], window[1]],
                    Stroke::new(series.width, series.color),
                );
            }
        }

        draw_legend(&painter, rect);

        // Y axis in milliseconds
        let num_y_labels = 5;
        for i in 0..=num_y_labels {
            let fraction = i as f32 / num_y_labels as f32;
            let y = rect.max.y - fraction * rect.height();
            painter.text(
                Pos2::new(rect.min.x + 2.0, y),
                egui::Align2::LEFT_CENTER,
                format!("{:.1}", max_y_value / 1000.0 * fraction),
                egui::FontId::proportional(9.0),
                Color32::GRAY,
            );
        }
    });
}

fn draw_legend(painter: &Painter, rect: Rect) {
    let legend_x = rect.min.x + 10.0;
    let mut legend_y = rect.min.y + 10.0;

    for series in &SERIES {
        painter.line_segment(
            [
                Pos2::new(legend_x, legend_y),
                Pos2::new(legend_x + 20.0, legend_y),
            ],
            Stroke::new(series.width, series.color),
        );
        painter.text(
            Pos2::new(legend_x + 25.0, legend_y),
            egui::Align2::LEFT_CENTER,
            series.label,
            egui::FontId::proportional(10.0),
            series.color,
        );
        legend_y += 15.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time_auto() {
        assert_eq!(format_time_auto(250), "250.00 µs");
        assert_eq!(format_time_auto(16_667), "16.67 ms");
        assert_eq!(format_time_auto(2_500_000), "2.50 s");
    }

    #[test]
    fn test_series_fields() {
        let timing = FrameTimingEvent {
            frame: 3,
            update_time_us: 10,
            tally_time_us: 2,
            total_time_us: 15,
            segment_count: 40,
        };
        let values: Vec<u64> = SERIES.iter().map(|s| (s.value)(&timing)).collect();
        assert_eq!(values, vec![15, 10, 2]);
    }
}
