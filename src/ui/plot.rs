use eframe::egui::Ui;
use egui_plot::{Corner, Legend, Line, Plot, PlotPoints};

use s21_compensator::data::export::{compensated_series, raw_s21_series, PlotSeries};

use crate::color::SeriesColors;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Charts (central panel)
// ---------------------------------------------------------------------------

/// Render the raw and compensated S21 charts stacked vertically.
pub fn sweep_plots(ui: &mut Ui, state: &AppState) {
    let (Some(set), Some(result), true) = (
        state.measurement_set(),
        state.compensation.as_ref(),
        state.show_charts,
    ) else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open sweeps (File → Open…), pick a reference, then Process and Plot");
        });
        return;
    };

    let dark = state.prefs.dark_mode;
    let height = (ui.available_height() - ui.spacing().item_spacing.y) / 2.0;

    series_plot(ui, "raw_s21", "S21 (dB)", &raw_s21_series(set), dark, height);
    series_plot(
        ui,
        "compensated_s21",
        "Compensated S21 (dB)",
        &compensated_series(set, result),
        dark,
        height,
    );
}

fn series_plot(
    ui: &mut Ui,
    id: &str,
    y_label: &str,
    series: &[PlotSeries],
    dark_mode: bool,
    height: f32,
) {
    let colors = SeriesColors::new(series.len(), dark_mode);

    Plot::new(id)
        .height(height)
        .legend(Legend::default().position(Corner::RightBottom))
        .x_axis_label("Frequency (GHz)")
        .y_axis_label(y_label)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (idx, s) in series.iter().enumerate() {
                let points: PlotPoints = s.points.iter().copied().collect();
                let line = Line::new(points)
                    .name(&s.label)
                    .color(colors.color_for(idx))
                    .width(2.0);
                plot_ui.line(line);
            }
        });
}
