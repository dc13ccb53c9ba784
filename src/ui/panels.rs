use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use s21_compensator::data::export::DEFAULT_EXPORT_NAME;
use s21_compensator::data::model::FileOutcome;

use crate::state::{AppState, StatusKind};

// ---------------------------------------------------------------------------
// Left side panel – settings, file list and actions
// ---------------------------------------------------------------------------

/// Render the left control panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Settings");
    ui.separator();

    // ---- Fallback window (files without BEGIN/END) ----
    egui::Grid::new("extract_settings")
        .num_columns(2)
        .spacing([8.0, 4.0])
        .show(ui, |ui: &mut Ui| {
            ui.label("Skip rows");
            ui.add(egui::DragValue::new(&mut state.prefs.extract.skip_rows).range(0..=10_000));
            ui.end_row();

            ui.label("Max rows");
            ui.add(egui::DragValue::new(&mut state.prefs.extract.max_rows).range(1..=1_000_000));
            ui.end_row();
        });
    ui.small("Used only when a file has no BEGIN/END block.");
    ui.separator();

    // ---- Reference selector ----
    ui.strong("Reference");
    let labels: Vec<String> = state
        .measurement_set()
        .map(|set| set.labels().map(str::to_string).collect())
        .unwrap_or_default();
    let selected_text = if state.reference.is_empty() {
        "(select)".to_string()
    } else {
        state.reference.clone()
    };
    egui::ComboBox::from_id_salt("reference")
        .selected_text(selected_text)
        .show_ui(ui, |ui: &mut Ui| {
            for label in &labels {
                ui.selectable_value(&mut state.reference, label.clone(), label);
            }
        });
    ui.separator();

    // ---- Actions ----
    let has_data = state.measurement_set().is_some();
    let has_result = state.compensation.is_some();
    ui.horizontal_wrapped(|ui: &mut Ui| {
        if ui.add_enabled(has_data, egui::Button::new("Process Data")).clicked() {
            state.process();
        }
        if ui.add_enabled(has_result, egui::Button::new("Plot Charts")).clicked() {
            state.plot();
        }
        if ui.add_enabled(has_result, egui::Button::new("Export CSV")).clicked() {
            save_file_dialog(state);
        }
        if ui.button("Clear").clicked() {
            state.clear();
        }
    });
    ui.separator();

    // ---- Loaded files ----
    ui.strong("Files");
    let Some(report) = &state.report else {
        ui.label("No files loaded.");
        return;
    };
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for (label, outcome) in &report.files {
                ui.horizontal(|ui: &mut Ui| {
                    ui.label(label);
                    let text = RichText::new(outcome.to_string()).small();
                    match outcome {
                        FileOutcome::Loaded { .. } => ui.label(text),
                        FileOutcome::Failed(reason) => {
                            ui.label(text.color(Color32::RED)).on_hover_text(reason)
                        }
                    };
                });
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_files_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.compensation.is_some(), egui::Button::new("Export…"))
                .clicked()
            {
                save_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(set) = state.measurement_set() {
            ui.label(format!(
                "{} sweeps loaded, {} frequency points",
                set.len(),
                set.frequency_axis().len()
            ));
            ui.separator();
        }

        let theme_label = if state.prefs.dark_mode { "☀ Light" } else { "🌙 Dark" };
        if ui.button(theme_label).clicked() {
            state.toggle_theme();
        }

        if let Some(status) = &state.status {
            let color = match status.kind {
                StatusKind::Info => ui.visuals().text_color(),
                StatusKind::Success => Color32::from_rgb(16, 185, 129),
                StatusKind::Error => Color32::RED,
            };
            ui.label(RichText::new(&status.text).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_files_dialog(state: &mut AppState) {
    let files = rfd::FileDialog::new()
        .set_title("Open S-parameter sweeps")
        .add_filter("CSV", &["csv"])
        .add_filter("All files", &["*"])
        .pick_files();

    if let Some(paths) = files {
        state.load_paths(&paths);
    }
}

pub fn save_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export compensated S21")
        .set_file_name(DEFAULT_EXPORT_NAME)
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        state.export(&path);
    }
}
