use eframe::egui::{self, Color32, RichText, Ui};

use tracer_dashboard::data::filter::Selection;
use tracer_dashboard::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Tracer Study");
    ui.separator();

    let Some((min_year, max_year)) = state.table.as_ref().and_then(|t| t.year_range) else {
        ui.label("No dataset loaded.");
        return;
    };

    // ---- Year ----
    ui.strong("Pilih Tahun Survey");
    let mut year = state.filter.year;
    ui.add(egui::Slider::new(&mut year, min_year..=max_year));
    state.set_year(year);
    ui.add_space(8.0);

    // ---- Faculty ----
    ui.strong("Pilih Fakultas");
    let current = state.filter.faculty.clone();
    if let Some(choice) = selection_combo(ui, "faculty", &current, &state.faculty_options()) {
        state.set_faculty(choice);
    }
    ui.add_space(8.0);

    // ---- Program (depends on faculty) ----
    ui.strong("Pilih Program Studi");
    let current = state.filter.program.clone();
    if let Some(choice) = selection_combo(ui, "program", &current, &state.program_options()) {
        state.set_program(choice);
    }
}

/// A combo box over `options`; returns the newly clicked option, if any.
fn selection_combo(
    ui: &mut Ui,
    id: &str,
    current: &Selection,
    options: &[Selection],
) -> Option<Selection> {
    let mut clicked = None;
    egui::ComboBox::from_id_salt(id)
        .selected_text(current.to_string())
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for option in options {
                if ui
                    .selectable_label(option == current, option.to_string())
                    .clicked()
                {
                    clicked = Some(option.clone());
                }
            }
        });
    clicked
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let can_export = state.table.is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Export summary…"))
                .clicked()
            {
                save_summary_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(source) = state.source.as_ref().and_then(|p| p.file_name()) {
            ui.label(source.to_string_lossy().into_owned());
        }
        if let Some(table) = &state.table {
            ui.label(format!(
                "{} respondents loaded, {} match the filter",
                table.len(),
                state.visible_rows()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open tracer study data")
        .add_filter("Supported files", &["csv", "tsv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv", "tsv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        // Failures land in the status line.
        let _ = state.load_path(&path);
    }
}

pub fn save_summary_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export summary")
        .add_filter("JSON", &["json"])
        .set_file_name("tracer_summary.json")
        .save_file();

    if let Some(path) = file {
        if let Err(e) = state.export_summary(&path) {
            log::error!("Failed to export summary: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
