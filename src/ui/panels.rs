use eframe::egui::{self, Button, Color32, RichText, Ui};

use crate::data::loader::Source;
use crate::data::view::sort_indicator;
use crate::state::{AppState, LoadState};

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar. Returns a source the user asked to load.
pub fn top_bar(ui: &mut Ui, state: &mut AppState, url_input: &mut String) -> Option<Source> {
    let mut requested = None;

    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                requested = open_file_dialog();
                ui.close_menu();
            }
            if ui
                .add_enabled(state.source().is_some(), Button::new("Reload"))
                .clicked()
            {
                requested = state.source().cloned();
                ui.close_menu();
            }
        });

        ui.separator();

        let response = ui.add(
            egui::TextEdit::singleline(url_input)
                .hint_text("https://…/data.csv")
                .desired_width(280.0),
        );
        let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if (ui.button("Load URL").clicked() || submitted) && !url_input.trim().is_empty() {
            requested = Some(Source::parse(url_input.trim()));
        }

        ui.separator();

        match state.load_state() {
            LoadState::Loading => {
                ui.spinner();
                if ui.small_button("Cancel").clicked() {
                    state.abandon_pending();
                }
            }
            LoadState::Failed(msg) => {
                ui.label(RichText::new(format!("Error: {msg}")).color(Color32::RED));
            }
            LoadState::Ready | LoadState::Idle => {}
        }

        if let Some(ds) = state.dataset() {
            ui.label(format!(
                "{} rows, {} visible",
                ds.len(),
                state.visible_indices().len()
            ));
            if let Some(sort) = state.sort() {
                ui.label(format!(
                    "sorted by {}{}",
                    sort.column,
                    sort_indicator(Some(sort.order))
                ));
            }
            if ui
                .add_enabled(!state.filters().is_empty(), Button::new("Clear filters"))
                .clicked()
            {
                state.clear_filters();
            }
        }
    });

    requested
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog() -> Option<Source> {
    rfd::FileDialog::new()
        .set_title("Open table")
        .add_filter("Supported files", &["csv", "tsv", "tab", "psv", "txt", "json"])
        .add_filter("CSV", &["csv", "txt"])
        .add_filter("TSV", &["tsv", "tab"])
        .add_filter("JSON", &["json"])
        .pick_file()
        .map(Source::Path)
}
