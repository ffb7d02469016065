use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::ColumnId;
use crate::data::view::{cell_text, sort_indicator, ColumnDescriptor};
use crate::state::{AppState, LoadState};

const HEADER_HEIGHT: f32 = 52.0;
const ROW_HEIGHT: f32 = 20.0;

/// A header interaction, applied once the table has been drawn.
enum TableAction {
    Filter(ColumnId, String),
    Sort(ColumnId),
}

// ---------------------------------------------------------------------------
// Data table (central panel)
// ---------------------------------------------------------------------------

/// Render the table, or the loading / error placeholder.
pub fn data_table(ui: &mut Ui, state: &mut AppState) {
    match state.load_state() {
        LoadState::Idle => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a file or URL to view a table  (File → Open…)");
            });
            return;
        }
        LoadState::Loading => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.spinner();
            });
            return;
        }
        LoadState::Failed(msg) => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.label(RichText::new(format!("Error: {msg}")).color(Color32::RED));
            });
            return;
        }
        LoadState::Ready => {}
    }

    let actions = {
        let Some(view) = state.view() else {
            return;
        };
        if view.columns.is_empty() {
            ui.weak("The dataset has no rows.");
            return;
        }

        let mut actions = Vec::new();

        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .columns(Column::auto().at_least(80.0).clip(true), view.columns.len())
            .header(HEADER_HEIGHT, |mut header| {
                for col in &view.columns {
                    header.col(|ui: &mut Ui| {
                        column_header(ui, col, &mut actions);
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, view.rows.len(), |mut row| {
                    let record = view.rows[row.index()];
                    for col in &view.columns {
                        row.col(|ui: &mut Ui| {
                            ui.label(cell_text(record, col.id));
                        });
                    }
                });
            });
        actions
    };

    for action in actions {
        match action {
            TableAction::Filter(column, value) => state.set_filter(column, value),
            TableAction::Sort(column) => state.toggle_sort(&column),
        }
    }
}

/// Clickable title (cycles sort) above the column's filter selector.
fn column_header(ui: &mut Ui, col: &ColumnDescriptor<'_>, actions: &mut Vec<TableAction>) {
    ui.vertical(|ui: &mut Ui| {
        let title = format!("{}{}", col.id, sort_indicator(col.sort));
        if ui
            .add(egui::Button::new(RichText::new(title).strong()).frame(false))
            .clicked()
        {
            actions.push(TableAction::Sort(col.id.clone()));
        }

        egui::ComboBox::from_id_salt(("filter", &**col.id))
            .selected_text(col.selected.unwrap_or("All"))
            .show_ui(ui, |ui: &mut Ui| {
                if ui.selectable_label(col.selected.is_none(), "All").clicked() {
                    actions.push(TableAction::Filter(col.id.clone(), String::new()));
                }
                // An empty choice would clear the filter, same as "All".
                for value in col.choices.iter().filter(|v| !v.is_empty()) {
                    let is_selected = col.selected == Some(value.as_str());
                    if ui.selectable_label(is_selected, value.as_str()).clicked() {
                        actions.push(TableAction::Filter(col.id.clone(), value.clone()));
                    }
                }
            });
    });
}
