use eframe::egui::{ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;

const TABLE_HEIGHT: f32 = 420.0;
const ROW_HEIGHT: f32 = 18.0;

// ---------------------------------------------------------------------------
// Raw data table
// ---------------------------------------------------------------------------

/// Render the filtered rows with every source column.
pub fn raw_table(ui: &mut Ui, state: &AppState) {
    let Some(view) = state.view() else {
        return;
    };
    let dataset = view.dataset();
    let columns = &dataset.column_names;
    let rows = view.indices();

    ScrollArea::horizontal()
        .id_salt("raw_table_scroll")
        .show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .max_scroll_height(TABLE_HEIGHT)
                .columns(Column::auto().at_least(60.0), columns.len())
                .header(22.0, |mut header| {
                    for col in columns {
                        header.col(|ui| {
                            ui.strong(col);
                        });
                    }
                })
                .body(|body| {
                    body.rows(ROW_HEIGHT, rows.len(), |mut row| {
                        let emp = &dataset.employees[rows[row.index()]];
                        for col in columns {
                            let cell = emp.cell(col);
                            row.col(|ui| {
                                if cell.is_null() {
                                    ui.weak("null");
                                } else {
                                    ui.label(cell.to_string());
                                }
                            });
                        }
                    });
                });
        });
}
