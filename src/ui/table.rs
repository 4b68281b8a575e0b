use eframe::egui::{RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::charts::TableView;

const ROW_HEIGHT: f32 = 20.0;

/// Render the aggregated table, or its placeholder prompt.
pub fn data_table(ui: &mut Ui, table: &TableView) {
    let (header, rows) = match table {
        TableView::Placeholder(prompt) => {
            ui.label(RichText::new(prompt).italics());
            return;
        }
        TableView::Rows { header, rows } => (header, rows),
    };

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .vscroll(false)
        .columns(Column::auto().at_least(90.0), header.len())
        .header(ROW_HEIGHT + 2.0, |mut row| {
            for name in header {
                row.col(|ui: &mut Ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, rows.len(), |mut row| {
                let cells = &rows[row.index()];
                for cell in cells {
                    row.col(|ui: &mut Ui| {
                        ui.label(cell);
                    });
                }
            });
        });
}
