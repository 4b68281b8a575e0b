use eframe::egui::{self, RichText, ScrollArea, Ui};

use crate::config::DashboardConfig;
use crate::data::loader::FilePayload;
use crate::state::DashboardSession;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct RetailDashApp {
    pub session: DashboardSession,
}

impl RetailDashApp {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            session: DashboardSession::new(config),
        }
    }

    /// Only the first dropped file is used; the upload control is single-file.
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        if dropped.len() > 1 {
            log::warn!("{} files dropped, loading only the first", dropped.len());
        }
        let Some(file) = dropped.into_iter().next() else {
            return;
        };

        if let Some(bytes) = &file.bytes {
            let name = Some(file.name.clone()).filter(|n| !n.is_empty());
            panels::upload(&mut self.session, FilePayload::raw(name, bytes.to_vec()));
        } else if let Some(path) = &file.path {
            panels::upload_path(&mut self.session, path);
        }
    }

    fn handle_paste(&mut self, ctx: &egui::Context) {
        let pasted = ctx.input(|i| {
            i.events.iter().find_map(|e| match e {
                egui::Event::Paste(text) => Some(text.clone()),
                _ => None,
            })
        });
        if let Some(text) = pasted {
            panels::upload_pasted(&mut self.session, &text);
        }
    }
}

impl eframe::App for RetailDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_dropped_files(ctx);
        self.handle_paste(ctx);

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.session);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.session);
            });

        // ---- Central panel: charts and table ----
        let hovering = ctx.input(|i| !i.raw.hovered_files.is_empty());
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    ui.heading("Retail merchandise management dashboard");
                    ui.label(
                        "Key indicators of assortment management: revenue, expenses, \
                         profit and stock figures.",
                    );
                    if hovering {
                        ui.label(RichText::new("Release to load the file").strong());
                    }
                    ui.add_space(8.0);

                    let height = self.session.config().chart_height;
                    plot::chart_grid(ui, self.session.view(), height);

                    ui.add_space(12.0);
                    ui.heading("Financial data table");
                    table::data_table(ui, &self.session.view().table);
                });
        });
    }
}
