use std::path::Path;

use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::loader::{FilePayload, read_payload};
use crate::data::model::Period;
use crate::data::sample::sample_payload;
use crate::state::{DashboardSession, StatusMessage};

const ALL_CATEGORIES: &str = "All categories";

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, session: &mut DashboardSession) {
    ui.heading("Filters");
    ui.separator();

    // ---- Category selector (clearable) ----
    ui.strong("Category");
    let current = session.selection().category.clone();
    let options = session.category_options().to_vec();
    let mut picked: Option<Option<String>> = None;
    egui::ComboBox::from_id_salt("category_filter")
        .selected_text(current.as_deref().unwrap_or(ALL_CATEGORIES))
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            if ui.selectable_label(current.is_none(), ALL_CATEGORIES).clicked() {
                picked = Some(None);
            }
            for option in &options {
                let selected = current.as_deref() == Some(option.as_str());
                if ui.selectable_label(selected, option).clicked() {
                    picked = Some(Some(option.clone()));
                }
            }
        });
    if let Some(category) = picked {
        session.set_category(category);
    }
    if options.is_empty() {
        ui.label(RichText::new("Load a file to list categories").weak());
    }
    ui.add_space(8.0);

    // ---- Period selector (always set) ----
    ui.strong("Period");
    let current_period = session.selection().period;
    let mut picked_period = current_period;
    egui::ComboBox::from_id_salt("period_filter")
        .selected_text(current_period.label())
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for period in Period::ALL {
                ui.selectable_value(&mut picked_period, period, period.label());
            }
        });
    session.set_period(picked_period);

    ui.separator();

    if let (Some(table), Some(agg)) = (session.table(), session.aggregated()) {
        ui.label(format!("{} rows loaded", table.len()));
        ui.label(format!("{} {} buckets shown", agg.len(), agg.period.label().to_lowercase()));
    } else {
        ui.label("No dataset loaded.");
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, session: &mut DashboardSession) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open CSV…").clicked() {
                open_file_dialog(session);
                ui.close_menu();
            }
            if ui.button("Load sample data").clicked() {
                upload(session, sample_payload());
                ui.close_menu();
            }
        });

        ui.separator();

        match session.status() {
            Some(StatusMessage::Info(msg)) => {
                ui.label(msg);
            }
            Some(StatusMessage::Error(msg)) => {
                ui.label(RichText::new(msg).color(Color32::RED));
            }
            None => {
                ui.label(RichText::new("Drop a CSV file here or paste a data URL").weak());
            }
        }
    });
}

// ---------------------------------------------------------------------------
// Upload sources
// ---------------------------------------------------------------------------

pub fn open_file_dialog(session: &mut DashboardSession) {
    let file = rfd::FileDialog::new()
        .set_title("Open sales data")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        upload_path(session, &path);
    }
}

/// Read a file from disk and hand it to the session.
pub fn upload_path(session: &mut DashboardSession, path: &Path) {
    match read_payload(path) {
        Ok(payload) => upload(session, payload),
        Err(e) => session.report_error(format!("Error: {e:#}")),
    }
}

/// Clipboard text is either a `data:` URL or the CSV itself.
pub fn upload_pasted(session: &mut DashboardSession, text: &str) {
    if text.trim_start().starts_with("data:") {
        match FilePayload::from_data_url(text) {
            Ok(payload) => upload(session, payload),
            Err(e) => session.report_error(format!("clipboard: {e}")),
        }
    } else {
        upload(
            session,
            FilePayload::raw(Some("clipboard".into()), text.as_bytes().to_vec()),
        );
    }
}

pub fn upload(session: &mut DashboardSession, payload: FilePayload) {
    // Failures are already logged and shown in the status line.
    let _ = session.upload(Some(payload));
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD;

    const CSV: &str = "date,category,revenue,expenses,profit,sales_volume\n2024-02-02,Toys,9,4,5,1\n";

    #[test]
    fn test_paste_raw_csv() {
        let mut session = DashboardSession::default();
        upload_pasted(&mut session, CSV);
        assert_eq!(session.table().map(|t| t.len()), Some(1));
    }

    #[test]
    fn test_paste_data_url() {
        let mut session = DashboardSession::default();
        let url = format!("data:text/csv;base64,{}", STANDARD.encode(CSV));
        upload_pasted(&mut session, &url);
        assert_eq!(session.category_options(), ["Toys"]);
    }

    #[test]
    fn test_paste_garbage_reports_error() {
        let mut session = DashboardSession::default();
        upload_pasted(&mut session, "data:nonsense");
        assert!(session.table().is_none());
        assert!(matches!(session.status(), Some(StatusMessage::Error(_))));
    }

    #[test]
    fn test_upload_missing_path_reports_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = DashboardSession::default();
        upload_path(&mut session, &dir.path().join("missing.csv"));
        assert!(matches!(session.status(), Some(StatusMessage::Error(_))));
    }

    #[test]
    fn test_upload_path_loads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sales.csv");
        std::fs::write(&path, CSV).unwrap();
        let mut session = DashboardSession::default();
        upload_path(&mut session, &path);
        assert_eq!(session.table().map(|t| t.len()), Some(1));
    }
}
