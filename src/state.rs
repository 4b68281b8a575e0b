use crate::charts::DashboardView;
use crate::config::DashboardConfig;
use crate::data::filter::aggregate;
use crate::data::loader::{FilePayload, load_payload};
use crate::data::model::{AggregatedTable, FilterSelection, Period, RecordTable};
use crate::error::UploadResult;

// ---------------------------------------------------------------------------
// Status line
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusMessage {
    Info(String),
    Error(String),
}

// ---------------------------------------------------------------------------
// Dashboard session
// ---------------------------------------------------------------------------

/// Everything one dashboard window knows, independent of rendering.
///
/// The three input cells are the loaded table, the category filter and the
/// period. Every change to one of them rebuilds the aggregated table and the
/// view from scratch.
pub struct DashboardSession {
    config: DashboardConfig,

    /// Loaded table (None until a file is uploaded).
    table: Option<RecordTable>,

    /// Category and period chosen by the user.
    selection: FilterSelection,

    /// Distinct categories of the loaded table, sorted.
    category_options: Vec<String>,

    /// Derived from the three cells above (cached).
    aggregated: Option<AggregatedTable>,
    view: DashboardView,

    /// Status / error message shown in the UI.
    status: Option<StatusMessage>,
}

impl Default for DashboardSession {
    fn default() -> Self {
        Self::new(DashboardConfig::default())
    }
}

impl DashboardSession {
    pub fn new(config: DashboardConfig) -> Self {
        let view = DashboardView::build(None, &config);
        Self {
            config,
            table: None,
            selection: FilterSelection::default(),
            category_options: Vec::new(),
            aggregated: None,
            view,
            status: None,
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn table(&self) -> Option<&RecordTable> {
        self.table.as_ref()
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    pub fn category_options(&self) -> &[String] {
        &self.category_options
    }

    pub fn aggregated(&self) -> Option<&AggregatedTable> {
        self.aggregated.as_ref()
    }

    pub fn view(&self) -> &DashboardView {
        &self.view
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    /// Ingest an upload. On success the table is replaced and the category
    /// options are rebuilt; on failure nothing but the status line changes.
    /// `None` (nothing picked) is a no-op.
    pub fn upload(&mut self, payload: Option<FilePayload>) -> UploadResult<()> {
        let name = payload
            .as_ref()
            .map(|p| p.display_name().to_string())
            .unwrap_or_default();

        match load_payload(payload.as_ref()) {
            Ok(None) => Ok(()),
            Ok(Some(table)) => {
                if table.is_empty() {
                    log::warn!("{name} has a header row but no data rows");
                }
                log::info!(
                    "Loaded {} rows from {name} with columns {:?}, categories {:?}",
                    table.len(),
                    table.numeric_columns,
                    table.categories
                );
                self.status = Some(StatusMessage::Info(format!(
                    "Loaded {} rows from {name}",
                    table.len()
                )));
                self.category_options = table.category_options();
                self.table = Some(table);
                self.recompute();
                Ok(())
            }
            Err(e) => {
                log::error!("Rejected {name} ({} error): {e}", e.kind());
                self.status = Some(StatusMessage::Error(format!("{name}: {e}")));
                Err(e)
            }
        }
    }

    /// Surface a failure that happened before a payload existed (e.g. I/O).
    pub fn report_error(&mut self, message: String) {
        log::error!("{message}");
        self.status = Some(StatusMessage::Error(message));
    }

    /// Change the category filter; `None` clears it.
    pub fn set_category(&mut self, category: Option<String>) {
        if self.selection.category != category {
            log::debug!("Category filter: {category:?}");
            self.selection.category = category;
            self.recompute();
        }
    }

    pub fn set_period(&mut self, period: Period) {
        if self.selection.period != period {
            log::debug!("Period: {period}");
            self.selection.period = period;
            self.recompute();
        }
    }

    fn recompute(&mut self) {
        self.aggregated = self
            .table
            .as_ref()
            .map(|table| aggregate(table, &self.selection));
        self.view = DashboardView::build(self.aggregated.as_ref(), &self.config);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::{NO_DATA_PROMPT, TableView, UPLOAD_PROMPT};
    use crate::error::UploadError;

    fn payload(text: &str) -> FilePayload {
        FilePayload::raw(Some("upload.csv".into()), text.as_bytes().to_vec())
    }

    const SALES: &str = "date,category,revenue,expenses,profit,sales_volume\n\
                         2024-01-15,Toys,100,40,60,10\n\
                         2024-01-20,Food,50,10,40,5\n\
                         2024-05-02,Toys,20,5,15,2\n\
                         2024-05-09,Food,30,10,20,3\n";

    #[test]
    fn test_initial_state() {
        let session = DashboardSession::default();
        assert!(session.table().is_none());
        assert!(session.aggregated().is_none());
        assert_eq!(session.selection().period, Period::Monthly);
        assert_eq!(session.selection().category, None);
        assert!(session.category_options().is_empty());
        assert!(session.view().charts_empty());
        assert_eq!(
            session.view().table,
            TableView::Placeholder(UPLOAD_PROMPT.to_string())
        );
    }

    #[test]
    fn test_upload_populates_options_and_view() {
        let mut session = DashboardSession::default();
        session.upload(Some(payload(SALES))).unwrap();
        assert_eq!(session.category_options(), ["Food", "Toys"]);
        let agg = session.aggregated().unwrap();
        assert_eq!(agg.len(), 5);
        assert!(!session.view().charts_empty());
        assert!(matches!(session.status(), Some(StatusMessage::Info(_))));
    }

    #[test]
    fn test_none_upload_is_noop() {
        let mut session = DashboardSession::default();
        session.upload(Some(payload(SALES))).unwrap();
        session.upload(None).unwrap();
        assert_eq!(session.table().map(|t| t.len()), Some(4));
    }

    #[test]
    fn test_failed_upload_keeps_previous_table() {
        let mut session = DashboardSession::default();
        session.upload(Some(payload(SALES))).unwrap();
        let before = session.aggregated().cloned();

        let err = session
            .upload(Some(payload("category,revenue,expenses,profit,sales_volume\nA,1,1,0,1\n")))
            .unwrap_err();
        assert!(matches!(err, UploadError::Schema(_)));
        assert_eq!(session.table().map(|t| t.len()), Some(4));
        assert_eq!(session.aggregated().cloned(), before);
        assert_eq!(session.category_options(), ["Food", "Toys"]);
        assert!(matches!(session.status(), Some(StatusMessage::Error(_))));
    }

    #[test]
    fn test_failed_first_upload_stays_empty() {
        let mut session = DashboardSession::default();
        let payload = FilePayload::from_data_url("data:text/csv;base64,%%%").unwrap();
        assert!(session.upload(Some(payload)).is_err());
        assert!(session.table().is_none());
        assert!(session.view().charts_empty());
    }

    #[test]
    fn test_reupload_is_identical() {
        let mut session = DashboardSession::default();
        session.set_period(Period::Quarterly);
        session.set_category(Some("Toys".into()));
        session.upload(Some(payload(SALES))).unwrap();
        let first = session.aggregated().cloned().unwrap();
        let first_view = session.view().clone();

        session.upload(Some(payload(SALES))).unwrap();
        assert_eq!(session.aggregated().cloned().unwrap(), first);
        assert_eq!(session.view(), &first_view);
    }

    #[test]
    fn test_unknown_category_renders_empty() {
        let mut session = DashboardSession::default();
        session.upload(Some(payload(SALES))).unwrap();
        session.set_category(Some("Garden".into()));
        assert!(session.aggregated().unwrap().is_empty());
        assert!(session.view().charts_empty());
        assert_eq!(
            session.view().table,
            TableView::Placeholder(NO_DATA_PROMPT.to_string())
        );
    }

    #[test]
    fn test_filter_changes_recompute() {
        let mut session = DashboardSession::default();
        session.upload(Some(payload(SALES))).unwrap();

        session.set_category(Some("Food".into()));
        let agg = session.aggregated().unwrap();
        assert_eq!(agg.rows[0].revenue, 50.0);

        session.set_period(Period::Yearly);
        let agg = session.aggregated().unwrap();
        assert_eq!(agg.len(), 1);
        assert_eq!(agg.rows[0].revenue, 80.0);

        session.set_category(None);
        assert_eq!(session.aggregated().unwrap().rows[0].revenue, 200.0);
    }

    #[test]
    fn test_category_filter_survives_new_upload() {
        let mut session = DashboardSession::default();
        session.upload(Some(payload(SALES))).unwrap();
        session.set_category(Some("Toys".into()));
        session
            .upload(Some(payload(
                "date,category,revenue,expenses,profit,sales_volume\n2024-01-01,Food,1,1,0,1\n",
            )))
            .unwrap();
        assert_eq!(session.selection().category.as_deref(), Some("Toys"));
        assert_eq!(session.category_options(), ["Food"]);
        assert!(session.view().charts_empty());
    }

    #[test]
    fn test_filters_before_upload_render_nothing() {
        let mut session = DashboardSession::default();
        session.set_period(Period::Yearly);
        session.set_category(Some("Toys".into()));
        assert!(session.aggregated().is_none());
        assert!(matches!(session.view().table, TableView::Placeholder(_)));
    }
}
