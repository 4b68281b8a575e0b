// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

/// Window and chart settings. Built once in `main`, read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub window_size: [f32; 2],
    pub min_window_size: [f32; 2],
    /// Height of each of the four chart regions, in points.
    pub chart_height: f32,
    /// Fixed histogram bin count; `None` picks one from the data.
    pub histogram_bins: Option<usize>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            window_size: [1280.0, 900.0],
            min_window_size: [720.0, 480.0],
            chart_height: 260.0,
            histogram_bins: None,
        }
    }
}
