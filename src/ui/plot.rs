use std::f64::consts::{FRAC_PI_2, TAU};

use eframe::egui::{Color32, RichText, Stroke, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoint, PlotPoints, Points, Polygon, Text};

use crate::charts::{
    DashboardView, Histogram, LineChart, PieChart, ScatterChart, format_bucket, format_number,
    x_to_date,
};
use crate::color::{accent, generate_palette, generate_palette_from};

// ---------------------------------------------------------------------------
// Chart grid (central panel)
// ---------------------------------------------------------------------------

/// Render the four charts as a two-by-two grid.
pub fn chart_grid(ui: &mut Ui, view: &DashboardView, height: f32) {
    ui.columns(2, |cols: &mut [Ui]| {
        line_chart(&mut cols[0], &view.line, height);
        pie_chart(&mut cols[1], &view.pie, height);
    });
    ui.add_space(12.0);
    ui.columns(2, |cols: &mut [Ui]| {
        profit_histogram(&mut cols[0], &view.histogram, height);
        scatter_chart(&mut cols[1], &view.scatter, height);
    });
}

fn chart_header(ui: &mut Ui, title: &str, empty: bool) {
    ui.horizontal(|ui: &mut Ui| {
        ui.strong(title);
        if empty {
            ui.label(RichText::new("No data").weak().italics());
        }
    });
}

// ---------------------------------------------------------------------------
// Line chart: revenue and expenses over time
// ---------------------------------------------------------------------------

fn line_chart(ui: &mut Ui, chart: &LineChart, height: f32) {
    chart_header(ui, chart.title, chart.series.is_empty());
    let colors = generate_palette(chart.series.len());

    Plot::new("line_chart")
        .height(height)
        .legend(Legend::default())
        .x_axis_label("date")
        .x_axis_formatter(|mark, _range| {
            x_to_date(mark.value).map(format_bucket).unwrap_or_default()
        })
        .label_formatter(|name, value| {
            let date = x_to_date(value.x).map(format_bucket).unwrap_or_default();
            if name.is_empty() {
                date
            } else {
                format!("{name}\n{date}\n{:.2}", value.y)
            }
        })
        .allow_boxed_zoom(true)
        .show(ui, |plot_ui| {
            for (series, color) in chart.series.iter().zip(colors) {
                let points: PlotPoints = series.points.iter().copied().collect();
                plot_ui.line(Line::new(points).name(&series.name).color(color).width(2.0));
            }
        });
}

// ---------------------------------------------------------------------------
// Pie chart: expenses per bucket
// ---------------------------------------------------------------------------

/// Wedge outlines are split into pieces of at most a quarter turn so every
/// polygon handed to the painter stays convex.
fn wedge_pieces(start: f64, sweep: f64) -> Vec<Vec<[f64; 2]>> {
    let pieces = (sweep / FRAC_PI_2).ceil().max(1.0) as usize;
    let piece_sweep = sweep / pieces as f64;
    (0..pieces)
        .map(|p| {
            let a0 = start + p as f64 * piece_sweep;
            let steps = ((piece_sweep / 0.05).ceil() as usize).max(2);
            std::iter::once([0.0, 0.0])
                .chain((0..=steps).map(|s| {
                    let a = a0 + piece_sweep * s as f64 / steps as f64;
                    [a.cos(), a.sin()]
                }))
                .collect()
        })
        .collect()
}

fn pie_chart(ui: &mut Ui, chart: &PieChart, height: f32) {
    chart_header(ui, chart.title, chart.slices.is_empty());
    let colors = generate_palette_from(chart.slices.len(), 30.0);

    Plot::new("pie_chart")
        .height(height)
        .legend(Legend::default())
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .include_x(-1.2)
        .include_x(1.2)
        .include_y(-1.1)
        .include_y(1.1)
        .show_x(false)
        .show_y(false)
        .show(ui, |plot_ui| {
            // Start at twelve o'clock, go clockwise.
            let mut angle = FRAC_PI_2;
            for (slice, color) in chart.slices.iter().zip(colors) {
                let sweep = slice.share * TAU;
                for piece in wedge_pieces(angle - sweep, sweep) {
                    plot_ui.polygon(
                        Polygon::new(PlotPoints::from(piece))
                            .name(format!("{} ({})", slice.label, format_number(slice.value)))
                            .fill_color(color)
                            .stroke(Stroke::new(1.0, Color32::WHITE)),
                    );
                }
                if slice.share >= 0.04 {
                    let mid = angle - sweep / 2.0;
                    plot_ui.text(Text::new(
                        PlotPoint::new(0.65 * mid.cos(), 0.65 * mid.sin()),
                        RichText::new(format!("{:.1}%", slice.share * 100.0))
                            .color(Color32::WHITE)
                            .strong(),
                    ));
                }
                angle -= sweep;
            }
        });
}

// ---------------------------------------------------------------------------
// Histogram: profit distribution
// ---------------------------------------------------------------------------

fn profit_histogram(ui: &mut Ui, hist: &Histogram, height: f32) {
    chart_header(ui, hist.title, hist.bins.is_empty());
    let bars: Vec<Bar> = hist
        .bins
        .iter()
        .map(|bin| {
            Bar::new(bin.center(), bin.count as f64)
                .width(bin.width())
                .name(format!("{:.2} – {:.2}", bin.start, bin.end))
        })
        .collect();

    Plot::new("profit_histogram")
        .height(height)
        .x_axis_label("profit")
        .y_axis_label("count")
        .allow_boxed_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(accent()));
        });
}

// ---------------------------------------------------------------------------
// Scatter: profit against sales volume
// ---------------------------------------------------------------------------

fn scatter_chart(ui: &mut Ui, chart: &ScatterChart, height: f32) {
    chart_header(ui, chart.title, chart.points.is_empty());
    let points: PlotPoints = chart.points.iter().copied().collect();

    Plot::new("scatter_chart")
        .height(height)
        .x_axis_label("sales_volume")
        .y_axis_label("profit")
        .allow_boxed_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.points(Points::new(points).radius(4.0).color(accent()));
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_circle_is_split_into_quarters() {
        let pieces = wedge_pieces(0.0, TAU);
        assert_eq!(pieces.len(), 4);
        for piece in &pieces {
            assert_eq!(piece[0], [0.0, 0.0]);
            let last = piece.last().unwrap();
            assert!(((last[0] * last[0] + last[1] * last[1]).sqrt() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_small_wedge_is_single_piece() {
        let pieces = wedge_pieces(1.0, 0.3);
        assert_eq!(pieces.len(), 1);
        assert!(pieces[0].len() >= 4);
    }
}
