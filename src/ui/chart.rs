use eframe::egui::{self, Ui};
use egui_plot::{Bar, BarChart, Plot};

use crate::calc::format_currency;
use crate::color::ColorMap;
use crate::data::model::ComparisonRow;

// ---------------------------------------------------------------------------
// Comparable salary bar chart
// ---------------------------------------------------------------------------

/// One bar per location; the baseline is highlighted.
pub fn comparable_salary_chart(ui: &mut Ui, rows: &[ComparisonRow], baseline: &str) {
    let color_map = ColorMap::new(rows.iter().map(|r| r.code.as_str()), baseline);

    let bars: Vec<Bar> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            Bar::new(i as f64, row.comparable_overall)
                .name(&row.name)
                .fill(color_map.color_for(&row.code))
                .width(0.6)
        })
        .collect();

    let chart = BarChart::new(bars)
        .name("Comparable Salary")
        .element_formatter(Box::new(|bar: &Bar, _chart: &BarChart| {
            format!("{}\n{}", bar.name, format_currency(bar.value))
        }));

    let labels: Vec<String> = rows.iter().map(|r| r.name.clone()).collect();

    ui.label(egui::RichText::new("Comparable Salary Comparison").heading());
    Plot::new("comparable_salary_chart")
        .height(320.0)
        .include_y(0.0)
        .allow_boxed_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show_grid([false, true])
        .x_axis_formatter(move |mark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
                return String::new();
            }
            labels.get(idx as usize).cloned().unwrap_or_default()
        })
        .y_axis_formatter(|mark, _range| format_currency(mark.value))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(chart);
        });
}
