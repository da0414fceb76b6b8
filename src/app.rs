use std::time::Instant;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::calc::format_currency;
use crate::data::model::LocationKind;
use crate::state::{AppState, SHARE_MESSAGE_TTL};
use crate::ui::{chart, panels, tables};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct ColiComparatorApp {
    pub state: AppState,
}

impl ColiComparatorApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for ColiComparatorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.expire_share_message(Instant::now());
        if self.state.share_message.is_some() {
            ctx.request_repaint_after(SHARE_MESSAGE_TTL);
        }

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Bottom panel: data note ----
        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
            ui.small(
                "Note: All indices are relative to the national average (100). \
                 This is sample data for demonstration purposes.",
            );
        });

        // ---- Left side panel: configuration ----
        egui::SidePanel::left("config_panel")
            .default_width(280.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: results ----
        egui::CentralPanel::default().show(ctx, |ui| {
            results(ui, &self.state);
        });
    }
}

/// Results, economic indicators and chart, or a hint when there is nothing
/// to compare yet.
fn results(ui: &mut Ui, state: &AppState) {
    if state.show_warning() || state.rows.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading(format!("Select at least 2 {} to compare", state.kind.plural()));
        });
        return;
    }

    let kind = state.kind;
    let baseline = state.baseline.as_str();
    let baseline_name = state.baseline_name().unwrap_or(baseline);

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Results");
            ui.label(format!(
                "The \"Comparable Salary\" shows how much you would need to earn in each {} \
                 to maintain the same standard of living as earning {} in {}.",
                kind.label().to_lowercase(),
                format_currency(state.income),
                baseline_name
            ));
            ui.add_space(4.0);
            tables::results_table(ui, &state.rows, baseline, kind);

            ui.add_space(12.0);
            ui.heading("Comparable Salary by Factor");
            tables::factor_table(ui, &state.rows, baseline, kind);

            ui.add_space(12.0);
            ui.heading("Economic Indicators");
            let explanation = match kind {
                LocationKind::State => {
                    "Additional economic factors that affect take-home pay and quality of life. \
                     Tax rates are for top marginal brackets. Property tax rates are average effective rates."
                }
                LocationKind::City => {
                    "Additional economic indicators for cities. Purchasing Power Index shows relative \
                     buying power. Cost + Rent Index combines housing and overall costs."
                }
            };
            ui.label(RichText::new(explanation).color(Color32::GRAY));
            tables::economic_indicators_table(ui, &state.rows, baseline, kind);

            ui.add_space(12.0);
            ui.heading("Visualization");
            chart::comparable_salary_chart(ui, &state.rows, baseline);
        });
}
