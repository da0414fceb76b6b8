use eframe::egui::{RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::calc::format_currency;
use crate::color::BASELINE_COLOR;
use crate::data::model::{ComparisonRow, IndexFactor, LocationKind};

const ROW_HEIGHT: f32 = 20.0;
const HEADER_HEIGHT: f32 = 22.0;

/// Location name, bold, with a badge on the baseline row.
fn name_cell(ui: &mut Ui, row: &ComparisonRow, baseline: &str) {
    ui.horizontal(|ui: &mut Ui| {
        ui.strong(row.name.as_str());
        if row.code == baseline {
            ui.label(RichText::new("Baseline").small().color(BASELINE_COLOR));
        }
    });
}

/// Optional number, `N/A` when missing.
fn or_na(value: Option<f64>, fmt: impl Fn(f64) -> String) -> String {
    value.map(fmt).unwrap_or_else(|| "N/A".to_string())
}

// ---------------------------------------------------------------------------
// Results: indices and comparable salary
// ---------------------------------------------------------------------------

/// Index columns plus the comparable overall salary.
pub fn results_table(ui: &mut Ui, rows: &[ComparisonRow], baseline: &str, kind: LocationKind) {
    ui.push_id("results_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .vscroll(false)
            .column(Column::auto().at_least(140.0))
            .columns(Column::auto().at_least(70.0), IndexFactor::ALL.len())
            .column(Column::remainder().at_least(120.0))
            .header(HEADER_HEIGHT, |mut header| {
                header.col(|ui| {
                    ui.strong(kind.label());
                });
                for factor in IndexFactor::ALL {
                    header.col(|ui| {
                        let label = match factor {
                            IndexFactor::Overall => "Overall Index",
                            other => other.label(),
                        };
                        ui.strong(label);
                    });
                }
                header.col(|ui| {
                    ui.strong("Comparable Salary");
                });
            })
            .body(|mut body| {
                for row in rows {
                    body.row(ROW_HEIGHT, |mut table_row| {
                        table_row.col(|ui| name_cell(ui, row, baseline));
                        for factor in IndexFactor::ALL {
                            table_row.col(|ui| {
                                ui.label(format!("{}", row.indices.get(factor)));
                            });
                        }
                        table_row.col(|ui| {
                            ui.label(RichText::new(format_currency(row.comparable_overall)).strong());
                        });
                    });
                }
            });
    });
}

// ---------------------------------------------------------------------------
// Comparable salary broken down by factor
// ---------------------------------------------------------------------------

/// Comparable salary per cost-of-living factor.
pub fn factor_table(ui: &mut Ui, rows: &[ComparisonRow], baseline: &str, kind: LocationKind) {
    ui.push_id("factor_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .vscroll(false)
            .column(Column::auto().at_least(140.0))
            .columns(Column::auto().at_least(90.0), IndexFactor::ALL.len())
            .header(HEADER_HEIGHT, |mut header| {
                header.col(|ui| {
                    ui.strong(kind.label());
                });
                for factor in IndexFactor::ALL {
                    header.col(|ui| {
                        ui.strong(factor.label());
                    });
                }
            })
            .body(|mut body| {
                for row in rows {
                    body.row(ROW_HEIGHT, |mut table_row| {
                        table_row.col(|ui| name_cell(ui, row, baseline));
                        for factor in IndexFactor::ALL {
                            table_row.col(|ui| {
                                ui.label(format_currency(row.comparable_by_factor.get(factor)));
                            });
                        }
                    });
                }
            });
    });
}

// ---------------------------------------------------------------------------
// Economic indicators
// ---------------------------------------------------------------------------

/// Tax / income / unemployment columns when any row has tax data, otherwise
/// the city indicators (purchasing power, cost + rent).
pub fn economic_indicators_table(
    ui: &mut Ui,
    rows: &[ComparisonRow],
    baseline: &str,
    kind: LocationKind,
) {
    let has_tax_data = rows.iter().any(|r| r.additional_data.taxes.is_some());
    let headers: &[&str] = if has_tax_data {
        &[
            "Income Tax Rate",
            "Property Tax Rate",
            "Sales Tax Rate",
            "Median Income",
            "Unemployment Rate",
        ]
    } else {
        &["Purchasing Power Index", "Cost + Rent Index"]
    };

    let percent = |v: f64| format!("{v}%");
    let plain = |v: f64| format!("{v}");

    ui.push_id("indicators_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .vscroll(false)
            .column(Column::auto().at_least(140.0))
            .columns(Column::auto().at_least(110.0), headers.len())
            .header(HEADER_HEIGHT, |mut header| {
                header.col(|ui| {
                    ui.strong(kind.label());
                });
                for title in headers {
                    header.col(|ui| {
                        ui.strong(*title);
                    });
                }
            })
            .body(|mut body| {
                for row in rows {
                    let data = &row.additional_data;
                    let cells: Vec<String> = if has_tax_data {
                        let taxes = data.taxes;
                        vec![
                            or_na(taxes.map(|t| t.income_tax), percent),
                            or_na(taxes.map(|t| t.property_tax), percent),
                            or_na(taxes.map(|t| t.sales_tax), percent),
                            or_na(data.median_income, format_currency),
                            or_na(data.unemployment_rate, percent),
                        ]
                    } else {
                        vec![
                            or_na(data.purchasing_power, plain),
                            or_na(data.cost_plus_rent, plain),
                        ]
                    };
                    body.row(ROW_HEIGHT, |mut table_row| {
                        table_row.col(|ui| name_cell(ui, row, baseline));
                        for cell in &cells {
                            table_row.col(|ui| {
                                ui.label(cell.as_str());
                            });
                        }
                    });
                }
            });
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_or_na() {
        let percent = |v: f64| format!("{v}%");
        assert_eq!(or_na(Some(6.25), percent), "6.25%");
        assert_eq!(or_na(None, percent), "N/A");
        // no income tax is a real value, not a missing one
        assert_eq!(or_na(Some(0.0), percent), "0%");
        assert_eq!(or_na(Some(73035.0), format_currency), "$73,035");
    }
}
