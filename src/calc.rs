use crate::data::model::{ComparableByFactor, ComparisonRow, IndexFactor, LocationData};

// ---------------------------------------------------------------------------
// Comparable salary
// ---------------------------------------------------------------------------

/// Salary needed in the target location to match `income` in the baseline.
///
/// `income * target_index / baseline_index`; a zero baseline index returns
/// `income` unchanged.
pub fn comparable_salary(income: f64, baseline_index: f64, target_index: f64) -> f64 {
    if baseline_index == 0.0 {
        return income;
    }
    income * target_index / baseline_index
}

/// Build one comparison row per selected location, in input order.
///
/// The baseline is the first selected location whose code or name equals
/// `baseline_id`. Returns an empty list if no selected location matches.
pub fn generate_comparison_data(
    selected: &[&LocationData],
    baseline_id: &str,
    income: f64,
) -> Vec<ComparisonRow> {
    let Some(baseline) = selected.iter().find(|l| l.matches(baseline_id)) else {
        return Vec::new();
    };

    selected
        .iter()
        .map(|location| {
            let by = |factor: IndexFactor| {
                comparable_salary(
                    income,
                    baseline.indices.get(factor),
                    location.indices.get(factor),
                )
            };
            let comparable_by_factor = ComparableByFactor {
                overall: by(IndexFactor::Overall),
                housing: by(IndexFactor::Housing),
                utilities: by(IndexFactor::Utilities),
                groceries: by(IndexFactor::Groceries),
                transportation: by(IndexFactor::Transportation),
                healthcare: by(IndexFactor::Healthcare),
                miscellaneous: by(IndexFactor::Miscellaneous),
            };
            ComparisonRow {
                code: location.id().to_string(),
                name: location.name.clone(),
                indices: location.indices,
                additional_data: location.additional_data,
                comparable_overall: comparable_by_factor.overall,
                comparable_by_factor,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Display helpers
// ---------------------------------------------------------------------------

/// US-dollar amount with no cents and comma grouping: `$1,234,568`.
pub fn format_currency(amount: f64) -> String {
    if !amount.is_finite() {
        return "N/A".to_string();
    }
    let rounded = amount.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}${grouped}")
}
