use std::time::{Duration, Instant};

use crate::calc::generate_comparison_data;
use crate::config::Config;
use crate::data::filter::{filtered_indices, selected_locations};
use crate::data::model::{ComparisonRow, Dataset, LocationData, LocationKind};
use crate::share::{self, MIN_LOCATIONS, QueryResult, QueryParams};

/// How long the "Link copied" confirmation stays visible.
pub const SHARE_MESSAGE_TTL: Duration = Duration::from_secs(3);

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset.
    pub dataset: Dataset,

    /// States or cities.
    pub kind: LocationKind,

    /// Selected identifiers, in the order they were picked.
    pub selected: Vec<String>,

    /// Identifier of the baseline location; one of `selected` when non-empty.
    pub baseline: String,

    /// Annual income in the baseline location.
    pub income: f64,

    /// Text typed into the multi-select search box.
    pub search: String,

    /// Text of the income field.
    pub income_text: String,

    /// Text of the "apply share link" box.
    pub link_text: String,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Transient confirmation of the share button.
    pub share_message: Option<(String, Instant)>,

    /// Comparison rows for the current selection (cached).
    pub rows: Vec<ComparisonRow>,

    pub config: Config,
}

impl AppState {
    pub fn new(dataset: Dataset, config: Config) -> Self {
        let income = config.defaults.income;
        let mut state = Self {
            dataset,
            kind: LocationKind::State,
            selected: Vec::new(),
            baseline: String::new(),
            income,
            search: String::new(),
            income_text: format_income_text(income),
            link_text: String::new(),
            status_message: None,
            share_message: None,
            rows: Vec::new(),
            config,
        };
        state.reset_selection();
        state
    }

    /// Ingest a newly loaded dataset, keeping the current kind.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.dataset = dataset;
        self.search.clear();
        self.status_message = None;
        self.reset_selection();
    }

    /// All locations of the current kind.
    pub fn current_locations(&self) -> &[LocationData] {
        self.dataset.locations(self.kind)
    }

    /// Selected locations in dataset order.
    pub fn selected_locations(&self) -> Vec<&LocationData> {
        selected_locations(self.current_locations(), &self.selected)
    }

    /// Indices into `current_locations` that pass the search box.
    pub fn visible_indices(&self) -> Vec<usize> {
        filtered_indices(self.current_locations(), &self.search)
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.iter().any(|s| s == id)
    }

    /// Fewer than two selections: show the warning instead of results.
    pub fn show_warning(&self) -> bool {
        self.selected.len() < MIN_LOCATIONS
    }

    fn is_known(&self, id: &str) -> bool {
        self.dataset.find(self.kind, id).is_some()
    }

    /// Name of the baseline location, if it is loaded.
    pub fn baseline_name(&self) -> Option<&str> {
        self.dataset
            .find(self.kind, &self.baseline)
            .map(|l| l.name.as_str())
    }

    /// Text shown on the closed multi-select.
    pub fn selection_label(&self) -> String {
        match self.selected.as_slice() {
            [] => format!("Select {}...", self.kind.plural()),
            [only] => self
                .dataset
                .find(self.kind, only)
                .map(|l| l.name.clone())
                .unwrap_or_else(|| format!("1 {} selected", self.kind.label().to_lowercase())),
            many => format!("{} {} selected", many.len(), self.kind.plural()),
        }
    }

    // -- mutations --------------------------------------------------------

    /// Switch between states and cities; selections reset to the defaults.
    pub fn set_kind(&mut self, kind: LocationKind) {
        if self.kind == kind {
            return;
        }
        self.kind = kind;
        self.search.clear();
        self.reset_selection();
    }

    /// Restore the configured default selection for the current kind,
    /// skipping defaults the dataset does not contain.
    fn reset_selection(&mut self) {
        let defaults: Vec<String> = self
            .config
            .defaults
            .selection(self.kind)
            .iter()
            .filter(|id| self.is_known(id))
            .cloned()
            .collect();
        if defaults.len() < self.config.defaults.selection(self.kind).len() {
            log::warn!("Default {} missing from the dataset were skipped", self.kind.plural());
        }
        self.selected = defaults;
        self.baseline = self.selected.first().cloned().unwrap_or_default();
        self.recompute();
    }

    /// Toggle a single location in the selection.
    pub fn toggle(&mut self, id: &str) {
        if self.is_selected(id) {
            self.selected.retain(|s| s != id);
        } else {
            self.selected.push(id.to_string());
        }
        self.recompute();
    }

    /// Select every location of the current kind.
    pub fn select_all(&mut self) {
        self.selected = self
            .current_locations()
            .iter()
            .map(|l| l.id().to_string())
            .collect();
        self.recompute();
    }

    /// Deselect everything.
    pub fn clear_all(&mut self) {
        self.selected.clear();
        self.recompute();
    }

    pub fn set_baseline(&mut self, id: &str) {
        self.baseline = id.to_string();
        self.recompute();
    }

    /// Apply the income field text: a non-negative number is taken, empty
    /// text means zero, anything else is ignored.
    pub fn set_income_text(&mut self, text: &str) {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            self.set_income(0.0);
        } else if let Ok(value) = trimmed.replace(',', "").parse::<f64>() {
            if value.is_finite() && value >= 0.0 {
                self.set_income(value);
            }
        }
    }

    pub fn set_income(&mut self, income: f64) {
        self.income = income;
        self.recompute();
    }

    /// Parse a share link against the dataset and apply it.
    pub fn apply_share_link(&mut self, link: &str) -> QueryResult<()> {
        let params = {
            let valid = self.dataset.identifiers(share::requested_kind(link));
            share::parse_query_params(link, &valid)?
        };
        self.apply_params(params);
        Ok(())
    }

    fn apply_params(&mut self, params: QueryParams) {
        log::info!(
            "Applying share link: {} {} (baseline {}, income {})",
            params.states.len(),
            params.kind.plural(),
            params.base,
            params.income
        );
        self.kind = params.kind;
        self.search.clear();
        self.selected = params.states;
        self.baseline = params.base;
        self.income = params.income;
        self.income_text = format_income_text(params.income);
        self.recompute();
    }

    /// URL reproducing the current comparison.
    pub fn share_url(&self) -> String {
        share::generate_share_url(
            &self.config.share.base_url,
            &self.selected,
            self.income,
            &self.baseline,
            self.kind,
        )
    }

    pub fn set_share_message(&mut self, message: impl Into<String>) {
        self.share_message = Some((message.into(), Instant::now()));
    }

    /// Drop the share confirmation once it has expired.
    pub fn expire_share_message(&mut self, now: Instant) {
        if let Some((_, shown)) = &self.share_message {
            if now.duration_since(*shown) >= SHARE_MESSAGE_TTL {
                self.share_message = None;
            }
        }
    }

    /// Re-establish the baseline invariant and rebuild the comparison rows.
    fn recompute(&mut self) {
        let (dataset, kind) = (&self.dataset, self.kind);
        self.selected.retain(|id| dataset.find(kind, id).is_some());
        if !self.selected.is_empty() && !self.is_selected(&self.baseline) {
            self.baseline = self.selected[0].clone();
        }
        let rows = if self.show_warning() {
            Vec::new()
        } else {
            let selected = self.selected_locations();
            generate_comparison_data(&selected, &self.baseline, self.income)
        };
        self.rows = rows;
    }
}

/// Income as typed into the text field: no grouping, no trailing `.0`.
fn format_income_text(income: f64) -> String {
    format!("{income}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::small_dataset;

    fn state() -> AppState {
        AppState::new(small_dataset(), Config::default())
    }

    fn row_ids(state: &AppState) -> Vec<&str> {
        state.rows.iter().map(|r| r.code.as_str()).collect()
    }

    #[test]
    fn test_initial_state_uses_defaults() {
        let s = state();
        assert_eq!(s.kind, LocationKind::State);
        assert_eq!(s.selected, ["CA", "TX"]);
        assert_eq!(s.baseline, "CA");
        assert_eq!(s.income, 100_000.0);
        assert_eq!(s.income_text, "100000");
        assert_eq!(row_ids(&s), vec!["CA", "TX"]);
        assert!(!s.show_warning());
        assert_eq!(s.baseline_name(), Some("California"));
    }

    #[test]
    fn test_removing_baseline_moves_it_to_first_selection() {
        let mut s = state();
        s.toggle("NY");
        s.toggle("CA");
        assert_eq!(s.selected, ["TX", "NY"]);
        assert_eq!(s.baseline, "TX");
        // rows follow dataset order
        assert_eq!(row_ids(&s), vec!["TX", "NY"]);
    }

    #[test]
    fn test_fewer_than_two_selections_shows_warning() {
        let mut s = state();
        s.toggle("TX");
        assert!(s.show_warning());
        assert!(s.rows.is_empty());
        assert_eq!(s.baseline, "CA");

        s.clear_all();
        assert!(s.selected.is_empty());
        assert!(s.rows.is_empty());
        assert_eq!(s.selection_label(), "Select states...");
    }

    #[test]
    fn test_select_all_and_labels() {
        let mut s = state();
        s.select_all();
        assert_eq!(s.selected, ["CA", "TX", "NY", "WA"]);
        assert_eq!(s.rows.len(), 4);
        assert_eq!(s.selection_label(), "4 states selected");

        s.clear_all();
        s.toggle("WA");
        assert_eq!(s.selection_label(), "Washington");
    }

    #[test]
    fn test_switching_kind_resets_selection() {
        let mut s = state();
        s.search = "tex".into();
        s.set_kind(LocationKind::City);
        assert_eq!(s.selected, ["New York, NY", "Los Angeles, CA"]);
        assert_eq!(s.baseline, "New York, NY");
        assert!(s.search.is_empty());
        assert_eq!(s.rows.len(), 2);
        assert!((s.rows[1].comparable_overall - 81_000.0).abs() < 1e-6);

        s.set_kind(LocationKind::State);
        assert_eq!(s.selected, ["CA", "TX"]);
    }

    #[test]
    fn test_income_text_rules() {
        let mut s = state();
        s.set_income_text("85,000");
        assert_eq!(s.income, 85_000.0);
        s.set_income_text("-5");
        assert_eq!(s.income, 85_000.0);
        s.set_income_text("lots");
        assert_eq!(s.income, 85_000.0);
        s.set_income_text("");
        assert_eq!(s.income, 0.0);
        assert!(s.rows.iter().all(|r| r.comparable_overall == 0.0));
    }

    #[test]
    fn test_share_link_roundtrip_through_state() {
        let mut s = state();
        s.set_kind(LocationKind::City);
        s.toggle("Austin, TX");
        s.set_baseline("Austin, TX");
        s.set_income(72_500.0);
        let url = s.share_url();

        let mut other = state();
        other.apply_share_link(&url).unwrap();
        assert_eq!(other.kind, LocationKind::City);
        assert_eq!(other.selected, s.selected);
        assert_eq!(other.baseline, "Austin, TX");
        assert_eq!(other.income, 72_500.0);
        assert_eq!(other.income_text, "72500");
        assert_eq!(other.rows, s.rows);
    }

    #[test]
    fn test_bad_share_link_leaves_state_alone() {
        let mut s = state();
        assert!(s.apply_share_link("?states=CA&income=5&base=CA").is_err());
        // city names are not valid for a state link
        assert!(s.apply_share_link("?states=Los+Angeles,Seattle&income=5&base=CA&type=state").is_err());
        assert_eq!(s.selected, ["CA", "TX"]);
        assert_eq!(s.income, 100_000.0);
    }

    #[test]
    fn test_share_message_expires() {
        let mut s = state();
        s.set_share_message("Link copied to clipboard!");
        let shown = s.share_message.as_ref().unwrap().1;
        s.expire_share_message(shown + Duration::from_secs(1));
        assert!(s.share_message.is_some());
        s.expire_share_message(shown + SHARE_MESSAGE_TTL);
        assert!(s.share_message.is_none());
    }

    #[test]
    fn test_unknown_defaults_are_skipped() {
        let mut config = Config::default();
        config.defaults.states = vec!["ZZ".into(), "CA".into(), "TX".into()];
        let s = AppState::new(small_dataset(), config);
        assert_eq!(s.selected, ["CA", "TX"]);
        assert_eq!(s.baseline, "CA");
        assert_eq!(row_ids(&s), vec!["CA", "TX"]);
    }

    #[test]
    fn test_dataset_without_defaults_keeps_a_usable_baseline() {
        let mut s = state();
        let mut dataset = small_dataset();
        dataset.states.retain(|l| l.id() != "CA");
        s.set_dataset(dataset);
        assert_eq!(s.selected, ["TX"]);
        assert_eq!(s.baseline, "TX");
        assert!(s.show_warning());

        s.toggle("NY");
        s.toggle("WA");
        assert_eq!(s.selected, ["TX", "NY", "WA"]);
        assert_eq!(s.baseline, "TX");
        assert!(!s.show_warning());
        assert_eq!(row_ids(&s), vec!["TX", "NY", "WA"]);
    }

    #[test]
    fn test_visible_indices_follow_search() {
        let mut s = state();
        s.search = "wash".into();
        assert_eq!(s.visible_indices(), vec![3]);
    }
}
