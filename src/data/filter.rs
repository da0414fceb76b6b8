use super::model::LocationData;

// ---------------------------------------------------------------------------
// Search filter for the multi-select list
// ---------------------------------------------------------------------------

/// Whether a location passes the multi-select search box.
///
/// Case-insensitive substring match on the name, the code (states) or the
/// state abbreviation (cities). An empty term matches everything.
pub fn search_matches(location: &LocationData, term: &str) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }
    let hit = |s: Option<&str>| s.is_some_and(|s| s.to_lowercase().contains(&term));
    hit(Some(&location.name)) || hit(location.code.as_deref()) || hit(location.state.as_deref())
}

/// Return indices of locations passing the search term.
pub fn filtered_indices(locations: &[LocationData], term: &str) -> Vec<usize> {
    locations
        .iter()
        .enumerate()
        .filter(|(_, loc)| search_matches(loc, term))
        .map(|(i, _)| i)
        .collect()
}

// ---------------------------------------------------------------------------
// Selection → locations
// ---------------------------------------------------------------------------

/// Locations whose identifier is selected, in dataset order.
/// Unknown identifiers are skipped.
pub fn selected_locations<'a, S: AsRef<str>>(
    locations: &'a [LocationData],
    selected: &[S],
) -> Vec<&'a LocationData> {
    locations
        .iter()
        .filter(|loc| selected.iter().any(|id| id.as_ref() == loc.id()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::small_dataset;

    #[test]
    fn test_search_by_name_code_and_state() {
        let ds = small_dataset();
        assert_eq!(filtered_indices(&ds.states, ""), vec![0, 1, 2, 3]);
        assert_eq!(filtered_indices(&ds.states, "tx"), vec![1]);
        assert_eq!(filtered_indices(&ds.states, "new"), vec![2]);
        // "ca" hits California by code and by name
        assert_eq!(filtered_indices(&ds.states, "CA"), vec![0]);

        // cities: "tx" matches the state abbreviation of Austin
        assert_eq!(filtered_indices(&ds.cities, "tx"), vec![2]);
        assert_eq!(filtered_indices(&ds.cities, "angeles"), vec![1]);
        assert!(filtered_indices(&ds.cities, "zzz").is_empty());
    }

    #[test]
    fn test_selected_locations_keep_dataset_order() {
        let ds = small_dataset();
        let picked = selected_locations(&ds.states, &["WA", "CA", "XX"]);
        let ids: Vec<&str> = picked.iter().map(|l| l.id()).collect();
        assert_eq!(ids, vec!["CA", "WA"]);
    }
}
