//! Free-text search over a catalog snapshot.
//!
//! Multi-term AND logic with case-insensitive substring matching: a query of
//! `"peter mary"` matches entries containing BOTH "peter" AND "mary", each
//! term in any searchable field (name, stripped display name, destination
//! id, or any stripped lore line).

use crate::catalog::Waypoint;
use crate::search::markup::strip_markup;
use rayon::prelude::*;

/// Snapshot size at which matching moves to a parallel filter.
const PARALLEL_THRESHOLD: usize = 4096;

/// Filter a snapshot by a free-text query.
///
/// Returns an order-preserving subsequence of `snapshot`. An empty or
/// whitespace-only query returns the full snapshot unfiltered.
pub fn search(snapshot: &[Waypoint], query: &str) -> Vec<Waypoint> {
    let normalized = query.trim().to_lowercase();
    if normalized.is_empty() {
        return snapshot.to_vec();
    }

    let terms: Vec<&str> = normalized.split_whitespace().collect();

    if snapshot.len() >= PARALLEL_THRESHOLD {
        snapshot
            .par_iter()
            .filter(|w| matches(w, &terms))
            .cloned()
            .collect()
    } else {
        snapshot
            .iter()
            .filter(|w| matches(w, &terms))
            .cloned()
            .collect()
    }
}

/// AND across terms: every term must match somewhere in the entry.
fn matches(waypoint: &Waypoint, terms: &[&str]) -> bool {
    terms.iter().all(|term| matches_term(waypoint, term))
}

/// OR across fields: one term matches if it is a substring of any
/// searchable field. `term` is already lowercase.
fn matches_term(waypoint: &Waypoint, term: &str) -> bool {
    if waypoint.name.to_lowercase().contains(term) {
        return true;
    }

    if strip_markup(&waypoint.display_name).to_lowercase().contains(term) {
        return true;
    }

    if waypoint.destination_id.to_lowercase().contains(term) {
        return true;
    }

    waypoint
        .lore
        .iter()
        .any(|line| strip_markup(line).to_lowercase().contains(term))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ItemKind;

    fn waypoint(name: &str, lore: &[&str], destination_id: &str) -> Waypoint {
        Waypoint {
            name: name.to_string(),
            kind: ItemKind::default(),
            display_name: name.to_string(),
            lore: lore.iter().map(|s| s.to_string()).collect(),
            destination_id: destination_id.to_string(),
            performed: 0,
            category: String::new(),
            skull_owner: None,
            banner: None,
        }
    }

    fn fixture() -> Vec<Waypoint> {
        vec![
            waypoint("Spawn", &["&7Main area"], "spawn"),
            waypoint("Mine Entrance", &[], "mine1"),
        ]
    }

    fn names(results: &[Waypoint]) -> Vec<&str> {
        results.iter().map(|w| w.name.as_str()).collect()
    }

    #[test]
    fn empty_query_returns_full_snapshot_in_order() {
        let snapshot = fixture();
        assert_eq!(names(&search(&snapshot, "")), vec!["Spawn", "Mine Entrance"]);
        assert_eq!(names(&search(&snapshot, "   \t ")), vec!["Spawn", "Mine Entrance"]);
    }

    #[test]
    fn matches_by_name_case_insensitively() {
        let snapshot = fixture();
        assert_eq!(names(&search(&snapshot, "spawn")), vec!["Spawn"]);
        assert_eq!(names(&search(&snapshot, "SPAWN")), vec!["Spawn"]);
    }

    #[test]
    fn matches_through_stripped_lore() {
        let snapshot = fixture();
        assert_eq!(names(&search(&snapshot, "main area")), vec!["Spawn"]);
    }

    #[test]
    fn matches_by_destination_id() {
        let snapshot = fixture();
        assert_eq!(names(&search(&snapshot, "mine1")), vec!["Mine Entrance"]);
    }

    #[test]
    fn matches_through_stripped_display_name() {
        let mut snapshot = fixture();
        snapshot[1].display_name = "&b&lDeep &7Shaft".to_string();
        assert_eq!(names(&search(&snapshot, "deep shaft")), vec!["Mine Entrance"]);
    }

    #[test]
    fn no_match_yields_empty() {
        let snapshot = fixture();
        assert!(search(&snapshot, "nonexistent").is_empty());
    }

    #[test]
    fn all_terms_must_match() {
        let snapshot = fixture();
        // "mine" matches the second entry, "area" only the first: AND excludes both.
        assert!(search(&snapshot, "mine area").is_empty());
        assert_eq!(names(&search(&snapshot, "main spawn")), vec!["Spawn"]);
    }

    #[test]
    fn term_order_does_not_change_the_matched_set() {
        let snapshot = fixture();
        assert_eq!(
            names(&search(&snapshot, "main area")),
            names(&search(&snapshot, "area main"))
        );
    }

    #[test]
    fn duplicate_and_single_character_terms_are_honored() {
        let snapshot = fixture();
        assert_eq!(names(&search(&snapshot, "spawn spawn")), vec!["Spawn"]);
        // Single character matches broadly but is not rejected.
        assert_eq!(names(&search(&snapshot, "e")), vec!["Spawn", "Mine Entrance"]);
    }

    #[test]
    fn parallel_path_preserves_snapshot_order() {
        let snapshot: Vec<Waypoint> = (0..PARALLEL_THRESHOLD + 50)
            .map(|i| waypoint(&format!("Waypoint {i:05}"), &[], &format!("wp{i}")))
            .collect();
        let results = search(&snapshot, "waypoint");
        assert_eq!(results.len(), snapshot.len());
        for (result, original) in results.iter().zip(snapshot.iter()) {
            assert_eq!(result.name, original.name);
        }
    }
}
