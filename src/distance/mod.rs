//! Distance ranking of waypoints relative to a reference position.
//!
//! Distances are horizontal-only: the vertical axis is ignored so targets
//! that differ only in height are not penalized, and coordinates remain
//! comparable across worlds that share a horizontal frame. Waypoints whose
//! position cannot be determined get [`UNKNOWN_DISTANCE`] and sort after
//! every resolved entry.

use crate::catalog::Waypoint;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Sentinel for "distance could not be computed". Doubles as the sort key
/// that pushes unresolved entries to the end.
pub const UNKNOWN_DISTANCE: f64 = f64::MAX;

/// A point in the shared coordinate frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// 2-D Euclidean distance over the horizontal axes only.
    pub fn horizontal_distance(&self, other: &Position) -> f64 {
        let dx = other.x - self.x;
        let dz = other.z - self.z;
        (dx * dx + dz * dz).sqrt()
    }
}

/// Resolves a destination id to its position, or reports it unresolved.
///
/// Implemented outside the core by whatever owns the destinations (the
/// teleport backend); [`StaticResolver`] covers tests and file-backed use.
pub trait PositionResolver {
    fn resolve(&self, destination_id: &str) -> Option<Position>;
}

/// In-memory resolver over a fixed id -> position map.
#[derive(Debug, Default)]
pub struct StaticResolver {
    positions: AHashMap<String, Position>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, destination_id: impl Into<String>, position: Position) {
        self.positions.insert(destination_id.into(), position);
    }

    /// Build a resolver from a YAML document mapping destination ids to
    /// `{x, y, z}` maps. Entries with missing coordinates are ignored.
    pub fn from_document(doc: &serde_yaml::Value) -> Self {
        let mut resolver = Self::new();
        let Some(mapping) = doc.as_mapping() else {
            return resolver;
        };
        for (key, value) in mapping {
            let Some(id) = key.as_str() else { continue };
            let coord = |axis: &str| value.get(axis).and_then(serde_yaml::Value::as_f64);
            if let (Some(x), Some(y), Some(z)) = (coord("x"), coord("y"), coord("z")) {
                resolver.insert(id, Position::new(x, y, z));
            }
        }
        resolver
    }
}

impl PositionResolver for StaticResolver {
    fn resolve(&self, destination_id: &str) -> Option<Position> {
        self.positions.get(destination_id).copied()
    }
}

/// Rank waypoints by distance from `origin`, pairing each with its computed
/// distance.
///
/// Without an origin or a resolver, every entry gets the sentinel distance
/// and the order falls back to case-insensitive alphabetical. Per-entry
/// resolution failure also yields the sentinel; those entries sort last,
/// alphabetical among themselves so the output stays deterministic.
pub fn rank_by_distance(
    waypoints: &[Waypoint],
    origin: Option<Position>,
    resolver: Option<&dyn PositionResolver>,
) -> Vec<(Waypoint, f64)> {
    let (Some(origin), Some(resolver)) = (origin, resolver) else {
        let mut ranked: Vec<(Waypoint, f64)> = waypoints
            .iter()
            .cloned()
            .map(|w| (w, UNKNOWN_DISTANCE))
            .collect();
        ranked.sort_by(|a, b| cmp_name(&a.0, &b.0));
        return ranked;
    };

    let mut ranked: Vec<(Waypoint, f64)> = waypoints
        .iter()
        .cloned()
        .map(|w| {
            let distance = resolver
                .resolve(&w.destination_id)
                .map(|target| origin.horizontal_distance(&target))
                .unwrap_or(UNKNOWN_DISTANCE);
            (w, distance)
        })
        .collect();

    ranked.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| cmp_name(&a.0, &b.0)));
    ranked
}

fn cmp_name(a: &Waypoint, b: &Waypoint) -> Ordering {
    a.name.to_lowercase().cmp(&b.name.to_lowercase())
}

/// Render a distance as a compact human string.
///
/// `"Unknown"` for the sentinel and non-finite values; whole blocks under
/// 1K; rounded thousands under 1M; millions with one decimal unless whole.
pub fn format_distance(distance: f64) -> String {
    if distance == UNKNOWN_DISTANCE || distance.is_nan() || distance.is_infinite() {
        return "Unknown".to_string();
    }

    let rounded = distance.round() as i64;

    if rounded < 1000 {
        format!("{rounded} blocks")
    } else if rounded < 1_000_000 {
        let thousands = (rounded as f64 / 1000.0).round() as i64;
        format!("{thousands}K blocks")
    } else {
        let millions = rounded as f64 / 1_000_000.0;
        if millions == millions.floor() {
            format!("{}M blocks", millions as i64)
        } else {
            format!("{millions:.1}M blocks")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ItemKind;

    fn waypoint(name: &str, destination_id: &str) -> Waypoint {
        Waypoint {
            name: name.to_string(),
            kind: ItemKind::default(),
            display_name: name.to_string(),
            lore: Vec::new(),
            destination_id: destination_id.to_string(),
            performed: 0,
            category: String::new(),
            skull_owner: None,
            banner: None,
        }
    }

    #[test]
    fn ranks_resolved_entries_ascending() {
        let waypoints = vec![waypoint("Far", "far"), waypoint("Near", "near")];
        let mut resolver = StaticResolver::new();
        resolver.insert("near", Position::new(3.0, 64.0, 0.0));
        resolver.insert("far", Position::new(4000.0, 12.0, 0.0));

        let ranked = rank_by_distance(
            &waypoints,
            Some(Position::new(0.0, 0.0, 0.0)),
            Some(&resolver),
        );

        assert_eq!(ranked[0].0.name, "Near");
        assert_eq!(ranked[0].1, 3.0);
        assert_eq!(ranked[1].0.name, "Far");
        assert_eq!(ranked[1].1, 4000.0);
    }

    #[test]
    fn vertical_offset_is_ignored() {
        let origin = Position::new(0.0, 0.0, 0.0);
        let high = Position::new(3.0, 255.0, 4.0);
        assert_eq!(origin.horizontal_distance(&high), 5.0);
    }

    #[test]
    fn unresolved_entries_sort_last_with_sentinel() {
        let waypoints = vec![
            waypoint("Void", "nowhere"),
            waypoint("Base", "base"),
            waypoint("Abyss", "nowhere-else"),
        ];
        let mut resolver = StaticResolver::new();
        resolver.insert("base", Position::new(10.0, 0.0, 0.0));

        let ranked = rank_by_distance(
            &waypoints,
            Some(Position::new(0.0, 0.0, 0.0)),
            Some(&resolver),
        );

        assert_eq!(ranked[0].0.name, "Base");
        // Sentinel entries come last, alphabetical among themselves.
        assert_eq!(ranked[1].0.name, "Abyss");
        assert_eq!(ranked[1].1, UNKNOWN_DISTANCE);
        assert_eq!(ranked[2].0.name, "Void");
        assert_eq!(ranked[2].1, UNKNOWN_DISTANCE);
    }

    #[test]
    fn missing_resolver_falls_back_to_alphabetical() {
        let waypoints = vec![
            waypoint("zulu", "z"),
            waypoint("Alpha", "a"),
            waypoint("mike", "m"),
        ];

        let ranked = rank_by_distance(&waypoints, Some(Position::new(0.0, 0.0, 0.0)), None);

        let names: Vec<&str> = ranked.iter().map(|(w, _)| w.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "mike", "zulu"]);
        assert!(ranked.iter().all(|(_, d)| *d == UNKNOWN_DISTANCE));
    }

    #[test]
    fn missing_origin_falls_back_to_alphabetical() {
        let waypoints = vec![waypoint("B", "b"), waypoint("a", "a")];
        let resolver = StaticResolver::new();
        let ranked = rank_by_distance(&waypoints, None, Some(&resolver));
        assert_eq!(ranked[0].0.name, "a");
        assert_eq!(ranked[1].0.name, "B");
    }

    #[test]
    fn formats_block_counts() {
        assert_eq!(format_distance(3.0), "3 blocks");
        assert_eq!(format_distance(456.4), "456 blocks");
        assert_eq!(format_distance(999.0), "999 blocks");
    }

    #[test]
    fn formats_thousands() {
        assert_eq!(format_distance(1000.0), "1K blocks");
        assert_eq!(format_distance(4000.0), "4K blocks");
        assert_eq!(format_distance(123_456.0), "123K blocks");
        assert_eq!(format_distance(999_999.0), "1000K blocks");
    }

    #[test]
    fn formats_millions() {
        assert_eq!(format_distance(3_000_000.0), "3M blocks");
        assert_eq!(format_distance(2_600_000.0), "2.6M blocks");
        assert_eq!(format_distance(30_000_000.0), "30M blocks");
    }

    #[test]
    fn formats_unknown_for_sentinel_and_non_finite() {
        assert_eq!(format_distance(UNKNOWN_DISTANCE), "Unknown");
        assert_eq!(format_distance(f64::NAN), "Unknown");
        assert_eq!(format_distance(f64::INFINITY), "Unknown");
    }
}
