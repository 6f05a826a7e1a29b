//! Banner pattern identifier translation and resolution.
//!
//! The source document stores patterns as short legacy codes (`"b"`, `"cr"`,
//! `"drs"`). Parsing first translates a legacy code to its canonical
//! identifier through [`LegacyPatternTable`], then resolves the canonical
//! identifier against a [`PatternRegistry`]. A layer failing either step is
//! dropped from the entry, never fatal to it.

use crate::catalog::entry::BannerPattern;
use ahash::AHashMap;

/// Legacy code -> canonical pattern identifier.
const LEGACY_PATTERN_IDS: &[(&str, &str)] = &[
    ("b", "base"),
    ("bs", "stripe_bottom"),
    ("ts", "stripe_top"),
    ("ls", "stripe_left"),
    ("rs", "stripe_right"),
    ("cs", "stripe_center"),
    ("ms", "stripe_middle"),
    ("drs", "stripe_downright"),
    ("dls", "stripe_downleft"),
    ("ss", "small_stripes"),
    ("cr", "cross"),
    ("sc", "square_bottom_left"),
    ("ld", "diagonal_left"),
    ("rud", "diagonal_up_right"),
    ("lud", "diagonal_up_left"),
    ("rd", "diagonal_right"),
    ("vh", "half_vertical"),
    ("vhr", "half_vertical_right"),
    ("hh", "half_horizontal"),
    ("hhb", "half_horizontal_bottom"),
    ("bl", "square_bottom_left"),
    ("br", "square_bottom_right"),
    ("tl", "square_top_left"),
    ("tr", "square_top_right"),
    ("bt", "triangle_bottom"),
    ("tt", "triangle_top"),
    ("bts", "triangles_bottom"),
    ("tts", "triangles_top"),
    ("mc", "circle"),
    ("mr", "rhombus"),
    ("bo", "border"),
    ("cbo", "curly_border"),
    ("bri", "bricks"),
    ("gra", "gradient"),
    ("gru", "gradient_up"),
    ("cre", "creeper"),
    ("sku", "skull"),
    ("flo", "flower"),
    ("moj", "mojang"),
    ("glb", "globe"),
    ("pig", "piglin"),
];

/// Translation table from legacy pattern codes to canonical identifiers.
///
/// Built once at startup; lookups are case-insensitive on the legacy code.
pub struct LegacyPatternTable {
    map: AHashMap<&'static str, &'static str>,
}

impl LegacyPatternTable {
    pub fn new() -> Self {
        Self {
            map: LEGACY_PATTERN_IDS.iter().copied().collect(),
        }
    }

    /// Canonical identifier for a legacy code, or `None` if unknown.
    pub fn canonical(&self, legacy: &str) -> Option<&'static str> {
        self.map.get(legacy.to_ascii_lowercase().as_str()).copied()
    }
}

impl Default for LegacyPatternTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolves canonical pattern identifiers to recognized pattern values.
///
/// The real registry lives outside this crate; [`BuiltinPatternRegistry`]
/// covers the patterns the catalog format has historically used.
pub trait PatternRegistry {
    fn resolve(&self, canonical_id: &str) -> Option<BannerPattern>;
}

/// Registry backed by the fixed set of canonical pattern identifiers.
#[derive(Debug, Default)]
pub struct BuiltinPatternRegistry;

impl PatternRegistry for BuiltinPatternRegistry {
    fn resolve(&self, canonical_id: &str) -> Option<BannerPattern> {
        LEGACY_PATTERN_IDS
            .iter()
            .find(|(_, canonical)| *canonical == canonical_id)
            .map(|(_, canonical)| BannerPattern::new(*canonical))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translates_legacy_codes() {
        let table = LegacyPatternTable::new();
        assert_eq!(table.canonical("b"), Some("base"));
        assert_eq!(table.canonical("cr"), Some("cross"));
        assert_eq!(table.canonical("CR"), Some("cross"));
        assert_eq!(table.canonical("nope"), None);
    }

    #[test]
    fn builtin_registry_resolves_canonical_ids() {
        let registry = BuiltinPatternRegistry;
        let pattern = registry.resolve("stripe_bottom").unwrap();
        assert_eq!(pattern.id(), "stripe_bottom");
        assert!(registry.resolve("bs").is_none(), "legacy codes are not canonical ids");
    }
}
