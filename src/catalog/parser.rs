//! Tolerant parser turning the raw waypoint document into [`Waypoint`] values.
//!
//! The document is a loosely-typed YAML tree with a top-level `Icons` list.
//! Parsing walks that tree with explicit defaults and explicit required-field
//! checks; each element either yields a valid entry or a skip reason, and one
//! malformed element never aborts the batch. Policy for "the whole document
//! parsed to nothing" lives in the loader, not here.

use crate::catalog::entry::{BannerLayer, DyeColor, ItemKind, Waypoint};
use crate::catalog::patterns::{LegacyPatternTable, PatternRegistry};
use serde_yaml::Value;
use std::fmt;

/// Result of parsing one full document.
#[derive(Debug)]
pub struct ParseOutcome {
    /// Valid entries, in document order.
    pub waypoints: Vec<Waypoint>,
    /// Elements that failed validation and were dropped.
    pub skipped: usize,
}

/// Per-element outcome: a valid entry or a reason it was dropped.
enum ParsedIcon {
    Valid(Box<Waypoint>),
    Skipped(SkipReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SkipReason {
    NotAMap,
    MissingName,
    MissingDestination,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NotAMap => write!(f, "element is not a map"),
            SkipReason::MissingName => write!(f, "missing or empty 'name'"),
            SkipReason::MissingDestination => write!(f, "no destination id under actions"),
        }
    }
}

/// Parse the `Icons` list out of a waypoint document.
///
/// A missing or empty list yields an empty outcome; the caller decides
/// whether that is fatal.
pub fn parse_document(
    doc: &Value,
    legacy: &LegacyPatternTable,
    registry: &dyn PatternRegistry,
) -> ParseOutcome {
    let Some(icons) = doc.get("Icons").and_then(Value::as_sequence) else {
        log::error!("no 'Icons' list found in waypoint document");
        return ParseOutcome {
            waypoints: Vec::new(),
            skipped: 0,
        };
    };

    let mut waypoints = Vec::with_capacity(icons.len());
    let mut skipped = 0;

    for (index, raw) in icons.iter().enumerate() {
        match parse_icon(raw, legacy, registry) {
            ParsedIcon::Valid(waypoint) => waypoints.push(*waypoint),
            ParsedIcon::Skipped(reason) => {
                log::warn!("skipping waypoint at index {index}: {reason}");
                skipped += 1;
            }
        }
    }

    ParseOutcome { waypoints, skipped }
}

/// Parse a single element of the `Icons` list.
fn parse_icon(raw: &Value, legacy: &LegacyPatternTable, registry: &dyn PatternRegistry) -> ParsedIcon {
    if raw.as_mapping().is_none() {
        return ParsedIcon::Skipped(SkipReason::NotAMap);
    }

    let name = match raw.get("name").and_then(Value::as_str) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => return ParsedIcon::Skipped(SkipReason::MissingName),
    };

    // The nested item section governs every display field; all of it is optional.
    let item = raw.get("item");

    let mut kind = ItemKind::default();
    if let Some(tag) = item.and_then(|i| i.get("Type")).and_then(Value::as_str)
        && !tag.is_empty()
    {
        match ItemKind::match_name(tag) {
            Some(resolved) => kind = resolved,
            None => {
                log::warn!("waypoint '{name}' has unknown icon kind '{tag}', using default");
            }
        }
    }

    let display_name = item
        .and_then(|i| i.get("Name"))
        .and_then(Value::as_str)
        .unwrap_or(&name)
        .to_string();

    let lore: Vec<String> = item
        .and_then(|i| i.get("Lore"))
        .and_then(Value::as_sequence)
        .map(|lines| {
            lines
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let skull_owner = item
        .and_then(|i| i.get("SkullOwner"))
        .and_then(Value::as_str)
        .map(str::to_string);

    let banner = item
        .and_then(|i| i.get("Banner"))
        .and_then(Value::as_sequence)
        .map(|layers| parse_banner_layers(&name, layers, legacy, registry))
        .filter(|layers| !layers.is_empty());

    // Destination id lives at a fixed depth: first action -> value ->
    // destination -> id. Any deviation from that shape rejects the entry.
    let destination_id = raw
        .get("actions")
        .and_then(Value::as_sequence)
        .and_then(|actions| actions.first())
        .and_then(|action| action.get("value"))
        .and_then(|value| value.get("destination"))
        .and_then(|destination| destination.get("id"))
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty());

    let Some(destination_id) = destination_id else {
        return ParsedIcon::Skipped(SkipReason::MissingDestination);
    };

    let performed = raw
        .get("performed")
        .and_then(Value::as_i64)
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(0);

    let category = raw
        .get("page")
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string();

    ParsedIcon::Valid(Box::new(Waypoint {
        name,
        kind,
        display_name,
        lore,
        destination_id: destination_id.to_string(),
        performed,
        category,
        skull_owner,
        banner,
    }))
}

/// Parse banner layers, dropping any layer with an unrecognized color or an
/// unresolvable pattern.
fn parse_banner_layers(
    name: &str,
    layers: &[Value],
    legacy: &LegacyPatternTable,
    registry: &dyn PatternRegistry,
) -> Vec<BannerLayer> {
    let mut parsed = Vec::with_capacity(layers.len());

    for layer in layers {
        let Some(color_tag) = layer.get("color").and_then(Value::as_str) else {
            continue;
        };
        let Some(pattern_tag) = layer.get("pattern").and_then(Value::as_str) else {
            continue;
        };

        let Some(color) = DyeColor::from_name(color_tag) else {
            log::warn!("waypoint '{name}' has invalid banner color: {color_tag}");
            continue;
        };

        let pattern = legacy
            .canonical(pattern_tag)
            .and_then(|canonical| registry.resolve(canonical));
        let Some(pattern) = pattern else {
            log::warn!("waypoint '{name}' has invalid banner pattern: {pattern_tag}");
            continue;
        };

        parsed.push(BannerLayer { color, pattern });
    }

    parsed
}
