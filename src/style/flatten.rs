//! Style flattening: ordered, list-aware merging of style sources.
//!
//! Flattening folds a sequence of partial style objects into one. Order is
//! significant: later sources are more specific. Unlike a plain overwrite
//! cascade, colliding keys never silently lose information:
//!
//! - two lists merge by order-preserving set union;
//! - a scalar joins an existing list instead of replacing it;
//! - two differing scalars become a two-element list, deliberately surfacing
//!   the conflict for the rendering layer to resolve.

use crate::style::value::{StyleMap, StyleValue};

// ---------------------------------------------------------------------------
// StyleSource
// ---------------------------------------------------------------------------

/// One input to [`flatten`]: nothing, a single style object, or a nested
/// group of further sources.
///
/// Groups are flattened depth-first into one flat ordered sequence before
/// merging; empty sources are dropped.
#[derive(Debug, Clone, PartialEq)]
pub enum StyleSource {
    /// No contribution; skipped.
    Empty,
    /// A single style object.
    One(StyleMap),
    /// An ordered group of nested sources.
    Group(Vec<StyleSource>),
}

impl From<StyleMap> for StyleSource {
    fn from(map: StyleMap) -> Self {
        Self::One(map)
    }
}

impl From<Option<StyleMap>> for StyleSource {
    fn from(map: Option<StyleMap>) -> Self {
        map.map_or(Self::Empty, Self::One)
    }
}

impl From<Vec<StyleSource>> for StyleSource {
    fn from(sources: Vec<StyleSource>) -> Self {
        Self::Group(sources)
    }
}

// ---------------------------------------------------------------------------
// flatten
// ---------------------------------------------------------------------------

/// Merge an ordered sequence of style sources into one style object.
///
/// Pure and deterministic for a given input order. `flatten([])` is the
/// empty map.
///
/// # Example
///
/// ```
/// use lacquer::style::flatten::{flatten, StyleSource};
/// use lacquer::style::value::StyleValue;
/// use lacquer::style;
///
/// let merged = flatten([
///     StyleSource::from(style! { "color" => "red", "padding" => 4 }),
///     StyleSource::Empty,
///     StyleSource::from(style! { "color" => "blue" }),
/// ]);
///
/// // The color conflict is kept, not overwritten.
/// assert_eq!(
///     merged["color"],
///     StyleValue::List(vec!["red".into(), "blue".into()])
/// );
/// assert_eq!(merged["padding"], StyleValue::from(4));
/// ```
pub fn flatten(sources: impl IntoIterator<Item = StyleSource>) -> StyleMap {
    let mut result = StyleMap::new();
    for source in sources {
        fold_source(&mut result, source);
    }
    result
}

fn fold_source(result: &mut StyleMap, source: StyleSource) {
    match source {
        StyleSource::Empty => {}
        StyleSource::Group(nested) => {
            for inner in nested {
                fold_source(result, inner);
            }
        }
        StyleSource::One(map) => {
            for (key, right) in map {
                match result.remove(&key) {
                    None => {
                        result.insert(key, right);
                    }
                    Some(left) => {
                        result.insert(key, merge_values(left, right));
                    }
                }
            }
        }
    }
}

/// The per-key merge rule (left = accumulated, right = incoming).
fn merge_values(left: StyleValue, right: StyleValue) -> StyleValue {
    match (left, right) {
        (StyleValue::List(a), StyleValue::List(b)) => StyleValue::List(union(a, b)),
        (StyleValue::List(mut a), scalar) => {
            a.push(scalar);
            StyleValue::List(a)
        }
        (scalar, StyleValue::List(b)) => {
            let mut items = Vec::with_capacity(b.len() + 1);
            items.push(scalar);
            items.extend(b);
            StyleValue::List(items)
        }
        (a, b) if a == b => a,
        (a, b) => StyleValue::List(vec![a, b]),
    }
}

/// Order-preserving set union: left order first, then unseen right items.
fn union(mut left: Vec<StyleValue>, right: Vec<StyleValue>) -> Vec<StyleValue> {
    for item in right {
        if !left.contains(&item) {
            left.push(item);
        }
    }
    left
}
