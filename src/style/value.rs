//! Dynamic style values: the key→value model shared by every engine stage.
//!
//! A style descriptor, a resolved style sheet, and a merged style object are
//! all [`StyleMap`]s; only the shapes of the values differ as a descriptor
//! moves through resolution, registration, and flattening. Values are
//! ordinary data except for [`StyleValue::Var`], which defers to a theme, and
//! [`StyleValue::Ref`], which points at a registered sheet block.
//!
//! Equality and hashing of numeric values are bitwise (`f64::to_bits`), so
//! maps are `Eq + Hash` and can key the combine-styles cache structurally.

use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use crate::style::registry::StyleRef;
use crate::theme::variable::ThemeVariable;

/// An ordered key→value style mapping.
///
/// `BTreeMap` keeps iteration deterministic, which the flattening fold and
/// the registry's structural interning both rely on.
pub type StyleMap = BTreeMap<String, StyleValue>;

// ---------------------------------------------------------------------------
// StyleValue
// ---------------------------------------------------------------------------

/// A single style property value.
#[derive(Clone)]
pub enum StyleValue {
    /// Numeric value (dimensions, font sizes, flex factors, ...).
    Number(f64),
    /// String value (color names, alignment keywords, ...).
    Str(String),
    /// Boolean flag value.
    Bool(bool),
    /// Opaque reference to a registered style sheet block.
    Ref(StyleRef),
    /// Several values merged under one key (see [`flatten`](crate::style::flatten)).
    List(Vec<StyleValue>),
    /// A nested rule block.
    Map(StyleMap),
    /// A deferred theme variable, substituted during resolution.
    Var(ThemeVariable),
}

impl StyleValue {
    /// Whether this value is an opaque registered-sheet reference.
    pub fn is_ref(&self) -> bool {
        matches!(self, Self::Ref(_))
    }

    /// Whether this value is a deferred theme variable.
    pub fn is_var(&self) -> bool {
        matches!(self, Self::Var(_))
    }

    /// Borrow the nested rule block, if this value is one.
    pub fn as_map(&self) -> Option<&StyleMap> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Borrow the string payload, if this value is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The numeric payload, if this value is one.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Short human-readable description of the value's shape, for error
    /// messages.
    pub(crate) fn shape(&self) -> &'static str {
        match self {
            Self::Number(_) => "a number",
            Self::Str(_) => "a string",
            Self::Bool(_) => "a bool",
            Self::Ref(_) => "a style reference",
            Self::List(_) => "a list",
            Self::Map(_) => "a rule map",
            Self::Var(_) => "a theme variable",
        }
    }
}

impl fmt::Debug for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n:?}"),
            Self::Str(s) => write!(f, "{s:?}"),
            Self::Bool(b) => write!(f, "{b:?}"),
            Self::Ref(r) => write!(f, "Ref({r:?})"),
            Self::List(items) => f.debug_list().entries(items).finish(),
            Self::Map(map) => f.debug_map().entries(map).finish(),
            Self::Var(var) => fmt::Debug::fmt(var, f),
        }
    }
}

impl PartialEq for StyleValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            // Bitwise comparison keeps equality consistent with hashing.
            (Self::Number(a), Self::Number(b)) => a.to_bits() == b.to_bits(),
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Ref(a), Self::Ref(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            (Self::Var(a), Self::Var(b)) => a.same_resolver(b),
            _ => false,
        }
    }
}

impl Eq for StyleValue {}

impl Hash for StyleValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Number(n) => n.to_bits().hash(state),
            Self::Str(s) => s.hash(state),
            Self::Bool(b) => b.hash(state),
            Self::Ref(r) => r.hash(state),
            Self::List(items) => items.hash(state),
            Self::Map(map) => map.hash(state),
            Self::Var(var) => var.resolver_addr().hash(state),
        }
    }
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

impl From<f64> for StyleValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for StyleValue {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<&str> for StyleValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_owned())
    }
}

impl From<String> for StyleValue {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<bool> for StyleValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<StyleRef> for StyleValue {
    fn from(r: StyleRef) -> Self {
        Self::Ref(r)
    }
}

impl From<Vec<StyleValue>> for StyleValue {
    fn from(items: Vec<StyleValue>) -> Self {
        Self::List(items)
    }
}

impl From<StyleMap> for StyleValue {
    fn from(map: StyleMap) -> Self {
        Self::Map(map)
    }
}

impl From<ThemeVariable> for StyleValue {
    fn from(var: ThemeVariable) -> Self {
        Self::Var(var)
    }
}

/// A shared, immutable merged style object.
///
/// The combine-styles cache and the decorator both hand styles around behind
/// `Rc` so a cache hit returns the identical object.
pub type SharedStyles = Rc<StyleMap>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::variable::ThemeVariable;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(value: &StyleValue) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn number_equality_is_bitwise() {
        assert_eq!(StyleValue::from(12.0), StyleValue::from(12.0));
        assert_ne!(StyleValue::from(12.0), StyleValue::from(12.5));
    }

    #[test]
    fn number_hash_matches_equality() {
        assert_eq!(hash_of(&StyleValue::from(3.5)), hash_of(&StyleValue::from(3.5)));
    }

    #[test]
    fn cross_variant_never_equal() {
        assert_ne!(StyleValue::from(1.0), StyleValue::from(true));
        assert_ne!(StyleValue::from("red"), StyleValue::from(vec![StyleValue::from("red")]));
    }

    #[test]
    fn from_i32_is_number() {
        assert_eq!(StyleValue::from(12), StyleValue::Number(12.0));
    }

    #[test]
    fn var_equality_is_resolver_identity() {
        let a = ThemeVariable::new(|_| None);
        let b = a.clone();
        let c = ThemeVariable::new(|_| None);
        assert_eq!(StyleValue::Var(a), StyleValue::Var(b));
        assert_ne!(StyleValue::Var(c), StyleValue::Var(ThemeVariable::new(|_| None)));
    }

    #[test]
    fn map_values_compare_structurally() {
        let mut a = StyleMap::new();
        a.insert("fontSize".into(), StyleValue::from(12.0));
        let mut b = StyleMap::new();
        b.insert("fontSize".into(), StyleValue::from(12.0));
        assert_eq!(StyleValue::Map(a), StyleValue::Map(b));
    }

    #[test]
    fn shape_names() {
        assert_eq!(StyleValue::from(1.0).shape(), "a number");
        assert_eq!(StyleValue::from("x").shape(), "a string");
        assert_eq!(StyleValue::Map(StyleMap::new()).shape(), "a rule map");
    }
}
