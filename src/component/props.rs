//! Component props: the dynamic attribute bag the decorator diffs.
//!
//! Props separate four kinds of input because the decorator compares each
//! differently (see [`styled`](crate::component::styled)):
//!
//! - ordinary named values, compared key-wise;
//! - `children` render descriptions, compared by reference per element;
//! - the pass-through platform `style`, compared deeply;
//! - the caller's `styles` overrides, compared deeply and merged into the
//!   computed styles.

use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use crate::component::element::Element;
use crate::style::value::StyleMap;

// ---------------------------------------------------------------------------
// PropValue
// ---------------------------------------------------------------------------

/// A single dynamic prop value.
#[derive(Debug, Clone)]
pub enum PropValue {
    /// An explicitly unset value; stripped before style evaluation.
    Null,
    /// Boolean flag.
    Bool(bool),
    /// Numeric value.
    Number(f64),
    /// String value.
    Str(String),
    /// List of values.
    List(Vec<PropValue>),
}

impl PropValue {
    /// Whether this is the explicit null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// JS-like truthiness, used by boolean-gated style creators.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0.0,
            Self::Str(s) => !s.is_empty(),
            Self::List(items) => !items.is_empty(),
        }
    }

    /// Borrow the string payload, if this value is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Canonical string form used to index keyed style variants.
    ///
    /// Numbers format without a trailing `.0` so `size = 2` and `size = 2.0`
    /// address the same variant; null and list values address none.
    pub fn variant_key(&self) -> Option<String> {
        match self {
            Self::Null | Self::List(_) => None,
            Self::Bool(b) => Some(b.to_string()),
            Self::Str(s) => Some(s.clone()),
            Self::Number(n) => {
                if n.is_finite() && n.fract() == 0.0 {
                    Some(format!("{}", *n as i64))
                } else {
                    Some(n.to_string())
                }
            }
        }
    }
}

impl PartialEq for PropValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            // Bitwise comparison keeps equality consistent with hashing.
            (Self::Number(a), Self::Number(b)) => a.to_bits() == b.to_bits(),
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for PropValue {}

impl Hash for PropValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Null => {}
            Self::Bool(b) => b.hash(state),
            Self::Number(n) => n.to_bits().hash(state),
            Self::Str(s) => s.hash(state),
            Self::List(items) => items.hash(state),
        }
    }
}

impl From<bool> for PropValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for PropValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for PropValue {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<&str> for PropValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_owned())
    }
}

impl From<String> for PropValue {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<Vec<PropValue>> for PropValue {
    fn from(items: Vec<PropValue>) -> Self {
        Self::List(items)
    }
}

// ---------------------------------------------------------------------------
// Props
// ---------------------------------------------------------------------------

/// The full prop set handed to a decorated component.
#[derive(Debug, Clone, Default)]
pub struct Props {
    values: BTreeMap<String, PropValue>,
    children: Option<Vec<Rc<Element>>>,
    style: Option<StyleMap>,
    styles: Option<StyleMap>,
}

impl Props {
    /// Create an empty prop set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a named value (builder).
    pub fn with_value(mut self, name: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Set the children render descriptions (builder).
    pub fn with_children(mut self, children: Vec<Rc<Element>>) -> Self {
        self.children = Some(children);
        self
    }

    /// Set the pass-through platform `style` prop (builder).
    pub fn with_style(mut self, style: StyleMap) -> Self {
        self.style = Some(style);
        self
    }

    /// Set the caller's `styles` overrides (builder).
    pub fn with_styles(mut self, styles: StyleMap) -> Self {
        self.styles = Some(styles);
        self
    }

    /// Look a named value up.
    pub fn value(&self, name: &str) -> Option<&PropValue> {
        self.values.get(name)
    }

    /// All named values.
    pub fn values(&self) -> &BTreeMap<String, PropValue> {
        &self.values
    }

    /// The children render descriptions, if any.
    pub fn children(&self) -> Option<&[Rc<Element>]> {
        self.children.as_deref()
    }

    /// The pass-through platform `style` prop, if any.
    pub fn style(&self) -> Option<&StyleMap> {
        self.style.as_ref()
    }

    /// The caller's `styles` overrides, if any.
    pub fn styles(&self) -> Option<&StyleMap> {
        self.styles.as_ref()
    }

    /// The explicit `theme` prop, if one is set.
    pub fn theme(&self) -> Option<&str> {
        self.value("theme").and_then(PropValue::as_str)
    }

    /// Fill missing entries from a default prop set.
    ///
    /// Incoming values win; defaults only supply what is absent.
    pub fn with_defaults(mut self, defaults: &Props) -> Self {
        for (name, value) in &defaults.values {
            self.values
                .entry(name.clone())
                .or_insert_with(|| value.clone());
        }
        if self.children.is_none() {
            self.children = defaults.children.clone();
        }
        if self.style.is_none() {
            self.style = defaults.style.clone();
        }
        if self.styles.is_none() {
            self.styles = defaults.styles.clone();
        }
        self
    }

    /// The non-null subset of named values matching `names`, in name order.
    pub fn pick(&self, names: &[String]) -> BTreeMap<String, PropValue> {
        names
            .iter()
            .filter_map(|name| {
                self.values
                    .get(name)
                    .filter(|value| !value.is_null())
                    .map(|value| (name.clone(), value.clone()))
            })
            .collect()
    }

    /// Build a prop set from named values alone.
    pub fn from_values(values: BTreeMap<String, PropValue>) -> Self {
        Self {
            values,
            ..Self::default()
        }
    }
}

/// Children comparison: both present → shallow per-element reference
/// equality; otherwise presence must match.
pub(crate) fn children_equal(a: Option<&[Rc<Element>]>, b: Option<&[Rc<Element>]>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| Rc::ptr_eq(x, y))
        }
        _ => false,
    }
}
