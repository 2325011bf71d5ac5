//! Theme and theme registry types.
//!
//! A [`Theme`] is an immutable named palette: a nested variable table with
//! lookups by dotted path. Themes are built once at application setup with
//! the chainable builder API and then frozen inside a [`ThemeRegistry`],
//! which the root provider shares (behind `Rc`) with every descendant.

use std::collections::BTreeMap;

use crate::style::value::{StyleMap, StyleValue};

/// Name of the fallback theme used when no theme is selected anywhere.
pub const DEFAULT_THEME: &str = "default";

// ---------------------------------------------------------------------------
// Theme
// ---------------------------------------------------------------------------

/// A named palette/variable set.
///
/// Variables live in a nested table addressed by dotted paths; colors are the
/// string-valued special case the [`get_color`](Theme::get_color) lookup
/// serves.
///
/// # Example
///
/// ```
/// use lacquer::theme::Theme;
///
/// let theme = Theme::new()
///     .with_color("button.primary", "#3366ff")
///     .with_color("button.danger", "#cc2222")
///     .with_variable("spacing.unit", 4.0);
///
/// assert_eq!(theme.get_color("button.primary").as_deref(), Some("#3366ff"));
/// assert!(theme.get_color("button.missing").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Theme {
    variables: StyleMap,
}

impl Theme {
    /// Create an empty theme.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a variable at a dotted path (builder).
    ///
    /// Intermediate path segments become nested maps; setting a path through
    /// an existing scalar replaces the scalar.
    pub fn with_variable(mut self, path: &str, value: impl Into<StyleValue>) -> Self {
        insert_at_path(&mut self.variables, path, value.into());
        self
    }

    /// Set a color variable at a dotted path (builder).
    pub fn with_color(self, path: &str, color: impl Into<String>) -> Self {
        self.with_variable(path, StyleValue::Str(color.into()))
    }

    /// Look a variable up by dotted path.
    pub fn variable(&self, path: &str) -> Option<&StyleValue> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut current = self.variables.get(first)?;
        for segment in segments {
            current = current.as_map()?.get(segment)?;
        }
        Some(current)
    }

    /// Look a color up by dotted path.
    ///
    /// Returns `None` when the path is missing or does not hold a string.
    pub fn get_color(&self, path: &str) -> Option<String> {
        self.variable(path)?.as_str().map(str::to_owned)
    }

    /// Whether the theme defines no variables.
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

fn insert_at_path(map: &mut StyleMap, path: &str, value: StyleValue) {
    match path.split_once('.') {
        None => {
            map.insert(path.to_owned(), value);
        }
        Some((head, rest)) => {
            let entry = map
                .entry(head.to_owned())
                .or_insert_with(|| StyleValue::Map(StyleMap::new()));
            if !matches!(entry, StyleValue::Map(_)) {
                *entry = StyleValue::Map(StyleMap::new());
            }
            if let StyleValue::Map(inner) = entry {
                insert_at_path(inner, rest, value);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// ThemeRegistry
// ---------------------------------------------------------------------------

/// The process-wide mapping from theme name to [`Theme`].
///
/// Built once by the root provider and never mutated afterwards; all
/// descendants read it through a shared `Rc`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThemeRegistry {
    themes: BTreeMap<String, Theme>,
}

impl ThemeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a named theme (builder).
    pub fn with_theme(mut self, name: impl Into<String>, theme: Theme) -> Self {
        self.themes.insert(name.into(), theme);
        self
    }

    /// Look a theme up by name.
    pub fn get(&self, name: &str) -> Option<&Theme> {
        self.themes.get(name)
    }

    /// The registered theme names, in deterministic order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.themes.keys().map(String::as_str)
    }

    /// Number of registered themes.
    pub fn len(&self) -> usize {
        self.themes.len()
    }

    /// Whether no themes are registered.
    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }
}
