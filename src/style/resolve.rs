//! Theme-variable resolution: raw descriptors → per-theme registered sheets.
//!
//! A raw style descriptor maps block names to rule maps whose property values
//! are either plain primitives or deferred theme variables. The resolver
//! produces one registered sheet per theme, short-circuiting when the
//! descriptor cannot vary by theme:
//!
//! 1. every block is already a registered reference → the descriptor itself
//!    is shared identically under every theme (same allocation, no
//!    re-registration);
//! 2. no deferred variable anywhere → registered once, shared under every
//!    theme;
//! 3. otherwise each theme gets its own substituted-and-registered sheet.

use std::collections::BTreeMap;
use std::rc::Rc;

use crate::error::ConfigError;
use crate::style::registry;
use crate::style::value::{SharedStyles, StyleMap, StyleValue};
use crate::theme::{Theme, ThemeRegistry};

/// Theme name → resolved, registered style sheet.
pub type ThemedStyles = BTreeMap<String, SharedStyles>;

// ---------------------------------------------------------------------------
// StyleResolver
// ---------------------------------------------------------------------------

/// Resolves style descriptors against every theme in a registry.
#[derive(Debug, Clone)]
pub struct StyleResolver {
    themes: Rc<ThemeRegistry>,
}

impl StyleResolver {
    /// Create a resolver over a frozen theme registry.
    pub fn new(themes: Rc<ThemeRegistry>) -> Self {
        Self { themes }
    }

    /// The registry this resolver resolves against.
    pub fn themes(&self) -> &Rc<ThemeRegistry> {
        &self.themes
    }

    /// Resolve a raw descriptor into per-theme registered sheets.
    ///
    /// # Errors
    ///
    /// Fails fast — before any theme is consulted — when a top-level value is
    /// not a rule map or an already-registered reference.
    pub fn resolve(&self, styles: &StyleMap) -> Result<ThemedStyles, ConfigError> {
        for (name, value) in styles {
            if !matches!(value, StyleValue::Map(_) | StyleValue::Ref(_)) {
                return Err(ConfigError::InvalidBlock {
                    block: name.clone(),
                    context: "style resolution",
                    found: value.shape(),
                });
            }
        }

        // Already registered: reuse the descriptor itself for every theme.
        if styles.values().all(StyleValue::is_ref) {
            return Ok(self.shared(styles.clone()));
        }

        // Theme-independent: one registration, shared by every theme.
        if !has_variables(styles) {
            let sheet = registry::create(styles)?;
            return Ok(self.shared(sheet));
        }

        let mut resolved = ThemedStyles::new();
        for name in self.themes.names() {
            let theme = match self.themes.get(name) {
                Some(theme) => theme,
                None => continue,
            };
            let substituted = substitute(styles, theme);
            let sheet = registry::create(&substituted)?;
            tracing::trace!(theme = name, blocks = sheet.len(), "resolved themed styles");
            resolved.insert(name.to_owned(), Rc::new(sheet));
        }
        Ok(resolved)
    }

    fn shared(&self, sheet: StyleMap) -> ThemedStyles {
        let shared: SharedStyles = Rc::new(sheet);
        self.themes
            .names()
            .map(|name| (name.to_owned(), Rc::clone(&shared)))
            .collect()
    }
}

fn has_variables(styles: &StyleMap) -> bool {
    styles.values().any(|block| match block {
        StyleValue::Map(rule) => rule.values().any(StyleValue::is_var),
        _ => false,
    })
}

fn substitute(styles: &StyleMap, theme: &Theme) -> StyleMap {
    styles
        .iter()
        .map(|(name, block)| {
            let value = match block {
                StyleValue::Map(rule) => StyleValue::Map(substitute_rule(rule, theme)),
                other => other.clone(),
            };
            (name.clone(), value)
        })
        .collect()
}

fn substitute_rule(rule: &StyleMap, theme: &Theme) -> StyleMap {
    let mut out = StyleMap::new();
    for (prop, value) in rule {
        match value {
            StyleValue::Var(var) => {
                // Unresolvable properties are dropped, not carried as
                // placeholders.
                if let Some(resolved) = var.resolve(theme) {
                    out.insert(prop.clone(), resolved);
                }
            }
            other => {
                out.insert(prop.clone(), other.clone());
            }
        }
    }
    out
}
