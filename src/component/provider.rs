//! Root theme provider and the context scope it exposes.
//!
//! A [`ThemeProvider`] sits at the root of a component tree and owns the
//! frozen theme registry plus the optional shared utility styles. It exposes
//! a [`ThemeContext`] — an explicit, read-only scope object the host threads
//! through descendant mounts and updates. Each provider instance defines its
//! own independent scope; there is no process-wide mutable state.
//!
//! When no provider exists above a component, [`ThemeContext::detached`]
//! supplies the degraded scope: an empty registry and the `"default"` theme
//! name, under which color lookups return `None` rather than failing.

use std::rc::Rc;

use crate::style::combine::CombinedStyles;
use crate::theme::{Theme, ThemeRegistry, DEFAULT_THEME};

// ---------------------------------------------------------------------------
// ThemeProvider
// ---------------------------------------------------------------------------

/// Root-level owner of themes and shared utility styles.
///
/// # Example
///
/// ```
/// use std::rc::Rc;
/// use lacquer::component::provider::ThemeProvider;
/// use lacquer::theme::{Theme, ThemeRegistry};
///
/// let themes = Rc::new(
///     ThemeRegistry::new()
///         .with_theme("default", Theme::new().with_color("accent", "#00f"))
///         .with_theme("dark", Theme::new().with_color("accent", "#ff0")),
/// );
///
/// let provider = ThemeProvider::new(themes).with_default_theme("dark");
/// let ctx = provider.context();
/// assert_eq!(ctx.theme(), "dark");
/// assert!(ctx.get_theme("default").is_some());
/// ```
#[derive(Debug)]
pub struct ThemeProvider {
    default_theme: String,
    themes: Rc<ThemeRegistry>,
    utils: Option<Rc<CombinedStyles>>,
}

impl ThemeProvider {
    /// Create a provider over a frozen registry.
    ///
    /// The default theme name starts as `"default"` and no utility styles
    /// are shared.
    pub fn new(themes: Rc<ThemeRegistry>) -> Self {
        Self {
            default_theme: DEFAULT_THEME.to_owned(),
            themes,
            utils: None,
        }
    }

    /// Set the theme exposed to descendants that select none (builder).
    pub fn with_default_theme(mut self, name: impl Into<String>) -> Self {
        self.default_theme = name.into();
        self
    }

    /// Share a combined utility-style function with descendants (builder).
    pub fn with_utils(mut self, utils: CombinedStyles) -> Self {
        self.utils = Some(Rc::new(utils));
        self
    }

    /// The scope exposed to descendants.
    pub fn context(&self) -> Rc<ThemeContext> {
        Rc::new(ThemeContext {
            theme: self.default_theme.clone(),
            themes: Rc::clone(&self.themes),
            utils: self.utils.clone(),
        })
    }

    /// Look a theme up by name.
    pub fn get_theme(&self, name: &str) -> Option<&Theme> {
        self.themes.get(name)
    }

    /// The registry this provider owns.
    pub fn themes(&self) -> &Rc<ThemeRegistry> {
        &self.themes
    }
}

// ---------------------------------------------------------------------------
// ThemeContext
// ---------------------------------------------------------------------------

/// The read-only scope a provider exposes to its descendants.
#[derive(Debug, Clone)]
pub struct ThemeContext {
    theme: String,
    themes: Rc<ThemeRegistry>,
    utils: Option<Rc<CombinedStyles>>,
}

impl ThemeContext {
    /// The degraded scope used when no provider exists above a component.
    pub fn detached() -> Rc<Self> {
        Rc::new(Self {
            theme: DEFAULT_THEME.to_owned(),
            themes: Rc::new(ThemeRegistry::new()),
            utils: None,
        })
    }

    /// Name of the ambient theme.
    pub fn theme(&self) -> &str {
        &self.theme
    }

    /// The shared theme registry.
    pub fn themes(&self) -> &Rc<ThemeRegistry> {
        &self.themes
    }

    /// The shared utility-style function, if the provider set one.
    pub fn utils(&self) -> Option<&Rc<CombinedStyles>> {
        self.utils.as_ref()
    }

    /// Look a theme up by name.
    pub fn get_theme(&self, name: &str) -> Option<&Theme> {
        self.themes.get(name)
    }

    /// A derived scope with a different ambient theme name.
    ///
    /// Registry and utils are shared with the parent scope; decorated
    /// components use this to republish their adopted theme to descendants.
    pub fn for_theme(&self, theme: impl Into<String>) -> Rc<Self> {
        Rc::new(Self {
            theme: theme.into(),
            themes: Rc::clone(&self.themes),
            utils: self.utils.clone(),
        })
    }
}
