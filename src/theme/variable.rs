//! Deferred theme values.
//!
//! A theme variable is a placeholder inside a style descriptor that only
//! becomes a concrete value once a theme is known. The resolver walks
//! descriptors, recognizes these by their [`StyleValue::Var`] variant, and
//! substitutes the result of calling them with each registered theme.
//!
//! Resolution is idempotent: resolving the same variable twice against the
//! same theme yields the same concrete value.

use std::fmt;
use std::rc::Rc;

use crate::style::value::StyleValue;
use crate::theme::Theme;

// ---------------------------------------------------------------------------
// ThemeVariable
// ---------------------------------------------------------------------------

/// A deferred value: a function of a theme, carried inside a style
/// descriptor until resolution substitutes it.
#[derive(Clone)]
pub struct ThemeVariable {
    resolver: Rc<dyn Fn(&Theme) -> Option<StyleValue>>,
}

impl ThemeVariable {
    /// Wrap a resolver function as a deferred value.
    ///
    /// The resolver may return `None` when the theme has no answer (for
    /// example a missing palette entry); the property is then dropped from
    /// the resolved sheet rather than carrying a placeholder.
    pub fn new(resolver: impl Fn(&Theme) -> Option<StyleValue> + 'static) -> Self {
        Self {
            resolver: Rc::new(resolver),
        }
    }

    /// Resolve against a concrete theme.
    pub fn resolve(&self, theme: &Theme) -> Option<StyleValue> {
        (self.resolver)(theme)
    }

    /// Whether two variables share the same resolver.
    ///
    /// Closures have no structural equality; identity of the shared resolver
    /// is the only meaningful comparison.
    pub fn same_resolver(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.resolver, &other.resolver)
    }

    /// Address of the shared resolver, used for hashing.
    pub(crate) fn resolver_addr(&self) -> usize {
        Rc::as_ptr(&self.resolver) as *const () as usize
    }
}

impl fmt::Debug for ThemeVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ThemeVariable(@{:#x})", self.resolver_addr())
    }
}

// ---------------------------------------------------------------------------
// Constructors
// ---------------------------------------------------------------------------

/// Build a family of deferred values from a resolver taking one argument.
///
/// This is the general constructor: the returned closure captures its
/// argument and produces a [`StyleValue::Var`] that applies the resolver to
/// `(theme, argument)` once a theme is known.
///
/// ```
/// use lacquer::theme::variable::theme_variable;
/// use lacquer::style::value::StyleValue;
///
/// let spacing = theme_variable(|theme, factor: &f64| {
///     theme
///         .variable("spacing.unit")
///         .and_then(StyleValue::as_number)
///         .map(|unit| StyleValue::Number(unit * factor))
/// });
///
/// let double = spacing(2.0); // deferred until resolution
/// assert!(double.is_var());
/// ```
pub fn theme_variable<T, F>(resolver: F) -> impl Fn(T) -> StyleValue
where
    T: Clone + 'static,
    F: Fn(&Theme, &T) -> Option<StyleValue> + 'static,
{
    let resolver = Rc::new(resolver);
    move |arg: T| {
        let resolver = resolver.clone();
        StyleValue::Var(ThemeVariable::new(move |theme| resolver(theme, &arg)))
    }
}

/// Stock deferred value: look a color up by dotted path in the active theme.
///
/// Mirrors the common case of palette-driven styling; resolves to the
/// theme's color string, or drops the property when the theme has no entry.
pub fn color(path: impl Into<String>) -> StyleValue {
    let path = path.into();
    StyleValue::Var(ThemeVariable::new(move |theme| {
        theme.get_color(&path).map(StyleValue::Str)
    }))
}
