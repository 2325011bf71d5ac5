//! Render descriptions: the data handed back to the host framework.
//!
//! The decorator does not render anything itself — it produces an
//! [`Element`] describing *what* to render: the wrapped component's type
//! name plus its fully merged props. The host framework consumes these;
//! returning the identical `Rc<Element>` across updates tells the host that
//! nothing below needs re-rendering.

use std::collections::BTreeMap;
use std::rc::Rc;

use crate::component::props::PropValue;
use crate::style::value::{SharedStyles, StyleMap};
use crate::theme::ThemeRegistry;

// ---------------------------------------------------------------------------
// ColorLookup
// ---------------------------------------------------------------------------

/// A color helper bound to the currently active theme.
///
/// Resolution happens at call time, through the shared registry: if the
/// active theme is missing (for example, no provider above), the lookup
/// degrades to `None` rather than failing.
#[derive(Debug, Clone)]
pub struct ColorLookup {
    themes: Rc<ThemeRegistry>,
    theme: String,
}

impl ColorLookup {
    /// Bind a lookup to a registry and an active theme name.
    pub fn new(themes: Rc<ThemeRegistry>, theme: impl Into<String>) -> Self {
        Self {
            themes,
            theme: theme.into(),
        }
    }

    /// The theme this lookup is bound to.
    pub fn theme(&self) -> &str {
        &self.theme
    }

    /// Look a color up by dotted path in the active theme.
    pub fn get(&self, path: &str) -> Option<String> {
        self.themes.get(&self.theme)?.get_color(path)
    }
}

// ---------------------------------------------------------------------------
// MergedProps
// ---------------------------------------------------------------------------

/// The final prop set handed to the wrapped component.
///
/// Built by the decorator: the caller's non-style props (minus any
/// utility-consumed names), the flattened `styles`, the active `theme`, and
/// a theme-bound color helper. The platform `style` prop and children pass
/// through untouched.
#[derive(Debug, Clone)]
pub struct MergedProps {
    /// The flattened, merged style object.
    pub styles: SharedStyles,
    /// Name of the active theme.
    pub theme: String,
    /// Color helper bound to the active theme.
    pub color: ColorLookup,
    /// Remaining caller props.
    pub values: BTreeMap<String, PropValue>,
    /// Pass-through platform style prop.
    pub style: Option<StyleMap>,
    /// Pass-through children.
    pub children: Option<Vec<Rc<Element>>>,
}

// ---------------------------------------------------------------------------
// Element
// ---------------------------------------------------------------------------

/// A render description: component type name plus merged props.
#[derive(Debug, Clone)]
pub struct Element {
    component: String,
    props: Option<MergedProps>,
    ref_name: Option<String>,
}

impl Element {
    /// Describe rendering `component` with fully merged props.
    pub fn new(component: impl Into<String>, props: MergedProps) -> Self {
        Self {
            component: component.into(),
            props: Some(props),
            ref_name: None,
        }
    }

    /// A bare description with no merged props.
    ///
    /// Used for children supplied from outside this engine, where only the
    /// identity of the description matters.
    pub fn bare(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            props: None,
            ref_name: None,
        }
    }

    /// Attach a named reference for host-framework interop (builder).
    pub fn with_ref_name(mut self, name: impl Into<String>) -> Self {
        self.ref_name = Some(name.into());
        self
    }

    /// The component type name to render.
    pub fn component(&self) -> &str {
        &self.component
    }

    /// The merged props, when produced by the decorator.
    pub fn props(&self) -> Option<&MergedProps> {
        self.props.as_ref()
    }

    /// The attached reference name, when `with_ref` decoration is on.
    pub fn ref_name(&self) -> Option<&str> {
        self.ref_name.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::Theme;

    fn registry() -> Rc<ThemeRegistry> {
        Rc::new(
            ThemeRegistry::new()
                .with_theme("default", Theme::new().with_color("accent", "#00f"))
                .with_theme("dark", Theme::new().with_color("accent", "#ff0")),
        )
    }

    #[test]
    fn color_lookup_resolves_active_theme() {
        let lookup = ColorLookup::new(registry(), "dark");
        assert_eq!(lookup.get("accent").as_deref(), Some("#ff0"));
        assert_eq!(lookup.theme(), "dark");
    }

    #[test]
    fn color_lookup_missing_theme_is_none() {
        let lookup = ColorLookup::new(registry(), "sepia");
        assert!(lookup.get("accent").is_none());
    }

    #[test]
    fn color_lookup_missing_path_is_none() {
        let lookup = ColorLookup::new(registry(), "default");
        assert!(lookup.get("absent").is_none());
    }

    #[test]
    fn bare_element_has_no_props() {
        let el = Element::bare("Text");
        assert_eq!(el.component(), "Text");
        assert!(el.props().is_none());
        assert!(el.ref_name().is_none());
    }

    #[test]
    fn ref_name_attaches() {
        let el = Element::bare("Text").with_ref_name("wrappedInstance");
        assert_eq!(el.ref_name(), Some("wrappedInstance"));
    }
}
