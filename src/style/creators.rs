//! Style-creator combinators: prop- and theme-aware style constructors.
//!
//! A [`StyleCreator`] pairs an evaluation function with the list of prop
//! names it reads, as an explicit record — the combine-styles cache computes
//! cache keys from the declared list without re-deriving anything. An empty
//! list means the creator depends on the theme alone.
//!
//! Four constructors cover the combinator algebra:
//!
//! - [`component`](StyleCreators::component) — one themed block, no props;
//! - [`modifier`](StyleCreators::modifier) — variant block keyed by a prop
//!   value;
//! - [`bool_modifier`](StyleCreators::bool_modifier) — themed block gated by
//!   a truthy prop;
//! - [`util`](StyleCreators::util) — non-themed utility sheet keyed by a
//!   prop value.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::component::props::{PropValue, Props};
use crate::error::ConfigError;
use crate::style::registry;
use crate::style::resolve::{StyleResolver, ThemedStyles};
use crate::style::value::StyleMap;
use crate::theme::ThemeRegistry;

// ---------------------------------------------------------------------------
// StyleCreator
// ---------------------------------------------------------------------------

/// A style descriptor: an evaluation function plus its declared prop
/// dependencies.
///
/// Output must be pure and deterministic for a given (relevant props, theme)
/// pair — the combine-styles cache relies on it. A creator that reads a prop
/// it does not declare produces stale cached styles; declaring every read
/// prop is the composition author's invariant to uphold.
#[derive(Clone)]
pub struct StyleCreator {
    evaluate: Rc<dyn Fn(&Props, &str) -> Option<StyleMap>>,
    dependencies: Vec<String>,
}

impl StyleCreator {
    /// Build a creator from a dependency list and an evaluation function.
    pub fn new(
        dependencies: Vec<String>,
        evaluate: impl Fn(&Props, &str) -> Option<StyleMap> + 'static,
    ) -> Self {
        Self {
            evaluate: Rc::new(evaluate),
            dependencies,
        }
    }

    /// Evaluate against current props and a theme name.
    pub fn evaluate(&self, props: &Props, theme: &str) -> Option<StyleMap> {
        (self.evaluate)(props, theme)
    }

    /// The prop names this creator reads. Empty means theme-only.
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    /// Whether this creator reads any props.
    pub fn is_prop_dependent(&self) -> bool {
        !self.dependencies.is_empty()
    }
}

impl fmt::Debug for StyleCreator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StyleCreator")
            .field("dependencies", &self.dependencies)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// StyleCreators
// ---------------------------------------------------------------------------

/// Factory for the combinator algebra, bound to a theme registry.
#[derive(Debug, Clone)]
pub struct StyleCreators {
    resolver: StyleResolver,
}

impl StyleCreators {
    /// Create a factory over a frozen theme registry.
    pub fn new(themes: Rc<ThemeRegistry>) -> Self {
        Self {
            resolver: StyleResolver::new(themes),
        }
    }

    /// A themed style block with no prop dependency.
    ///
    /// The returned creator looks its resolved sheet up by theme name.
    ///
    /// # Errors
    ///
    /// Fails fast when `styles` is not a descriptor of rule blocks.
    pub fn component(&self, styles: StyleMap) -> Result<StyleCreator, ConfigError> {
        let themed = self.resolver.resolve(&styles)?;
        Ok(StyleCreator::new(Vec::new(), move |_, theme| {
            themed.get(theme).map(|sheet| (**sheet).clone())
        }))
    }

    /// A style block that alternates on a discrete prop value.
    ///
    /// `variants` maps each discrete value of `props[prop]` to its own
    /// themed descriptor.
    ///
    /// # Errors
    ///
    /// Fails fast when a variant is not a descriptor of rule blocks.
    pub fn modifier(&self, prop: &str, variants: StyleMap) -> Result<StyleCreator, ConfigError> {
        let mut themed_variants: BTreeMap<String, ThemedStyles> = BTreeMap::new();
        for (key, value) in &variants {
            let descriptor = value.as_map().ok_or_else(|| ConfigError::InvalidBlock {
                block: key.clone(),
                context: "modifier",
                found: value.shape(),
            })?;
            themed_variants.insert(key.clone(), self.resolver.resolve(descriptor)?);
        }

        let prop_name = prop.to_owned();
        Ok(StyleCreator::new(vec![prop.to_owned()], move |props, theme| {
            let key = props.value(&prop_name)?.variant_key()?;
            themed_variants
                .get(&key)?
                .get(theme)
                .map(|sheet| (**sheet).clone())
        }))
    }

    /// A themed style block returned only while a prop is truthy.
    ///
    /// # Errors
    ///
    /// Fails fast when `styles` is not a descriptor of rule blocks.
    pub fn bool_modifier(&self, prop: &str, styles: StyleMap) -> Result<StyleCreator, ConfigError> {
        let themed = self.resolver.resolve(&styles)?;
        let prop_name = prop.to_owned();
        Ok(StyleCreator::new(vec![prop.to_owned()], move |props, theme| {
            if !props.value(&prop_name).is_some_and(PropValue::is_truthy) {
                return None;
            }
            themed.get(theme).map(|sheet| (**sheet).clone())
        }))
    }

    /// A non-themed utility sheet keyed by a prop value.
    ///
    /// The whole variant sheet registers once up front; evaluation returns
    /// the selected reference under the `"utils"` key.
    ///
    /// # Errors
    ///
    /// Fails fast when a variant is not a rule map.
    pub fn util(&self, prop: &str, variants: StyleMap) -> Result<StyleCreator, ConfigError> {
        let sheet = registry::create(&variants)?;
        let prop_name = prop.to_owned();
        Ok(StyleCreator::new(vec![prop.to_owned()], move |props, _| {
            let key = props.value(&prop_name)?.variant_key()?;
            let value = sheet.get(&key)?.clone();
            let mut out = StyleMap::new();
            out.insert("utils".to_owned(), value);
            Some(out)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style;
    use crate::theme::variable::color;
    use crate::theme::Theme;

    fn creators() -> StyleCreators {
        StyleCreators::new(Rc::new(
            ThemeRegistry::new()
                .with_theme("default", Theme::new().with_color("text", "#111"))
                .with_theme("dark", Theme::new().with_color("text", "#eee")),
        ))
    }

    #[test]
    fn component_has_no_dependencies() {
        let creator = creators()
            .component(style! { "root" => style! { "padding" => 4 } })
            .unwrap();
        assert!(creator.dependencies().is_empty());
        assert!(!creator.is_prop_dependent());
    }

    #[test]
    fn component_looks_up_by_theme() {
        let creator = creators()
            .component(style! { "root" => style! { "color" => color("text") } })
            .unwrap();

        let default = creator.evaluate(&Props::new(), "default").unwrap();
        let dark = creator.evaluate(&Props::new(), "dark").unwrap();
        assert!(default["root"].is_ref());
        assert_ne!(default["root"], dark["root"]);
        assert!(creator.evaluate(&Props::new(), "sepia").is_none());
    }

    #[test]
    fn component_rejects_scalar_blocks() {
        assert!(matches!(
            creators().component(style! { "oops" => "scalar" }),
            Err(ConfigError::InvalidBlock { .. })
        ));
    }

    #[test]
    fn modifier_declares_exactly_its_prop() {
        let creator = creators()
            .modifier(
                "size",
                style! {
                    "small" => style! { "title" => style! { "fontSize" => 12 } },
                    "medium" => style! { "title" => style! { "fontSize" => 18 } },
                },
            )
            .unwrap();
        assert_eq!(creator.dependencies(), ["size".to_owned()]);
    }

    #[test]
    fn modifier_selects_variant_by_prop_value() {
        let creator = creators()
            .modifier(
                "size",
                style! {
                    "small" => style! { "title" => style! { "fontSize" => 12 } },
                    "medium" => style! { "title" => style! { "fontSize" => 18 } },
                },
            )
            .unwrap();

        let small = creator
            .evaluate(&Props::new().with_value("size", "small"), "default")
            .unwrap();
        let medium = creator
            .evaluate(&Props::new().with_value("size", "medium"), "default")
            .unwrap();
        assert_ne!(small["title"], medium["title"]);
    }

    #[test]
    fn modifier_unknown_variant_is_none() {
        let creator = creators()
            .modifier(
                "size",
                style! { "small" => style! { "title" => style! { "fontSize" => 12 } } },
            )
            .unwrap();
        assert!(creator
            .evaluate(&Props::new().with_value("size", "huge"), "default")
            .is_none());
        assert!(creator.evaluate(&Props::new(), "default").is_none());
    }

    #[test]
    fn modifier_rejects_scalar_variants() {
        assert!(matches!(
            creators().modifier("size", style! { "small" => 12 }),
            Err(ConfigError::InvalidBlock { .. })
        ));
    }

    #[test]
    fn bool_modifier_gates_on_truthiness() {
        let creator = creators()
            .bool_modifier("disabled", style! { "root" => style! { "opacity" => 0.4 } })
            .unwrap();

        assert_eq!(creator.dependencies(), ["disabled".to_owned()]);
        assert!(creator
            .evaluate(&Props::new().with_value("disabled", true), "default")
            .is_some());
        assert!(creator
            .evaluate(&Props::new().with_value("disabled", false), "default")
            .is_none());
        assert!(creator.evaluate(&Props::new(), "default").is_none());
    }

    #[test]
    fn util_returns_selected_sheet_under_utils() {
        let creator = creators()
            .util(
                "rounding",
                style! {
                    "small" => style! { "borderRadius" => 3 },
                    "medium" => style! { "borderRadius" => 5 },
                },
            )
            .unwrap();

        assert_eq!(creator.dependencies(), ["rounding".to_owned()]);
        let out = creator
            .evaluate(&Props::new().with_value("rounding", "small"), "default")
            .unwrap();
        assert_eq!(out.len(), 1);
        assert!(out["utils"].is_ref());
    }

    #[test]
    fn util_is_theme_independent() {
        let creator = creators()
            .util("rounding", style! { "small" => style! { "borderRadius" => 3 } })
            .unwrap();
        let props = Props::new().with_value("rounding", "small");
        assert_eq!(
            creator.evaluate(&props, "default"),
            creator.evaluate(&props, "dark")
        );
    }

    #[test]
    fn util_missing_prop_is_none() {
        let creator = creators()
            .util("rounding", style! { "small" => style! { "borderRadius" => 3 } })
            .unwrap();
        assert!(creator.evaluate(&Props::new(), "default").is_none());
    }

    #[test]
    fn custom_creator_record() {
        let creator = StyleCreator::new(vec!["tone".to_owned()], |props, _| {
            props
                .value("tone")
                .and_then(PropValue::as_str)
                .map(|tone| style! { "root" => style! { "tone" => tone } })
        });
        assert_eq!(creator.dependencies(), ["tone".to_owned()]);
        assert!(creator
            .evaluate(&Props::new().with_value("tone", "loud"), "default")
            .is_some());
    }

    #[test]
    fn debug_shows_dependencies() {
        let creator = StyleCreator::new(vec!["size".to_owned()], |_, _| None);
        let dbg = format!("{creator:?}");
        assert!(dbg.contains("size"));
    }
}
