//! Combine-styles: creator composition with memoized evaluation.
//!
//! [`combine_styles`] folds several style creators into one callable that,
//! given current props and a theme, evaluates every relevant creator and
//! flattens the outputs. Results are memoized per (relevant props, theme):
//! the key covers exactly the prop names the constituent creators declared,
//! so changing an irrelevant prop can never invalidate the cache, and a hit
//! returns the identical shared style object without re-evaluating anything.
//!
//! Prop-dependent creators are indexed by their *first* declared dependency:
//! a creator is limited to a single prop dependency. This restriction is
//! deliberate and documented, not silently generalized.
//!
//! The memo store is a bounded LRU. Distinct (props, theme) combinations are
//! finite in practice, so eviction is rare; when it does happen the cost is
//! one recomputation, never a correctness change.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::num::NonZeroUsize;
use std::rc::Rc;

use lru::LruCache;

use crate::component::props::{PropValue, Props};
use crate::style::creators::StyleCreator;
use crate::style::flatten::{flatten, StyleSource};
use crate::style::value::SharedStyles;
use crate::theme::DEFAULT_THEME;

/// Default number of memoized (props, theme) combinations.
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

// ---------------------------------------------------------------------------
// StyleKey
// ---------------------------------------------------------------------------

/// Structural cache key: declared-dependency values plus theme name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct StyleKey {
    props: Vec<(String, PropValue)>,
    theme: String,
}

// ---------------------------------------------------------------------------
// CombinedStyles
// ---------------------------------------------------------------------------

/// Several style creators composed into one memoized style function.
pub struct CombinedStyles {
    independent: Vec<StyleCreator>,
    by_prop: BTreeMap<String, StyleCreator>,
    dependencies: Vec<String>,
    cache: RefCell<LruCache<StyleKey, SharedStyles>>,
}

/// Compose style creators into a single memoized style function.
///
/// # Example
///
/// ```
/// use std::rc::Rc;
/// use lacquer::style::combine::combine_styles;
/// use lacquer::style::creators::StyleCreators;
/// use lacquer::component::props::Props;
/// use lacquer::theme::{Theme, ThemeRegistry};
/// use lacquer::style;
///
/// let themes = Rc::new(ThemeRegistry::new().with_theme("default", Theme::new()));
/// let creators = StyleCreators::new(themes);
///
/// let combined = combine_styles([
///     creators
///         .component(style! { "root" => style! { "padding" => 8 } })
///         .unwrap(),
///     creators
///         .modifier(
///             "size",
///             style! { "small" => style! { "title" => style! { "fontSize" => 12 } } },
///         )
///         .unwrap(),
/// ]);
///
/// assert_eq!(combined.dependencies(), ["size".to_owned()]);
/// let styles = combined.create_styles(&Props::new().with_value("size", "small"), "default");
/// assert!(styles.contains_key("root"));
/// assert!(styles.contains_key("title"));
/// ```
pub fn combine_styles(creators: impl IntoIterator<Item = StyleCreator>) -> CombinedStyles {
    let mut independent = Vec::new();
    let mut by_prop = BTreeMap::new();
    let mut dependencies: Vec<String> = Vec::new();

    for creator in creators {
        if creator.is_prop_dependent() {
            // Single-dependency restriction: only the first declared prop
            // indexes the creator.
            let first = creator.dependencies()[0].clone();
            for name in creator.dependencies() {
                if !dependencies.contains(name) {
                    dependencies.push(name.clone());
                }
            }
            by_prop.insert(first, creator);
        } else {
            independent.push(creator);
        }
    }

    CombinedStyles {
        independent,
        by_prop,
        dependencies,
        cache: RefCell::new(LruCache::new(
            NonZeroUsize::new(DEFAULT_CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN),
        )),
    }
}

impl CombinedStyles {
    /// Replace the memo store with one of the given capacity (builder).
    ///
    /// Also clears any memoized entries.
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache = RefCell::new(LruCache::new(
            NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN),
        ));
        self
    }

    /// The union of prop names any constituent creator declared.
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    /// Evaluate (or recall) the merged styles for props under a theme.
    pub fn create_styles(&self, props: &Props, theme: &str) -> SharedStyles {
        let relevant: Vec<(String, PropValue)> = self
            .dependencies
            .iter()
            .filter_map(|name| {
                props
                    .value(name)
                    .filter(|value| !value.is_null())
                    .map(|value| (name.clone(), value.clone()))
            })
            .collect();
        let key = StyleKey {
            props: relevant,
            theme: theme.to_owned(),
        };

        if let Some(hit) = self.cache.borrow_mut().get(&key) {
            tracing::trace!(theme, "combined styles cache hit");
            return Rc::clone(hit);
        }

        let mut sources: Vec<StyleSource> = Vec::new();
        for creator in &self.independent {
            sources.push(StyleSource::from(creator.evaluate(props, theme)));
        }
        for (name, _) in &key.props {
            if let Some(creator) = self.by_prop.get(name) {
                sources.push(StyleSource::from(creator.evaluate(props, theme)));
            }
        }

        let styles: SharedStyles = Rc::new(flatten(sources));
        tracing::debug!(theme, relevant = key.props.len(), "combined styles cache miss");
        self.cache.borrow_mut().put(key, Rc::clone(&styles));
        styles
    }

    /// [`create_styles`](Self::create_styles) under the `"default"` theme.
    pub fn create_default_styles(&self, props: &Props) -> SharedStyles {
        self.create_styles(props, DEFAULT_THEME)
    }

    /// Number of memoized combinations currently held.
    pub fn cached_combinations(&self) -> usize {
        self.cache.borrow().len()
    }
}

impl fmt::Debug for CombinedStyles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CombinedStyles")
            .field("dependencies", &self.dependencies)
            .field("independent", &self.independent.len())
            .field("cached", &self.cache.borrow().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style;
    use crate::style::value::StyleMap;
    use std::cell::Cell;

    /// An instrumented creator that counts evaluations.
    fn counted_creator(
        dependencies: Vec<String>,
        result: StyleMap,
    ) -> (StyleCreator, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0usize));
        let calls_c = Rc::clone(&calls);
        let creator = StyleCreator::new(dependencies, move |_, _| {
            calls_c.set(calls_c.get() + 1);
            Some(result.clone())
        });
        (creator, calls)
    }

    #[test]
    fn merges_independent_and_dependent_outputs() {
        let (base, _) = counted_creator(Vec::new(), style! { "root" => 1 });
        let (sized, _) = counted_creator(vec!["size".to_owned()], style! { "title" => 2 });
        let combined = combine_styles([base, sized]);

        let styles =
            combined.create_styles(&Props::new().with_value("size", "small"), "default");
        assert!(styles.contains_key("root"));
        assert!(styles.contains_key("title"));
    }

    #[test]
    fn repeated_call_returns_identical_object_without_reevaluation() {
        let (base, calls) = counted_creator(Vec::new(), style! { "root" => 1 });
        let combined = combine_styles([base]);
        let props = Props::new().with_value("size", "small");

        let first = combined.create_styles(&props, "default");
        let second = combined.create_styles(&props, "default");

        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn irrelevant_prop_change_does_not_invalidate() {
        let (sized, calls) = counted_creator(vec!["size".to_owned()], style! { "t" => 1 });
        let combined = combine_styles([sized]);

        let first = combined.create_styles(
            &Props::new().with_value("size", "small").with_value("label", "a"),
            "default",
        );
        let second = combined.create_styles(
            &Props::new().with_value("size", "small").with_value("label", "b"),
            "default",
        );

        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(calls.get(), 1);
        assert_eq!(combined.cached_combinations(), 1);
    }

    #[test]
    fn relevant_prop_change_recomputes() {
        let (sized, calls) = counted_creator(vec!["size".to_owned()], style! { "t" => 1 });
        let combined = combine_styles([sized]);

        let small =
            combined.create_styles(&Props::new().with_value("size", "small"), "default");
        let medium =
            combined.create_styles(&Props::new().with_value("size", "medium"), "default");

        assert!(!Rc::ptr_eq(&small, &medium));
        assert_eq!(calls.get(), 2);
        assert_eq!(combined.cached_combinations(), 2);
    }

    #[test]
    fn theme_is_part_of_the_key() {
        let (base, calls) = counted_creator(Vec::new(), style! { "root" => 1 });
        let combined = combine_styles([base]);
        let props = Props::new();

        let default = combined.create_styles(&props, "default");
        let dark = combined.create_styles(&props, "dark");

        assert!(!Rc::ptr_eq(&default, &dark));
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn null_props_are_stripped_from_the_key() {
        let (sized, calls) = counted_creator(vec!["size".to_owned()], style! { "t" => 1 });
        let combined = combine_styles([sized]);

        let bare = combined.create_styles(&Props::new(), "default");
        let with_null = combined.create_styles(
            &Props::new().with_value("size", PropValue::Null),
            "default",
        );

        assert!(Rc::ptr_eq(&bare, &with_null));
        assert_eq!(calls.get(), 0); // null-stripped prop never reaches the creator
    }

    #[test]
    fn deep_equal_distinct_identity_props_hit_the_same_entry() {
        let (sized, calls) = counted_creator(vec!["size".to_owned()], style! { "t" => 1 });
        let combined = combine_styles([sized]);

        let a = Props::new().with_value("size", String::from("small"));
        let b = Props::new().with_value("size", String::from("small"));
        let first = combined.create_styles(&a, "default");
        let second = combined.create_styles(&b, "default");

        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn dependencies_union_in_declaration_order() {
        let (a, _) = counted_creator(vec!["size".to_owned()], style! {});
        let (b, _) = counted_creator(vec!["tone".to_owned()], style! {});
        let (c, _) = counted_creator(Vec::new(), style! {});
        let combined = combine_styles([a, c, b]);
        assert_eq!(combined.dependencies(), ["size".to_owned(), "tone".to_owned()]);
    }

    #[test]
    fn default_theme_convenience() {
        let (base, _) = counted_creator(Vec::new(), style! { "root" => 1 });
        let combined = combine_styles([base]);
        let via_default = combined.create_default_styles(&Props::new());
        let via_explicit = combined.create_styles(&Props::new(), "default");
        assert!(Rc::ptr_eq(&via_default, &via_explicit));
    }

    #[test]
    fn bounded_cache_evicts_least_recent() {
        let (sized, calls) = counted_creator(vec!["n".to_owned()], style! { "t" => 1 });
        let combined = combine_styles([sized]).with_cache_capacity(2);

        for n in 0..3 {
            combined.create_styles(&Props::new().with_value("n", n), "default");
        }
        assert_eq!(calls.get(), 3);
        assert_eq!(combined.cached_combinations(), 2);

        // n = 0 was evicted; asking again recomputes.
        combined.create_styles(&Props::new().with_value("n", 0), "default");
        assert_eq!(calls.get(), 4);
    }

    #[test]
    fn empty_combination_yields_empty_styles() {
        let combined = combine_styles([]);
        let styles = combined.create_styles(&Props::new(), "default");
        assert!(styles.is_empty());
        assert!(combined.dependencies().is_empty());
    }
}
