//! The connect/decorate engine: wrapping presentational components.
//!
//! [`styled`] builds a decorator around a presentational [`Component`]. Each
//! mounted [`StyledInstance`] tracks exactly which inputs its merged style
//! depends on and recomputes as little as possible per update:
//!
//! - styles are recomputed only when the style-relevant prop subset, the
//!   utility-relevant prop subset, or the caller's `styles` prop changed;
//! - merged props are rebuilt only when styles or props changed;
//! - otherwise the identical previously produced [`Element`] is returned, so
//!   the host framework can skip the whole subtree.
//!
//! An instance moves through Constructing → Mounted → (Updating)* →
//! Unmounting: [`StyledComponent::mount`] constructs it,
//! [`StyledInstance::receive`] applies a prop/context transition,
//! [`StyledInstance::render`] produces the next render description, and
//! [`StyledInstance::unmount`] clears every cached field.
//!
//! Style definitions can be swapped at development time with
//! [`StyledComponent::hot_swap`]; a thread-local generation counter lets
//! mounted instances notice the swap and drop their caches.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::component::element::{ColorLookup, Element, MergedProps};
use crate::component::props::{children_equal, PropValue, Props};
use crate::component::provider::ThemeContext;
use crate::style::combine::CombinedStyles;
use crate::style::flatten::{flatten, StyleSource};
use crate::style::value::{SharedStyles, StyleMap};

/// Default reference name attached in `with_ref` mode.
pub const DEFAULT_REF_NAME: &str = "wrappedInstance";

// ---------------------------------------------------------------------------
// Generation counter (live reload)
// ---------------------------------------------------------------------------

thread_local! {
    static NEXT_GENERATION: Cell<u64> = Cell::new(1);
}

fn next_generation() -> u64 {
    NEXT_GENERATION.with(|counter| {
        let generation = counter.get();
        counter.set(generation + 1);
        generation
    })
}

// ---------------------------------------------------------------------------
// Component
// ---------------------------------------------------------------------------

/// A presentational component type, as far as this engine is concerned.
///
/// The engine never renders components itself; it only needs a type name to
/// put into the render descriptions it hands back to the host framework.
pub trait Component {
    /// The host-facing type name used in render descriptions.
    fn type_name(&self) -> &str;
}

// ---------------------------------------------------------------------------
// StyledOptions
// ---------------------------------------------------------------------------

/// Decoration options.
#[derive(Debug, Clone)]
pub struct StyledOptions {
    /// Attach an accessible reference to the wrapped component.
    pub with_ref: bool,
    /// Name of the attached reference.
    pub ref_name: String,
    /// Skip re-rendering entirely when no tracked input changed.
    pub pure: bool,
}

impl Default for StyledOptions {
    fn default() -> Self {
        Self {
            with_ref: false,
            ref_name: DEFAULT_REF_NAME.to_owned(),
            pure: true,
        }
    }
}

impl StyledOptions {
    /// Default options: no ref, pure updates.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a reference to the wrapped component (builder).
    pub fn with_ref(mut self, with_ref: bool) -> Self {
        self.with_ref = with_ref;
        self
    }

    /// Rename the attached reference (builder).
    pub fn ref_name(mut self, name: impl Into<String>) -> Self {
        self.ref_name = name.into();
        self
    }

    /// Enable or disable pure update skipping (builder).
    pub fn pure(mut self, pure: bool) -> Self {
        self.pure = pure;
        self
    }
}

// ---------------------------------------------------------------------------
// styled / Styled
// ---------------------------------------------------------------------------

/// Begin decorating: a style definition awaiting its component.
///
/// # Example
///
/// ```
/// use std::rc::Rc;
/// use lacquer::component::props::Props;
/// use lacquer::component::provider::ThemeProvider;
/// use lacquer::component::styled::{styled, Component};
/// use lacquer::style::combine::combine_styles;
/// use lacquer::style::creators::StyleCreators;
/// use lacquer::theme::{Theme, ThemeRegistry};
/// use lacquer::style;
///
/// struct Label;
/// impl Component for Label {
///     fn type_name(&self) -> &str {
///         "Label"
///     }
/// }
///
/// let themes = Rc::new(ThemeRegistry::new().with_theme("default", Theme::new()));
/// let creators = StyleCreators::new(Rc::clone(&themes));
/// let decorated = styled(combine_styles([creators
///     .component(style! { "root" => style! { "padding" => 8 } })
///     .unwrap()]))
/// .wrap(Label);
///
/// let ctx = ThemeProvider::new(themes).context();
/// let mut instance = decorated.mount(Props::new(), &ctx);
/// let element = instance.render();
/// assert_eq!(element.component(), "Label");
/// ```
pub fn styled(styles: CombinedStyles) -> Styled {
    Styled {
        styles: Rc::new(styles),
        default_props: Props::new(),
        options: StyledOptions::default(),
    }
}

/// Builder produced by [`styled`]; call [`wrap`](Styled::wrap) to finish.
#[derive(Debug)]
pub struct Styled {
    styles: Rc<CombinedStyles>,
    default_props: Props,
    options: StyledOptions,
}

impl Styled {
    /// Supply default props merged under every instance's props (builder).
    pub fn with_default_props(mut self, props: Props) -> Self {
        self.default_props = props;
        self
    }

    /// Supply decoration options (builder).
    pub fn with_options(mut self, options: StyledOptions) -> Self {
        self.options = options;
        self
    }

    /// Attach the presentational component, finishing the decorator.
    pub fn wrap<C: Component>(self, component: C) -> StyledComponent<C> {
        StyledComponent {
            component,
            shared: Rc::new(StyledShared {
                styles: RefCell::new(self.styles),
                default_props: self.default_props,
                options: self.options,
                generation: Cell::new(next_generation()),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// StyledComponent
// ---------------------------------------------------------------------------

/// State shared between a decorator and all of its mounted instances.
struct StyledShared {
    styles: RefCell<Rc<CombinedStyles>>,
    default_props: Props,
    options: StyledOptions,
    generation: Cell<u64>,
}

/// A decorated component type: mounts [`StyledInstance`]s.
pub struct StyledComponent<C: Component> {
    component: C,
    shared: Rc<StyledShared>,
}

impl<C: Component> StyledComponent<C> {
    /// The wrapped presentational component.
    pub fn component(&self) -> &C {
        &self.component
    }

    /// The decoration options in effect.
    pub fn options(&self) -> &StyledOptions {
        &self.shared.options
    }

    /// Mount an instance with initial props under a context scope.
    ///
    /// The instance's theme comes from an explicit `theme` prop if present,
    /// else from the scope.
    pub fn mount(&self, props: Props, ctx: &Rc<ThemeContext>) -> StyledInstance {
        let props = props.with_defaults(&self.shared.default_props);
        let theme = props
            .theme()
            .unwrap_or_else(|| ctx.theme())
            .to_owned();
        tracing::trace!(
            component = self.component.type_name(),
            theme = %theme,
            "instance mounted"
        );
        StyledInstance {
            shared: Rc::clone(&self.shared),
            component_name: self.component.type_name().to_owned(),
            ctx: Rc::clone(ctx),
            props,
            theme,
            generation: self.shared.generation.get(),
            // Dirty from birth so the first should_render always passes.
            dirty: true,
            style_prop_values: None,
            util_prop_values: None,
            styles: None,
            util_styles: None,
            prop_styles: None,
            flattened: None,
            rendered: None,
        }
    }

    /// Install a new style definition (development-time live reload).
    ///
    /// Mounted instances notice the generation bump on their next update and
    /// drop every cached field.
    pub fn hot_swap(&self, styles: CombinedStyles) {
        *self.shared.styles.borrow_mut() = Rc::new(styles);
        self.shared.generation.set(next_generation());
        tracing::debug!(
            component = self.component.type_name(),
            "style definition hot-swapped"
        );
    }
}

impl<C: Component> fmt::Debug for StyledComponent<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StyledComponent")
            .field("component", &self.component.type_name())
            .field("generation", &self.shared.generation.get())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// StyledInstance
// ---------------------------------------------------------------------------

/// A mounted decorated component.
pub struct StyledInstance {
    shared: Rc<StyledShared>,
    component_name: String,
    ctx: Rc<ThemeContext>,
    props: Props,
    theme: String,
    generation: u64,
    dirty: bool,
    style_prop_values: Option<BTreeMap<String, PropValue>>,
    util_prop_values: Option<BTreeMap<String, PropValue>>,
    styles: Option<SharedStyles>,
    util_styles: Option<SharedStyles>,
    prop_styles: Option<StyleMap>,
    flattened: Option<SharedStyles>,
    rendered: Option<Rc<Element>>,
}

impl StyledInstance {
    /// The active theme name.
    pub fn theme(&self) -> &str {
        &self.theme
    }

    /// The current (defaults-merged) props.
    pub fn props(&self) -> &Props {
        &self.props
    }

    /// Whether the next [`should_render`](Self::should_render) will pass.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Apply an incoming prop/context transition.
    ///
    /// Computes the dirty flag from the comparison rules (children by
    /// reference, `style`/`styles` deeply, everything else key-wise), clears
    /// caches on a style-definition generation mismatch, and adopts a new
    /// theme from the explicit prop or, failing that, the scope.
    pub fn receive(&mut self, next_props: Props, next_ctx: &Rc<ThemeContext>) {
        let next = next_props.with_defaults(&self.shared.default_props);
        self.dirty = self.props_changed(&next);

        // Live-reload invalidation.
        let generation = self.shared.generation.get();
        if self.generation != generation {
            self.generation = generation;
            self.clear_cache();
            tracing::debug!(
                component = %self.component_name,
                "style definition changed; instance caches cleared"
            );
        }

        // Theme adoption: an explicit prop wins; otherwise follow the scope.
        match next.theme().map(str::to_owned) {
            Some(theme) => {
                if theme != self.theme {
                    self.adopt_theme(theme);
                }
            }
            None => {
                if next_ctx.theme() != self.theme {
                    self.adopt_theme(next_ctx.theme().to_owned());
                }
            }
        }

        self.props = next;
        self.ctx = Rc::clone(next_ctx);
    }

    /// Whether the instance should produce a new render description.
    ///
    /// Always true outside pure mode; in pure mode, only when dirty.
    pub fn should_render(&self) -> bool {
        !self.shared.options.pure || self.dirty
    }

    /// Produce the render description for the current state.
    ///
    /// Reuses the previous description (identical allocation) when neither
    /// styles nor props changed since it was produced.
    pub fn render(&mut self) -> Rc<Element> {
        let had_props_changed = self.dirty;
        self.dirty = false;

        let have_styles_changed = self.update_styles_if_needed();

        if !have_styles_changed && !had_props_changed {
            if let Some(element) = &self.rendered {
                return Rc::clone(element);
            }
        }

        let mut element = Element::new(self.component_name.clone(), self.merged_props());
        if self.shared.options.with_ref {
            element = element.with_ref_name(self.shared.options.ref_name.clone());
        }
        let element = Rc::new(element);
        self.rendered = Some(Rc::clone(&element));
        element
    }

    /// Convenience transition: receive, then render when needed.
    ///
    /// Returns `None` when pure mode skips the update entirely.
    pub fn update(&mut self, next_props: Props, next_ctx: &Rc<ThemeContext>) -> Option<Rc<Element>> {
        self.receive(next_props, next_ctx);
        if self.should_render() {
            Some(self.render())
        } else {
            None
        }
    }

    /// The scope this instance republishes to its descendants: the parent
    /// scope with this instance's theme.
    pub fn child_context(&self) -> Rc<ThemeContext> {
        self.ctx.for_theme(self.theme.clone())
    }

    /// Tear the instance down, clearing every cached field.
    pub fn unmount(&mut self) {
        self.clear_cache();
        tracing::trace!(component = %self.component_name, "instance unmounted");
    }

    // -- internals ----------------------------------------------------------

    fn props_changed(&self, next: &Props) -> bool {
        if !children_equal(self.props.children(), next.children()) {
            return true;
        }
        if self.props.values() != next.values() {
            return true;
        }
        if self.props.style() != next.style() {
            return true;
        }
        self.props.styles() != next.styles()
    }

    fn adopt_theme(&mut self, theme: String) {
        tracing::debug!(component = %self.component_name, theme = %theme, "theme adopted");
        self.theme = theme;
        // Cached styles were computed against the previous theme.
        self.clear_cache();
    }

    /// Recompute whichever style pieces changed; true when anything did.
    fn update_styles_if_needed(&mut self) -> bool {
        let styles_fn = self.shared.styles.borrow().clone();
        let style_prop_values = self.props.pick(styles_fn.dependencies());
        let util_prop_values = match self.ctx.utils() {
            Some(utils) => self.props.pick(utils.dependencies()),
            None => BTreeMap::new(),
        };
        let prop_styles = self.props.styles().cloned();

        let needs_styles = self.needs_style_update(&style_prop_values);
        let needs_utils = self.needs_util_update(&util_prop_values);
        let needs_prop_styles = prop_styles != self.prop_styles;

        if !needs_styles && !needs_utils && !needs_prop_styles {
            return false;
        }

        if needs_styles {
            let subset = Props::from_values(style_prop_values.clone());
            self.styles = Some(styles_fn.create_styles(&subset, &self.theme));
            self.style_prop_values = Some(style_prop_values);
        }
        if needs_utils {
            if let Some(utils) = self.ctx.utils() {
                let subset = Props::from_values(util_prop_values.clone());
                self.util_styles = Some(utils.create_styles(&subset, &self.theme));
            }
            self.util_prop_values = Some(util_prop_values);
        }
        if needs_prop_styles {
            self.prop_styles = prop_styles;
        }

        self.flattened = Some(Rc::new(flatten([
            shared_source(self.styles.as_ref()),
            shared_source(self.util_styles.as_ref()),
            StyleSource::from(self.prop_styles.clone()),
        ])));
        true
    }

    fn needs_style_update(&self, subset: &BTreeMap<String, PropValue>) -> bool {
        if subset.is_empty() && self.styles.is_some() {
            return false;
        }
        if self.styles.is_some() && self.style_prop_values.as_ref() == Some(subset) {
            return false;
        }
        true
    }

    fn needs_util_update(&self, subset: &BTreeMap<String, PropValue>) -> bool {
        if subset.is_empty() {
            return false;
        }
        if self.util_styles.is_some() && self.util_prop_values.as_ref() == Some(subset) {
            return false;
        }
        true
    }

    fn merged_props(&self) -> MergedProps {
        let mut values = self.props.values().clone();
        if let Some(utils) = self.ctx.utils() {
            for name in utils.dependencies() {
                values.remove(name);
            }
        }
        MergedProps {
            styles: self
                .flattened
                .clone()
                .unwrap_or_else(|| Rc::new(StyleMap::new())),
            theme: self.theme.clone(),
            color: ColorLookup::new(Rc::clone(self.ctx.themes()), self.theme.clone()),
            values,
            style: self.props.style().cloned(),
            children: self.props.children().map(<[_]>::to_vec),
        }
    }

    fn clear_cache(&mut self) {
        self.style_prop_values = None;
        self.util_prop_values = None;
        self.styles = None;
        self.util_styles = None;
        self.prop_styles = None;
        self.flattened = None;
        self.rendered = None;
        self.dirty = true;
    }
}

impl fmt::Debug for StyledInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StyledInstance")
            .field("component", &self.component_name)
            .field("theme", &self.theme)
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}

fn shared_source(styles: Option<&SharedStyles>) -> StyleSource {
    match styles {
        Some(shared) => StyleSource::One((**shared).clone()),
        None => StyleSource::Empty,
    }
}
