//! # lacquer
//!
//! A themable, prop-aware style-composition layer for component-tree UI
//! frameworks.
//!
//! lacquer lets components declare style rules that depend on their props and
//! on a selectable theme (a named palette/variable set), then decorates them
//! so that the merged style is recomputed only when relevant inputs change.
//! It decides *what* merged style object and merged props to hand to the next
//! render — the host framework's renderer, layout, and event loop stay
//! outside.
//!
//! ## Core Systems
//!
//! - **[`style::value`]** — Dynamic style values with structural equality
//! - **[`style::flatten`]** — Ordered, list-aware style merging
//! - **[`style::registry`]** — Interning style-registration primitive
//! - **[`style::resolve`]** — Theme-variable resolution, per-theme sheets
//! - **[`style::creators`]** — Style-creator combinators (component,
//!   modifier, bool modifier, util)
//! - **[`style::combine`]** — Memoized creator composition
//! - **[`theme`]** — Themes, registry, deferred theme variables
//! - **[`component`]** — Props, render descriptions, provider scope, and the
//!   connect/decorate engine
//!
//! Everything runs inline inside the host's single-threaded update cycle:
//! no I/O, no locks, no spawned work.

// Foundation
pub mod error;
pub mod macros;

// Core systems
pub mod style;
pub mod theme;

// Component layer
pub mod component;

// Top-level API surface
pub use component::provider::ThemeProvider;
pub use component::styled::styled;
pub use style::combine::combine_styles;
pub use style::creators::StyleCreators;
pub use theme::variable::theme_variable;
