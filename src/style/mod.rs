//! Style engine: values, flattening, resolution, creators, combination.

pub mod value;
pub mod flatten;
pub mod registry;
pub mod resolve;
pub mod creators;
pub mod combine;

pub use combine::{combine_styles, CombinedStyles};
pub use creators::{StyleCreator, StyleCreators};
pub use flatten::{flatten, StyleSource};
pub use registry::{extend_stylesheet, StyleRef};
pub use resolve::{StyleResolver, ThemedStyles};
pub use value::{SharedStyles, StyleMap, StyleValue};
