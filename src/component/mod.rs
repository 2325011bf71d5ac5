//! Component layer: props, render descriptions, provider, decorator.

pub mod props;
pub mod element;
pub mod provider;
pub mod styled;

pub use element::{ColorLookup, Element, MergedProps};
pub use props::{PropValue, Props};
pub use provider::{ThemeContext, ThemeProvider};
pub use styled::{styled, Component, Styled, StyledComponent, StyledInstance, StyledOptions};
