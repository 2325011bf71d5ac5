//! Literal constructors for style maps and prop sets.

/// Build a [`StyleMap`](crate::style::value::StyleMap) literal.
///
/// Keys are strings; values are anything convertible into a
/// [`StyleValue`](crate::style::value::StyleValue), including nested
/// `style!` blocks.
///
/// ```
/// use lacquer::style;
/// use lacquer::theme::variable::color;
///
/// let descriptor = style! {
///     "title" => style! {
///         "fontSize" => 12,
///         "color" => color("text.primary"),
///     },
/// };
/// assert_eq!(descriptor.len(), 1);
/// ```
#[macro_export]
macro_rules! style {
    () => {
        $crate::style::value::StyleMap::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::style::value::StyleMap::new();
        $(
            map.insert(
                ::std::string::String::from($key),
                $crate::style::value::StyleValue::from($value),
            );
        )+
        map
    }};
}

/// Build a [`Props`](crate::component::props::Props) literal of named values.
///
/// ```
/// use lacquer::props;
///
/// let props = props! { "size" => "small", "disabled" => false };
/// assert!(props.value("size").is_some());
/// ```
#[macro_export]
macro_rules! props {
    () => {
        $crate::component::props::Props::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        $crate::component::props::Props::new()$(.with_value($key, $value))+
    };
}
