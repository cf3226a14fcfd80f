/// Compile a regular expression once and hand out a `&'static Regex`.
#[macro_export]
macro_rules! regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).unwrap());
        &*RE
    }};
}

/// Decode a static B3/S23 RLE body once and hand out a `&'static Pattern`.
///
/// Only used for built-in still lifes, whose bodies are checked by tests.
#[macro_export]
macro_rules! still_life {
    ($body:literal) => {{
        static PATTERN: once_cell::sync::Lazy<$crate::Pattern> = once_cell::sync::Lazy::new(|| {
            $crate::decode(concat!("x = 0, y = 0, rule = B3/S23\n", $body)).unwrap()
        });
        &*PATTERN
    }};
}
