#[macro_export]
macro_rules! regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).unwrap());
        &*RE
    }};
}

/// Declare one row of the built-in bang table.
///
/// ```text
/// bang!("g", "www.google.com/search?q=%s", "Google Search")
///        │    │                             └─ display name
///        │    └─ scheme-less template with one `%s`
///        └─ key (without `!`)
/// ```
#[macro_export]
macro_rules! bang {
    ($key:literal, $template:literal, $name:literal $(,)?) => {{
        const _: () = assert!(!$key.is_empty(), "built-in bang keys must not be empty");
        $crate::bangs::builtin::BuiltinBang { key: $key, template: $template, name: $name }
    }};
}
