//! Identifier case conversion and import path helpers.

use std::path::{Component, Path};

/// Lowercases the first character.
///
/// ```
/// use watts_gen::naming::to_camel_case;
///
/// assert_eq!(to_camel_case("Guid"), "guid");
/// assert_eq!(to_camel_case("DateTime"), "dateTime");
/// assert_eq!(to_camel_case(""), "");
/// ```
pub fn to_camel_case(pascal: &str) -> String {
    let mut chars = pascal.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Relative import path from the directory `from` to the directory `to`.
///
/// Always uses `/` and always starts with `.` or `..`, as TypeScript module
/// specifiers require.
///
/// ```
/// use std::path::Path;
/// use watts_gen::naming::relative_path;
///
/// assert_eq!(relative_path(Path::new("out/services"), Path::new("out/endpoints")), "../endpoints");
/// assert_eq!(relative_path(Path::new("out"), Path::new("out")), ".");
/// assert_eq!(relative_path(Path::new("out"), Path::new("out/api")), "./api");
/// ```
pub fn relative_path(from: &Path, to: &Path) -> String {
    let from: Vec<Component<'_>> = from.components().filter(is_named).collect();
    let to: Vec<Component<'_>> = to.components().filter(is_named).collect();

    let common = from
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = if from.len() > common {
        vec!["..".to_string(); from.len() - common]
    } else {
        vec![".".to_string()]
    };
    parts.extend(
        to[common..]
            .iter()
            .map(|c| c.as_os_str().to_string_lossy().into_owned()),
    );

    parts.join("/")
}

fn is_named(component: &Component<'_>) -> bool {
    !matches!(component, Component::CurDir)
}
