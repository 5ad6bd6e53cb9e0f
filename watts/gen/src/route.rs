//! Route template parsing.
//!
//! Route templates use `/`-separated segments where `{name}` marks a
//! parameter and `{name:int:min(1)}` adds constraints. The generated endpoint
//! classes hold route parameters as fields, so the composed path refers to
//! them as `${this.name}` inside a template literal.

use std::fmt;

/// One `/`-delimited component of a route template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteSegment {
    /// Literal path text.
    Literal(String),
    /// A `{name[:constraint...]}` placeholder.
    Parameter {
        /// Parameter name.
        name: String,
        /// Constraint names in template order.
        constraints: Vec<String>,
    },
}

impl RouteSegment {
    /// The parameter name, if this is a parameter segment.
    pub fn parameter_name(&self) -> Option<&str> {
        match self {
            RouteSegment::Parameter { name, .. } => Some(name),
            RouteSegment::Literal(_) => None,
        }
    }
}

impl fmt::Display for RouteSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteSegment::Literal(text) => f.write_str(text),
            RouteSegment::Parameter { name, .. } => write!(f, "${{this.{name}}}"),
        }
    }
}

/// Splits a route template into segments.
///
/// Empty segments (leading, trailing or doubled slashes) are dropped.
///
/// ## Examples
///
/// ```
/// use watts_gen::route::{parse_route, RouteSegment};
///
/// let segments = parse_route("users/{id:int}/orders");
/// assert_eq!(
///     segments,
///     vec![
///         RouteSegment::Literal("users".to_string()),
///         RouteSegment::Parameter {
///             name: "id".to_string(),
///             constraints: vec!["int".to_string()],
///         },
///         RouteSegment::Literal("orders".to_string()),
///     ]
/// );
/// ```
pub fn parse_route(template: &str) -> Vec<RouteSegment> {
    template
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(parse_segment)
        .collect()
}

fn parse_segment(segment: &str) -> RouteSegment {
    let Some(inner) = segment
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
    else {
        return RouteSegment::Literal(segment.to_string());
    };

    let mut parts = inner.split(':');
    let name = parts.next().unwrap_or_default().to_string();
    let constraints = parts.map(str::to_string).collect();

    RouteSegment::Parameter { name, constraints }
}

/// Composes the path of an endpoint class from its segments.
///
/// Returns an empty string for no segments; otherwise a leading `/` followed
/// by the segments joined with `/`, parameters rendered as `${this.name}`.
///
/// ```
/// use watts_gen::route::{base_endpoint, parse_route};
///
/// assert_eq!(base_endpoint(&parse_route("users/{id:int}/orders")), "/users/${this.id}/orders");
/// assert_eq!(base_endpoint(&parse_route("")), "");
/// ```
pub fn base_endpoint(segments: &[RouteSegment]) -> String {
    if segments.is_empty() {
        return String::new();
    }

    let parts: Vec<String> = segments.iter().map(ToString::to_string).collect();
    format!("/{}", parts.join("/"))
}

/// Names of all parameter segments, in template order.
pub fn parameter_names(segments: &[RouteSegment]) -> impl Iterator<Item = &str> {
    segments.iter().filter_map(RouteSegment::parameter_name)
}

/// Constraints of the parameter segment called `name`.
///
/// Empty when no segment has that name or the segment is unconstrained.
pub fn constraints_for<'a>(segments: &'a [RouteSegment], name: &str) -> &'a [String] {
    segments
        .iter()
        .find_map(|segment| match segment {
            RouteSegment::Parameter {
                name: candidate,
                constraints,
            } if candidate == name => Some(constraints.as_slice()),
            _ => None,
        })
        .unwrap_or_default()
}
