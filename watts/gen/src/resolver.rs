//! Type-mapping resolution.
//!
//! [`TypeResolver`] decides the TypeScript type of a parameter or return
//! value. It consults the configured [`TypeMapping`] table first, in order,
//! then a small set of built-in primitives, and finally falls back to the
//! deferred [`DEFERRED_TYPE`] marker. Unknown types are expected in real
//! metadata, so the fallback is never an error.
//!
//! ## Rule matching
//!
//! ```text
//! type_matches = type_name starts_with pattern
//!             OR (treat_as_attribute AND has attribute "{pattern}Attribute")
//!             OR (treat_as_constraint AND constraints contain camelCase(pattern))
//! rule_wins    = type_matches AND (no name regex OR regex matches parameter name)
//! ```
//!
//! The first winning rule is used; table order is the only tie-breaker.

use std::fmt;

use regex::Regex;
use tracing::debug;
use watts_define::{Parameter, TypeMapping};

use crate::errors::GeneratorError;
use crate::model::ParameterKind;
use crate::naming::to_camel_case;

/// Type emitted for values no rule or primitive covers.
pub const DEFERRED_TYPE: &str = "QueryParam";

/// Generic wrappers that are unwrapped and counted as one collection level.
const COLLECTION_TYPES: &[&str] = &[
    "IEnumerable",
    "ICollection",
    "IList",
    "List",
    "IReadOnlyList",
    "IReadOnlyCollection",
    "HashSet",
    "ISet",
];

/// Generic wrappers that are unwrapped without changing the shape.
const TRANSPARENT_TYPES: &[&str] = &["Task", "ValueTask"];

const NULLABLE_TYPE: &str = "Nullable";

const STRING_TYPES: &[&str] = &["System.String", "System.Char"];

const NUMBER_TYPES: &[&str] = &[
    "System.Byte",
    "System.SByte",
    "System.Int16",
    "System.UInt16",
    "System.Int32",
    "System.UInt32",
    "System.Int64",
    "System.UInt64",
    "System.Single",
    "System.Double",
    "System.Decimal",
];

const BOOLEAN_TYPES: &[&str] = &["System.Boolean"];

/// TypeScript types that serialize as a single query-string value.
const SCALAR_TARGETS: &[&str] = &["string", "number", "boolean", "Date"];

/// Where a resolved type came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeOrigin {
    /// A type-mapping rule won.
    Mapped,
    /// A built-in primitive mapping applied.
    Primitive,
    /// Nothing applied; the deferred marker is used.
    Deferred,
}

/// A resolved TypeScript type.
///
/// ```
/// use watts_gen::resolver::{OutputType, TypeOrigin};
///
/// let ty = OutputType::new("number", 2, TypeOrigin::Primitive);
/// assert_eq!(ty.to_string(), "number[][]");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputType {
    /// Element type name.
    pub name: String,
    /// Number of array levels around the element type.
    pub collection_level: usize,
    /// Which resolution step produced the type.
    pub origin: TypeOrigin,
    /// Set when the winning rule asks for omitted arguments to be created.
    pub auto_initialize: bool,
}

impl OutputType {
    /// Creates a type without auto-initialization.
    pub fn new(name: impl Into<String>, collection_level: usize, origin: TypeOrigin) -> Self {
        Self {
            name: name.into(),
            collection_level,
            origin,
            auto_initialize: false,
        }
    }

    /// Whether the type is an array.
    pub fn is_collection(&self) -> bool {
        self.collection_level > 0
    }

    /// Whether the deferred marker was used.
    pub fn is_deferred(&self) -> bool {
        self.origin == TypeOrigin::Deferred
    }

    /// Whether the value fits in one query-string entry.
    ///
    /// ```
    /// use watts_gen::resolver::{OutputType, TypeOrigin};
    ///
    /// assert!(OutputType::new("string", 0, TypeOrigin::Mapped).is_simple());
    /// assert!(!OutputType::new("Interfaces.IUser", 0, TypeOrigin::Mapped).is_simple());
    /// assert!(!OutputType::new("number", 1, TypeOrigin::Primitive).is_simple());
    /// ```
    pub fn is_simple(&self) -> bool {
        if self.is_collection() {
            return false;
        }
        match self.origin {
            TypeOrigin::Primitive => true,
            TypeOrigin::Mapped => SCALAR_TARGETS.contains(&self.name.as_str()),
            TypeOrigin::Deferred => false,
        }
    }
}

impl fmt::Display for OutputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        for _ in 0..self.collection_level {
            f.write_str("[]")?;
        }
        Ok(())
    }
}

/// A declared type name taken apart.
///
/// ```
/// use watts_gen::resolver::SourceType;
///
/// let ty = SourceType::parse("System.Collections.Generic.List`1<System.Nullable`1<System.Int32>>");
/// assert_eq!(ty.element, "System.Int32");
/// assert_eq!(ty.collection_level, 1);
/// assert!(ty.nullable);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceType {
    /// Innermost type name after unwrapping.
    pub element: String,
    /// Collections unwrapped on the way.
    pub collection_level: usize,
    /// Whether a nullable wrapper or `?` suffix was seen.
    pub nullable: bool,
}

impl SourceType {
    /// Unwraps arrays, nullable markers and well-known generic wrappers.
    pub fn parse(type_name: &str) -> Self {
        let mut element = type_name.trim();
        let mut collection_level = 0;
        let mut nullable = false;

        loop {
            if let Some(inner) = element.strip_suffix("[]") {
                collection_level += 1;
                element = inner.trim_end();
                continue;
            }
            if let Some(inner) = element.strip_suffix('?') {
                nullable = true;
                element = inner.trim_end();
                continue;
            }

            let Some((wrapper, argument)) = split_generic(element) else {
                break;
            };

            if wrapper == NULLABLE_TYPE {
                nullable = true;
            } else if COLLECTION_TYPES.contains(&wrapper) {
                collection_level += 1;
            } else if !TRANSPARENT_TYPES.contains(&wrapper) {
                break;
            }
            element = argument;
        }

        Self {
            element: element.to_string(),
            collection_level,
            nullable,
        }
    }
}

/// Splits `Namespace.Wrapper`1<Argument>` into `("Wrapper", "Argument")`.
///
/// Returns `None` for non-generic names and for generics with more than one
/// argument.
fn split_generic(type_name: &str) -> Option<(&str, &str)> {
    let open = type_name.find('<')?;
    let argument = type_name[open + 1..].strip_suffix('>')?.trim();

    let mut depth = 0usize;
    for c in argument.chars() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.checked_sub(1)?,
            ',' if depth == 0 => return None,
            _ => {}
        }
    }

    let qualified = &type_name[..open];
    let short = qualified.rsplit('.').next().unwrap_or(qualified);
    let short = short.split('`').next().unwrap_or(short);
    Some((short, argument))
}

/// What the resolver knows about the value being typed.
#[derive(Debug, Clone, Copy)]
pub struct TypeCandidate<'a> {
    /// Declared type name.
    pub type_name: &'a str,
    /// Parameter name, for rules with a `match` regex.
    pub parameter_name: Option<&'a str>,
    /// Attribute type names on the parameter.
    pub attributes: &'a [String],
    /// Route constraints on the parameter's segment.
    pub constraints: &'a [String],
}

impl<'a> TypeCandidate<'a> {
    /// A bare type, e.g. a return type.
    pub fn for_type(type_name: &'a str) -> Self {
        Self {
            type_name,
            parameter_name: None,
            attributes: &[],
            constraints: &[],
        }
    }

    /// A parameter together with its route constraints.
    pub fn for_parameter(parameter: &'a Parameter, constraints: &'a [String]) -> Self {
        Self {
            type_name: &parameter.type_name,
            parameter_name: Some(&parameter.name),
            attributes: &parameter.attributes,
            constraints,
        }
    }
}

#[derive(Debug, Clone)]
struct CompiledRule {
    mapping: TypeMapping,
    name_regex: Option<Regex>,
    attribute_name: String,
    constraint_name: String,
}

/// Resolves declared types against an ordered type-mapping table.
///
/// ## Examples
///
/// ```
/// use watts_define::TypeMapping;
/// use watts_gen::resolver::{TypeCandidate, TypeResolver};
///
/// let resolver = TypeResolver::new(vec![TypeMapping::new("System.Guid", "string")]).unwrap();
///
/// let guid = resolver.resolve(&TypeCandidate::for_type("System.Guid"));
/// assert_eq!(guid.to_string(), "string");
///
/// let int = resolver.resolve(&TypeCandidate::for_type("System.Int32"));
/// assert_eq!(int.to_string(), "number");
/// ```
#[derive(Debug, Clone, Default)]
pub struct TypeResolver {
    rules: Vec<CompiledRule>,
}

impl TypeResolver {
    /// Compiles a type-mapping table.
    ///
    /// ## Errors
    ///
    /// - [`GeneratorError::InvalidTypeMapping`] if a `match` pattern is not a
    ///   valid regex
    /// - [`GeneratorError::ConfigError`] if a rule has an empty type name or
    ///   target, since an empty prefix would match every type
    pub fn new(mappings: Vec<TypeMapping>) -> Result<Self, GeneratorError> {
        let rules = mappings
            .into_iter()
            .map(compile_rule)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { rules })
    }

    /// The first rule that wins for `candidate`, if any.
    pub fn find_mapping(&self, candidate: &TypeCandidate<'_>) -> Option<&TypeMapping> {
        let source = SourceType::parse(candidate.type_name);
        self.find_rule(candidate, &source)
            .map(|(rule, _)| &rule.mapping)
    }

    /// Resolves the TypeScript type of `candidate`.
    pub fn resolve(&self, candidate: &TypeCandidate<'_>) -> OutputType {
        let source = SourceType::parse(candidate.type_name);

        if let Some((rule, collection_level)) = self.find_rule(candidate, &source) {
            return OutputType {
                name: rule.mapping.type_script_type_name.clone(),
                collection_level,
                origin: TypeOrigin::Mapped,
                auto_initialize: rule.mapping.auto_initialize,
            };
        }

        if let Some(primitive) = primitive_type(&source.element) {
            return OutputType::new(primitive, source.collection_level, TypeOrigin::Primitive);
        }

        debug!(
            type_name = candidate.type_name,
            parameter = candidate.parameter_name.unwrap_or_default(),
            "no type mapping applies, deferring to {}",
            DEFERRED_TYPE
        );
        OutputType::new(DEFERRED_TYPE, source.collection_level, TypeOrigin::Deferred)
    }

    /// Whether a parameter may be omitted from the generated constructor.
    ///
    /// The declaration must have a default value, and the placement must allow
    /// leaving it out: route parameters fill a path segment and are always
    /// required.
    pub fn is_optional(&self, parameter: &Parameter, kind: ParameterKind) -> bool {
        parameter.is_optional && kind != ParameterKind::Route
    }

    fn find_rule(
        &self,
        candidate: &TypeCandidate<'_>,
        source: &SourceType,
    ) -> Option<(&CompiledRule, usize)> {
        self.rules.iter().find_map(|rule| {
            let pattern = rule.mapping.web_api_type_name.as_str();

            let element_matches = source.element.starts_with(pattern);
            let full_name_matches = candidate.type_name.starts_with(pattern);
            let attribute_matches = rule.mapping.treat_as_attribute
                && candidate.attributes.iter().any(|a| *a == rule.attribute_name);
            let constraint_matches = rule.mapping.treat_as_constraint
                && candidate.constraints.iter().any(|c| *c == rule.constraint_name);

            let type_matches =
                element_matches || full_name_matches || attribute_matches || constraint_matches;

            let wins = match &rule.name_regex {
                None => type_matches,
                Some(regex) => {
                    type_matches && candidate.parameter_name.is_some_and(|n| regex.is_match(n))
                }
            };
            if !wins {
                return None;
            }

            // A rule naming the whole declared type (e.g. a specific generic
            // collection) replaces it, arrays included.
            let collection_level = if full_name_matches && !element_matches {
                0
            } else {
                source.collection_level
            };
            Some((rule, collection_level))
        })
    }
}

fn compile_rule(mapping: TypeMapping) -> Result<CompiledRule, GeneratorError> {
    if mapping.web_api_type_name.trim().is_empty() {
        return Err(GeneratorError::ConfigError(format!(
            "type mapping to '{}' has an empty webApiTypeName",
            mapping.type_script_type_name
        )));
    }
    if mapping.type_script_type_name.trim().is_empty() {
        return Err(GeneratorError::ConfigError(format!(
            "type mapping for '{}' has an empty typeScriptTypeName",
            mapping.web_api_type_name
        )));
    }

    let name_regex = mapping
        .name_pattern()
        .map(Regex::new)
        .transpose()
        .map_err(|source| GeneratorError::InvalidTypeMapping {
            type_name: mapping.web_api_type_name.clone(),
            pattern: mapping.name_match.clone().unwrap_or_default(),
            source,
        })?;

    Ok(CompiledRule {
        attribute_name: mapping.attribute_name(),
        constraint_name: to_camel_case(&mapping.web_api_type_name),
        name_regex,
        mapping,
    })
}

fn primitive_type(element: &str) -> Option<&'static str> {
    if STRING_TYPES.contains(&element) {
        Some("string")
    } else if NUMBER_TYPES.contains(&element) {
        Some("number")
    } else if BOOLEAN_TYPES.contains(&element) {
        Some("boolean")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver(mappings: Vec<TypeMapping>) -> TypeResolver {
        TypeResolver::new(mappings).expect("valid table")
    }

    fn resolve_param(resolver: &TypeResolver, parameter: &Parameter, constraints: &[String]) -> OutputType {
        resolver.resolve(&TypeCandidate::for_parameter(parameter, constraints))
    }

    #[test]
    fn mapped_guid_and_primitive_int() {
        let r = resolver(vec![TypeMapping::new("System.Guid", "string")]);

        let guid = r.resolve(&TypeCandidate::for_type("System.Guid"));
        assert_eq!(guid, OutputType::new("string", 0, TypeOrigin::Mapped));

        let int = r.resolve(&TypeCandidate::for_type("System.Int32"));
        assert_eq!(int, OutputType::new("number", 0, TypeOrigin::Primitive));
    }

    #[test]
    fn built_in_primitives() {
        let r = TypeResolver::default();
        assert_eq!(r.resolve(&TypeCandidate::for_type("System.String")).name, "string");
        assert_eq!(r.resolve(&TypeCandidate::for_type("System.Decimal")).name, "number");
        assert_eq!(r.resolve(&TypeCandidate::for_type("System.Boolean")).name, "boolean");
    }

    #[test]
    fn unknown_type_defers() {
        let r = TypeResolver::default();
        let ty = r.resolve(&TypeCandidate::for_type("Shop.Models.UserFilter"));
        assert_eq!(ty.name, DEFERRED_TYPE);
        assert!(ty.is_deferred());
    }

    #[test]
    fn earlier_rule_wins_regardless_of_specificity() {
        let r = resolver(vec![
            TypeMapping::new("Shop", "any"),
            TypeMapping::new("Shop.Models.User", "Interfaces.IUser"),
        ]);
        assert_eq!(r.resolve(&TypeCandidate::for_type("Shop.Models.User")).name, "any");
    }

    #[test]
    fn prefix_match_covers_longer_names() {
        let r = resolver(vec![TypeMapping::new("Shop.Models.User", "Interfaces.IUser")]);
        assert_eq!(
            r.resolve(&TypeCandidate::for_type("Shop.Models.UserFilter")).name,
            "Interfaces.IUser"
        );
    }

    #[test]
    fn attribute_rule_needs_flag_and_attribute() {
        let p = Parameter::new("userId", "System.Int32").with_attribute("EncryptedAttribute");

        let without_flag = resolver(vec![TypeMapping::new("Encrypted", "string")]);
        assert_eq!(resolve_param(&without_flag, &p, &[]).name, "number");

        let with_flag = resolver(vec![TypeMapping::new("Encrypted", "string").as_attribute()]);
        assert_eq!(resolve_param(&with_flag, &p, &[]).name, "string");
    }

    #[test]
    fn constraint_rule_uses_camel_cased_pattern() {
        let r = resolver(vec![TypeMapping::new("DateRange", "Interfaces.IDateRange").as_constraint()]);
        let p = Parameter::new("range", "System.String");

        let constrained = resolve_param(&r, &p, &["dateRange".to_string()]);
        assert_eq!(constrained.name, "Interfaces.IDateRange");

        let pascal = resolve_param(&r, &p, &["DateRange".to_string()]);
        assert_eq!(pascal.name, "string");
    }

    #[test]
    fn regex_filters_by_parameter_name() {
        let r = resolver(vec![
            TypeMapping::new("System.Int32", "Ids.UserId").matching("^user"),
            TypeMapping::new("System.Int32", "number"),
        ]);

        let user_id = Parameter::new("userId", "System.Int32");
        let page = Parameter::new("page", "System.Int32");

        assert_eq!(resolve_param(&r, &user_id, &[]).name, "Ids.UserId");
        assert_eq!(resolve_param(&r, &page, &[]).origin, TypeOrigin::Mapped);
        assert_eq!(resolve_param(&r, &page, &[]).name, "number");
    }

    #[test]
    fn regex_rule_never_wins_without_type_match() {
        let r = resolver(vec![TypeMapping::new("System.Guid", "string").matching(".*")]);
        let p = Parameter::new("id", "System.Int32");
        assert_eq!(resolve_param(&r, &p, &[]).origin, TypeOrigin::Primitive);
    }

    #[test]
    fn regex_rule_does_not_apply_to_bare_types() {
        let r = resolver(vec![TypeMapping::new("System.Guid", "string").matching(".*")]);
        assert!(r.find_mapping(&TypeCandidate::for_type("System.Guid")).is_none());
    }

    #[test]
    fn invalid_regex_is_a_configuration_error() {
        let err = TypeResolver::new(vec![TypeMapping::new("System.Int32", "number").matching("(")])
            .unwrap_err();
        assert!(matches!(err, GeneratorError::InvalidTypeMapping { ref pattern, .. } if pattern == "("));
    }

    #[test]
    fn empty_pattern_is_a_configuration_error() {
        let err = TypeResolver::new(vec![TypeMapping::new("", "any")]).unwrap_err();
        assert!(matches!(err, GeneratorError::ConfigError(_)));
    }

    #[test]
    fn collections_keep_their_depth() {
        let r = resolver(vec![TypeMapping::new("System.Guid", "string")]);
        assert_eq!(r.resolve(&TypeCandidate::for_type("System.Guid[]")).to_string(), "string[]");
        assert_eq!(
            r.resolve(&TypeCandidate::for_type(
                "System.Collections.Generic.IEnumerable`1<System.Int32[]>"
            ))
            .to_string(),
            "number[][]"
        );
        assert_eq!(
            r.resolve(&TypeCandidate::for_type("Shop.Thing[]")).to_string(),
            "QueryParam[]"
        );
    }

    #[test]
    fn rule_on_whole_generic_type_replaces_collection() {
        let r = resolver(vec![TypeMapping::new(
            "System.Collections.Generic.Dictionary",
            "{ [key: string]: any }",
        )]);
        let ty = r.resolve(&TypeCandidate::for_type(
            "System.Collections.Generic.Dictionary`2<System.String,System.Int32>",
        ));
        assert_eq!(ty.collection_level, 0);
        assert_eq!(ty.origin, TypeOrigin::Mapped);
    }

    #[test]
    fn auto_initialize_is_carried() {
        let r = resolver(vec![TypeMapping::new("Shop.Paging", "Paging").auto_initialized()]);
        assert!(r.resolve(&TypeCandidate::for_type("Shop.Paging")).auto_initialize);
    }

    #[test]
    fn resolution_is_deterministic() {
        let r = resolver(vec![
            TypeMapping::new("System.Int32", "Ids.UserId").matching("Id$"),
            TypeMapping::new("System.Guid", "string"),
        ]);
        let p = Parameter::new("userId", "System.Int32");
        let first = resolve_param(&r, &p, &[]);
        for _ in 0..10 {
            assert_eq!(resolve_param(&r, &p, &[]), first);
        }
    }

    #[test]
    fn source_type_parsing() {
        assert_eq!(
            SourceType::parse("System.Nullable`1<System.Int32>"),
            SourceType {
                element: "System.Int32".to_string(),
                collection_level: 0,
                nullable: true,
            }
        );
        assert!(SourceType::parse("System.Int32?").nullable);
        assert_eq!(
            SourceType::parse("System.Threading.Tasks.Task`1<System.String[]>").collection_level,
            1
        );
        assert_eq!(
            SourceType::parse("System.Collections.Generic.Dictionary`2<System.String,System.Int32>")
                .element,
            "System.Collections.Generic.Dictionary`2<System.String,System.Int32>"
        );
        assert_eq!(SourceType::parse("Shop.User").element, "Shop.User");
    }

    #[test]
    fn route_parameters_are_never_optional() {
        let r = TypeResolver::default();
        let p = Parameter::new("id", "System.Nullable<System.Int32>").optional();
        assert!(!r.is_optional(&p, ParameterKind::Route));
        assert!(r.is_optional(&p, ParameterKind::Query));
    }

    #[test]
    fn optionality_needs_a_declared_default() {
        let r = TypeResolver::default();
        let nullable = Parameter::new("page", "System.Int32?");
        assert!(!r.is_optional(&nullable, ParameterKind::Query));
        assert!(r.is_optional(&nullable.optional(), ParameterKind::Body));
    }

    #[test]
    fn simple_types() {
        let r = resolver(vec![
            TypeMapping::new("System.Guid", "string"),
            TypeMapping::new("Shop.Models.User", "Interfaces.IUser"),
        ]);
        assert!(r.resolve(&TypeCandidate::for_type("System.Guid")).is_simple());
        assert!(r.resolve(&TypeCandidate::for_type("System.Int64")).is_simple());
        assert!(!r.resolve(&TypeCandidate::for_type("Shop.Models.User")).is_simple());
        assert!(!r.resolve(&TypeCandidate::for_type("System.Guid[]")).is_simple());
        assert!(!r.resolve(&TypeCandidate::for_type("Shop.Other")).is_simple());
    }
}
