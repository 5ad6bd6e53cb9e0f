//! Type-mapping rules.
//!
//! A type-mapping table is an ordered list of [`TypeMapping`] rules that
//! decides which TypeScript type a Web API parameter becomes. The table is
//! usually stored as JSON next to the build configuration:
//!
//! ```json
//! [
//!   { "webApiTypeName": "System.Guid", "typeScriptTypeName": "string" },
//!   { "webApiTypeName": "Encrypted", "typeScriptTypeName": "number",
//!     "treatAsAttribute": true, "match": "Id$" }
//! ]
//! ```
//!
//! Rules are evaluated in table order and the first match wins, so more
//! specific rules must precede more general ones.

use serde::{Deserialize, Serialize};

/// One rule of the type-mapping table.
///
/// ## Matching
///
/// A rule's type condition holds when any of these is true:
///
/// - the declared type name starts with [`web_api_type_name`](Self::web_api_type_name)
/// - [`treat_as_attribute`](Self::treat_as_attribute) is set and the parameter
///   carries an attribute named `{web_api_type_name}Attribute`
/// - [`treat_as_constraint`](Self::treat_as_constraint) is set and the
///   parameter's route segment carries the camelCased pattern as a constraint
///
/// When [`name_match`](Self::name_match) is set, the regex must also match
/// the parameter name.
///
/// ## Examples
///
/// ```
/// use watts_define::TypeMapping;
///
/// let rule = TypeMapping::new("System.Guid", "string");
/// assert!(!rule.treat_as_attribute);
/// assert!(rule.name_match.is_none());
///
/// let rule = TypeMapping::new("Encrypted", "number")
///     .as_attribute()
///     .matching("Id$");
/// assert_eq!(rule.attribute_name(), "EncryptedAttribute");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeMapping {
    /// Source type name prefix (or attribute / constraint stem).
    #[serde(alias = "WebApiTypeName")]
    pub web_api_type_name: String,
    /// TypeScript type emitted when the rule wins.
    #[serde(alias = "TypeScriptTypeName")]
    pub type_script_type_name: String,
    /// Also match parameters carrying `{web_api_type_name}Attribute`.
    #[serde(default, alias = "TreatAsAttribute")]
    pub treat_as_attribute: bool,
    /// Also match parameters whose route constraint is the camelCased pattern.
    #[serde(default, alias = "TreatAsConstraint")]
    pub treat_as_constraint: bool,
    /// Regex the parameter name must match for the rule to apply.
    #[serde(default, rename = "match", alias = "Match")]
    pub name_match: Option<String>,
    /// Endpoint classes create a fresh instance when the argument is omitted.
    #[serde(default, alias = "AutoInitialize")]
    pub auto_initialize: bool,
}

impl TypeMapping {
    /// Creates a plain prefix rule.
    pub fn new(web_api_type_name: impl Into<String>, type_script_type_name: impl Into<String>) -> Self {
        Self {
            web_api_type_name: web_api_type_name.into(),
            type_script_type_name: type_script_type_name.into(),
            ..Default::default()
        }
    }

    /// Enables attribute matching.
    pub fn as_attribute(mut self) -> Self {
        self.treat_as_attribute = true;
        self
    }

    /// Enables route-constraint matching.
    pub fn as_constraint(mut self) -> Self {
        self.treat_as_constraint = true;
        self
    }

    /// Restricts the rule to parameter names matching `pattern`.
    pub fn matching(mut self, pattern: impl Into<String>) -> Self {
        self.name_match = Some(pattern.into());
        self
    }

    /// Enables auto-initialization of omitted arguments.
    pub fn auto_initialized(mut self) -> Self {
        self.auto_initialize = true;
        self
    }

    /// The attribute type name this rule looks for when matching as attribute.
    pub fn attribute_name(&self) -> String {
        format!("{}Attribute", self.web_api_type_name)
    }

    /// The name regex, if one is set and non-empty.
    pub fn name_pattern(&self) -> Option<&str> {
        self.name_match.as_deref().filter(|p| !p.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_camel_case_table() {
        let json = r#"[
            { "webApiTypeName": "System.Guid", "typeScriptTypeName": "string" },
            { "webApiTypeName": "Encrypted", "typeScriptTypeName": "number",
              "treatAsAttribute": true, "match": "Id$" }
        ]"#;

        let table: Vec<TypeMapping> = serde_json::from_str(json).unwrap();

        assert_eq!(table[0], TypeMapping::new("System.Guid", "string"));
        assert_eq!(
            table[1],
            TypeMapping::new("Encrypted", "number").as_attribute().matching("Id$")
        );
    }

    #[test]
    fn deserializes_pascal_case_aliases() {
        let json = r#"{
            "WebApiTypeName": "Date",
            "TypeScriptTypeName": "moment.Moment",
            "TreatAsConstraint": true,
            "AutoInitialize": true
        }"#;

        let rule: TypeMapping = serde_json::from_str(json).unwrap();

        assert_eq!(rule.web_api_type_name, "Date");
        assert!(rule.treat_as_constraint);
        assert!(rule.auto_initialize);
        assert!(!rule.treat_as_attribute);
    }

    #[test]
    fn empty_match_counts_as_no_pattern() {
        let rule = TypeMapping::new("System.Int32", "number").matching("");
        assert_eq!(rule.name_pattern(), None);
    }
}
