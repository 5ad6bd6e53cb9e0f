//! Action parameter descriptors.

use serde::{Deserialize, Serialize};

/// Attribute forcing a parameter to bind from the request body.
pub const FROM_BODY_ATTRIBUTE: &str = "FromBodyAttribute";

/// Attribute forcing a parameter to bind from the query string.
pub const FROM_URI_ATTRIBUTE: &str = "FromUriAttribute";

/// A single parameter of an action method.
///
/// Attribute names are the short type names of the attributes present on the
/// parameter, including the `Attribute` suffix (e.g. `FromBodyAttribute`).
///
/// ## Examples
///
/// ```
/// use watts_define::Parameter;
///
/// let filter = Parameter::new("filter", "Shop.Models.UserFilter")
///     .optional()
///     .with_attribute("FromUriAttribute");
///
/// assert!(filter.is_optional);
/// assert!(filter.is_from_uri());
/// assert!(!filter.is_from_body());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    /// Parameter name as declared.
    pub name: String,
    /// Full name of the declared type (e.g. `System.Int32`,
    /// `System.Nullable<System.Guid>`, `System.String[]`).
    pub type_name: String,
    /// Whether the declaration has a default value.
    #[serde(default)]
    pub is_optional: bool,
    /// Attribute type names present on the parameter.
    #[serde(default)]
    pub attributes: Vec<String>,
}

impl Parameter {
    /// Creates a required parameter without attributes.
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            is_optional: false,
            attributes: Vec::new(),
        }
    }

    /// Marks the parameter as having a default value.
    pub fn optional(mut self) -> Self {
        self.is_optional = true;
        self
    }

    /// Adds an attribute by type name.
    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attributes.push(attribute.into());
        self
    }

    /// Whether an attribute with exactly this type name is present.
    pub fn has_attribute(&self, attribute: &str) -> bool {
        self.attributes.iter().any(|a| a == attribute)
    }

    /// Whether the parameter is explicitly bound from the request body.
    pub fn is_from_body(&self) -> bool {
        self.has_attribute(FROM_BODY_ATTRIBUTE)
    }

    /// Whether the parameter is explicitly bound from the query string.
    pub fn is_from_uri(&self) -> bool {
        self.has_attribute(FROM_URI_ATTRIBUTE)
    }
}
