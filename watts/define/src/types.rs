//! Core types for Web API endpoint descriptors.
//!
//! This module provides the fundamental types describing a server's routing
//! surface, as extracted from the server assembly by an external tool:
//!
//! - [`WebApi`] - The top-level description (all controllers)
//! - [`Controller`] - A controller with its base route and actions
//! - [`Action`] - A single action method with route, verbs and parameters
//! - [`HttpVerb`] - HTTP verb enumeration

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::errors::DefinitionError;
use crate::parameter::Parameter;

/// HTTP verbs an action can respond to.
///
/// ## Examples
///
/// Parse from string:
///
/// ```
/// use std::str::FromStr;
/// use watts_define::HttpVerb;
///
/// let verb = HttpVerb::from_str("PUT").unwrap();
/// assert_eq!(verb, HttpVerb::Put);
/// ```
///
/// Display as uppercase:
///
/// ```
/// use watts_define::HttpVerb;
///
/// assert_eq!(HttpVerb::Delete.to_string(), "DELETE");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum HttpVerb {
    /// HTTP GET
    Get,
    /// HTTP POST
    Post,
    /// HTTP PUT
    Put,
    /// HTTP PATCH
    Patch,
    /// HTTP DELETE
    Delete,
    /// HTTP HEAD
    Head,
    /// HTTP OPTIONS
    Options,
}

impl HttpVerb {
    /// Whether requests with this verb send a request body.
    ///
    /// ```
    /// use watts_define::HttpVerb;
    ///
    /// assert!(HttpVerb::Post.carries_body());
    /// assert!(!HttpVerb::Get.carries_body());
    /// ```
    pub fn carries_body(self) -> bool {
        matches!(self, HttpVerb::Post | HttpVerb::Put | HttpVerb::Patch)
    }

    /// The verb in PascalCase (`Get`, `Post`, ...), used to disambiguate
    /// generated names when an action answers to several verbs.
    pub fn pascal_name(self) -> &'static str {
        match self {
            HttpVerb::Get => "Get",
            HttpVerb::Post => "Post",
            HttpVerb::Put => "Put",
            HttpVerb::Patch => "Patch",
            HttpVerb::Delete => "Delete",
            HttpVerb::Head => "Head",
            HttpVerb::Options => "Options",
        }
    }
}

/// The complete routing surface of a Web API application.
///
/// ## Examples
///
/// ```
/// use watts_define::{Action, Controller, HttpVerb, Parameter, WebApi};
///
/// let api = WebApi {
///     name: "Shop".to_string(),
///     controllers: vec![Controller {
///         name: "UsersController".to_string(),
///         base_route: "api/users".to_string(),
///         actions: vec![Action {
///             name: "Get".to_string(),
///             route: "{id:int}".to_string(),
///             verbs: vec![HttpVerb::Get],
///             parameters: vec![Parameter::new("id", "System.Int32")],
///             return_type: Some("Shop.Models.User".to_string()),
///             doc: None,
///         }],
///     }],
/// };
///
/// assert!(api.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebApi {
    /// Name of the application (informational).
    #[serde(default)]
    pub name: String,
    /// Controllers in the order they were discovered.
    ///
    /// Generation preserves this order.
    #[serde(default)]
    pub controllers: Vec<Controller>,
}

impl WebApi {
    /// Checks the descriptor for shapes no generator could emit.
    ///
    /// ## Errors
    ///
    /// - [`DefinitionError::EmptyName`] for a controller, action or parameter
    ///   without a name, or a parameter without a type name
    /// - [`DefinitionError::DuplicateParameter`] when an action declares the
    ///   same parameter name twice
    /// - [`DefinitionError::DuplicateVerb`] when an action lists the same
    ///   verb twice
    pub fn validate(&self) -> Result<(), DefinitionError> {
        for controller in &self.controllers {
            if controller.name.trim().is_empty() {
                return Err(DefinitionError::EmptyName {
                    kind: "controller",
                    context: self.name.clone(),
                });
            }

            for action in &controller.actions {
                if action.name.trim().is_empty() {
                    return Err(DefinitionError::EmptyName {
                        kind: "action",
                        context: controller.name.clone(),
                    });
                }

                for (idx, &verb) in action.verbs.iter().enumerate() {
                    if action.verbs[..idx].contains(&verb) {
                        return Err(DefinitionError::DuplicateVerb {
                            action: format!("{}.{}", controller.name, action.name),
                            verb,
                        });
                    }
                }

                for (idx, parameter) in action.parameters.iter().enumerate() {
                    let context = format!("{}.{}", controller.name, action.name);
                    if parameter.name.trim().is_empty() {
                        return Err(DefinitionError::EmptyName {
                            kind: "parameter",
                            context,
                        });
                    }
                    if parameter.type_name.trim().is_empty() {
                        return Err(DefinitionError::EmptyName {
                            kind: "parameter type",
                            context: format!("{}({})", context, parameter.name),
                        });
                    }
                    if action.parameters[..idx]
                        .iter()
                        .any(|p| p.name == parameter.name)
                    {
                        return Err(DefinitionError::DuplicateParameter {
                            action: context,
                            parameter: parameter.name.clone(),
                        });
                    }
                }
            }
        }

        Ok(())
    }

    /// Total number of actions across all controllers.
    pub fn action_count(&self) -> usize {
        self.controllers.iter().map(|c| c.actions.len()).sum()
    }
}

/// A Web API controller.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Controller {
    /// Type name of the controller (e.g. `UsersController`).
    pub name: String,
    /// Route prefix template shared by all actions (e.g. `api/users/{tenant}`).
    ///
    /// Empty when the controller has no route prefix.
    #[serde(default)]
    pub base_route: String,
    /// Action methods in declaration order.
    #[serde(default)]
    pub actions: Vec<Action>,
}

impl Controller {
    /// The controller name without its `Controller` suffix.
    ///
    /// ```
    /// use watts_define::Controller;
    ///
    /// let controller = Controller {
    ///     name: "UsersController".to_string(),
    ///     ..Default::default()
    /// };
    /// assert_eq!(controller.short_name(), "Users");
    /// ```
    pub fn short_name(&self) -> &str {
        self.name.strip_suffix("Controller").unwrap_or(&self.name)
    }
}

/// A single controller action.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    /// Method name; becomes the generated class name.
    pub name: String,
    /// Action route template, appended to the controller's base route.
    #[serde(default)]
    pub route: String,
    /// Verbs the action responds to.
    #[serde(default)]
    pub verbs: Vec<HttpVerb>,
    /// Method parameters in declaration order.
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    /// Full name of the declared return type, if any.
    #[serde(default)]
    pub return_type: Option<String>,
    /// Documentation summary of the action.
    #[serde(default)]
    pub doc: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    fn make_action(name: &str, parameters: Vec<Parameter>) -> Action {
        Action {
            name: name.to_string(),
            verbs: vec![HttpVerb::Get],
            parameters,
            ..Default::default()
        }
    }

    fn make_api(actions: Vec<Action>) -> WebApi {
        WebApi {
            name: "Test".to_string(),
            controllers: vec![Controller {
                name: "ThingsController".to_string(),
                base_route: "api/things".to_string(),
                actions,
            }],
        }
    }

    #[test]
    fn http_verb_display_uppercase() {
        assert_eq!(HttpVerb::Get.to_string(), "GET");
        assert_eq!(HttpVerb::Patch.to_string(), "PATCH");
        assert_eq!(HttpVerb::Options.to_string(), "OPTIONS");
    }

    #[test]
    fn http_verb_from_str_is_case_sensitive() {
        assert_eq!(HttpVerb::from_str("POST").unwrap(), HttpVerb::Post);
        assert!(HttpVerb::from_str("post").is_err());
        assert!(HttpVerb::from_str("").is_err());
    }

    #[test]
    fn only_post_put_patch_carry_a_body() {
        let with_body: Vec<_> = HttpVerb::iter().filter(|v| v.carries_body()).collect();
        assert_eq!(with_body, vec![HttpVerb::Post, HttpVerb::Put, HttpVerb::Patch]);
    }

    #[test]
    fn pascal_name_matches_display() {
        for verb in HttpVerb::iter() {
            assert_eq!(verb.pascal_name().to_uppercase(), verb.to_string());
        }
    }

    #[test]
    fn web_api_deserializes_from_camel_case_json() {
        let json = r#"{
            "name": "Shop",
            "controllers": [{
                "name": "OrdersController",
                "baseRoute": "api/orders",
                "actions": [{
                    "name": "Find",
                    "route": "{id}",
                    "verbs": ["GET", "DELETE"],
                    "parameters": [{ "name": "id", "typeName": "System.Guid" }],
                    "returnType": "Shop.Order"
                }]
            }]
        }"#;

        let api: WebApi = serde_json::from_str(json).unwrap();
        let action = &api.controllers[0].actions[0];

        assert_eq!(api.controllers[0].base_route, "api/orders");
        assert_eq!(action.verbs, vec![HttpVerb::Get, HttpVerb::Delete]);
        assert_eq!(action.parameters[0].type_name, "System.Guid");
        assert!(!action.parameters[0].is_optional);
        assert_eq!(action.return_type.as_deref(), Some("Shop.Order"));
        assert_eq!(api.action_count(), 1);
    }

    #[test]
    fn short_name_without_suffix_is_unchanged() {
        let controller = Controller {
            name: "Health".to_string(),
            ..Default::default()
        };
        assert_eq!(controller.short_name(), "Health");
    }

    #[test]
    fn validate_accepts_well_formed_api() {
        let api = make_api(vec![make_action(
            "Get",
            vec![Parameter::new("id", "System.Int32")],
        )]);
        assert!(api.validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_action_name() {
        let api = make_api(vec![make_action(" ", vec![])]);
        let err = api.validate().unwrap_err();
        assert!(matches!(err, DefinitionError::EmptyName { kind: "action", .. }));
    }

    #[test]
    fn validate_rejects_duplicate_parameters() {
        let api = make_api(vec![make_action(
            "Search",
            vec![
                Parameter::new("q", "System.String"),
                Parameter::new("q", "System.String"),
            ],
        )]);

        let err = api.validate().unwrap_err();
        assert!(err.to_string().contains("ThingsController.Search"));
        assert!(matches!(err, DefinitionError::DuplicateParameter { .. }));
    }

    #[test]
    fn validate_rejects_repeated_verb() {
        let mut action = make_action("Twice", vec![]);
        action.verbs = vec![HttpVerb::Get, HttpVerb::Post, HttpVerb::Get];
        let api = make_api(vec![action]);

        let err = api.validate().unwrap_err();
        assert!(matches!(
            err,
            DefinitionError::DuplicateVerb {
                verb: HttpVerb::Get,
                ..
            }
        ));
        assert_eq!(
            err.to_string(),
            "Action 'ThingsController.Twice' lists verb GET more than once"
        );
    }

    #[test]
    fn validate_rejects_parameter_without_type() {
        let api = make_api(vec![make_action("Get", vec![Parameter::new("id", "")])]);
        let err = api.validate().unwrap_err();
        assert!(matches!(
            err,
            DefinitionError::EmptyName {
                kind: "parameter type",
                ..
            }
        ));
    }
}
