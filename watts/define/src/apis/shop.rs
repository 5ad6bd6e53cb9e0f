//! Shop API definition.
//!
//! A small but representative Web API used by the generator's tests and by
//! `watts-gen --api shop`. It covers route constraints, optional and
//! `[FromUri]` query parameters, body parameters, multi-verb actions and an
//! action whose shape cannot be generated (two body candidates).

use crate::{Action, Controller, HttpVerb, Parameter, TypeMapping, WebApi};

/// Creates the Shop API definition.
///
/// ## Controllers
///
/// - `UsersController` (`api/users`) - `List`, `Get`, `Save` (PUT + POST), `Merge`
/// - `OrdersController` (`api/users/{userId:guid}/orders`) - `Find`, `Delete`
///
/// ## Example
///
/// ```rust
/// use watts_define::apis::define_shop_api;
///
/// let api = define_shop_api();
/// assert_eq!(api.controllers.len(), 2);
/// assert_eq!(api.action_count(), 6);
/// assert!(api.validate().is_ok());
/// ```
pub fn define_shop_api() -> WebApi {
    WebApi {
        name: "Shop".to_string(),
        controllers: vec![
            Controller {
                name: "UsersController".to_string(),
                base_route: "api/users".to_string(),
                actions: vec![
                    Action {
                        name: "List".to_string(),
                        route: String::new(),
                        verbs: vec![HttpVerb::Get],
                        parameters: vec![
                            Parameter::new("page", "System.Nullable<System.Int32>").optional(),
                            Parameter::new("filter", "Shop.Models.UserFilter")
                                .optional()
                                .with_attribute("FromUriAttribute"),
                        ],
                        return_type: Some(
                            "System.Collections.Generic.IEnumerable<Shop.Models.User>".to_string(),
                        ),
                        doc: Some("Lists users, one page at a time".to_string()),
                    },
                    Action {
                        name: "Get".to_string(),
                        route: "{id:int}".to_string(),
                        verbs: vec![HttpVerb::Get],
                        parameters: vec![Parameter::new("id", "System.Int32")],
                        return_type: Some("Shop.Models.User".to_string()),
                        doc: Some("Fetches a single user".to_string()),
                    },
                    Action {
                        name: "Save".to_string(),
                        route: "{id:int}".to_string(),
                        verbs: vec![HttpVerb::Put, HttpVerb::Post],
                        parameters: vec![
                            Parameter::new("id", "System.Int32"),
                            Parameter::new("user", "Shop.Models.User")
                                .with_attribute("FromBodyAttribute"),
                        ],
                        return_type: None,
                        doc: None,
                    },
                    Action {
                        name: "Merge".to_string(),
                        route: "merge".to_string(),
                        verbs: vec![HttpVerb::Post],
                        parameters: vec![
                            Parameter::new("source", "Shop.Models.User"),
                            Parameter::new("target", "Shop.Models.User"),
                        ],
                        return_type: Some("Shop.Models.User".to_string()),
                        doc: None,
                    },
                ],
            },
            Controller {
                name: "OrdersController".to_string(),
                base_route: "api/users/{userId:guid}/orders".to_string(),
                actions: vec![
                    Action {
                        name: "Find".to_string(),
                        route: String::new(),
                        verbs: vec![HttpVerb::Get],
                        parameters: vec![
                            Parameter::new("userId", "System.Guid"),
                            Parameter::new("status", "System.String").optional(),
                        ],
                        return_type: Some(
                            "System.Collections.Generic.List<Shop.Models.Order>".to_string(),
                        ),
                        doc: None,
                    },
                    Action {
                        name: "Delete".to_string(),
                        route: "{orderId}".to_string(),
                        verbs: vec![HttpVerb::Delete],
                        parameters: vec![
                            Parameter::new("userId", "System.Guid"),
                            Parameter::new("orderId", "System.Int64"),
                        ],
                        return_type: Some("System.Web.Http.IHttpActionResult".to_string()),
                        doc: None,
                    },
                ],
            },
        ],
    }
}

/// Type-mapping table used alongside [`define_shop_api`].
///
/// Maps GUIDs to strings and the Shop model namespace to the generated
/// `Interfaces` namespace.
pub fn define_shop_type_mappings() -> Vec<TypeMapping> {
    vec![
        TypeMapping::new("System.Guid", "string"),
        TypeMapping::new("System.DateTime", "Date"),
        TypeMapping::new("Shop.Models.UserFilter", "Interfaces.IUserFilter"),
        TypeMapping::new("Shop.Models.User", "Interfaces.IUser"),
        TypeMapping::new("Shop.Models.Order", "Interfaces.IOrder"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn controllers_keep_declaration_order() {
        let api = define_shop_api();
        let names: Vec<_> = api.controllers.iter().map(|c| c.short_name()).collect();
        assert_eq!(names, vec!["Users", "Orders"]);
    }

    #[test]
    fn save_answers_two_verbs() {
        let api = define_shop_api();
        let save = &api.controllers[0].actions[2];
        assert_eq!(save.name, "Save");
        assert_eq!(save.verbs, vec![HttpVerb::Put, HttpVerb::Post]);
    }

    #[test]
    fn filter_rule_precedes_user_rule() {
        // "Shop.Models.UserFilter" starts with "Shop.Models.User" too.
        let table = define_shop_type_mappings();
        let filter = table
            .iter()
            .position(|m| m.web_api_type_name == "Shop.Models.UserFilter");
        let user = table
            .iter()
            .position(|m| m.web_api_type_name == "Shop.Models.User");
        assert!(filter < user);
    }
}
