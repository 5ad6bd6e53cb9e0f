//! Watts Definition Library
//!
//! This crate provides the descriptor types (primitives) describing a Web API
//! routing surface. A metadata extraction tool produces these descriptors
//! (usually as JSON) from the server assembly, and the `watts-gen` binary turns
//! them into TypeScript endpoint classes and service wrappers.
//!
//! ## Core Types
//!
//! - [`WebApi`] - All controllers of an application
//! - [`Controller`] - A controller with base route and actions
//! - [`Action`] - An action method with route, verbs, parameters and return type
//! - [`Parameter`] - A method parameter with declared type and attributes
//! - [`HttpVerb`] - HTTP verbs (GET, POST, PUT, ...)
//! - [`TypeMapping`] - One rule of the configurable type-mapping table
//!
//! ## Examples
//!
//! ```
//! use watts_define::{Action, Controller, HttpVerb, Parameter, WebApi};
//!
//! let api = WebApi {
//!     name: "Shop".to_string(),
//!     controllers: vec![Controller {
//!         name: "UsersController".to_string(),
//!         base_route: "api/users".to_string(),
//!         actions: vec![Action {
//!             name: "Save".to_string(),
//!             route: "{id:int}".to_string(),
//!             verbs: vec![HttpVerb::Put],
//!             parameters: vec![
//!                 Parameter::new("id", "System.Int32"),
//!                 Parameter::new("user", "Shop.Models.User").with_attribute("FromBodyAttribute"),
//!             ],
//!             return_type: None,
//!             doc: None,
//!         }],
//!     }],
//! };
//!
//! assert_eq!(api.action_count(), 1);
//! ```

pub mod apis;
pub mod errors;
pub mod mapping;
pub mod parameter;
pub mod prelude;
pub mod types;

// Re-export main types at crate root
pub use errors::DefinitionError;
pub use mapping::TypeMapping;
pub use parameter::{FROM_BODY_ATTRIBUTE, FROM_URI_ATTRIBUTE, Parameter};
pub use types::{Action, Controller, HttpVerb, WebApi};
