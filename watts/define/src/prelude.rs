//! Convenient re-exports for working with watts definitions.
//!
//! ```
//! use watts_define::prelude::*;
//!
//! let rule = TypeMapping::new("System.Guid", "string");
//! let verb = HttpVerb::Get;
//! assert_eq!(verb.to_string(), "GET");
//! assert_eq!(rule.type_script_type_name, "string");
//! ```

pub use crate::errors::DefinitionError;
pub use crate::mapping::TypeMapping;
pub use crate::parameter::Parameter;
pub use crate::types::{Action, Controller, HttpVerb, WebApi};
