//! Error types for descriptor validation.

use thiserror::Error;

use crate::HttpVerb;

/// Problems found by [`WebApi::validate`](crate::WebApi::validate).
#[derive(Debug, Error)]
pub enum DefinitionError {
    /// A controller, action, parameter or parameter type has no name.
    #[error("Empty {kind} name in '{context}'")]
    EmptyName {
        /// What is missing a name.
        kind: &'static str,
        /// Where it was found.
        context: String,
    },

    /// The same parameter name is declared twice on one action.
    #[error("Action '{action}' declares parameter '{parameter}' more than once")]
    DuplicateParameter {
        /// `Controller.Action` of the offending action.
        action: String,
        /// The repeated parameter name.
        parameter: String,
    },

    /// An action lists the same HTTP verb twice.
    #[error("Action '{action}' lists verb {verb} more than once")]
    DuplicateVerb {
        /// `Controller.Action` of the offending action.
        action: String,
        /// The repeated verb.
        verb: HttpVerb,
    },
}
