//! Emission drivers.
//!
//! Each driver walks a [`BuildReport`](crate::model::BuildReport) and builds
//! a fresh [`CodeTree`](crate::block::CodeTree) for one output file:
//!
//! - [`EndpointsEmitter`] - the endpoints file: `QueryParam`, `IEndpoint`
//!   and, per controller, the interfaces and classes of every action verb
//! - [`AngularServiceEmitter`] - the optional service wrapping every endpoint
//!   with a typed `call`
//!
//! Drivers only decide structure. Indentation and spacing come from the tree.

pub mod endpoints;
pub mod service;

pub use endpoints::EndpointsEmitter;
pub use service::AngularServiceEmitter;

/// Name of the abstract base class for complex query-string objects.
///
/// Unresolved parameter types are declared with this class, so it is the
/// resolver's deferred type.
pub const QUERY_PARAM_CLASS: &str = crate::resolver::DEFERRED_TYPE;

/// Name of the interface every endpoint class implements.
pub const ENDPOINT_INTERFACE: &str = "IEndpoint";

/// Name the service uses to import the endpoints file.
pub const ENDPOINTS_IMPORT: &str = "Endpoints";

/// `I{name}`
pub(crate) fn interface_name(name: &str) -> String {
    format!("I{name}")
}

/// `I{name}WithCall`
pub(crate) fn interface_with_call_name(name: &str) -> String {
    format!("I{name}WithCall")
}

/// `I{controller}Service`
pub(crate) fn service_interface_name(controller: &str) -> String {
    format!("I{controller}Service")
}

/// `?` when the whole argument object may be omitted.
pub(crate) fn optional_marker(optional: bool) -> &'static str {
    if optional { "?" } else { "" }
}
