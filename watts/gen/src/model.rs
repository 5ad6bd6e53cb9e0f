//! Endpoint models.
//!
//! [`ModelBuilder`] turns the raw [`WebApi`] descriptors into the typed
//! constructs the emitters walk: per action, which parameters become
//! constructor fields, which go to the query string, which one is the request
//! body, and what each generated `call` looks like per HTTP verb.
//!
//! Actions that cannot be expressed (more than one body parameter, or a
//! generated name already taken in the same controller) are not an error.
//! Their verbs are skipped with a [`Diagnostic`] and the rest of the API still
//! generates.

use std::collections::HashSet;

use tracing::{debug, warn};
use watts_define::{Action, Controller, HttpVerb, Parameter, WebApi};

use crate::resolver::{OutputType, SourceType, TypeCandidate, TypeResolver};
use crate::route::{self, RouteSegment};

/// Return types that carry no typed payload.
const UNTYPED_RETURN_TYPES: &[&str] = &[
    "System.Void",
    "System.Web.Http.IHttpActionResult",
    "System.Net.Http.HttpResponseMessage",
    "Microsoft.AspNetCore.Mvc.IActionResult",
];

/// Generic parameter used for untyped calls.
const UNTYPED_GENERIC: &str = "<TView>";

/// Default extra argument appended to every generated `call`.
pub const DEFAULT_HEADER_ARGUMENT: &str = "httpHeaders?: HttpHeaders";

/// Where a parameter's value travels in the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterKind {
    /// Substituted into a route segment.
    Route,
    /// Appended to the query string.
    Query,
    /// Sent as the request body.
    Body,
}

/// A parameter with its resolved type and placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointParameter {
    /// Parameter name.
    pub name: String,
    /// Declared type name.
    pub source_type: String,
    /// Whether callers may omit the value.
    pub is_optional: bool,
    /// Resolved TypeScript type.
    pub output_type: OutputType,
    /// Placement in the request.
    pub kind: ParameterKind,
    /// Serialized through `QueryParam.getQueryParams()` instead of `name=value`.
    pub from_uri: bool,
    /// Constraints of the route segment naming this parameter.
    pub constraints: Vec<String>,
}

impl EndpointParameter {
    /// `name?: Type` as used in interfaces and call signatures.
    pub fn declaration(&self) -> String {
        let optional = if self.is_optional { "?" } else { "" };
        format!("{}{}: {}", self.name, optional, self.output_type)
    }
}

/// Shape of an action's response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnShape {
    /// No typed payload; callers choose the view type.
    Untyped,
    /// A single value.
    Plain(OutputType),
    /// An array of values.
    Collection(OutputType),
}

impl ReturnShape {
    /// TypeScript type of the resolved payload, `TView` when untyped.
    pub fn type_script_type(&self) -> String {
        match self {
            ReturnShape::Untyped => "TView".to_string(),
            ReturnShape::Plain(ty) | ReturnShape::Collection(ty) => ty.to_string(),
        }
    }
}

/// The generated `call` for one verb of an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerbCall {
    /// The verb.
    pub verb: HttpVerb,
    /// Name of the generated endpoint class and interfaces.
    pub name: String,
    /// Parameter list of `call(...)`.
    pub argument_definition: String,
    /// Arguments forwarded by `call(...)` to the service helper.
    pub argument_value: String,
    /// Generic argument used when invoking the service helper.
    pub return_generic: String,
    /// Generic parameter declared on the endpoint's own `call`.
    pub call_generic: String,
}

/// Everything the emitters need about one action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointModel {
    /// Controller name without the `Controller` suffix.
    pub controller: String,
    /// Action name.
    pub name: String,
    /// Verbs in declaration order.
    pub verbs: Vec<HttpVerb>,
    /// Action route segments.
    pub segments: Vec<RouteSegment>,
    /// Path appended to the controller's base endpoint.
    pub endpoint: String,
    /// Route parameters, then query parameters.
    pub constructor_parameters: Vec<EndpointParameter>,
    /// Parameters bound from the request body.
    pub body_parameters: Vec<EndpointParameter>,
    /// Response shape.
    pub return_shape: ReturnShape,
    /// One entry per generated verb; empty when the action is unsupported.
    pub verb_calls: Vec<VerbCall>,
    /// Documentation carried over from the action.
    pub doc: Option<String>,
}

impl EndpointModel {
    /// Constructor parameters that go to the query string.
    pub fn query_parameters(&self) -> impl Iterator<Item = &EndpointParameter> {
        self.constructor_parameters
            .iter()
            .filter(|p| p.kind == ParameterKind::Query)
    }

    /// The single body parameter, if the action has exactly one.
    pub fn body_parameter(&self) -> Option<&EndpointParameter> {
        match self.body_parameters.as_slice() {
            [body] => Some(body),
            _ => None,
        }
    }

    /// Whether at least one verb of this action is generated.
    pub fn is_supported(&self) -> bool {
        !self.verb_calls.is_empty()
    }

    /// Whether callers may omit the whole argument object.
    ///
    /// True when every constructor parameter is optional, and therefore also
    /// for actions without constructor parameters.
    pub fn all_parameters_optional(&self) -> bool {
        self.constructor_parameters.iter().all(|p| p.is_optional)
    }
}

/// One controller's models.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerModel {
    /// Controller name without the `Controller` suffix.
    pub name: String,
    /// Base route segments.
    pub segments: Vec<RouteSegment>,
    /// Base path of every endpoint of the controller.
    pub base_endpoint: String,
    /// Actions in declaration order.
    pub endpoints: Vec<EndpointModel>,
}

/// A verb that was left out of the generated output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Controller name without the `Controller` suffix.
    pub controller: String,
    /// Action name.
    pub action: String,
    /// Skipped verb.
    pub verb: HttpVerb,
    /// Why it was skipped.
    pub message: String,
}

/// Result of a model build.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BuildReport {
    /// Controllers in input order.
    pub controllers: Vec<ControllerModel>,
    /// Skipped verbs.
    pub diagnostics: Vec<Diagnostic>,
}

impl BuildReport {
    /// Number of generated verb calls across all controllers.
    pub fn verb_call_count(&self) -> usize {
        self.controllers
            .iter()
            .flat_map(|c| &c.endpoints)
            .map(|e| e.verb_calls.len())
            .sum()
    }
}

/// Builds endpoint models with a given type resolver.
///
/// ## Examples
///
/// ```
/// use watts_define::apis::define_shop_api;
/// use watts_gen::model::ModelBuilder;
/// use watts_gen::resolver::TypeResolver;
///
/// let resolver = TypeResolver::default();
/// let report = ModelBuilder::new(&resolver).build(&define_shop_api());
///
/// assert_eq!(report.controllers[0].name, "Users");
/// assert_eq!(report.controllers[0].base_endpoint, "/api/users");
/// ```
#[derive(Debug, Clone)]
pub struct ModelBuilder<'r> {
    resolver: &'r TypeResolver,
    header_argument: Option<String>,
}

impl<'r> ModelBuilder<'r> {
    /// Creates a builder appending [`DEFAULT_HEADER_ARGUMENT`] to every call.
    pub fn new(resolver: &'r TypeResolver) -> Self {
        Self {
            resolver,
            header_argument: Some(DEFAULT_HEADER_ARGUMENT.to_string()),
        }
    }

    /// Replaces the extra call argument; `None` drops it.
    pub fn with_header_argument(mut self, argument: Option<String>) -> Self {
        self.header_argument = argument.filter(|a| !a.trim().is_empty());
        self
    }

    /// Builds models for every controller of `api`.
    pub fn build(&self, api: &WebApi) -> BuildReport {
        let mut report = BuildReport::default();

        for controller in &api.controllers {
            let model = self.build_controller(controller, &mut report.diagnostics);
            report.controllers.push(model);
        }

        report
    }

    fn build_controller(
        &self,
        controller: &Controller,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> ControllerModel {
        let name = controller.short_name().to_string();
        let segments = route::parse_route(&controller.base_route);
        let base_endpoint = route::base_endpoint(&segments);

        debug!(controller = %name, base = %base_endpoint, "building controller model");

        // Generated class and interface names share one namespace per controller.
        let mut taken = HashSet::new();
        let mut endpoints = Vec::with_capacity(controller.actions.len());
        for action in &controller.actions {
            let mut endpoint = self.build_endpoint(&name, &segments, action, diagnostics);
            endpoint.verb_calls.retain(|call| {
                if taken.insert(call.name.clone()) {
                    return true;
                }
                skip_verb(
                    diagnostics,
                    &name,
                    &action.name,
                    call.verb,
                    format!("name '{}' is already generated in this controller", call.name),
                );
                false
            });
            endpoints.push(endpoint);
        }

        ControllerModel {
            name,
            segments,
            base_endpoint,
            endpoints,
        }
    }

    fn build_endpoint(
        &self,
        controller: &str,
        base_segments: &[RouteSegment],
        action: &Action,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> EndpointModel {
        let segments = route::parse_route(&action.route);
        let endpoint = route::base_endpoint(&segments);

        let mut route_parameters = Vec::new();
        let mut query_parameters = Vec::new();
        let mut body_parameters = Vec::new();

        for parameter in &action.parameters {
            let resolved = self.resolve_parameter(parameter, base_segments, &segments);
            match resolved.kind {
                ParameterKind::Route => route_parameters.push(resolved),
                ParameterKind::Query => query_parameters.push(resolved),
                ParameterKind::Body => body_parameters.push(resolved),
            }
        }

        let mut constructor_parameters = route_parameters;
        constructor_parameters.extend(query_parameters);

        let return_shape = self.return_shape(action.return_type.as_deref());

        debug!(
            controller,
            action = %action.name,
            parameters = constructor_parameters.len(),
            bodies = body_parameters.len(),
            "building endpoint model"
        );

        if action.verbs.is_empty() {
            warn!(controller, action = %action.name, "skipping action: no HTTP verbs");
        }

        let verb_calls = if body_parameters.len() > 1 {
            let message = format!(
                "{} body parameters ({}); at most one is supported",
                body_parameters.len(),
                body_parameters
                    .iter()
                    .map(|p| p.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
            for &verb in &action.verbs {
                skip_verb(diagnostics, controller, &action.name, verb, message.clone());
            }
            Vec::new()
        } else {
            action
                .verbs
                .iter()
                .map(|&verb| {
                    self.verb_call(action, verb, body_parameters.first(), &return_shape)
                })
                .collect()
        };

        EndpointModel {
            controller: controller.to_string(),
            name: action.name.clone(),
            verbs: action.verbs.clone(),
            segments,
            endpoint,
            constructor_parameters,
            body_parameters,
            return_shape,
            verb_calls,
            doc: action.doc.clone(),
        }
    }

    fn resolve_parameter(
        &self,
        parameter: &Parameter,
        base_segments: &[RouteSegment],
        action_segments: &[RouteSegment],
    ) -> EndpointParameter {
        let is_route = route::parameter_names(base_segments)
            .chain(route::parameter_names(action_segments))
            .any(|name| name == parameter.name);

        let constraints = match route::constraints_for(action_segments, &parameter.name) {
            [] => route::constraints_for(base_segments, &parameter.name),
            found => found,
        };

        let output_type = self
            .resolver
            .resolve(&TypeCandidate::for_parameter(parameter, constraints));

        let kind = if is_route {
            ParameterKind::Route
        } else if parameter.is_from_body() || (!output_type.is_simple() && !parameter.is_from_uri()) {
            ParameterKind::Body
        } else {
            ParameterKind::Query
        };

        EndpointParameter {
            name: parameter.name.clone(),
            source_type: parameter.type_name.clone(),
            is_optional: self.resolver.is_optional(parameter, kind),
            output_type,
            kind,
            from_uri: kind == ParameterKind::Query && parameter.is_from_uri(),
            constraints: constraints.to_vec(),
        }
    }

    fn return_shape(&self, return_type: Option<&str>) -> ReturnShape {
        let Some(return_type) = return_type.filter(|t| !t.trim().is_empty()) else {
            return ReturnShape::Untyped;
        };

        let element = SourceType::parse(return_type).element;
        if UNTYPED_RETURN_TYPES.contains(&element.as_str()) {
            return ReturnShape::Untyped;
        }

        let output_type = self.resolver.resolve(&TypeCandidate::for_type(return_type));
        if output_type.is_collection() {
            ReturnShape::Collection(output_type)
        } else {
            ReturnShape::Plain(output_type)
        }
    }

    fn verb_call(
        &self,
        action: &Action,
        verb: HttpVerb,
        body: Option<&EndpointParameter>,
        return_shape: &ReturnShape,
    ) -> VerbCall {
        let name = if action.verbs.len() == 1 {
            action.name.clone()
        } else {
            format!("{}{}", action.name, verb.pascal_name())
        };

        let header_name = self
            .header_argument
            .as_deref()
            .map(|argument| argument.split([':', '?']).next().unwrap_or(argument).trim());

        let mut definition = Vec::new();
        let mut value = Vec::new();

        let body = body.filter(|_| verb.carries_body());
        if let Some(body) = body {
            definition.push(format!("{}: {}", body.name, body.output_type));
        }
        value.push(body.map_or("null", |b| b.name.as_str()).to_string());

        if let Some(argument) = &self.header_argument {
            definition.push(argument.clone());
        }
        if let Some(header_name) = header_name {
            value.push(header_name.to_string());
        }

        let (return_generic, call_generic) = match return_shape {
            ReturnShape::Untyped => (UNTYPED_GENERIC.to_string(), UNTYPED_GENERIC.to_string()),
            typed => (format!("<{}>", typed.type_script_type()), String::new()),
        };

        VerbCall {
            verb,
            name,
            argument_definition: definition.join(", "),
            argument_value: value.join(", "),
            return_generic,
            call_generic,
        }
    }
}

fn skip_verb(
    diagnostics: &mut Vec<Diagnostic>,
    controller: &str,
    action: &str,
    verb: HttpVerb,
    message: String,
) {
    warn!(controller, action, %verb, "skipping verb: {message}");
    diagnostics.push(Diagnostic {
        controller: controller.to_string(),
        action: action.to_string(),
        verb,
        message,
    });
}
