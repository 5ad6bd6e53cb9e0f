//! Endpoints file emission.
//!
//! Produces one class per generated verb. A class holds the route and query
//! values as fields and renders its own URL:
//!
//! ```text
//! export class Get implements IGet, IEndpoint {
//!     _verb = 'GET';
//!     id: number;
//!
//!     constructor(args?: IGet) {
//!         this.id = args != null ? args.id : null;
//!     }
//!
//!     toString = (): string => {
//!         return `/api/users/${this.id}`;
//!     }
//! }
//! ```

use tracing::debug;

use crate::block::{BlockMut, CodeTree, NodeId};
use crate::config::GeneratorConfig;
use crate::emit::{
    ENDPOINT_INTERFACE, QUERY_PARAM_CLASS, interface_name, interface_with_call_name,
    optional_marker, service_interface_name,
};
use crate::model::{BuildReport, ControllerModel, EndpointModel, EndpointParameter, VerbCall};

/// Builds the endpoints file tree.
///
/// ## Examples
///
/// ```
/// use watts_define::apis::{define_shop_api, define_shop_type_mappings};
/// use watts_gen::config::GeneratorConfig;
/// use watts_gen::emit::EndpointsEmitter;
/// use watts_gen::model::ModelBuilder;
/// use watts_gen::resolver::TypeResolver;
///
/// let resolver = TypeResolver::new(define_shop_type_mappings()).unwrap();
/// let report = ModelBuilder::new(&resolver).build(&define_shop_api());
///
/// let config = GeneratorConfig::default();
/// let text = EndpointsEmitter::new(&config).emit(&report).to_string();
///
/// assert!(text.starts_with("namespace Endpoints {\n"));
/// assert!(text.contains("export class Get implements IGet, IEndpoint {"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct EndpointsEmitter<'c> {
    config: &'c GeneratorConfig,
}

impl<'c> EndpointsEmitter<'c> {
    /// Creates an emitter for the given settings.
    pub fn new(config: &'c GeneratorConfig) -> Self {
        Self { config }
    }

    /// Builds the tree for all controllers of `report`.
    pub fn emit(&self, report: &BuildReport) -> CodeTree {
        let header = format!(
            "{} {}",
            self.config.namespace_keyword(),
            self.config.endpoints_namespace
        );

        let mut tree = if self.config.no_namespaces_or_modules {
            CodeTree::suppressed(header)
        } else {
            CodeTree::new(header)
        };

        if self.config.no_namespaces_or_modules {
            let mut root = tree.root_mut();
            for import in self.imports() {
                root = root.add_statement(import);
            }
        }

        tree.root_mut()
            .add_and_use_block(format!("export abstract class {QUERY_PARAM_CLASS}"))
            .add_statement("abstract getQueryParams(): string")
            .parent()
            .add_and_use_block(format!("export interface {ENDPOINT_INTERFACE}"))
            .add_statement("_verb: string;")
            .add_statement("toString(): string;");

        for controller in &report.controllers {
            self.emit_controller(&mut tree, controller);
        }

        tree
    }

    fn imports(&self) -> Vec<String> {
        let mut imports = self.config.imports.clone();

        let needs_http_headers = self.config.generate_service
            && self
                .config
                .call_header_argument
                .as_deref()
                .is_some_and(|argument| argument.contains("HttpHeaders"));
        if needs_http_headers {
            imports.push("import { HttpHeaders } from '@angular/common/http';".to_string());
        }

        imports
    }

    fn emit_controller(&self, tree: &mut CodeTree, controller: &ControllerModel) {
        debug!(controller = %controller.name, "emitting endpoint classes");

        let namespace = tree
            .root_mut()
            .add_and_use_block(format!(
                "export {} {}",
                self.config.namespace_keyword(),
                controller.name
            ))
            .id();

        for endpoint in &controller.endpoints {
            for call in &endpoint.verb_calls {
                self.emit_interfaces(tree, namespace, endpoint, call);
                self.emit_class(tree, namespace, controller, endpoint, call);
            }
        }

        if self.config.generate_service {
            let mut service = tree
                .block_mut(namespace)
                .add_and_use_block(format!(
                    "export interface {}",
                    service_interface_name(&controller.name)
                ));

            for endpoint in &controller.endpoints {
                let optional = optional_marker(endpoint.all_parameters_optional());
                for call in &endpoint.verb_calls {
                    service = service.add_statement(format!(
                        "{}: (args{}: {}) => {};",
                        call.name,
                        optional,
                        interface_name(&call.name),
                        interface_with_call_name(&call.name)
                    ));
                }
            }
        }
    }

    fn emit_interfaces(
        &self,
        tree: &mut CodeTree,
        namespace: NodeId,
        endpoint: &EndpointModel,
        call: &VerbCall,
    ) {
        let mut fields = tree
            .block_mut(namespace)
            .add_and_use_block(format!("export interface {}", interface_name(&call.name)));
        for parameter in &endpoint.constructor_parameters {
            fields = fields.add_statement(format!("{};", parameter.declaration()));
        }

        if !self.config.generate_service {
            return;
        }

        let result_type = endpoint.return_shape.type_script_type();
        let caches = self.config.endpoints_support_caching && call.verb == watts_define::HttpVerb::Get;

        tree.block_mut(namespace)
            .add_and_use_block(format!(
                "export interface {} extends {}, {ENDPOINT_INTERFACE}",
                interface_with_call_name(&call.name),
                interface_name(&call.name)
            ))
            .add_statement(format!(
                "call{}({}): Promise<{}>;",
                call.call_generic, call.argument_definition, result_type
            ))
            .add_statement_if(
                format!(
                    "callCached{}({}): Promise<{}>;",
                    call.call_generic, call.argument_definition, result_type
                ),
                caches,
            );
    }

    fn emit_class(
        &self,
        tree: &mut CodeTree,
        namespace: NodeId,
        controller: &ControllerModel,
        endpoint: &EndpointModel,
        call: &VerbCall,
    ) {
        let mut class = tree.block_mut(namespace).add_and_use_block(format!(
            "export class {} implements {}, {ENDPOINT_INTERFACE}",
            call.name,
            interface_name(&call.name)
        ));

        if let Some(doc) = &endpoint.doc {
            for line in doc.lines() {
                class = class.add_statement(format!("// {}", line.trim()));
            }
        }

        class = class.add_statement(format!("_verb = '{}';", call.verb));
        for parameter in &endpoint.constructor_parameters {
            class = class.add_statement(format!("{};", parameter.declaration()));
        }
        let class = class.id();

        if !endpoint.constructor_parameters.is_empty() {
            let mut constructor = tree.block_mut(class).add_and_use_block(format!(
                "constructor(args?: {})",
                interface_name(&call.name)
            ));
            for parameter in &endpoint.constructor_parameters {
                constructor = constructor.add_statement(constructor_assignment(parameter));
            }
        }

        let has_query_string = endpoint.query_parameters().next().is_some();
        if has_query_string {
            emit_query_string(tree, class, endpoint);
        }

        let query_string = if has_query_string {
            " + this.getQueryString()"
        } else {
            ""
        };
        tree.block_mut(class)
            .add_and_use_block("toString = (): string =>")
            .add_statement(format!(
                "return `{}{}`{};",
                controller.base_endpoint, endpoint.endpoint, query_string
            ));
    }
}

fn constructor_assignment(parameter: &EndpointParameter) -> String {
    let name = &parameter.name;
    let ty = &parameter.output_type;

    if ty.auto_initialize {
        let initial = if ty.is_collection() {
            "[]".to_string()
        } else {
            format!("new {}()", ty.name)
        };
        format!("this.{name} = args != null && args.{name} != null ? args.{name} : {initial};")
    } else {
        format!("this.{name} = args != null ? args.{name} : null;")
    }
}

fn emit_query_string(tree: &mut CodeTree, class: NodeId, endpoint: &EndpointModel) {
    let query_string = tree
        .block_mut(class)
        .add_and_use_block("private getQueryString = (): string =>")
        .add_statement("let parameters: string[] = [];")
        .id();

    for parameter in endpoint.query_parameters() {
        let cursor = tree.block_mut(query_string);
        if parameter.is_optional {
            let guarded = cursor.add_and_use_block(format!("if (this.{} != null)", parameter.name));
            push_query_value(guarded, parameter);
        } else {
            push_query_value(cursor, parameter);
        }
    }

    tree.block_mut(query_string)
        .add_and_use_block("if (parameters.length > 0)")
        .add_statement("return '?' + parameters.join('&');")
        .parent()
        .add_statement("return '';");
}

fn push_query_value<'a>(block: BlockMut<'a>, parameter: &EndpointParameter) -> BlockMut<'a> {
    let name = &parameter.name;
    let ty = &parameter.output_type;

    if ty.is_collection() && !ty.is_deferred() {
        block
            .add_and_use_block(format!("for (const item of this.{name})"))
            .add_statement(format!(
                "parameters.push(`{name}=${{encodeURIComponent(item)}}`);"
            ))
            .parent()
    } else if ty.is_simple() && !parameter.from_uri {
        block.add_statement(format!(
            "parameters.push(`{name}=${{encodeURIComponent(this.{name})}}`);"
        ))
    } else {
        block
            .add_and_use_block(format!("if (this.{name} instanceof {QUERY_PARAM_CLASS})"))
            .add_statement(format!("parameters.push(this.{name}.getQueryParams());"))
            .parent()
            .add_and_use_block("else")
            .add_statement(format!(
                "console.error('{name} should extend {QUERY_PARAM_CLASS}!');"
            ))
            .parent()
    }
}
