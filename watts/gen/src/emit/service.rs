//! Angular service emission.
//!
//! The service wraps every endpoint class with a typed `call` that runs the
//! registered before/after handlers around the HTTP request. Endpoints are
//! created through per-controller factories set up in the constructor:
//!
//! ```text
//! this.Users.Get = (args: Endpoints.Users.IGet): Endpoints.Users.IGetWithCall => {
//!     var endpoint = new Endpoints.Users.Get(args);
//!     return _.extendOwn(endpoint, {
//!         call(httpHeaders?: HttpHeaders) {
//!             return AngularEndpointsService.call<Interfaces.IUser>($http, $q, this, null, httpHeaders);
//!         }
//!     });
//! };
//! ```

use std::path::Path;

use tracing::debug;
use watts_define::HttpVerb;

use crate::block::{BlockSpec, CodeTree, NodeId};
use crate::config::GeneratorConfig;
use crate::emit::{
    ENDPOINT_INTERFACE, ENDPOINTS_IMPORT, interface_name, interface_with_call_name,
    optional_marker, service_interface_name,
};
use crate::model::{BuildReport, ControllerModel, EndpointModel, VerbCall};
use crate::naming::relative_path;

/// Builds the service file tree.
///
/// The root block is suppressed: the file consists of imports, handler type
/// aliases and one exported service class.
#[derive(Debug, Clone, Copy)]
pub struct AngularServiceEmitter<'c> {
    config: &'c GeneratorConfig,
}

impl<'c> AngularServiceEmitter<'c> {
    /// Creates an emitter for the given settings.
    pub fn new(config: &'c GeneratorConfig) -> Self {
        Self { config }
    }

    /// Module specifier of the endpoints file as seen from the service file.
    ///
    /// ```
    /// use std::path::PathBuf;
    /// use watts_gen::config::GeneratorConfig;
    /// use watts_gen::emit::AngularServiceEmitter;
    ///
    /// let config = GeneratorConfig {
    ///     service_output_directory: PathBuf::from("services"),
    ///     ..Default::default()
    /// };
    /// assert_eq!(AngularServiceEmitter::new(&config).endpoints_import_path(), "../Endpoints");
    /// ```
    pub fn endpoints_import_path(&self) -> String {
        let directory = relative_path(
            &self.config.service_output_directory,
            &self.config.endpoints_output_directory,
        );
        let file_name = Path::new(&self.config.endpoints_file_name)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.config.endpoints_file_name.clone());

        format!("{directory}/{file_name}")
    }

    /// Builds the tree for all controllers of `report`.
    pub fn emit(&self, report: &BuildReport) -> CodeTree {
        let service = &self.config.service_name;
        let endpoint = format!("{ENDPOINTS_IMPORT}.{ENDPOINT_INTERFACE}");

        let mut tree = CodeTree::suppressed(format!(
            "{} {}",
            self.config.namespace_keyword(),
            self.config.service_namespace
        ));

        let mut root = tree.root_mut();
        for import in &self.config.imports {
            root = root.add_statement(import.clone());
        }

        let class = root
            .add_statement(format!(
                "import * as {ENDPOINTS_IMPORT} from '{}';",
                self.endpoints_import_path()
            ))
            .add_new_line()
            .add_statement("import { Injectable } from '@angular/core';")
            .add_statement("import { HttpClient, HttpHeaders, HttpParams } from '@angular/common/http';")
            .add_new_line()
            .add_statement(format!(
                "type BeforeCallHandler = (endpoint: {endpoint}, data, config: any) => Promise<void>;"
            ))
            .add_statement(format!(
                "type AfterCallHandler = <TView> (endpoint: {endpoint}, data, config: any, response: TView) => Promise<void>;"
            ))
            .add_and_use_block(format!("export class {service}"))
            .add_statement("static $inject = ['$http', '$q'];")
            .add_statement_if("static endpointCache = {};", self.config.endpoints_support_caching)
            .id();

        let constructor = tree
            .block_mut(class)
            .add_and_use_block("constructor(private $http: ng.IHttpService, private $q: ng.IQService)")
            .id();

        self.emit_call_helper(&mut tree, class, &endpoint);
        self.emit_handler_registration(&mut tree, class);
        if self.config.endpoints_support_caching {
            self.emit_cached_call_helper(&mut tree, class, &endpoint);
        }

        for controller in &report.controllers {
            self.emit_controller(&mut tree, class, constructor, controller);
        }

        tree
    }

    fn emit_call_helper(&self, tree: &mut CodeTree, class: NodeId, endpoint: &str) {
        let service = &self.config.service_name;

        tree.block_mut(class)
            .add_and_use_block(format!(
                "static call<TView>(httpService: ng.IHttpService, qService: ng.IQService, endpoint: {endpoint}, data, httpConfig?: ng.IRequestShortcutConfig)"
            ))
            .add_and_use_block(BlockSpec::new("const config =").terminated(";"))
            .add_statement("method: endpoint._verb,")
            .add_statement("url: endpoint.toString(),")
            .add_statement("data: data")
            .parent()
            .add_statement("httpConfig && _.extend(config, httpConfig);")
            .add_new_line()
            .add_and_use_block(
                BlockSpec::new(format!(
                    "return qService.all({service}.onBeforeCallHandlers.map(onBeforeCall => onBeforeCall.handler(endpoint, data, config))).then(before =>"
                ))
                .function()
                .terminated(";"),
            )
            .add_statement("const call = httpService<TView>(config);")
            .add_and_use_block(
                BlockSpec::new("return call.then(response =>")
                    .function()
                    .terminated(";"),
            )
            .add_statement("let result = response.data;")
            .add_statement(format!(
                "return qService.all({service}.onAfterCallHandlers.map(onAfterCall => onAfterCall.handler<TView>(endpoint, data, config, result))).then(after => result);"
            ));
    }

    fn emit_handler_registration(&self, tree: &mut CodeTree, class: NodeId) {
        let service = &self.config.service_name;
        let mut cursor = tree
            .block_mut(class)
            .add_statement("private static onBeforeCallHandlers: ({ name: string; handler: BeforeCallHandler; })[] = []")
            .add_statement("private static onAfterCallHandlers: ({ name: string; handler: AfterCallHandler; })[] = []");

        for (registration, handlers, handler_type) in [
            ("AddBeforeCallHandler", "onBeforeCallHandlers", "BeforeCallHandler"),
            ("AddAfterCallHandler", "onAfterCallHandlers", "AfterCallHandler"),
        ] {
            let remove = format!("{service}.{handlers} = _.filter({service}.{handlers}, h => h.name != name);");
            cursor = cursor
                .add_and_use_block(format!(
                    "static {registration} = (name: string, handler: {handler_type}) =>"
                ))
                .add_statement(remove.clone())
                .add_statement(format!("{service}.{handlers}.push({{ name: name, handler: handler }});"))
                .add_statement(format!("return () => {remove}"))
                .parent();
        }
    }

    fn emit_cached_call_helper(&self, tree: &mut CodeTree, class: NodeId, endpoint: &str) {
        tree.block_mut(class)
            .add_and_use_block(format!(
                "static callCached<TView>(httpService: ng.IHttpService, qService: ng.IQService, endpoint: {endpoint}, data, httpConfig?: ng.IRequestShortcutConfig)"
            ))
            .add_statement("var cacheKey = endpoint.toString();")
            .add_and_use_block("if (this.endpointCache[cacheKey] == null)")
            .add_and_use_block(
                BlockSpec::new(
                    "return this.call<TView>(httpService, qService, endpoint, data, httpConfig).then(result =>",
                )
                .function()
                .terminated(";"),
            )
            .add_statement("this.endpointCache[cacheKey] = result;")
            .add_statement("return this.endpointCache[cacheKey];")
            .parent()
            .parent()
            .add_statement("const deferred = qService.defer();")
            .add_statement("deferred.resolve(this.endpointCache[cacheKey]);")
            .add_statement("return deferred.promise;");
    }

    fn emit_controller(
        &self,
        tree: &mut CodeTree,
        class: NodeId,
        constructor: NodeId,
        controller: &ControllerModel,
    ) {
        debug!(controller = %controller.name, "emitting service factories");

        let prefix = format!("{ENDPOINTS_IMPORT}.{}", controller.name);
        tree.block_mut(class).add_statement(format!(
            "public {}: {prefix}.{} = <any>{{}};",
            controller.name,
            service_interface_name(&controller.name)
        ));

        for endpoint in controller.endpoints.iter().filter(|e| e.is_supported()) {
            for call in &endpoint.verb_calls {
                self.emit_factory(tree, constructor, &prefix, controller, endpoint, call);
            }
        }
    }

    fn emit_factory(
        &self,
        tree: &mut CodeTree,
        constructor: NodeId,
        prefix: &str,
        controller: &ControllerModel,
        endpoint: &EndpointModel,
        call: &VerbCall,
    ) {
        let service = &self.config.service_name;
        let caching = self.config.endpoints_support_caching;
        let optional = optional_marker(endpoint.all_parameters_optional());

        let extend = tree
            .block_mut(constructor)
            .add_and_use_block(
                BlockSpec::new(format!(
                    "this.{}.{} = (args{optional}: {prefix}.{}): {prefix}.{} =>",
                    controller.name,
                    call.name,
                    interface_name(&call.name),
                    interface_with_call_name(&call.name)
                ))
                .terminated(";"),
            )
            .add_statement(format!("var endpoint = new {prefix}.{}(args);", call.name))
            .add_and_use_block(
                BlockSpec::new("return _.extendOwn(endpoint,")
                    .function()
                    .terminated(";"),
            )
            .add_and_use_block(
                BlockSpec::new(format!(
                    "call{}({})",
                    call.call_generic, call.argument_definition
                ))
                .terminated(if caching { "," } else { "" }),
            )
            .add_statement(format!(
                "return {service}.call{}($http, $q, this, {});",
                call.return_generic, call.argument_value
            ))
            .parent();

        if caching && call.verb == HttpVerb::Get {
            extend
                .add_and_use_block(format!(
                    "callCached{}({})",
                    call.call_generic, call.argument_definition
                ))
                .add_statement(format!(
                    "return {service}.callCached{}($http, $q, this, {});",
                    call.return_generic, call.argument_value
                ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use crate::model::ModelBuilder;
    use crate::resolver::TypeResolver;
    use watts_define::apis::{define_shop_api, define_shop_type_mappings};

    fn service_config() -> GeneratorConfig {
        GeneratorConfig {
            no_namespaces_or_modules: true,
            generate_service: true,
            ..Default::default()
        }
    }

    fn emit(config: &GeneratorConfig) -> String {
        let resolver = TypeResolver::new(define_shop_type_mappings()).expect("valid table");
        let report = ModelBuilder::new(&resolver).build(&define_shop_api());
        AngularServiceEmitter::new(config).emit(&report).to_string()
    }

    #[test]
    fn file_starts_with_imports_and_handler_types() {
        let text = emit(&service_config());
        assert!(text.starts_with(
            "import * as Endpoints from './Endpoints';

import { Injectable } from '@angular/core';
import { HttpClient, HttpHeaders, HttpParams } from '@angular/common/http';

type BeforeCallHandler = (endpoint: Endpoints.IEndpoint, data, config: any) => Promise<void>;
type AfterCallHandler = <TView> (endpoint: Endpoints.IEndpoint, data, config: any, response: TView) => Promise<void>;

export class AngularEndpointsService {
    static $inject = ['$http', '$q'];

    constructor(private $http: ng.IHttpService, private $q: ng.IQService) {
"
        ), "{text}");
    }

    #[test]
    fn call_helper_chains_function_blocks() {
        let text = emit(&service_config());
        assert!(text.contains(
            "        httpConfig && _.extend(config, httpConfig);

        return qService.all(AngularEndpointsService.onBeforeCallHandlers.map(onBeforeCall => onBeforeCall.handler(endpoint, data, config))).then(before => {
            const call = httpService<TView>(config);
            return call.then(response => {
                let result = response.data;
                return qService.all(AngularEndpointsService.onAfterCallHandlers.map(onAfterCall => onAfterCall.handler<TView>(endpoint, data, config, result))).then(after => result);
            });
        });
    }
"
        ), "{text}");
    }

    #[test]
    fn factory_for_typed_get() {
        let text = emit(&service_config());
        assert!(text.contains(
            "        this.Users.Get = (args: Endpoints.Users.IGet): Endpoints.Users.IGetWithCall => {
            var endpoint = new Endpoints.Users.Get(args);
            return _.extendOwn(endpoint, {
                call(httpHeaders?: HttpHeaders) {
                    return AngularEndpointsService.call<Interfaces.IUser>($http, $q, this, null, httpHeaders);
                }
            });
        };
"
        ), "{text}");
    }

    #[test]
    fn all_optional_arguments_make_args_optional() {
        let text = emit(&service_config());
        assert!(text.contains(
            "this.Users.List = (args?: Endpoints.Users.IList): Endpoints.Users.IListWithCall =>"
        ));
    }

    #[test]
    fn multi_verb_factories_and_untyped_calls() {
        let text = emit(&service_config());
        assert!(text.contains("this.Users.SavePut = (args: Endpoints.Users.ISavePut)"));
        assert!(text.contains(
            "call<TView>(user: Interfaces.IUser, httpHeaders?: HttpHeaders) {
                    return AngularEndpointsService.call<TView>($http, $q, this, user, httpHeaders);"
        ));
    }

    #[test]
    fn excluded_action_has_no_factory() {
        let text = emit(&service_config());
        assert!(!text.contains("Merge"));
    }

    #[test]
    fn controllers_get_public_members() {
        let text = emit(&service_config());
        assert!(text.contains("    public Users: Endpoints.Users.IUsersService = <any>{};\n"));
        assert!(text.contains("    public Orders: Endpoints.Orders.IOrdersService = <any>{};\n"));
    }

    #[test]
    fn caching_adds_cached_calls_for_get_only() {
        let config = GeneratorConfig {
            endpoints_support_caching: true,
            ..service_config()
        };
        let text = emit(&config);

        assert!(text.contains("    static endpointCache = {};\n"));
        assert!(text.contains("    static callCached<TView>("));
        assert!(text.contains(
            "                call(httpHeaders?: HttpHeaders) {
                    return AngularEndpointsService.call<Interfaces.IUser>($http, $q, this, null, httpHeaders);
                },

                callCached(httpHeaders?: HttpHeaders) {
                    return AngularEndpointsService.callCached<Interfaces.IUser>($http, $q, this, null, httpHeaders);
                }
"
        ), "{text}");
        assert!(!text.contains("callCached<TView>(user"));
    }

    #[test]
    fn import_path_follows_output_directories() {
        let config = GeneratorConfig {
            endpoints_output_directory: PathBuf::from("generated/endpoints"),
            service_output_directory: PathBuf::from("generated/services"),
            endpoints_file_name: "Api.ts".to_string(),
            ..service_config()
        };
        assert_eq!(
            AngularServiceEmitter::new(&config).endpoints_import_path(),
            "../endpoints/Api"
        );
    }

    #[test]
    fn handler_registration_replaces_by_name() {
        let text = emit(&service_config());
        assert!(text.contains(
            "    static AddBeforeCallHandler = (name: string, handler: BeforeCallHandler) => {
        AngularEndpointsService.onBeforeCallHandlers = _.filter(AngularEndpointsService.onBeforeCallHandlers, h => h.name != name);
        AngularEndpointsService.onBeforeCallHandlers.push({ name: name, handler: handler });
        return () => AngularEndpointsService.onBeforeCallHandlers = _.filter(AngularEndpointsService.onBeforeCallHandlers, h => h.name != name);
    }
"
        ));
    }
}
