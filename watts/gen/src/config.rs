//! Generator configuration and input loading.
//!
//! All inputs are JSON files:
//!
//! - the endpoint description ([`WebApi`]), produced by a metadata extractor
//! - the type-mapping table (`[TypeMapping]`)
//! - the optional [`GeneratorConfig`], every field of which has a default
//!
//! ```json
//! {
//!   "endpointsFileName": "Endpoints.ts",
//!   "noNamespacesOrModules": true,
//!   "generateService": true,
//!   "serviceOutputDirectory": "services",
//!   "endpointsSupportCaching": true
//! }
//! ```
//!
//! Everything is validated before generation starts, so a bad file never
//! produces partial output.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;
use watts_define::{TypeMapping, WebApi};

use crate::errors::GeneratorError;
use crate::model::DEFAULT_HEADER_ARGUMENT;

fn default_endpoints_file_name() -> String {
    "Endpoints.ts".to_string()
}

fn default_endpoints_namespace() -> String {
    "Endpoints".to_string()
}

fn default_service_name() -> String {
    "AngularEndpointsService".to_string()
}

fn default_service_file_name() -> String {
    "AngularEndpointsService.ts".to_string()
}

fn default_service_namespace() -> String {
    "Services".to_string()
}

fn default_header_argument() -> Option<String> {
    Some(DEFAULT_HEADER_ARGUMENT.to_string())
}

/// Settings controlling what is generated and where it goes.
///
/// Directories are relative to the output directory given on the command
/// line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorConfig {
    /// Directory of the endpoints file.
    #[serde(default)]
    pub endpoints_output_directory: PathBuf,
    /// Name of the endpoints file.
    #[serde(default = "default_endpoints_file_name")]
    pub endpoints_file_name: String,
    /// Namespace wrapping the endpoint classes.
    #[serde(default = "default_endpoints_namespace")]
    pub endpoints_namespace: String,
    /// Use the `module` keyword instead of `namespace`.
    #[serde(default)]
    pub use_modules: bool,
    /// Emit top-level exports without a surrounding namespace.
    #[serde(default)]
    pub no_namespaces_or_modules: bool,
    /// Also generate the Angular service wrapper.
    #[serde(default)]
    pub generate_service: bool,
    /// Directory of the service file.
    #[serde(default)]
    pub service_output_directory: PathBuf,
    /// Class name of the generated service.
    #[serde(default = "default_service_name")]
    pub service_name: String,
    /// Name of the service file.
    #[serde(default = "default_service_file_name")]
    pub service_file_name: String,
    /// Namespace named in the (suppressed) service root.
    #[serde(default = "default_service_namespace")]
    pub service_namespace: String,
    /// Add `callCached` to GET endpoints.
    #[serde(default)]
    pub endpoints_support_caching: bool,
    /// Extra argument appended to every generated `call`; `null` drops it.
    #[serde(default = "default_header_argument")]
    pub call_header_argument: Option<String>,
    /// Inline type-mapping rules, evaluated before rules from a mappings file.
    #[serde(default)]
    pub type_mappings: Vec<TypeMapping>,
    /// Import statements placed at the top of module-style output files
    /// (e.g. `import * as Interfaces from './Interfaces';`).
    #[serde(default)]
    pub imports: Vec<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            endpoints_output_directory: PathBuf::new(),
            endpoints_file_name: default_endpoints_file_name(),
            endpoints_namespace: default_endpoints_namespace(),
            use_modules: false,
            no_namespaces_or_modules: false,
            generate_service: false,
            service_output_directory: PathBuf::new(),
            service_name: default_service_name(),
            service_file_name: default_service_file_name(),
            service_namespace: default_service_namespace(),
            endpoints_support_caching: false,
            call_header_argument: default_header_argument(),
            type_mappings: Vec::new(),
            imports: Vec::new(),
        }
    }
}

impl GeneratorConfig {
    /// Loads a configuration file.
    ///
    /// ## Errors
    ///
    /// [`GeneratorError::ReadError`] if the file cannot be opened and
    /// [`GeneratorError::ParseError`] if it is not a valid configuration.
    pub fn load_from(path: &Path) -> Result<Self, GeneratorError> {
        read_json(path)
    }

    /// `namespace` or `module`.
    pub fn namespace_keyword(&self) -> &'static str {
        if self.use_modules { "module" } else { "namespace" }
    }

    /// Checks settings that would otherwise produce broken output.
    ///
    /// ## Errors
    ///
    /// [`GeneratorError::ConfigError`] naming the first offending setting.
    pub fn validate(&self) -> Result<(), GeneratorError> {
        if self.endpoints_file_name.trim().is_empty() {
            return Err(GeneratorError::ConfigError(
                "endpointsFileName must not be empty".to_string(),
            ));
        }
        if !self.no_namespaces_or_modules && !is_identifier(&self.endpoints_namespace) {
            return Err(GeneratorError::ConfigError(format!(
                "endpointsNamespace '{}' is not a valid identifier",
                self.endpoints_namespace
            )));
        }

        if self.generate_service {
            if !self.no_namespaces_or_modules {
                return Err(GeneratorError::ConfigError(
                    "generateService requires noNamespacesOrModules, the service imports the endpoints file as a module"
                        .to_string(),
                ));
            }
            if !is_identifier(&self.service_name) {
                return Err(GeneratorError::ConfigError(format!(
                    "serviceName '{}' is not a valid identifier",
                    self.service_name
                )));
            }
            if self.service_file_name.trim().is_empty() {
                return Err(GeneratorError::ConfigError(
                    "serviceFileName must not be empty".to_string(),
                ));
            }
        }

        Ok(())
    }
}

/// Loads a type-mapping table.
///
/// ## Errors
///
/// [`GeneratorError::ReadError`] or [`GeneratorError::ParseError`].
pub fn load_type_mappings(path: &Path) -> Result<Vec<TypeMapping>, GeneratorError> {
    let mappings: Vec<TypeMapping> = read_json(path)?;
    debug!(path = %path.display(), rules = mappings.len(), "loaded type mappings");
    Ok(mappings)
}

/// Loads and validates an endpoint description.
///
/// ## Errors
///
/// [`GeneratorError::ReadError`], [`GeneratorError::ParseError`], or
/// [`GeneratorError::Definition`] when the description is malformed.
pub fn load_web_api(path: &Path) -> Result<WebApi, GeneratorError> {
    let api: WebApi = read_json(path)?;
    api.validate()?;
    debug!(
        path = %path.display(),
        controllers = api.controllers.len(),
        actions = api.action_count(),
        "loaded endpoint description"
    );
    Ok(api)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, GeneratorError> {
    let file = File::open(path).map_err(|source| GeneratorError::ReadError {
        path: path.display().to_string(),
        source,
    })?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|source| GeneratorError::ParseError {
        path: path.display().to_string(),
        source,
    })
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == '$' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).expect("write fixture");
        path
    }

    #[test]
    fn empty_object_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "config.json", "{}");

        let config = GeneratorConfig::load_from(&path).unwrap();
        assert_eq!(config, GeneratorConfig::default());
        assert_eq!(config.endpoints_file_name, "Endpoints.ts");
        assert_eq!(config.namespace_keyword(), "namespace");
        assert_eq!(config.call_header_argument.as_deref(), Some("httpHeaders?: HttpHeaders"));
    }

    #[test]
    fn null_header_argument_drops_it() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "config.json", r#"{ "callHeaderArgument": null }"#);
        let config = GeneratorConfig::load_from(&path).unwrap();
        assert!(config.call_header_argument.is_none());
    }

    #[test]
    fn camel_case_fields_are_read() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "config.json",
            r#"{
                "noNamespacesOrModules": true,
                "generateService": true,
                "serviceOutputDirectory": "services",
                "endpointsSupportCaching": true,
                "typeMappings": [ { "webApiTypeName": "System.Guid", "typeScriptTypeName": "string" } ]
            }"#,
        );

        let config = GeneratorConfig::load_from(&path).unwrap();
        assert!(config.generate_service);
        assert_eq!(config.service_output_directory, PathBuf::from("services"));
        assert_eq!(config.type_mappings.len(), 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = TempDir::new().unwrap();
        let err = GeneratorConfig::load_from(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, GeneratorError::ReadError { .. }));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "mappings.json", "[{ \"webApiTypeName\": 3 }]");
        let err = load_type_mappings(&path).unwrap_err();
        assert!(matches!(err, GeneratorError::ParseError { .. }));
        assert!(err.to_string().contains("mappings.json"));
    }

    #[test]
    fn pascal_case_type_mappings_are_accepted() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "mappings.json",
            r#"[
                { "WebApiTypeName": "Encrypted", "TypeScriptTypeName": "number", "TreatAsAttribute": true, "Match": "Id$" },
                { "webApiTypeName": "System.DateTime", "typeScriptTypeName": "Date" }
            ]"#,
        );

        let mappings = load_type_mappings(&path).unwrap();
        assert_eq!(mappings.len(), 2);
        assert!(mappings[0].treat_as_attribute);
        assert_eq!(mappings[0].name_match.as_deref(), Some("Id$"));
        assert_eq!(mappings[1].type_script_type_name, "Date");
    }

    #[test]
    fn web_api_is_validated_on_load() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "api.json",
            r#"{ "name": "Shop", "controllers": [ { "name": "", "actions": [] } ] }"#,
        );
        let err = load_web_api(&path).unwrap_err();
        assert!(matches!(err, GeneratorError::Definition(_)));
    }

    #[test]
    fn web_api_loads() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "api.json",
            r#"{
                "name": "Shop",
                "controllers": [
                    { "name": "UsersController", "baseRoute": "api/users",
                      "actions": [
                        { "name": "Get", "route": "{id:int}", "verbs": ["GET"],
                          "parameters": [ { "name": "id", "typeName": "System.Int32" } ],
                          "returnType": "Shop.Models.User" } ] } ]
            }"#,
        );
        let api = load_web_api(&path).unwrap();
        assert_eq!(api.action_count(), 1);
    }

    #[test]
    fn service_requires_module_output() {
        let config = GeneratorConfig {
            generate_service: true,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(GeneratorError::ConfigError(_))));
    }

    #[test]
    fn invalid_identifiers_are_rejected() {
        let config = GeneratorConfig {
            endpoints_namespace: "my-endpoints".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = GeneratorConfig {
            endpoints_namespace: "my-endpoints".to_string(),
            no_namespaces_or_modules: true,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn modules_keyword() {
        let config = GeneratorConfig {
            use_modules: true,
            ..Default::default()
        };
        assert_eq!(config.namespace_keyword(), "module");
    }
}
