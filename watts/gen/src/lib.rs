//! Watts code generator library.
//!
//! This crate generates TypeScript endpoint classes and an Angular service
//! wrapper from Web API endpoint descriptions created with `watts-define`
//! (or extracted from a server assembly into JSON). The generated code
//! includes:
//!
//! - A `QueryParam` base class and an `IEndpoint` interface
//! - Per action verb: an argument interface, a `WithCall` interface and an
//!   endpoint class that renders its own URL including the query string
//! - Optionally, a service whose factories return endpoints with a typed
//!   `call` (and `callCached` for GET) running before/after call handlers
//!
//! ## Modules
//!
//! - [`writer`] - Indentation-aware line accumulation
//! - [`block`] - The code block tree generated text is built from
//! - [`route`] - Route template parsing and path composition
//! - [`naming`] - Case conversion and import paths
//! - [`resolver`] - Rule-based type mapping
//! - [`model`] - Endpoint models built from the descriptors
//! - [`emit`] - Emitters for the endpoints and service files
//! - [`config`] - Generator settings and input loading
//! - [`output`] - Pipeline, generated notice and atomic file writing
//! - [`errors`] - Error types for the generator
//!
//! ## Example Usage
//!
//! ```no_run
//! use std::path::Path;
//! use watts_define::apis::{define_shop_api, define_shop_type_mappings};
//! use watts_gen::config::GeneratorConfig;
//! use watts_gen::output::generate_and_write;
//! use watts_gen::resolver::TypeResolver;
//!
//! let resolver = TypeResolver::new(define_shop_type_mappings()).unwrap();
//! let config = GeneratorConfig::default();
//!
//! // dry_run=true prints instead of writing
//! let generation =
//!     generate_and_write(&define_shop_api(), &resolver, &config, Path::new("generated"), true).unwrap();
//! for diagnostic in &generation.report.diagnostics {
//!     eprintln!("{}: {}", diagnostic.action, diagnostic.message);
//! }
//! ```

pub mod block;
pub mod config;
pub mod emit;
pub mod errors;
pub mod model;
pub mod naming;
pub mod output;
pub mod resolver;
pub mod route;
pub mod writer;
