//! Error types for the watts generator.

use thiserror::Error;
use watts_define::DefinitionError;

/// Errors that can occur during code generation.
///
/// Every variant aborts the run before any file is written. Endpoint shapes
/// the generator cannot emit are not errors; they are reported as
/// [`Diagnostic`](crate::model::Diagnostic)s and skipped.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// Failed to parse an input file (metadata, type mappings, config)
    #[error("Failed to parse '{path}': {source}")]
    ParseError {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// Failed to read an input file
    #[error("Failed to read '{path}': {source}")]
    ReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write output file
    #[error("Failed to write output file '{path}': {source}")]
    WriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// A type-mapping rule carries a `match` pattern that is not a valid regex.
    #[error("Invalid match pattern '{pattern}' in type mapping for '{type_name}': {source}")]
    InvalidTypeMapping {
        /// The rule's `webApiTypeName`.
        type_name: String,
        /// The offending pattern.
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The endpoint description is malformed.
    #[error("Invalid endpoint description: {0}")]
    Definition(#[from] DefinitionError),
}
