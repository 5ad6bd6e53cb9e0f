//! Output assembly and file writing.
//!
//! This module runs the whole pipeline for one endpoint description: it builds
//! the endpoint models, emits the endpoints file and (optionally) the service
//! file, prepends the generated notice and writes everything to disk.
//!
//! ## Output Structure
//!
//! ```text
//! <output>/
//! ├── <endpointsOutputDirectory>/Endpoints.ts
//! └── <serviceOutputDirectory>/AngularEndpointsService.ts   # generateService only
//! ```
//!
//! Nothing is written until every file has been generated, and each file is
//! written atomically (temp file + rename).

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;
use watts_define::WebApi;

use crate::config::GeneratorConfig;
use crate::emit::{AngularServiceEmitter, EndpointsEmitter};
use crate::errors::GeneratorError;
use crate::model::{BuildReport, ModelBuilder};
use crate::resolver::TypeResolver;

/// First lines of every generated file.
pub const GENERATED_NOTICE: &str =
    "// This code was automatically generated by watts-gen. Do not edit manually.\n\n";

/// One generated file, relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Path relative to the output directory.
    pub path: PathBuf,
    /// Complete file contents, notice included.
    pub contents: String,
}

/// Everything produced by one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    /// Files in write order: endpoints first, then the service.
    pub files: Vec<GeneratedFile>,
    /// The models the files were emitted from, with diagnostics.
    pub report: BuildReport,
}

/// Generates all files for `api` in memory.
///
/// ## Examples
///
/// ```
/// use watts_define::apis::{define_shop_api, define_shop_type_mappings};
/// use watts_gen::config::GeneratorConfig;
/// use watts_gen::output::generate;
/// use watts_gen::resolver::TypeResolver;
///
/// let resolver = TypeResolver::new(define_shop_type_mappings()).unwrap();
/// let generation = generate(&define_shop_api(), &resolver, &GeneratorConfig::default());
///
/// assert_eq!(generation.files.len(), 1);
/// assert_eq!(generation.report.diagnostics.len(), 1);
/// ```
pub fn generate(api: &WebApi, resolver: &TypeResolver, config: &GeneratorConfig) -> Generation {
    let report = ModelBuilder::new(resolver)
        .with_header_argument(config.call_header_argument.clone())
        .build(api);

    let mut files = Vec::new();

    let endpoints = EndpointsEmitter::new(config).emit(&report);
    files.push(GeneratedFile {
        path: config
            .endpoints_output_directory
            .join(&config.endpoints_file_name),
        contents: with_notice(&endpoints.to_string()),
    });

    if config.generate_service {
        let service = AngularServiceEmitter::new(config).emit(&report);
        files.push(GeneratedFile {
            path: config.service_output_directory.join(&config.service_file_name),
            contents: with_notice(&service.to_string()),
        });
    }

    Generation { files, report }
}

fn with_notice(code: &str) -> String {
    format!("{GENERATED_NOTICE}{code}")
}

/// Writes content to a file atomically.
///
/// Writes to a temporary file first, then renames to the target path. This
/// prevents partial writes if the process is interrupted.
///
/// ## Errors
///
/// Returns [`GeneratorError::WriteError`] if any file operation fails.
pub fn write_atomic(path: &Path, content: &str) -> Result<(), GeneratorError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| GeneratorError::WriteError {
            path: parent.display().to_string(),
            source: e,
        })?;
    }

    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content).map_err(|e| GeneratorError::WriteError {
        path: temp_path.display().to_string(),
        source: e,
    })?;

    fs::rename(&temp_path, path).map_err(|e| GeneratorError::WriteError {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

/// Generates all files and writes them below `output_dir`.
///
/// In dry-run mode the files are printed to stdout instead.
///
/// ## Errors
///
/// Returns [`GeneratorError::WriteError`] if a file cannot be written.
pub fn generate_and_write(
    api: &WebApi,
    resolver: &TypeResolver,
    config: &GeneratorConfig,
    output_dir: &Path,
    dry_run: bool,
) -> Result<Generation, GeneratorError> {
    let generation = generate(api, resolver, config);

    if dry_run {
        for file in &generation.files {
            println!("=== {} ===\n{}", file.path.display(), file.contents);
        }
        return Ok(generation);
    }

    for file in &generation.files {
        let path = output_dir.join(&file.path);
        write_atomic(&path, &file.contents)?;
        info!(path = %path.display(), bytes = file.contents.len(), "wrote generated file");
    }

    Ok(generation)
}
