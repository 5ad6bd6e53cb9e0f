//! Watts Code Generator
//!
//! Generates TypeScript endpoint classes and service wrappers from Web API
//! endpoint descriptions.

use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;
use tracing::info;
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use watts_define::WebApi;
use watts_define::apis::{define_shop_api, define_shop_type_mappings};
use watts_gen::config::{GeneratorConfig, load_type_mappings, load_web_api};
use watts_gen::errors::GeneratorError;
use watts_gen::output::generate_and_write;
use watts_gen::resolver::TypeResolver;

/// Watts code generator - turns Web API endpoint descriptions into TypeScript
#[derive(Parser, Debug)]
#[command(name = "watts-gen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Endpoint description (JSON) produced by the metadata extractor
    #[arg(short, long, required_unless_present = "api", conflicts_with = "api")]
    metadata: Option<PathBuf>,

    /// Built-in API definition to generate code for (e.g., "shop")
    #[arg(short, long)]
    api: Option<String>,

    /// Output directory for generated code
    #[arg(short, long, default_value = "generated")]
    output: PathBuf,

    /// Type-mapping table (JSON array), evaluated after inline config rules
    #[arg(short, long)]
    type_mappings: Option<PathBuf>,

    /// Generator configuration (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Also generate the Angular service (implies --no-namespaces)
    #[arg(long)]
    service: bool,

    /// Emit top-level exports instead of a surrounding namespace
    #[arg(long)]
    no_namespaces: bool,

    /// Print generated code without writing files
    #[arg(long)]
    dry_run: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Output logs as JSON
    #[arg(long)]
    json: bool,
}

fn init_tracing(verbose: u8, json: bool) {
    // RUST_LOG wins over -v flags
    let base_filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => match verbose {
            0 => "warn".to_string(),
            1 => "warn,watts_gen=info".to_string(),
            2 => "info,watts_gen=debug".to_string(),
            _ => "debug,watts_gen=trace".to_string(),
        },
    };

    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(verbose >= 2)
                    .with_level(true)
                    .with_file(verbose >= 3)
                    .with_line_number(verbose >= 3)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    }
}

fn load_api(cli: &Cli) -> Result<(WebApi, Vec<watts_define::TypeMapping>), GeneratorError> {
    if let Some(path) = &cli.metadata {
        return Ok((load_web_api(path)?, Vec::new()));
    }

    match cli.api.as_deref() {
        Some("shop") => Ok((define_shop_api(), define_shop_type_mappings())),
        Some(other) => Err(GeneratorError::ConfigError(format!(
            "Unknown API: '{}'. Available APIs: shop",
            other
        ))),
        None => Err(GeneratorError::ConfigError(
            "either --metadata or --api is required".to_string(),
        )),
    }
}

fn main() -> Result<(), GeneratorError> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.json);

    let mut config = match &cli.config {
        Some(path) => GeneratorConfig::load_from(path)?,
        None => GeneratorConfig::default(),
    };
    if cli.service {
        config.generate_service = true;
        config.no_namespaces_or_modules = true;
    }
    if cli.no_namespaces {
        config.no_namespaces_or_modules = true;
    }
    config.validate()?;

    let (api, built_in_mappings) = load_api(&cli)?;

    let mut mappings = config.type_mappings.clone();
    match &cli.type_mappings {
        Some(path) => mappings.extend(load_type_mappings(path)?),
        None => mappings.extend(built_in_mappings),
    }
    let resolver = TypeResolver::new(mappings)?;

    info!(
        api = %api.name,
        controllers = api.controllers.len(),
        actions = api.action_count(),
        output = %cli.output.display(),
        dry_run = cli.dry_run,
        "generating"
    );

    let generation = generate_and_write(&api, &resolver, &config, &cli.output, cli.dry_run)?;

    for diagnostic in &generation.report.diagnostics {
        eprintln!(
            "{} {}.{} {}: {}",
            "skipped".yellow().bold(),
            diagnostic.controller,
            diagnostic.action,
            diagnostic.verb,
            diagnostic.message
        );
    }

    if !cli.dry_run {
        for file in &generation.files {
            eprintln!(
                "{} {}",
                "generated".green().bold(),
                cli.output.join(&file.path).display()
            );
        }
        eprintln!(
            "{}",
            format!(
                "{} endpoint calls, {} skipped",
                generation.report.verb_call_count(),
                generation.report.diagnostics.len()
            )
            .dimmed()
        );
    }

    Ok(())
}
