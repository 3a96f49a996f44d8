use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use resmodel_core::config::{self, CONFIG_FILE_NAME, ImporterConfig};
use resmodel_core::ir::{IrResource, ResourceModel};
use resmodel_core::parse::{self, SpecFormat, spec::OpenApiSpec};
use resmodel_core::transform::{
    self, ImportOptions, Models, ServiceIndex, build_resource_ids, discover_services,
};

#[derive(Parser)]
#[command(name = "resmodel", about = "Resolve REST API resources from an OpenAPI 3.x spec", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the resolved resource model
    Resources {
        /// Path to the OpenAPI spec file (YAML or JSON)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Only import these services (repeatable)
        #[arg(short, long)]
        service: Vec<String>,

        /// Output format
        #[arg(long, default_value = "yaml")]
        format: OutputFormat,
    },

    /// Print the resource ID registry of a service
    Ids {
        #[arg(short, long)]
        input: Option<PathBuf>,

        #[arg(short, long)]
        service: String,
    },

    /// List the services found in a spec's tags
    Services {
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Map resource IDs onto read models and report unresolved resources
    Check {
        #[arg(short, long)]
        input: Option<PathBuf>,

        #[arg(short, long)]
        service: Vec<String>,
    },

    /// Initialize a new resmodel configuration
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Yaml,
    Json,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Resources {
            input,
            service,
            format,
        } => cmd_resources(input, service, format),

        Commands::Ids { input, service } => cmd_ids(input, &service),

        Commands::Services { input } => cmd_services(input),

        Commands::Check { input, service } => cmd_check(input, service),

        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "resmodel", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Try to load the project config file from the current directory.
fn try_load_config() -> Result<Option<ImporterConfig>> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    Ok(config::load_config(&config_path)?)
}

fn load_spec(path: &Path) -> Result<OpenApiSpec> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;

    let spec = parse::parse(&content, SpecFormat::from_path(path))
        .with_context(|| format!("failed to parse {}", path.display()))?;
    log::debug!("loaded {} paths from {}", spec.paths.len(), path.display());
    Ok(spec)
}

/// Config from the working directory, the OpenAPI document it points at (or `input`),
/// and import options with any `--service` filters applied.
fn prepare(input: Option<PathBuf>, services: Vec<String>) -> Result<(OpenApiSpec, ImportOptions)> {
    let cfg = try_load_config()?.unwrap_or_default();
    let input = input.unwrap_or_else(|| PathBuf::from(&cfg.input));
    let spec = load_spec(&input)?;

    let mut options = ImportOptions::from_config(&cfg);
    if !services.is_empty() {
        options.services = services;
    }
    Ok((spec, options))
}

fn cmd_resources(input: Option<PathBuf>, services: Vec<String>, format: OutputFormat) -> Result<()> {
    let (spec, options) = prepare(input, services)?;
    let models = transform::import_spec(&spec, &options);

    let summary: Vec<serde_json::Value> = models.values().map(build_model_summary).collect();
    let summary = serde_json::Value::Array(summary);

    match format {
        OutputFormat::Yaml => {
            let yaml = serde_yaml_ng::to_string(&summary)?;
            print!("{}", yaml);
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&summary)?;
            println!("{}", json);
        }
    }

    let errors: usize = models.values().map(|m| m.errors.len()).sum();
    if errors > 0 {
        eprintln!("{errors} resource errors, rerun with RUST_LOG=warn for details");
    }
    Ok(())
}

fn build_model_summary(model: &ResourceModel) -> serde_json::Value {
    let resources: Vec<serde_json::Value> = model.resources.values().map(build_resource_summary).collect();
    let errors: Vec<String> = model.errors.iter().map(ToString::to_string).collect();

    serde_json::json!({
        "service": model.service,
        "api_version": model.api_version,
        "resources": resources,
        "errors": errors,
    })
}

fn build_resource_summary(resource: &IrResource) -> serde_json::Value {
    let operations: Vec<serde_json::Value> = resource
        .operations
        .iter()
        .map(|op| {
            serde_json::json!({
                "name": op.name,
                "type": op.operation_type.as_str(),
                "method": op.method.as_str(),
                "uri_suffix": op.uri_suffix,
                "request_model": op.request_model,
                "response_model": op.response_model(),
            })
        })
        .collect();

    serde_json::json!({
        "name": resource.name,
        "category": resource.category,
        "id": resource.id.as_ref().map(|id| id.id()),
        "paths": resource.paths.iter().map(|p| p.id()).collect::<Vec<_>>(),
        "operations": operations,
    })
}

fn cmd_ids(input: Option<PathBuf>, service: &str) -> Result<()> {
    let (spec, options) = prepare(input, Vec::new())?;
    let index = ServiceIndex::from_spec(&spec);
    let ids = build_resource_ids(&index.scope(service), &spec, &options.heuristics);

    if ids.is_empty() {
        eprintln!("No resource IDs found for service {service:?}.");
    }
    for id in ids.iter() {
        let tags: Vec<&str> = id.tags.iter().map(String::as_str).collect();
        println!("{}\t{}", id, tags.join(","));
    }
    Ok(())
}

fn cmd_services(input: Option<PathBuf>) -> Result<()> {
    let (spec, _) = prepare(input, Vec::new())?;
    let index = ServiceIndex::from_spec(&spec);

    for (service, tags) in discover_services(&spec, &index) {
        println!("{}\t{}", service, tags.join(","));
    }
    Ok(())
}

fn cmd_check(input: Option<PathBuf>, services: Vec<String>) -> Result<()> {
    let (spec, options) = prepare(input, services)?;
    let models = Models::from_spec(&spec, &options.heuristics);

    let mut failures = 0;
    for (service, model) in transform::import_spec(&spec, &options) {
        let (mapped, errors) = transform::read_model_mappings(&model, &models);
        eprintln!(
            "{}: {} resources, {} mapped, {} errors",
            service,
            model.resources.len(),
            mapped.len(),
            model.errors.len() + errors.len()
        );
        for error in model.errors.iter().chain(&errors) {
            match &error.operation {
                Some(op) => eprintln!("  {} ({}): {}", error.resource, op, error.source),
                None => eprintln!("  {}: {}", error.resource, error.source),
            }
        }
        failures += model.errors.len() + errors.len();
    }

    if failures > 0 {
        anyhow::bail!("{failures} resource errors found");
    }
    eprintln!("Check successful.");
    Ok(())
}

fn cmd_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, config::default_config_content())?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}
