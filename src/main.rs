use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, IsTerminal};
use std::path::PathBuf;

use yschema::assist::{complete, AssistOptions};
use yschema::check::{validate, CheckOptions, Severity};
use yschema::config::Config;
use yschema::document::node::YamlNode;
use yschema::file::loader::{load_schema_file, load_yaml_file, load_yaml_from_stdin};
use yschema::schema::{SchemaRegistry, TypeDescriptor, TypeId, TypeKind, TypeUtil};
use yschema::yamlpath::{self, traverse_path, YamlPath};

/// yschema - schema-driven type and path queries for YAML configuration files
#[derive(Parser)]
#[command(name = "yschema")]
#[command(version)]
#[command(about = "Schema-driven type and path queries for YAML configuration files", long_about = None)]
struct Cli {
    /// Schema definition file (default: `schema` from the config file)
    #[arg(short, long, global = true)]
    schema: Option<PathBuf>,

    /// Type to start at (default: `root_type` from the config file, then the schema's root)
    #[arg(short, long, global = true)]
    root: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the type expected at a path
    Resolve {
        /// Path such as `server.port` or `$.servers[0]` (empty for the root)
        path: String,
    },
    /// Print the document values at a path
    Get {
        path: String,
        /// YAML document (omit to read from stdin)
        file: Option<PathBuf>,
    },
    /// List completion proposals after a path
    Complete {
        path: String,
        /// Only propose entries starting with this text
        #[arg(default_value = "")]
        prefix: String,
        /// Also propose deprecated properties
        #[arg(long)]
        include_deprecated: bool,
    },
    /// Validate a document against the schema
    Check {
        /// YAML document (omit to read from stdin)
        file: Option<PathBuf>,
        /// Do not warn about deprecated properties
        #[arg(long)]
        no_deprecated: bool,
    },
    /// List the types the schema declares
    Types,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = Config::load();

    match &cli.command {
        Command::Resolve { path } => {
            let (registry, root) = load_schema(&cli, &config)?;
            run_resolve(&registry, root, &parse_path(path)?)
        }
        Command::Get { path, file } => {
            let doc = load_document(file.as_ref())?;
            run_get(&doc, &parse_path(path)?)
        }
        Command::Complete {
            path,
            prefix,
            include_deprecated,
        } => {
            let (registry, root) = load_schema(&cli, &config)?;
            let mut options = AssistOptions::from(&config);
            options.include_deprecated |= *include_deprecated;
            for proposal in complete(&registry, root, &parse_path(path)?, prefix, &options) {
                let marker = if proposal.deprecated { " (deprecated)" } else { "" };
                match &proposal.description {
                    Some(description) => println!(
                        "{}: {}{} - {}",
                        proposal.label, proposal.type_name, marker, description
                    ),
                    None => println!("{}: {}{}", proposal.label, proposal.type_name, marker),
                }
            }
            Ok(())
        }
        Command::Check {
            file,
            no_deprecated,
        } => {
            let (registry, root) = load_schema(&cli, &config)?;
            let doc = load_document(file.as_ref())?;
            let mut options = CheckOptions::from(&config);
            options.report_deprecated &= !*no_deprecated;
            run_check(&registry, root, &doc, &options)
        }
        Command::Types => {
            let (registry, _) = load_schema(&cli, &config)?;
            for (_, descriptor) in registry.types().skip(1) {
                println!("{}", describe_type(&registry, descriptor));
            }
            Ok(())
        }
    }
}

/// Parses a path argument; an empty argument addresses the root.
fn parse_path(text: &str) -> Result<YamlPath> {
    if text.trim().is_empty() {
        return Ok(YamlPath::root());
    }
    yamlpath::Parser::parse(text).with_context(|| format!("Invalid path '{}'", text))
}

/// Loads the schema named on the command line or in the config, and picks
/// the root type.
fn load_schema(cli: &Cli, config: &Config) -> Result<(SchemaRegistry, TypeId)> {
    let schema_path = cli
        .schema
        .as_ref()
        .or(config.schema.as_ref())
        .ok_or_else(|| anyhow!("No schema given: use --schema or set `schema` in the config file"))?;
    let registry = load_schema_file(schema_path)?;

    let root = match cli.root.as_ref().or(config.root_type.as_ref()) {
        Some(name) => registry
            .lookup(name)
            .ok_or_else(|| anyhow!("Type '{}' is not declared in the schema", name))?,
        None => registry
            .root()
            .ok_or_else(|| anyhow!("The schema has no root type: use --root"))?,
    };
    Ok((registry, root))
}

/// Loads a document from `file`, or from stdin when it is piped.
fn load_document(file: Option<&PathBuf>) -> Result<YamlNode> {
    match file {
        Some(path) => load_yaml_file(path),
        None if !io::stdin().is_terminal() => load_yaml_from_stdin(),
        None => bail!("No document given: pass a file or pipe YAML to stdin"),
    }
}

fn run_resolve(registry: &SchemaRegistry, root: TypeId, path: &YamlPath) -> Result<()> {
    match registry.resolve(root, path) {
        Ok(ty) => {
            println!("{}", describe_type(registry, registry.descriptor(ty)));
            let hints = registry.get_hint_values(ty);
            if !hints.is_empty() {
                println!("  values: {}", hints.join(", "));
            }
            for property in registry.get_properties(ty) {
                println!(
                    "  {}: {}",
                    property.name,
                    registry.nice_type_name(property.ty)
                );
            }
            Ok(())
        }
        Err(err) => bail!(
            "{} (valid up to '{}', type {})",
            err.kind,
            err.resolved,
            registry.nice_type_name(err.reached)
        ),
    }
}

fn run_get(doc: &YamlNode, path: &YamlPath) -> Result<()> {
    match traverse_path(doc, path) {
        Ok(nodes) => {
            for node in nodes {
                let text = serde_yaml::to_string(&node.to_serde_value())
                    .context("Failed to render YAML")?;
                print!("{}", text);
            }
            Ok(())
        }
        Err(failure) => bail!("{} (valid up to '{}')", failure.error, failure.valid),
    }
}

fn run_check(
    registry: &SchemaRegistry,
    root: TypeId,
    doc: &YamlNode,
    options: &CheckOptions,
) -> Result<()> {
    let diagnostics = validate(registry, root, doc, options);
    for diagnostic in &diagnostics {
        println!("{}", diagnostic);
    }

    let errors = diagnostics
        .iter()
        .filter(|d| d.severity() == Severity::Error)
        .count();
    if errors > 0 {
        bail!("{} error(s) found", errors);
    }
    Ok(())
}

fn describe_type(registry: &SchemaRegistry, descriptor: &TypeDescriptor) -> String {
    let kind = match descriptor.kind() {
        TypeKind::Unknown => "unknown",
        TypeKind::Atomic => "atomic",
        TypeKind::Bean => "bean",
        TypeKind::Map { .. } => "map",
        TypeKind::Sequence { .. } => "sequence",
    };
    let mut line = format!("{} ({})", descriptor.name(), kind);
    if let TypeKind::Map { value } | TypeKind::Sequence { element: value } = descriptor.kind() {
        line.push_str(&format!(" of {}", registry.nice_type_name(value)));
    }
    if let Some(description) = descriptor.description() {
        line.push_str(&format!(" - {}", description));
    }
    line
}
