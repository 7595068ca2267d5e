use std::fs;
use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use txkit_codegen::{GenerateRequest, GeneratorOptions, generate};

#[derive(Debug, Parser)]
#[command(name = "txkit-gen", version)]
#[command(about = "Generate SQL query constants and CRUD impls from table schemas")]
struct Cli {
    /// Comma-separated list of type names; must be set.
    #[arg(long = "type", value_name = "TYPES")]
    types: String,
    /// Table name, overriding the schema declaration.
    #[arg(long)]
    table: Option<String>,
    /// Primary key column, overriding the schema declaration.
    #[arg(long)]
    key: Option<String>,
    /// Output file name; default <dir>/<type>_gen.rs.
    #[arg(long)]
    output: Option<PathBuf>,
    /// Trim this prefix from the generated constant names.
    #[arg(long, default_value = "")]
    trim_prefix: String,
    /// Emit schema comments as doc comments.
    #[arg(long)]
    line_comment: bool,
    /// Comma-separated list of tags a schema file must carry.
    #[arg(long)]
    tags: Option<String>,
    /// A schema directory, or schema files.
    inputs: Vec<PathBuf>,
}

fn main() {
    init_logging();

    let cli = Cli::parse();
    let args: Vec<String> = std::env::args().skip(1).collect();

    if let Err(err) = run(cli, args) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: Cli, args: Vec<String>) -> Result<(), String> {
    let types = parse_csv_list(Some(cli.types));
    if types.is_empty() {
        Cli::command()
            .error(
                ErrorKind::MissingRequiredArgument,
                "--type must name at least one type",
            )
            .exit();
    }

    let request = GenerateRequest {
        types,
        inputs: cli.inputs,
        tags: parse_csv_list(cli.tags),
        output: cli.output,
        options: GeneratorOptions {
            table: cli.table,
            key: cli.key,
            trim_prefix: cli.trim_prefix,
            line_comment: cli.line_comment,
        },
        args,
    };

    let generated = generate(&request).map_err(|err| err.to_string())?;
    fs::write(&generated.path, &generated.source)
        .map_err(|err| format!("writing output {}: {err}", generated.path.display()))?;

    info!(path = %generated.path.display(), "wrote generated code");
    Ok(())
}

fn parse_csv_list(raw: Option<String>) -> Vec<String> {
    raw.map(|value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(ToOwned::to_owned)
            .collect()
    })
    .unwrap_or_default()
}
