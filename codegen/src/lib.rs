//! Code generator for txkit table types.
//!
//! Reads declarative table schemas (YAML or JSON, see `txkit-core`) and
//! emits, per requested type, the struct, SQL query constants and the
//! capability impls that `txkit-sqlite` dispatches to.
//!
//! - **`loader`**: [`Inputs`] discovery (directory scan with tag filter, or
//!   a file list) and single-declaration lookup
//! - **`generator`**: [`Generator`], `quote` templates and `prettyplease`
//!   formatting
//!
//! # Example
//!
//! ```no_run
//! use std::path::PathBuf;
//! use txkit_codegen::{GenerateRequest, generate};
//!
//! let request = GenerateRequest {
//!     types: vec!["Alert".into()],
//!     inputs: vec![PathBuf::from("schemas")],
//!     ..GenerateRequest::default()
//! };
//! let generated = generate(&request).unwrap();
//! assert_eq!(generated.path, PathBuf::from("schemas/alert_gen.rs"));
//! std::fs::write(&generated.path, generated.source).unwrap();
//! ```

use std::path::{Path, PathBuf};

mod error;
mod generator;
mod loader;

pub use error::{CodegenError, Result};
pub use generator::{Generator, GeneratorOptions, format_source, table_items};
pub use loader::{Inputs, LoadedSchema, load_schema};

/// Name of the generator binary, used in the generated file header.
pub const GENERATOR_NAME: &str = "txkit-gen";

/// Everything one generator run needs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateRequest {
    /// Type names to generate, in output order.
    pub types: Vec<String>,
    /// A single directory, or schema files. Empty means `.`.
    pub inputs: Vec<PathBuf>,
    /// Only read directory files carrying all of these tags.
    pub tags: Vec<String>,
    /// Output file; defaults to `<lowertype>_gen.rs` in the input directory.
    pub output: Option<PathBuf>,
    /// Code shaping flags.
    pub options: GeneratorOptions,
    /// Arguments recorded in the header, without the program name.
    pub args: Vec<String>,
}

/// A generated file, not yet written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    /// Destination path.
    pub path: PathBuf,
    /// Complete file contents, header included.
    pub source: String,
}

/// Returns the `DO NOT EDIT` header line for a run with `args`.
///
/// # Examples
///
/// ```
/// let header = txkit_codegen::header(&["--type".into(), "Alert".into()]);
/// assert_eq!(header, "// Code generated by \"txkit-gen --type Alert\"; DO NOT EDIT.\n");
/// ```
pub fn header(args: &[String]) -> String {
    format!(
        "// Code generated by \"{GENERATOR_NAME} {}\"; DO NOT EDIT.\n",
        args.join(" ")
    )
}

/// Default output path for a run whose first type is `type_name`.
pub fn default_output_path(dir: &Path, type_name: &str) -> PathBuf {
    dir.join(format!("{}_gen.rs", type_name.to_lowercase()))
}

/// Loads the inputs and generates every requested type into one file.
///
/// # Errors
///
/// Fails if no type is requested, an input cannot be read or parsed, a type
/// is missing or declared more than once, or a resolved declaration does
/// not validate.
pub fn generate(request: &GenerateRequest) -> Result<Generated> {
    let Some(first) = request.types.first() else {
        return Err(CodegenError::NoTypes);
    };

    let inputs = Inputs::load(&request.inputs, &request.tags)?;

    let mut generator = Generator::new(request.options.clone());
    for type_name in &request.types {
        generator.generate(inputs.find_table(type_name)?)?;
    }

    let path = request
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&inputs.dir, first));
    let source = generator.finish(&header(&request.args));

    Ok(Generated { path, source })
}
