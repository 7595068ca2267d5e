//! Error types for schema loading and code generation.

use std::path::PathBuf;

use thiserror::Error;
use txkit_core::ValidationError;

/// Errors raised while loading schemas or generating code.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// A schema file or directory could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A YAML schema file failed to parse.
    #[error("failed to parse {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A JSON schema file failed to parse.
    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The resolved table declaration is not usable.
    #[error("invalid declaration for type {type_name}: {source}")]
    Validation {
        type_name: String,
        #[source]
        source: ValidationError,
    },

    /// No loaded file declares the requested type.
    #[error("type {0} not found in any schema file")]
    TypeNotFound(String),

    /// The requested type is declared more than once.
    #[error("type {type_name} is declared more than once: {}", display_paths(.paths))]
    AmbiguousType {
        type_name: String,
        paths: Vec<PathBuf>,
    },

    /// `tags` were requested together with an explicit file list.
    #[error("--tags applies only to directories, not when files are specified")]
    TagsWithFiles,

    /// No type names were requested.
    #[error("at least one type name is required")]
    NoTypes,
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type alias for code generation.
pub type Result<T> = std::result::Result<T, CodegenError>;
