//! Schema file discovery and loading.
//!
//! Inputs are either a single directory, scanned (non-recursively) for
//! `.yaml`, `.yml` and `.json` files, or an explicit list of files. Tag
//! filtering only applies to directory scans.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use txkit_core::{SchemaFile, TableSchema};

use crate::error::{CodegenError, Result};

const SCHEMA_EXTENSIONS: &[&str] = &["yaml", "yml", "json"];

/// One parsed schema file.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedSchema {
    /// Where the file was read from.
    pub path: PathBuf,
    /// Parsed contents.
    pub schema: SchemaFile,
}

/// Every schema file selected by the command-line inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct Inputs {
    /// Directory generated files are written to by default.
    pub dir: PathBuf,
    /// Loaded files in a stable order.
    pub files: Vec<LoadedSchema>,
}

impl Inputs {
    /// Loads the schema files named by `args`.
    ///
    /// No arguments means the current directory. One directory argument is
    /// scanned and only files carrying every tag in `tags` are kept. Any
    /// other argument list is read as files, in which case `tags` must be
    /// empty.
    pub fn load(args: &[PathBuf], tags: &[String]) -> Result<Self> {
        let args: Vec<PathBuf> = if args.is_empty() {
            vec![PathBuf::from(".")]
        } else {
            args.to_vec()
        };

        if args.len() == 1 && is_directory(&args[0])? {
            return Self::scan(&args[0], tags);
        }

        if !tags.is_empty() {
            return Err(CodegenError::TagsWithFiles);
        }

        let dir = match args[0].parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let files = args
            .iter()
            .map(|path| load_schema(path))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { dir, files })
    }

    fn scan(dir: &Path, tags: &[String]) -> Result<Self> {
        let entries = fs::read_dir(dir).map_err(|source| CodegenError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| CodegenError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            if path.is_file() && has_schema_extension(&path) {
                paths.push(path);
            }
        }
        paths.sort();

        let mut files = Vec::new();
        for path in paths {
            let loaded = load_schema(&path)?;
            if !loaded.schema.has_tags(tags) {
                debug!(path = %path.display(), ?tags, "skipping schema file without requested tags");
                continue;
            }
            files.push(loaded);
        }

        Ok(Self {
            dir: dir.to_path_buf(),
            files,
        })
    }

    /// Finds the single declaration of `type_name` across all files.
    ///
    /// # Errors
    ///
    /// [`CodegenError::TypeNotFound`] if no file declares it and
    /// [`CodegenError::AmbiguousType`] if it is declared more than once.
    pub fn find_table(&self, type_name: &str) -> Result<&TableSchema> {
        let found: Vec<(&Path, &TableSchema)> = self
            .files
            .iter()
            .flat_map(|file| {
                file.schema
                    .tables
                    .iter()
                    .filter(|table| table.type_name == type_name)
                    .map(|table| (file.path.as_path(), table))
            })
            .collect();

        match found.as_slice() {
            [] => Err(CodegenError::TypeNotFound(type_name.to_string())),
            [(_, table)] => Ok(*table),
            _ => Err(CodegenError::AmbiguousType {
                type_name: type_name.to_string(),
                paths: found.iter().map(|(path, _)| path.to_path_buf()).collect(),
            }),
        }
    }
}

fn is_directory(path: &Path) -> Result<bool> {
    fs::metadata(path)
        .map(|meta| meta.is_dir())
        .map_err(|source| CodegenError::Io {
            path: path.to_path_buf(),
            source,
        })
}

fn has_schema_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SCHEMA_EXTENSIONS.contains(&ext))
}

/// Reads and parses one schema file, choosing JSON or YAML by extension.
pub fn load_schema(path: &Path) -> Result<LoadedSchema> {
    let content = fs::read_to_string(path).map_err(|source| CodegenError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let is_json = path.extension().and_then(|ext| ext.to_str()) == Some("json");
    let schema = if is_json {
        serde_json::from_str(&content).map_err(|source| CodegenError::Json {
            path: path.to_path_buf(),
            source,
        })?
    } else {
        serde_yaml::from_str(&content).map_err(|source| CodegenError::Yaml {
            path: path.to_path_buf(),
            source,
        })?
    };

    debug!(path = %path.display(), "loaded schema file");
    Ok(LoadedSchema {
        path: path.to_path_buf(),
        schema,
    })
}
