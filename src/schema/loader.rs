//! Schema loader and in-memory registry
//!
//! - Schemas are stored as `<schema_dir>/<name>.json`, one file per schema
//! - A registered schema is immutable; re-registering a name is rejected
//! - Every schema passes `validate_structure` before it is registered

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::errors::{SchemaError, SchemaResult};
use super::types::Schema;

/// Parses schema JSON text and checks its structure.
///
/// `source_name` is only used in error messages.
pub fn parse_schema(source_name: &str, content: &str) -> SchemaResult<Schema> {
    let schema: Schema = serde_json::from_str(content)
        .map_err(|e| SchemaError::malformed(source_name, format!("Invalid JSON: {}", e)))?;

    schema
        .validate_structure()
        .map_err(|e| SchemaError::malformed(source_name, e))?;

    Ok(schema)
}

/// Reads and parses a single schema file.
pub fn read_schema_file(path: &Path) -> SchemaResult<Schema> {
    let content = fs::read_to_string(path).map_err(|source| SchemaError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_schema(&path.display().to_string(), &content)
}

/// Schema loader that reads schema files from disk and maintains an in-memory registry.
pub struct SchemaLoader {
    /// Directory containing schema files
    schema_dir: PathBuf,
    /// Loaded schemas indexed by name
    schemas: HashMap<String, Schema>,
}

impl SchemaLoader {
    /// Creates a new schema loader for the given directory.
    pub fn new(schema_dir: &Path) -> Self {
        Self {
            schema_dir: schema_dir.to_path_buf(),
            schemas: HashMap::new(),
        }
    }

    /// Returns the schema directory path.
    pub fn schema_dir(&self) -> &Path {
        &self.schema_dir
    }

    /// Loads every `*.json` file in the schema directory.
    ///
    /// Files are read in name order so that a duplicate name is always
    /// reported against the same file. Returns the number of schemas loaded.
    pub fn load_all(&mut self) -> SchemaResult<usize> {
        let entries = fs::read_dir(&self.schema_dir).map_err(|source| SchemaError::Io {
            path: self.schema_dir.clone(),
            source,
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| SchemaError::Io {
                path: self.schema_dir.clone(),
                source,
            })?;
            let path = entry.path();

            // Skip non-JSON files
            if path.extension().map_or(true, |ext| ext != "json") {
                continue;
            }
            paths.push(path);
        }
        paths.sort();

        for path in &paths {
            let schema = read_schema_file(path)?;
            debug!(schema = %schema.name, path = %path.display(), "schema file read");
            self.register(schema)?;
        }

        info!(dir = %self.schema_dir.display(), count = paths.len(), "schemas loaded");
        Ok(paths.len())
    }

    /// Registers a schema directly (for programmatic creation).
    pub fn register(&mut self, schema: Schema) -> SchemaResult<()> {
        schema
            .validate_structure()
            .map_err(|e| SchemaError::malformed("<in-memory>", e))?;

        // Check for immutability violation
        if self.schemas.contains_key(&schema.name) {
            return Err(SchemaError::Immutable(schema.name));
        }

        self.schemas.insert(schema.name.clone(), schema);
        Ok(())
    }

    /// Gets a schema by name.
    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.schemas.get(name)
    }

    /// Checks if a schema exists.
    pub fn exists(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// Returns all loaded schemas.
    pub fn all_schemas(&self) -> impl Iterator<Item = &Schema> {
        self.schemas.values()
    }

    /// Returns the number of loaded schemas.
    pub fn schema_count(&self) -> usize {
        self.schemas.len()
    }

    /// Saves a schema to disk as `<name>.json`.
    pub fn save_schema(&self, schema: &Schema) -> SchemaResult<PathBuf> {
        let path = self.schema_dir.join(format!("{}.json", schema.name));

        // Check if file already exists (immutability)
        if path.exists() {
            return Err(SchemaError::Immutable(schema.name.clone()));
        }

        fs::create_dir_all(&self.schema_dir).map_err(|source| SchemaError::Io {
            path: self.schema_dir.clone(),
            source,
        })?;

        let content = serde_json::to_string_pretty(schema).map_err(|e| {
            SchemaError::malformed(&schema.name, format!("Failed to serialize schema: {}", e))
        })?;

        fs::write(&path, content).map_err(|source| SchemaError::Io {
            path: path.clone(),
            source,
        })?;

        Ok(path)
    }
}
