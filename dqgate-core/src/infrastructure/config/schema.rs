// dqgate-core/src/infrastructure/config/schema.rs

use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};
use walkdir::WalkDir;

use crate::domain::schema::{EntitySchema, SchemaFile, SchemaValidator};
use crate::error::GateError;
use crate::infrastructure::error::InfrastructureError;

const SCHEMA_EXTENSIONS: [&str; 2] = ["yml", "yaml"];

const BUILTIN_SCHEMAS: [(&str, &str); 4] = [
    ("customer.yml", include_str!("../../../schemas/customer.yml")),
    ("transaction.yml", include_str!("../../../schemas/transaction.yml")),
    ("clickstream.yml", include_str!("../../../schemas/clickstream.yml")),
    ("product.yml", include_str!("../../../schemas/product.yml")),
];

/// Schemas shipped with the crate.
pub fn builtin_schemas() -> Result<Vec<EntitySchema>, InfrastructureError> {
    let mut entities = Vec::new();
    for (name, content) in BUILTIN_SCHEMAS {
        let file: SchemaFile = serde_yaml::from_str(content)
            .with_context(|| format!("Failed to parse built-in schema {}", name))?;
        entities.extend(file.entities);
    }
    Ok(entities)
}

pub fn load_schema_file(path: &Path) -> Result<SchemaFile, InfrastructureError> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read schema file at {:?}", path))?;
    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse schema YAML at {:?}", path))
        .map_err(Into::into)
}

/// Every entity declared in the YAML files under `dir`, in path order.
#[instrument]
pub fn load_schemas_dir(dir: &Path) -> Result<Vec<EntitySchema>, InfrastructureError> {
    if !dir.is_dir() {
        return Err(InfrastructureError::ConfigNotFound(format!(
            "Schema directory {:?} does not exist",
            dir
        )));
    }

    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| {
            p.is_file()
                && p.extension()
                    .and_then(|s| s.to_str())
                    .is_some_and(|ext| SCHEMA_EXTENSIONS.contains(&ext))
        })
        .collect();
    files.sort();

    let mut entities = Vec::new();
    for path in files {
        let file = load_schema_file(&path)?;
        if file.entities.is_empty() {
            warn!(path = ?path, "Schema file declares no entities");
            continue;
        }
        for schema in &file.entities {
            info!(entity = %schema.entity, version = schema.version, path = ?path, "📋 Schema found");
        }
        entities.extend(file.entities);
    }
    Ok(entities)
}

impl SchemaValidator {
    /// Validator over every schema file found under `dir`.
    pub fn from_dir(dir: &Path) -> Result<Self, GateError> {
        Ok(Self::new(load_schemas_dir(dir)?)?)
    }

    /// Validator over the schemas shipped with the crate.
    pub fn builtin() -> Result<Self, GateError> {
        Ok(Self::new(builtin_schemas()?)?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::tempdir;

    #[test]
    fn test_builtin_schemas_parse() -> Result<()> {
        let mut names: Vec<String> = builtin_schemas()?.into_iter().map(|s| s.entity).collect();
        names.sort();
        assert_eq!(names, vec!["clickstream", "customer", "product", "transaction"]);
        Ok(())
    }

    #[test]
    fn test_load_dir_recurses_and_skips_other_files() -> Result<()> {
        let dir = tempdir()?;
        fs::create_dir_all(dir.path().join("sales"))?;
        fs::write(
            dir.path().join("sales/orders.yaml"),
            "entities:\n  - entity: orders\n    fields:\n      - name: order_id\n        type: string\n        required: true\n",
        )?;
        fs::write(dir.path().join("README.md"), "# not a schema")?;

        let schemas = load_schemas_dir(dir.path())?;
        assert_eq!(schemas.len(), 1);
        assert_eq!(schemas[0].entity, "orders");
        assert!(schemas[0].fields[0].required);
        Ok(())
    }

    #[test]
    fn test_broken_yaml_is_a_config_error() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("bad.yml"), "entities: [ {")?;
        let res = load_schemas_dir(dir.path());
        assert!(matches!(res, Err(InfrastructureError::ConfigError(_))));
        Ok(())
    }

    #[test]
    fn test_validator_from_dir() -> Result<()> {
        let dir = tempdir()?;
        fs::write(
            dir.path().join("orders.yml"),
            "entities:\n  - entity: orders\n    fields:\n      - name: order_id\n        required: true\n",
        )?;
        let validator = SchemaValidator::from_dir(dir.path())?;
        assert_eq!(validator.available_entities(), vec!["orders"]);

        fs::write(
            dir.path().join("dupe.yml"),
            "entities:\n  - entity: orders\n",
        )?;
        assert!(matches!(
            SchemaValidator::from_dir(dir.path()),
            Err(GateError::Domain(_))
        ));
        Ok(())
    }

    #[test]
    fn test_missing_dir_is_not_found() {
        let res = load_schemas_dir(Path::new("/definitely/not/here"));
        assert!(matches!(res, Err(InfrastructureError::ConfigNotFound(_))));
    }
}
