//! Schema loading from files and strings.

use std::path::Path;

use serde_json::Value;

use crate::decode::decode;
use crate::error::SchemaError;
use crate::schema::Schema;

/// Load and decode a schema from a file path.
///
/// # Errors
///
/// Returns `SchemaError::FileNotFound` if the file doesn't exist,
/// `SchemaError::InvalidJson` if the file isn't valid JSON, or any error
/// [`decode`] returns.
pub fn load_schema(path: &Path) -> Result<Schema, SchemaError> {
    let value = load_json(path)?;
    tracing::debug!(path = %path.display(), "decoding schema file");
    decode(&value)
}

/// Load and decode a schema from a JSON string.
///
/// # Errors
///
/// Returns `SchemaError::InvalidJson` if the string isn't valid JSON, or any
/// error [`decode`] returns.
pub fn load_schema_str(content: &str) -> Result<Schema, SchemaError> {
    crate::decode::from_json_str(content)
}

/// Read a file as raw JSON without decoding it.
///
/// # Errors
///
/// Returns `SchemaError::FileNotFound` if the file doesn't exist,
/// or `SchemaError::InvalidJson` if the file isn't valid JSON.
pub fn load_json(path: &Path) -> Result<Value, SchemaError> {
    if !path.exists() {
        return Err(SchemaError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| SchemaError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| SchemaError::InvalidJson { source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn missing_file() {
        let err = load_schema(&PathBuf::from("/nonexistent/pet.json")).unwrap_err();
        assert!(matches!(err, SchemaError::FileNotFound { .. }));
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn load_from_str() {
        let schema = load_schema_str(r#"{"type":"array","items":{"type":"string"}}"#).unwrap();
        assert_eq!(schema, Schema::array_of(Schema::string()));
    }

    #[test]
    fn load_from_str_rejects_bad_json() {
        let err = load_schema_str("{").unwrap_err();
        assert!(matches!(err, SchemaError::InvalidJson { .. }));
        assert_eq!(err.exit_code(), 2);
    }
}
