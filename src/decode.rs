//! Strict decoding of JSON into schemas.
//!
//! The kind of a schema object is chosen by its members, checked in order:
//!
//! 1. `$ref` - a reference; no other member may be present
//! 2. `allOf` / `oneOf` / `anyOf` - a composite of the listed schemas
//! 3. `not` - the negation of the nested schema
//! 4. `type` - the concrete kind named by its value
//! 5. otherwise `undefined`, which accepts at most a `description`
//!
//! Any member a kind does not recognize fails the whole decode, so a typo
//! such as `oneOff` is reported rather than read as an empty schema.
//! Errors carry a JSON pointer to the offending node.
//!
//! `$ref` values decode as external references, including ones that point
//! into `#/components`.

use std::collections::HashSet;

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::context::{
    AdditionalProperties, ArrayContext, Bound, ExternalDocs, NumericContext, ObjectContext,
    Permission, Properties, SharedContext, StringContext,
};
use crate::error::SchemaError;
use crate::format::{JsonType, SchemaFormat};
use crate::reference::Reference;
use crate::schema::Schema;
use crate::transform::{ExampleRenderer, JsonRenderer};

/// Members every concrete kind accepts besides `type`.
const SHARED_KEYS: &[&str] = &[
    "deprecated",
    "description",
    "enum",
    "example",
    "externalDocs",
    "format",
    "nullable",
    "readOnly",
    "title",
    "writeOnly",
];

/// Discriminators of the list-valued composite kinds, in priority order.
const COMPOSITE_KEYS: &[&str] = &["allOf", "oneOf", "anyOf"];

/// Returns the JSON type name for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Decode a schema from a JSON value.
///
/// # Errors
///
/// Returns `SchemaError::StructuralMismatch` if no schema kind accepts the
/// value, or `SchemaError::ConstraintViolation` if it sets both `readOnly`
/// and `writeOnly`.
pub fn decode(value: &Value) -> Result<Schema, SchemaError> {
    decode_at(value, "").map_err(|err| {
        tracing::debug!(error = %err, "schema decode failed");
        err
    })
}

/// Decode a schema from JSON text.
///
/// # Errors
///
/// Returns `SchemaError::InvalidJson` if the text isn't valid JSON, or any
/// error [`decode`] returns.
pub fn from_json_str(text: &str) -> Result<Schema, SchemaError> {
    let value: Value =
        serde_json::from_str(text).map_err(|source| SchemaError::InvalidJson { source })?;
    decode(&value)
}

impl<'de> Deserialize<'de> for Schema {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        decode(&value).map_err(serde::de::Error::custom)
    }
}

// --- Internal implementation ---

fn decode_at(value: &Value, path: &str) -> Result<Schema, SchemaError> {
    let Value::Object(map) = value else {
        return Err(SchemaError::mismatch(
            path,
            format!("expected a schema object, got {}", json_type_name(value)),
        ));
    };
    let members = Members { map, path };

    if map.contains_key("$ref") {
        return decode_reference(&members);
    }
    for &key in COMPOSITE_KEYS {
        if map.contains_key(key) {
            return decode_composite(&members, key);
        }
    }
    if map.contains_key("not") {
        members.expect_only(&["not"], "not")?;
        let nested = decode_at(&map["not"], &child_path(path, "not"))?;
        return Ok(Schema::not(nested));
    }
    if let Some(type_value) = map.get("type") {
        let json_type = match type_value {
            Value::String(name) => JsonType::parse(name).ok_or_else(|| {
                SchemaError::mismatch(
                    &child_path(path, "type"),
                    format!("unsupported type \"{name}\""),
                )
            })?,
            other => {
                return Err(SchemaError::mismatch(
                    &child_path(path, "type"),
                    format!("expected string, got {}", json_type_name(other)),
                ))
            }
        };
        tracing::debug!(path, %json_type, "decoding typed schema");
        return decode_typed(&members, json_type);
    }

    members.expect_only(&["description"], "untyped")?;
    Ok(Schema::Undefined {
        description: members.string("description")?,
    })
}

fn decode_reference(members: &Members<'_>) -> Result<Schema, SchemaError> {
    members.expect_only(&["$ref"], "reference")?;
    let pointer = members.string("$ref")?.unwrap_or_default();
    Ok(Schema::Reference(Reference::External(pointer)))
}

fn decode_composite(members: &Members<'_>, key: &'static str) -> Result<Schema, SchemaError> {
    members.expect_only(&[key], key)?;
    let list_path = child_path(members.path, key);

    let Value::Array(items) = &members.map[key] else {
        return Err(SchemaError::mismatch(
            &list_path,
            format!(
                "expected array of schemas, got {}",
                json_type_name(&members.map[key])
            ),
        ));
    };
    let schemas = items
        .iter()
        .enumerate()
        .map(|(index, item)| decode_at(item, &child_path(&list_path, &index.to_string())))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(match key {
        "allOf" => Schema::AllOf(schemas),
        "oneOf" => Schema::OneOf(schemas),
        _ => Schema::AnyOf(schemas),
    })
}

fn decode_typed(members: &Members<'_>, json_type: JsonType) -> Result<Schema, SchemaError> {
    let structural = structural_keys(json_type);
    let allowed: Vec<&str> = SHARED_KEYS
        .iter()
        .chain(structural)
        .copied()
        .chain(std::iter::once("type"))
        .collect();
    members.expect_only(&allowed, json_type.as_str())?;

    Ok(match json_type {
        JsonType::Boolean => Schema::Boolean(decode_shared(members)?),
        JsonType::Object => Schema::Object(decode_shared(members)?, decode_object(members)?),
        JsonType::Array => Schema::Array(decode_shared(members)?, decode_array(members)?),
        JsonType::Number => Schema::Number(
            decode_shared(members)?,
            decode_numeric(members, |m, key| m.float(key))?,
        ),
        JsonType::Integer => Schema::Integer(
            decode_shared(members)?,
            decode_numeric(members, |m, key| m.integer(key))?,
        ),
        JsonType::String => Schema::String(decode_shared(members)?, decode_string(members)?),
    })
}

/// Structural members accepted for a type, besides the shared ones.
fn structural_keys(json_type: JsonType) -> &'static [&'static str] {
    match json_type {
        JsonType::Boolean => &[],
        JsonType::Object => &[
            "additionalProperties",
            "maxProperties",
            "minProperties",
            "properties",
            "required",
        ],
        JsonType::Array => &["items", "maxItems", "minItems", "uniqueItems"],
        JsonType::Number | JsonType::Integer => &[
            "exclusiveMaximum",
            "exclusiveMinimum",
            "maximum",
            "minimum",
            "multipleOf",
        ],
        JsonType::String => &["maxLength", "minLength", "pattern"],
    }
}

fn decode_shared<F: SchemaFormat>(members: &Members<'_>) -> Result<SharedContext<F>, SchemaError> {
    let read_only = members.boolean("readOnly")?.unwrap_or(false);
    let write_only = members.boolean("writeOnly")?.unwrap_or(false);
    let permission = Permission::from_flags(read_only, write_only).map_err(|_| {
        SchemaError::violation(members.path, "readOnly and writeOnly are mutually exclusive")
    })?;

    let format = members
        .string("format")?
        .map(|raw| F::from_raw(&raw))
        .unwrap_or_default();

    let allowed_values = match members.map.get("enum") {
        None => None,
        Some(Value::Array(values)) => Some(values.clone()),
        Some(other) => {
            return Err(members.wrong_type("enum", "array", other));
        }
    };

    let example = match members.map.get("example") {
        None => None,
        Some(Value::String(text)) => Some(text.clone()),
        Some(other) => Some(
            JsonRenderer::new()
                .render(other)
                .map_err(|source| SchemaError::Render { source })?,
        ),
    };

    Ok(SharedContext {
        format,
        required: true,
        nullable: members.boolean("nullable")?.unwrap_or(false),
        permission,
        deprecated: members.boolean("deprecated")?.unwrap_or(false),
        title: members.string("title")?,
        description: members.string("description")?,
        external_docs: decode_external_docs(members)?,
        allowed_values,
        example,
    })
}

fn decode_external_docs(members: &Members<'_>) -> Result<Option<ExternalDocs>, SchemaError> {
    let Some(value) = members.map.get("externalDocs") else {
        return Ok(None);
    };
    let Value::Object(map) = value else {
        return Err(members.wrong_type("externalDocs", "object", value));
    };

    let path = child_path(members.path, "externalDocs");
    let docs = Members { map, path: &path };
    docs.expect_only(&["description", "url"], "externalDocs")?;

    let url = docs
        .string("url")?
        .ok_or_else(|| SchemaError::mismatch(&path, "missing member \"url\""))?;
    Ok(Some(ExternalDocs {
        url,
        description: docs.string("description")?,
    }))
}

fn decode_object(members: &Members<'_>) -> Result<ObjectContext, SchemaError> {
    let required: Vec<String> = match members.map.get("required") {
        None => Vec::new(),
        Some(Value::Array(names)) => names
            .iter()
            .enumerate()
            .map(|(index, name)| match name {
                Value::String(name) => Ok(name.clone()),
                other => Err(SchemaError::mismatch(
                    &child_path(&child_path(members.path, "required"), &index.to_string()),
                    format!("expected string, got {}", json_type_name(other)),
                )),
            })
            .collect::<Result<_, _>>()?,
        Some(other) => return Err(members.wrong_type("required", "array", other)),
    };

    let required_set: HashSet<&str> = required.iter().map(String::as_str).collect();
    let mut properties = Properties::new();
    match members.map.get("properties") {
        None => {}
        Some(Value::Object(map)) => {
            let properties_path = child_path(members.path, "properties");
            for (name, value) in map {
                let schema = decode_at(value, &child_path(&properties_path, name))?;
                let schema = if required_set.contains(name.as_str()) {
                    schema
                } else {
                    schema.to_optional()
                };
                properties.insert(name.clone(), schema);
            }
        }
        Some(other) => return Err(members.wrong_type("properties", "object", other)),
    }

    // Required names without a declared property keep their requirement
    // as an untyped property.
    for name in &required {
        if !properties.contains_key(name) {
            properties.insert(name.clone(), Schema::undefined());
        }
    }

    let additional_properties = match members.map.get("additionalProperties") {
        None => None,
        Some(Value::Bool(allowed)) => Some(AdditionalProperties::Allowed(*allowed)),
        Some(value @ Value::Object(_)) => Some(AdditionalProperties::Schema(Box::new(decode_at(
            value,
            &child_path(members.path, "additionalProperties"),
        )?))),
        Some(other) => {
            return Err(members.wrong_type("additionalProperties", "boolean or object", other))
        }
    };

    let mut object = ObjectContext::new(properties);
    object.additional_properties = additional_properties;
    object.max_properties = members.unsigned("maxProperties")?;
    if let Some(min) = members.unsigned("minProperties")? {
        object = object.with_min_properties(min);
    }
    Ok(object)
}

fn decode_array(members: &Members<'_>) -> Result<ArrayContext, SchemaError> {
    let items = match members.map.get("items") {
        None => None,
        Some(value) => Some(Box::new(decode_at(
            value,
            &child_path(members.path, "items"),
        )?)),
    };

    Ok(ArrayContext {
        items,
        unique_items: members.boolean("uniqueItems")?.unwrap_or(false),
        max_items: members.unsigned("maxItems")?,
        min_items: members.unsigned("minItems")?,
    })
}

fn decode_numeric<T>(
    members: &Members<'_>,
    read: fn(&Members<'_>, &str) -> Result<Option<T>, SchemaError>,
) -> Result<NumericContext<T>, SchemaError> {
    Ok(NumericContext {
        multiple_of: read(members, "multipleOf")?,
        maximum: decode_bound(members, read, "maximum", "exclusiveMaximum")?,
        minimum: decode_bound(members, read, "minimum", "exclusiveMinimum")?,
    })
}

fn decode_bound<T>(
    members: &Members<'_>,
    read: fn(&Members<'_>, &str) -> Result<Option<T>, SchemaError>,
    key: &str,
    exclusive_key: &str,
) -> Result<Option<Bound<T>>, SchemaError> {
    let value = read(members, key)?;
    let exclusive = members.boolean(exclusive_key)?.unwrap_or(false);

    match value {
        Some(value) => Ok(Some(Bound { value, exclusive })),
        None if exclusive => Err(SchemaError::mismatch(
            &child_path(members.path, exclusive_key),
            format!("{exclusive_key} requires {key}"),
        )),
        None => Ok(None),
    }
}

fn decode_string(members: &Members<'_>) -> Result<StringContext, SchemaError> {
    Ok(StringContext {
        max_length: members.unsigned("maxLength")?,
        min_length: members.unsigned("minLength")?,
        pattern: members.string("pattern")?,
    })
}

/// Append one reference token to a JSON pointer, escaping `~` and `/`.
pub(crate) fn child_path(path: &str, token: &str) -> String {
    format!("{}/{}", path, token.replace('~', "~0").replace('/', "~1"))
}

/// Typed access to the members of one schema object.
struct Members<'a> {
    map: &'a Map<String, Value>,
    path: &'a str,
}

impl Members<'_> {
    /// Fail on the first member not in `allowed`.
    fn expect_only(&self, allowed: &[&str], kind: &str) -> Result<(), SchemaError> {
        match self.map.keys().find(|key| !allowed.contains(&key.as_str())) {
            Some(key) => Err(SchemaError::mismatch(
                &child_path(self.path, key),
                format!("unrecognized member \"{key}\" for {kind} schema"),
            )),
            None => Ok(()),
        }
    }

    fn wrong_type(&self, key: &str, expected: &str, actual: &Value) -> SchemaError {
        SchemaError::mismatch(
            &child_path(self.path, key),
            format!("expected {expected}, got {}", json_type_name(actual)),
        )
    }

    fn string(&self, key: &str) -> Result<Option<String>, SchemaError> {
        match self.map.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(self.wrong_type(key, "string", other)),
        }
    }

    fn boolean(&self, key: &str) -> Result<Option<bool>, SchemaError> {
        match self.map.get(key) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(self.wrong_type(key, "boolean", other)),
        }
    }

    fn unsigned(&self, key: &str) -> Result<Option<u64>, SchemaError> {
        match self.map.get(key) {
            None => Ok(None),
            Some(value) => value
                .as_u64()
                .or_else(|| {
                    integral(value)
                        .filter(|f| (0.0..U64_LIMIT).contains(f))
                        .map(|f| f as u64)
                })
                .map(Some)
                .ok_or_else(|| self.wrong_type(key, "non-negative integer", value)),
        }
    }

    fn float(&self, key: &str) -> Result<Option<f64>, SchemaError> {
        match self.map.get(key) {
            None => Ok(None),
            Some(value) => value
                .as_f64()
                .map(Some)
                .ok_or_else(|| self.wrong_type(key, "number", value)),
        }
    }

    fn integer(&self, key: &str) -> Result<Option<i64>, SchemaError> {
        match self.map.get(key) {
            None => Ok(None),
            Some(value) => value
                .as_i64()
                .or_else(|| {
                    integral(value)
                        .filter(|f| (-I64_LIMIT..I64_LIMIT).contains(f))
                        .map(|f| f as i64)
                })
                .map(Some)
                .ok_or_else(|| self.wrong_type(key, "integer", value)),
        }
    }
}

/// 2^64: the first float past `u64::MAX`.
const U64_LIMIT: f64 = 18_446_744_073_709_551_616.0;
/// 2^63: `-I64_LIMIT` is `i64::MIN`, `I64_LIMIT` is one past `i64::MAX`.
const I64_LIMIT: f64 = 9_223_372_036_854_775_808.0;

/// The value of a float-encoded JSON number with no fractional part.
fn integral(value: &Value) -> Option<f64> {
    let Value::Number(n) = value else {
        return None;
    };
    if n.is_f64() {
        n.as_f64().filter(|f| f.is_finite() && f.fract() == 0.0)
    } else {
        None
    }
}
