//! Canonical encoding of schemas to JSON.
//!
//! Members of every schema object are written in strict lexicographic
//! order, independent of how the schema was built. Default-valued members
//! (false flags, generic formats, absent options) are left out.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::context::{
    AdditionalProperties, ArrayContext, Bound, ExternalDocs, NumericContext, ObjectContext,
    SharedContext, StringContext,
};
use crate::decode::child_path;
use crate::error::SchemaError;
use crate::format::SchemaFormat;
use crate::schema::Schema;

/// Output options for [`to_json_string`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodeOptions {
    pub pretty: bool,
}

impl EncodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

/// Members of one schema object, kept sorted by key.
type Members = BTreeMap<&'static str, Value>;

/// Encode a schema to a JSON object.
///
/// JSON has no infinity or NaN: a non-finite number bound is written as
/// `null`, which does not decode. [`to_json_string`] and the `Serialize`
/// impl reject such schemas instead.
pub fn encode(schema: &Schema) -> Value {
    let mut members = Members::new();

    match schema {
        Schema::Boolean(ctx) => {
            encode_shared(ctx, &mut members);
        }
        Schema::Object(ctx, object) => {
            encode_shared(ctx, &mut members);
            encode_object(object, &mut members);
        }
        Schema::Array(ctx, array) => {
            encode_shared(ctx, &mut members);
            encode_array(array, &mut members);
        }
        Schema::Number(ctx, number) => {
            encode_shared(ctx, &mut members);
            encode_numeric(number, &mut members);
        }
        Schema::Integer(ctx, integer) => {
            encode_shared(ctx, &mut members);
            encode_numeric(integer, &mut members);
        }
        Schema::String(ctx, string) => {
            encode_shared(ctx, &mut members);
            encode_string(string, &mut members);
        }
        Schema::AllOf(schemas) => {
            members.insert("allOf", encode_list(schemas));
        }
        Schema::OneOf(schemas) => {
            members.insert("oneOf", encode_list(schemas));
        }
        Schema::AnyOf(schemas) => {
            members.insert("anyOf", encode_list(schemas));
        }
        Schema::Not(schema) => {
            members.insert("not", encode(schema));
        }
        Schema::Reference(reference) => {
            members.insert("$ref", Value::String(reference.pointer()));
        }
        Schema::Undefined { description } => {
            if let Some(description) = description {
                members.insert("description", Value::String(description.clone()));
            }
        }
    }

    tracing::trace!(kind = schema.kind_name(), members = members.len(), "encoded schema");
    into_object(members)
}

/// Encode a schema to JSON text.
///
/// # Errors
///
/// Returns `SchemaError::ConstraintViolation` if a number bound is infinite
/// or NaN, or `SchemaError::InvalidJson` if serialization fails.
pub fn to_json_string(schema: &Schema, options: &EncodeOptions) -> Result<String, SchemaError> {
    check_finite(schema, "")?;
    let value = encode(schema);
    if options.pretty {
        serde_json::to_string_pretty(&value)
    } else {
        serde_json::to_string(&value)
    }
    .map_err(|source| SchemaError::InvalidJson { source })
}

impl Serialize for Schema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        check_finite(self, "").map_err(<S::Error as serde::ser::Error>::custom)?;
        encode(self).serialize(serializer)
    }
}

// --- Internal implementation ---

/// Fail on the first `number` constraint that JSON cannot represent.
fn check_finite(schema: &Schema, path: &str) -> Result<(), SchemaError> {
    match schema {
        Schema::Number(_, number) => {
            let values = [
                ("multipleOf", number.multiple_of),
                ("maximum", number.maximum.map(|bound| bound.value)),
                ("minimum", number.minimum.map(|bound| bound.value)),
            ];
            for (key, value) in values {
                if value.is_some_and(|value| !value.is_finite()) {
                    return Err(SchemaError::violation(
                        &child_path(path, key),
                        "number is not finite",
                    ));
                }
            }
            Ok(())
        }
        Schema::Object(_, object) => {
            let properties_path = child_path(path, "properties");
            for (name, property) in object.properties.iter() {
                check_finite(property, &child_path(&properties_path, name))?;
            }
            match &object.additional_properties {
                Some(AdditionalProperties::Schema(extra)) => {
                    check_finite(extra, &child_path(path, "additionalProperties"))
                }
                _ => Ok(()),
            }
        }
        Schema::Array(_, array) => match &array.items {
            Some(items) => check_finite(items, &child_path(path, "items")),
            None => Ok(()),
        },
        Schema::AllOf(schemas) => check_all_finite(schemas, &child_path(path, "allOf")),
        Schema::OneOf(schemas) => check_all_finite(schemas, &child_path(path, "oneOf")),
        Schema::AnyOf(schemas) => check_all_finite(schemas, &child_path(path, "anyOf")),
        Schema::Not(schema) => check_finite(schema, &child_path(path, "not")),
        _ => Ok(()),
    }
}

fn check_all_finite(schemas: &[Schema], path: &str) -> Result<(), SchemaError> {
    schemas
        .iter()
        .enumerate()
        .try_for_each(|(index, schema)| {
            check_finite(schema, &child_path(path, &index.to_string()))
        })
}

fn into_object(members: Members) -> Value {
    Value::Object(
        members
            .into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect::<Map<String, Value>>(),
    )
}

fn encode_list(schemas: &[Schema]) -> Value {
    Value::Array(schemas.iter().map(encode).collect())
}

fn encode_shared<F: SchemaFormat>(ctx: &SharedContext<F>, members: &mut Members) {
    members.insert("type", Value::String(F::JSON_TYPE.as_str().to_string()));

    if let Some(format) = ctx.format.raw() {
        members.insert("format", Value::String(format.to_string()));
    }
    if ctx.nullable {
        members.insert("nullable", Value::Bool(true));
    }
    if ctx.permission.read_only() {
        members.insert("readOnly", Value::Bool(true));
    }
    if ctx.permission.write_only() {
        members.insert("writeOnly", Value::Bool(true));
    }
    if ctx.deprecated {
        members.insert("deprecated", Value::Bool(true));
    }
    if let Some(title) = &ctx.title {
        members.insert("title", Value::String(title.clone()));
    }
    if let Some(description) = &ctx.description {
        members.insert("description", Value::String(description.clone()));
    }
    if let Some(docs) = &ctx.external_docs {
        members.insert("externalDocs", encode_external_docs(docs));
    }
    if let Some(values) = &ctx.allowed_values {
        members.insert("enum", Value::Array(values.clone()));
    }
    if let Some(example) = &ctx.example {
        members.insert("example", Value::String(example.clone()));
    }
}

fn encode_external_docs(docs: &ExternalDocs) -> Value {
    let mut members = Members::new();
    members.insert("url", Value::String(docs.url.clone()));
    if let Some(description) = &docs.description {
        members.insert("description", Value::String(description.clone()));
    }
    into_object(members)
}

fn encode_object(object: &ObjectContext, members: &mut Members) {
    if !object.properties.is_empty() {
        // Property names keep insertion order; only schema members are sorted.
        let properties: Map<String, Value> = object
            .properties
            .iter()
            .map(|(name, schema)| (name.to_string(), encode(schema)))
            .collect();
        members.insert("properties", Value::Object(properties));
    }

    let required = object.required_properties();
    if !required.is_empty() {
        members.insert(
            "required",
            Value::Array(
                required
                    .into_iter()
                    .map(|name| Value::String(name.to_string()))
                    .collect(),
            ),
        );
    }

    match &object.additional_properties {
        Some(AdditionalProperties::Allowed(allowed)) => {
            members.insert("additionalProperties", Value::Bool(*allowed));
        }
        Some(AdditionalProperties::Schema(schema)) => {
            members.insert("additionalProperties", encode(schema));
        }
        None => {}
    }

    if let Some(max) = object.max_properties {
        members.insert("maxProperties", Value::from(max));
    }
    if object.explicit_min_properties() > 0 {
        members.insert("minProperties", Value::from(object.explicit_min_properties()));
    }
}

fn encode_array(array: &ArrayContext, members: &mut Members) {
    if let Some(items) = &array.items {
        members.insert("items", encode(items));
    }
    if array.unique_items {
        members.insert("uniqueItems", Value::Bool(true));
    }
    if let Some(max) = array.max_items {
        members.insert("maxItems", Value::from(max));
    }
    if let Some(min) = array.min_items {
        members.insert("minItems", Value::from(min));
    }
}

fn encode_numeric<T>(numeric: &NumericContext<T>, members: &mut Members)
where
    T: Copy + Into<NumericValue>,
{
    if let Some(multiple_of) = numeric.multiple_of {
        members.insert("multipleOf", multiple_of.into().0);
    }
    encode_bound(numeric.maximum, "maximum", "exclusiveMaximum", members);
    encode_bound(numeric.minimum, "minimum", "exclusiveMinimum", members);
}

fn encode_bound<T>(
    bound: Option<Bound<T>>,
    key: &'static str,
    exclusive_key: &'static str,
    members: &mut Members,
) where
    T: Into<NumericValue>,
{
    if let Some(bound) = bound {
        members.insert(key, bound.value.into().0);
        if bound.exclusive {
            members.insert(exclusive_key, Value::Bool(true));
        }
    }
}

/// A numeric constraint value converted for the wire.
struct NumericValue(Value);

impl From<f64> for NumericValue {
    fn from(value: f64) -> Self {
        NumericValue(Value::from(value))
    }
}

impl From<i64> for NumericValue {
    fn from(value: i64) -> Self {
        NumericValue(Value::from(value))
    }
}

fn encode_string(string: &StringContext, members: &mut Members) {
    if let Some(max) = string.max_length {
        members.insert("maxLength", Value::from(max));
    }
    if let Some(min) = string.min_length {
        members.insert("minLength", Value::from(min));
    }
    if let Some(pattern) = &string.pattern {
        members.insert("pattern", Value::String(pattern.clone()));
    }
}
