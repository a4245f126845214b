//! Functional transformations producing modified copies of a schema.
//!
//! Every operation consumes the schema and returns a new one. On kinds
//! without a shared context (composites, references, `undefined`) the
//! required/nullable/allowed-values operations return the input unchanged,
//! while [`Schema::with_example`] fails.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::SchemaError;
use crate::schema::{on_shared, Schema};

/// Renders an example value to the JSON text stored on a schema.
///
/// The text becomes part of the schema's identity, so a renderer must be
/// deterministic: the same value always yields the same text.
pub trait ExampleRenderer {
    fn render(&self, value: &Value) -> Result<String, serde_json::Error>;
}

impl<F> ExampleRenderer for F
where
    F: Fn(&Value) -> Result<String, serde_json::Error>,
{
    fn render(&self, value: &Value) -> Result<String, serde_json::Error> {
        self(value)
    }
}

/// The default renderer: `serde_json` output, optionally pretty, with
/// object keys sorted unless told otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonRenderer {
    pub pretty: bool,
    pub sort_keys: bool,
}

impl Default for JsonRenderer {
    fn default() -> Self {
        Self {
            pretty: false,
            sort_keys: true,
        }
    }
}

impl JsonRenderer {
    /// Compact output with sorted keys.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Keep object keys in the order the value was built with.
    pub fn sort_keys(mut self, sort_keys: bool) -> Self {
        self.sort_keys = sort_keys;
        self
    }
}

impl ExampleRenderer for JsonRenderer {
    fn render(&self, value: &Value) -> Result<String, serde_json::Error> {
        let sorted;
        let value = if self.sort_keys {
            sorted = sort_keys(value.clone());
            &sorted
        } else {
            value
        };

        if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        }
    }
}

fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(key, child)| (key, sort_keys(child)))
                    .collect::<Map<String, Value>>(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

impl Schema {
    /// Mark as required. No-op on kinds without a shared context.
    pub fn to_required(self) -> Schema {
        self.with_required(true)
    }

    /// Mark as optional. No-op on kinds without a shared context, which
    /// stay required.
    pub fn to_optional(self) -> Schema {
        self.with_required(false)
    }

    fn with_required(mut self, required: bool) -> Schema {
        on_shared!(&mut self, ctx => ctx.required = required, _ => ());
        self
    }

    /// Mark as nullable. No-op on kinds without a shared context.
    pub fn to_nullable(mut self) -> Schema {
        on_shared!(&mut self, ctx => ctx.nullable = true, _ => ());
        self
    }

    /// Attach an `enum` constraint. No-op on kinds without a shared context.
    ///
    /// Element shapes are not checked against the schema's type; see
    /// [`Schema::admits_allowed_value`].
    pub fn with_allowed_values(mut self, values: Vec<Value>) -> Schema {
        on_shared!(&mut self, ctx => ctx.allowed_values = Some(values), _ => ());
        self
    }

    /// Render `example` with `renderer` and attach the text.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::UnsupportedOperation` for composite, reference
    /// and undefined schemas, and `SchemaError::Render` if the value cannot
    /// be serialized.
    pub fn with_example<T, R>(mut self, example: &T, renderer: &R) -> Result<Schema, SchemaError>
    where
        T: Serialize + ?Sized,
        R: ExampleRenderer + ?Sized,
    {
        if !self.is_concrete() {
            return Err(SchemaError::UnsupportedOperation {
                operation: "with_example",
                kind: self.kind_name(),
            });
        }

        let value = serde_json::to_value(example).map_err(|source| SchemaError::Render { source })?;
        let text = renderer
            .render(&value)
            .map_err(|source| SchemaError::Render { source })?;
        tracing::trace!(kind = self.kind_name(), example = %text, "attached example");

        on_shared!(&mut self, ctx => ctx.example = Some(text), _ => ());
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{ObjectContext, Properties};
    use crate::reference::{ComponentsPath, Reference};
    use serde_json::json;

    fn non_concrete() -> Vec<Schema> {
        vec![
            Schema::all_of(vec![Schema::string()]),
            Schema::one_of(vec![Schema::string()]),
            Schema::any_of(vec![Schema::string()]),
            Schema::not(Schema::string()),
            Schema::reference(Reference::component(ComponentsPath::Schemas, "Pet")),
        ]
    }

    #[test]
    fn required_optional_toggle() {
        let schema = Schema::string();
        assert!(!schema.clone().to_optional().required());
        assert!(schema.clone().to_optional().to_required().required());
        assert!(!schema.to_required().to_optional().required());
    }

    #[test]
    fn toggles_are_identity_on_non_concrete() {
        for schema in non_concrete() {
            assert_eq!(schema.clone().to_optional(), schema);
            assert_eq!(schema.clone().to_required(), schema);
            assert_eq!(schema.clone().to_nullable(), schema);
            assert!(schema.clone().to_optional().required());
        }
    }

    #[test]
    fn to_nullable_sets_flag() {
        let schema = Schema::integer().to_nullable();
        assert!(schema.nullable());
        assert!(schema.required());
    }

    #[test]
    fn allowed_values_attach_to_concrete() {
        let schema = Schema::string().with_allowed_values(vec![json!("cat"), json!("dog")]);
        assert_eq!(
            schema.allowed_values(),
            Some(&[json!("cat"), json!("dog")][..])
        );
    }

    #[test]
    fn allowed_values_noop_on_non_concrete() {
        for schema in non_concrete() {
            let result = schema.clone().with_allowed_values(vec![json!("cat")]);
            assert_eq!(result, schema);
            assert_eq!(result.allowed_values(), None);
        }
    }

    #[test]
    fn example_is_rendered_at_attachment() {
        let schema = Schema::object(ObjectContext::new(Properties::from_iter([(
            "name",
            Schema::string(),
        )])))
        .with_example(&json!({"name": "Rex", "age": 3}), &JsonRenderer::new())
        .unwrap();
        assert_eq!(schema.example(), Some(r#"{"age":3,"name":"Rex"}"#));
    }

    #[test]
    fn example_renderer_options() {
        let value = json!({"b": 1, "a": [true]});

        let unsorted = JsonRenderer::new().sort_keys(false).render(&value).unwrap();
        assert_eq!(unsorted, r#"{"b":1,"a":[true]}"#);

        let pretty = JsonRenderer::new().pretty(true).render(&value).unwrap();
        assert_eq!(pretty, "{\n  \"a\": [\n    true\n  ],\n  \"b\": 1\n}");
    }

    #[test]
    fn example_with_closure_renderer() {
        let renderer = |value: &Value| serde_json::to_string_pretty(value);
        let schema = Schema::integer().with_example(&42, &renderer).unwrap();
        assert_eq!(schema.example(), Some("42"));
    }

    #[test]
    fn example_fails_on_non_concrete() {
        for schema in non_concrete() {
            let kind = schema.kind_name();
            let err = schema
                .with_example(&"x", &JsonRenderer::new())
                .unwrap_err();
            assert!(
                matches!(err, SchemaError::UnsupportedOperation { kind: k, .. } if k == kind),
                "unexpected error for {kind}: {err}"
            );
        }
    }

    #[test]
    fn example_fails_on_undefined() {
        let err = Schema::undefined()
            .with_example(&1, &JsonRenderer::new())
            .unwrap_err();
        assert!(matches!(err, SchemaError::UnsupportedOperation { .. }));
    }

    #[test]
    fn transformations_do_not_touch_input() {
        let original = Schema::boolean();
        let copy = original.clone();
        let changed = copy.to_optional().to_nullable();
        assert!(original.required());
        assert!(!original.nullable());
        assert!(!changed.required());
        assert!(changed.nullable());
    }
}
