//! OpenAPI Schema Objects
//!
//! A value model and strict JSON codec for the subset of JSON Schema used by
//! OpenAPI 3.0 schema objects.
//!
//! Schemas are immutable values. Build them with constructors and the
//! transformation methods, which return modified copies, then [`encode`] them
//! to JSON with canonical (alphabetical) member order, or [`decode`] JSON
//! back into a [`Schema`].
//!
//! # Example
//!
//! ```
//! use oas_schema::{decode, encode, JsonRenderer, ObjectContext, Properties, Schema};
//! use serde_json::json;
//!
//! let pet = Schema::object(ObjectContext::new(Properties::from_iter([
//!     ("name", Schema::string()),
//!     ("tag", Schema::string().to_optional()),
//! ])))
//! .with_example(&json!({"name": "Rex"}), &JsonRenderer::new())
//! .unwrap();
//!
//! let encoded = encode(&pet);
//! assert_eq!(encoded["required"], json!(["name"]));
//! assert_eq!(encoded["example"], json!(r#"{"name":"Rex"}"#));
//!
//! assert_eq!(decode(&encoded).unwrap(), pet);
//! ```
//!
//! # Decoding
//!
//! | Members present | Decodes as |
//! |-----------------|------------|
//! | `$ref` | reference (no other member allowed) |
//! | `allOf` / `oneOf` / `anyOf` | composite |
//! | `not` | negation |
//! | `type` | boolean, object, array, number, integer or string |
//! | nothing, or only `description` | undefined |
//!
//! Unrecognized members are errors, never ignored.

mod context;
mod decode;
mod encode;
mod error;
mod format;
mod loader;
mod reference;
mod schema;
mod transform;

pub use context::{
    AdditionalProperties, ArrayContext, Bound, ExternalDocs, IntegerContext, NumberContext,
    NumericContext, ObjectContext, Permission, Properties, SharedContext, StringContext,
};
pub use decode::{decode, from_json_str, json_type_name};
pub use encode::{encode, to_json_string, EncodeOptions};
pub use error::SchemaError;
pub use format::{
    ArrayFormat, BooleanFormat, CanonicalKind, IntegerFormat, JsonType, JsonTypeFormat,
    NumberFormat, ObjectFormat, SchemaFormat, StringFormat,
};
pub use loader::{load_json, load_schema, load_schema_str};
pub use reference::{ComponentNode, ComponentsPath, Reference};
pub use schema::Schema;
pub use transform::{ExampleRenderer, JsonRenderer};
