//! The schema value model.
//!
//! A [`Schema`] is one of six concrete kinds (each carrying a
//! [`SharedContext`] plus, for most, a structural context), one of four
//! composite kinds, a reference, or the typeless `undefined` kind.
//!
//! Composite kinds, references and `undefined` carry no shared context:
//! they are always required, never nullable, and report no title,
//! permission, allowed values or example. `undefined` alone may carry a
//! description.

use serde_json::Value;

use crate::context::{
    ArrayContext, ExternalDocs, IntegerContext, NumberContext, ObjectContext, Permission,
    Properties, SharedContext, StringContext,
};
use crate::format::{
    ArrayFormat, BooleanFormat, IntegerFormat, JsonTypeFormat, NumberFormat, ObjectFormat,
    StringFormat,
};
use crate::reference::{ComponentsPath, Reference};

/// An OpenAPI schema object.
#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    Boolean(SharedContext<BooleanFormat>),
    Object(SharedContext<ObjectFormat>, ObjectContext),
    Array(SharedContext<ArrayFormat>, ArrayContext),
    Number(SharedContext<NumberFormat>, NumberContext),
    Integer(SharedContext<IntegerFormat>, IntegerContext),
    String(SharedContext<StringFormat>, StringContext),
    AllOf(Vec<Schema>),
    OneOf(Vec<Schema>),
    AnyOf(Vec<Schema>),
    Not(Box<Schema>),
    Reference(Reference),
    Undefined { description: Option<String> },
}

/// Run `$body` with `$ctx` bound to the shared context of a concrete schema,
/// or evaluate `$fallback` for every other kind.
macro_rules! on_shared {
    ($schema:expr, $ctx:ident => $body:expr, _ => $fallback:expr) => {
        match $schema {
            Schema::Boolean($ctx) => $body,
            Schema::Object($ctx, _) => $body,
            Schema::Array($ctx, _) => $body,
            Schema::Number($ctx, _) => $body,
            Schema::Integer($ctx, _) => $body,
            Schema::String($ctx, _) => $body,
            _ => $fallback,
        }
    };
}
pub(crate) use on_shared;

// --- Constructors ---

impl Schema {
    /// A required boolean schema.
    pub fn boolean() -> Self {
        Schema::Boolean(SharedContext::new())
    }

    /// A required string schema.
    pub fn string() -> Self {
        Schema::String(SharedContext::new(), StringContext::default())
    }

    /// A required string schema with the given format.
    pub fn string_format(format: StringFormat) -> Self {
        Schema::String(
            SharedContext::new().with_format(format),
            StringContext::default(),
        )
    }

    /// A required number schema.
    pub fn number() -> Self {
        Schema::Number(SharedContext::new(), NumberContext::default())
    }

    /// A required integer schema.
    pub fn integer() -> Self {
        Schema::Integer(SharedContext::new(), IntegerContext::default())
    }

    /// A required object schema with the given structure.
    pub fn object(context: ObjectContext) -> Self {
        Schema::Object(SharedContext::new(), context)
    }

    /// A required array schema with the given structure.
    pub fn array(context: ArrayContext) -> Self {
        Schema::Array(SharedContext::new(), context)
    }

    /// A required array schema whose elements match `items`.
    pub fn array_of(items: Schema) -> Self {
        Self::array(ArrayContext::new().with_items(items))
    }

    pub fn all_of(schemas: Vec<Schema>) -> Self {
        Schema::AllOf(schemas)
    }

    pub fn one_of(schemas: Vec<Schema>) -> Self {
        Schema::OneOf(schemas)
    }

    pub fn any_of(schemas: Vec<Schema>) -> Self {
        Schema::AnyOf(schemas)
    }

    pub fn not(schema: Schema) -> Self {
        Schema::Not(Box::new(schema))
    }

    pub fn reference(reference: Reference) -> Self {
        Schema::Reference(reference)
    }

    /// A reference to `#/components/<category>/<name>`.
    pub fn component_ref(category: ComponentsPath, name: impl Into<String>) -> Self {
        Schema::Reference(Reference::component(category, name))
    }

    /// The empty schema `{}`.
    pub fn undefined() -> Self {
        Schema::Undefined { description: None }
    }

    /// The schema `{"description": ...}`.
    pub fn undefined_with_description(description: impl Into<String>) -> Self {
        Schema::Undefined {
            description: Some(description.into()),
        }
    }
}

// --- Queries ---

impl Schema {
    /// Short name of this schema's kind, as used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Schema::Boolean(_) => "boolean",
            Schema::Object(..) => "object",
            Schema::Array(..) => "array",
            Schema::Number(..) => "number",
            Schema::Integer(..) => "integer",
            Schema::String(..) => "string",
            Schema::AllOf(_) => "allOf",
            Schema::OneOf(_) => "oneOf",
            Schema::AnyOf(_) => "anyOf",
            Schema::Not(_) => "not",
            Schema::Reference(_) => "reference",
            Schema::Undefined { .. } => "undefined",
        }
    }

    /// `(type, format)` of a concrete schema; `None` for every other kind.
    pub fn json_type_format(&self) -> Option<JsonTypeFormat> {
        match self {
            Schema::Boolean(ctx) => Some(JsonTypeFormat::Boolean(ctx.format.clone())),
            Schema::Object(ctx, _) => Some(JsonTypeFormat::Object(ctx.format.clone())),
            Schema::Array(ctx, _) => Some(JsonTypeFormat::Array(ctx.format.clone())),
            Schema::Number(ctx, _) => Some(JsonTypeFormat::Number(ctx.format.clone())),
            Schema::Integer(ctx, _) => Some(JsonTypeFormat::Integer(ctx.format.clone())),
            Schema::String(ctx, _) => Some(JsonTypeFormat::String(ctx.format.clone())),
            _ => None,
        }
    }

    /// Whether this is one of the six kinds with a shared context.
    pub fn is_concrete(&self) -> bool {
        on_shared!(self, _ctx => true, _ => false)
    }

    /// Always `true` for composite, reference and undefined schemas.
    pub fn required(&self) -> bool {
        on_shared!(self, ctx => ctx.required, _ => true)
    }

    pub fn nullable(&self) -> bool {
        on_shared!(self, ctx => ctx.nullable, _ => false)
    }

    pub fn permission(&self) -> Permission {
        on_shared!(self, ctx => ctx.permission, _ => Permission::ReadWrite)
    }

    pub fn read_only(&self) -> bool {
        self.permission().read_only()
    }

    pub fn write_only(&self) -> bool {
        self.permission().write_only()
    }

    pub fn deprecated(&self) -> bool {
        on_shared!(self, ctx => ctx.deprecated, _ => false)
    }

    pub fn title(&self) -> Option<&str> {
        on_shared!(self, ctx => ctx.title.as_deref(), _ => None)
    }

    /// The description of a concrete schema or of `undefined`.
    pub fn description(&self) -> Option<&str> {
        match self {
            Schema::Undefined { description } => description.as_deref(),
            other => on_shared!(other, ctx => ctx.description.as_deref(), _ => None),
        }
    }

    pub fn external_docs(&self) -> Option<&ExternalDocs> {
        on_shared!(self, ctx => ctx.external_docs.as_ref(), _ => None)
    }

    /// The `enum` constraint.
    pub fn allowed_values(&self) -> Option<&[Value]> {
        on_shared!(self, ctx => ctx.allowed_values.as_deref(), _ => None)
    }

    /// Rendered example JSON text.
    pub fn example(&self) -> Option<&str> {
        on_shared!(self, ctx => ctx.example.as_deref(), _ => None)
    }

    /// Whether `value` could appear in this schema's `enum`: it must match
    /// the canonical kind of the schema's type, or be `null` on a nullable
    /// schema. Always `false` for kinds without a type.
    pub fn admits_allowed_value(&self, value: &Value) -> bool {
        match self.json_type_format() {
            Some(type_format) => {
                type_format.canonical_kind().admits(value) || (value.is_null() && self.nullable())
            }
            None => false,
        }
    }

    /// Property schemas of an object schema.
    pub fn properties(&self) -> Option<&Properties> {
        match self {
            Schema::Object(_, object) => Some(&object.properties),
            _ => None,
        }
    }
}
