//! Attribute contexts carried by concrete schemas.
//!
//! `SharedContext` holds the attributes every concrete kind accepts; the
//! per-kind contexts hold structural constraints for objects, arrays,
//! numbers, integers and strings.

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::SchemaError;
use crate::format::SchemaFormat;
use crate::schema::Schema;

/// Read/write access of a property.
///
/// The wire format uses two booleans (`readOnly`, `writeOnly`), but only
/// three combinations are meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Permission {
    #[default]
    ReadWrite,
    ReadOnly,
    WriteOnly,
}

impl Permission {
    /// Build a permission from the wire booleans.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::ConstraintViolation` if both flags are set.
    pub fn from_flags(read_only: bool, write_only: bool) -> Result<Self, SchemaError> {
        match (read_only, write_only) {
            (true, true) => Err(SchemaError::violation(
                "",
                "readOnly and writeOnly are mutually exclusive",
            )),
            (true, false) => Ok(Permission::ReadOnly),
            (false, true) => Ok(Permission::WriteOnly),
            (false, false) => Ok(Permission::ReadWrite),
        }
    }

    pub fn read_only(&self) -> bool {
        matches!(self, Permission::ReadOnly)
    }

    pub fn write_only(&self) -> bool {
        matches!(self, Permission::WriteOnly)
    }
}

/// Link to external documentation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExternalDocs {
    pub url: String,
    pub description: Option<String>,
}

impl ExternalDocs {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Attributes shared by the six concrete schema kinds.
#[derive(Debug, Clone, PartialEq)]
pub struct SharedContext<F: SchemaFormat> {
    pub format: F,
    /// Whether the enclosing object lists this property in `required`.
    pub required: bool,
    pub nullable: bool,
    pub permission: Permission,
    pub deprecated: bool,
    pub title: Option<String>,
    pub description: Option<String>,
    pub external_docs: Option<ExternalDocs>,
    /// The `enum` constraint.
    pub allowed_values: Option<Vec<Value>>,
    /// Pre-rendered JSON text of the example value.
    pub example: Option<String>,
}

impl<F: SchemaFormat> Default for SharedContext<F> {
    fn default() -> Self {
        Self {
            format: F::default(),
            required: true,
            nullable: false,
            permission: Permission::ReadWrite,
            deprecated: false,
            title: None,
            description: None,
            external_docs: None,
            allowed_values: None,
            example: None,
        }
    }
}

impl<F: SchemaFormat> SharedContext<F> {
    /// A required context with the generic format and no other attributes.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_format(mut self, format: F) -> Self {
        self.format = format;
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn with_permission(mut self, permission: Permission) -> Self {
        self.permission = permission;
        self
    }

    /// Set access from the wire booleans.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::ConstraintViolation` if both flags are set.
    pub fn with_access(self, read_only: bool, write_only: bool) -> Result<Self, SchemaError> {
        Ok(self.with_permission(Permission::from_flags(read_only, write_only)?))
    }

    pub fn with_deprecated(mut self, deprecated: bool) -> Self {
        self.deprecated = deprecated;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_external_docs(mut self, docs: ExternalDocs) -> Self {
        self.external_docs = Some(docs);
        self
    }

    pub fn with_allowed_values(mut self, values: Vec<Value>) -> Self {
        self.allowed_values = Some(values);
        self
    }

    /// Attach already-rendered example JSON text.
    pub fn with_example_text(mut self, text: impl Into<String>) -> Self {
        self.example = Some(text.into());
        self
    }
}

/// Properties of an object schema, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Properties(IndexMap<String, Schema>);

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a property. An existing property with the same name is
    /// replaced in place and keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, schema: Schema) -> Option<Schema> {
        self.0.insert(name.into(), schema)
    }

    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.0.get(name)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Schema)> {
        self.0.iter().map(|(name, schema)| (name.as_str(), schema))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Names of required properties, in insertion order.
    pub fn required_names(&self) -> impl Iterator<Item = &str> {
        self.iter()
            .filter(|(_, schema)| schema.required())
            .map(|(name, _)| name)
    }
}

// Equality is order-sensitive, unlike `IndexMap`'s.
impl PartialEq for Properties {
    fn eq(&self, other: &Self) -> bool {
        self.0.len() == other.0.len() && self.0.iter().eq(other.0.iter())
    }
}

impl<K: Into<String>> FromIterator<(K, Schema)> for Properties {
    fn from_iter<I: IntoIterator<Item = (K, Schema)>>(iter: I) -> Self {
        let mut properties = Properties::new();
        for (name, schema) in iter {
            properties.insert(name, schema);
        }
        properties
    }
}

/// `additionalProperties`: either a flag or a schema for the extra values.
#[derive(Debug, Clone, PartialEq)]
pub enum AdditionalProperties {
    Allowed(bool),
    Schema(Box<Schema>),
}

/// Structural constraints of an object schema.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectContext {
    pub properties: Properties,
    pub additional_properties: Option<AdditionalProperties>,
    pub max_properties: Option<u64>,
    explicit_min_properties: u64,
}

impl ObjectContext {
    pub fn new(properties: Properties) -> Self {
        Self {
            properties,
            ..Self::default()
        }
    }

    pub fn with_property(mut self, name: impl Into<String>, schema: Schema) -> Self {
        self.properties.insert(name, schema);
        self
    }

    pub fn with_additional_properties(mut self, additional: AdditionalProperties) -> Self {
        self.additional_properties = Some(additional);
        self
    }

    pub fn with_max_properties(mut self, max: u64) -> Self {
        self.max_properties = Some(max);
        self
    }

    pub fn with_min_properties(mut self, min: u64) -> Self {
        self.explicit_min_properties = min;
        self
    }

    /// The minimum given at construction (0 when none was given).
    pub fn explicit_min_properties(&self) -> u64 {
        self.explicit_min_properties
    }

    /// The effective minimum: the explicit minimum or the number of required
    /// properties, whichever is larger.
    pub fn min_properties(&self) -> u64 {
        let required = self.properties.required_names().count() as u64;
        self.explicit_min_properties.max(required)
    }

    /// Names listed in the wire `required` array.
    pub fn required_properties(&self) -> Vec<&str> {
        self.properties.required_names().collect()
    }
}

/// Structural constraints of an array schema.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ArrayContext {
    pub items: Option<Box<Schema>>,
    pub unique_items: bool,
    pub max_items: Option<u64>,
    pub min_items: Option<u64>,
}

impl ArrayContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(mut self, items: Schema) -> Self {
        self.items = Some(Box::new(items));
        self
    }

    pub fn with_unique_items(mut self, unique: bool) -> Self {
        self.unique_items = unique;
        self
    }

    pub fn with_max_items(mut self, max: u64) -> Self {
        self.max_items = Some(max);
        self
    }

    pub fn with_min_items(mut self, min: u64) -> Self {
        self.min_items = Some(min);
        self
    }
}

/// An upper or lower bound on a numeric value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bound<T> {
    pub value: T,
    pub exclusive: bool,
}

impl<T> Bound<T> {
    pub fn inclusive(value: T) -> Self {
        Self {
            value,
            exclusive: false,
        }
    }

    pub fn exclusive(value: T) -> Self {
        Self {
            value,
            exclusive: true,
        }
    }
}

/// Constraints shared by `number` (`T = f64`) and `integer` (`T = i64`).
#[derive(Debug, Clone, PartialEq)]
pub struct NumericContext<T> {
    pub multiple_of: Option<T>,
    pub maximum: Option<Bound<T>>,
    pub minimum: Option<Bound<T>>,
}

impl<T> Default for NumericContext<T> {
    fn default() -> Self {
        Self {
            multiple_of: None,
            maximum: None,
            minimum: None,
        }
    }
}

impl<T> NumericContext<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_multiple_of(mut self, multiple_of: T) -> Self {
        self.multiple_of = Some(multiple_of);
        self
    }

    pub fn with_maximum(mut self, maximum: Bound<T>) -> Self {
        self.maximum = Some(maximum);
        self
    }

    pub fn with_minimum(mut self, minimum: Bound<T>) -> Self {
        self.minimum = Some(minimum);
        self
    }
}

pub type NumberContext = NumericContext<f64>;
pub type IntegerContext = NumericContext<i64>;

/// Constraints of a string schema.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StringContext {
    pub max_length: Option<u64>,
    pub min_length: Option<u64>,
    /// Regular expression source; not compiled here.
    pub pattern: Option<String>,
}

impl StringContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_length(mut self, max: u64) -> Self {
        self.max_length = Some(max);
        self
    }

    pub fn with_min_length(mut self, min: u64) -> Self {
        self.min_length = Some(min);
        self
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::StringFormat;

    #[test]
    fn permission_from_flags() {
        assert_eq!(
            Permission::from_flags(false, false).unwrap(),
            Permission::ReadWrite
        );
        assert_eq!(
            Permission::from_flags(true, false).unwrap(),
            Permission::ReadOnly
        );
        assert_eq!(
            Permission::from_flags(false, true).unwrap(),
            Permission::WriteOnly
        );
    }

    #[test]
    fn permission_rejects_both_flags() {
        let err = Permission::from_flags(true, true).unwrap_err();
        assert!(matches!(err, SchemaError::ConstraintViolation { .. }));
    }

    #[test]
    fn shared_context_defaults() {
        let ctx = SharedContext::<StringFormat>::new();
        assert!(ctx.required);
        assert!(!ctx.nullable);
        assert_eq!(ctx.permission, Permission::ReadWrite);
        assert_eq!(ctx.format, StringFormat::Generic);
        assert!(ctx.allowed_values.is_none());
    }

    #[test]
    fn shared_context_with_access_rejects_both() {
        let result = SharedContext::<StringFormat>::new().with_access(true, true);
        assert!(result.is_err());

        let ctx = SharedContext::<StringFormat>::new()
            .with_access(false, true)
            .unwrap();
        assert!(ctx.permission.write_only());
    }

    #[test]
    fn min_properties_counts_required() {
        let ctx = ObjectContext::new(Properties::from_iter([("hello", Schema::boolean())]));
        assert_eq!(ctx.min_properties(), 1);
        assert_eq!(ctx.explicit_min_properties(), 0);
    }

    #[test]
    fn min_properties_prefers_larger_count() {
        let ctx = ObjectContext::new(Properties::from_iter([
            ("hello", Schema::boolean()),
            ("world", Schema::boolean()),
        ]))
        .with_min_properties(1);
        assert_eq!(ctx.min_properties(), 2);
    }

    #[test]
    fn min_properties_prefers_explicit() {
        let ctx = ObjectContext::default().with_min_properties(2);
        assert_eq!(ctx.min_properties(), 2);
    }

    #[test]
    fn min_properties_tracks_property_changes() {
        let mut ctx = ObjectContext::default();
        assert_eq!(ctx.min_properties(), 0);

        ctx.properties.insert("a", Schema::string());
        ctx.properties.insert("b", Schema::string().to_optional());
        assert_eq!(ctx.min_properties(), 1);

        ctx.properties.insert("b", Schema::string());
        assert_eq!(ctx.min_properties(), 2);
    }

    #[test]
    fn properties_keep_insertion_order() {
        let mut props = Properties::new();
        props.insert("zeta", Schema::boolean());
        props.insert("alpha", Schema::boolean());
        props.insert("zeta", Schema::string());

        let names: Vec<&str> = props.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
        assert_eq!(props.get("zeta"), Some(&Schema::string()));
        assert_eq!(props.len(), 2);
    }

    #[test]
    fn properties_equality_respects_order() {
        let forward = Properties::from_iter([("a", Schema::boolean()), ("b", Schema::string())]);
        let backward = Properties::from_iter([("b", Schema::string()), ("a", Schema::boolean())]);
        assert_ne!(forward, backward);
        assert_eq!(
            forward,
            Properties::from_iter([("a", Schema::boolean()), ("b", Schema::string())])
        );
    }
}
