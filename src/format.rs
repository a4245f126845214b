//! Registry of recognized JSON types and their formats.
//!
//! | `type`    | formats                                         | canonical kind |
//! |-----------|-------------------------------------------------|----------------|
//! | `boolean` | (generic)                                       | boolean        |
//! | `object`  | (generic)                                       | map            |
//! | `array`   | (generic)                                       | list           |
//! | `number`  | `float`, `double`                               | float          |
//! | `integer` | `int32`, `int64`                                | integer        |
//! | `string`  | `byte`, `binary`, `date`, `date-time`, `password` | string       |
//!
//! Any other `format` string is carried verbatim as `Other`. `Generic` is the
//! default for every type and is never written to the wire.

use std::fmt;

use serde_json::Value;

/// The six concrete JSON types a schema can declare with `type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsonType {
    Boolean,
    Object,
    Array,
    Number,
    Integer,
    String,
}

impl JsonType {
    /// Wire name used in the `type` member.
    pub fn as_str(&self) -> &'static str {
        match self {
            JsonType::Boolean => "boolean",
            JsonType::Object => "object",
            JsonType::Array => "array",
            JsonType::Number => "number",
            JsonType::Integer => "integer",
            JsonType::String => "string",
        }
    }

    /// Parse a `type` member value.
    ///
    /// Returns `None` for unknown values (caller should error).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "boolean" => Some(JsonType::Boolean),
            "object" => Some(JsonType::Object),
            "array" => Some(JsonType::Array),
            "number" => Some(JsonType::Number),
            "integer" => Some(JsonType::Integer),
            "string" => Some(JsonType::String),
            _ => None,
        }
    }

    pub fn canonical_kind(&self) -> CanonicalKind {
        match self {
            JsonType::Boolean => CanonicalKind::Boolean,
            JsonType::Object => CanonicalKind::Map,
            JsonType::Array => CanonicalKind::List,
            JsonType::Number => CanonicalKind::Float,
            JsonType::Integer => CanonicalKind::Integer,
            JsonType::String => CanonicalKind::String,
        }
    }
}

impl fmt::Display for JsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The natural value shape implied by a JSON type, used to interpret
/// `enum` and `example` entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalKind {
    Boolean,
    Map,
    List,
    Float,
    Integer,
    String,
}

impl CanonicalKind {
    /// Whether `value` has this kind's shape. `null` is never admitted here;
    /// nullability is a property of the schema, not of the kind.
    pub fn admits(&self, value: &Value) -> bool {
        match (self, value) {
            (CanonicalKind::Boolean, Value::Bool(_)) => true,
            (CanonicalKind::Map, Value::Object(_)) => true,
            (CanonicalKind::List, Value::Array(_)) => true,
            (CanonicalKind::Float, Value::Number(_)) => true,
            (CanonicalKind::Integer, Value::Number(n)) => {
                n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.fract() == 0.0)
            }
            (CanonicalKind::String, Value::String(_)) => true,
            _ => false,
        }
    }
}

/// A format enum belonging to exactly one JSON type.
pub trait SchemaFormat: fmt::Debug + Clone + PartialEq + Default {
    /// The JSON type this format qualifies.
    const JSON_TYPE: JsonType;

    /// Interpret a `format` member value. Unrecognized strings become `Other`.
    fn from_raw(raw: &str) -> Self;

    /// The wire value, or `None` for the generic (unspecified) format.
    fn raw(&self) -> Option<&str>;
}

macro_rules! format_enum {
    (
        $(#[$meta:meta])*
        $name:ident => $json_type:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $raw:literal ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
        pub enum $name {
            /// No `format` member.
            #[default]
            Generic,
            $( $(#[$vmeta])* $variant, )*
            /// A format string outside the registry, kept verbatim.
            Other(String),
        }

        impl SchemaFormat for $name {
            const JSON_TYPE: JsonType = JsonType::$json_type;

            fn from_raw(raw: &str) -> Self {
                match raw {
                    $( $raw => $name::$variant, )*
                    other => $name::Other(other.to_string()),
                }
            }

            fn raw(&self) -> Option<&str> {
                match self {
                    $name::Generic => None,
                    $( $name::$variant => Some($raw), )*
                    $name::Other(raw) => Some(raw.as_str()),
                }
            }
        }
    };
}

format_enum! {
    /// Formats for `type: boolean`.
    BooleanFormat => Boolean {}
}

format_enum! {
    /// Formats for `type: object`.
    ObjectFormat => Object {}
}

format_enum! {
    /// Formats for `type: array`.
    ArrayFormat => Array {}
}

format_enum! {
    /// Formats for `type: number`.
    NumberFormat => Number {
        Float => "float",
        Double => "double",
    }
}

format_enum! {
    /// Formats for `type: integer`.
    IntegerFormat => Integer {
        Int32 => "int32",
        Int64 => "int64",
    }
}

format_enum! {
    /// Formats for `type: string`.
    StringFormat => String {
        /// Base64 encoded characters.
        Byte => "byte",
        /// Any sequence of octets.
        Binary => "binary",
        /// RFC 3339 full-date.
        Date => "date",
        /// RFC 3339 date-time.
        DateTime => "date-time",
        /// A hint to UIs to obscure input.
        Password => "password",
    }
}

/// A `(type, format)` pair for a concrete schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum JsonTypeFormat {
    Boolean(BooleanFormat),
    Object(ObjectFormat),
    Array(ArrayFormat),
    Number(NumberFormat),
    Integer(IntegerFormat),
    String(StringFormat),
}

impl JsonTypeFormat {
    pub fn json_type(&self) -> JsonType {
        match self {
            JsonTypeFormat::Boolean(_) => JsonType::Boolean,
            JsonTypeFormat::Object(_) => JsonType::Object,
            JsonTypeFormat::Array(_) => JsonType::Array,
            JsonTypeFormat::Number(_) => JsonType::Number,
            JsonTypeFormat::Integer(_) => JsonType::Integer,
            JsonTypeFormat::String(_) => JsonType::String,
        }
    }

    /// The `format` wire value, `None` when generic.
    pub fn format_str(&self) -> Option<&str> {
        match self {
            JsonTypeFormat::Boolean(f) => f.raw(),
            JsonTypeFormat::Object(f) => f.raw(),
            JsonTypeFormat::Array(f) => f.raw(),
            JsonTypeFormat::Number(f) => f.raw(),
            JsonTypeFormat::Integer(f) => f.raw(),
            JsonTypeFormat::String(f) => f.raw(),
        }
    }

    pub fn canonical_kind(&self) -> CanonicalKind {
        self.json_type().canonical_kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_type_parse_valid() {
        for ty in [
            JsonType::Boolean,
            JsonType::Object,
            JsonType::Array,
            JsonType::Number,
            JsonType::Integer,
            JsonType::String,
        ] {
            assert_eq!(JsonType::parse(ty.as_str()), Some(ty));
        }
    }

    #[test]
    fn json_type_parse_invalid() {
        assert_eq!(JsonType::parse("null"), None);
        assert_eq!(JsonType::parse("Boolean"), None);
        assert_eq!(JsonType::parse(""), None);
    }

    #[test]
    fn known_formats_parse() {
        assert_eq!(StringFormat::from_raw("date-time"), StringFormat::DateTime);
        assert_eq!(IntegerFormat::from_raw("int64"), IntegerFormat::Int64);
        assert_eq!(NumberFormat::from_raw("float"), NumberFormat::Float);
    }

    #[test]
    fn unknown_format_is_kept_verbatim() {
        let format = StringFormat::from_raw("email");
        assert_eq!(format, StringFormat::Other("email".into()));
        assert_eq!(format.raw(), Some("email"));

        // "float" means nothing for integers
        assert_eq!(
            IntegerFormat::from_raw("float"),
            IntegerFormat::Other("float".into())
        );
    }

    #[test]
    fn generic_format_has_no_wire_value() {
        assert_eq!(BooleanFormat::default().raw(), None);
        assert_eq!(StringFormat::Generic.raw(), None);
        assert_eq!(
            JsonTypeFormat::Number(NumberFormat::Generic).format_str(),
            None
        );
    }

    #[test]
    fn canonical_kinds() {
        assert_eq!(JsonType::Object.canonical_kind(), CanonicalKind::Map);
        assert_eq!(
            JsonTypeFormat::Integer(IntegerFormat::Int32).canonical_kind(),
            CanonicalKind::Integer
        );
    }

    #[test]
    fn canonical_kind_admits() {
        assert!(CanonicalKind::Integer.admits(&json!(3)));
        assert!(CanonicalKind::Integer.admits(&json!(3.0)));
        assert!(!CanonicalKind::Integer.admits(&json!(3.5)));
        assert!(CanonicalKind::Float.admits(&json!(3.5)));
        assert!(CanonicalKind::String.admits(&json!("x")));
        assert!(!CanonicalKind::String.admits(&json!(null)));
        assert!(CanonicalKind::List.admits(&json!([1, "a"])));
        assert!(CanonicalKind::Map.admits(&json!({"a": 1})));
        assert!(!CanonicalKind::Boolean.admits(&json!("true")));
    }
}
