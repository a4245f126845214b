//! `$ref` targets: another file, or an entry in the document's components.

use std::fmt;

/// Categories of the OpenAPI components registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentsPath {
    Schemas,
    Responses,
    Parameters,
    Examples,
    RequestBodies,
    Headers,
    SecuritySchemes,
    Links,
    Callbacks,
}

impl ComponentsPath {
    /// Key of this category under `#/components`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentsPath::Schemas => "schemas",
            ComponentsPath::Responses => "responses",
            ComponentsPath::Parameters => "parameters",
            ComponentsPath::Examples => "examples",
            ComponentsPath::RequestBodies => "requestBodies",
            ComponentsPath::Headers => "headers",
            ComponentsPath::SecuritySchemes => "securitySchemes",
            ComponentsPath::Links => "links",
            ComponentsPath::Callbacks => "callbacks",
        }
    }
}

/// A named entry in one category of the components registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComponentNode {
    pub category: ComponentsPath,
    pub name: String,
}

impl ComponentNode {
    pub fn new(category: ComponentsPath, name: impl Into<String>) -> Self {
        Self {
            category,
            name: name.into(),
        }
    }
}

/// Target of a `$ref`.
///
/// References are never dereferenced here; resolving one to the schema it
/// names is the document's job.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Reference {
    /// A file locator with an optional `#/json/pointer` fragment, kept verbatim.
    External(String),
    /// An entry of this document's components registry.
    Internal(ComponentNode),
}

impl Reference {
    pub fn external(pointer: impl Into<String>) -> Self {
        Reference::External(pointer.into())
    }

    pub fn component(category: ComponentsPath, name: impl Into<String>) -> Self {
        Reference::Internal(ComponentNode::new(category, name))
    }

    /// The `$ref` string written on encode.
    pub fn pointer(&self) -> String {
        match self {
            Reference::External(pointer) => pointer.clone(),
            Reference::Internal(node) => {
                format!("#/components/{}/{}", node.category.as_str(), node.name)
            }
        }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pointer())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_reference_pointer() {
        let reference = Reference::component(ComponentsPath::Schemas, "Pet");
        assert_eq!(reference.pointer(), "#/components/schemas/Pet");

        let reference = Reference::component(ComponentsPath::RequestBodies, "NewPet");
        assert_eq!(reference.pointer(), "#/components/requestBodies/NewPet");
    }

    #[test]
    fn external_reference_is_verbatim() {
        let reference = Reference::external("../common.json#/definitions/Error");
        assert_eq!(reference.pointer(), "../common.json#/definitions/Error");
        assert_eq!(reference.to_string(), "../common.json#/definitions/Error");
    }

    #[test]
    fn external_and_internal_are_distinct() {
        let internal = Reference::component(ComponentsPath::Schemas, "Pet");
        let external = Reference::external("#/components/schemas/Pet");
        assert_ne!(internal, external);
        assert_eq!(internal.pointer(), external.pointer());
    }
}
