//! Structure AST.
//!
//! A structure describes the shape of a use-case input or result,
//! independently of any schema technology. Nodes are produced by the profile
//! parser as JSON tagged with a `kind` member and are immutable afterwards.
//!
//! ```json
//! {
//!   "kind": "ObjectStructure",
//!   "fields": {
//!     "name": { "kind": "NonNullStructure", "value": { "kind": "PrimitiveStructure", "type": "string" } }
//!   }
//! }
//! ```

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::StructureError;

/// Title and description attached to a documented node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Documentation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Documentation {
    pub fn new(title: impl Into<String>, description: Option<&str>) -> Self {
        Self {
            title: Some(title.into()),
            description: description.map(str::to_string),
        }
    }

    /// Renders the documentation as a single description string.
    ///
    /// Nodes without a title are treated as undocumented.
    pub fn render(&self) -> Option<String> {
        let title = self.title.as_deref()?;
        let description = self.description.as_deref().unwrap_or("");
        Some(format!("{title}\n{description}").trim().to_string())
    }
}

/// Primitive types of the description language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    String,
    Number,
    Boolean,
}

/// Literal value of an enum entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnumLiteral {
    Boolean(bool),
    Number(serde_json::Number),
    String(String),
}

impl EnumLiteral {
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Boolean(b) => serde_json::Value::Bool(*b),
            Self::Number(n) => serde_json::Value::Number(n.clone()),
            Self::String(s) => serde_json::Value::String(s.clone()),
        }
    }

    /// Checks whether a JSON value carries this literal.
    pub fn matches(&self, value: &serde_json::Value) -> bool {
        match (self, value) {
            (Self::Boolean(a), serde_json::Value::Bool(b)) => a == b,
            (Self::Number(a), serde_json::Value::Number(b)) => a == b,
            (Self::String(a), serde_json::Value::String(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for EnumLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

/// One entry of an enum structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub value: EnumLiteral,
    #[serde(flatten)]
    pub doc: Documentation,
}

impl EnumValue {
    /// The name the entry is known by before sanitization.
    pub fn raw_name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => self.value.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnumStructure {
    pub values: Vec<EnumValue>,
    pub doc: Documentation,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectStructure {
    /// Field name to field structure, in declaration order.
    pub fields: IndexMap<String, Structure>,
    pub doc: Documentation,
}

impl ObjectStructure {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A node of the structure AST.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawStructure")]
pub enum Structure {
    /// A primitive; `None` means the type was left unspecified.
    Primitive {
        ty: Option<PrimitiveType>,
        doc: Documentation,
    },
    /// An opaque value passed through as is.
    Scalar { doc: Documentation },
    Enum(EnumStructure),
    Object(ObjectStructure),
    List {
        value: Box<Structure>,
        doc: Documentation,
    },
    NonNull { value: Box<Structure> },
}

impl Structure {
    pub fn primitive(ty: PrimitiveType) -> Self {
        Self::Primitive {
            ty: Some(ty),
            doc: Documentation::default(),
        }
    }

    pub fn scalar() -> Self {
        Self::Scalar {
            doc: Documentation::default(),
        }
    }

    pub fn object<K: Into<String>>(fields: impl IntoIterator<Item = (K, Structure)>) -> Self {
        Self::Object(ObjectStructure {
            fields: fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            doc: Documentation::default(),
        })
    }

    pub fn list(value: Structure) -> Self {
        Self::List {
            value: Box::new(value),
            doc: Documentation::default(),
        }
    }

    pub fn non_null(value: Structure) -> Self {
        Self::NonNull {
            value: Box::new(value),
        }
    }

    /// Returns the tag this node is serialized with.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Primitive { .. } => "PrimitiveStructure",
            Self::Scalar { .. } => "ScalarStructure",
            Self::Enum(_) => "EnumStructure",
            Self::Object(_) => "ObjectStructure",
            Self::List { .. } => "ListStructure",
            Self::NonNull { .. } => "NonNullStructure",
        }
    }

    /// Documentation of this node. Non-null wrappers carry none.
    pub fn documentation(&self) -> Option<&Documentation> {
        match self {
            Self::Primitive { doc, .. } | Self::Scalar { doc } | Self::List { doc, .. } => Some(doc),
            Self::Enum(e) => Some(&e.doc),
            Self::Object(o) => Some(&o.doc),
            Self::NonNull { .. } => None,
        }
    }

    pub fn description(&self) -> Option<String> {
        self.documentation().and_then(Documentation::render)
    }

    /// `false` only for objects declaring no field.
    pub fn has_fields(&self) -> bool {
        match self {
            Self::Object(o) => !o.is_empty(),
            _ => true,
        }
    }
}

/// Wire form of a structure node before the `kind` tag is checked.
#[derive(Deserialize)]
struct RawStructure {
    kind: String,
    #[serde(rename = "type", default)]
    ty: Option<PrimitiveType>,
    #[serde(default)]
    fields: Option<IndexMap<String, Structure>>,
    #[serde(default)]
    value: Option<Box<Structure>>,
    #[serde(default)]
    enums: Option<Vec<EnumValue>>,
    #[serde(flatten)]
    doc: Documentation,
}

impl TryFrom<RawStructure> for Structure {
    type Error = StructureError;

    fn try_from(raw: RawStructure) -> Result<Self, Self::Error> {
        let RawStructure {
            kind,
            ty,
            fields,
            value,
            enums,
            doc,
        } = raw;

        match kind.as_str() {
            "PrimitiveStructure" => Ok(Self::Primitive { ty, doc }),
            "ScalarStructure" => Ok(Self::Scalar { doc }),
            "EnumStructure" => Ok(Self::Enum(EnumStructure {
                values: enums.unwrap_or_default(),
                doc,
            })),
            "ObjectStructure" => Ok(Self::Object(ObjectStructure {
                fields: fields.unwrap_or_default(),
                doc,
            })),
            "ListStructure" => {
                let value = value.ok_or(StructureError::MissingMember {
                    kind: "ListStructure",
                    member: "value",
                })?;
                Ok(Self::List { value, doc })
            }
            "NonNullStructure" => {
                let value = value.ok_or(StructureError::MissingMember {
                    kind: "NonNullStructure",
                    member: "value",
                })?;
                Ok(Self::NonNull { value })
            }
            _ => Err(StructureError::UnsupportedKind(kind)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_nested_object() {
        let structure: Structure = serde_json::from_value(json!({
            "kind": "ObjectStructure",
            "title": "Object title",
            "fields": {
                "name": {
                    "kind": "NonNullStructure",
                    "value": { "kind": "PrimitiveStructure", "type": "string" }
                },
                "tags": {
                    "kind": "ListStructure",
                    "value": { "kind": "PrimitiveStructure" }
                }
            }
        }))
        .unwrap();

        let Structure::Object(object) = &structure else {
            panic!("expected object, got {}", structure.kind());
        };
        assert_eq!(object.doc.title.as_deref(), Some("Object title"));
        assert_eq!(
            object.fields.keys().collect::<Vec<_>>(),
            vec!["name", "tags"]
        );
        assert_eq!(
            object.fields["name"],
            Structure::non_null(Structure::primitive(PrimitiveType::String))
        );
        assert!(matches!(
            &object.fields["tags"],
            Structure::List { value, .. } if matches!(**value, Structure::Primitive { ty: None, .. })
        ));
    }

    #[test]
    fn test_deserialize_enum() {
        let structure: Structure = serde_json::from_value(json!({
            "kind": "EnumStructure",
            "enums": [
                { "name": "ONE", "value": "one", "title": "First" },
                { "value": 2 },
                { "value": true }
            ]
        }))
        .unwrap();

        let Structure::Enum(e) = structure else {
            panic!("expected enum");
        };
        assert_eq!(e.values.len(), 3);
        assert_eq!(e.values[0].raw_name(), "ONE");
        assert_eq!(e.values[0].doc.render().as_deref(), Some("First"));
        assert_eq!(e.values[1].raw_name(), "2");
        assert_eq!(e.values[2].value, EnumLiteral::Boolean(true));
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let err = serde_json::from_value::<Structure>(json!({ "kind": "UnionStructure" }))
            .unwrap_err();
        assert!(err.to_string().contains("Unsupported structure kind: UnionStructure"));
    }

    #[test]
    fn test_unknown_primitive_type_is_rejected() {
        let result = serde_json::from_value::<Structure>(json!({
            "kind": "PrimitiveStructure",
            "type": "float"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_list_without_value_is_rejected() {
        let err = serde_json::from_value::<Structure>(json!({ "kind": "ListStructure" }))
            .unwrap_err();
        assert!(err.to_string().contains("missing required member 'value'"));
    }

    #[test]
    fn test_documentation_render() {
        assert_eq!(Documentation::default().render(), None);
        assert_eq!(
            Documentation::new("Title", Some("Description")).render().as_deref(),
            Some("Title\nDescription")
        );
        assert_eq!(
            Documentation::new("Title", None).render().as_deref(),
            Some("Title")
        );
        let untitled = Documentation {
            title: None,
            description: Some("ignored".into()),
        };
        assert_eq!(untitled.render(), None);
    }

    #[test]
    fn test_enum_literal_matches() {
        assert!(EnumLiteral::String("a".into()).matches(&json!("a")));
        assert!(!EnumLiteral::String("1".into()).matches(&json!(1)));
        assert!(EnumLiteral::Number(1.into()).matches(&json!(1)));
        assert!(EnumLiteral::Boolean(false).matches(&json!(false)));
    }

    #[test]
    fn test_has_fields() {
        assert!(!Structure::object(Vec::<(String, Structure)>::new()).has_fields());
        assert!(Structure::object([("a", Structure::scalar())]).has_fields());
        assert!(Structure::scalar().has_fields());
    }
}
