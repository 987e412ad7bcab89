//! Structure type compiler.
//!
//! Translates structure AST nodes into GraphQL types. Output and input
//! compilation share one recursion and only diverge on objects, which become
//! object types or input object types. Named types go through the
//! [`TypeRegistry`], so a name is generated once per build.
//!
//! | Structure          | GraphQL type                                   |
//! |--------------------|------------------------------------------------|
//! | primitive          | `String`, `Int`, `Boolean` (unspecified: `String`) |
//! | scalar             | opaque scalar named after the node             |
//! | enum               | enum, symbols are the sanitized value names    |
//! | object             | object / input object, fields named `{name}{Field}` |
//! | object, no fields  | the `None` scalar                              |
//! | list               | list of the element, compiled under the same name |
//! | non-null           | non-null of the inner type                     |

use std::collections::HashSet;

use async_graphql::Value;
use async_graphql::dynamic::{
    Enum, EnumItem, Field, FieldFuture, InputObject, InputValue, Object, Scalar, TypeRef,
};
use oneservice_core::{EnumStructure, EnumValue, ObjectStructure, PrimitiveType, Structure};
use tracing::trace;

use super::registry::{FieldNames, TypeRegistry, TypeSignature};
use crate::error::SchemaBuildError;
use crate::naming::{is_valid_name, pascalize, sanitize};

/// Scalar standing for "no value"; only `null` is accepted.
pub const NONE_SCALAR: &str = "None";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Output,
    Input,
}

pub fn compile_output_type(
    registry: &mut TypeRegistry,
    name: &str,
    structure: &Structure,
) -> Result<TypeRef, SchemaBuildError> {
    compile(registry, Direction::Output, name, structure)
}

pub fn compile_input_type(
    registry: &mut TypeRegistry,
    name: &str,
    structure: &Structure,
) -> Result<TypeRef, SchemaBuildError> {
    compile(registry, Direction::Input, name, structure)
}

/// Registers the `None` scalar and returns a reference to it.
pub fn none_type(registry: &mut TypeRegistry) -> Result<TypeRef, SchemaBuildError> {
    let signature = TypeSignature::Fixed("none-scalar".into());
    if !registry.lookup(NONE_SCALAR, &signature)? {
        let scalar = Scalar::new(NONE_SCALAR)
            .description("Represents an absent value")
            .validator(|value| matches!(value, Value::Null));
        registry.insert(NONE_SCALAR, signature, scalar)?;
    }
    Ok(TypeRef::named(NONE_SCALAR))
}

/// Symbol an enum entry is exposed under.
pub fn enum_symbol(value: &EnumValue) -> String {
    sanitize(&value.raw_name())
}

fn compile(
    registry: &mut TypeRegistry,
    direction: Direction,
    name: &str,
    structure: &Structure,
) -> Result<TypeRef, SchemaBuildError> {
    trace!(type_name = %name, kind = structure.kind(), ?direction, "Compiling structure");

    match structure {
        Structure::Primitive { ty, .. } => Ok(TypeRef::named(primitive_type_name(*ty))),
        Structure::Scalar { .. } => compile_scalar(registry, name, structure),
        Structure::Enum(e) => compile_enum(registry, name, e, structure),
        Structure::Object(object) if object.is_empty() => none_type(registry),
        Structure::Object(object) => match direction {
            Direction::Output => compile_object(registry, name, object, structure),
            Direction::Input => compile_input_object(registry, name, object, structure),
        },
        Structure::List { value, .. } => {
            let element = compile(registry, direction, name, value)?;
            Ok(TypeRef::List(Box::new(element)))
        }
        Structure::NonNull { value } => match compile(registry, direction, name, value)? {
            non_null @ TypeRef::NonNull(_) => Ok(non_null),
            inner => Ok(TypeRef::NonNull(Box::new(inner))),
        },
    }
}

fn primitive_type_name(ty: Option<PrimitiveType>) -> &'static str {
    match ty {
        Some(PrimitiveType::String) | None => TypeRef::STRING,
        Some(PrimitiveType::Number) => TypeRef::INT,
        Some(PrimitiveType::Boolean) => TypeRef::BOOLEAN,
    }
}

fn ensure_valid_name(name: &str) -> Result<(), SchemaBuildError> {
    if is_valid_name(name) {
        Ok(())
    } else {
        Err(SchemaBuildError::InvalidName(name.to_string()))
    }
}

fn compile_scalar(
    registry: &mut TypeRegistry,
    name: &str,
    structure: &Structure,
) -> Result<TypeRef, SchemaBuildError> {
    let signature = TypeSignature::Leaf(structure.clone());
    if !registry.lookup(name, &signature)? {
        ensure_valid_name(name)?;
        let mut scalar = Scalar::new(name);
        if let Some(description) = structure.description() {
            scalar = scalar.description(description);
        }
        registry.insert(name, signature, scalar)?;
    }
    Ok(TypeRef::named(name))
}

fn compile_enum(
    registry: &mut TypeRegistry,
    name: &str,
    structure: &EnumStructure,
    node: &Structure,
) -> Result<TypeRef, SchemaBuildError> {
    let signature = TypeSignature::Leaf(node.clone());
    if registry.lookup(name, &signature)? {
        return Ok(TypeRef::named(name));
    }
    ensure_valid_name(name)?;

    let mut enum_type = Enum::new(name);
    if let Some(description) = structure.doc.render() {
        enum_type = enum_type.description(description);
    }

    let mut seen = HashSet::new();
    for value in &structure.values {
        let symbol = enum_symbol(value);
        if matches!(symbol.as_str(), "true" | "false" | "null") {
            return Err(SchemaBuildError::InvalidName(symbol));
        }
        ensure_valid_name(&symbol)?;
        if !seen.insert(symbol.clone()) {
            return Err(SchemaBuildError::DuplicateEnumValue {
                type_name: name.to_string(),
                symbol,
            });
        }

        let mut item = EnumItem::new(symbol);
        if let Some(description) = value.doc.render() {
            item = item.description(description);
        }
        enum_type = enum_type.item(item);
    }

    registry.insert(name, signature, enum_type)?;
    Ok(TypeRef::named(name))
}

fn compile_object(
    registry: &mut TypeRegistry,
    name: &str,
    structure: &ObjectStructure,
    node: &Structure,
) -> Result<TypeRef, SchemaBuildError> {
    let signature = TypeSignature::Output(node.clone());
    if registry.lookup(name, &signature)? {
        return Ok(TypeRef::named(name));
    }
    ensure_valid_name(name)?;

    let mut object = Object::new(name);
    if let Some(description) = structure.doc.render() {
        object = object.description(description);
    }

    let mut field_names = FieldNames::new(name);
    for (field_name, field_structure) in &structure.fields {
        let graphql_name = sanitize(field_name);
        ensure_valid_name(&graphql_name)?;
        field_names.claim(&graphql_name)?;

        let field_type_name = format!("{name}{}", pascalize(field_name));
        let field_type = compile(registry, Direction::Output, &field_type_name, field_structure)?;

        let mut field = create_field_resolver(field_name, field_type);
        if let Some(description) = field_structure.description() {
            field = field.description(description);
        }
        object = object.field(field);
    }

    registry.insert(name, signature, object)?;
    Ok(TypeRef::named(name))
}

fn compile_input_object(
    registry: &mut TypeRegistry,
    name: &str,
    structure: &ObjectStructure,
    node: &Structure,
) -> Result<TypeRef, SchemaBuildError> {
    let signature = TypeSignature::Input(node.clone());
    if registry.lookup(name, &signature)? {
        return Ok(TypeRef::named(name));
    }
    ensure_valid_name(name)?;

    let mut input = InputObject::new(name);
    if let Some(description) = structure.doc.render() {
        input = input.description(description);
    }

    let mut field_names = FieldNames::new(name);
    for (field_name, field_structure) in &structure.fields {
        let graphql_name = sanitize(field_name);
        ensure_valid_name(&graphql_name)?;
        field_names.claim(&graphql_name)?;

        let field_type_name = format!("{name}{}", pascalize(field_name));
        let field_type = compile(registry, Direction::Input, &field_type_name, field_structure)?;

        let mut field = InputValue::new(graphql_name, field_type);
        if let Some(description) = field_structure.description() {
            field = field.description(description);
        }
        input = input.field(field);
    }

    registry.insert(name, signature, input)?;
    Ok(TypeRef::named(name))
}

/// Creates a field resolver that extracts a value from the parent object.
///
/// The GraphQL field name is sanitized; the value is read from the original
/// key.
pub(crate) fn create_field_resolver(field_name: &str, type_ref: TypeRef) -> Field {
    let graphql_field_name = sanitize(field_name);
    let key = async_graphql::Name::new(field_name);

    Field::new(graphql_field_name, type_ref, move |ctx| {
        let key = key.clone();
        FieldFuture::new(async move {
            if let Some(Value::Object(obj)) = ctx.parent_value.as_value()
                && let Some(value) = obj.get(&key)
            {
                return Ok(Some(value.clone()));
            }
            Ok(None)
        })
    })
}
