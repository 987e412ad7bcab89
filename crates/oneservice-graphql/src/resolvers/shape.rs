//! Conversion between engine values and the generated types.
//!
//! Engine results use the original structure: field names may contain `-`
//! and enum entries carry their literal values. Generated types expose
//! sanitized field names and enum symbols, so values are translated in both
//! directions along the structure they were declared with.

use async_graphql::{Name, Value};
use oneservice_core::{EnumStructure, Structure};

use super::{graphql_value_to_json, json_to_graphql_value};
use crate::naming::sanitize;
use crate::schema::enum_symbol;

/// Shapes an engine result for the generated result type.
///
/// Object fields are kept under their original keys, which is where the
/// field resolvers read them. Enum literals become symbols. Results of use
/// cases without a declared result resolve to `null`.
pub fn shape_output(structure: Option<&Structure>, value: serde_json::Value) -> Value {
    match structure {
        Some(structure) => shape(structure, value),
        None => Value::Null,
    }
}

fn shape(structure: &Structure, value: serde_json::Value) -> Value {
    match (structure, value) {
        (_, serde_json::Value::Null) => Value::Null,
        (Structure::NonNull { value: inner }, value) => shape(inner, value),
        (Structure::List { value: inner, .. }, serde_json::Value::Array(items)) => {
            Value::List(items.into_iter().map(|item| shape(inner, item)).collect())
        }
        (Structure::Enum(e), value) => match e.values.iter().find(|ev| ev.value.matches(&value)) {
            Some(entry) => Value::Enum(Name::new(enum_symbol(entry))),
            None => json_to_graphql_value(value),
        },
        (Structure::Object(object), _) if object.is_empty() => Value::Null,
        (Structure::Object(object), serde_json::Value::Object(mut map)) => Value::Object(
            object
                .fields
                .iter()
                .filter_map(|(key, field)| map.remove(key).map(|v| (Name::new(key), shape(field, v))))
                .collect(),
        ),
        (_, value) => json_to_graphql_value(value),
    }
}

/// Translates a GraphQL argument back into the value the engine expects.
///
/// Sanitized field names map back to the original keys and enum symbols to
/// their literals.
pub fn shape_input(structure: Option<&Structure>, value: &Value) -> serde_json::Value {
    match structure {
        Some(structure) => unshape(structure, value),
        None => graphql_value_to_json(value),
    }
}

fn unshape(structure: &Structure, value: &Value) -> serde_json::Value {
    match (structure, value) {
        (_, Value::Null) => serde_json::Value::Null,
        (Structure::NonNull { value: inner }, value) => unshape(inner, value),
        (Structure::List { value: inner, .. }, Value::List(items)) => {
            serde_json::Value::Array(items.iter().map(|item| unshape(inner, item)).collect())
        }
        (Structure::Enum(e), Value::Enum(symbol)) => enum_literal(e, symbol.as_str()),
        // Variables carry enum values as strings.
        (Structure::Enum(e), Value::String(symbol)) => enum_literal(e, symbol),
        (Structure::Object(object), Value::Object(map)) => serde_json::Value::Object(
            object
                .fields
                .iter()
                .filter_map(|(key, field)| {
                    map.get(&Name::new(sanitize(key)))
                        .map(|v| (key.clone(), unshape(field, v)))
                })
                .collect(),
        ),
        (_, value) => graphql_value_to_json(value),
    }
}

fn enum_literal(structure: &EnumStructure, symbol: &str) -> serde_json::Value {
    structure
        .values
        .iter()
        .find(|entry| enum_symbol(entry) == symbol)
        .map_or_else(
            || serde_json::Value::String(symbol.to_string()),
            |entry| entry.value.to_json(),
        )
}
