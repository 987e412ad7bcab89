//! Named-type registry.
//!
//! Every generated type is registered under its GraphQL name together with
//! the signature it was generated from. Generators look a name up before
//! building it: an equal signature reuses the existing type, a different one
//! is a [`SchemaBuildError::TypeNameConflict`].

use std::collections::HashSet;

use async_graphql::dynamic::{SchemaBuilder, Type};
use indexmap::IndexMap;
use oneservice_core::Structure;
use tracing::trace;

use crate::error::SchemaBuildError;

/// What a generated type was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSignature {
    /// Enum or scalar, valid in both directions.
    Leaf(Structure),
    /// Object type compiled from an output structure.
    Output(Structure),
    /// Input object compiled from an input structure.
    Input(Structure),
    /// Fixed helper types, identified by a descriptive key.
    Fixed(String),
}

/// Field names already taken on one generated type.
///
/// Distinct source names may sanitize to the same GraphQL name; the second
/// one is rejected instead of reaching the dynamic schema.
#[derive(Debug)]
pub(crate) struct FieldNames<'a> {
    type_name: &'a str,
    seen: HashSet<String>,
}

impl<'a> FieldNames<'a> {
    pub(crate) fn new(type_name: &'a str) -> Self {
        Self {
            type_name,
            seen: HashSet::new(),
        }
    }

    pub(crate) fn claim(&mut self, field: &str) -> Result<(), SchemaBuildError> {
        if self.seen.insert(field.to_string()) {
            Ok(())
        } else {
            Err(SchemaBuildError::DuplicateFieldName {
                type_name: self.type_name.to_string(),
                field: field.to_string(),
            })
        }
    }
}

#[derive(Default)]
pub struct TypeRegistry {
    types: IndexMap<String, (TypeSignature, Type)>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks whether `name` is already generated from `signature`.
    ///
    /// Returns `Ok(false)` for unknown names.
    pub fn lookup(&self, name: &str, signature: &TypeSignature) -> Result<bool, SchemaBuildError> {
        match self.types.get(name) {
            None => Ok(false),
            Some((existing, _)) if existing == signature => {
                trace!(type_name = %name, "Reusing generated type");
                Ok(true)
            }
            Some(_) => Err(SchemaBuildError::TypeNameConflict(name.to_string())),
        }
    }

    /// Registers a type; registering a known name again must carry the same
    /// signature and keeps the first definition.
    pub fn insert(
        &mut self,
        name: &str,
        signature: TypeSignature,
        ty: impl Into<Type>,
    ) -> Result<(), SchemaBuildError> {
        if self.lookup(name, &signature)? {
            return Ok(());
        }
        trace!(type_name = %name, "Registering generated type");
        self.types.insert(name.to_string(), (signature, ty.into()));
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    /// Registers every generated type with the schema builder.
    pub fn register_all(self, mut builder: SchemaBuilder) -> SchemaBuilder {
        for (_, (_, ty)) in self.types {
            builder = builder.register(ty);
        }
        builder
    }
}
