//! Entity schema registry.
//!
//! # Responsibility
//! - Map each resource kind to its declarative schema.
//! - Stay side-effect free so every layer can consult it.

pub mod registry;

pub use registry::{
    lookup_schema, parse_kind, schema_for, EntitySchema, FieldSpec, FieldType, OrderBy,
    SortDirection, SortKey,
};
