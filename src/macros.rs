//! Declarative macros for parameter records and named collection types.
//!
//! Implementations are split into focused files.

#[path = "macros/attributes.rs"]
mod attributes;
#[path = "macros/model_collection.rs"]
mod model_collection;
