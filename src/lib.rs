// ============================================================================
// model_collection Library
// ============================================================================

pub mod core;
pub mod model;
pub mod collection;
#[macro_use]
mod macros;

// Re-export main types for convenience
pub use crate::core::{
    Attributes, BASE, CollectionError, Column, DataType, Result, Schema, ValidationErrors, Value,
};
pub use model::{CollectionRegistry, Model, ModelRef, ModelRegistry, ModelType, SaveOptions};
pub use collection::{
    AssignStrategy, AttributeUpdates, Collection, CollectionConfig, CollectionDefinition,
    CollectionRule, CountRule, DirectAssign, RECORDS, Record,
};

// Used by `model_collection!` expansions.
#[doc(hidden)]
pub use serde_json;
