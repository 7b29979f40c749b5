use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use tracing::debug;
use crate::collection::{CollectionConfig, CollectionDefinition};
use crate::core::{CollectionError, Result};
use super::Model;

/// Runtime handle for a member type.
#[derive(Debug, Clone, Copy)]
pub struct ModelType {
    name: &'static str,
    type_id: TypeId,
}

impl ModelType {
    pub fn of<M: Model>() -> Self {
        Self {
            name: M::model_name(),
            type_id: TypeId::of::<M>(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is<M: Model>(&self) -> bool {
        self.type_id == TypeId::of::<M>()
    }
}

impl PartialEq for ModelType {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for ModelType {}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Argument accepted when binding a collection type: a type or the name of one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelRef {
    Type(ModelType),
    Name(String),
}

impl From<ModelType> for ModelRef {
    fn from(model: ModelType) -> Self {
        Self::Type(model)
    }
}

impl From<&str> for ModelRef {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for ModelRef {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

/// Known member types, resolvable by name.
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    models: HashMap<String, ModelType>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `M` under its [`Model::model_name`].
    pub fn register<M: Model>(&mut self) -> ModelType {
        let model = ModelType::of::<M>();
        self.models.insert(model.name().to_string(), model);
        model
    }

    pub fn resolve(&self, name: &str) -> Result<ModelType> {
        self.models
            .get(name)
            .copied()
            .ok_or_else(|| CollectionError::UnknownModel(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.models.contains_key(name)
    }

    pub fn list_models(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.models.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Write-once bindings from collection type names to member types.
///
/// Each collection type name carries its own binding; binding a narrower
/// collection type never reads or changes the binding of a broader one.
#[derive(Debug, Clone, Default)]
pub struct CollectionRegistry {
    models: ModelRegistry,
    bindings: HashMap<String, ModelType>,
}

impl CollectionRegistry {
    pub fn new(models: ModelRegistry) -> Self {
        Self {
            models,
            bindings: HashMap::new(),
        }
    }

    pub fn models(&self) -> &ModelRegistry {
        &self.models
    }

    /// Binds `collection` to a member type.
    ///
    /// Name resolution happens first, so an unknown name is reported as
    /// [`CollectionError::UnknownModel`] even for an already bound collection.
    pub fn bind(&mut self, collection: &str, model: impl Into<ModelRef>) -> Result<ModelType> {
        if collection.trim().is_empty() {
            return Err(CollectionError::argument("collection name can't be blank"));
        }

        let model = match model.into() {
            ModelRef::Type(model) => model,
            ModelRef::Name(name) if name.trim().is_empty() => {
                return Err(CollectionError::argument(
                    "model must be a type or the name of a type",
                ));
            }
            ModelRef::Name(name) => self.models.resolve(&name)?,
        };

        if let Some(bound) = self.bindings.get(collection) {
            return Err(CollectionError::ModelAlreadySet {
                collection: collection.to_string(),
                model: bound.name().to_string(),
            });
        }

        debug!(collection, model = model.name(), "bound collection model");
        self.bindings.insert(collection.to_string(), model);
        Ok(model)
    }

    /// Bound member type, `None` while unbound.
    pub fn model(&self, collection: &str) -> Option<ModelType> {
        self.bindings.get(collection).copied()
    }

    /// Definition for a bound collection type, checked against `M`.
    pub fn definition<M: Model>(&self, collection: &str) -> Result<CollectionDefinition<M>> {
        let bound = self
            .model(collection)
            .ok_or_else(|| CollectionError::ModelNotSet(collection.to_string()))?;
        if !bound.is::<M>() {
            return Err(CollectionError::ModelMismatch {
                collection: collection.to_string(),
                bound: bound.name().to_string(),
                requested: M::model_name().to_string(),
            });
        }
        Ok(CollectionDefinition::new(CollectionConfig::new(collection)))
    }
}
