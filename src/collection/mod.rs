//! Bulk-record collections.
//!
//! A [`Collection`] owns an ordered group of members of one [`Model`] type and
//! gives them group-level lifecycle operations:
//!
//! - construction from parameter records or adoption of built instances
//! - aggregate validation (`validate`) and persistence (`save`, `save_strict`)
//! - reconciled bulk updates by position or by key (`assign_attributes`, `update`)
//!
//! Members persist independently; there is no cross-member transaction, so a
//! partially successful save with validation bypassed is a normal outcome.
//!
//! # Examples
//!
//! ```ignore
//! let mut books = Collection::<Book>::build(vec![
//!     attributes! { "isbn" => 1000, "synopsis" => "First" },
//!     attributes! { "isbn" => 1001, "synopsis" => "Second" },
//! ])?;
//!
//! if books.save() {
//!     controller.redirect();
//! } else {
//!     controller.render(books.errors());
//! }
//! ```

pub mod config;
pub mod definition;
pub mod persistence;
pub mod reconcile;

pub use config::CollectionConfig;
pub use definition::{CollectionDefinition, CollectionRule, CountRule};
pub use reconcile::{AssignStrategy, AttributeUpdates, DirectAssign};

use std::fmt;
use crate::core::{Attributes, Result, ValidationErrors};
use crate::model::{Model, ModelType};

/// Synthetic error field for collection-level messages.
pub const RECORDS: &str = "records";

/// One element of a construction batch.
#[derive(Debug, Clone)]
pub enum Record<M> {
    Params(Attributes),
    Instance(M),
}

impl<M: Model> Record<M> {
    pub fn is_instance(&self) -> bool {
        matches!(self, Self::Instance(_))
    }

    fn into_instance(self) -> Option<M> {
        match self {
            Self::Instance(model) => Some(model),
            Self::Params(_) => None,
        }
    }

    fn into_attributes(self) -> Attributes {
        match self {
            Self::Params(attributes) => attributes,
            Self::Instance(model) => model.attributes(),
        }
    }
}

impl<M> From<Attributes> for Record<M> {
    fn from(attributes: Attributes) -> Self {
        Self::Params(attributes)
    }
}

/// Ordered members of one model type plus the collection's own error set.
pub struct Collection<M: Model> {
    definition: CollectionDefinition<M>,
    records: Vec<M>,
    errors: ValidationErrors,
}

impl<M: Model> Collection<M> {
    /// Empty collection with the default definition for `M`.
    pub fn new() -> Self {
        Self::with_definition(CollectionDefinition::for_model())
    }

    pub fn with_definition(definition: CollectionDefinition<M>) -> Self {
        Self {
            definition,
            records: Vec::new(),
            errors: ValidationErrors::new(),
        }
    }

    /// See [`CollectionDefinition::build`].
    pub fn build<I, R>(records: I) -> Result<Self>
    where
        I: IntoIterator<Item = R>,
        R: Into<Record<M>>,
    {
        CollectionDefinition::for_model().build(records)
    }

    /// Adopts already built instances, in order.
    pub fn from_models(models: Vec<M>) -> Self {
        let mut collection = Self::new();
        collection.records = models;
        collection
    }

    /// See [`CollectionDefinition::build_json`].
    pub fn from_json(json: &serde_json::Value) -> Result<Self> {
        CollectionDefinition::for_model().build_json(json)
    }

    /// See [`CollectionDefinition::create`].
    pub fn create<I, R>(records: I) -> Result<Self>
    where
        I: IntoIterator<Item = R>,
        R: Into<Record<M>>,
    {
        CollectionDefinition::for_model().create(records)
    }

    /// See [`CollectionDefinition::create_strict`].
    pub fn create_strict<I, R>(records: I) -> Result<Self>
    where
        I: IntoIterator<Item = R>,
        R: Into<Record<M>>,
    {
        CollectionDefinition::for_model().create_strict(records)
    }

    /// Builds one more member from `attributes` and appends it.
    pub fn build_record(&mut self, attributes: Attributes) -> Result<&mut M> {
        let index = self.records.len();
        self.records.push(M::from_attributes(attributes)?);
        Ok(&mut self.records[index])
    }

    pub fn definition(&self) -> &CollectionDefinition<M> {
        &self.definition
    }

    pub fn name(&self) -> &str {
        self.definition.name()
    }

    pub fn model_type(&self) -> ModelType {
        self.definition.model_type()
    }

    /// Collection-level errors from the last validation.
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Blank collections are always invalid.
    pub fn is_blank(&self) -> bool {
        self.is_empty()
    }

    pub fn records(&self) -> &[M] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&M> {
        self.records.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut M> {
        self.records.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, M> {
        self.records.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, M> {
        self.records.iter_mut()
    }

    /// Independent copy of the members.
    pub fn to_vec(&self) -> Vec<M>
    where
        M: Clone,
    {
        self.records.clone()
    }

    pub fn into_records(self) -> Vec<M> {
        self.records
    }
}

impl<M: Model> Default for Collection<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Model + Clone> Clone for Collection<M> {
    fn clone(&self) -> Self {
        Self {
            definition: self.definition.clone(),
            records: self.records.clone(),
            errors: self.errors.clone(),
        }
    }
}

impl<M: Model + fmt::Debug> fmt::Debug for Collection<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection")
            .field("name", &self.name())
            .field("records", &self.records)
            .field("errors", &self.errors)
            .finish()
    }
}

impl<M: Model> IntoIterator for Collection<M> {
    type Item = M;
    type IntoIter = std::vec::IntoIter<M>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a, M: Model> IntoIterator for &'a Collection<M> {
    type Item = &'a M;
    type IntoIter = std::slice::Iter<'a, M>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl<'a, M: Model> IntoIterator for &'a mut Collection<M> {
    type Item = &'a mut M;
    type IntoIter = std::slice::IterMut<'a, M>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter_mut()
    }
}
