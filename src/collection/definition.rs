use std::fmt;
use std::sync::Arc;
use tracing::{Level, event};
use crate::core::{Attributes, CollectionError, Result, ValidationErrors, Value};
use crate::model::{Model, ModelType};
use super::reconcile::{AssignStrategy, DirectAssign};
use super::{Collection, CollectionConfig, RECORDS, Record};

/// Collection-level validation rule, run before members are asked to validate.
pub trait CollectionRule<M>: Send + Sync {
    fn check(&self, records: &[M], errors: &mut ValidationErrors);
}

impl<M, F> CollectionRule<M> for F
where
    F: Fn(&[M], &mut ValidationErrors) + Send + Sync,
{
    fn check(&self, records: &[M], errors: &mut ValidationErrors) {
        self(records, errors)
    }
}

/// Caps the number of members.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountRule {
    pub maximum: usize,
}

impl CountRule {
    pub fn new(maximum: usize) -> Self {
        Self { maximum }
    }
}

impl<M> CollectionRule<M> for CountRule {
    fn check(&self, records: &[M], errors: &mut ValidationErrors) {
        if records.len() > self.maximum {
            errors.add(
                RECORDS,
                format!("is too long (maximum is {} records)", self.maximum),
            );
        }
    }
}

type KeyFn<M> = dyn Fn(&M) -> Value + Send + Sync;

/// A collection type: its bound member type plus everything its instances share.
///
/// Cloning is cheap; rules, the key extractor and the assignment strategy are
/// reference counted.
pub struct CollectionDefinition<M: Model> {
    config: CollectionConfig,
    rules: Vec<Arc<dyn CollectionRule<M>>>,
    key: Arc<KeyFn<M>>,
    assigner: Arc<dyn AssignStrategy<M>>,
}

impl<M: Model> CollectionDefinition<M> {
    pub fn new(config: CollectionConfig) -> Self {
        let mut rules: Vec<Arc<dyn CollectionRule<M>>> = Vec::new();
        if let Some(maximum) = config.max_records {
            rules.push(Arc::new(CountRule::new(maximum)));
        }
        Self {
            config,
            rules,
            key: Arc::new(|record: &M| record.id()),
            assigner: Arc::new(DirectAssign),
        }
    }

    /// Default definition, named after the member type (`BookCollection`).
    pub fn for_model() -> Self {
        Self::new(CollectionConfig::new(format!("{}Collection", M::model_name())))
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &CollectionConfig {
        &self.config
    }

    pub fn model_type(&self) -> ModelType {
        ModelType::of::<M>()
    }

    pub fn rules(&self) -> &[Arc<dyn CollectionRule<M>>] {
        &self.rules
    }

    pub fn with_rule(mut self, rule: impl CollectionRule<M> + 'static) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    /// Replaces the key used for keyed updates (default: [`Model::id`]).
    pub fn with_key<F>(mut self, key: F) -> Self
    where
        F: Fn(&M) -> Value + Send + Sync + 'static,
    {
        self.key = Arc::new(key);
        self
    }

    /// Replaces the default per-member assignment (direct `assign_attributes`).
    pub fn with_assigner(mut self, assigner: impl AssignStrategy<M> + 'static) -> Self {
        self.assigner = Arc::new(assigner);
        self
    }

    /// A narrower collection type: same member type, starts from this one's
    /// rules, key and assigner, carries its own name.
    pub fn derive(&self, name: impl Into<String>) -> Self {
        let mut derived = self.clone();
        derived.config.name = name.into();
        derived
    }

    pub fn extract_key(&self, record: &M) -> Value {
        (self.key)(record)
    }

    pub(crate) fn assigner(&self) -> Arc<dyn AssignStrategy<M>> {
        Arc::clone(&self.assigner)
    }

    /// Empty collection of this type.
    pub fn empty(&self) -> Collection<M> {
        Collection::with_definition(self.clone())
    }

    /// Builds members in memory without saving them.
    ///
    /// When every element is already an instance they are adopted in order;
    /// otherwise each element is built through [`Model::from_attributes`].
    pub fn build<I, R>(&self, records: I) -> Result<Collection<M>>
    where
        I: IntoIterator<Item = R>,
        R: Into<Record<M>>,
    {
        let records: Vec<Record<M>> = records.into_iter().map(Into::into).collect();
        let mut collection = self.empty();

        if records.iter().all(Record::is_instance) {
            collection.records = records
                .into_iter()
                .filter_map(Record::into_instance)
                .collect();
        } else {
            collection.records = records
                .into_iter()
                .map(|record| M::from_attributes(record.into_attributes()))
                .collect::<Result<Vec<M>>>()?;
        }

        event!(
            Level::DEBUG,
            collection = %self.name(),
            records = collection.records.len(),
            "built collection"
        );
        Ok(collection)
    }

    /// Builds from a JSON array of attribute objects.
    pub fn build_json(&self, json: &serde_json::Value) -> Result<Collection<M>> {
        self.build(params_from_json(json)?)
    }

    /// Builds and saves; the collection is returned whatever the save outcome.
    pub fn create<I, R>(&self, records: I) -> Result<Collection<M>>
    where
        I: IntoIterator<Item = R>,
        R: Into<Record<M>>,
    {
        let mut collection = self.build(non_empty(records)?)?;
        collection.save();
        Ok(collection)
    }

    /// Builds and saves, failing when the collection could not be persisted.
    pub fn create_strict<I, R>(&self, records: I) -> Result<Collection<M>>
    where
        I: IntoIterator<Item = R>,
        R: Into<Record<M>>,
    {
        let mut collection = self.build(non_empty(records)?)?;
        collection.save_strict()?;
        Ok(collection)
    }

    pub fn create_json(&self, json: &serde_json::Value) -> Result<Collection<M>> {
        self.create(params_from_json(json)?)
    }

    pub fn create_json_strict(&self, json: &serde_json::Value) -> Result<Collection<M>> {
        self.create_strict(params_from_json(json)?)
    }
}

impl<M: Model> Clone for CollectionDefinition<M> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            rules: self.rules.clone(),
            key: Arc::clone(&self.key),
            assigner: Arc::clone(&self.assigner),
        }
    }
}

impl<M: Model> Default for CollectionDefinition<M> {
    fn default() -> Self {
        Self::for_model()
    }
}

impl<M: Model> fmt::Debug for CollectionDefinition<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionDefinition")
            .field("config", &self.config)
            .field("model", &M::model_name())
            .field("rules", &self.rules.len())
            .finish_non_exhaustive()
    }
}

fn non_empty<I, R>(records: I) -> Result<Vec<R>>
where
    I: IntoIterator<Item = R>,
{
    let records: Vec<R> = records.into_iter().collect();
    if records.is_empty() {
        return Err(CollectionError::argument("expected non-empty array"));
    }
    Ok(records)
}

/// Converts a JSON array of objects into parameter records.
///
/// The whole document is checked before anything is built.
pub(crate) fn params_from_json(json: &serde_json::Value) -> Result<Vec<Attributes>> {
    let items = json.as_array().ok_or_else(|| {
        CollectionError::argument("expected array of params hashes or model objects")
    })?;
    items.iter().map(attributes_from_json).collect()
}

pub(crate) fn attributes_from_json(json: &serde_json::Value) -> Result<Attributes> {
    let object = json.as_object().ok_or_else(|| {
        CollectionError::argument(format!("expected params hash, got {}", json))
    })?;
    object
        .iter()
        .map(|(name, value)| Value::try_from(value).map(|value| (name.clone(), value)))
        .collect()
}
