//! Member model protocol.
//!
//! A collection never talks to storage: it only calls the capabilities below on
//! each of its members. SQL tables, document stores or plain in-memory maps all
//! plug in by implementing [`Model`].

pub mod registry;

pub use registry::{CollectionRegistry, ModelRef, ModelRegistry, ModelType};

use crate::core::{Attributes, CollectionError, Result, ValidationErrors, Value};

/// Options forwarded from an aggregate save to every member save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOptions {
    /// Run validation before persisting. Defaults to `true`.
    pub validate: bool,

    /// Optional validation context (e.g. `"create"` or `"update"`).
    pub context: Option<String>,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            validate: true,
            context: None,
        }
    }
}

impl SaveOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Persist without validating first.
    pub fn skip_validation() -> Self {
        Self::default().validate(false)
    }

    pub fn validate(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

/// Capabilities a record type must expose to be managed by a collection.
pub trait Model: Sized + 'static {
    /// Name used for by-name binding and in error messages.
    fn model_name() -> &'static str;

    /// Builds a new, unsaved instance from a raw parameter record.
    fn from_attributes(attributes: Attributes) -> Result<Self>;

    /// Current attribute values.
    fn attributes(&self) -> Attributes;

    /// Identity key used to reconcile keyed updates.
    fn id(&self) -> Value;

    /// Runs the record's own rules and repopulates [`Model::errors`].
    fn validate(&mut self) -> bool;

    fn errors(&self) -> &ValidationErrors;

    fn assign_attributes(&mut self, attributes: &Attributes) -> Result<()>;

    /// Persists the record, returning `false` when it was not saved.
    fn save(&mut self, options: &SaveOptions) -> bool;

    /// Like [`Model::save`] but fails instead of returning `false`.
    fn save_strict(&mut self, options: &SaveOptions) -> Result<()> {
        if self.save(options) {
            Ok(())
        } else {
            Err(CollectionError::RecordInvalid {
                model: Self::model_name().to_string(),
                messages: self.errors().full_messages().join(", "),
            })
        }
    }
}
