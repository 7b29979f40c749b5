use serde::{Deserialize, Serialize};
use crate::core::Result;

pub const DEFAULT_BLANK_MESSAGE: &str = "can't be blank";

fn default_blank_message() -> String {
    DEFAULT_BLANK_MESSAGE.to_string()
}

/// Collection type configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionConfig {
    /// Collection type name, used in logs and error messages
    pub name: String,

    /// Message recorded under `records` when validating an empty collection
    #[serde(default = "default_blank_message")]
    pub blank_message: String,

    /// Upper bound on member count, enforced as a collection-level rule
    #[serde(default)]
    pub max_records: Option<usize>,
}

impl CollectionConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            blank_message: default_blank_message(),
            max_records: None,
        }
    }

    /// Set the blank-collection message
    pub fn blank_message(mut self, message: impl Into<String>) -> Self {
        self.blank_message = message.into();
        self
    }

    /// Set the maximum member count
    pub fn max_records(mut self, max: usize) -> Self {
        self.max_records = Some(max);
        self
    }

    /// Parse from a JSON document
    ///
    /// ```
    /// # use model_collection::CollectionConfig;
    /// let config = CollectionConfig::from_json(r#"{"name": "books", "max_records": 50}"#).unwrap();
    /// assert_eq!(config.max_records, Some(50));
    /// assert_eq!(config.blank_message, "can't be blank");
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
