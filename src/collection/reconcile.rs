use std::collections::{HashMap, HashSet};
use tracing::debug;
use crate::core::{Attributes, CollectionError, Result, Value};
use crate::model::Model;
use super::Collection;
use super::definition::attributes_from_json;

/// Bulk update input.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeUpdates {
    /// One attribute set per member, by position.
    Positional(Vec<Attributes>),
    /// Attribute sets addressed by member key.
    Keyed(Vec<(Value, Attributes)>),
}

impl AttributeUpdates {
    /// Arrays become positional updates, objects keyed ones.
    ///
    /// Object keys that parse as integers become integer keys.
    pub fn from_json(json: &serde_json::Value) -> Result<Self> {
        match json {
            serde_json::Value::Array(items) => Ok(Self::Positional(
                items.iter().map(attributes_from_json).collect::<Result<_>>()?,
            )),
            serde_json::Value::Object(entries) => Ok(Self::Keyed(
                entries
                    .iter()
                    .map(|(key, attributes)| {
                        attributes_from_json(attributes).map(|attributes| (json_key(key), attributes))
                    })
                    .collect::<Result<_>>()?,
            )),
            other => Err(CollectionError::argument(format!(
                "expected array or hash of attributes, got {}",
                other
            ))),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Positional(items) => items.len(),
            Self::Keyed(entries) => entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Exact match first, then the integer/text twin of the key, so `"4"` from a
/// JSON object still reaches a member keyed by text `"4"` and vice versa.
fn resolve_key(lookup: &HashMap<Value, usize>, key: &Value) -> Option<usize> {
    if let Some(index) = lookup.get(key) {
        return Some(*index);
    }
    let twin = match key {
        Value::Integer(i) => Value::Text(i.to_string()),
        Value::Text(s) => Value::Integer(s.trim().parse::<i64>().ok()?),
        _ => return None,
    };
    lookup.get(&twin).copied()
}

fn json_key(key: &str) -> Value {
    key.parse::<i64>()
        .map(Value::Integer)
        .unwrap_or_else(|_| Value::Text(key.to_string()))
}

impl From<Vec<Attributes>> for AttributeUpdates {
    fn from(items: Vec<Attributes>) -> Self {
        Self::Positional(items)
    }
}

impl From<Vec<(Value, Attributes)>> for AttributeUpdates {
    fn from(entries: Vec<(Value, Attributes)>) -> Self {
        Self::Keyed(entries)
    }
}

impl From<HashMap<Value, Attributes>> for AttributeUpdates {
    fn from(entries: HashMap<Value, Attributes>) -> Self {
        Self::Keyed(entries.into_iter().collect())
    }
}

/// How one attribute set is applied to one member.
///
/// Lets a form or adapter object mediate the assignment instead of the member
/// being mutated directly.
pub trait AssignStrategy<M>: Send + Sync {
    fn assign(&self, record: &mut M, attributes: &Attributes) -> Result<()>;
}

/// Calls the member's own [`Model::assign_attributes`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectAssign;

impl<M: Model> AssignStrategy<M> for DirectAssign {
    fn assign(&self, record: &mut M, attributes: &Attributes) -> Result<()> {
        record.assign_attributes(attributes)
    }
}

impl<M, F> AssignStrategy<M> for F
where
    F: Fn(&mut M, &Attributes) -> Result<()> + Send + Sync,
{
    fn assign(&self, record: &mut M, attributes: &Attributes) -> Result<()> {
        self(record, attributes)
    }
}

impl<M: Model> Collection<M> {
    /// Applies `updates` with the definition's assignment strategy.
    pub fn assign_attributes(&mut self, updates: impl Into<AttributeUpdates>) -> Result<()> {
        let assigner = self.definition.assigner();
        self.assign_attributes_with(updates, assigner.as_ref())
    }

    /// Applies `updates` through `strategy`.
    ///
    /// Every shape and key check runs before the first member is touched. A
    /// failure raised by `strategy` itself (e.g. an unknown attribute) stops
    /// the walk: members earlier in the update keep their new attributes and
    /// later ones are left as they were.
    pub fn assign_attributes_with(
        &mut self,
        updates: impl Into<AttributeUpdates>,
        strategy: &dyn AssignStrategy<M>,
    ) -> Result<()> {
        match updates.into() {
            AttributeUpdates::Positional(items) => self.assign_positional(items, strategy),
            AttributeUpdates::Keyed(entries) => self.assign_keyed(entries, strategy),
        }
    }

    /// Assigns, then saves with default options.
    pub fn update_attributes(&mut self, updates: impl Into<AttributeUpdates>) -> Result<bool> {
        let updates = updates.into();
        if matches!(&updates, AttributeUpdates::Positional(items) if items.is_empty()) {
            return Err(CollectionError::argument("expected non-empty array"));
        }
        self.assign_attributes(updates)?;
        Ok(self.save())
    }

    /// Alias of [`Collection::update_attributes`].
    pub fn update(&mut self, updates: impl Into<AttributeUpdates>) -> Result<bool> {
        self.update_attributes(updates)
    }

    fn assign_positional(
        &mut self,
        items: Vec<Attributes>,
        strategy: &dyn AssignStrategy<M>,
    ) -> Result<()> {
        if items.len() != self.records.len() {
            return Err(CollectionError::argument(format!(
                "wrong number of attribute sets ({} for {} records)",
                items.len(),
                self.records.len()
            )));
        }

        for (record, attributes) in self.records.iter_mut().zip(items.iter()) {
            strategy.assign(record, attributes)?;
        }
        debug!(collection = %self.name(), assigned = items.len(), "assigned attributes by position");
        Ok(())
    }

    fn assign_keyed(
        &mut self,
        entries: Vec<(Value, Attributes)>,
        strategy: &dyn AssignStrategy<M>,
    ) -> Result<()> {
        if entries.iter().any(|(key, _)| key.is_blank()) {
            return Err(CollectionError::argument("key can't be blank"));
        }

        let lookup = self.key_lookup()?;

        let mut seen = HashSet::new();
        let missing: Vec<String> = entries
            .iter()
            .map(|(key, _)| key)
            .filter(|key| resolve_key(&lookup, key).is_none() && seen.insert(*key))
            .map(ToString::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(CollectionError::argument(format!(
                "records not found for {} key(s): {}",
                missing.len(),
                missing.join(", ")
            )));
        }

        for (key, attributes) in &entries {
            if let Some(index) = resolve_key(&lookup, key) {
                strategy.assign(&mut self.records[index], attributes)?;
            }
        }
        debug!(collection = %self.name(), assigned = entries.len(), "assigned attributes by key");
        Ok(())
    }

    /// Key → member index. Members with a blank key cannot be addressed and are
    /// left out; two members sharing a key is an integrity fault.
    fn key_lookup(&self) -> Result<HashMap<Value, usize>> {
        let mut lookup = HashMap::with_capacity(self.records.len());
        for (index, record) in self.records.iter().enumerate() {
            let key = self.definition.extract_key(record);
            if key.is_blank() {
                continue;
            }
            if lookup.contains_key(&key) {
                return Err(CollectionError::DuplicateKey {
                    collection: self.name().to_string(),
                    key: key.to_string(),
                });
            }
            lookup.insert(key, index);
        }
        Ok(lookup)
    }
}
