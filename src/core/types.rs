use std::collections::BTreeMap;
use super::{CollectionError, Result, ValidationErrors, Value};

/// Raw parameter record: attribute name → value.
pub type Attributes = BTreeMap<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Integer,
    Float,
    Text,
    Boolean,
}

impl DataType {
    pub fn is_compatible(&self, value: &Value) -> bool {
        match (self, value) {
            (_, Value::Null) => true,
            (Self::Integer, Value::Integer(_)) => true,
            (Self::Float, Value::Float(_)) => true,
            (Self::Float, Value::Integer(_)) => true,
            (Self::Text, Value::Text(_)) => true,
            (Self::Boolean, Value::Boolean(_)) => true,
            _ => false,
        }
    }

    fn mismatch_message(&self) -> &'static str {
        match self {
            Self::Integer => "is not an integer",
            Self::Float => "is not a number",
            Self::Text => "is not a string",
            Self::Boolean => "is not a boolean",
        }
    }
}

/// Declared attribute of a member type.
#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub data_type: DataType,
    pub nullable: bool,
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable: true,
        }
    }

    /// Presence is required: `NULL` and blank text are rejected.
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Returns the validation message for `value`, if any.
    pub fn check(&self, value: &Value) -> Option<&'static str> {
        if value.is_blank() && !self.nullable {
            return Some("can't be blank");
        }
        if !self.data_type.is_compatible(value) {
            return Some(self.data_type.mismatch_message());
        }
        None
    }
}

/// Attribute declarations a member type can validate itself against.
#[derive(Debug, Clone)]
pub struct Schema {
    model: String,
    columns: Vec<Column>,
}

impl Schema {
    pub fn new(model: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            model: model.into(),
            columns,
        }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn get_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|col| col.name == name)
    }

    /// Fails on the first attribute the schema does not declare.
    pub fn check_known(&self, attributes: &Attributes) -> Result<()> {
        match attributes.keys().find(|name| self.get_column(name).is_none()) {
            Some(name) => Err(CollectionError::UnknownAttribute {
                model: self.model.clone(),
                attribute: name.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Records a message per failing column; missing attributes count as `NULL`.
    pub fn validate(&self, attributes: &Attributes, errors: &mut ValidationErrors) {
        for column in &self.columns {
            let value = attributes.get(&column.name).unwrap_or(&Value::Null);
            if let Some(message) = column.check(value) {
                errors.add(column.name.clone(), message);
            }
        }
    }
}
