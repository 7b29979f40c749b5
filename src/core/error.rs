use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CollectionError {
    #[error("Argument error: {0}")]
    ArgumentError(String),

    #[error("Model is already set for collection '{collection}' (bound to {model})")]
    ModelAlreadySet { collection: String, model: String },

    #[error("Model is not set for collection '{0}'")]
    ModelNotSet(String),

    #[error("Collection '{collection}' is bound to {bound}, not {requested}")]
    ModelMismatch {
        collection: String,
        bound: String,
        requested: String,
    },

    #[error("Uninitialized model: {0}")]
    UnknownModel(String),

    #[error("Duplicate key {key} in collection '{collection}'")]
    DuplicateKey { collection: String, key: String },

    #[error("Unable to persist collection: {0}")]
    PersistFailed(String),

    #[error("Unable to persist {model}: {messages}")]
    RecordInvalid { model: String, messages: String },

    #[error("Unknown attribute '{attribute}' for {model}")]
    UnknownAttribute { model: String, attribute: String },

    #[error("Type mismatch: {0}")]
    TypeMismatch(String),
}

impl CollectionError {
    /// Shape errors: wrong input type, wrong length, empty where non-empty is required.
    pub fn is_argument_error(&self) -> bool {
        matches!(self, Self::ArgumentError(_))
    }

    /// Integrity or programmer misuse: double binding, duplicate reconciliation keys.
    pub fn is_state_error(&self) -> bool {
        matches!(
            self,
            Self::ModelAlreadySet { .. }
                | Self::ModelNotSet(_)
                | Self::ModelMismatch { .. }
                | Self::DuplicateKey { .. }
        )
    }

    pub(crate) fn argument(message: impl Into<String>) -> Self {
        Self::ArgumentError(message.into())
    }
}

pub type Result<T> = std::result::Result<T, CollectionError>;

impl From<serde_json::Error> for CollectionError {
    fn from(err: serde_json::Error) -> Self {
        Self::ArgumentError(format!("invalid JSON: {}", err))
    }
}
