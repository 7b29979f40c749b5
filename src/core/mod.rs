pub mod error;
pub mod types;
pub mod validation;
pub mod value;

pub use error::{CollectionError, Result};
pub use types::{Attributes, Column, DataType, Schema};
pub use validation::{BASE, ValidationErrors};
pub use value::Value;
