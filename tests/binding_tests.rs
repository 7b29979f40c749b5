mod common;

use common::*;
use model_collection::{
    CollectionError, CollectionRegistry, CountRule, Model, ModelRegistry, ModelType, RECORDS,
    Record, Value, attributes, model_collection,
};
use serde_json::json;

model_collection!(pub EntryCollection, Entry);
model_collection!(pub BookCollection, Book);
model_collection!(pub ShortList, Book, |definition| definition.with_rule(CountRule::new(2)));

fn registry() -> CollectionRegistry {
    let mut models = ModelRegistry::new();
    models.register::<Entry>();
    models.register::<Book>();
    CollectionRegistry::new(models)
}

// ============================================================================
// Registry binding
// ============================================================================

#[test]
fn test_model_registry_resolves_names() {
    let models = registry();
    assert!(models.models().contains("Book"));
    assert_eq!(models.models().list_models(), vec!["Book", "Entry"]);

    let book = models.models().resolve("Book").unwrap();
    assert!(book.is::<Book>());
    assert!(!book.is::<Entry>());
    assert_eq!(book.to_string(), "Book");
}

#[test]
fn test_bind_by_type() {
    let mut registry = registry();
    assert!(registry.model("Library").is_none());

    let bound = registry.bind("Library", ModelType::of::<Book>()).unwrap();
    assert_eq!(bound, ModelType::of::<Book>());
    assert_eq!(registry.model("Library"), Some(ModelType::of::<Book>()));
}

#[test]
fn test_bind_by_name() {
    let mut registry = registry();
    registry.bind("Journal", "Entry").unwrap();
    assert!(registry.model("Journal").unwrap().is::<Entry>());
}

#[test]
fn test_bind_by_unregistered_type() {
    let mut registry = CollectionRegistry::new(ModelRegistry::new());
    registry.bind("Library", ModelType::of::<Book>()).unwrap();
    assert!(registry.definition::<Book>("Library").is_ok());
}

#[test]
fn test_bind_unknown_name() {
    let mut registry = registry();
    let err = registry.bind("Library", "Magazine").unwrap_err();
    assert_eq!(err, CollectionError::UnknownModel("Magazine".to_string()));
    assert!(err.to_string().contains("Uninitialized model"));
    assert!(registry.model("Library").is_none());
}

#[test]
fn test_bind_blank_name() {
    let mut registry = registry();
    for blank in ["", "   "] {
        let err = registry.bind("Library", blank).unwrap_err();
        assert!(err.is_argument_error());
    }
    let err = registry.bind("", "Book").unwrap_err();
    assert!(err.is_argument_error());
}

#[test]
fn test_bind_is_write_once() {
    let mut registry = registry();
    registry.bind("Library", "Book").unwrap();

    let err = registry.bind("Library", "Entry").unwrap_err();
    assert!(matches!(err, CollectionError::ModelAlreadySet { .. }));
    assert!(err.is_state_error());
    assert!(err.to_string().contains("already set"));

    // same model again is still a second binding
    let err = registry.bind("Library", ModelType::of::<Book>()).unwrap_err();
    assert!(matches!(err, CollectionError::ModelAlreadySet { .. }));

    assert!(registry.model("Library").unwrap().is::<Book>());
}

#[test]
fn test_unknown_name_reported_before_already_set() {
    let mut registry = registry();
    registry.bind("Library", "Book").unwrap();
    let err = registry.bind("Library", "Magazine").unwrap_err();
    assert!(matches!(err, CollectionError::UnknownModel(_)));
}

#[test]
fn test_bindings_are_independent() {
    let mut registry = registry();
    registry.bind("Library", "Book").unwrap();
    registry.bind("Journal", "Entry").unwrap();
    registry.bind("Archive", "Book").unwrap();

    assert!(registry.model("Library").unwrap().is::<Book>());
    assert!(registry.model("Journal").unwrap().is::<Entry>());
    assert!(registry.model("Archive").unwrap().is::<Book>());
}

#[test]
fn test_definition_requires_binding() {
    let registry = registry();
    let err = registry.definition::<Book>("Library").unwrap_err();
    assert_eq!(err, CollectionError::ModelNotSet("Library".to_string()));
    assert!(err.is_state_error());
}

#[test]
fn test_definition_checks_member_type() -> anyhow::Result<()> {
    let mut registry = registry();
    registry.bind("Library", "Book")?;

    let err = registry.definition::<Entry>("Library").unwrap_err();
    assert!(matches!(err, CollectionError::ModelMismatch { .. }));

    let definition = registry.definition::<Book>("Library")?;
    assert_eq!(definition.name(), "Library");
    assert!(definition.model_type().is::<Book>());

    let books = definition.build(valid_book_params())?;
    assert_eq!(books.name(), "Library");
    assert_eq!(books.len(), 3);
    Ok(())
}

// ============================================================================
// Declared collection types
// ============================================================================

#[test]
fn test_declared_collections_carry_their_binding() {
    assert_eq!(BookCollection::NAME, "BookCollection");
    assert!(BookCollection::definition().model_type().is::<Book>());
    assert!(EntryCollection::definition().model_type().is::<Entry>());

    let books = BookCollection::new();
    assert!(books.is_empty());
    assert_eq!(books.name(), "BookCollection");
}

#[test]
fn test_declared_collection_build_and_save() -> anyhow::Result<()> {
    let mut entries = EntryCollection::build(valid_entry_params())?;
    assert_eq!(entries.len(), 3);
    assert!(entries.save());
    assert_eq!(persisted_count("Entry"), 3);

    let entries = entries.into_inner();
    assert_eq!(entries.records()[0].get("integer_field"), Value::Integer(0));
    Ok(())
}

#[test]
fn test_declared_collection_from_json() {
    let books = BookCollection::from_json(&json!([{"isbn": 1}, {"isbn": 2}])).unwrap();
    assert_eq!(books.len(), 2);

    let err = BookCollection::from_json(&json!({"isbn": 1})).unwrap_err();
    assert!(err.is_argument_error());
}

#[test]
fn test_declared_collection_create() {
    let books = BookCollection::create(valid_book_params()).unwrap();
    assert!(books.iter().all(|book| book.is_persisted()));

    let err = BookCollection::create(Vec::<Record<Book>>::new()).unwrap_err();
    assert!(err.is_argument_error());

    let err = BookCollection::create_strict(invalid_book_params()).unwrap_err();
    assert!(matches!(err, CollectionError::PersistFailed(_)));
    assert_eq!(persisted_count("Book"), 3);
}

#[test]
fn test_declared_subtype_rules_stay_local() {
    let mut short = ShortList::build(valid_book_params()).unwrap();
    assert!(!short.validate());
    assert!(short.errors().get(RECORDS)[0].contains("maximum is 2"));

    let mut books = BookCollection::build(valid_book_params()).unwrap();
    assert!(books.validate());
    assert!(BookCollection::definition().rules().is_empty());
}

#[test]
fn test_declared_collection_accepts_instances() {
    let book = Book::from_attributes(attributes! { "isbn" => 5 }).unwrap();
    let books = BookCollection::build(vec![Record::Instance(book.clone())]).unwrap();
    assert_eq!(books.records()[0], book);
}

#[test]
fn test_declared_collection_from_collection() {
    let collection = BookCollection::definition().build(valid_book_params()).unwrap();
    let books = BookCollection::from(collection);
    assert_eq!(books.len(), 3);
    assert_eq!(BookCollection::default().len(), 0);
}

#[test]
fn test_declared_collection_debug_output() {
    let books = BookCollection::build(valid_book_params()).unwrap();
    let output = format!("{:?}", books);
    assert!(output.starts_with("BookCollection"));
    assert!(output.contains("records: 3"));

    let err = BookCollection::create(Vec::<Record<Book>>::new()).unwrap_err();
    assert!(err.is_argument_error());
}
