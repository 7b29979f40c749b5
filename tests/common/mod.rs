#![allow(dead_code)]

use model_collection::{
    Attributes, BASE, Collection, Column, DataType, Model, Result, SaveOptions, Schema,
    ValidationErrors, Value, attributes,
};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::marker::PhantomData;

// Each test runs on its own thread, so thread-local storage isolates tests.
thread_local! {
    static SAVES: RefCell<HashMap<&'static str, usize>> = RefCell::new(HashMap::new());
    static ROWS: RefCell<HashMap<(&'static str, i64), Attributes>> = RefCell::new(HashMap::new());
    static NEXT_ID: Cell<i64> = const { Cell::new(0) };
    static FORM_ASSIGNS: Cell<usize> = const { Cell::new(0) };
}

/// Number of successful saves recorded for `model` on this thread.
pub fn persisted_count(model: &str) -> usize {
    SAVES.with(|saves| saves.borrow().get(model).copied().unwrap_or(0))
}

fn next_id() -> i64 {
    NEXT_ID.with(|next| {
        let id = next.get();
        next.set(id + 1);
        id
    })
}

pub trait Kind: 'static {
    const NAME: &'static str;
    fn schema() -> Schema;
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntryKind;

impl Kind for EntryKind {
    const NAME: &'static str = "Entry";

    fn schema() -> Schema {
        Schema::new(
            Self::NAME,
            vec![
                Column::new("integer_field", DataType::Integer).not_null(),
                Column::new("string_field", DataType::Text),
            ],
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookKind;

impl Kind for BookKind {
    const NAME: &'static str = "Book";

    fn schema() -> Schema {
        Schema::new(
            Self::NAME,
            vec![
                Column::new("isbn", DataType::Integer).not_null(),
                Column::new("synopsis", DataType::Text),
            ],
        )
    }
}

/// Schema-validated record persisted into a thread-local store.
#[derive(Debug, Clone, PartialEq)]
pub struct Stored<K> {
    id: i64,
    attributes: Attributes,
    errors: ValidationErrors,
    /// Number of times `validate` ran.
    pub validations: usize,
    /// Overrides the schema outcome when set.
    pub forced_validity: Option<bool>,
    /// Makes `save` return `false` without persisting.
    pub fail_save: bool,
    /// Context passed to the last `save` call.
    pub last_context: Option<String>,
    _kind: PhantomData<K>,
}

pub type Entry = Stored<EntryKind>;
pub type Book = Stored<BookKind>;

impl<K: Kind> Stored<K> {
    pub fn get(&self, name: &str) -> Value {
        self.attributes.get(name).cloned().unwrap_or(Value::Null)
    }

    pub fn key(&self) -> i64 {
        self.id
    }

    pub fn is_persisted(&self) -> bool {
        ROWS.with(|rows| rows.borrow().contains_key(&(K::NAME, self.id)))
    }

    /// Restores the last persisted attributes.
    pub fn reload(&mut self) -> &mut Self {
        if let Some(attributes) = ROWS.with(|rows| rows.borrow().get(&(K::NAME, self.id)).cloned()) {
            self.attributes = attributes;
        }
        self
    }
}

impl<K: Kind> Model for Stored<K> {
    fn model_name() -> &'static str {
        K::NAME
    }

    fn from_attributes(attributes: Attributes) -> Result<Self> {
        K::schema().check_known(&attributes)?;
        Ok(Self {
            id: next_id(),
            attributes,
            errors: ValidationErrors::new(),
            validations: 0,
            forced_validity: None,
            fail_save: false,
            last_context: None,
            _kind: PhantomData,
        })
    }

    fn attributes(&self) -> Attributes {
        self.attributes.clone()
    }

    fn id(&self) -> Value {
        Value::Integer(self.id)
    }

    fn validate(&mut self) -> bool {
        self.validations += 1;
        self.errors.clear();
        K::schema().validate(&self.attributes, &mut self.errors);
        match self.forced_validity {
            Some(true) => {
                self.errors.clear();
                true
            }
            Some(false) => {
                if self.errors.is_empty() {
                    self.errors.add(BASE, "Record is invalid");
                }
                false
            }
            None => self.errors.is_empty(),
        }
    }

    fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    fn assign_attributes(&mut self, attributes: &Attributes) -> Result<()> {
        K::schema().check_known(attributes)?;
        self.attributes
            .extend(attributes.iter().map(|(name, value)| (name.clone(), value.clone())));
        Ok(())
    }

    fn save(&mut self, options: &SaveOptions) -> bool {
        self.last_context = options.context.clone();
        if options.validate && !self.validate() {
            return false;
        }
        if self.fail_save {
            return false;
        }
        SAVES.with(|saves| *saves.borrow_mut().entry(K::NAME).or_insert(0) += 1);
        ROWS.with(|rows| {
            rows.borrow_mut()
                .insert((K::NAME, self.id), self.attributes.clone())
        });
        true
    }
}

pub fn valid_entry_params() -> Vec<Attributes> {
    (0..3)
        .map(|index| attributes! { "integer_field" => index, "string_field" => format!("Title {}", index) })
        .collect()
}

pub fn invalid_entry_params() -> Vec<Attributes> {
    (0..3)
        .map(|index| attributes! { "string_field" => format!("Title {}", index) })
        .collect()
}

pub fn mixed_entry_params() -> Vec<Attributes> {
    vec![
        attributes! { "integer_field" => 0 },
        attributes! {},
        attributes! { "integer_field" => 2 },
    ]
}

pub fn valid_book_params() -> Vec<Attributes> {
    (0..3)
        .map(|index| attributes! { "isbn" => 1000 + index, "synopsis" => format!("Synopsis {}", index) })
        .collect()
}

pub fn invalid_book_params() -> Vec<Attributes> {
    (0..3)
        .map(|index| attributes! { "synopsis" => format!("Synopsis {}", index) })
        .collect()
}

pub fn mixed_book_params() -> Vec<Attributes> {
    (0..3)
        .map(|index| {
            let isbn = if index % 2 == 1 { Some(1000 + index) } else { None };
            attributes! { "isbn" => isbn, "synopsis" => format!("Synopsis {}", index) }
        })
        .collect()
}

pub fn valid_book_updates() -> Vec<Attributes> {
    (0..3).map(|index| attributes! { "isbn" => 2000 + index }).collect()
}

pub fn invalid_book_updates() -> Vec<Attributes> {
    (0..3).map(|_| attributes! { "isbn" => Value::Null }).collect()
}

/// Saved collection of three valid books.
pub fn saved_books() -> Collection<Book> {
    let mut books = Collection::<Book>::build(valid_book_params()).unwrap();
    books.save_strict().unwrap();
    books
}

/// Form object mediating assignment onto a book.
pub struct BookForm<'a> {
    record: &'a mut Book,
}

impl<'a> BookForm<'a> {
    pub fn new(record: &'a mut Book) -> Self {
        Self { record }
    }

    pub fn assign_attributes(&mut self, attributes: &Attributes) -> Result<()> {
        FORM_ASSIGNS.with(|calls| calls.set(calls.get() + 1));
        self.record.assign_attributes(attributes)
    }
}

pub fn form_assign_count() -> usize {
    FORM_ASSIGNS.with(Cell::get)
}

pub fn assign_via_form(record: &mut Book, attributes: &Attributes) -> Result<()> {
    BookForm::new(record).assign_attributes(attributes)
}

/// Controller double: redirect on successful save, render otherwise.
#[derive(Debug, Default)]
pub struct MockController {
    pub redirects: usize,
    pub renders: usize,
}

impl MockController {
    pub fn create<M: Model>(&mut self, collection: &mut Collection<M>) {
        if collection.save() {
            self.redirects += 1;
        } else {
            self.renders += 1;
        }
    }
}
