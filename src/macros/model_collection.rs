/// Declares a named collection type bound to one model type.
///
/// The generated type derefs to [`Collection`](crate::Collection) and carries
/// its own definition, so each declared collection type has an independent
/// binding, name and rule set.
///
/// ```ignore
/// model_collection!(pub BookCollection, Book);
/// model_collection!(pub ShortList, Book, |definition| definition.with_rule(CountRule::new(3)));
///
/// let books = BookCollection::create(params)?;
/// ```
#[macro_export]
macro_rules! model_collection {
    ($vis:vis $name:ident, $model:ty) => {
        $crate::model_collection!($vis $name, $model, |definition| definition);
    };
    ($vis:vis $name:ident, $model:ty, |$definition:ident| $configure:expr) => {
        $vis struct $name {
            inner: $crate::Collection<$model>,
        }

        impl $name {
            pub const NAME: &'static str = stringify!($name);

            /// Definition shared by every instance of this collection type.
            pub fn definition() -> $crate::CollectionDefinition<$model> {
                let $definition = $crate::CollectionDefinition::<$model>::new(
                    $crate::CollectionConfig::new(stringify!($name)),
                );
                $configure
            }

            /// Creates an empty collection.
            pub fn new() -> Self {
                Self {
                    inner: Self::definition().empty(),
                }
            }

            /// Builds members without saving them.
            pub fn build<I, R>(records: I) -> $crate::Result<Self>
            where
                I: IntoIterator<Item = R>,
                R: Into<$crate::Record<$model>>,
            {
                Self::definition().build(records).map(Self::from)
            }

            /// Builds from a JSON array of attribute objects.
            pub fn from_json(json: &$crate::serde_json::Value) -> $crate::Result<Self> {
                Self::definition().build_json(json).map(Self::from)
            }

            /// Builds and saves, returning the collection whatever the outcome.
            pub fn create<I, R>(records: I) -> $crate::Result<Self>
            where
                I: IntoIterator<Item = R>,
                R: Into<$crate::Record<$model>>,
            {
                Self::definition().create(records).map(Self::from)
            }

            /// Builds and saves, failing when the collection is not persisted.
            pub fn create_strict<I, R>(records: I) -> $crate::Result<Self>
            where
                I: IntoIterator<Item = R>,
                R: Into<$crate::Record<$model>>,
            {
                Self::definition().create_strict(records).map(Self::from)
            }

            /// Unwraps the underlying collection.
            pub fn into_inner(self) -> $crate::Collection<$model> {
                self.inner
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl ::std::fmt::Debug for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("name", &self.inner.name())
                    .field("records", &self.inner.len())
                    .field("errors", self.inner.errors())
                    .finish()
            }
        }

        impl From<$crate::Collection<$model>> for $name {
            fn from(inner: $crate::Collection<$model>) -> Self {
                Self { inner }
            }
        }

        impl ::std::ops::Deref for $name {
            type Target = $crate::Collection<$model>;

            fn deref(&self) -> &Self::Target {
                &self.inner
            }
        }

        impl ::std::ops::DerefMut for $name {
            fn deref_mut(&mut self) -> &mut Self::Target {
                &mut self.inner
            }
        }
    };
}
