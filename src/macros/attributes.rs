/// Builds an [`Attributes`](crate::core::Attributes) map.
///
/// ```
/// use model_collection::{Value, attributes};
///
/// let params = attributes! { "isbn" => 1000, "synopsis" => "Synopsis 0" };
/// assert_eq!(params["isbn"], Value::Integer(1000));
/// assert!(attributes! {}.is_empty());
/// ```
#[macro_export]
macro_rules! attributes {
    () => {
        $crate::core::Attributes::new()
    };
    ($($name:expr => $value:expr),+ $(,)?) => {{
        let mut attributes = $crate::core::Attributes::new();
        $(
            attributes.insert(
                ::std::string::String::from($name),
                $crate::core::Value::from($value),
            );
        )+
        attributes
    }};
}
