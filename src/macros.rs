/// Convenient macro for constructing a render context.
///
/// The top level is always a map. Keys are identifiers or string literals and
/// values are `None`, nested lists `[...]`, nested maps `{...}`, or any
/// expression that converts into a [`Value`][crate::Value].
///
/// # Examples
///
/// ```
/// let ctx = unbrace::value!{
///     user: {
///         name: "John Smith",
///         "favourite colours": ["red", "green"],
///     },
///     age: 42,
///     spouse: None,
/// };
/// ```
#[macro_export]
macro_rules! value {
    ($($tt:tt)*) => {
        $crate::_value!({ $($tt)* })
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! _value {
    // Munch the elements of a list `[...]` into an accumulator, then produce
    // a vector of the elements.
    (@list [$($elems:expr,)*]) => {
        ::std::vec![$($elems,)*]
    };
    (@list [$($elems:expr,)*] , $($rest:tt)*) => {
        $crate::_value!(@list [$($elems,)*] $($rest)*)
    };
    (@list [$($elems:expr,)*] None $($rest:tt)*) => {
        $crate::_value!(@list [$($elems,)* $crate::Value::None,] $($rest)*)
    };
    (@list [$($elems:expr,)*] [$($list:tt)*] $($rest:tt)*) => {
        $crate::_value!(@list [$($elems,)* $crate::_value!([$($list)*]),] $($rest)*)
    };
    (@list [$($elems:expr,)*] {$($map:tt)*} $($rest:tt)*) => {
        $crate::_value!(@list [$($elems,)* $crate::_value!({$($map)*}),] $($rest)*)
    };
    (@list [$($elems:expr,)*] $next:expr , $($rest:tt)*) => {
        $crate::_value!(@list [$($elems,)* $crate::Value::from($next),] $($rest)*)
    };
    (@list [$($elems:expr,)*] $last:expr) => {
        $crate::_value!(@list [$($elems,)* $crate::Value::from($last),])
    };

    // Munch the entries of a map `{...}`, inserting each into `$map`.
    (@map $map:ident) => {};
    (@map $map:ident , $($rest:tt)*) => {
        $crate::_value!(@map $map $($rest)*);
    };
    (@map $map:ident $key:tt : None $($rest:tt)*) => {
        let _ = $map.insert($crate::_value_key!($key), $crate::Value::None);
        $crate::_value!(@map $map $($rest)*);
    };
    (@map $map:ident $key:tt : [$($list:tt)*] $($rest:tt)*) => {
        let _ = $map.insert($crate::_value_key!($key), $crate::_value!([$($list)*]));
        $crate::_value!(@map $map $($rest)*);
    };
    (@map $map:ident $key:tt : {$($inner:tt)*} $($rest:tt)*) => {
        let _ = $map.insert($crate::_value_key!($key), $crate::_value!({$($inner)*}));
        $crate::_value!(@map $map $($rest)*);
    };
    (@map $map:ident $key:tt : $value:expr , $($rest:tt)*) => {
        let _ = $map.insert($crate::_value_key!($key), $crate::Value::from($value));
        $crate::_value!(@map $map $($rest)*);
    };
    (@map $map:ident $key:tt : $value:expr) => {
        let _ = $map.insert($crate::_value_key!($key), $crate::Value::from($value));
    };

    (None) => {
        $crate::Value::None
    };
    ([]) => {
        $crate::Value::List($crate::value::List::new())
    };
    ([ $($tt:tt)+ ]) => {
        $crate::Value::List($crate::_value!(@list [] $($tt)+))
    };
    ({}) => {
        $crate::Value::Map($crate::value::Map::new())
    };
    ({ $($tt:tt)+ }) => {
        $crate::Value::Map({
            let mut map = $crate::value::Map::new();
            $crate::_value!(@map map $($tt)+);
            map
        })
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! _value_key {
    ($key:ident) => {
        ::std::string::String::from(::std::stringify!($key))
    };
    ($key:literal) => {
        ::std::string::String::from($key)
    };
}

#[cfg(test)]
mod tests {
    use crate::value::{List, Map};
    use crate::Value;

    #[test]
    fn value_empty() {
        assert_eq!(value! {}, Value::Map(Map::new()));
    }

    #[test]
    fn value_scalars() {
        let v = value! { a: None, b: true, c: 1, d: 1.5, e: "x", f: String::from("y") };
        let exp = Value::from([
            ("a", Value::None),
            ("b", Value::Bool(true)),
            ("c", Value::Integer(1)),
            ("d", Value::Float(1.5)),
            ("e", Value::from("x")),
            ("f", Value::from("y")),
        ]);
        assert_eq!(v, exp);
    }

    #[test]
    fn value_list() {
        let v = value! { items: ["x", None, {}, [], 1 + 1] };
        let exp = Value::from([(
            "items",
            Value::from([
                Value::from("x"),
                Value::None,
                Value::Map(Map::new()),
                Value::List(List::new()),
                Value::Integer(2),
            ]),
        )]);
        assert_eq!(v, exp);
    }

    #[test]
    fn value_nested_map_trailing_comma() {
        let v = value! {
            user: {
                name: "Ann",
                "home town": "Cape Town",
            },
        };
        let exp = Value::from([(
            "user",
            Value::from([("name", "Ann"), ("home town", "Cape Town")]),
        )]);
        assert_eq!(v, exp);
    }
}
