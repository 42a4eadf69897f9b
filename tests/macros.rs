use unbrace::value::{List, Map};
use unbrace::{value, Value};

#[test]
fn value_macro_keys() {
    let v = value! { plain: 1, "with space": 2 };
    let mut exp = Map::new();
    exp.insert(String::from("plain"), Value::Integer(1));
    exp.insert(String::from("with space"), Value::Integer(2));
    assert_eq!(v, Value::Map(exp));
}

#[test]
fn value_macro_expressions() {
    let name = String::from("Ann");
    let items = vec![1, 2, 3];
    let v = value! {
        name: name.clone(),
        len: items.len() as i64,
        items: items,
        first: [name.as_str(), "b"],
        empty: [],
    };
    assert_eq!(
        v,
        Value::from([
            ("name", Value::from("Ann")),
            ("len", Value::Integer(3)),
            ("items", Value::from([1, 2, 3])),
            ("first", Value::from(["Ann", "b"])),
            ("empty", Value::List(List::new())),
        ])
    );
}

#[test]
fn value_macro_renders() {
    let ctx = value! { user: { name: "Ann", langs: ["rust", "c"] } };
    assert_eq!(unbrace::render("{user.name}: {user.langs[0]}", &ctx), "Ann: rust");
}
