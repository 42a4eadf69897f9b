use unbrace::{value, Engine, ErrorKind};

#[test]
fn error_display_and_expr() {
    let err = Engine::new()
        .renderer("Hi {  missing }", &value! {})
        .to_string()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownIdentifier);
    assert_eq!(err.expr(), Some("missing"));
    assert_eq!(err.to_string(), "failed to evaluate `missing`: unknown identifier `missing`");
}

#[test]
fn error_pretty() {
    let err = Engine::new()
        .renderer("{ user.name / 0 }", &value! { user: { name: 1 } })
        .to_string()
        .unwrap_err();
    assert_eq!(
        format!("{:#}", err),
        "
  |
  | user.name / 0
  | ^^^^^^^^^^^^^ division by zero
"
    );
}

#[test]
fn error_pretty_points_at_member() {
    let err = Engine::new()
        .renderer("{user.nope}", &value! { user: {} })
        .to_string()
        .unwrap_err();
    assert_eq!(
        format!("{:#}", err),
        "
  |
  | user.nope
  |      ^^^^ unknown identifier `nope`
"
    );
}

#[test]
fn error_pretty_condition() {
    let err = Engine::new()
        .renderer("{if age >}", &value! { age: 1 })
        .to_string()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedExpression);
    assert_eq!(
        format!("{:#}", err),
        "
  |
  | if age >
  |         ^ expected expression, found end of expression
"
    );
}

#[test]
fn error_max_passes_has_no_expr() {
    let err = Engine::new()
        .renderer("{a}", &value! { a: "{a}" })
        .with_max_passes(2)
        .to_string()
        .unwrap_err();
    assert_eq!(err.expr(), None);
    assert_eq!(format!("{:#}", err), "render did not settle after 2 passes");
}

#[test]
fn error_is_std_error() {
    fn check(_: &dyn std::error::Error) {}
    let err = Engine::new()
        .renderer("{1/0}", &value! {})
        .to_string()
        .unwrap_err();
    check(&err);
    let cloned = err.clone();
    assert_eq!(cloned.to_string(), err.to_string());
}
