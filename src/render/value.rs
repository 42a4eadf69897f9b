use crate::types::ast;
use crate::types::span::Span;
use crate::{Error, ErrorKind, Result, Value};

/// Look up a top level name in the context.
pub fn lookup_root<'a>(source: &str, context: &'a Value, ident: &ast::Ident) -> Result<&'a Value> {
    let name = &source[ident.span];
    match context {
        Value::Map(map) => map.get(name).ok_or_else(|| err_unknown(source, name, ident.span)),
        _ => Err(err_unknown(source, name, ident.span)),
    }
}

/// Index into the value with a map key.
pub fn lookup_key<'a>(source: &str, value: &'a Value, key: &str, span: Span) -> Result<&'a Value> {
    match value {
        Value::Map(map) => map.get(key).ok_or_else(|| err_unknown(source, key, span)),
        value => Err(Error::new(
            ErrorKind::UnknownIdentifier,
            format!("unknown identifier `{key}` in {}", value.human()),
            source,
            span,
        )),
    }
}

/// Index into the value with a list index, negative indexes count from the
/// end of the list.
pub fn lookup_index<'a>(
    source: &str,
    value: &'a Value,
    index: i64,
    span: Span,
) -> Result<&'a Value> {
    match value {
        Value::List(list) => {
            let len = list.len() as i64;
            let i = if index < 0 { len + index } else { index };
            usize::try_from(i)
                .ok()
                .and_then(|i| list.get(i))
                .ok_or_else(|| {
                    Error::new(
                        ErrorKind::IndexOutOfRange,
                        format!("index {index} out of range for list of length {len}"),
                        source,
                        span,
                    )
                })
        }
        value => Err(Error::new(
            ErrorKind::IndexOutOfRange,
            format!("index {index} out of range for {}", value.human()),
            source,
            span,
        )),
    }
}

/// Append the canonical text of a scalar value to the buffer.
///
/// Values are formatted as follows:
/// - [`Value::None`]: empty string
/// - [`Value::Bool`]: `true` or `false`
/// - [`Value::Integer`]: the integer formatted using [`Display`][std::fmt::Display]
/// - [`Value::Float`]: the float formatted using [`Display`][std::fmt::Display]
/// - [`Value::String`]: the string, unescaped
///
/// Errors if the value is a [`Value::List`] or [`Value::Map`].
pub fn write_text(buf: &mut String, source: &str, value: &Value, span: Span) -> Result<()> {
    match value {
        Value::None => {}
        Value::Bool(b) => buf.push_str(if *b { "true" } else { "false" }),
        Value::Integer(n) => buf.push_str(&n.to_string()),
        Value::Float(n) => buf.push_str(&n.to_string()),
        Value::String(s) => buf.push_str(s),
        value => {
            return Err(Error::new(
                ErrorKind::NonScalarResult,
                format!(
                    "expected a scalar value, but expression evaluated to {}",
                    value.human()
                ),
                source,
                span,
            ));
        }
    }
    Ok(())
}

fn err_unknown(source: &str, name: &str, span: Span) -> Error {
    Error::new(
        ErrorKind::UnknownIdentifier,
        format!("unknown identifier `{name}`"),
        source,
        span,
    )
}
