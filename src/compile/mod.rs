//! Turns the text of a span into something the renderer can evaluate.
//!
//! This process has three stages:
//! - The scanner finds the spans in the text being rendered.
//! - The lexer chunks the trimmed span content into tokens.
//! - The parser constructs an expression AST from the token stream.

mod lex;
mod parse;
pub mod scan;

pub use crate::compile::scan::{Match, Scanner, Spans};
use crate::types::ast;
use crate::Result;

/// Classifies and parses the trimmed content of a span.
///
/// `if <cond>` spans have their condition parsed, `elif ...` and `else...`
/// spans are not parsed at all, everything else is a value expression.
pub fn span(expr: &str) -> Result<ast::Stmt> {
    if let Some(cond) = expr.strip_prefix("if ") {
        let offset = expr.len() - cond.len();
        let cond = parse::Parser::with_offset(expr, offset).parse()?;
        return Ok(ast::Stmt::Cond(cond));
    }
    if expr.starts_with("elif ") || expr.starts_with("else") {
        return Ok(ast::Stmt::Continuation);
    }
    let expr = parse::Parser::new(expr).parse()?;
    Ok(ast::Stmt::Value(expr))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_classify() {
        assert!(matches!(span("if age > 25").unwrap(), ast::Stmt::Cond(_)));
        assert!(matches!(span("elif ((").unwrap(), ast::Stmt::Continuation));
        assert!(matches!(span("else").unwrap(), ast::Stmt::Continuation));
        assert!(matches!(span("endif").unwrap(), ast::Stmt::Value(_)));
        assert!(matches!(span("iffy").unwrap(), ast::Stmt::Value(_)));
    }

    #[test]
    fn span_condition_error_shows_full_text() {
        let err = match span("if (age") {
            Ok(_) => panic!("expected error"),
            Err(err) => err,
        };
        assert_eq!(
            err.to_string(),
            "failed to evaluate `if (age`: expected close parenthesis, found end of expression"
        );
    }
}
