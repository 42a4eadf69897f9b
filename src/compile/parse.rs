use std::fmt::Display;

use crate::compile::lex::{Lexer, Token};
use crate::types::ast;
use crate::types::span::Span;
use crate::{Error, Result, Value};

/// A parser that constructs an expression AST from a token stream.
///
/// Binary operators are parsed using precedence climbing, see
/// [`BinaryOp::precedence`][ast::BinaryOp::precedence]. The parser sometimes
/// needs to peek at the next token to know how to proceed and uses the
/// `peeked` buffer to do this.
pub struct Parser<'source> {
    /// A lexer that tokenizes the expression text.
    tokens: Lexer<'source>,

    /// Remember a peeked value, even if it was `None`
    peeked: Option<Option<(Token, Span)>>,

    /// How deeply the expression currently being parsed is nested.
    depth: usize,
}

#[derive(Clone, Copy)]
enum Sign {
    Neg,
    Pos,
}

/// The binding power of `not`, it binds looser than comparisons.
const NOT_PRECEDENCE: u8 = 3;

/// The maximum nesting of parentheses, subscripts, unary operators and
/// chained binary operators in a single expression.
const MAX_DEPTH: usize = 128;

impl<'source> Parser<'source> {
    /// Construct a new parser.
    pub fn new(source: &'source str) -> Self {
        Self::with_offset(source, 0)
    }

    /// Construct a new parser that starts parsing at `offset`.
    pub fn with_offset(source: &'source str, offset: usize) -> Self {
        Self {
            tokens: Lexer::with_offset(source, offset),
            peeked: None,
            depth: 0,
        }
    }

    /// Parses a complete expression, all input must be consumed.
    pub fn parse(mut self) -> Result<ast::Expr> {
        let expr = self.parse_expr(0)?;
        match self.next()? {
            None => Ok(expr),
            Some((tk, span)) => Err(self.err_unexpected_token("end of expression", tk, span)),
        }
    }

    /// Parses an expression whose binary operators bind at least as tightly
    /// as `min`.
    ///
    ///   age > 25 and name == "Ann"
    ///
    fn parse_expr(&mut self, min: u8) -> Result<ast::Expr> {
        let mut lhs = self.parse_prefix()?;
        let mut chain = 0;
        while let Some(op) = self.peek_binary_op()? {
            let prec = op.precedence();
            if prec < min {
                break;
            }
            // Each operator in a chain nests the left hand side one level.
            self.enter(lhs.span())?;
            chain += 1;
            self.next()?;
            let rhs = self.parse_expr(prec + 1)?;
            let span = lhs.span().combine(rhs.span());
            lhs = ast::Expr::Binary(ast::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                span,
            });
        }
        self.depth -= chain;
        Ok(lhs)
    }

    /// Parses a unary operator application or a primary expression.
    ///
    ///   -price
    ///
    ///   not user.enabled
    ///
    fn parse_prefix(&mut self) -> Result<ast::Expr> {
        let (op, span) = match self.peek()? {
            Some((Token::Minus, span)) => (ast::UnaryOp::Neg, span),
            Some((Token::Plus, span)) => (ast::UnaryOp::Pos, span),
            Some((Token::Keyword, span)) if &self.source()[span] == "not" => {
                (ast::UnaryOp::Not, span)
            }
            _ => return self.parse_primary(),
        };
        self.next()?;
        self.enter(span)?;

        // A sign directly applied to a number literal is folded into the
        // literal so that `-9223372036854775808` is representable.
        if op != ast::UnaryOp::Not && self.is_next(Token::Number)? {
            let num = self.expect(Token::Number)?;
            let sign = match op {
                ast::UnaryOp::Neg => Sign::Neg,
                _ => Sign::Pos,
            };
            let lit = self.parse_literal_number(num, span.combine(num), sign)?;
            self.exit();
            return Ok(ast::Expr::Literal(lit));
        }

        let operand = match op {
            ast::UnaryOp::Not => self.parse_expr(NOT_PRECEDENCE)?,
            _ => self.parse_prefix()?,
        };
        self.exit();
        let span = span.combine(operand.span());
        Ok(ast::Expr::Unary(ast::Unary {
            op,
            operand: Box::new(operand),
            span,
        }))
    }

    /// Parses a variable, literal or parenthesized expression.
    ///
    ///   users[2].name
    ///
    ///   "John Smith"
    ///
    ///   0x150
    ///
    ///   (price + tax)
    ///
    fn parse_primary(&mut self) -> Result<ast::Expr> {
        let expr = match self.parse_any()? {
            (Token::Keyword, span) => {
                let lit = self.parse_literal_bool(span)?;
                ast::Expr::Literal(lit)
            }

            (Token::Number, span) => {
                let lit = self.parse_literal_number(span, span, Sign::Pos)?;
                ast::Expr::Literal(lit)
            }

            (Token::String, span) => {
                let value = Value::String(self.parse_string(span)?);
                ast::Expr::Literal(ast::Literal { value, span })
            }

            (Token::Ident, span) => {
                let var = self.parse_var(ast::Ident { span })?;
                ast::Expr::Var(var)
            }

            (Token::OpenParen, span) => {
                self.enter(span)?;
                let expr = self.parse_expr(0)?;
                self.expect(Token::CloseParen)?;
                self.exit();
                expr
            }

            (tk, span) => {
                return Err(self.err_unexpected_token("expression", tk, span));
            }
        };
        Ok(expr)
    }

    /// Parses the member accesses following a variable.
    ///
    ///    user
    ///
    ///    user.names.0
    ///
    ///    user['address']["street"]
    ///
    ///    items[index - 1]
    ///
    fn parse_var(&mut self, root: ast::Ident) -> Result<ast::Var> {
        let mut path = Vec::new();
        loop {
            match self.peek()? {
                Some((Token::Dot, sp)) => {
                    self.expect(Token::Dot)?;
                    let (access, span) = self.parse_access()?;
                    path.push(ast::Member {
                        access,
                        span: sp.combine(span),
                    });
                }
                Some((Token::OpenBracket, sp)) => {
                    self.expect(Token::OpenBracket)?;
                    self.enter(sp)?;
                    let expr = self.parse_expr(0)?;
                    let end = self.expect(Token::CloseBracket)?;
                    self.exit();
                    path.push(ast::Member {
                        access: ast::Access::Subscript(Box::new(expr)),
                        span: sp.combine(end),
                    });
                }
                _ => break,
            }
        }
        Ok(ast::Var { root, path })
    }

    /// Parses a path segment following a `.`, either an index or an
    /// identifier.
    fn parse_access(&mut self) -> Result<(ast::Access, Span)> {
        match self.parse_any()? {
            (Token::Index, span) => {
                let value = self.source()[span].parse().map_err(|_| {
                    Error::syntax(
                        format!(
                            "base 10 literal out of range for unsigned {}-bit integer",
                            usize::BITS
                        ),
                        self.source(),
                        span,
                    )
                })?;
                Ok((ast::Access::Index(ast::Index { value, span }), span))
            }
            (Token::Ident, span) => Ok((ast::Access::Key(ast::Ident { span }), span)),
            (tk, span) => Err(self.err_unexpected_token("identifier or index", tk, span)),
        }
    }

    /// Returns the binary operator that is next in the stream, if any.
    fn peek_binary_op(&mut self) -> Result<Option<ast::BinaryOp>> {
        let op = match self.peek()? {
            Some((Token::Plus, _)) => ast::BinaryOp::Add,
            Some((Token::Minus, _)) => ast::BinaryOp::Sub,
            Some((Token::Star, _)) => ast::BinaryOp::Mul,
            Some((Token::Slash, _)) => ast::BinaryOp::Div,
            Some((Token::EqEq, _)) => ast::BinaryOp::Eq,
            Some((Token::NotEq, _)) => ast::BinaryOp::Ne,
            Some((Token::Lt, _)) => ast::BinaryOp::Lt,
            Some((Token::Le, _)) => ast::BinaryOp::Le,
            Some((Token::Gt, _)) => ast::BinaryOp::Gt,
            Some((Token::Ge, _)) => ast::BinaryOp::Ge,
            Some((Token::Keyword, span)) => match &self.source()[span] {
                "and" => ast::BinaryOp::And,
                "or" => ast::BinaryOp::Or,
                _ => return Ok(None),
            },
            _ => return Ok(None),
        };
        Ok(Some(op))
    }

    /// Parses a boolean literal.
    fn parse_literal_bool(&mut self, span: Span) -> Result<ast::Literal> {
        let bool = match &self.source()[span] {
            "false" | "False" => false,
            "true" | "True" => true,
            kw => {
                return Err(Error::syntax(
                    format!("unexpected keyword `{kw}`"),
                    self.source(),
                    span,
                ));
            }
        };
        let value = Value::Bool(bool);
        Ok(ast::Literal { value, span })
    }

    /// Parses an integer or a float.
    fn parse_literal_number(&self, num: Span, span: Span, sign: Sign) -> Result<ast::Literal> {
        let raw = &self.source()[num];
        match self.parse_literal_integer(raw, num, span, sign) {
            Ok(lit) => Ok(lit),
            Err(err) => match self.parse_literal_float(raw, span, sign) {
                Ok(lit) => Ok(lit),
                Err(err2) => {
                    if raw.contains(['.', '-', '+', 'e', 'E']) && !raw.starts_with("0x") {
                        Err(err2)
                    } else {
                        Err(err)
                    }
                }
            },
        }
    }

    /// Parse an integer.
    fn parse_literal_integer(
        &self,
        raw: &str,
        num: Span,
        span: Span,
        sign: Sign,
    ) -> Result<ast::Literal> {
        let digits = raw.as_bytes();
        let (i, radix) = match digits {
            [b'0', b'b', ..] => (2, 2),
            [b'0', b'o', ..] => (2, 8),
            [b'0', b'x', ..] => (2, 16),
            _ => (0, 10),
        };
        if digits.len() == i {
            return Err(Error::syntax(
                format!("missing digits for base {radix} literal"),
                self.source(),
                num,
            ));
        }
        let int = digits[i..]
            .iter()
            .enumerate()
            .filter(|(_, &d)| d != b'_')
            .try_fold(0i64, |acc, (j, &d)| {
                let x = (d as char).to_digit(radix).ok_or_else(|| {
                    let m = num.m + i + j;
                    Error::syntax(
                        format!("invalid digit for base {radix} literal"),
                        self.source(),
                        m..m + 1,
                    )
                })?;
                let err = || {
                    Error::syntax(
                        format!("base {radix} literal out of range for 64-bit integer"),
                        self.source(),
                        span,
                    )
                };
                let value = acc.checked_mul(radix.into()).ok_or_else(err)?;
                match sign {
                    Sign::Pos => value.checked_add(x.into()),
                    Sign::Neg => value.checked_sub(x.into()),
                }
                .ok_or_else(err)
            })?;
        let value = Value::Integer(int);
        Ok(ast::Literal { value, span })
    }

    /// Parses a float.
    fn parse_literal_float(&self, raw: &str, span: Span, sign: Sign) -> Result<ast::Literal> {
        let float: f64 = raw
            .replace('_', "")
            .parse()
            .map_err(|_| Error::syntax("invalid float literal", self.source(), span))?;
        let value = match sign {
            Sign::Neg => Value::Float(-float),
            Sign::Pos => Value::Float(float),
        };
        Ok(ast::Literal { value, span })
    }

    /// Parses a string and handles escape characters.
    fn parse_string(&self, span: Span) -> Result<String> {
        let raw = &self.source()[span];
        let inner = &raw[1..raw.len() - 1];
        if !inner.contains('\\') {
            return Ok(inner.to_owned());
        }

        let mut iter = inner.char_indices().map(|(i, c)| (span.m + 1 + i, c));
        let mut string = String::with_capacity(inner.len());
        while let Some((i, c)) = iter.next() {
            if c != '\\' {
                string.push(c);
                continue;
            }
            // The lexer guarantees an escape is followed by a character.
            let (j, esc) = iter.next().unwrap_or((i + 1, '\\'));
            let c = match esc {
                'n' => '\n',
                'r' => '\r',
                't' => '\t',
                '\\' => '\\',
                '"' => '"',
                '\'' => '\'',
                _ => {
                    return Err(Error::syntax(
                        "unknown escape character",
                        self.source(),
                        i..j + esc.len_utf8(),
                    ));
                }
            };
            string.push(c);
        }
        Ok(string)
    }

    /// Parses any token.
    fn parse_any(&mut self) -> Result<(Token, Span)> {
        match self.next()? {
            Some((tk, sp)) => Ok((tk, sp)),
            None => Err(self.err_unexpected_eof("expression")),
        }
    }

    /// Parses the specified token and returns its span.
    fn expect(&mut self, exp: Token) -> Result<Span> {
        match self.next()? {
            Some((tk, span)) if tk == exp => Ok(span),
            Some((tk, span)) => Err(self.err_unexpected_token(exp.human(), tk, span)),
            None => Err(self.err_unexpected_eof(exp.human())),
        }
    }

    /// Returns `true` if the next token is equal to the provided one.
    fn is_next(&mut self, token: Token) -> Result<bool> {
        Ok(self.peek()?.map(|(tk, _)| tk == token).unwrap_or(false))
    }

    /// Returns a copy of the next token without affecting the result of the
    /// following `.next()` call.
    fn peek(&mut self) -> Result<Option<(Token, Span)>> {
        if let Some(peeked) = self.peeked {
            return Ok(peeked);
        }
        let next = self.tokens.next()?;
        self.peeked = Some(next);
        Ok(next)
    }

    /// Returns the next token and span in the stream.
    fn next(&mut self) -> Result<Option<(Token, Span)>> {
        match self.peeked.take() {
            Some(v) => Ok(v),
            None => self.tokens.next(),
        }
    }

    fn source(&self) -> &'source str {
        self.tokens.source
    }

    /// Descends one nesting level, failing if the expression is too deep.
    fn enter(&mut self, span: Span) -> Result<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(Error::syntax("expression nested too deeply", self.source(), span));
        }
        Ok(())
    }

    fn exit(&mut self) {
        self.depth -= 1;
    }

    fn err_unexpected_eof(&self, exp: impl Display) -> Error {
        let n = self.source().len();
        Error::syntax(
            format!("expected {exp}, found end of expression"),
            self.source(),
            n..n,
        )
    }

    fn err_unexpected_token(&self, exp: impl Display, got: Token, span: Span) -> Error {
        let got = got.human();
        Error::syntax(format!("expected {exp}, found {got}"), self.source(), span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn parse_precedence() {
        assert_eq!(sexpr("1 + 2 * 3"), "(+ 1 (* 2 3))");
        assert_eq!(sexpr("(1 + 2) * 3"), "(* (+ 1 2) 3)");
        assert_eq!(sexpr("a - b - c"), "(- (- a b) c)");
        assert_eq!(sexpr("a > 1 and b or c"), "(or (and (> a 1) b) c)");
        assert_eq!(sexpr("not a == b"), "(not (== a b))");
        assert_eq!(sexpr("-a * 2"), "(* (- a) 2)");
    }

    #[test]
    fn parse_negative_literal() {
        assert_eq!(sexpr("-9223372036854775808"), "-9223372036854775808");
        assert_eq!(sexpr("1 - -2"), "(- 1 -2)");
    }

    #[test]
    fn parse_paths() {
        assert_eq!(sexpr("user.address.street"), "user.address.street");
        assert_eq!(sexpr("items.0.name"), "items.0.name");
        assert_eq!(sexpr("item['price']"), "item[\"price\"]");
        assert_eq!(sexpr("items[i + 1]"), "items[(+ i 1)]");
    }

    #[test]
    fn parse_literals() {
        assert_eq!(sexpr("0x7f"), "127");
        assert_eq!(sexpr("1_000"), "1000");
        assert_eq!(sexpr("2.5"), "2.5");
        assert_eq!(sexpr("2e3"), "2000");
        assert_eq!(sexpr("True"), "true");
        assert_eq!(sexpr(r#""a\tb""#), "\"a\\tb\"");
    }

    #[test]
    fn parse_err_trailing_tokens() {
        let err = parse_err("a b");
        assert_eq!(
            err.to_string(),
            "failed to evaluate `a b`: expected end of expression, found identifier"
        );
    }

    #[test]
    fn parse_err_empty() {
        let err = parse_err("");
        assert_eq!(
            err.to_string(),
            "failed to evaluate ``: expected expression, found end of expression"
        );
    }

    #[test]
    fn parse_err_invalid_digit() {
        let err = parse_err("12abc");
        assert_eq!(
            err.to_string(),
            "failed to evaluate `12abc`: invalid digit for base 10 literal"
        );
    }

    #[test]
    fn parse_err_unclosed_bracket() {
        let err = parse_err("items[0");
        assert_eq!(
            err.to_string(),
            "failed to evaluate `items[0`: expected close bracket, found end of expression"
        );
    }

    #[test]
    fn parse_deep_nesting() {
        let source = format!("{}1{}", "(".repeat(100), ")".repeat(100));
        assert_eq!(sexpr(&source), "1");
        let source = format!("a{}", "[0]".repeat(100));
        assert!(Parser::new(&source).parse().is_ok());
    }

    #[test]
    fn parse_err_nested_too_deeply() {
        let sources = [
            format!("{}1{}", "(".repeat(10_000), ")".repeat(10_000)),
            "(".repeat(10_000),
            "- ".repeat(10_000) + "a",
            "not ".repeat(10_000) + "a",
            "a".to_owned() + &"[a".repeat(10_000),
            "1".to_owned() + &" + 1".repeat(10_000),
        ];
        for source in &sources {
            let err = parse_err(source);
            assert_eq!(err.kind(), ErrorKind::MalformedExpression);
            assert!(
                err.to_string().ends_with(": expression nested too deeply"),
                "{err}"
            );
        }
    }

    fn parse_err(source: &str) -> Error {
        match Parser::new(source).parse() {
            Ok(_) => panic!("expected `{source}` to fail to parse"),
            Err(err) => err,
        }
    }

    fn sexpr(source: &str) -> String {
        let expr = Parser::new(source).parse().unwrap();
        fmt(source, &expr)
    }

    fn fmt(source: &str, expr: &ast::Expr) -> String {
        match expr {
            ast::Expr::Literal(lit) => match &lit.value {
                Value::String(s) => format!("{s:?}"),
                Value::Integer(i) => i.to_string(),
                Value::Float(f) => f.to_string(),
                Value::Bool(b) => b.to_string(),
                v => panic!("unexpected literal {v:?}"),
            },
            ast::Expr::Var(var) => {
                let mut s = source[var.root.span].to_owned();
                for member in &var.path {
                    match &member.access {
                        ast::Access::Key(ident) => {
                            s.push('.');
                            s.push_str(&source[ident.span]);
                        }
                        ast::Access::Index(index) => {
                            s.push('.');
                            s.push_str(&index.value.to_string());
                        }
                        ast::Access::Subscript(expr) => {
                            s.push('[');
                            s.push_str(&fmt(source, expr));
                            s.push(']');
                        }
                    }
                }
                s
            }
            ast::Expr::Unary(unary) => {
                format!("({} {})", unary.op.human(), fmt(source, &unary.operand))
            }
            ast::Expr::Binary(binary) => format!(
                "({} {} {})",
                binary.op.human(),
                fmt(source, &binary.lhs),
                fmt(source, &binary.rhs)
            ),
        }
    }
}
