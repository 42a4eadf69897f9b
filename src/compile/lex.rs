use crate::types::span::Span;
use crate::{Error, Result};

/// A lexer that tokenizes the text of a single span so that the parser
/// doesn't have to operate on raw text.
///
/// The lexer is implemented as a fallible iterator. The parser should
/// repeatedly call the [`.next()?`][Lexer::next] method to return the next
/// non-whitespace token until [`None`] is returned.
#[cfg_attr(internal_debug, derive(Debug))]
pub struct Lexer<'source> {
    /// The trimmed expression text.
    pub source: &'source str,

    /// A cursor over the expression text.
    cursor: usize,

    /// The previous non-whitespace token.
    prev: Option<Token>,
}

/// The unit yielded by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// `.`
    Dot,
    /// `[`
    OpenBracket,
    /// `]`
    CloseBracket,
    /// `(`
    OpenParen,
    /// `)`
    CloseParen,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `==`
    EqEq,
    /// `!=`
    NotEq,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// Sequence of whitespace characters
    Whitespace,
    /// A keyword like `and` or `true`
    Keyword,
    /// An attribute or variable
    Ident,
    /// An index into a list following a `.`, e.g. the `0` in `items.0`
    Index,
    /// An integer or float literal, e.g. `19`, `0x7f`, `1.5`, or `2e-3`
    Number,
    /// A string literal, e.g. `"Hello World!\n"` or `'name'`
    String,
}

impl<'source> Lexer<'source> {
    /// Construct a new lexer that starts tokenizing at `offset`.
    pub fn with_offset(source: &'source str, offset: usize) -> Self {
        Self {
            source,
            cursor: offset,
            prev: None,
        }
    }

    /// Returns the next non-whitespace token and its span.
    pub fn next(&mut self) -> Result<Option<(Token, Span)>> {
        loop {
            match self.lex()? {
                Some((Token::Whitespace, _)) => continue,
                next => {
                    self.prev = next.map(|(tk, _)| tk);
                    return Ok(next);
                }
            }
        }
    }

    /// Returns the next token and span.
    fn lex(&mut self) -> Result<Option<(Token, Span)>> {
        let i = self.cursor;

        // We iterate over chars because that is nicer than operating on raw
        // bytes. The map call here fixes the index to be relative to the
        // actual expression text.
        let mut iter = self.source[i..].char_indices().map(|(d, c)| (i + d, c));

        let c = match iter.next() {
            Some((_, c)) => c,
            None => return Ok(None),
        };

        let (tk, j) = match c {
            // Single character to token mappings.
            '.' => (Token::Dot, i + 1),
            '[' => (Token::OpenBracket, i + 1),
            ']' => (Token::CloseBracket, i + 1),
            '(' => (Token::OpenParen, i + 1),
            ')' => (Token::CloseParen, i + 1),
            '+' => (Token::Plus, i + 1),
            '-' => (Token::Minus, i + 1),
            '*' => (Token::Star, i + 1),
            '/' => (Token::Slash, i + 1),

            // Operators that may span two characters.
            '=' => self.lex_eq(iter, i, None, Token::EqEq)?,
            '!' => self.lex_eq(iter, i, None, Token::NotEq)?,
            '<' => self.lex_eq(iter, i, Some(Token::Lt), Token::Le)?,
            '>' => self.lex_eq(iter, i, Some(Token::Gt), Token::Ge)?,

            // Multi-character tokens with a distinct start character.
            '"' | '\'' => self.lex_string(iter, i, c)?,
            c if c.is_ascii_digit() => match self.prev {
                Some(Token::Dot) => (Token::Index, self.lex_while(iter, is_index)),
                _ => self.lex_number(iter),
            },
            c if c.is_whitespace() => {
                (Token::Whitespace, self.lex_while(iter, char::is_whitespace))
            }
            c if is_ident_start(c) => self.lex_ident_or_keyword(iter, i),

            // Any other character...
            c => {
                return Err(self.err_unexpected_character(i..(i + c.len_utf8())));
            }
        };

        self.cursor = j;
        Ok(Some((tk, Span::from(i..j))))
    }

    /// Lexes an operator that is optionally followed by `=`.
    fn lex_eq<I>(
        &mut self,
        mut iter: I,
        i: usize,
        single: Option<Token>,
        double: Token,
    ) -> Result<(Token, usize)>
    where
        I: Iterator<Item = (usize, char)>,
    {
        match (iter.next(), single) {
            (Some((_, '=')), _) => Ok((double, i + 2)),
            (_, Some(tk)) => Ok((tk, i + 1)),
            (_, None) => Err(self.err_unexpected_character(i..i + 1)),
        }
    }

    fn lex_string<I>(&mut self, mut iter: I, i: usize, quote: char) -> Result<(Token, usize)>
    where
        I: Iterator<Item = (usize, char)>,
    {
        let mut escaped = false;
        loop {
            match iter.next() {
                None => {
                    return Err(self.err_undelimited_string(i..self.source.len()));
                }
                Some((j, c)) if c == quote && !escaped => {
                    return Ok((Token::String, j + 1));
                }
                Some((_, c)) => {
                    escaped = c == '\\' && !escaped;
                }
            }
        }
    }

    fn lex_number<I>(&mut self, mut iter: I) -> (Token, usize)
    where
        I: Iterator<Item = (usize, char)> + Clone,
    {
        let start = self.cursor;
        let radix = matches!(
            self.source.as_bytes().get(start..start + 2),
            Some(b"0b" | b"0o" | b"0x")
        );
        let mut seen_dot = false;
        let mut last = '0';
        loop {
            let mut peek = iter.clone();
            let (j, c) = match peek.next() {
                Some(next) => next,
                None => return (Token::Number, self.source.len()),
            };
            let accept = match c {
                c if c.is_ascii_alphanumeric() || c == '_' => true,
                '.' if !radix && !seen_dot => {
                    seen_dot = true;
                    matches!(peek.next(), Some((_, d)) if d.is_ascii_digit())
                }
                '+' | '-' => !radix && matches!(last, 'e' | 'E'),
                _ => false,
            };
            if !accept {
                return (Token::Number, j);
            }
            last = c;
            iter.next();
        }
    }

    fn lex_ident_or_keyword<I>(&mut self, iter: I, i: usize) -> (Token, usize)
    where
        I: Iterator<Item = (usize, char)> + Clone,
    {
        let j = self.lex_while(iter, is_ident);
        let tk = match KEYWORDS.contains(&&self.source[i..j]) {
            true => Token::Keyword,
            false => Token::Ident,
        };
        (tk, j)
    }

    fn lex_while<I, P>(&mut self, mut iter: I, pred: P) -> usize
    where
        I: Iterator<Item = (usize, char)> + Clone,
        P: Fn(char) -> bool,
    {
        loop {
            match iter.clone().next() {
                Some((_, c)) if pred(c) => {
                    iter.next();
                }
                Some((j, _)) => return j,
                None => return self.source.len(),
            }
        }
    }

    fn err_unexpected_character(&self, span: impl Into<Span>) -> Error {
        Error::syntax("unexpected character", self.source, span)
    }

    fn err_undelimited_string(&self, span: impl Into<Span>) -> Error {
        Error::syntax("undelimited string", self.source, span)
    }
}

/// Words that are never looked up in the context.
pub const KEYWORDS: &[&str] = &["and", "or", "not", "true", "false", "True", "False"];

impl Token {
    pub fn human(&self) -> &'static str {
        match self {
            Self::Dot => "member access operator",
            Self::OpenBracket => "open bracket",
            Self::CloseBracket => "close bracket",
            Self::OpenParen => "open parenthesis",
            Self::CloseParen => "close parenthesis",
            Self::Plus => "plus",
            Self::Minus => "minus",
            Self::Star => "star",
            Self::Slash => "slash",
            Self::EqEq => "`==`",
            Self::NotEq => "`!=`",
            Self::Lt => "`<`",
            Self::Le => "`<=`",
            Self::Gt => "`>`",
            Self::Ge => "`>=`",
            Self::Whitespace => "whitespace",
            Self::Keyword => "keyword",
            Self::Ident => "identifier",
            Self::Index => "index",
            Self::Number => "number",
            Self::String => "string",
        }
    }
}

#[cfg(feature = "unicode")]
fn is_ident_start(c: char) -> bool {
    c == '_' || unicode_ident::is_xid_start(c)
}

#[cfg(feature = "unicode")]
fn is_ident(c: char) -> bool {
    unicode_ident::is_xid_continue(c)
}

#[cfg(not(feature = "unicode"))]
fn is_ident_start(c: char) -> bool {
    matches!(c, 'A'..='Z' | 'a'..='z' | '_')
}

#[cfg(not(feature = "unicode"))]
fn is_ident(c: char) -> bool {
    matches!(c, '0'..='9' | 'A'..='Z' | 'a'..='z' | '_')
}

fn is_index(c: char) -> bool {
    c.is_ascii_digit()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lex_empty() {
        let tokens = lex("").unwrap();
        assert_eq!(tokens, []);
    }

    #[test]
    fn lex_ident() {
        let tokens = lex("name").unwrap();
        assert_eq!(tokens, [(Token::Ident, "name")]);
    }

    #[test]
    fn lex_path() {
        let tokens = lex("user.address['street']").unwrap();
        assert_eq!(
            tokens,
            [
                (Token::Ident, "user"),
                (Token::Dot, "."),
                (Token::Ident, "address"),
                (Token::OpenBracket, "["),
                (Token::String, "'street'"),
                (Token::CloseBracket, "]"),
            ]
        );
    }

    #[test]
    fn lex_path_with_index() {
        let tokens = lex("items.0.1 items[0]").unwrap();
        assert_eq!(
            tokens,
            [
                (Token::Ident, "items"),
                (Token::Dot, "."),
                (Token::Index, "0"),
                (Token::Dot, "."),
                (Token::Index, "1"),
                (Token::Ident, "items"),
                (Token::OpenBracket, "["),
                (Token::Number, "0"),
                (Token::CloseBracket, "]"),
            ]
        );
    }

    #[test]
    fn lex_operators() {
        let tokens = lex("+ - * / == != < <= > >= ( )").unwrap();
        assert_eq!(
            tokens,
            [
                (Token::Plus, "+"),
                (Token::Minus, "-"),
                (Token::Star, "*"),
                (Token::Slash, "/"),
                (Token::EqEq, "=="),
                (Token::NotEq, "!="),
                (Token::Lt, "<"),
                (Token::Le, "<="),
                (Token::Gt, ">"),
                (Token::Ge, ">="),
                (Token::OpenParen, "("),
                (Token::CloseParen, ")"),
            ]
        );
    }

    #[test]
    fn lex_keywords() {
        let tokens = lex("not a and true or False").unwrap();
        assert_eq!(
            tokens,
            [
                (Token::Keyword, "not"),
                (Token::Ident, "a"),
                (Token::Keyword, "and"),
                (Token::Keyword, "true"),
                (Token::Keyword, "or"),
                (Token::Keyword, "False"),
            ]
        );
    }

    #[test]
    fn lex_numbers() {
        let tokens = lex("1-2 1.5 2e-3 0xff_ff 1_000 3.x").unwrap();
        assert_eq!(
            tokens,
            [
                (Token::Number, "1"),
                (Token::Minus, "-"),
                (Token::Number, "2"),
                (Token::Number, "1.5"),
                (Token::Number, "2e-3"),
                (Token::Number, "0xff_ff"),
                (Token::Number, "1_000"),
                (Token::Number, "3"),
                (Token::Dot, "."),
                (Token::Ident, "x"),
            ]
        );
    }

    #[test]
    fn lex_strings() {
        let tokens = lex(r#""a \"b\"" 'c\'d'"#).unwrap();
        assert_eq!(
            tokens,
            [(Token::String, r#""a \"b\"""#), (Token::String, r"'c\'d'")]
        );
    }

    #[test]
    fn lex_err_undelimited_string() {
        let err = lex("'lorem").unwrap_err();
        assert_eq!(err.to_string(), "failed to evaluate `'lorem`: undelimited string");
    }

    #[test]
    fn lex_err_unexpected_character() {
        let err = lex("price:.2f").unwrap_err();
        assert_eq!(
            format!("{:#}", err),
            "
  |
  | price:.2f
  |      ^ unexpected character
"
        );
    }

    #[test]
    fn lex_err_single_equals() {
        let err = lex("a = b").unwrap_err();
        assert_eq!(err.to_string(), "failed to evaluate `a = b`: unexpected character");
    }

    #[track_caller]
    fn lex(source: &str) -> Result<Vec<(Token, &str)>> {
        let mut lexer = Lexer::with_offset(source, 0);
        let mut tokens = Vec::new();
        while let Some((tk, sp)) = lexer.next()? {
            tokens.push((tk, &source[sp]));
        }
        for _ in 0..3 {
            assert!(lexer.next().unwrap().is_none());
        }
        Ok(tokens)
    }
}
