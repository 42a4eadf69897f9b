use std::cmp::max;
use std::fmt;

use crate::types::span::Span;

/// The kind of failure that aborted a render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A name or map key could not be resolved against the context.
    UnknownIdentifier,
    /// A list was indexed past its end.
    IndexOutOfRange,
    /// Division by zero or integer overflow.
    ArithmeticError,
    /// The span content is not a valid expression.
    MalformedExpression,
    /// The expression evaluated to a list or map.
    NonScalarResult,
    /// The text still contained spans after the maximum number of passes.
    MaxPassesExceeded,
    /// An operator or index was applied to values of the wrong type.
    TypeMismatch,
    /// The context could not be converted into a [`Value`][crate::Value].
    InvalidContext,
}

/// An error that can occur during rendering.
///
/// The [`Display`][fmt::Display] implementation is deterministic, the same
/// inputs always produce the same message. Use the alternate form (`{:#}`)
/// to get a snippet of the failing expression with the problem underlined.
#[derive(Clone)]
pub struct Error {
    kind: ErrorKind,
    msg: String,
    span: Option<(String, Span)>,
}

impl Error {
    /// Construct an error pointing at `span` within the expression `source`.
    pub(crate) fn new(
        kind: ErrorKind,
        msg: impl Into<String>,
        source: &str,
        span: impl Into<Span>,
    ) -> Self {
        Self {
            kind,
            msg: msg.into(),
            span: Some((source.to_owned(), span.into())),
        }
    }

    pub(crate) fn syntax(msg: impl Into<String>, source: &str, span: impl Into<Span>) -> Self {
        Self::new(ErrorKind::MalformedExpression, msg, source, span)
    }

    pub(crate) fn max_passes(max: usize) -> Self {
        Self {
            kind: ErrorKind::MaxPassesExceeded,
            msg: format!(
                "render did not settle after {max} {}",
                if max == 1 { "pass" } else { "passes" }
            ),
            span: None,
        }
    }

    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the expression that failed, if any.
    pub fn expr(&self) -> Option<&str> {
        self.span.as_ref().map(|(source, _)| source.as_str())
    }
}

#[cfg(feature = "serde")]
impl serde::ser::Error for Error {
    fn custom<T>(msg: T) -> Self
    where
        T: fmt::Display,
    {
        Self {
            kind: ErrorKind::InvalidContext,
            msg: msg.to_string(),
            span: None,
        }
    }
}

impl std::error::Error for Error {}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.span {
            Some((source, span)) => fmt_pretty(&self.msg, source, *span, f),
            None => write!(f, "{}", self.msg),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.span {
            Some((source, span)) => {
                if f.alternate() {
                    fmt_pretty(&self.msg, source, *span, f)
                } else {
                    write!(f, "failed to evaluate `{source}`: {}", self.msg)
                }
            }
            None => write!(f, "{}", self.msg),
        }
    }
}

fn fmt_pretty(msg: &str, source: &str, span: Span, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    // Expressions never cross a line break so the snippet is a single line.
    let col = width(&source[..span.m]);
    let width = max(1, width(&source[span]));
    let underline = "^".repeat(width);

    write!(
        f,
        "\n  |\n  | {source}\n  | {underline:>w$} {msg}\n",
        source = source,
        underline = underline,
        w = col + width,
        msg = msg
    )
}

#[cfg(feature = "unicode")]
fn width(s: &str) -> usize {
    unicode_width::UnicodeWidthStr::width(s)
}

#[cfg(not(feature = "unicode"))]
fn width(s: &str) -> usize {
    s.chars().count()
}
