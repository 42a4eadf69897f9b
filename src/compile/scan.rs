//! Locates delimiter spans in text.
//!
//! A span starts at the first open delimiter and ends at the nearest close
//! delimiter after it. Delimiters are not balanced, so an open delimiter
//! inside a span is part of the expression. Spans never contain a line break.
//!
//! ```text
//! Outer { {inner} } Outer
//!       ^       ^
//!       o       c
//! ```

use std::ops::Range;

use crate::types::span::Span;
use crate::types::syntax::Syntax;

/// Finds expression spans for a single pair of delimiters.
#[derive(Debug, Clone)]
pub struct Scanner {
    open: String,
    close: String,
}

/// An iterator over the spans in some text.
///
/// This struct is created by [`Engine::scan`][crate::Engine::scan]. Cloning
/// it restarts the scan from the current position.
#[derive(Debug, Clone)]
pub struct Spans<'s, 't> {
    scanner: &'s Scanner,
    text: &'t str,
    cursor: usize,
}

/// A single span found by the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match<'t> {
    text: &'t str,
    outer: Span,
    inner: Span,
}

impl Scanner {
    pub fn new(syntax: &Syntax<'_>) -> Self {
        Self {
            open: syntax.open.clone(),
            close: syntax.close.clone(),
        }
    }

    pub fn spans<'s, 't>(&'s self, text: &'t str) -> Spans<'s, 't> {
        Spans {
            scanner: self,
            text,
            cursor: 0,
        }
    }

    /// Returns `true` if the text contains at least one span.
    pub fn is_match(&self, text: &str) -> bool {
        self.spans(text).next().is_some()
    }

    /// Finds the next span starting the search at `at`.
    ///
    /// On success returns the span, otherwise returns the position the search
    /// should resume from or `None` if there are no more spans.
    fn find_at(&self, text: &str, at: usize) -> Result<(Span, Span), Option<usize>> {
        // xxx{xx{xxxx}xxxx
        //    ^  ^    ^
        //    i  m    k
        let i = at + text[at..].find(&self.open).ok_or(None)?;
        let m = i + self.open.len();
        let k = m + text[m..].find(&self.close).ok_or(None)?;

        if text[m..k].contains('\n') {
            // No span starts at `i`, but a later open delimiter may start
            // one, even inside this one.
            let step = self.open.chars().next().map_or(1, char::len_utf8);
            return Err(Some(i + step));
        }

        let n = k + self.close.len();
        Ok((Span::from(i..n), Span::from(m..k)))
    }
}

impl<'t> Iterator for Spans<'_, 't> {
    type Item = Match<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.scanner.find_at(self.text, self.cursor) {
                Ok((outer, inner)) => {
                    self.cursor = outer.n;
                    return Some(Match {
                        text: self.text,
                        outer,
                        inner,
                    });
                }
                Err(Some(at)) => self.cursor = at,
                Err(None) => {
                    self.cursor = self.text.len();
                    return None;
                }
            }
        }
    }
}

impl<'t> Match<'t> {
    /// The byte offset of the start of the open delimiter.
    #[inline]
    pub fn start(&self) -> usize {
        self.outer.m
    }

    /// The byte offset just past the end of the close delimiter.
    #[inline]
    pub fn end(&self) -> usize {
        self.outer.n
    }

    /// The byte range of the span including delimiters.
    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.outer.into()
    }

    /// The text of the span including delimiters.
    #[inline]
    pub fn as_str(&self) -> &'t str {
        &self.text[self.outer]
    }

    /// The expression between the delimiters with surrounding whitespace
    /// removed.
    #[inline]
    pub fn expr(&self) -> &'t str {
        self.text[self.inner].trim()
    }
}
