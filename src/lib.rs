//! A small multi-pass template renderer.
//!
//! Text is rendered by finding spans marked by a pair of delimiters,
//! evaluating the expression inside each span against a context, and
//! substituting the result. Rendering repeats until the text contains no
//! more spans, so a substituted value may itself contain spans.
//!
//! # Features
//!
//! - Expressions: `{ user.name }`, `{ items[0] }`, `{ price * 2 }`
//! - Comparisons and logic: `{ age >= 18 and name }`
//! - Values that contain spans are rendered again: `{ greeting }`
//! - Configurable delimiters: `<% user.name %>`
//! - Render using any [`serde`] serializable values
//! - Convenient macro for building contexts:
//!   `unbrace::value!{ name: "John", age: 42 }`
//!
//! # Getting started
//!
//! The quickest way to render some text is the [`render`] function. It uses
//! the default `{` and `}` delimiters and returns any error as the rendered
//! text.
//!
//! ```
//! let ctx = unbrace::value!{ name: "Ann", age: 30 };
//! let result = unbrace::render("Hello {name}, you are {age}.", &ctx);
//! assert_eq!(result, "Hello Ann, you are 30.");
//! ```
//!
//! ```
//! let result = unbrace::render("Hi {missing}", &unbrace::value!{});
//! assert_eq!(result, "failed to evaluate `missing`: unknown identifier `missing`");
//! ```
//!
//! # Examples
//!
//! ### Handle errors
//!
//! An [`Engine`] can return errors as a [`Result`] instead of text by
//! creating a [`Renderer`] with [`.renderer(..)`][Engine::renderer].
//!
//! ```
//! use unbrace::{Engine, ErrorKind};
//!
//! let engine = Engine::new();
//! let ctx = unbrace::value!{ a: 1 };
//! let err = engine.renderer("{a / 0}", &ctx).to_string().unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::ArithmeticError);
//! assert_eq!(err.to_string(), "failed to evaluate `a / 0`: division by zero");
//! ```
//!
//! ### Render using structured data
//!
//! ```
//! #[derive(serde::Serialize)]
//! struct Context { user: User }
//!
//! #[derive(serde::Serialize)]
//! struct User { name: String }
//!
//! let ctx = Context { user: User { name: "John Smith".into() } };
//!
//! let result = unbrace::Engine::new().render_serde("Hello {user.name}", &ctx);
//! assert_eq!(result, "Hello John Smith");
//! ```
//!
//! ### Render using custom syntax
//!
//! The delimiters can be set by constructing an engine using
//! [`Engine::with_syntax`].
//!
//! ```
//! let syntax = unbrace::Syntax::builder().delimiters("<%", "%>").build();
//!
//! let result = unbrace::Engine::with_syntax(syntax)
//!     .render("Hello <% user.name %> {literal}", &unbrace::value!{ user: { name: "John Smith" }});
//!
//! assert_eq!(result, "Hello John Smith {literal}");
//! ```
//!
//! ### Multiple passes
//!
//! Values that contain spans are rendered in the following pass.
//!
//! ```
//! let engine = unbrace::Engine::new();
//! let ctx = unbrace::value!{ greeting: "Hello {name}", name: "Ann" };
//!
//! let rendered = engine.renderer("{greeting}!", &ctx).to_rendered()?;
//! assert_eq!(rendered.text(), "Hello Ann!");
//! assert_eq!(rendered.passes(), 2);
//! # Ok::<(), unbrace::Error>(())
//! ```
//!
//! # Conditions
//!
//! A span starting with `if ` has its condition evaluated but always renders
//! as nothing, there are no blocks. Spans starting with `elif ` or `else`
//! render as nothing without being evaluated. Any other span, including
//! `{endif}`, is an ordinary expression.

mod compile;
mod error;
mod macros;
mod render;
mod types;
pub mod value;

use std::fmt;

use tracing::debug;

pub use crate::compile::{Match, Spans};
pub use crate::error::{Error, ErrorKind};
pub use crate::render::{Rendered, Renderer};
pub use crate::types::syntax::{Syntax, SyntaxBuilder};
#[cfg(feature = "serde")]
pub use crate::value::to_value;
pub use crate::value::Value;

use crate::compile::Scanner;

/// A type alias for results in this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// The default maximum number of passes per render.
pub const DEFAULT_MAX_PASSES: usize = 64;

/// The rendering engine.
///
/// The engine stores the delimiter config and the maximum number of passes.
/// It holds no other state, and can be shared between threads.
#[derive(Clone)]
pub struct Engine {
    scanner: Scanner,
    max_passes: usize,
}

impl Default for Engine {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Construct a new engine with the default `{` `}` delimiters.
    #[inline]
    pub fn new() -> Self {
        Self::with_syntax(Syntax::default())
    }

    /// Construct a new engine with custom syntax.
    ///
    /// # Examples
    ///
    /// ```
    /// use unbrace::{Engine, Syntax};
    ///
    /// let syntax = Syntax::builder().delimiters("${", "}").build();
    /// let engine = Engine::with_syntax(syntax);
    /// ```
    #[inline]
    pub fn with_syntax(syntax: Syntax<'_>) -> Self {
        Self {
            scanner: Scanner::new(&syntax),
            max_passes: DEFAULT_MAX_PASSES,
        }
    }

    /// Set the maximum number of passes per render.
    ///
    /// Defaults to [`DEFAULT_MAX_PASSES`].
    #[inline]
    pub fn set_max_passes(&mut self, max: usize) {
        self.max_passes = max;
    }

    /// Returns the maximum number of passes per render.
    #[inline]
    pub fn max_passes(&self) -> usize {
        self.max_passes
    }

    /// Returns an iterator over the spans in the text.
    ///
    /// A span runs from an open delimiter to the nearest close delimiter, so
    /// delimiters are never balanced.
    ///
    /// # Examples
    ///
    /// ```
    /// let engine = unbrace::Engine::new();
    /// let spans: Vec<_> = engine.scan("{a} {b {c}}").map(|m| m.expr()).collect();
    /// assert_eq!(spans, ["a", "b {c"]);
    /// ```
    #[inline]
    pub fn scan<'t>(&self, text: &'t str) -> Spans<'_, 't> {
        self.scanner.spans(text)
    }

    /// Returns a renderer for the template that reports errors as a
    /// [`Result`].
    #[inline]
    pub fn renderer<'render>(
        &'render self,
        template: &'render str,
        context: &'render Value,
    ) -> Renderer<'render> {
        Renderer::with_value(self, template, context)
    }

    /// Returns a renderer for the template using any serializable context.
    #[cfg(feature = "serde")]
    #[inline]
    pub fn renderer_serde<'render, S>(
        &'render self,
        template: &'render str,
        context: S,
    ) -> Renderer<'render>
    where
        S: serde::Serialize,
    {
        Renderer::with_serde(self, template, context)
    }

    /// Render the template, returning the error message as the text if
    /// rendering fails.
    #[inline]
    pub fn render(&self, template: &str, context: &Value) -> String {
        text_or_error(self.renderer(template, context).to_rendered())
    }

    /// Render the template using any serializable context, returning the
    /// error message as the text if rendering fails.
    #[cfg(feature = "serde")]
    #[inline]
    pub fn render_serde<S>(&self, template: &str, context: S) -> String
    where
        S: serde::Serialize,
    {
        text_or_error(self.renderer_serde(template, context).to_rendered())
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("scanner", &self.scanner)
            .field("max_passes", &self.max_passes)
            .finish()
    }
}

/// Render the template with the default engine, returning the error message
/// as the text if rendering fails.
///
/// # Examples
///
/// ```
/// let ctx = unbrace::value!{ x: 7 };
/// assert_eq!(unbrace::render("{x / 2}", &ctx), "3.5");
/// assert_eq!(
///     unbrace::render("{x / 0}", &ctx),
///     "failed to evaluate `x / 0`: division by zero"
/// );
/// ```
pub fn render(template: &str, context: &Value) -> String {
    Engine::new().render(template, context)
}

fn text_or_error(result: Result<Rendered>) -> String {
    match result {
        Ok(rendered) => {
            debug!(passes = rendered.passes(), "render settled");
            rendered.into_string()
        }
        Err(err) => {
            debug!(kind = ?err.kind(), "render failed: {err}");
            err.to_string()
        }
    }
}
