#![allow(clippy::wrong_self_convention)]

mod eval;
mod value;

use tracing::trace;

use crate::compile;
use crate::render::eval::Evaluator;
use crate::types::ast;
use crate::{Engine, Error, Result, Value};

/// A renderer that repeatedly substitutes spans in a template until the text
/// no longer changes.
///
/// This struct is created by one of the following functions:
/// - [`Engine::renderer`][crate::Engine::renderer]
/// - [`Engine::renderer_serde`][crate::Engine::renderer_serde]
#[must_use = "must call `.to_string()` or `.to_rendered()` on the renderer"]
pub struct Renderer<'render> {
    engine: &'render Engine,
    source: &'render str,
    context: Context<'render>,
    max_passes: Option<usize>,
}

enum Context<'render> {
    Owned(Result<Value>),
    Borrowed(&'render Value),
}

/// The output of a successful render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    text: String,
    passes: usize,
}

impl<'render> Renderer<'render> {
    fn new(engine: &'render Engine, source: &'render str, context: Context<'render>) -> Self {
        Self {
            engine,
            source,
            context,
            max_passes: None,
        }
    }

    #[cfg(feature = "serde")]
    pub(crate) fn with_serde<S>(engine: &'render Engine, source: &'render str, context: S) -> Self
    where
        S: ::serde::Serialize,
    {
        Self::new(engine, source, Context::Owned(crate::to_value(context)))
    }

    pub(crate) fn with_value(
        engine: &'render Engine,
        source: &'render str,
        context: &'render Value,
    ) -> Self {
        Self::new(engine, source, Context::Borrowed(context))
    }

    /// Set the maximum number of passes.
    ///
    /// Rendering fails with [`ErrorKind::MaxPassesExceeded`][crate::ErrorKind]
    /// if the text still contains spans after this many passes.
    ///
    /// Defaults to the engine setting.
    pub fn with_max_passes(mut self, max: usize) -> Self {
        self.max_passes = Some(max);
        self
    }

    /// Render the template to a string.
    pub fn to_string(self) -> Result<String> {
        self.to_rendered().map(Rendered::into_string)
    }

    /// Render the template, also returning the number of passes performed.
    pub fn to_rendered(self) -> Result<Rendered> {
        let max = self.max_passes.unwrap_or(self.engine.max_passes);
        match self.context {
            Context::Owned(result) => {
                let value = result?;
                run(self.engine, self.source, &value, max)
            }
            Context::Borrowed(value) => run(self.engine, self.source, value, max),
        }
    }
}

impl Rendered {
    /// The final text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The number of passes that substituted at least one span.
    pub fn passes(&self) -> usize {
        self.passes
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

fn run(engine: &Engine, source: &str, context: &Value, max: usize) -> Result<Rendered> {
    let mut text = source.to_owned();
    let mut passes = 0;
    while engine.scanner.is_match(&text) {
        if passes == max {
            return Err(Error::max_passes(max));
        }
        text = pass(engine, &text, context)?;
        passes += 1;
        trace!(pass = passes, len = text.len(), "completed pass");
    }
    Ok(Rendered { text, passes })
}

/// Substitutes every span in the text once, copying the text between spans
/// verbatim.
fn pass(engine: &Engine, text: &str, context: &Value) -> Result<String> {
    let mut buf = String::with_capacity(text.len());
    let mut last = 0;
    for m in engine.scanner.spans(text) {
        buf.push_str(&text[last..m.start()]);
        render_span(&mut buf, m.expr(), context)?;
        last = m.end();
    }
    buf.push_str(&text[last..]);
    Ok(buf)
}

fn render_span(buf: &mut String, expr: &str, context: &Value) -> Result<()> {
    match compile::span(expr)? {
        ast::Stmt::Cond(cond) => {
            let value = Evaluator::new(expr, context).eval(&cond)?;
            trace!(expr, truthy = value.is_truthy(), "evaluated condition");
        }
        ast::Stmt::Continuation => {
            trace!(expr, "skipped continuation");
        }
        ast::Stmt::Value(e) => {
            let value = Evaluator::new(expr, context).eval(&e)?;
            value::write_text(buf, expr, &value, e.span())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pass_substitutes_each_span_once() {
        let engine = Engine::new();
        let ctx = Value::from([("a", "{b}"), ("b", "x")]);
        let text = pass(&engine, "<{a}|{b}>", &ctx).unwrap();
        assert_eq!(text, "<{b}|x>");
    }

    #[test]
    fn run_counts_passes() {
        let engine = Engine::new();
        let ctx = Value::from([("a", "{b}"), ("b", "x")]);
        let rendered = run(&engine, "{a}", &ctx, 64).unwrap();
        assert_eq!(rendered.text(), "x");
        assert_eq!(rendered.passes(), 2);
    }

    #[test]
    fn run_without_spans_performs_no_passes() {
        let engine = Engine::new();
        let rendered = run(&engine, "plain } text {", &Value::None, 0).unwrap();
        assert_eq!(rendered.text(), "plain } text {");
        assert_eq!(rendered.passes(), 0);
    }

    #[test]
    fn run_max_passes_exceeded() {
        let engine = Engine::new();
        let ctx = Value::from([("a", "{a}")]);
        let err = run(&engine, "{a}", &ctx, 3).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::MaxPassesExceeded);
        assert_eq!(err.to_string(), "render did not settle after 3 passes");
    }

    #[test]
    fn render_span_condition_renders_nothing() {
        let ctx = Value::from([("age", 30)]);
        let mut buf = String::new();
        render_span(&mut buf, "if age > 25", &ctx).unwrap();
        render_span(&mut buf, "else", &ctx).unwrap();
        render_span(&mut buf, "elif whatever ((", &ctx).unwrap();
        assert_eq!(buf, "");
    }
}
