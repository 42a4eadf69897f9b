use std::marker::PhantomData;

/// The template syntax configuration.
///
/// The syntax is a single pair of delimiters that mark the start and end of
/// an expression span. Use [`Syntax::default()`] to get the default `{` and
/// `}` delimiters and [`Syntax::builder()`] to create a custom pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Syntax<'a> {
    pub(crate) open: String,
    pub(crate) close: String,
    _marker: PhantomData<&'a ()>,
}

/// A builder for the syntax configuration.
///
/// This struct is typically created using [`Syntax::builder()`].
#[derive(Debug, Clone)]
pub struct SyntaxBuilder<'a> {
    delimiters: Option<(&'a str, &'a str)>,
}

impl Default for Syntax<'_> {
    /// Returns the default syntax configuration.
    ///
    /// This is equivalent to the following.
    /// ```
    /// use unbrace::Syntax;
    ///
    /// let syntax = Syntax::builder().delimiters("{", "}").build();
    /// assert_eq!(syntax, Syntax::default());
    /// ```
    #[inline]
    fn default() -> Self {
        Syntax::builder().delimiters("{", "}").build()
    }
}

impl<'a> Syntax<'a> {
    /// Create a new syntax builder.
    ///
    /// # Examples
    ///
    /// ```
    /// let syntax = unbrace::Syntax::builder().delimiters("<%", "%>").build();
    /// ```
    #[inline]
    pub fn builder() -> SyntaxBuilder<'a> {
        SyntaxBuilder::new()
    }

    /// Returns the open delimiter.
    #[inline]
    pub fn open(&self) -> &str {
        &self.open
    }

    /// Returns the close delimiter.
    #[inline]
    pub fn close(&self) -> &str {
        &self.close
    }
}

impl<'a> SyntaxBuilder<'a> {
    /// Creates a new syntax builder.
    #[inline]
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self { delimiters: None }
    }

    /// Set the span delimiters.
    ///
    /// If not set then the default `{` and `}` are used.
    ///
    /// # Panics
    ///
    /// If either of the strings are empty.
    #[inline]
    pub fn delimiters(&mut self, open: &'a str, close: &'a str) -> &mut Self {
        assert!(!open.is_empty() && !close.is_empty());
        self.delimiters = Some((open, close));
        self
    }

    /// Builds the syntax configuration.
    pub fn build(&self) -> Syntax<'a> {
        let (open, close) = self.delimiters.unwrap_or(("{", "}"));
        Syntax {
            open: open.into(),
            close: close.into(),
            _marker: PhantomData,
        }
    }
}
