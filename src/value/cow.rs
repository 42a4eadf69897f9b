//! Defines a clone-on-write [`Value`].

use std::ops::Deref;

use crate::Value;

/// A value that is either borrowed from the render context or computed while
/// evaluating an expression.
#[cfg_attr(internal_debug, derive(Debug))]
pub enum ValueCow<'a> {
    Borrowed(&'a Value),
    Owned(Value),
}

impl Deref for ValueCow<'_> {
    type Target = Value;

    fn deref(&self) -> &Self::Target {
        match self {
            Self::Borrowed(v) => v,
            Self::Owned(v) => v,
        }
    }
}

impl From<Value> for ValueCow<'_> {
    fn from(value: Value) -> Self {
        Self::Owned(value)
    }
}
