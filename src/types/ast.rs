//! AST representing the contents of a single span.
//!
//! All spans are relative to the trimmed expression text of the span they
//! were parsed from.

use crate::types::span::Span;
use crate::Value;

/// A classified span.
#[cfg_attr(internal_debug, derive(Debug))]
pub enum Stmt {
    /// `if <cond>`, the condition is evaluated and the span renders nothing.
    Cond(Expr),
    /// `elif ...` or `else`, renders nothing without evaluation.
    Continuation,
    /// Any other expression, renders its value.
    Value(Expr),
}

#[cfg_attr(internal_debug, derive(Debug))]
pub enum Expr {
    Literal(Literal),
    Var(Var),
    Unary(Unary),
    Binary(Binary),
}

#[cfg_attr(internal_debug, derive(Debug))]
pub struct Literal {
    pub value: Value,
    pub span: Span,
}

/// A variable with an optional chain of member accesses, e.g.
/// `user.address['street']`.
#[cfg_attr(internal_debug, derive(Debug))]
pub struct Var {
    pub root: Ident,
    pub path: Vec<Member>,
}

#[cfg_attr(internal_debug, derive(Debug))]
pub struct Member {
    pub access: Access,
    pub span: Span,
}

#[cfg_attr(internal_debug, derive(Debug))]
pub enum Access {
    /// `.name`
    Key(Ident),
    /// `.0`
    Index(Index),
    /// `[expr]`
    Subscript(Box<Expr>),
}

#[derive(Clone, Copy)]
#[cfg_attr(internal_debug, derive(Debug))]
pub struct Ident {
    pub span: Span,
}

#[derive(Clone, Copy)]
#[cfg_attr(internal_debug, derive(Debug))]
pub struct Index {
    pub value: usize,
    pub span: Span,
}

#[cfg_attr(internal_debug, derive(Debug))]
pub struct Unary {
    pub op: UnaryOp,
    pub operand: Box<Expr>,
    pub span: Span,
}

#[cfg_attr(internal_debug, derive(Debug))]
pub struct Binary {
    pub op: BinaryOp,
    pub lhs: Box<Expr>,
    pub rhs: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Pos,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Or,
    And,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Add,
    Sub,
    Mul,
    Div,
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Self::Literal(lit) => lit.span,
            Self::Var(var) => var.span(),
            Self::Unary(unary) => unary.span,
            Self::Binary(binary) => binary.span,
        }
    }
}

impl Var {
    pub fn span(&self) -> Span {
        match self.path.last() {
            Some(member) => self.root.span.combine(member.span),
            None => self.root.span,
        }
    }
}

impl BinaryOp {
    /// Returns the binding power of the operator, higher binds tighter.
    pub const fn precedence(&self) -> u8 {
        match self {
            Self::Or => 1,
            Self::And => 2,
            Self::Eq | Self::Ne | Self::Lt | Self::Le | Self::Gt | Self::Ge => 4,
            Self::Add | Self::Sub => 5,
            Self::Mul | Self::Div => 6,
        }
    }

    pub const fn human(&self) -> &'static str {
        match self {
            Self::Or => "or",
            Self::And => "and",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
        }
    }
}

impl UnaryOp {
    pub const fn human(&self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Pos => "+",
            Self::Not => "not",
        }
    }
}
