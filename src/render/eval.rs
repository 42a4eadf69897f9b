use std::cmp::Ordering;

use crate::render::value::{lookup_index, lookup_key, lookup_root};
use crate::types::ast;
use crate::types::span::Span;
use crate::value::ValueCow;
use crate::{Error, ErrorKind, Result, Value};

/// Evaluates a parsed expression against the render context.
///
/// Variables are borrowed from the context, computed values are owned.
pub struct Evaluator<'s, 'a> {
    /// The trimmed span text the expression was parsed from.
    source: &'s str,
    context: &'a Value,
}

impl<'s, 'a> Evaluator<'s, 'a> {
    pub fn new(source: &'s str, context: &'a Value) -> Self {
        Self { source, context }
    }

    pub fn eval(&self, expr: &ast::Expr) -> Result<ValueCow<'a>> {
        match expr {
            ast::Expr::Literal(lit) => Ok(ValueCow::Owned(lit.value.clone())),
            ast::Expr::Var(var) => self.eval_var(var).map(ValueCow::Borrowed),
            ast::Expr::Unary(unary) => self.eval_unary(unary).map(ValueCow::Owned),
            ast::Expr::Binary(binary) => self.eval_binary(binary),
        }
    }

    fn eval_var(&self, var: &ast::Var) -> Result<&'a Value> {
        let mut value = lookup_root(self.source, self.context, &var.root)?;
        for member in &var.path {
            value = match &member.access {
                ast::Access::Key(ident) => {
                    lookup_key(self.source, value, &self.source[ident.span], ident.span)?
                }
                ast::Access::Index(index) => {
                    let i = i64::try_from(index.value).unwrap_or(i64::MAX);
                    lookup_index(self.source, value, i, index.span)?
                }
                ast::Access::Subscript(expr) => match &*self.eval(expr)? {
                    Value::String(key) => lookup_key(self.source, value, key, member.span)?,
                    Value::Integer(i) => lookup_index(self.source, value, *i, member.span)?,
                    key => {
                        return Err(Error::new(
                            ErrorKind::TypeMismatch,
                            format!("cannot index with {}", key.human()),
                            self.source,
                            expr.span(),
                        ));
                    }
                },
            };
        }
        Ok(value)
    }

    fn eval_unary(&self, unary: &ast::Unary) -> Result<Value> {
        let operand = self.eval(&unary.operand)?;
        match (unary.op, &*operand) {
            (ast::UnaryOp::Not, v) => Ok(Value::Bool(!v.is_truthy())),
            (ast::UnaryOp::Neg, Value::Integer(i)) => i
                .checked_neg()
                .map(Value::Integer)
                .ok_or_else(|| self.err_arithmetic("integer overflow", unary.span)),
            (ast::UnaryOp::Neg, Value::Float(f)) => Ok(Value::Float(-f)),
            (ast::UnaryOp::Pos, v @ (Value::Integer(_) | Value::Float(_))) => Ok(v.clone()),
            (op, v) => Err(Error::new(
                ErrorKind::TypeMismatch,
                format!("unsupported operand type for unary {}: {}", op.human(), v.human()),
                self.source,
                unary.span,
            )),
        }
    }

    fn eval_binary(&self, binary: &ast::Binary) -> Result<ValueCow<'a>> {
        let lhs = self.eval(&binary.lhs)?;

        // `and` and `or` short circuit and evaluate to one of their operands.
        match binary.op {
            ast::BinaryOp::And if !lhs.is_truthy() => return Ok(lhs),
            ast::BinaryOp::Or if lhs.is_truthy() => return Ok(lhs),
            ast::BinaryOp::And | ast::BinaryOp::Or => return self.eval(&binary.rhs),
            _ => {}
        }

        let rhs = self.eval(&binary.rhs)?;
        let span = binary.span;
        let value = match binary.op {
            ast::BinaryOp::Eq => Value::Bool(equals(&lhs, &rhs)),
            ast::BinaryOp::Ne => Value::Bool(!equals(&lhs, &rhs)),
            op @ (ast::BinaryOp::Lt
            | ast::BinaryOp::Le
            | ast::BinaryOp::Gt
            | ast::BinaryOp::Ge) => self.compare(op, &lhs, &rhs, span)?,
            op => self.arithmetic(op, &lhs, &rhs, span)?,
        };
        Ok(ValueCow::Owned(value))
    }

    fn arithmetic(&self, op: ast::BinaryOp, lhs: &Value, rhs: &Value, span: Span) -> Result<Value> {
        match (lhs, rhs) {
            (Value::Integer(a), Value::Integer(b)) => {
                let int = match op {
                    ast::BinaryOp::Add => a.checked_add(*b),
                    ast::BinaryOp::Sub => a.checked_sub(*b),
                    ast::BinaryOp::Mul => a.checked_mul(*b),
                    _ => return self.divide(*a as f64, *b as f64, span),
                };
                int.map(Value::Integer)
                    .ok_or_else(|| self.err_arithmetic("integer overflow", span))
            }
            (Value::String(a), Value::String(b)) if op == ast::BinaryOp::Add => {
                Ok(Value::String(format!("{a}{b}")))
            }
            _ => match (as_f64(lhs), as_f64(rhs)) {
                (Some(a), Some(b)) => match op {
                    ast::BinaryOp::Add => Ok(Value::Float(a + b)),
                    ast::BinaryOp::Sub => Ok(Value::Float(a - b)),
                    ast::BinaryOp::Mul => Ok(Value::Float(a * b)),
                    _ => self.divide(a, b, span),
                },
                _ => Err(self.err_operands(op, lhs, rhs, span)),
            },
        }
    }

    /// True division, the result is always a float.
    fn divide(&self, a: f64, b: f64, span: Span) -> Result<Value> {
        if b == 0.0 {
            return Err(self.err_arithmetic("division by zero", span));
        }
        Ok(Value::Float(a / b))
    }

    fn compare(&self, op: ast::BinaryOp, lhs: &Value, rhs: &Value, span: Span) -> Result<Value> {
        let ord = match (lhs, rhs) {
            (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            _ => match (as_f64(lhs), as_f64(rhs)) {
                (Some(a), Some(b)) => a.partial_cmp(&b),
                _ => return Err(self.err_operands(op, lhs, rhs, span)),
            },
        };
        // Comparisons involving NaN are always false.
        let result = ord.map_or(false, |ord| match op {
            ast::BinaryOp::Lt => ord == Ordering::Less,
            ast::BinaryOp::Le => ord != Ordering::Greater,
            ast::BinaryOp::Gt => ord == Ordering::Greater,
            _ => ord != Ordering::Less,
        });
        Ok(Value::Bool(result))
    }

    fn err_arithmetic(&self, msg: &str, span: Span) -> Error {
        Error::new(ErrorKind::ArithmeticError, msg, self.source, span)
    }

    fn err_operands(&self, op: ast::BinaryOp, lhs: &Value, rhs: &Value, span: Span) -> Error {
        Error::new(
            ErrorKind::TypeMismatch,
            format!(
                "unsupported operand types for {}: {} and {}",
                op.human(),
                lhs.human(),
                rhs.human()
            ),
            self.source,
            span,
        )
    }
}

/// Structural equality where integers and floats compare numerically.
fn equals(lhs: &Value, rhs: &Value) -> bool {
    match (lhs, rhs) {
        (Value::Integer(i), Value::Float(f)) | (Value::Float(f), Value::Integer(i)) => {
            *i as f64 == *f
        }
        _ => lhs == rhs,
    }
}

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Integer(i) => Some(*i as f64),
        Value::Float(f) => Some(*f),
        _ => None,
    }
}
