//! Probe programs run inside the live context by the launcher.
//!
//! The launcher is not an interpreter. It understands two statements, which
//! are enough to observe startup from the outside:
//!
//! - `p <expr>` prints the inspected value followed by a newline
//! - `print <expr>` prints the plain value with no newline
//!
//! and two expressions: `Boot.was_preinitialized?` (optionally qualified as
//! `Truffle::Boot`) and `ENV['NAME']`.

use crate::context::Context;
use crate::error::StartupError;
use std::fmt;
use std::io::Write;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    WasPreinitialized,
    Env(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Statement {
    /// `p`
    Inspect,
    /// `print`
    Print,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Bool(bool),
    Str(String),
    Nil,
}

impl Value {
    pub fn inspect(&self) -> String {
        match self {
            Value::Bool(b) => b.to_string(),
            Value::Str(s) => format!("{:?}", s),
            Value::Nil => "nil".to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Str(s) => f.write_str(s),
            Value::Nil => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    pub statement: Statement,
    pub expr: Expr,
}

fn parse_expr(source: &str) -> Option<Expr> {
    let source = source.trim();
    if matches!(
        source,
        "Boot.was_preinitialized?" | "Truffle::Boot.was_preinitialized?"
    ) {
        return Some(Expr::WasPreinitialized);
    }
    let inner = source.strip_prefix("ENV[")?.strip_suffix(']')?;
    let name = inner
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .or_else(|| inner.strip_prefix('"').and_then(|s| s.strip_suffix('"')))?;
    if name.is_empty() {
        return None;
    }
    Some(Expr::Env(name.to_string()))
}

impl Program {
    pub fn parse(source: &str) -> Result<Self, StartupError> {
        let source = source.trim();
        let (statement, rest) = if let Some(rest) = source.strip_prefix("print ") {
            (Statement::Print, rest)
        } else if let Some(rest) = source.strip_prefix("p ") {
            (Statement::Inspect, rest)
        } else {
            return Err(StartupError::Program(format!("unsupported statement: {}", source)));
        };
        let expr = parse_expr(rest)
            .ok_or_else(|| StartupError::Program(format!("unsupported expression: {}", rest.trim())))?;
        Ok(Self { statement, expr })
    }

    pub fn evaluate(&self, context: &Context) -> Value {
        match &self.expr {
            Expr::WasPreinitialized => Value::Bool(context.was_preinitialized()),
            Expr::Env(name) => context
                .env_var(name)
                .map(|v| Value::Str(v.to_string()))
                .unwrap_or(Value::Nil),
        }
    }

    /// Text the statement writes for `value`.
    pub fn render(&self, value: &Value) -> String {
        match self.statement {
            Statement::Inspect => format!("{}\n", value.inspect()),
            Statement::Print => value.to_string(),
        }
    }

    /// Evaluate and write the result through the context's stdout binding.
    pub fn run<W: Write>(&self, context: &Context, out: W) -> Result<Value, StartupError> {
        let value = self.evaluate(context);
        context.write_output(out, &self.render(&value))?;
        Ok(value)
    }
}
