//! Expression tree shared by paths and closure bodies.
//!
//! A path such as `findAll{it.age > 20}.name` is the same tree as the body
//! of a closure; the only difference is the base: `Root` for paths, `It`
//! for closure bodies.

use std::fmt;

use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// The whole document (`$` or the empty path).
    Root,
    /// The element bound by the enclosing closure.
    It,
    Literal(Value),
    FieldAccess {
        target: Box<Expr>,
        name: String,
    },
    /// `target[i]` or `target[i, j, ...]`; negative indexes count from the end.
    Index {
        target: Box<Expr>,
        indices: Vec<i64>,
    },
    /// `find{...}` when `first` is set, `findAll{...}` otherwise.
    Filter {
        target: Box<Expr>,
        predicate: Box<Expr>,
        first: bool,
    },
    /// `collect{...}`
    Project {
        target: Box<Expr>,
        mapping: Box<Expr>,
    },
    Aggregate {
        target: Box<Expr>,
        function: Aggregate,
    },
    MethodCall {
        target: Box<Expr>,
        method: Method,
        args: Vec<Expr>,
    },
    BinaryOp {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Not(Box<Expr>),
    Neg(Box<Expr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    Size,
    Max,
    Min,
    Sum,
    ToArray,
}

impl Aggregate {
    pub(crate) fn from_name(name: &str) -> Option<Aggregate> {
        match name {
            "size" => Some(Aggregate::Size),
            "max" => Some(Aggregate::Max),
            "min" => Some(Aggregate::Min),
            "sum" => Some(Aggregate::Sum),
            "toArray" => Some(Aggregate::ToArray),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Aggregate::Size => "size",
            Aggregate::Max => "max",
            Aggregate::Min => "min",
            Aggregate::Sum => "sum",
            Aggregate::ToArray => "toArray",
        }
    }
}

/// String and collection methods usable inside closures and paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Contains,
    StartsWith,
    EndsWith,
    Length,
    ToUpperCase,
    ToLowerCase,
}

impl Method {
    pub(crate) fn from_name(name: &str) -> Option<Method> {
        match name {
            "contains" => Some(Method::Contains),
            "startsWith" => Some(Method::StartsWith),
            "endsWith" => Some(Method::EndsWith),
            "length" => Some(Method::Length),
            "toUpperCase" => Some(Method::ToUpperCase),
            "toLowerCase" => Some(Method::ToLowerCase),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Method::Contains => "contains",
            Method::StartsWith => "startsWith",
            Method::EndsWith => "endsWith",
            Method::Length => "length",
            Method::ToUpperCase => "toUpperCase",
            Method::ToLowerCase => "toLowerCase",
        }
    }

    pub(crate) fn arity(self) -> usize {
        match self {
            Method::Contains | Method::StartsWith | Method::EndsWith => 1,
            Method::Length | Method::ToUpperCase | Method::ToLowerCase => 0,
        }
    }
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
    Mod,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Or => "||",
            BinaryOp::And => "&&",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
        }
    }
}

/// Renders the tree back as path syntax, fully parenthesizing binary
/// operations.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Root => f.write_str("$"),
            Expr::It => f.write_str("it"),
            Expr::Literal(Value::String(text)) => write!(f, "'{}'", text.replace('\'', "\\'")),
            Expr::Literal(value) => write!(f, "{value}"),
            Expr::FieldAccess { target, name } => write!(f, "{target}.{name}"),
            Expr::Index { target, indices } => {
                let list: Vec<String> = indices.iter().map(ToString::to_string).collect();
                write!(f, "{target}[{}]", list.join(", "))
            }
            Expr::Filter {
                target,
                predicate,
                first,
            } => {
                let name = if *first { "find" } else { "findAll" };
                write!(f, "{target}.{name}{{{predicate}}}")
            }
            Expr::Project { target, mapping } => write!(f, "{target}.collect{{{mapping}}}"),
            Expr::Aggregate { target, function } => write!(f, "{target}.{}()", function.name()),
            Expr::MethodCall {
                target,
                method,
                args,
            } => {
                let list: Vec<String> = args.iter().map(ToString::to_string).collect();
                write!(f, "{target}.{}({})", method.name(), list.join(", "))
            }
            Expr::BinaryOp { op, lhs, rhs } => write!(f, "({lhs} {} {rhs})", op.symbol()),
            Expr::Not(inner) => write!(f, "!{inner}"),
            Expr::Neg(inner) => write!(f, "-{inner}"),
        }
    }
}
