//! Syntax tree for the generated program
//!
//! A deliberately small subset of the target language: enough statements
//! and expressions to express node calls, temp-store traffic, nested-call
//! helpers and debug instrumentation. Free functions at the bottom of the
//! module are the builder layer used throughout the compiler.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Binary operators available to operator (immediate) nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOperator {
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    NotEq,
    #[serde(rename = "===")]
    StrictEq,
    #[serde(rename = "!==")]
    StrictNotEq,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    LtEq,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    GtEq,
    #[serde(rename = "<<")]
    Shl,
    #[serde(rename = ">>")]
    Shr,
    #[serde(rename = ">>>")]
    UShr,
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Sub,
    #[serde(rename = "*")]
    Mul,
    #[serde(rename = "/")]
    Div,
    #[serde(rename = "%")]
    Rem,
    #[serde(rename = "&")]
    BitAnd,
    #[serde(rename = "|")]
    BitOr,
    #[serde(rename = "^")]
    BitXor,
    #[serde(rename = "in")]
    In,
    #[serde(rename = "instanceof")]
    InstanceOf,
    #[serde(rename = "**")]
    Exp,
}

impl BinaryOperator {
    pub const ALL: [BinaryOperator; 22] = [
        Self::Eq,
        Self::NotEq,
        Self::StrictEq,
        Self::StrictNotEq,
        Self::Lt,
        Self::LtEq,
        Self::Gt,
        Self::GtEq,
        Self::Shl,
        Self::Shr,
        Self::UShr,
        Self::Add,
        Self::Sub,
        Self::Mul,
        Self::Div,
        Self::Rem,
        Self::BitAnd,
        Self::BitOr,
        Self::BitXor,
        Self::In,
        Self::InstanceOf,
        Self::Exp,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::StrictEq => "===",
            Self::StrictNotEq => "!==",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::Shl => "<<",
            Self::Shr => ">>",
            Self::UShr => ">>>",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Rem => "%",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::BitXor => "^",
            Self::In => "in",
            Self::InstanceOf => "instanceof",
            Self::Exp => "**",
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for BinaryOperator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|op| op.symbol() == s)
            .ok_or_else(|| format!("unknown binary operator '{}'", s))
    }
}

/// Declaration keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Const,
    Let,
    Var,
}

impl DeclKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            DeclKind::Const => "const",
            DeclKind::Let => "let",
            DeclKind::Var => "var",
        }
    }
}

/// Expressions
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Ident(String),
    Str(String),
    Num(f64),
    /// Big integer literal, decimal digits without the suffix
    BigInt(String),
    Bool(bool),
    Null,
    /// Verbatim source text (serialized literals)
    Raw(String),
    Binary {
        op: BinaryOperator,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Member {
        object: Box<Expr>,
        property: String,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    Array(Vec<Expr>),
    Object(Vec<(String, Expr)>),
    Function(Box<Function>),
    Arrow {
        params: Vec<String>,
        body: Box<Expr>,
    },
    Assign {
        target: Box<Expr>,
        value: Box<Expr>,
    },
    Yield(Box<Expr>),
}

/// A function declaration or expression
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: Option<String>,
    pub params: Vec<String>,
    pub body: Block,
    /// Emit as a generator (`function*`)
    pub generator: bool,
}

/// Statements
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Expr(Expr),
    Decl {
        kind: DeclKind,
        name: String,
        init: Expr,
    },
    If {
        test: Expr,
        consequent: Block,
        alternate: Option<Block>,
    },
    While {
        test: Expr,
        body: Block,
    },
    Return(Option<Expr>),
    Block(Block),
    Function(Function),
    /// Verbatim source text (helper fragments, user code)
    Raw(String),
}

/// An ordered list of statements
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Block(pub Vec<Stmt>);

impl Block {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, stmt: Stmt) {
        self.0.push(stmt);
    }

    pub fn extend(&mut self, stmts: impl IntoIterator<Item = Stmt>) {
        self.0.extend(stmts);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn statements(&self) -> &[Stmt] {
        &self.0
    }
}

impl From<Vec<Stmt>> for Block {
    fn from(stmts: Vec<Stmt>) -> Self {
        Self(stmts)
    }
}

/// A whole program
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub body: Vec<Stmt>,
}

pub fn ident(name: impl Into<String>) -> Expr {
    Expr::Ident(name.into())
}

pub fn string(value: impl Into<String>) -> Expr {
    Expr::Str(value.into())
}

pub fn member(object: Expr, property: impl Into<String>) -> Expr {
    Expr::Member {
        object: Box::new(object),
        property: property.into(),
    }
}

pub fn call(callee: Expr, args: Vec<Expr>) -> Expr {
    Expr::Call {
        callee: Box::new(callee),
        args,
    }
}

/// `object.method(args...)`
pub fn method_call(object: Expr, method: impl Into<String>, args: Vec<Expr>) -> Expr {
    call(member(object, method), args)
}

pub fn binary(op: BinaryOperator, left: Expr, right: Expr) -> Expr {
    Expr::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}

pub fn object(props: Vec<(&str, Expr)>) -> Expr {
    Expr::Object(props.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
}

pub fn function_expr(name: Option<&str>, params: Vec<String>, body: Block, generator: bool) -> Expr {
    Expr::Function(Box::new(Function {
        name: name.map(str::to_string),
        params,
        body,
        generator,
    }))
}

pub fn function_decl(name: impl Into<String>, params: Vec<String>, body: Block, generator: bool) -> Stmt {
    Stmt::Function(Function {
        name: Some(name.into()),
        params,
        body,
        generator,
    })
}

pub fn expr_stmt(expr: Expr) -> Stmt {
    Stmt::Expr(expr)
}

pub fn decl(kind: DeclKind, name: impl Into<String>, init: Expr) -> Stmt {
    Stmt::Decl {
        kind,
        name: name.into(),
        init,
    }
}

pub fn if_stmt(test: Expr, consequent: Block) -> Stmt {
    Stmt::If {
        test,
        consequent,
        alternate: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_symbols_round_trip() {
        for op in BinaryOperator::ALL {
            assert_eq!(op.symbol().parse::<BinaryOperator>().unwrap(), op);
        }
        assert!("<>".parse::<BinaryOperator>().is_err());
    }

    #[test]
    fn test_operator_serde_uses_symbol() {
        let json = serde_json::to_string(&BinaryOperator::UShr).unwrap();
        assert_eq!(json, "\">>>\"");
        let op: BinaryOperator = serde_json::from_str("\"instanceof\"").unwrap();
        assert_eq!(op, BinaryOperator::InstanceOf);
    }

    #[test]
    fn test_method_call_shape() {
        let expr = method_call(ident("context"), "getTemp", vec![string("a:b")]);
        match expr {
            Expr::Call { callee, args } => {
                assert_eq!(*callee, member(ident("context"), "getTemp"));
                assert_eq!(args, vec![Expr::Str("a:b".to_string())]);
            }
            other => panic!("Expected call, got {:?}", other),
        }
    }
}
