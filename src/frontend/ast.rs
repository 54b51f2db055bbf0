//! Abstract Syntax Tree definitions for Ago
//!
//! One tagged-variant tree: the parser produces exactly these shapes, so the
//! checker never sniffs node structure at runtime. Every expression carries a
//! `NodeId` so downstream consumers can key resolution data by node identity.

use crate::utils::Span;

/// Unique identity of an expression node within one compilation unit
pub type NodeId = u32;

/// A complete program (compilation unit)
#[derive(Debug, Clone)]
pub struct Program {
    pub items: Vec<Item>,
}

/// Top-level items, in source order
#[derive(Debug, Clone)]
pub enum Item {
    Function(FunctionDecl),
    Stmt(Stmt),
}

/// Function declaration: `des namea(p1, p2) { ... }`
#[derive(Debug, Clone)]
pub struct FunctionDecl {
    pub name: String,
    pub params: Vec<Param>,
    pub body: Block,
    pub span: Span,
}

/// Function or lambda parameter
#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub span: Span,
}

/// Lambda: `des(x, y) { ... }` or `des { ... }`
#[derive(Debug, Clone)]
pub struct LambdaDecl {
    pub params: Vec<Param>,
    pub body: Block,
    pub span: Span,
}

/// Code block
#[derive(Debug, Clone)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

/// Statement
#[derive(Debug, Clone)]
pub enum Stmt {
    /// `name := expr`
    Declaration {
        name: String,
        value: Expr,
        span: Span,
    },
    /// `target = expr` or `target[i]... = expr`
    Assignment {
        target: String,
        indices: Vec<Expr>,
        value: Expr,
        span: Span,
    },
    /// `si cond { } aluid cond { } aluid { }`
    If {
        cond: Expr,
        then_block: Block,
        elifs: Vec<ElifBranch>,
        else_block: Option<Block>,
        span: Span,
    },
    /// `dum cond { }`
    While {
        cond: Expr,
        body: Block,
        span: Span,
    },
    /// `pro iterator in iterable { }`
    For {
        iterator: String,
        iterable: Expr,
        body: Block,
        span: Span,
    },
    /// `redeo [expr]`
    Return { value: Option<Expr>, span: Span },
    /// `frio`
    Break { span: Span },
    /// `pergo`
    Continue { span: Span },
    /// `omitto`
    Pass { span: Span },
    /// Expression statement (calls, chains, bare expressions in lambdas)
    Expr(Expr),
}

/// One `aluid cond { }` branch
#[derive(Debug, Clone)]
pub struct ElifBranch {
    pub cond: Expr,
    pub body: Block,
    pub span: Span,
}

/// Expression with identity and location
#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
    pub id: NodeId,
    pub span: Span,
}

/// Expression kinds
#[derive(Debug, Clone)]
pub enum ExprKind {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
    Null,
    /// Identifier reference (possibly an alternate-suffix cast)
    Ident(String),
    /// The `id` keyword, or a suffixed variant (`ida`, `ides`, ...) caught
    /// during checking
    Id,
    /// `[a, b, c]`
    List(Vec<Expr>),
    /// `{key: value, "str key": value}`
    StructLit(Vec<StructEntry>),
    /// `base[index]`
    Index { base: Box<Expr>, index: Box<Expr> },
    /// `base.field` or `base."field name"`
    Field { base: Box<Expr>, field: FieldKey },
    /// `callee(args)`
    Call { callee: String, args: Vec<Expr> },
    /// `receiver.method(args)` - the receiver becomes implicit argument 0
    MethodCall {
        receiver: Box<Expr>,
        method: String,
        args: Vec<Expr>,
    },
    Lambda(LambdaDecl),
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Unary { op: UnOp, expr: Box<Expr> },
}

/// Struct literal entry
#[derive(Debug, Clone)]
pub struct StructEntry {
    pub key: StructKey,
    pub value: Expr,
    pub span: Span,
}

/// Struct literal key: identifier keys must carry a valid type suffix,
/// string-literal keys bypass that check
#[derive(Debug, Clone)]
pub enum StructKey {
    Ident(String),
    Str(String),
}

impl StructKey {
    pub fn text(&self) -> &str {
        match self {
            StructKey::Ident(s) | StructKey::Str(s) => s,
        }
    }
}

/// Field access key
#[derive(Debug, Clone)]
pub enum FieldKey {
    Ident(String),
    Str(String),
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    /// `vel`
    Or,
    /// `et`
    And,
    /// `|`
    BitOr,
    /// `&`
    BitAnd,
    /// `^`
    BitXor,
    /// `?:`
    Elvis,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    /// `est` - type identity test
    Est,
    /// `in` - membership
    In,
    /// `..` inclusive range
    Range,
    /// `.<` exclusive range
    RangeExcl,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl BinOp {
    /// Surface spelling, for diagnostics
    pub fn symbol(&self) -> &'static str {
        match self {
            BinOp::Or => "vel",
            BinOp::And => "et",
            BinOp::BitOr => "|",
            BinOp::BitAnd => "&",
            BinOp::BitXor => "^",
            BinOp::Elvis => "?:",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Gt => ">",
            BinOp::Le => "<=",
            BinOp::Ge => ">=",
            BinOp::Est => "est",
            BinOp::In => "in",
            BinOp::Range => "..",
            BinOp::RangeExcl => ".<",
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
        }
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    /// `non`
    Not,
    /// `-`
    Neg,
    /// `+`
    Pos,
}

impl UnOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            UnOp::Not => "non",
            UnOp::Neg => "-",
            UnOp::Pos => "+",
        }
    }
}
