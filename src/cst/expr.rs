//! The parser's expression contract. A tagged variant per node
//! kind, matching only the accessors the core reads, rather than a
//! duck-typed parse-tree node.

use super::span::Span;
use super::type_context::TypeContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum UnaryOp {
    Neg,
    Not,
    BitNot,
}

/// The argument list of a postfix subscript: either a plain index (`a[i]`)
/// or a bit range (`v[start, width]`),.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Subscript {
    Index(Box<Expression>),
    BitRange {
        start: Box<Expression>,
        width: Box<Expression>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Expression {
    Identifier {
        name: String,
        span: Span,
    },
    /// Raw literal text including any type suffix, exactly as the lexer
    /// hands it over: `\d+([uif](8|16|32|64))?`, `0x[0-9a-fA-F]+`, or
    /// `0b[01]+`.
    IntLiteral {
        text: String,
        span: Span,
    },
    BoolLiteral {
        value: bool,
        span: Span,
    },
    StringLiteral {
        /// Decoded value, quotes already stripped.
        value: String,
        span: Span,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expression>,
        right: Box<Expression>,
        span: Span,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expression>,
        span: Span,
    },
    Parens {
        inner: Box<Expression>,
        span: Span,
    },
    MemberAccess {
        base: Box<Expression>,
        member: String,
        span: Span,
    },
    Subscripted {
        base: Box<Expression>,
        index: Subscript,
        span: Span,
    },
    Call {
        callee: String,
        args: Vec<Expression>,
        span: Span,
    },
    StructLiteral {
        type_name: String,
        fields: Vec<(String, Expression)>,
        span: Span,
    },
    Sizeof {
        type_ctx: TypeContext,
        span: Span,
    },
}

impl Expression {
    pub fn span(&self) -> Span {
        match self {
            Expression::Identifier { span, .. }
            | Expression::IntLiteral { span, .. }
            | Expression::BoolLiteral { span, .. }
            | Expression::StringLiteral { span, .. }
            | Expression::Binary { span, .. }
            | Expression::Unary { span, .. }
            | Expression::Parens { span, .. }
            | Expression::MemberAccess { span, .. }
            | Expression::Subscripted { span, .. }
            | Expression::Call { span, .. }
            | Expression::StructLiteral { span, .. }
            | Expression::Sizeof { span, .. } => *span,
        }
    }

    /// Whether this expression denotes an lvalue (identifier, member
    /// access, or subscript chain) as opposed to a computed rvalue. Used by
    /// the [`crate::arguments::ArgumentGenerator`] to decide address-of vs.
    /// compound-literal wrapping.
    pub fn is_lvalue(&self) -> bool {
        matches!(
            self,
            Expression::Identifier { .. }
                | Expression::MemberAccess { .. }
                | Expression::Subscripted { .. }
        )
    }
}
