//! Diagnostic taxonomy. Grouped by user-visible kind, not by
//! exception type: `TypeError`, `AccessError`, `CapacityError`,
//! `ScopeError`, `ShapeError`. Each distinct condition is its own struct
//! with a hand-rolled `Display`/`Error` impl, following the convention of
//! `typechecker::error` in this lineage rather than pulling in a derive
//! macro crate for it.

use std::error::Error;
use std::fmt::Display;

use crate::cst::Span;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NarrowingCastRejected {
    pub source_type: String,
    pub target_type: String,
    pub target_bit_width: u32,
}

impl Display for NarrowingCastRejected {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Cannot cast {} to {} (narrowing). Consider expr[0, {}]",
            self.source_type, self.target_type, self.target_bit_width
        )
    }
}
impl Error for NarrowingCastRejected {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignChangeRejected {
    pub source_type: String,
    pub target_type: String,
}

impl Display for SignChangeRejected {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Cannot cast {} to {} (sign change)",
            self.source_type, self.target_type
        )
    }
}
impl Error for SignChangeRejected {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumTypeMismatch {
    pub expected_enum: String,
    pub actual: String,
}

impl Display for EnumTypeMismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Expected value of enum '{}' but got '{}'",
            self.expected_enum, self.actual
        )
    }
}
impl Error for EnumTypeMismatch {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeError {
    NarrowingCastRejected(NarrowingCastRejected),
    SignChangeRejected(SignChangeRejected),
    EnumTypeMismatch(EnumTypeMismatch),
    /// Any integer <-> float or struct/enum shape mismatch not covered by
    /// the two specific cast-rejection variants above.
    TypeMismatch { expected: String, actual: String },
}

impl Display for TypeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeError::NarrowingCastRejected(e) => e.fmt(f),
            TypeError::SignChangeRejected(e) => e.fmt(f),
            TypeError::EnumTypeMismatch(e) => e.fmt(f),
            TypeError::TypeMismatch { expected, actual } => {
                write!(f, "Expected type '{expected}' but got '{actual}'")
            }
        }
    }
}
impl Error for TypeError {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AccessError {
    ConstWrite { name: String, shape: ConstWriteShape },
    WriteOnlyRead { register: String, member: String },
    ReadOnlyWrite { register: String, member: String },
    VisibilityViolation { scope: String, member: String },
    SelfScopeReferenceByName { scope: String, member: String },
    GlobalAccessRequired { name: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConstWriteShape {
    Plain,
    ArrayElement,
    BitRange,
    MemberAccess,
}

impl Display for AccessError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccessError::ConstWrite { name, shape } => {
                let suffix = match shape {
                    ConstWriteShape::Plain => "",
                    ConstWriteShape::ArrayElement => " (array element)",
                    ConstWriteShape::BitRange => " (bit range)",
                    ConstWriteShape::MemberAccess => " (member access)",
                };
                write!(f, "Cannot assign to const '{name}'{suffix}")
            }
            AccessError::WriteOnlyRead { register, member } => {
                write!(f, "Cannot read write-only register member {register}.{member}")
            }
            AccessError::ReadOnlyWrite { register, member } => {
                write!(f, "Cannot write read-only register member {register}.{member}")
            }
            AccessError::VisibilityViolation { scope, member } => {
                write!(f, "'{member}' is private to scope '{scope}'")
            }
            AccessError::SelfScopeReferenceByName { scope, member } => {
                write!(
                    f,
                    "Cannot reference own scope '{scope}' by name. Use 'this.{member}'"
                )
            }
            AccessError::GlobalAccessRequired { name } => {
                write!(
                    f,
                    "'{name}' collides with a scope member; qualify with 'global.' or 'this.'"
                )
            }
        }
    }
}
impl Error for AccessError {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CapacityError {
    StringLiteralTooLong {
        declared_capacity: usize,
        literal_length: usize,
    },
    ConcatenationTooLarge {
        required: usize,
        declared_capacity: usize,
    },
    SubstringOutOfBounds {
        start: usize,
        length: usize,
        source_capacity: usize,
    },
    SubstringDestinationTooSmall {
        length: usize,
        destination_capacity: usize,
    },
    ArraySizeMismatch {
        declared: usize,
        provided: usize,
    },
    FillAllWithoutExplicitSize,
}

impl Display for CapacityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CapacityError::StringLiteralTooLong {
                declared_capacity,
                literal_length,
            } => write!(
                f,
                "String literal of length {literal_length} exceeds declared capacity string<{declared_capacity}>"
            ),
            CapacityError::ConcatenationTooLarge {
                required,
                declared_capacity,
            } => write!(
                f,
                "String concatenation requires capacity {required}, but string<{declared_capacity}>"
            ),
            CapacityError::SubstringOutOfBounds {
                start,
                length,
                source_capacity,
            } => write!(
                f,
                "Substring [{start}, {length}] exceeds source capacity {source_capacity}"
            ),
            CapacityError::SubstringDestinationTooSmall {
                length,
                destination_capacity,
            } => write!(
                f,
                "Substring of length {length} does not fit destination capacity {destination_capacity}"
            ),
            CapacityError::ArraySizeMismatch { declared, provided } => write!(
                f,
                "Array initializer has {provided} elements but declared size is {declared}"
            ),
            CapacityError::FillAllWithoutExplicitSize => {
                write!(f, "Fill-all initializer requires an explicit array size")
            }
        }
    }
}
impl Error for CapacityError {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScopeError {
    ThisOutsideScope,
    ScopedTypeOutsideScope { type_name: String },
    GlobalStringFloatBitIndexing,
}

impl Display for ScopeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScopeError::ThisOutsideScope => write!(f, "'this' used outside of a scope"),
            ScopeError::ScopedTypeOutsideScope { type_name } => {
                write!(f, "'{type_name}' is only valid inside its own scope")
            }
            ScopeError::GlobalStringFloatBitIndexing => write!(
                f,
                "Float bit indexing at global scope requires a local union and is not permitted here"
            ),
        }
    }
}
impl Error for ScopeError {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShapeError {
    SizeofOnArrayParameter { name: String },
    CStyleArrayDeclaration { name: String },
}

impl Display for ShapeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShapeError::SizeofOnArrayParameter { name } => write!(
                f,
                "sizeof({name}) on an array parameter yields pointer size, not array size"
            ),
            ShapeError::CStyleArrayDeclaration { name } => write!(
                f,
                "Use 'T[N] {name}' array declaration syntax instead of a C-style single-dimension declarator"
            ),
        }
    }
}
impl Error for ShapeError {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CodegenErrorKind {
    Type(TypeError),
    Access(AccessError),
    Capacity(CapacityError),
    Scope(ScopeError),
    Shape(ShapeError),
}

impl Display for CodegenErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CodegenErrorKind::Type(e) => e.fmt(f),
            CodegenErrorKind::Access(e) => e.fmt(f),
            CodegenErrorKind::Capacity(e) => e.fmt(f),
            CodegenErrorKind::Scope(e) => e.fmt(f),
            CodegenErrorKind::Shape(e) => e.fmt(f),
        }
    }
}
impl Error for CodegenErrorKind {}

/// A diagnostic with its source position attached. `Display` renders as
/// `"<line>:<col> <message>"`, matching the dispatcher's re-throw policy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodegenError {
    pub span: Span,
    pub kind: CodegenErrorKind,
}

impl CodegenError {
    pub fn new(span: Span, kind: impl Into<CodegenErrorKind>) -> Self {
        CodegenError { span, kind }
    }
}

impl Display for CodegenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.span, self.kind)
    }
}
impl Error for CodegenError {}

macro_rules! impl_from_kind {
    ($variant:ident, $ty:ty) => {
        impl From<$ty> for CodegenErrorKind {
            fn from(value: $ty) -> Self {
                CodegenErrorKind::$variant(value)
            }
        }
    };
}

impl_from_kind!(Type, TypeError);
impl_from_kind!(Access, AccessError);
impl_from_kind!(Capacity, CapacityError);
impl_from_kind!(Scope, ScopeError);
impl_from_kind!(Shape, ShapeError);

pub type CodegenResult<T> = Result<T, CodegenError>;
