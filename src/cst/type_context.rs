//! The parser's `typeContext` node: a type annotation as
//! written in source, before the registry has resolved it into a
//! [`crate::types::TypeInfo`].

use super::span::Span;

/// One array dimension as written by the user. Dimensions that reference a
/// constant which hasn't been registered yet are retained as literal text
/// rather than rejected — resolution happens later, in
/// [`crate::array::ArrayDimensionParser`], and an unresolved dimension is
/// passed through to the backend rather than treated as an error.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ArrayDimension {
    Literal(usize),
    Unresolved(String),
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TypeContext {
    /// The bare type name as written: a primitive (`u8`..`u64`, `i8`..`i64`,
    /// `f32`, `f64`, `bool`), `string`, or a registered struct/enum/bitmap/
    /// register/scope-qualified name.
    pub base_name: String,
    pub is_const: bool,
    pub array_dimensions: Vec<ArrayDimension>,
    /// Present only when `base_name == "string"`.
    pub string_capacity: Option<ArrayDimension>,
    pub span: Span,
}

impl TypeContext {
    pub fn primitive(name: impl Into<String>, span: Span) -> Self {
        TypeContext {
            base_name: name.into(),
            is_const: false,
            array_dimensions: Vec::new(),
            string_capacity: None,
            span,
        }
    }

    pub fn is_array(&self) -> bool {
        !self.array_dimensions.is_empty()
    }

    pub fn is_string(&self) -> bool {
        self.base_name == "string"
    }
}
