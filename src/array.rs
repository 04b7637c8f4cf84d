//! Array dimensions, indexed access, and initializer list handling.

use crate::cst::{ArrayDimension, Expression};
use crate::literal::LiteralEvaluator;
use crate::mode::Mode;
use crate::types::TypeInfo;
use std::collections::HashMap;

pub struct ArrayDimensionParser;

impl ArrayDimensionParser {
    /// Resolves an array dimension expression to a numeric constant where
    /// possible; unknown identifiers fall back to literal text rather than
    /// raising an error — the backend compiler will reject
    /// genuinely invalid text.
    pub fn resolve(expr: &Expression, constants: &HashMap<String, i128>) -> ArrayDimension {
        let evaluator = LiteralEvaluator::new(constants);
        match evaluator.evaluate(expr) {
            Some(value) if value >= 0 => ArrayDimension::Literal(value as usize),
            _ => ArrayDimension::Unresolved(Self::text_of(expr)),
        }
    }

    fn text_of(expr: &Expression) -> String {
        match expr {
            Expression::Identifier { name, .. } => name.clone(),
            Expression::IntLiteral { text, .. } => text.clone(),
            _ => "/* unresolved dimension */".to_string(),
        }
    }
}

/// `ArrayAccessHelper`: generates `a[i]`, bit-range reads, and the MISRA
/// narrowing cast around sub-word results. Bit-range wrapping delegates to
/// [`crate::cast::NarrowingCastHelper`] as the single canonical contract.
pub struct ArrayAccessHelper;

impl ArrayAccessHelper {
    pub fn index(base_expr: &str, index_expr: &str) -> String {
        format!("{base_expr}[{index_expr}]")
    }

    pub fn bit_range_read(
        mode: Mode,
        base_expr: &str,
        start: u32,
        width: u32,
        target: Option<&TypeInfo>,
    ) -> Result<String, &'static str> {
        crate::bitrange::BitRangeHelper::read_integer(mode, base_expr, start, width, target)
    }
}

/// `ArrayInitHelper`: initializer lists, size inference, and fill-all
/// (`[value*]`) semantics.
pub struct ArrayInitHelper;

impl ArrayInitHelper {
    /// Renders a plain initializer list `{ a, b, c }`.
    pub fn literal_list(elements: &[String]) -> String {
        format!("{{ {} }}", elements.join(", "))
    }

    /// Expands a `[value*]` fill-all initializer to the explicit-size form
    /// required by the declared array dimension. A non-empty fill value
    /// expands element-by-element; an all-zero fill is left in the compact
    /// `{0}` form C already zero-extends from.
    pub fn fill_all(
        declared_size: Option<usize>,
        value_expr: &str,
    ) -> Result<String, crate::error::CapacityError> {
        let size = declared_size.ok_or(crate::error::CapacityError::FillAllWithoutExplicitSize)?;
        if value_expr == "0" {
            return Ok("{0}".to_string());
        }
        let elements = vec![value_expr.to_string(); size];
        Ok(Self::literal_list(&elements))
    }

    /// Validates an explicit initializer list's element count against the
    /// declared array size, returning the inferred size when the
    /// declaration omitted one.
    pub fn infer_size(
        declared_size: Option<usize>,
        provided_count: usize,
    ) -> Result<usize, crate::error::CapacityError> {
        match declared_size {
            None => Ok(provided_count),
            Some(declared) if declared == provided_count => Ok(declared),
            Some(declared) => Err(crate::error::CapacityError::ArraySizeMismatch {
                declared,
                provided: provided_count,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::Span;

    #[test]
    fn resolves_known_constant_dimension() {
        let mut constants = HashMap::new();
        constants.insert("SIZE".to_string(), 16);
        let expr = Expression::Identifier {
            name: "SIZE".to_string(),
            span: Span::synthetic(),
        };
        assert_eq!(
            ArrayDimensionParser::resolve(&expr, &constants),
            ArrayDimension::Literal(16)
        );
    }

    #[test]
    fn unresolved_dimension_falls_back_to_text() {
        let constants = HashMap::new();
        let expr = Expression::Identifier {
            name: "UNKNOWN_SIZE".to_string(),
            span: Span::synthetic(),
        };
        assert_eq!(
            ArrayDimensionParser::resolve(&expr, &constants),
            ArrayDimension::Unresolved("UNKNOWN_SIZE".to_string())
        );
    }

    #[test]
    fn fill_all_expands_nonzero_value() {
        let result = ArrayInitHelper::fill_all(Some(3), "7").unwrap();
        assert_eq!(result, "{ 7, 7, 7 }");
    }

    #[test]
    fn fill_all_keeps_zero_compact() {
        let result = ArrayInitHelper::fill_all(Some(100), "0").unwrap();
        assert_eq!(result, "{0}");
    }

    #[test]
    fn fill_all_without_size_is_capacity_error() {
        assert!(ArrayInitHelper::fill_all(None, "1").is_err());
    }

    #[test]
    fn size_mismatch_is_rejected() {
        assert!(ArrayInitHelper::infer_size(Some(4), 3).is_err());
        assert_eq!(ArrayInitHelper::infer_size(None, 3).unwrap(), 3);
    }
}
