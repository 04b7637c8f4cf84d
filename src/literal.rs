//! `LiteralEvaluator`: parses integer literals in dec/hex/bin with an
//! optional type suffix, and evaluates the closed constant-expression
//! subset named — integer literals, sums, products, and
//! `sizeof` of primitive types, plus references to previously registered
//! constants.

use crate::cst::{BinaryOp, Expression};
use crate::types::width_of;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedLiteral {
    pub value: i128,
    pub suffix: Option<&'static str>,
}

/// Parse `\d+([uif](8|16|32|64))?`, `0x[0-9a-fA-F]+`, or `0b[01]+`, per the
/// parser contract.
pub fn parse_int_literal(text: &str) -> Option<ParsedLiteral> {
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        let value = i128::from_str_radix(hex, 16).ok()?;
        return Some(ParsedLiteral { value, suffix: None });
    }
    if let Some(bin) = text.strip_prefix("0b").or_else(|| text.strip_prefix("0B")) {
        let value = i128::from_str_radix(bin, 2).ok()?;
        return Some(ParsedLiteral { value, suffix: None });
    }

    const SUFFIXES: &[&str] = &[
        "u8", "u16", "u32", "u64", "i8", "i16", "i32", "i64", "f8", "f16", "f32", "f64",
    ];
    for suffix in SUFFIXES {
        if let Some(digits) = text.strip_suffix(suffix) {
            if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
                let value: i128 = digits.parse().ok()?;
                return Some(ParsedLiteral {
                    value,
                    suffix: Some(suffix),
                });
            }
        }
    }

    if !text.is_empty() && text.chars().all(|c| c.is_ascii_digit()) {
        let value: i128 = text.parse().ok()?;
        return Some(ParsedLiteral { value, suffix: None });
    }
    None
}

/// Evaluates the closed constant-expression subset over a table of
/// previously registered constants. Returns `None`, not an error, whenever
/// the expression falls outside the subset — the caller falls back to
/// literal text for unresolved dimensions.
pub struct LiteralEvaluator<'a> {
    pub constants: &'a HashMap<String, i128>,
}

impl<'a> LiteralEvaluator<'a> {
    pub fn new(constants: &'a HashMap<String, i128>) -> Self {
        LiteralEvaluator { constants }
    }

    pub fn evaluate(&self, expr: &Expression) -> Option<i128> {
        match expr {
            Expression::IntLiteral { text, .. } => parse_int_literal(text).map(|p| p.value),
            Expression::Identifier { name, .. } => self.constants.get(name).copied(),
            Expression::Unary {
                op: crate::cst::UnaryOp::Neg,
                operand,
                ..
            } => self.evaluate(operand).map(|v| -v),
            Expression::Binary {
                op, left, right, ..
            } => {
                let l = self.evaluate(left)?;
                let r = self.evaluate(right)?;
                match op {
                    BinaryOp::Add => Some(l + r),
                    BinaryOp::Sub => Some(l - r),
                    BinaryOp::Mul => Some(l * r),
                    _ => None,
                }
            }
            Expression::Parens { inner, .. } => self.evaluate(inner),
            Expression::Sizeof { type_ctx, .. } => {
                // sizeof is only folded for primitive types; user-type
                // sizeof is an open question and is left
                // unresolved here, not an error.
                width_of(&type_ctx.base_name).map(|bits| (bits / 8) as i128)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::Span;

    #[test]
    fn parses_decimal_with_suffix() {
        let lit = parse_int_literal("42u8").unwrap();
        assert_eq!(lit.value, 42);
        assert_eq!(lit.suffix, Some("u8"));
    }

    #[test]
    fn parses_hex_and_binary() {
        assert_eq!(parse_int_literal("0xFF").unwrap().value, 255);
        assert_eq!(parse_int_literal("0b101").unwrap().value, 5);
    }

    #[test]
    fn evaluates_sum_of_constants() {
        let mut constants = HashMap::new();
        constants.insert("BASE".to_string(), 10);
        let evaluator = LiteralEvaluator::new(&constants);
        let expr = Expression::Binary {
            op: BinaryOp::Add,
            left: Box::new(Expression::Identifier {
                name: "BASE".to_string(),
                span: Span::synthetic(),
            }),
            right: Box::new(Expression::IntLiteral {
                text: "5".to_string(),
                span: Span::synthetic(),
            }),
            span: Span::synthetic(),
        };
        assert_eq!(evaluator.evaluate(&expr), Some(15));
    }

    #[test]
    fn sizeof_primitive_folds_to_byte_width() {
        let constants = HashMap::new();
        let evaluator = LiteralEvaluator::new(&constants);
        let expr = Expression::Sizeof {
            type_ctx: crate::cst::TypeContext::primitive("u32", Span::synthetic()),
            span: Span::synthetic(),
        };
        assert_eq!(evaluator.evaluate(&expr), Some(4));
    }

    #[test]
    fn non_closed_expression_is_unresolved_not_error() {
        let constants = HashMap::new();
        let evaluator = LiteralEvaluator::new(&constants);
        let expr = Expression::Identifier {
            name: "unknown".to_string(),
            span: Span::synthetic(),
        };
        assert_eq!(evaluator.evaluate(&expr), None);
    }
}
