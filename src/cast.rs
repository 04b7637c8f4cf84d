//! Cast and narrowing engine: classifies essential types,
//! detects narrowing and sign-change, and wraps expressions with the
//! MISRA-compliant cast the target essential type requires.
//!
//! Two forms of "narrowing cast wrap" exist in the source this crate's
//! lineage traces back to — one local to array-access codegen, one here.
//! Per an open design question, this crate adopts the form implemented
//! here (`((e) != 0U)` for `bool` targets) as the single canonical
//! contract; `array::ArrayAccessHelper` calls into this module rather than
//! keeping its own copy.

use crate::mode::{Mode, ModeDispatcher};
use crate::types::{is_float, is_integer, is_signed_int, is_unsigned_int, width_of, TypeInfo};

pub struct CastValidator;

impl CastValidator {
    pub fn is_narrowing(source: &TypeInfo, target: &TypeInfo) -> bool {
        target.bit_width < source.bit_width
    }

    pub fn is_sign_change(source: &TypeInfo, target: &TypeInfo) -> bool {
        source.is_integer()
            && target.is_integer()
            && (is_signed_int(&source.base_type) != is_signed_int(&target.base_type))
    }

    /// A C integer promotion rule: any sub-word integer result (bit-range,
    /// mask) is promoted to `int`. If the target is narrower than `int`
    /// (assumed 32-bit), the essential-type rule requires an explicit cast.
    pub fn requires_essential_wrap(target: &TypeInfo) -> bool {
        target.is_integer() && target.bit_width < 32
    }

    pub fn requires_float_clamp(source: &TypeInfo, target: &TypeInfo) -> bool {
        source.is_float() && target.is_integer()
    }

    /// Rejects narrowing/sign-changing casts between integer types unless
    /// the source is a bit-range extraction (the caller is expected to
    /// check that shape before calling this).
    pub fn reject_if_invalid(
        source: &TypeInfo,
        target: &TypeInfo,
    ) -> Result<(), crate::error::TypeError> {
        if !source.is_integer() || !target.is_integer() {
            return Ok(());
        }
        if Self::is_narrowing(source, target) {
            return Err(crate::error::TypeError::NarrowingCastRejected(
                crate::error::NarrowingCastRejected {
                    source_type: source.base_type.clone(),
                    target_type: target.base_type.clone(),
                    target_bit_width: target.bit_width,
                },
            ));
        }
        if Self::is_sign_change(source, target) {
            return Err(crate::error::TypeError::SignChangeRejected(
                crate::error::SignChangeRejected {
                    source_type: source.base_type.clone(),
                    target_type: target.base_type.clone(),
                },
            ));
        }
        Ok(())
    }
}

/// `NarrowingCastHelper`: wraps an expression with the correct cast when
/// the essential target type differs from the promoted source.
pub struct NarrowingCastHelper;

impl NarrowingCastHelper {
    /// Applies the canonical narrowing-cast wrap. Idempotent: calling this
    /// twice with the same `(mode, target)` reproduces the same text
    /// — an expression already wrapped for
    /// this exact target is detected by its cast prefix and passed through
    /// unchanged rather than wrapped again.
    pub fn wrap(mode: Mode, target: &TypeInfo, expr: &str) -> String {
        if target.is_bool() {
            if expr.starts_with('(') && expr.ends_with("!= 0U)") {
                return expr.to_string();
            }
            return format!("({expr} != 0U)");
        }
        let c_type = crate::type_render::c_primitive_name(&target.base_type);
        let already_wrapped = expr.starts_with(&format!("({c_type})("))
            || expr.starts_with(&format!("static_cast<{c_type}>("));
        if already_wrapped {
            return expr.to_string();
        }
        ModeDispatcher::cast(mode, &c_type, expr)
    }

    /// Wraps only if the essential-type rule actually requires it; returns
    /// the expression unchanged otherwise (used at array/bit-range read
    /// sites where a wider or absent target type needs no cast).
    pub fn wrap_if_needed(mode: Mode, target: Option<&TypeInfo>, expr: &str) -> String {
        match target {
            Some(t) if CastValidator::requires_essential_wrap(t) || t.is_bool() => {
                Self::wrap(mode, t, expr)
            }
            _ => expr.to_string(),
        }
    }
}

/// `BooleanHelper`: folds boolean literals to 0/1 integers and wraps
/// expressions needing boolean-to-integer conversion in a ternary.
pub struct BooleanHelper;

impl BooleanHelper {
    pub fn literal_as_int(value: bool) -> &'static str {
        if value {
            "1"
        } else {
            "0"
        }
    }

    pub fn ternary(expr: &str) -> String {
        format!("({expr} ? 1 : 0)")
    }
}

pub fn classify(name: &str) -> EssentialKind {
    if is_signed_int(name) {
        EssentialKind::SignedInt(width_of(name).unwrap_or(0))
    } else if is_unsigned_int(name) {
        EssentialKind::UnsignedInt(width_of(name).unwrap_or(0))
    } else if is_float(name) {
        EssentialKind::Float(width_of(name).unwrap_or(0))
    } else if name == "bool" {
        EssentialKind::Bool
    } else if is_integer(name) {
        EssentialKind::SignedInt(width_of(name).unwrap_or(0))
    } else {
        EssentialKind::Other
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EssentialKind {
    SignedInt(u32),
    UnsignedInt(u32),
    Float(u32),
    Bool,
    Other,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narrowing_rejected_without_bit_range() {
        let source = TypeInfo::primitive("u32");
        let target = TypeInfo::primitive("u8");
        let err = CastValidator::reject_if_invalid(&source, &target).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Cannot cast u32 to u8 (narrowing)"));
        assert!(msg.contains("expr[0, 8]"));
    }

    #[test]
    fn sign_change_between_same_width_is_rejected() {
        let source = TypeInfo::primitive("u32");
        let target = TypeInfo::primitive("i32");
        assert!(CastValidator::reject_if_invalid(&source, &target).is_err());
    }

    #[test]
    fn wrap_is_idempotent() {
        let target = TypeInfo::primitive("u8");
        let once = NarrowingCastHelper::wrap(Mode::C, &target, "x");
        let twice = NarrowingCastHelper::wrap(Mode::C, &target, &once);
        assert_eq!(once, "(uint8_t)(x)");
        assert_eq!(once, twice);
    }

    #[test]
    fn bool_target_uses_not_equal_zero_form() {
        let target = TypeInfo::primitive("bool");
        assert_eq!(NarrowingCastHelper::wrap(Mode::C, &target, "e"), "(e != 0U)");
    }
}
