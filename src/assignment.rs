//! `AssignmentValidator` + `AssignmentExpectedTypeResolver`: the pipeline
//! run on a `target <- expr` statement before it is emitted.

use crate::cast::CastValidator;
use crate::error::{AccessError, CapacityError, ConstWriteShape, TypeError};
use crate::scope_tables::ScopeTables;
use crate::state::CodegenState;
use crate::types::TypeInfo;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentTargetShape {
    Plain,
    ArrayElement,
    BitRange,
    MemberAccess,
}

pub struct AssignmentValidator;

impl AssignmentValidator {
    /// Step 1: constness check. The diagnostic names the target shape so
    /// the message distinguishes `x`, `a[i]`, and `s.field`.
    pub fn reject_const_write(
        name: &str,
        is_const: bool,
        shape: AssignmentTargetShape,
    ) -> Result<(), AccessError> {
        if is_const {
            return Err(AccessError::ConstWrite {
                name: name.to_string(),
                shape: match shape {
                    AssignmentTargetShape::Plain => ConstWriteShape::Plain,
                    AssignmentTargetShape::ArrayElement => ConstWriteShape::ArrayElement,
                    AssignmentTargetShape::BitRange => ConstWriteShape::BitRange,
                    AssignmentTargetShape::MemberAccess => ConstWriteShape::MemberAccess,
                },
            });
        }
        Ok(())
    }

    /// Step 2: a plain assignment to a float variable whose bit shadow is
    /// current invalidates the shadow (the backing bits no longer reflect
    /// the freshly-assigned value).
    pub fn invalidate_shadow_on_float_write(state: &CodegenState, var_name: &str, is_float_target: bool) {
        if !is_float_target {
            return;
        }
        let shadow = CodegenState::shadow_name(var_name);
        if state.is_shadow_current(&shadow) {
            state.invalidate_shadow(&shadow);
        }
    }

    /// Step 3: array element bounds, only when the index is a resolved
    /// literal; an unresolved index passes through untouched.
    pub fn validate_array_bounds(
        declared_size: Option<usize>,
        index: Option<usize>,
    ) -> Result<(), CapacityError> {
        match (declared_size, index) {
            (Some(size), Some(idx)) if idx >= size => Err(CapacityError::SubstringOutOfBounds {
                start: idx,
                length: 1,
                source_capacity: size,
            }),
            _ => Ok(()),
        }
    }

    /// Step 4: register-member write access.
    pub fn validate_register_write(
        symbols: &ScopeTables,
        register: &str,
        member: &str,
    ) -> Result<(), AccessError> {
        crate::member_access::MemberAccessValidator::validate_register_write(symbols, register, member)
    }

    /// Step 5: selects a type-compatibility check by the target's
    /// essential kind.
    pub fn validate_value_type(target: &TypeInfo, source: &TypeInfo) -> Result<(), TypeError> {
        if target.is_enum {
            if source.enum_type_name.as_deref() != target.enum_type_name.as_deref() {
                return Err(TypeError::EnumTypeMismatch {
                    expected_enum: target.enum_type_name.clone().unwrap_or_default(),
                    actual: source.base_type.clone(),
                });
            }
            return Ok(());
        }
        if target.is_integer() {
            return CastValidator::reject_if_invalid(source, target);
        }
        if target.base_type != source.base_type && !target.is_external_cpp_type {
            return Err(TypeError::TypeMismatch {
                expected: target.base_type.clone(),
                actual: source.base_type.clone(),
            });
        }
        Ok(())
    }
}

/// Resolves the type an assignment's right-hand side is expected to
/// conform to, given the target's own shape.
pub struct AssignmentExpectedTypeResolver;

impl AssignmentExpectedTypeResolver {
    pub fn resolve(state: &CodegenState, target_name: &str) -> Option<TypeInfo> {
        state.lookup_type(target_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TranspilerConfig;
    use crate::mode::Mode;

    fn new_state() -> CodegenState {
        CodegenState::new(TranspilerConfig::new(Mode::C), ScopeTables::default())
    }

    #[test]
    fn const_write_to_plain_target_has_no_suffix() {
        let err =
            AssignmentValidator::reject_const_write("x", true, AssignmentTargetShape::Plain).unwrap_err();
        assert_eq!(err.to_string(), "Cannot assign to const 'x'");
    }

    #[test]
    fn const_write_to_array_element_is_suffixed() {
        let err = AssignmentValidator::reject_const_write("a", true, AssignmentTargetShape::ArrayElement)
            .unwrap_err();
        assert_eq!(err.to_string(), "Cannot assign to const 'a' (array element)");
    }

    #[test]
    fn non_const_write_is_accepted() {
        assert!(AssignmentValidator::reject_const_write("x", false, AssignmentTargetShape::Plain).is_ok());
    }

    #[test]
    fn float_write_invalidates_current_shadow() {
        let state = new_state();
        state.declare_shadow(CodegenState::shadow_name("v"));
        AssignmentValidator::invalidate_shadow_on_float_write(&state, "v", true);
        assert!(!state.is_shadow_current(&CodegenState::shadow_name("v")));
    }

    #[test]
    fn array_bounds_violation_is_rejected_only_for_resolved_index() {
        assert!(AssignmentValidator::validate_array_bounds(Some(4), Some(4)).is_err());
        assert!(AssignmentValidator::validate_array_bounds(Some(4), Some(3)).is_ok());
        assert!(AssignmentValidator::validate_array_bounds(Some(4), None).is_ok());
    }

    #[test]
    fn narrowing_value_type_is_rejected_through_cast_validator() {
        let target = TypeInfo::primitive("u8");
        let source = TypeInfo::primitive("u32");
        assert!(AssignmentValidator::validate_value_type(&target, &source).is_err());
    }

    #[test]
    fn enum_mismatch_is_rejected() {
        let mut target = TypeInfo::primitive("Color");
        target.is_enum = true;
        target.enum_type_name = Some("Color".to_string());
        let mut source = TypeInfo::primitive("Direction");
        source.is_enum = true;
        source.enum_type_name = Some("Direction".to_string());
        let err = AssignmentValidator::validate_value_type(&target, &source).unwrap_err();
        assert_eq!(err.to_string(), "Expected value of enum 'Color' but got 'Direction'");
    }
}
