//! `TypeRegistrationEngine`: walks every top-level declaration once, before
//! any function body is emitted, seeding the type registry and constant
//! table on [`CodegenState`].

use crate::cst::TopLevelDeclaration;
use crate::error::CodegenError;
use crate::includes::IncludeTag;
use crate::mode::Mode;
use crate::state::CodegenState;
use crate::variable_decl::VariableDeclHelper;

pub struct TypeRegistrationEngine;

impl TypeRegistrationEngine {
    /// Registers every global variable declaration in source order.
    /// Function declarations are skipped here — `FunctionContextManager`
    /// handles them when the dispatcher reaches their bodies. Unresolved
    /// array dimensions (forward references to a constant declared later
    /// in the unit) are retained as literal text rather than rejected;
    /// a later `VariableDeclHelper::declare` call on the array itself will
    /// re-resolve against the now-complete constant table.
    pub fn register_all(
        state: &CodegenState,
        mode: Mode,
        declarations: &[TopLevelDeclaration],
    ) -> Result<Vec<String>, CodegenError> {
        let mut lines = Vec::new();
        for decl in declarations {
            if let TopLevelDeclaration::Variable(var) = decl {
                if var.type_ctx.is_string() {
                    state.require_include(IncludeTag::String);
                } else if var.type_ctx.base_name == "bool" {
                    state.require_include(IncludeTag::Stdbool);
                } else {
                    state.require_include(IncludeTag::Stdint);
                }
                lines.extend(VariableDeclHelper::declare(state, mode, var, false)?);
            }
        }
        Ok(lines)
    }

    /// Re-resolves any global array whose dimension referenced a constant
    /// that had not yet been registered at first-pass time, now that the
    /// full constant table is populated.
    pub fn reresolve_forward_referenced_arrays(
        state: &CodegenState,
        mode: Mode,
        declarations: &[TopLevelDeclaration],
    ) -> Result<Vec<String>, CodegenError> {
        let mut lines = Vec::new();
        for decl in declarations {
            if let TopLevelDeclaration::Variable(var) = decl {
                if var.type_ctx.is_array()
                    && var
                        .type_ctx
                        .array_dimensions
                        .iter()
                        .any(|d| matches!(d, crate::cst::ArrayDimension::Unresolved(_)))
                {
                    lines.extend(VariableDeclHelper::declare(state, mode, var, false)?);
                }
            }
        }
        Ok(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TranspilerConfig;
    use crate::cst::{Span, TypeContext, VariableDeclaration};
    use crate::scope_tables::ScopeTables;

    fn new_state() -> CodegenState {
        CodegenState::new(TranspilerConfig::new(Mode::C), ScopeTables::default())
    }

    #[test]
    fn registers_global_constant_before_dependent_array() {
        let state = new_state();
        let size_decl = TopLevelDeclaration::Variable(VariableDeclaration {
            name: "SIZE".to_string(),
            type_ctx: TypeContext::primitive("u32", Span::synthetic()),
            initializer: Some(crate::cst::Expression::IntLiteral {
                text: "4".to_string(),
                span: Span::synthetic(),
            }),
            is_const: true,
            span: Span::synthetic(),
        });
        let lines = TypeRegistrationEngine::register_all(&state, Mode::C, &[size_decl]).unwrap();
        assert_eq!(lines, vec!["const uint32_t SIZE = 4;"]);
        assert_eq!(state.const_value("SIZE"), Some(4));
    }

    #[test]
    fn string_global_requires_string_header() {
        let state = new_state();
        let mut ctx = TypeContext::primitive("string", Span::synthetic());
        ctx.string_capacity = Some(crate::cst::ArrayDimension::Literal(8));
        let decl = TopLevelDeclaration::Variable(VariableDeclaration {
            name: "label".to_string(),
            type_ctx: ctx,
            initializer: None,
            is_const: false,
            span: Span::synthetic(),
        });
        TypeRegistrationEngine::register_all(&state, Mode::C, &[decl]).unwrap();
        assert!(state.includes_required().contains(&IncludeTag::String));
    }
}
