//! `FunctionContextManager`: enters and exits a function body, publishing
//! the current function name, scope, return type, and parameter table onto
//! [`CodegenState`], and tearing them back down symmetrically.

use crate::scope_tables::ScopeTables;
use crate::state::CodegenState;
use crate::types::{ParameterInfo, TypeInfo};

pub struct FunctionContextManager;

impl FunctionContextManager {
    /// Runs the transitive modification propagator's result through
    /// `ParameterInputAdapter`, then publishes the function's parameters,
    /// return type, and enclosing scope on `state`.
    pub fn enter(
        state: &CodegenState,
        name: &str,
        ast_params: &[crate::cst::Parameter],
        modified_params: &std::collections::HashSet<String>,
        return_type: TypeInfo,
        scope: Option<String>,
    ) {
        let params: Vec<ParameterInfo> = ast_params
            .iter()
            .map(|p| {
                crate::parameters::ParameterInputAdapter::adapt(
                    p,
                    &state.symbols,
                    modified_params.contains(&p.name),
                )
            })
            .collect();
        state.enter_function(name, return_type, scope, params);
    }

    /// The inverse of `enter`: clears parameters, locals, and the float
    /// shadow tables so the next function starts from a clean slate.
    pub fn exit(state: &CodegenState) {
        state.exit_function();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::{Parameter, Span, TypeContext};
    use crate::mode::Mode;
    use std::collections::HashSet;

    fn new_state() -> CodegenState {
        CodegenState::new(crate::config::TranspilerConfig::new(Mode::C), ScopeTables::default())
    }

    fn param(name: &str, type_name: &str) -> Parameter {
        Parameter {
            name: name.to_string(),
            type_ctx: TypeContext::primitive(type_name, Span::synthetic()),
            is_const: false,
            callback_typedef: None,
            span: Span::synthetic(),
        }
    }

    #[test]
    fn enter_publishes_function_name_and_parameters() {
        let state = new_state();
        let params = vec![param("x", "u32")];
        FunctionContextManager::enter(
            &state,
            "compute",
            &params,
            &HashSet::new(),
            TypeInfo::primitive("u32"),
            None,
        );
        assert_eq!(state.current_function_name().as_deref(), Some("compute"));
        assert!(state.is_current_parameter("x"));
        state.exit_function();
    }

    #[test]
    fn exit_clears_parameters_and_function_state() {
        let state = new_state();
        let params = vec![param("x", "u32")];
        FunctionContextManager::enter(&state, "f", &params, &HashSet::new(), TypeInfo::primitive("void"), None);
        FunctionContextManager::exit(&state);
        assert!(state.current_function_name().is_none());
        assert!(!state.is_current_parameter("x"));
    }

    #[test]
    fn modified_parameter_is_not_auto_const() {
        let state = new_state();
        let params = vec![param("x", "u32")];
        let modified = HashSet::from(["x".to_string()]);
        FunctionContextManager::enter(&state, "f", &params, &modified, TypeInfo::primitive("void"), None);
        let info = state.current_parameter("x").unwrap();
        assert!(!info.is_auto_const);
        state.exit_function();
    }
}
