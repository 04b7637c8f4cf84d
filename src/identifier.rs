//! `IdentifierResolver`: for a bare identifier, decides
//! parameter-deref vs. local vs. scope-member vs. global, and emits the
//! correct name.

use crate::mode::{Mode, ModeDispatcher};
use crate::state::CodegenState;

pub struct IdentifierResolver;

impl IdentifierResolver {
    /// Resolution order, in resolution-priority order:
    /// 1. current parameter (deref form if passed by reference)
    /// 2. local variable / local array
    /// 3. current-scope member (`Scope_x`)
    /// 4. otherwise, the bare identifier, for later passes to resolve
    ///    against globals/registers/scopes.
    pub fn resolve(state: &CodegenState, mode: Mode, name: &str) -> String {
        if let Some(param) = state.current_parameter(name) {
            if param.is_pass_by_value {
                return name.to_string();
            }
            return ModeDispatcher::deref(mode, name);
        }

        if state.is_local_variable(name) || state.is_local_array(name) {
            return name.to_string();
        }

        if let Some(scope) = state.current_scope() {
            if state.symbols.is_scope_member(&scope, name) {
                return format!("{scope}_{name}");
            }
        }

        name.to_string()
    }
}
