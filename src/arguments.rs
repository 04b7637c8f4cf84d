//! `ArgumentGenerator`: at call sites, decides for each
//! argument whether to emit it as-is, address-of it, wrap it in a compound
//! literal, or materialize a temporary.

use crate::cst::Expression;
use crate::mode::{Mode, ModeDispatcher};
use crate::state::CodegenState;
use crate::types::TypeInfo;

pub enum ArgumentShape<'a> {
    /// A bare identifier argument.
    Identifier { name: &'a str },
    /// A member-access argument (`a.b`), with whether the member is itself
    /// an array.
    MemberAccess { rendered: String, is_array_member: bool },
    /// A string-subscript argument (`s[i]`) against an integer target.
    StringSubscript { rendered: String },
    /// Any other rvalue expression (a computed value, not an lvalue).
    Rvalue { rendered: String },
}

pub struct ArgumentGenerator;

impl ArgumentGenerator {
    pub fn generate(
        state: &CodegenState,
        mode: Mode,
        shape: ArgumentShape,
        target_type: Option<&TypeInfo>,
    ) -> String {
        match shape {
            ArgumentShape::Identifier { name } => Self::identifier_argument(state, mode, name),
            ArgumentShape::MemberAccess {
                rendered,
                is_array_member,
            } => Self::member_access_argument(state, mode, &rendered, is_array_member, target_type),
            ArgumentShape::StringSubscript { rendered } => {
                Self::string_subscript_argument(mode, &rendered, target_type)
            }
            ArgumentShape::Rvalue { rendered } => Self::rvalue_argument(mode, &rendered, target_type),
        }
    }

    fn identifier_argument(state: &CodegenState, mode: Mode, name: &str) -> String {
        if let Some(param) = state.current_parameter(name) {
            if !param.is_pass_by_value {
                // already owned as pointer/reference by the caller's own
                // parameter slot
                return name.to_string();
            }
        }
        if state.is_local_array(name) {
            return name.to_string();
        }
        if let Some(scope) = state.current_scope() {
            if state.symbols.is_scope_member(&scope, name) {
                let scoped = format!("{scope}_{name}");
                return match mode {
                    Mode::C => ModeDispatcher::address_of(mode, &scoped),
                    Mode::Cxx => scoped,
                };
            }
        }
        if state.is_local_variable(name) {
            return match mode {
                Mode::C => format!("&{name}"),
                Mode::Cxx => name.to_string(),
            };
        }
        name.to_string()
    }

    fn member_access_argument(
        state: &CodegenState,
        mode: Mode,
        rendered: &str,
        is_array_member: bool,
        target_type: Option<&TypeInfo>,
    ) -> String {
        if is_array_member {
            return rendered.to_string();
        }
        if mode == Mode::Cxx {
            if let Some(target) = target_type {
                if crate::cast::CastValidator::requires_essential_wrap(target)
                    || crate::cast::CastValidator::is_narrowing(
                        &TypeInfo::primitive("i64"),
                        target,
                    )
                {
                    let temp = state.fresh_temp_name();
                    let c_type = crate::type_render::c_primitive_name(&target.base_type);
                    state.push_pending_temp(format!(
                        "{c_type} {temp} = static_cast<{c_type}>({rendered});"
                    ));
                    return temp;
                }
            }
            return rendered.to_string();
        }
        format!("&{rendered}")
    }

    fn string_subscript_argument(mode: Mode, rendered: &str, target_type: Option<&TypeInfo>) -> String {
        let c_type = target_type
            .map(|t| crate::type_render::c_primitive_name(&t.base_type))
            .unwrap_or_else(|| "int".to_string());
        let pointer_type = format!("{c_type}*");
        ModeDispatcher::reinterpret_cast(mode, &pointer_type, &format!("&{rendered}"))
    }

    fn rvalue_argument(mode: Mode, rendered: &str, target_type: Option<&TypeInfo>) -> String {
        match mode {
            Mode::Cxx => rendered.to_string(),
            Mode::C => {
                let c_type = target_type
                    .map(|t| crate::type_render::c_primitive_name(&t.base_type))
                    .unwrap_or_else(|| "int".to_string());
                format!("&({c_type}){{{rendered}}}")
            }
        }
    }

    /// Classifies a parsed call argument expression into the shape the
    /// dispatch table above expects.
    pub fn classify<'a>(expr: &'a Expression, rendered: String, is_array_member: bool) -> ArgumentShape<'a> {
        match expr {
            Expression::Identifier { name, .. } => ArgumentShape::Identifier { name },
            Expression::MemberAccess { .. } => ArgumentShape::MemberAccess {
                rendered,
                is_array_member,
            },
            Expression::Subscripted { .. } => ArgumentShape::StringSubscript { rendered },
            _ => ArgumentShape::Rvalue { rendered },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TranspilerConfig;
    use crate::scope_tables::ScopeTables;

    fn new_state() -> CodegenState {
        CodegenState::new(TranspilerConfig::new(Mode::C), ScopeTables::default())
    }

    #[test]
    fn rvalue_argument_wrapped_in_compound_literal_in_c() {
        let state = new_state();
        let target = TypeInfo::primitive("u8");
        let out = ArgumentGenerator::generate(
            &state,
            Mode::C,
            ArgumentShape::Rvalue {
                rendered: "42".to_string(),
            },
            Some(&target),
        );
        assert_eq!(out, "&(uint8_t){42}");
    }

    #[test]
    fn rvalue_argument_passed_unchanged_in_cpp() {
        let state = new_state();
        let out = ArgumentGenerator::generate(
            &state,
            Mode::Cxx,
            ArgumentShape::Rvalue {
                rendered: "42".to_string(),
            },
            None,
        );
        assert_eq!(out, "42");
    }

    #[test]
    fn local_non_array_identifier_gets_address_of_in_c() {
        let state = new_state();
        state.declare_local("x", false);
        let out = ArgumentGenerator::generate(
            &state,
            Mode::C,
            ArgumentShape::Identifier { name: "x" },
            None,
        );
        assert_eq!(out, "&x");
    }
}
