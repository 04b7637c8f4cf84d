//! `ParameterInputAdapter` + `SignatureBuilder`: normalizes
//! AST parameters into [`ParameterInfo`] and renders function parameter
//! signatures, including the pass-by-value/pass-by-reference/auto-const
//! calculus.

use crate::cst::Parameter as AstParameter;
use crate::mode::Mode;
use crate::scope_tables::ScopeTables;
use crate::types::{is_float, ParameterInfo};

pub struct ParameterInputAdapter;

impl ParameterInputAdapter {
    /// Normalizes a parsed parameter into the internal `ParameterInfo`
    /// shape, deciding pass-by-value vs. pass-by-reference per the rule
    /// list. `modified` comes from the transitive
    /// modification analysis and drives auto-const.
    pub fn adapt(param: &AstParameter, symbols: &ScopeTables, modified: bool) -> ParameterInfo {
        let base_type = param.type_ctx.base_name.clone();
        let is_array = param.type_ctx.is_array();
        let is_string = param.type_ctx.is_string();
        let is_struct = symbols.is_known_struct(&base_type);
        let is_enum = symbols.is_known_enum(&base_type);
        let is_callback = param.callback_typedef.is_some();
        let is_unknown = !crate::types::is_primitive(&base_type)
            && !is_struct
            && !is_enum
            && !is_string
            && !is_array;

        let is_pass_by_value = is_callback
            || is_float(&base_type)
            || is_enum
            || is_struct
            || is_array
            || is_string
            || is_unknown;

        let is_auto_const = !param.is_const && !modified && !is_pass_by_value;

        let string_capacity = match &param.type_ctx.string_capacity {
            Some(crate::cst::ArrayDimension::Literal(n)) => Some(*n),
            _ => None,
        };

        ParameterInfo {
            name: param.name.clone(),
            base_type,
            is_array,
            is_struct,
            is_const: param.is_const,
            is_callback,
            is_string,
            is_unbounded_string: is_string && param.type_ctx.string_capacity.is_none(),
            is_auto_const,
            array_dimensions: param.type_ctx.array_dimensions.clone(),
            callback_typedef_name: param.callback_typedef.clone(),
            string_capacity,
            is_pass_by_value,
            force_pointer_syntax: false,
        }
    }
}

pub struct SignatureBuilder;

impl SignatureBuilder {
    /// Renders a single parameter's declarator.6:
    /// - callback: typedef name unchanged
    /// - array: `T name[d1][d2]…`, const-auto applied as a prefix
    /// - non-array string: `const char* name` / `char* name`
    /// - pass-by-value: `T name` (with optional const)
    /// - pass-by-reference in C: `T* name`; in C++: `T& name`
    /// - `force_pointer_syntax` overrides the C++ reference choice
    pub fn render(mode: Mode, param: &ParameterInfo) -> String {
        if let Some(typedef) = &param.callback_typedef_name {
            return format!("{typedef} {}", param.name);
        }

        let const_prefix = if param.is_const || param.is_auto_const {
            "const "
        } else {
            ""
        };

        if param.is_array {
            let type_info = param.type_info();
            let base = crate::type_render::TypeGenerationHelper::render_base(mode, &type_info);
            let dims: String = param
                .array_dimensions
                .iter()
                .map(|d| match d {
                    crate::cst::ArrayDimension::Literal(n) => format!("[{n}]"),
                    crate::cst::ArrayDimension::Unresolved(text) => format!("[{text}]"),
                })
                .collect();
            return format!("{const_prefix}{base} {}{dims}", param.name);
        }

        if param.is_string {
            let ptr = if param.is_const || param.is_auto_const {
                "const char*"
            } else {
                "char*"
            };
            return format!("{ptr} {}", param.name);
        }

        let c_type = crate::type_render::c_primitive_name(&param.base_type);

        if param.is_pass_by_value {
            return format!("{const_prefix}{c_type} {}", param.name);
        }

        if param.force_pointer_syntax {
            return format!("{const_prefix}{c_type}* {}", param.name);
        }

        match mode {
            Mode::C => format!("{const_prefix}{c_type}* {}", param.name),
            Mode::Cxx => format!("{const_prefix}{c_type}& {}", param.name),
        }
    }

    pub fn render_signature(mode: Mode, params: &[ParameterInfo]) -> String {
        params
            .iter()
            .map(|p| Self::render(mode, p))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::{Span, TypeContext};

    fn ast_param(name: &str, type_name: &str) -> AstParameter {
        AstParameter {
            name: name.to_string(),
            type_ctx: TypeContext::primitive(type_name, Span::synthetic()),
            is_const: false,
            callback_typedef: None,
            span: Span::synthetic(),
        }
    }

    #[test]
    fn primitive_parameter_is_pass_by_reference_in_c() {
        let symbols = ScopeTables::default();
        let info = ParameterInputAdapter::adapt(&ast_param("x", "u32"), &symbols, false);
        assert!(!info.is_pass_by_value);
        assert_eq!(SignatureBuilder::render(Mode::C, &info), "uint32_t* x");
    }

    #[test]
    fn primitive_parameter_is_reference_in_cpp() {
        let symbols = ScopeTables::default();
        let info = ParameterInputAdapter::adapt(&ast_param("x", "u32"), &symbols, false);
        assert_eq!(SignatureBuilder::render(Mode::Cxx, &info), "uint32_t& x");
    }

    #[test]
    fn unmodified_primitive_parameter_is_auto_const() {
        let symbols = ScopeTables::default();
        let info = ParameterInputAdapter::adapt(&ast_param("x", "u32"), &symbols, false);
        assert!(info.is_auto_const);
        assert_eq!(SignatureBuilder::render(Mode::C, &info), "const uint32_t* x");
    }

    #[test]
    fn modified_primitive_parameter_is_not_const() {
        let symbols = ScopeTables::default();
        let info = ParameterInputAdapter::adapt(&ast_param("x", "u32"), &symbols, true);
        assert!(!info.is_auto_const);
        assert_eq!(SignatureBuilder::render(Mode::C, &info), "uint32_t* x");
    }

    #[test]
    fn float_parameter_is_pass_by_value() {
        let symbols = ScopeTables::default();
        let info = ParameterInputAdapter::adapt(&ast_param("x", "f32"), &symbols, false);
        assert!(info.is_pass_by_value);
        assert_eq!(SignatureBuilder::render(Mode::C, &info), "float x");
    }
}
