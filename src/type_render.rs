//! `TypeGenerationHelper`: renders a type context to its C or C++ spelling.

use crate::mode::Mode;
use crate::types::TypeInfo;

/// Maps a source primitive name to its C/C++ standard-library spelling.
/// Struct/enum/bitmap/register/scope names pass through unchanged (the
/// resolver already validated they're registered).
pub fn c_primitive_name(base_type: &str) -> String {
    match base_type {
        "u8" => "uint8_t".to_string(),
        "u16" => "uint16_t".to_string(),
        "u32" => "uint32_t".to_string(),
        "u64" => "uint64_t".to_string(),
        "i8" => "int8_t".to_string(),
        "i16" => "int16_t".to_string(),
        "i32" => "int32_t".to_string(),
        "i64" => "int64_t".to_string(),
        "f32" => "float".to_string(),
        "f64" => "double".to_string(),
        "bool" => "bool".to_string(),
        other => other.to_string(),
    }
}

pub struct TypeGenerationHelper;

impl TypeGenerationHelper {
    /// Render the base (non-array, non-pointer) spelling of a type.
    pub fn render_base(mode: Mode, type_info: &TypeInfo) -> String {
        if type_info.is_string {
            // Bounded strings are fixed-size char arrays at the storage
            // site and `char*`/`const char*` at use sites; the array form
            // is handled by `VariableDeclHelper`, this is the pointer form.
            return if type_info.is_const {
                "const char*".to_string()
            } else {
                "char*".to_string()
            };
        }
        let _ = mode;
        c_primitive_name(&type_info.base_type)
    }

    /// Render the full declarator for a variable of `type_info` named
    /// `name`, including array dimensions (`T name[d1][d2]`) and bounded
    /// string storage (`char name[capacity + 1]`).
    pub fn render_declarator(mode: Mode, type_info: &TypeInfo, name: &str) -> String {
        let const_prefix = if type_info.is_const { "const " } else { "" };

        if type_info.is_string && !type_info.is_array {
            let dim = type_info.string_storage_dimension().unwrap_or(0);
            return format!("{const_prefix}char {name}[{dim}]");
        }

        let base = Self::render_base(mode, type_info);
        if type_info.is_array {
            let dims: String = type_info
                .array_dimensions
                .iter()
                .map(|d| match d {
                    crate::cst::ArrayDimension::Literal(n) => format!("[{n}]"),
                    crate::cst::ArrayDimension::Unresolved(text) => format!("[{text}]"),
                })
                .collect();
            if type_info.is_string {
                let str_dim = type_info.string_storage_dimension().unwrap_or(0);
                return format!("{const_prefix}char {name}{dims}[{str_dim}]");
            }
            return format!("{const_prefix}{base} {name}{dims}");
        }

        format!("{const_prefix}{base} {name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TypeInfo;

    #[test]
    fn renders_bounded_string_storage() {
        let t = TypeInfo::string(30);
        assert_eq!(
            TypeGenerationHelper::render_declarator(Mode::C, &t, "name"),
            "char name[31]"
        );
    }

    #[test]
    fn renders_array_dimensions() {
        let mut t = TypeInfo::primitive("u16");
        t.is_array = true;
        t.array_dimensions = vec![crate::cst::ArrayDimension::Literal(4)];
        assert_eq!(
            TypeGenerationHelper::render_declarator(Mode::C, &t, "buf"),
            "uint16_t buf[4]"
        );
    }

    #[test]
    fn primitive_names_map_to_stdint() {
        assert_eq!(c_primitive_name("u8"), "uint8_t");
        assert_eq!(c_primitive_name("i64"), "int64_t");
        assert_eq!(c_primitive_name("f32"), "float");
    }
}
