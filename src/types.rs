//! The canonical type description (`TypeInfo`), the per-parameter summary
//! (`ParameterInfo`), and the `TypeWidth` table.

use once_cell::sync::Lazy;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum OverflowBehavior {
    Clamp,
    Wrap,
    Saturate,
}

impl Default for OverflowBehavior {
    fn default() -> Self {
        OverflowBehavior::Clamp
    }
}

/// Constant map from source primitive names to bit widths. `bool` is
/// included with width 1 for classification purposes even though its
/// storage width in C is a full byte.
pub static TYPE_WIDTHS: Lazy<HashMap<&'static str, u32>> = Lazy::new(|| {
    HashMap::from([
        ("u8", 8),
        ("u16", 16),
        ("u32", 32),
        ("u64", 64),
        ("i8", 8),
        ("i16", 16),
        ("i32", 32),
        ("i64", 64),
        ("f32", 32),
        ("f64", 64),
        ("bool", 1),
    ])
});

pub fn width_of(primitive: &str) -> Option<u32> {
    TYPE_WIDTHS.get(primitive).copied()
}

pub fn is_primitive(name: &str) -> bool {
    TYPE_WIDTHS.contains_key(name)
}

pub fn is_signed_int(name: &str) -> bool {
    name.starts_with('i') && is_primitive(name)
}

pub fn is_unsigned_int(name: &str) -> bool {
    name.starts_with('u') && is_primitive(name)
}

pub fn is_integer(name: &str) -> bool {
    is_signed_int(name) || is_unsigned_int(name)
}

pub fn is_float(name: &str) -> bool {
    matches!(name, "f32" | "f64")
}

/// `TypeInfo` — the canonical description of a value's type.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TypeInfo {
    pub base_type: String,
    pub bit_width: u32,
    pub is_array: bool,
    pub array_dimensions: Vec<crate::cst::ArrayDimension>,
    pub is_const: bool,
    pub is_string: bool,
    pub string_capacity: Option<usize>,
    pub is_enum: bool,
    pub enum_type_name: Option<String>,
    pub is_bitmap: bool,
    pub bitmap_type_name: Option<String>,
    pub is_parameter: bool,
    pub is_external_cpp_type: bool,
    pub overflow_behavior: OverflowBehavior,
}

impl TypeInfo {
    pub fn primitive(base_type: impl Into<String>) -> Self {
        let base_type = base_type.into();
        let bit_width = width_of(&base_type).unwrap_or(0);
        TypeInfo {
            base_type,
            bit_width,
            is_array: false,
            array_dimensions: Vec::new(),
            is_const: false,
            is_string: false,
            string_capacity: None,
            is_enum: false,
            enum_type_name: None,
            is_bitmap: false,
            bitmap_type_name: None,
            is_parameter: false,
            is_external_cpp_type: false,
            overflow_behavior: OverflowBehavior::default(),
        }
    }

    pub fn string(capacity: usize) -> Self {
        TypeInfo {
            is_string: true,
            string_capacity: Some(capacity),
            ..TypeInfo::primitive("string")
        }
    }

    /// Storage dimension for a bounded string: capacity excludes the
    /// terminator byte.
    pub fn string_storage_dimension(&self) -> Option<usize> {
        self.string_capacity.map(|c| c + 1)
    }

    pub fn is_integer(&self) -> bool {
        is_integer(&self.base_type)
    }

    pub fn is_float(&self) -> bool {
        is_float(&self.base_type)
    }

    pub fn is_signed(&self) -> bool {
        is_signed_int(&self.base_type)
    }

    pub fn is_bool(&self) -> bool {
        self.base_type == "bool"
    }
}

/// `ParameterInfo` — per-parameter summary within the currently-compiled
/// function.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ParameterInfo {
    pub name: String,
    pub base_type: String,
    pub is_array: bool,
    pub is_struct: bool,
    pub is_const: bool,
    pub is_callback: bool,
    pub is_string: bool,
    pub is_unbounded_string: bool,
    pub is_auto_const: bool,
    pub array_dimensions: Vec<crate::cst::ArrayDimension>,
    pub callback_typedef_name: Option<String>,
    pub string_capacity: Option<usize>,
    /// Derived at emission time by [`crate::parameters`].
    pub is_pass_by_value: bool,
    pub force_pointer_syntax: bool,
}

impl ParameterInfo {
    pub fn type_info(&self) -> TypeInfo {
        TypeInfo {
            base_type: self.base_type.clone(),
            bit_width: width_of(&self.base_type).unwrap_or(0),
            is_array: self.is_array,
            array_dimensions: self.array_dimensions.clone(),
            is_const: self.is_const,
            is_string: self.is_string,
            string_capacity: self.string_capacity,
            is_enum: false,
            enum_type_name: None,
            is_bitmap: false,
            bitmap_type_name: None,
            is_parameter: true,
            is_external_cpp_type: false,
            overflow_behavior: OverflowBehavior::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths_match_declared_primitives() {
        assert_eq!(width_of("u8"), Some(8));
        assert_eq!(width_of("i64"), Some(64));
        assert_eq!(width_of("f32"), Some(32));
        assert_eq!(width_of("nonsense"), None);
    }

    #[test]
    fn signedness_classification() {
        assert!(is_signed_int("i32"));
        assert!(!is_signed_int("u32"));
        assert!(is_unsigned_int("u8"));
        assert!(!is_integer("f32"));
        assert!(is_float("f64"));
    }

    #[test]
    fn string_storage_dimension_adds_terminator() {
        let t = TypeInfo::string(30);
        assert_eq!(t.string_storage_dimension(), Some(31));
    }
}
