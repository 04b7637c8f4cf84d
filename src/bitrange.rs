//! Bit-range access and float shadowing.
//!
//! Integer bit ranges lower directly to mask-and-shift expressions. Float
//! bit ranges need a materialized shadow variable, because punning through
//! `memcpy` would be MISRA 21.15-unclean and a raw reinterpret-cast would
//! violate strict aliasing; the union-based shadow is the one construct
//! that is legal under both constraints in C and portable to C++.

use crate::mode::Mode;
use crate::state::CodegenState;
use crate::types::TypeInfo;

pub struct BitRangeHelper;

impl BitRangeHelper {
    /// The minimum unsigned mask literal containing `width` bits, with a
    /// `U` suffix in C mode.
    pub fn mask_literal(mode: Mode, width: u32) -> String {
        let value: u64 = if width >= 64 {
            u64::MAX
        } else {
            (1u64 << width) - 1
        };
        match mode {
            Mode::C => format!("0x{value:X}U"),
            Mode::Cxx => format!("0x{value:X}U"),
        }
    }

    /// Builds the integer bit-range read expression `v[start, width]`.
    /// Returns `Err` when `width == 0`.
    pub fn read_integer(
        mode: Mode,
        var_expr: &str,
        start: u32,
        width: u32,
        target: Option<&TypeInfo>,
    ) -> Result<String, &'static str> {
        if width == 0 {
            return Err("bit-range width must be non-zero");
        }
        let mask = Self::mask_literal(mode, width);
        let raw = if start == 0 {
            format!("(({var_expr}) & {mask})")
        } else {
            format!("(({var_expr} >> {start}) & {mask})")
        };
        Ok(crate::cast::NarrowingCastHelper::wrap_if_needed(mode, target, &raw))
    }

    /// Builds the write-back expression for `v[start, width] <- value`,
    /// clearing the target bits before OR-ing in the shifted value.
    pub fn write_integer(var_expr: &str, start: u32, width: u32, value_expr: &str) -> String {
        let mask = if width >= 64 { u64::MAX } else { (1u64 << width) - 1 };
        let shifted_mask = mask << start;
        format!(
            "{var_expr} = ({var_expr} & ~({shifted_mask:#X}U)) | (({value_expr} & {mask:#X}U) << {start})"
        )
    }
}

pub struct FloatBitHelper;

impl FloatBitHelper {
    fn shadow_uint_type(float_type: &str) -> &'static str {
        match float_type {
            "f32" => "u32",
            "f64" => "u64",
            _ => "u32",
        }
    }

    fn shadow_uint_c_type(float_type: &str) -> String {
        crate::type_render::c_primitive_name(Self::shadow_uint_type(float_type))
    }

    fn float_c_type(float_type: &str) -> String {
        crate::type_render::c_primitive_name(float_type)
    }

    /// Ensures the shadow for `var_name` (of type `float_type`) is declared
    /// and current, emitting its declaration if this is the first use in
    /// the function body. Returns the lines to emit before the read/write
    /// expression (empty if the shadow was already current).
    ///
    /// Global-scope float bit access is rejected: the protocol requires a
    /// local union.
    pub fn ensure_current(
        state: &CodegenState,
        var_name: &str,
        float_type: &str,
    ) -> Result<Vec<String>, crate::error::ScopeError> {
        if !state.in_function_body() {
            return Err(crate::error::ScopeError::GlobalStringFloatBitIndexing);
        }
        let shadow = CodegenState::shadow_name(var_name);
        if state.is_shadow_current(&shadow) {
            return Ok(Vec::new());
        }
        let uint_c = Self::shadow_uint_c_type(float_type);
        let float_c = Self::float_c_type(float_type);
        let mut lines = Vec::new();
        if !state.is_shadow_declared(&shadow) {
            lines.push(format!(
                "union {{ {float_c} f; {uint_c} u; }} {shadow};"
            ));
        }
        lines.push(format!("{shadow}.f = {var_name};"));
        state.declare_shadow(shadow);
        Ok(lines)
    }

    /// The expression used to read the shadow's integer bits once current.
    pub fn shadow_bits_expr(var_name: &str) -> String {
        format!("{}.u", CodegenState::shadow_name(var_name))
    }

    /// Emits the read-modify-write sequence for a single-bit float write
    /// `v[bit] <- value`, returning the full statement sequence including
    /// the shadow setup (if needed) and the final write-back to the float.
    pub fn write_bit(
        state: &CodegenState,
        var_name: &str,
        float_type: &str,
        bit: u32,
        value_expr: &str,
    ) -> Result<Vec<String>, crate::error::ScopeError> {
        let mut lines = Self::ensure_current(state, var_name, float_type)?;
        let shadow = CodegenState::shadow_name(var_name);
        let bits = Self::shadow_bits_expr(var_name);
        lines.push(format!(
            "{bits} = ({bits} & ~(1U << {bit})) | (({value_expr} != 0U) << {bit});"
        ));
        lines.push(format!("{var_name} = {shadow}.f;"));
        state.mark_shadow_current(shadow);
        Ok(lines)
    }

    /// Masked multi-bit read `v[start, width]` on a float shadow. Returns
    /// the setup lines (union declaration/refresh, possibly empty) together
    /// with the masked-and-shifted read expression over the shadow's bits.
    pub fn read_bits(
        state: &CodegenState,
        var_name: &str,
        float_type: &str,
        start: u32,
        width: u32,
    ) -> Result<(Vec<String>, String), crate::error::ScopeError> {
        let lines = Self::ensure_current(state, var_name, float_type)?;
        let bits = Self::shadow_bits_expr(var_name);
        let mask = if width >= 64 { u64::MAX } else { (1u64 << width) - 1 };
        let expr = if start == 0 {
            format!("(({bits}) & {mask:#X}U)")
        } else {
            format!("(({bits} >> {start}) & {mask:#X}U)")
        };
        Ok((lines, expr))
    }

    /// Emits the read-modify-write sequence for a masked multi-bit float
    /// write `v[start, width] <- value`, mirroring [`Self::write_bit`] but
    /// over a bit range instead of a single bit.
    pub fn write_bits(
        state: &CodegenState,
        var_name: &str,
        float_type: &str,
        start: u32,
        width: u32,
        value_expr: &str,
    ) -> Result<Vec<String>, crate::error::ScopeError> {
        let mut lines = Self::ensure_current(state, var_name, float_type)?;
        let shadow = CodegenState::shadow_name(var_name);
        let bits = Self::shadow_bits_expr(var_name);
        let mask = if width >= 64 { u64::MAX } else { (1u64 << width) - 1 };
        let shifted_mask = mask << start;
        lines.push(format!(
            "{bits} = ({bits} & ~({shifted_mask:#X}U)) | (({value_expr} & {mask:#X}U) << {start});"
        ));
        lines.push(format!("{var_name} = {shadow}.f;"));
        state.mark_shadow_current(shadow);
        Ok(lines)
    }

    /// A plain (non bit-level) assignment to the float itself invalidates
    /// its shadow's currency without dropping the declaration.
    pub fn on_plain_float_assignment(state: &CodegenState, var_name: &str) {
        state.invalidate_shadow(&CodegenState::shadow_name(var_name));
    }
}
