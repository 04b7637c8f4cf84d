//! `ModeDispatcher`: emits dialect-dependent tokens. The dialect is chosen
//! once per translation unit: no C++-only token ever appears when
//! `cppMode = false`, and vice versa.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Mode {
    C,
    Cxx,
}

impl Mode {
    pub fn is_cpp(self) -> bool {
        matches!(self, Mode::Cxx)
    }
}

/// Stateless helper that picks the correct token for the active [`Mode`].
/// Kept as a plain set of functions rather than a struct with fields: the
/// mode itself lives on [`crate::state::CodegenState`] and is threaded in
/// explicitly, per the "no ambient global state" redesign note.
pub struct ModeDispatcher;

impl ModeDispatcher {
    pub fn address_of(mode: Mode, expr: &str) -> String {
        match mode {
            Mode::C => format!("&{expr}"),
            Mode::Cxx => expr.to_string(),
        }
    }

    pub fn deref(mode: Mode, expr: &str) -> String {
        match mode {
            Mode::C => format!("(*{expr})"),
            Mode::Cxx => expr.to_string(),
        }
    }

    pub fn member_op(mode: Mode, via_pointer: bool) -> &'static str {
        match (mode, via_pointer) {
            (Mode::C, true) => "->",
            (Mode::C, false) => ".",
            (Mode::Cxx, _) => ".",
        }
    }

    pub fn null_literal(mode: Mode) -> &'static str {
        match mode {
            Mode::C => "NULL",
            Mode::Cxx => "nullptr",
        }
    }

    /// Render a cast of `expr` to `target_type`, in the dialect's spelling.
    /// `static_cast` is used for all C++ narrowing/explicit casts here;
    /// `reinterpret_cast` is selected separately by callers that need
    /// pointer-reinterpretation semantics (see `arguments::wrap_string_subscript`).
    pub fn cast(mode: Mode, target_type: &str, expr: &str) -> String {
        match mode {
            Mode::C => format!("({target_type})({expr})"),
            Mode::Cxx => format!("static_cast<{target_type}>({expr})"),
        }
    }

    pub fn reinterpret_cast(mode: Mode, target_type: &str, expr: &str) -> String {
        match mode {
            Mode::C => format!("({target_type})({expr})"),
            Mode::Cxx => format!("reinterpret_cast<{target_type}>({expr})"),
        }
    }

    pub fn reference_suffix(mode: Mode) -> &'static str {
        match mode {
            Mode::C => "*",
            Mode::Cxx => "&",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_of_differs_by_mode() {
        assert_eq!(ModeDispatcher::address_of(Mode::C, "x"), "&x");
        assert_eq!(ModeDispatcher::address_of(Mode::Cxx, "x"), "x");
    }

    #[test]
    fn cast_uses_static_cast_in_cpp() {
        assert_eq!(ModeDispatcher::cast(Mode::C, "uint8_t", "v"), "(uint8_t)(v)");
        assert_eq!(
            ModeDispatcher::cast(Mode::Cxx, "uint8_t", "v"),
            "static_cast<uint8_t>(v)"
        );
    }

    #[test]
    fn null_literal_matches_dialect() {
        assert_eq!(ModeDispatcher::null_literal(Mode::C), "NULL");
        assert_eq!(ModeDispatcher::null_literal(Mode::Cxx), "nullptr");
    }
}
