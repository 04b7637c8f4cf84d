//! Translation-unit-wide configuration, fixed at `CodegenState`
//! construction. Grounded on the compiler-accepts-a-config-struct
//! pattern rather than reading ambient global state.

use crate::mode::Mode;
use crate::types::OverflowBehavior;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranspilerConfig {
    pub mode: Mode,
    pub default_overflow_behavior: OverflowBehavior,
    pub tab_width: usize,
}

impl TranspilerConfig {
    pub fn new(mode: Mode) -> Self {
        TranspilerConfig {
            mode,
            default_overflow_behavior: OverflowBehavior::Clamp,
            tab_width: 4,
        }
    }
}
