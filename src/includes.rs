//! Abstract header tags and their concrete `#include` rendering: the core
//! collects tags as it walks the tree; materializing them into `#include`
//! lines is ambient plumbing every embedder needs, so it ships here rather
//! than being reinvented per caller.

use crate::mode::Mode;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IncludeTag {
    Stdint,
    Stdbool,
    String,
    FloatClamp,
}

pub fn render_includes(mode: Mode, tags: &BTreeSet<IncludeTag>) -> Vec<String> {
    tags.iter()
        .map(|tag| match (mode, tag) {
            (Mode::C, IncludeTag::Stdint) => "#include <stdint.h>".to_string(),
            (Mode::Cxx, IncludeTag::Stdint) => "#include <cstdint>".to_string(),
            (Mode::C, IncludeTag::Stdbool) => "#include <stdbool.h>".to_string(),
            (Mode::Cxx, IncludeTag::Stdbool) => String::new(),
            (Mode::C, IncludeTag::String) => "#include <string.h>".to_string(),
            (Mode::Cxx, IncludeTag::String) => "#include <cstring>".to_string(),
            (_, IncludeTag::FloatClamp) => "#include \"float_clamp.h\"".to_string(),
        })
        .filter(|line| !line.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn c_mode_uses_dot_h_headers() {
        let mut tags = BTreeSet::new();
        tags.insert(IncludeTag::Stdint);
        tags.insert(IncludeTag::String);
        let lines = render_includes(Mode::C, &tags);
        assert_eq!(lines, vec!["#include <stdint.h>", "#include <string.h>"]);
    }

    #[test]
    fn cpp_mode_uses_c_prefixed_headers() {
        let mut tags = BTreeSet::new();
        tags.insert(IncludeTag::Stdint);
        let lines = render_includes(Mode::Cxx, &tags);
        assert_eq!(lines, vec!["#include <cstdint>"]);
    }
}
