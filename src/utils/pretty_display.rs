use std::fmt::{Formatter as FmtFormatter, Result as FmtResult};

pub fn get_indent(depth: usize) -> String {
    "  ".repeat(depth)
}

/// Indented, human-oriented rendering of plan trees. `Display` impls of the
/// plan nodes delegate here with a depth of zero.
pub trait PrettyDisplay {
    fn pretty_fmt(&self, f: &mut FmtFormatter<'_>, depth: usize) -> FmtResult;
}
