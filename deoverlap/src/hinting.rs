//! Dropping stale hinting instructions

use crate::glyph::Glyph;

/// Clear the glyph's instructions, returning `true` if there were any.
pub fn strip_hinting(glyph: &mut Glyph) -> bool {
    let instructions = glyph.instructions_mut();
    let had_instructions = !instructions.is_empty();
    instructions.clear();
    had_instructions
}
