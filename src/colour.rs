//! Colouring: a binary membership map.

use crate::kernel::EscapeResult;

/// Cell written for points that stayed bounded for the whole budget (all bits set).
pub const BOUNDED_CELL: u32 = 0xFFFF_FFFF;

/// Cell written for points that escaped (opaque black in little-endian RGBA).
pub const ESCAPED_CELL: u32 = 0xFF00_0000;

#[inline]
pub fn cell(result: EscapeResult) -> u32 {
    match result {
        EscapeResult::Bounded => BOUNDED_CELL,
        EscapeResult::Escaped { .. } => ESCAPED_CELL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_two_colours() {
        assert_eq!(cell(EscapeResult::Bounded), BOUNDED_CELL);
        for iterations in [0, 1, 99] {
            assert_eq!(cell(EscapeResult::Escaped { iterations }), ESCAPED_CELL);
        }
    }

    #[test]
    fn escaped_cell_is_opaque_black_rgba() {
        assert_eq!(ESCAPED_CELL.to_le_bytes(), [0, 0, 0, 255]);
        assert_eq!(BOUNDED_CELL.to_le_bytes(), [255; 4]);
    }
}
