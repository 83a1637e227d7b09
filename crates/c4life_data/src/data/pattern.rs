/// A 3×3 binary neighbourhood packed into nine bits.
///
/// Bit `k` is the cell at row-major position `k` of the window: bit 0 is the
/// top-left cell, bit 4 the centre and bit 8 the bottom-right cell.
pub type Pattern = u16;

/// Number of distinct 3×3 binary neighbourhoods.
pub const PATTERN_COUNT: usize = 512;

/// Number of rotation orbits of the 512 neighbourhoods under C4.
pub const ORBIT_COUNT: usize = 140;

/// Cells in a 3×3 window.
pub const NEIGHBORHOOD_BITS: usize = 9;

/// Bit index of the centre cell.
pub const CENTER_BIT: usize = 4;

/// Length of the canonical rule hex string (12 + 64 + 64 bits).
pub const RULE_HEX_LEN: usize = 35;
