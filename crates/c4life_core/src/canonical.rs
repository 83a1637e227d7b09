//! Shape signatures that ignore position, rotation and reflection.
//!
//! A shape is moved so its bounding box starts at the origin, then each of
//! the eight dihedral images is normalised the same way and written as a
//! sorted `x,y;x,y;...` list. The lexicographically smallest string is the
//! signature, so congruent shapes always share it.

use c4life_data::{CanonicalSignature, Coordinate};

/// The eight symmetries of the square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symmetry {
    Identity,
    Rot90,
    Rot180,
    Rot270,
    FlipHorizontal,
    FlipVertical,
    Transpose,
    AntiTranspose,
}

impl Symmetry {
    pub const ALL: [Symmetry; 8] = [
        Symmetry::Identity,
        Symmetry::Rot90,
        Symmetry::Rot180,
        Symmetry::Rot270,
        Symmetry::FlipHorizontal,
        Symmetry::FlipVertical,
        Symmetry::Transpose,
        Symmetry::AntiTranspose,
    ];

    #[inline]
    pub fn apply(self, c: Coordinate) -> Coordinate {
        let Coordinate { x, y } = c;
        match self {
            Symmetry::Identity => Coordinate::new(x, y),
            Symmetry::Rot90 => Coordinate::new(-y, x),
            Symmetry::Rot180 => Coordinate::new(-x, -y),
            Symmetry::Rot270 => Coordinate::new(y, -x),
            Symmetry::FlipHorizontal => Coordinate::new(-x, y),
            Symmetry::FlipVertical => Coordinate::new(x, -y),
            Symmetry::Transpose => Coordinate::new(y, x),
            Symmetry::AntiTranspose => Coordinate::new(-y, -x),
        }
    }
}

/// Shifts cells so the bounding box's minimum corner sits at the origin.
pub fn translate_to_origin(cells: &[Coordinate]) -> Vec<Coordinate> {
    let min_x = cells.iter().map(|c| c.x).min().unwrap_or(0);
    let min_y = cells.iter().map(|c| c.y).min().unwrap_or(0);
    cells
        .iter()
        .map(|c| Coordinate::new(c.x - min_x, c.y - min_y))
        .collect()
}

/// Applies a symmetry and re-anchors the result at the origin.
pub fn transform(cells: &[Coordinate], symmetry: Symmetry) -> Vec<Coordinate> {
    let moved: Vec<Coordinate> = cells.iter().map(|&c| symmetry.apply(c)).collect();
    translate_to_origin(&moved)
}

fn serialize(mut cells: Vec<Coordinate>) -> String {
    cells.sort_unstable();
    cells.dedup();
    cells
        .iter()
        .map(|c| format!("{},{}", c.x, c.y))
        .collect::<Vec<_>>()
        .join(";")
}

/// Canonical signature of a cell set.
pub fn normalize(cells: &[Coordinate]) -> CanonicalSignature {
    let anchored = translate_to_origin(cells);
    let best = Symmetry::ALL
        .iter()
        .map(|&s| serialize(transform(&anchored, s)))
        .min()
        .unwrap_or_default();
    CanonicalSignature(best)
}
