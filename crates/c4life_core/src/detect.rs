//! Isolated connected-component detection.
//!
//! Components are found with an 8-connected breadth-first search on the
//! torus. A component only counts as an entity when no foreign live cell lies
//! within Chebyshev distance [`ISOLATION_RADIUS`] of any of its cells; shapes
//! crowded by neighbours cannot be identified reliably and are dropped.

use crate::error::{CoreError, Result};
use crate::grid::Grid;
use c4life_data::Coordinate;
use std::collections::VecDeque;

/// Clearance required around an entity.
pub const ISOLATION_RADIUS: i64 = 2;

const NEIGHBOR_OFFSETS: [(i64, i64); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// One isolated component, recomputed every step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    /// Member cells, unwrapped so that a shape straddling the toroidal seam
    /// keeps its geometry. Sorted by `(x, y)`.
    pub cells: Vec<Coordinate>,
}

impl Entity {
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    /// Inclusive `(min, max)` corners of the unwrapped cells.
    pub fn bounding_box(&self) -> Option<(Coordinate, Coordinate)> {
        let first = self.cells.first()?;
        let init = (*first, *first);
        Some(self.cells.iter().fold(init, |(lo, hi), c| {
            (
                Coordinate::new(lo.x.min(c.x), lo.y.min(c.y)),
                Coordinate::new(hi.x.max(c.x), hi.y.max(c.y)),
            )
        }))
    }
}

/// Finds entities in grids of one fixed size.
#[derive(Debug, Clone)]
pub struct EntityDetector {
    width: usize,
    height: usize,
}

impl EntityDetector {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn detect(&self, grid: &Grid) -> Result<Vec<Entity>> {
        if (grid.width(), grid.height()) != (self.width, self.height) {
            return Err(CoreError::dimension_mismatch(
                (self.width, self.height),
                (grid.width(), grid.height()),
            ));
        }

        let cells = grid.cells();
        // 0 = unlabelled, otherwise component number.
        let mut labels = vec![0u32; cells.len()];
        let mut next_label = 0u32;
        let mut queue = VecDeque::new();
        let mut entities = Vec::new();

        for start in 0..cells.len() {
            if !cells[start] || labels[start] != 0 {
                continue;
            }
            next_label += 1;
            let members = self.flood(grid, start, next_label, &mut labels, &mut queue);
            if self.is_isolated(grid, &members, next_label, &labels) {
                let mut unwrapped: Vec<Coordinate> = members.into_iter().map(|(_, c)| c).collect();
                unwrapped.sort_unstable();
                entities.push(Entity { cells: unwrapped });
            }
        }

        Ok(entities)
    }

    /// Labels the component containing `start`, returning each member's
    /// wrapped index together with its unwrapped coordinate.
    fn flood(
        &self,
        grid: &Grid,
        start: usize,
        label: u32,
        labels: &mut [u32],
        queue: &mut VecDeque<(usize, Coordinate)>,
    ) -> Vec<(usize, Coordinate)> {
        let origin = Coordinate::new((start % self.width) as i32, (start / self.width) as i32);
        let mut members = Vec::new();
        labels[start] = label;
        queue.push_back((start, origin));

        while let Some((idx, at)) = queue.pop_front() {
            members.push((idx, at));
            for (dx, dy) in NEIGHBOR_OFFSETS {
                let nidx = self.wrap(at.x as i64 + dx, at.y as i64 + dy);
                if grid.cells()[nidx] && labels[nidx] == 0 {
                    labels[nidx] = label;
                    queue.push_back((nidx, Coordinate::new(at.x + dx as i32, at.y + dy as i32)));
                }
            }
        }
        members
    }

    fn is_isolated(
        &self,
        grid: &Grid,
        members: &[(usize, Coordinate)],
        label: u32,
        labels: &[u32],
    ) -> bool {
        let r = ISOLATION_RADIUS;
        members.iter().all(|&(_, at)| {
            (-r..=r).all(|dy| {
                (-r..=r).all(|dx| {
                    let nidx = self.wrap(at.x as i64 + dx, at.y as i64 + dy);
                    !grid.cells()[nidx] || labels[nidx] == label
                })
            })
        })
    }

    #[inline]
    fn wrap(&self, x: i64, y: i64) -> usize {
        let wx = x.rem_euclid(self.width as i64) as usize;
        let wy = y.rem_euclid(self.height as i64) as usize;
        wy * self.width + wx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_separate_shapes() {
        let grid = Grid::parse(&[
            "..........",
            ".##.......",
            ".##.......",
            "..........",
            "..........",
            "......###.",
            "..........",
            "..........",
        ])
        .unwrap();
        let entities = EntityDetector::new(10, 8).detect(&grid).unwrap();
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0].size(), 4);
        assert_eq!(entities[1].size(), 3);
    }

    #[test]
    fn test_diagonal_cells_join() {
        let grid = Grid::parse(&[".......", ".#.....", "..#....", "...#...", "......."]).unwrap();
        let entities = EntityDetector::new(7, 5).detect(&grid).unwrap();
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].size(), 3);
    }

    #[test]
    fn test_crowded_shapes_are_discarded() {
        // Gap of one dead cell: distance 2 from each other.
        let grid = Grid::parse(&["........", ".#.#....", "........", "......#.", "........"]).unwrap();
        let entities = EntityDetector::new(8, 5).detect(&grid).unwrap();
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].cells, vec![Coordinate::new(6, 3)]);
    }

    #[test]
    fn test_component_across_seam_is_unwrapped() {
        let mut grid = Grid::new(8, 8);
        grid.set(7, 3, true);
        grid.set(0, 3, true);
        grid.set(1, 3, true);
        let entities = EntityDetector::new(8, 8).detect(&grid).unwrap();
        assert_eq!(entities.len(), 1);
        let (lo, hi) = entities[0].bounding_box().unwrap();
        assert_eq!(hi.x - lo.x, 2);
        assert_eq!(hi.y, lo.y);
    }

    #[test]
    fn test_dimension_mismatch() {
        let grid = Grid::new(4, 4);
        assert_eq!(
            EntityDetector::new(8, 8).detect(&grid),
            Err(CoreError::dimension_mismatch((8, 8), (4, 4)))
        );
    }
}
