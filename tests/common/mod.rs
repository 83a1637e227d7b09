use c4life_data::{FullRule, OrbitRule};
use c4life_lib::model::config::AppConfig;
use c4life_lib::model::engine::EngineKind;
use c4life_lib::model::grid::Grid;
use c4life_lib::model::{OrbitIndex, RuleLogic, Simulation};

/// Conway's B3/S23 as an orbit rule.
#[allow(dead_code)]
pub fn conway(index: &OrbitIndex) -> OrbitRule {
    OrbitRule::life_like(&[3], &[2, 3], index)
}

#[allow(dead_code)]
pub fn conway_full(index: &OrbitIndex) -> FullRule {
    conway(index).expand(index)
}

/// Places shapes on an otherwise dead grid.
#[allow(dead_code)]
pub struct GridBuilder {
    width: usize,
    height: usize,
    live: Vec<(usize, usize)>,
}

#[allow(dead_code)]
impl GridBuilder {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            live: Vec::new(),
        }
    }

    pub fn with_cell(mut self, x: usize, y: usize) -> Self {
        self.live.push((x, y));
        self
    }

    /// Draws `rows` ('#' alive) with its top-left corner at `(x, y)`.
    pub fn with_shape(mut self, x: usize, y: usize, rows: &[&str]) -> Self {
        for (dy, row) in rows.iter().enumerate() {
            for (dx, ch) in row.chars().enumerate() {
                if ch == '#' {
                    self.live.push((x + dx, y + dy));
                }
            }
        }
        self
    }

    pub fn with_block(self, x: usize, y: usize) -> Self {
        self.with_shape(x, y, &["##", "##"])
    }

    pub fn with_horizontal_blinker(self, x: usize, y: usize) -> Self {
        self.with_shape(x, y, &["###"])
    }

    pub fn build(self) -> Grid {
        let mut grid = Grid::new(self.width, self.height);
        for (x, y) in self.live {
            grid.set(x % self.width, y % self.height, true);
        }
        grid
    }
}

/// Default configuration pinned to the sequential engine.
#[allow(dead_code)]
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.engine.kind = EngineKind::Sequential;
    config
}

#[allow(dead_code)]
pub fn conway_simulation(grid: Grid) -> Simulation {
    let index = OrbitIndex::build();
    Simulation::new(&test_config(), conway(&index), &index, grid)
        .expect("Failed to create simulation in test builder")
}
