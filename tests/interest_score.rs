mod common;

use c4life_data::{OrbitRule, TrackerStats};
use c4life_lib::model::config::StatsConfig;
use c4life_lib::model::grid::{seed_uniform, Grid, Seed};
use c4life_lib::model::stats::StatisticsAggregator;
use c4life_lib::model::{OrbitIndex, RuleLogic, Simulation};
use common::{conway_simulation, test_config, GridBuilder};

#[test]
fn test_zero_before_min_steps() {
    let (grid, _) = seed_uniform(32, 32, 0.3, Seed(1));
    let mut sim = conway_simulation(grid);
    sim.run(8).unwrap();
    assert_eq!(sim.history().len(), 9);
    assert_eq!(sim.interest_score(), 0.0);
}

#[test]
fn test_score_starts_after_ten_simulated_steps() {
    let (grid, _) = seed_uniform(48, 48, 0.3, Seed(42));
    let mut sim = conway_simulation(grid);
    sim.run(9).unwrap();
    assert_eq!(sim.history().len(), 10);
    assert_eq!(sim.interest_score(), 0.0);

    sim.step().unwrap();
    assert!(sim.interest_score() > 0.0);
}

#[test]
fn test_zero_when_population_nearly_extinct() {
    let grid = GridBuilder::new(32, 32).with_block(10, 10).build();
    let mut sim = conway_simulation(grid);
    sim.run(19).unwrap();
    assert_eq!(sim.history().len(), 20);
    assert_eq!(sim.interest_score(), 0.0);
}

#[test]
fn test_zero_when_population_saturated() {
    let index = OrbitIndex::build();
    let always_alive = OrbitRule::compress(|_| true, &index);
    let full = Grid::from_cells(16, 16, vec![true; 256]).unwrap();
    let mut sim = Simulation::new(&test_config(), always_alive, &index, full).unwrap();
    sim.run(19).unwrap();
    assert_eq!(sim.latest().unwrap().population, 256);
    assert_eq!(sim.interest_score(), 0.0);
}

#[test]
fn test_soup_scores_inside_unit_interval() {
    let (grid, _) = seed_uniform(48, 48, 0.3, Seed(42));
    let mut sim = conway_simulation(grid);
    sim.run(40).unwrap();
    let score = sim.interest_score();
    assert!(score > 0.0 && score <= 1.0, "score {score}");
}

#[test]
fn test_aggregator_window_only_sees_recent_records() {
    let mut agg = StatisticsAggregator::new(10, 10, StatsConfig::default());
    let empty = Grid::new(10, 10);
    let (busy, _) = seed_uniform(10, 10, 0.4, Seed(3));

    // A long dead prefix followed by a busy window.
    for _ in 0..30 {
        agg.record(&empty, 0, TrackerStats::default()).unwrap();
    }
    assert_eq!(agg.interest_score(), 0.0);
    for i in 0..20 {
        let grid = if i % 2 == 0 { &busy } else { &empty };
        agg.record(grid, 0, TrackerStats::default()).unwrap();
    }
    assert!(agg.interest_score() > 0.0);
}
