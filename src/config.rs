use crate::models::{CatalogConfig, CrfTrainerConfig};

pub const DEFAULT_CRF_TRAINER_CONFIG: &CrfTrainerConfig = &CrfTrainerConfig {
    c1: 0.01,
    c2: 0.1,
    max_iterations: 100,
    all_possible_transitions: true,
    all_possible_states: false,
    num_memories: 6,
    epsilon: 1e-5,
    delta: 1e-5,
    period: 10,
    max_linesearch: 20,
};

pub const DEFAULT_CATALOG_CONFIG: &CatalogConfig = &CatalogConfig {
    delimiter: b';',
    has_headers: true,
    name_column: "name",
};

/// Share of the tagged corpus held out by `evaluate-tagger`.
pub const DEFAULT_TEST_SPLIT_RATIO: f64 = 0.2;
