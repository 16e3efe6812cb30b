mod baselines;

use dat_market::market::{MarketConfig, Resource, User};

pub fn config(beta: f64) -> MarketConfig {
    MarketConfig::new(0.1, 0.3, 10, beta).expect("valid config")
}

pub fn user(id: u32, min_size: u32, demand: u64) -> User {
    User::new(id, min_size, demand).expect("valid user")
}

pub fn pool(sizes: &[u32]) -> Vec<Resource> {
    sizes
        .iter()
        .enumerate()
        .map(|(index, size)| Resource::new(index as u32, *size).expect("valid resource"))
        .collect()
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
