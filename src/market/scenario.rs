use std::{fmt, str::FromStr};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::market::{
    error::{MarketError, unknown_scenario},
    types::{Capacity, QuantumHours, Resource, ResourceId, ResourcePool, User, UserId},
};

const MIN_DEMAND: QuantumHours = 10;
const MAX_DEMAND: QuantumHours = 99;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scenario {
    HighVariability,
    UniformHighDemand,
    GradualIncrease,
    Random,
}

impl Scenario {
    pub const ALL: [Scenario; 4] = [
        Scenario::HighVariability,
        Scenario::UniformHighDemand,
        Scenario::GradualIncrease,
        Scenario::Random,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HighVariability => "high-variability",
            Self::UniformHighDemand => "uniform-high-demand",
            Self::GradualIncrease => "gradual-increase",
            Self::Random => "random",
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scenario {
    type Err = MarketError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|scenario| scenario.as_str() == value)
            .ok_or_else(|| unknown_scenario(format!("unknown scenario '{value}'")))
    }
}

/// Users with a quantum in `[1, max(max_capacity / 2 - 1, 1)]` and a demand
/// in `[10, 99]` quantum-hours.
pub fn generate_users<R: Rng + ?Sized>(
    count: usize,
    max_capacity: Capacity,
    rng: &mut R,
) -> Vec<User> {
    let max_quantum = (max_capacity / 2).saturating_sub(1).max(1);
    (0..count)
        .filter_map(|index| {
            let min_size = rng.gen_range(1..=max_quantum);
            let demand = rng.gen_range(MIN_DEMAND..=MAX_DEMAND);
            User::new(index as UserId, min_size, demand).ok()
        })
        .collect()
}

pub fn generate_resources<R: Rng + ?Sized>(
    scenario: Scenario,
    count: usize,
    max_capacity: Capacity,
    rng: &mut R,
) -> ResourcePool {
    let max_capacity = max_capacity.max(1);
    let resources = (0..count).filter_map(|index| {
        let id = index as ResourceId;
        let size = match scenario {
            Scenario::HighVariability | Scenario::Random => rng.gen_range(1..=max_capacity),
            Scenario::UniformHighDemand => max_capacity,
            Scenario::GradualIncrease => Capacity::try_from(index + 1)
                .unwrap_or(Capacity::MAX)
                .min(max_capacity),
        };
        Resource::new(id, size).ok()
    });
    ResourcePool::new(resources.collect::<Vec<_>>())
}
