use std::io::Write;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{
    config::SweepConfig,
    market::{
        Baseline, MarketConfig, ResourcePool, Scenario, SizeSampler, UniformSampler, User,
        calibrate, generate_resources, generate_users, run_dat,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    Dat,
    Random,
    GreedyMinFit,
    GreedyMaxFit,
    OfflineOptimal,
}

impl Algorithm {
    pub const ALL: [Algorithm; 5] = [
        Algorithm::Dat,
        Algorithm::Random,
        Algorithm::GreedyMinFit,
        Algorithm::GreedyMaxFit,
        Algorithm::OfflineOptimal,
    ];

    pub fn baseline(self) -> Option<Baseline> {
        match self {
            Self::Dat => None,
            Self::Random => Some(Baseline::Random),
            Self::GreedyMinFit => Some(Baseline::GreedyMinFit),
            Self::GreedyMaxFit => Some(Baseline::GreedyMaxFit),
            Self::OfflineOptimal => Some(Baseline::OfflineOptimal),
        }
    }

    pub fn run(
        self,
        users: &[User],
        pool: &mut ResourcePool,
        config: &MarketConfig,
        sampler: &mut dyn SizeSampler,
    ) -> f64 {
        let resources = pool.as_mut_slice();
        match self.baseline() {
            Some(baseline) => baseline.run(users, resources, config, sampler),
            None => run_dat(users, resources, config, sampler),
        }
    }
}

/// How comparators see the resource pool of a scenario.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceIsolation {
    /// Every run probes its own copy of the generated pool.
    #[default]
    Snapshot,
    /// All runs of a scenario probe one pool in sequence, so each run starts
    /// from the sizes the previous run left behind.
    Shared,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SweepRow {
    Revenue {
        scenario: Scenario,
        beta: f64,
        algorithm: Algorithm,
        revenue: f64,
    },
    Calibration {
        scenario: Scenario,
        beta: f64,
        base_price: f64,
        value_with_all: f64,
    },
}

/// Scenario x algorithm x beta grid, one row per cell plus optional
/// calibration rows. Users and resources are generated once per scenario.
pub fn run_sweep(market: &MarketConfig, sweep: &SweepConfig) -> Result<Vec<SweepRow>> {
    let mut sampler = UniformSampler::seeded(sweep.seed);
    let mut rows = Vec::new();

    for scenario in &sweep.scenarios {
        let users = generate_users(sweep.user_count, market.max_capacity(), sampler.rng_mut());
        let generated = generate_resources(
            *scenario,
            sweep.resource_count,
            market.max_capacity(),
            sampler.rng_mut(),
        );
        let mut shared = generated.snapshot();

        tracing::info!(
            target: "sweep",
            scenario = %scenario,
            users = users.len(),
            resources = generated.len(),
            isolation = ?sweep.isolation,
            "scenario_generated"
        );

        for algorithm in &sweep.algorithms {
            for beta in &sweep.beta_values {
                let config = market
                    .with_beta(*beta)
                    .with_context(|| format!("invalid beta {beta} in sweep"))?;
                let revenue = with_pool(sweep.isolation, &generated, &mut shared, |pool| {
                    algorithm.run(&users, pool, &config, &mut sampler)
                });
                rows.push(SweepRow::Revenue {
                    scenario: *scenario,
                    beta: *beta,
                    algorithm: *algorithm,
                    revenue,
                });
            }
        }

        if sweep.calibrate {
            for beta in &sweep.beta_values {
                let config = market
                    .with_beta(*beta)
                    .with_context(|| format!("invalid beta {beta} in sweep"))?;
                let calibration = with_pool(sweep.isolation, &generated, &mut shared, |pool| {
                    calibrate(&users, pool.as_mut_slice(), &config, &mut sampler)
                });
                rows.push(SweepRow::Calibration {
                    scenario: *scenario,
                    beta: *beta,
                    base_price: calibration.base_price,
                    value_with_all: calibration.value_with_all,
                });
            }
        }
    }

    tracing::info!(target: "sweep", rows = rows.len(), seed = sweep.seed, "sweep_completed");
    Ok(rows)
}

fn with_pool<T>(
    isolation: ResourceIsolation,
    generated: &ResourcePool,
    shared: &mut ResourcePool,
    run: impl FnOnce(&mut ResourcePool) -> T,
) -> T {
    match isolation {
        ResourceIsolation::Snapshot => run(&mut generated.snapshot()),
        ResourceIsolation::Shared => run(shared),
    }
}

pub fn write_ndjson<W: Write>(rows: &[SweepRow], mut writer: W) -> Result<()> {
    for row in rows {
        serde_json::to_writer(&mut writer, row).context("failed to encode sweep row")?;
        writer
            .write_all(b"\n")
            .context("failed to write sweep row")?;
    }
    writer.flush().context("failed to flush sweep output")
}
