//! Static allocation policies DAT is benchmarked against.
//!
//! None of them track the admission threshold or quantum-hours: a single
//! resource pick is treated as serving the user's whole demand, and the user
//! pays one charge for it.

use serde::{Deserialize, Serialize};

use crate::market::{
    config::MarketConfig,
    sampler::SizeSampler,
    types::{Resource, User},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Baseline {
    Random,
    GreedyMinFit,
    GreedyMaxFit,
    OfflineOptimal,
}

impl Baseline {
    pub fn run(
        self,
        users: &[User],
        resources: &mut [Resource],
        config: &MarketConfig,
        sampler: &mut dyn SizeSampler,
    ) -> f64 {
        match self {
            Self::Random => run_random(users, resources, config, sampler),
            Self::GreedyMinFit => run_greedy_min(users, resources, config, sampler),
            Self::GreedyMaxFit => run_greedy_max(users, resources, config, sampler),
            Self::OfflineOptimal => run_offline_optimal(users, resources, config, sampler),
        }
    }
}

/// Smallest resource that fits `user`; ties go to the earliest in the slice.
pub fn select_min_fit<'a>(user: &User, resources: &'a [Resource]) -> Option<&'a Resource> {
    resources
        .iter()
        .filter(|resource| resource.fits(user))
        .fold(None, |best: Option<&Resource>, candidate| match best {
            Some(current) if current.size <= candidate.size => Some(current),
            _ => Some(candidate),
        })
}

/// Largest resource that fits `user`; ties go to the earliest in the slice.
pub fn select_max_fit<'a>(user: &User, resources: &'a [Resource]) -> Option<&'a Resource> {
    resources
        .iter()
        .filter(|resource| resource.fits(user))
        .fold(None, |best: Option<&Resource>, candidate| match best {
            Some(current) if current.size >= candidate.size => Some(current),
            _ => Some(candidate),
        })
}

/// Highest charge `user` could pay over the slice as it stands, 0 if nothing fits.
pub fn best_charge(user: &User, resources: &[Resource], config: &MarketConfig) -> f64 {
    resources
        .iter()
        .filter(|resource| resource.fits(user))
        .map(|resource| config.charge(user, resource))
        .fold(0.0, f64::max)
}

pub fn run_random(
    users: &[User],
    resources: &mut [Resource],
    config: &MarketConfig,
    sampler: &mut dyn SizeSampler,
) -> f64 {
    if resources.is_empty() {
        return 0.0;
    }

    let mut revenue = 0.0;
    for user in users {
        let index = sampler.choose(resources.len());
        let resource = &mut resources[index];
        sampler.resample(resource, config.max_capacity());
        if resource.fits(user) {
            revenue += config.charge(user, resource);
        }
    }

    log_run(Baseline::Random, users.len(), resources.len(), revenue);
    revenue
}

pub fn run_greedy_min(
    users: &[User],
    resources: &mut [Resource],
    config: &MarketConfig,
    sampler: &mut dyn SizeSampler,
) -> f64 {
    let revenue = run_greedy(users, resources, config, sampler, select_min_fit);
    log_run(Baseline::GreedyMinFit, users.len(), resources.len(), revenue);
    revenue
}

pub fn run_greedy_max(
    users: &[User],
    resources: &mut [Resource],
    config: &MarketConfig,
    sampler: &mut dyn SizeSampler,
) -> f64 {
    let revenue = run_greedy(users, resources, config, sampler, select_max_fit);
    log_run(Baseline::GreedyMaxFit, users.len(), resources.len(), revenue);
    revenue
}

/// Per-user best charge with every resource resampled on probe. An upper
/// bound that ignores contention: two users may both "win" the same resource.
pub fn run_offline_optimal(
    users: &[User],
    resources: &mut [Resource],
    config: &MarketConfig,
    sampler: &mut dyn SizeSampler,
) -> f64 {
    let revenue = offline_optimal_value(users, resources, config, sampler);
    log_run(Baseline::OfflineOptimal, users.len(), resources.len(), revenue);
    revenue
}

pub(crate) fn offline_optimal_value<'a>(
    users: impl IntoIterator<Item = &'a User>,
    resources: &mut [Resource],
    config: &MarketConfig,
    sampler: &mut dyn SizeSampler,
) -> f64 {
    let mut revenue = 0.0;
    for user in users {
        let mut best = 0.0_f64;
        for resource in resources.iter_mut() {
            sampler.resample(resource, config.max_capacity());
            if resource.fits(user) {
                best = best.max(config.charge(user, resource));
            }
        }
        revenue += best;
    }
    revenue
}

fn run_greedy(
    users: &[User],
    resources: &mut [Resource],
    config: &MarketConfig,
    sampler: &mut dyn SizeSampler,
    select: for<'r> fn(&User, &'r [Resource]) -> Option<&'r Resource>,
) -> f64 {
    let mut revenue = 0.0;
    for user in users {
        for resource in resources.iter_mut() {
            sampler.resample(resource, config.max_capacity());
        }
        if let Some(resource) = select(user, resources) {
            revenue += config.charge(user, resource);
        }
    }
    revenue
}

fn log_run(baseline: Baseline, users: usize, resources: usize, revenue: f64) {
    tracing::debug!(
        target: "baselines",
        baseline = ?baseline,
        users,
        resources,
        revenue,
        "baseline_run_completed"
    );
}
