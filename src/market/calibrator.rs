use serde::Serialize;

use crate::market::{
    baselines::offline_optimal_value,
    config::MarketConfig,
    sampler::SizeSampler,
    types::{Resource, User, UserId},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarginalContribution {
    pub user_id: UserId,
    pub value_without: f64,
    pub contribution: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceCalibration {
    pub base_price: f64,
    pub value_with_all: f64,
    pub contributions: Vec<MarginalContribution>,
}

impl PriceCalibration {
    pub fn total_contribution(&self) -> f64 {
        self.contributions
            .iter()
            .map(|entry| entry.contribution)
            .sum()
    }
}

/// Marginal-value recalibration of the base price.
///
/// Each user's contribution is the offline-optimal value with everyone
/// present minus the value with that user removed. Because offline-optimal
/// resamples on every probe, contributions are noisy and can be negative.
/// Costs one offline-optimal pass per user plus one for the full set.
pub fn calibrate(
    users: &[User],
    resources: &mut [Resource],
    config: &MarketConfig,
    sampler: &mut dyn SizeSampler,
) -> PriceCalibration {
    if users.is_empty() {
        return PriceCalibration {
            base_price: 0.0,
            value_with_all: 0.0,
            contributions: Vec::new(),
        };
    }

    let value_with_all = offline_optimal_value(users, resources, config, sampler);
    let contributions: Vec<MarginalContribution> = users
        .iter()
        .enumerate()
        .map(|(excluded, user)| {
            let others = users
                .iter()
                .enumerate()
                .filter(move |(index, _)| *index != excluded)
                .map(|(_, other)| other);
            let value_without = offline_optimal_value(others, resources, config, sampler);
            MarginalContribution {
                user_id: user.id(),
                value_without,
                contribution: value_with_all - value_without,
            }
        })
        .collect();

    let total: f64 = contributions.iter().map(|entry| entry.contribution).sum();
    let calibration = PriceCalibration {
        base_price: config.beta() * total,
        value_with_all,
        contributions,
    };

    tracing::debug!(
        target: "calibrator",
        users = users.len(),
        resources = resources.len(),
        value_with_all,
        total_contribution = total,
        base_price = calibration.base_price,
        "price_calibrated"
    );

    calibration
}

pub fn calibrate_price(
    users: &[User],
    resources: &mut [Resource],
    config: &MarketConfig,
    sampler: &mut dyn SizeSampler,
) -> f64 {
    calibrate(users, resources, config, sampler).base_price
}
