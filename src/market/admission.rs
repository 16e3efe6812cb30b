use serde::Serialize;

use crate::market::{
    config::MarketConfig,
    ledger::AllocationLedger,
    sampler::SizeSampler,
    types::{QuantumHours, Resource, ResourceId, User, UserId},
};

/// Live counters of one admission run. Never reuse across runs: the
/// threshold it carries was learned from that run's revenue only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PlatformState {
    threshold: f64,
    time_average_revenue: f64,
    elapsed_steps: u64,
}

impl PlatformState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn time_average_revenue(&self) -> f64 {
        self.time_average_revenue
    }

    pub fn elapsed_steps(&self) -> u64 {
        self.elapsed_steps
    }

    fn begin_step(&mut self) {
        self.elapsed_steps += 1;
    }

    /// Folds one user's revenue into the running mean and moves the threshold
    /// to `beta` times that mean. Only called after `begin_step`.
    fn record_revenue(&mut self, revenue: f64, beta: f64) {
        let steps = self.elapsed_steps.max(1) as f64;
        self.time_average_revenue =
            (self.time_average_revenue * (steps - 1.0) + revenue.max(0.0)) / steps;
        self.threshold = beta * self.time_average_revenue;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AdmissionDisposition {
    Admitted {
        resource_id: ResourceId,
        charge: f64,
        quantum_hours: QuantumHours,
    },
    AlreadySatisfied,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdmissionDecision {
    pub user_id: UserId,
    pub threshold: f64,
    pub disposition: AdmissionDisposition,
}

#[derive(Debug, Clone)]
pub struct DatOutcome {
    pub revenue: f64,
    pub state: PlatformState,
    pub ledger: AllocationLedger,
    pub decisions: Vec<AdmissionDecision>,
}

impl DatOutcome {
    pub fn admitted_count(&self) -> usize {
        self.decisions
            .iter()
            .filter(|decision| matches!(decision.disposition, AdmissionDisposition::Admitted { .. }))
            .count()
    }

    pub fn rejected_count(&self) -> usize {
        self.decisions
            .iter()
            .filter(|decision| decision.disposition == AdmissionDisposition::Rejected)
            .count()
    }
}

/// Dynamic Acceptance Threshold admission.
///
/// Users are served in input order; each scans the resources in input order
/// and takes the first one that both fits the quantum and pays at least the
/// current threshold.
pub struct AdmissionEngine {
    config: MarketConfig,
}

impl AdmissionEngine {
    pub fn new(config: MarketConfig) -> Self {
        Self { config }
    }

    pub fn admit_users(
        &self,
        state: &mut PlatformState,
        users: &[User],
        resources: &mut [Resource],
        sampler: &mut dyn SizeSampler,
    ) -> DatOutcome {
        let mut ledger = AllocationLedger::for_users(users);
        let mut decisions = Vec::with_capacity(users.len());
        let mut revenue = 0.0;

        for user in users {
            state.begin_step();
            let threshold = state.threshold();
            let disposition = self.admit_one(state, &mut ledger, user, resources, sampler);

            match &disposition {
                AdmissionDisposition::Admitted {
                    charge,
                    quantum_hours,
                    ..
                } => {
                    let amount = charge * *quantum_hours as f64;
                    revenue += amount;
                    state.record_revenue(amount, self.config.beta());
                }
                AdmissionDisposition::AlreadySatisfied | AdmissionDisposition::Rejected => {
                    state.record_revenue(0.0, self.config.beta());
                }
            }

            decisions.push(AdmissionDecision {
                user_id: user.id(),
                threshold,
                disposition,
            });
        }

        let outcome = DatOutcome {
            revenue,
            state: *state,
            ledger,
            decisions,
        };

        tracing::debug!(
            target: "admission",
            users = users.len(),
            resources = resources.len(),
            beta = self.config.beta(),
            admitted = outcome.admitted_count(),
            rejected = outcome.rejected_count(),
            revenue = outcome.revenue,
            threshold = outcome.state.threshold(),
            "dat_run_completed"
        );

        outcome
    }

    fn admit_one(
        &self,
        state: &PlatformState,
        ledger: &mut AllocationLedger,
        user: &User,
        resources: &mut [Resource],
        sampler: &mut dyn SizeSampler,
    ) -> AdmissionDisposition {
        let mut satisfied = false;

        for resource in resources.iter_mut() {
            sampler.resample(resource, self.config.max_capacity());
            if ledger.is_satisfied(user) {
                satisfied = true;
                continue;
            }

            let charge = self.config.charge(user, resource);
            if charge >= state.threshold() && resource.fits(user) {
                let quantum_hours = QuantumHours::from(resource.size).min(ledger.outstanding(user));
                ledger.record(user.id(), quantum_hours);
                return AdmissionDisposition::Admitted {
                    resource_id: resource.id,
                    charge,
                    quantum_hours,
                };
            }
        }

        if satisfied {
            AdmissionDisposition::AlreadySatisfied
        } else {
            AdmissionDisposition::Rejected
        }
    }
}

/// Runs DAT from a fresh [`PlatformState`] and returns the total revenue.
pub fn run_dat(
    users: &[User],
    resources: &mut [Resource],
    config: &MarketConfig,
    sampler: &mut dyn SizeSampler,
) -> f64 {
    let mut state = PlatformState::new();
    AdmissionEngine::new(*config)
        .admit_users(&mut state, users, resources, sampler)
        .revenue
}
