pub mod admission;
pub mod baselines;
pub mod calibrator;
pub mod config;
pub mod error;
pub mod ledger;
pub mod sampler;
pub mod scenario;
pub mod types;

pub use admission::{
    AdmissionDecision, AdmissionDisposition, AdmissionEngine, DatOutcome, PlatformState, run_dat,
};
pub use baselines::{
    Baseline, best_charge, run_greedy_max, run_greedy_min, run_offline_optimal, run_random,
    select_max_fit, select_min_fit,
};
pub use calibrator::{MarginalContribution, PriceCalibration, calibrate, calibrate_price};
pub use config::MarketConfig;
pub use error::{MarketError, MarketErrorKind};
pub use ledger::AllocationLedger;
pub use sampler::{FixedSampler, SizeSampler, UniformSampler, resample};
pub use scenario::{Scenario, generate_resources, generate_users};
pub use types::{
    Capacity, QuantumHours, Resource, ResourceId, ResourcePool, User, UserId,
};
