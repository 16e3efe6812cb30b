use serde::Serialize;

use crate::market::{
    error::{MarketError, invalid_config},
    types::{Capacity, Resource, User},
};

/// Pricing and learning parameters shared by every allocation policy.
///
/// Values are checked once in [`MarketConfig::new`]; every run function takes
/// an already validated config and is total over its inputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarketConfig {
    base_price: f64,
    discount_rate: f64,
    max_capacity: Capacity,
    beta: f64,
}

impl MarketConfig {
    pub fn new(
        base_price: f64,
        discount_rate: f64,
        max_capacity: Capacity,
        beta: f64,
    ) -> Result<Self, MarketError> {
        ensure_non_negative("base_price", base_price)?;
        ensure_non_negative("discount_rate", discount_rate)?;
        if max_capacity < 1 {
            return Err(invalid_config("max_capacity must be at least 1"));
        }
        if !beta.is_finite() || !(0.0..=1.0).contains(&beta) {
            return Err(invalid_config(format!(
                "beta must lie in [0, 1], got {beta}"
            )));
        }

        Ok(Self {
            base_price,
            discount_rate,
            max_capacity,
            beta,
        })
    }

    pub fn base_price(&self) -> f64 {
        self.base_price
    }

    pub fn discount_rate(&self) -> f64 {
        self.discount_rate
    }

    pub fn max_capacity(&self) -> Capacity {
        self.max_capacity
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    pub fn with_beta(&self, beta: f64) -> Result<Self, MarketError> {
        Self::new(self.base_price, self.discount_rate, self.max_capacity, beta)
    }

    pub fn with_base_price(&self, base_price: f64) -> Result<Self, MarketError> {
        Self::new(base_price, self.discount_rate, self.max_capacity, self.beta)
    }

    /// Linear charge: the quantum at `base_price`, every unit above it at
    /// `discount_rate`. Negative when the resource is smaller than the quantum.
    pub fn charge(&self, user: &User, resource: &Resource) -> f64 {
        let min_size = f64::from(user.min_size());
        let surplus = f64::from(resource.size) - min_size;
        self.base_price * min_size + self.discount_rate * surplus
    }
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            base_price: 0.1,
            discount_rate: 0.3,
            max_capacity: 10,
            beta: 0.5,
        }
    }
}

fn ensure_non_negative(field: &str, value: f64) -> Result<(), MarketError> {
    if !value.is_finite() || value < 0.0 {
        return Err(invalid_config(format!(
            "{field} must be a finite non-negative number, got {value}"
        )));
    }
    Ok(())
}
