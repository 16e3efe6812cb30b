use serde::Serialize;

use crate::market::error::{MarketError, invalid_entity};

pub type UserId = u32;
pub type ResourceId = u32;
pub type Capacity = u32;
pub type QuantumHours = u64;

/// A bidder asking for at least `min_size` capacity per allocation and
/// `demand` quantum-hours in total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    id: UserId,
    min_size: Capacity,
    demand: QuantumHours,
}

impl User {
    pub fn new(id: UserId, min_size: Capacity, demand: QuantumHours) -> Result<Self, MarketError> {
        if min_size == 0 {
            return Err(invalid_entity(format!(
                "user {id}: min_size must be at least 1"
            )));
        }

        Ok(Self {
            id,
            min_size,
            demand,
        })
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn min_size(&self) -> Capacity {
        self.min_size
    }

    pub fn demand(&self) -> QuantumHours {
        self.demand
    }
}

/// A harvested resource whose capacity fluctuates between probes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resource {
    pub id: ResourceId,
    pub size: Capacity,
}

impl Resource {
    pub fn new(id: ResourceId, size: Capacity) -> Result<Self, MarketError> {
        if size == 0 {
            return Err(invalid_entity(format!(
                "resource {id}: size must be at least 1"
            )));
        }

        Ok(Self { id, size })
    }

    pub fn fits(&self, user: &User) -> bool {
        self.size >= user.min_size
    }
}

/// Ordered resource list owned by one experiment run.
///
/// Every comparator resamples the resources it probes, so two comparators run
/// against the same pool observe each other's probing. Hand each comparator a
/// `snapshot()` when independent views are wanted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResourcePool {
    resources: Vec<Resource>,
}

impl ResourcePool {
    pub fn new(resources: impl IntoIterator<Item = Resource>) -> Self {
        Self {
            resources: resources.into_iter().collect(),
        }
    }

    pub fn snapshot(&self) -> Self {
        self.clone()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn as_mut_slice(&mut self) -> &mut [Resource] {
        &mut self.resources
    }

    pub fn sizes(&self) -> Vec<Capacity> {
        self.resources.iter().map(|resource| resource.size).collect()
    }
}

impl From<Vec<Resource>> for ResourcePool {
    fn from(value: Vec<Resource>) -> Self {
        Self::new(value)
    }
}
