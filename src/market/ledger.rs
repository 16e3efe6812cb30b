use std::collections::BTreeMap;

use crate::market::types::{QuantumHours, User, UserId};

/// Quantum-hours fulfilled per user during one admission run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllocationLedger {
    fulfilled: BTreeMap<UserId, QuantumHours>,
}

impl AllocationLedger {
    pub fn for_users(users: &[User]) -> Self {
        Self {
            fulfilled: users.iter().map(|user| (user.id(), 0)).collect(),
        }
    }

    pub fn fulfilled(&self, user_id: UserId) -> QuantumHours {
        self.fulfilled.get(&user_id).copied().unwrap_or(0)
    }

    pub fn is_satisfied(&self, user: &User) -> bool {
        self.fulfilled(user.id()) >= user.demand()
    }

    pub fn outstanding(&self, user: &User) -> QuantumHours {
        user.demand().saturating_sub(self.fulfilled(user.id()))
    }

    pub fn record(&mut self, user_id: UserId, quantum_hours: QuantumHours) -> QuantumHours {
        let entry = self.fulfilled.entry(user_id).or_default();
        *entry = entry.saturating_add(quantum_hours);
        *entry
    }

    pub fn total_fulfilled(&self) -> QuantumHours {
        self.fulfilled.values().copied().sum()
    }
}
