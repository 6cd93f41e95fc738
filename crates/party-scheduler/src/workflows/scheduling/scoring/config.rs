use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::super::domain::{ConfigurationError, Role};

/// Role → vote weight table. Weights are positive; a table may omit roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<Role, u32>", into = "BTreeMap<Role, u32>")]
pub struct RoleWeights {
    weights: BTreeMap<Role, u32>,
}

impl RoleWeights {
    pub fn new(entries: impl IntoIterator<Item = (Role, u32)>) -> Result<Self, ConfigurationError> {
        let mut weights = BTreeMap::new();
        for (role, weight) in entries {
            if weight == 0 {
                return Err(ConfigurationError::NonPositiveWeight(role));
            }
            weights.insert(role, weight);
        }

        Ok(Self { weights })
    }

    /// Seniority ladder used by the department: 1 for staff up to 5 for executives.
    pub fn standard() -> Self {
        let weights = Role::ordered()
            .into_iter()
            .zip(1..)
            .collect::<BTreeMap<_, _>>();
        Self { weights }
    }

    pub fn weight(&self, role: Role) -> Option<u32> {
        self.weights.get(&role).copied()
    }

    pub fn require(&self, role: Role) -> Result<u32, ConfigurationError> {
        self.weight(role)
            .ok_or(ConfigurationError::UnknownRole(role))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Role, u32)> + '_ {
        self.weights.iter().map(|(role, weight)| (*role, *weight))
    }
}

impl Default for RoleWeights {
    fn default() -> Self {
        Self::standard()
    }
}

impl TryFrom<BTreeMap<Role, u32>> for RoleWeights {
    type Error = ConfigurationError;

    fn try_from(value: BTreeMap<Role, u32>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RoleWeights> for BTreeMap<Role, u32> {
    fn from(value: RoleWeights) -> Self {
        value.weights
    }
}
