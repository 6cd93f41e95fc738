use serde::{Deserialize, Serialize};

use super::super::domain::{PreferenceLevel, Role};

/// Eligibility tier deciding which answers count and how much.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EligibilityTier {
    /// Only a firm commitment counts.
    Senior,
    /// Any positive answer counts once.
    Manager,
    General,
}

/// Multipliers applied to a role's weight for the two positive answers.
/// Every other answer contributes nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TierRule {
    pub definitely_can: u64,
    pub probably_can: u64,
}

const SENIOR: TierRule = TierRule {
    definitely_can: 2,
    probably_can: 0,
};

const MANAGER: TierRule = TierRule {
    definitely_can: 1,
    probably_can: 1,
};

const GENERAL: TierRule = TierRule {
    definitely_can: 2,
    probably_can: 1,
};

impl EligibilityTier {
    pub fn of(role: Role) -> Self {
        match role {
            Role::Staff | Role::TeamLead => EligibilityTier::General,
            Role::Manager => EligibilityTier::Manager,
            Role::Director | Role::Executive => EligibilityTier::Senior,
        }
    }

    pub(crate) fn rule(self) -> TierRule {
        match self {
            EligibilityTier::Senior => SENIOR,
            EligibilityTier::Manager => MANAGER,
            EligibilityTier::General => GENERAL,
        }
    }

    pub fn multiplier(self, choice: PreferenceLevel) -> u64 {
        let rule = self.rule();
        match choice {
            PreferenceLevel::DefinitelyCan => rule.definitely_can,
            PreferenceLevel::ProbablyCan => rule.probably_can,
            PreferenceLevel::Undecided
            | PreferenceLevel::ProbablyCannot
            | PreferenceLevel::DefinitelyCannot => 0,
        }
    }
}

/// Points one answer adds to its date.
pub(crate) fn contribution(role: Role, weight: u32, choice: PreferenceLevel) -> u64 {
    EligibilityTier::of(role).multiplier(choice) * u64::from(weight)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_map_onto_their_tiers() {
        let tiers: Vec<_> = Role::ordered().into_iter().map(EligibilityTier::of).collect();
        assert_eq!(
            tiers,
            vec![
                EligibilityTier::General,
                EligibilityTier::General,
                EligibilityTier::Manager,
                EligibilityTier::Senior,
                EligibilityTier::Senior,
            ]
        );
    }

    #[test]
    fn tier_rules_reward_firm_answers_at_least_as_much() {
        for tier in [
            EligibilityTier::Senior,
            EligibilityTier::Manager,
            EligibilityTier::General,
        ] {
            let rule = tier.rule();
            assert!(rule.definitely_can >= rule.probably_can, "{tier:?}");
            assert!(rule.definitely_can > 0, "{tier:?}");
        }
    }

    #[test]
    fn team_leads_score_like_staff() {
        for choice in PreferenceLevel::ordered() {
            assert_eq!(
                contribution(Role::TeamLead, 2, choice),
                contribution(Role::Staff, 2, choice)
            );
        }
    }

    #[test]
    fn negative_and_undecided_answers_never_count() {
        for role in Role::ordered() {
            for choice in [
                PreferenceLevel::Undecided,
                PreferenceLevel::ProbablyCannot,
                PreferenceLevel::DefinitelyCannot,
            ] {
                assert_eq!(contribution(role, 5, choice), 0, "{role} / {choice}");
            }
        }
    }

    #[test]
    fn director_needs_a_firm_yes() {
        assert_eq!(contribution(Role::Director, 4, PreferenceLevel::ProbablyCan), 0);
        assert_eq!(contribution(Role::Director, 4, PreferenceLevel::DefinitelyCan), 8);
    }
}
