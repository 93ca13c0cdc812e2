use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Wizard stages, in order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    #[default]
    BasicInfo,
    Customers,
    Schedule,
    Review,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Next,
    Previous,
}

/// Work performed whenever a stage is entered, from either direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryEffect {
    /// Load candidate stores for the current search term.
    FetchCandidates,
    /// Replace the draft's customers with the staged list.
    ResyncCustomers,
}

impl Stage {
    pub const ALL: [Stage; 4] = [Stage::BasicInfo, Stage::Customers, Stage::Schedule, Stage::Review];

    /// 1-based step number.
    pub fn number(self) -> u8 {
        match self {
            Stage::BasicInfo => 1,
            Stage::Customers => 2,
            Stage::Schedule => 3,
            Stage::Review => 4,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Stage::BasicInfo => "Basic Information",
            Stage::Customers => "Customers",
            Stage::Schedule => "Schedule",
            Stage::Review => "Review",
        }
    }

    /// Target of `transition`; clamped at both ends.
    pub fn after(self, transition: Transition) -> Stage {
        let index = self.number() as usize - 1;
        let target = match transition {
            Transition::Next => (index + 1).min(Stage::ALL.len() - 1),
            Transition::Previous => index.saturating_sub(1),
        };
        Stage::ALL[target]
    }

    pub fn on_enter(self) -> Option<EntryEffect> {
        match self {
            Stage::Customers => Some(EntryEffect::FetchCandidates),
            Stage::Schedule => Some(EntryEffect::ResyncCustomers),
            Stage::BasicInfo | Stage::Review => None,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    #[test]
    fn transitions_clamp_at_both_ends() {
        assert_eq!(Stage::Review.after(Transition::Next), Stage::Review);
        assert_eq!(Stage::BasicInfo.after(Transition::Previous), Stage::BasicInfo);
        assert_eq!(Stage::Customers.after(Transition::Next), Stage::Schedule);
        assert_eq!(Stage::Schedule.after(Transition::Previous), Stage::Customers);
    }

    #[test]
    fn any_walk_stays_within_one_to_four() {
        let mut rng = StdRng::seed_from_u64(0x2545_f491);
        let mut stage = Stage::BasicInfo;
        for _ in 0..500 {
            let transition = if rng.gen_bool(1.0 / 3.0) { Transition::Previous } else { Transition::Next };
            stage = stage.after(transition);
            assert!((1..=4).contains(&stage.number()));
        }
    }

    #[test]
    fn only_customers_and_schedule_have_entry_effects() {
        assert_eq!(Stage::Customers.on_enter(), Some(EntryEffect::FetchCandidates));
        assert_eq!(Stage::Schedule.on_enter(), Some(EntryEffect::ResyncCustomers));
        assert_eq!(Stage::BasicInfo.on_enter(), None);
        assert_eq!(Stage::Review.on_enter(), None);
    }
}
