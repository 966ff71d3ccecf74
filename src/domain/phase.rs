//! Phase: the five fixed top-level segments of the pipeline.

use serde::{Deserialize, Serialize};

/// One of the five top-level segments, fixed ordering, stable integer id 1..5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Phase {
    Knowledge = 1,
    Plan = 2,
    Implement = 3,
    Scale = 4,
    Production = 5,
}

impl Phase {
    pub const ALL: [Phase; 5] = [Phase::Knowledge, Phase::Plan, Phase::Implement, Phase::Scale, Phase::Production];

    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Phase::Knowledge),
            2 => Some(Phase::Plan),
            3 => Some(Phase::Implement),
            4 => Some(Phase::Scale),
            5 => Some(Phase::Production),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Phase::Knowledge => "Knowledge",
            Phase::Plan => "Plan",
            Phase::Implement => "Implement",
            Phase::Scale => "Scale",
            Phase::Production => "Production",
        }
    }

    /// The three fixed process names for this phase, in order P1..P3.
    pub fn process_names(self) -> [&'static str; 3] {
        match self {
            Phase::Knowledge => ["Research", "Crawl", "Retrieve"],
            Phase::Plan => ["Brainstorm", "Clarify", "Plan"],
            Phase::Implement => ["Implement", "Verify", "Feedback"],
            Phase::Scale => ["Scale", "Benchmark", "Optimize"],
            Phase::Production => ["Analyze", "Systemize", "Harmonize"],
        }
    }

    pub fn process_name(self, process_id: u8) -> Option<&'static str> {
        self.process_names().get(usize::from(process_id).checked_sub(1)?).copied()
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip() {
        for p in Phase::ALL {
            assert_eq!(Phase::from_id(p.id()), Some(p));
        }
    }

    #[test]
    fn unknown_id_is_none() {
        assert_eq!(Phase::from_id(0), None);
        assert_eq!(Phase::from_id(6), None);
    }

    #[test]
    fn process_names_fixed() {
        assert_eq!(Phase::Implement.process_names(), ["Implement", "Verify", "Feedback"]);
        assert_eq!(Phase::Implement.process_name(2), Some("Verify"));
        assert_eq!(Phase::Implement.process_name(4), None);
    }
}
