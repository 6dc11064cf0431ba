//! Display attributes for threat tiers.
//!
//! Classification decides *which* tier a reading is in; this table decides
//! how each tier looks. UI consumers fetch it through the API instead of
//! hard-coding colours per widget.

use serde::Serialize;

use crate::threat::{ScoreTier, ThreatLevel};

/// How a [`ThreatLevel`] is shown on the alert banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelPresentation {
    pub label: &'static str,
    /// Palette name shared with the frontend theme.
    pub color: &'static str,
    pub message: &'static str,
    /// Marker used in the alert history list.
    pub icon: &'static str,
    /// Whether the banner should pulse.
    pub pulse: bool,
}

/// How a [`ScoreTier`] is shown on the score meter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TierPresentation {
    pub label: &'static str,
    pub color: &'static str,
}

pub fn level_presentation(level: ThreatLevel) -> LevelPresentation {
    match level {
        ThreatLevel::Safe => LevelPresentation {
            label: "SAFE",
            color: "green",
            message: "No threats detected. Area is secure.",
            icon: "🟢",
            pulse: false,
        },
        ThreatLevel::Warning => LevelPresentation {
            label: "WARNING",
            color: "yellow",
            message: "Unusual activity detected. Stay alert.",
            icon: "🟡",
            pulse: false,
        },
        ThreatLevel::Danger => LevelPresentation {
            label: "DANGER",
            color: "orange",
            message: "Potential threat identified. Proceed with caution.",
            icon: "🟠",
            pulse: false,
        },
        ThreatLevel::Critical => LevelPresentation {
            label: "CRITICAL",
            color: "red",
            message: "DEMOGORGON DETECTED! EVACUATE IMMEDIATELY!",
            icon: "🔴",
            pulse: true,
        },
    }
}

pub fn tier_presentation(tier: ScoreTier) -> TierPresentation {
    match tier {
        ScoreTier::Minimal => TierPresentation {
            label: "MINIMAL",
            color: "green",
        },
        ScoreTier::Moderate => TierPresentation {
            label: "MODERATE",
            color: "yellow",
        },
        ScoreTier::High => TierPresentation {
            label: "HIGH",
            color: "orange",
        },
        ScoreTier::Critical => TierPresentation {
            label: "CRITICAL",
            color: "red",
        },
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn every_level_has_a_distinct_color() {
        let colors: HashSet<_> = ThreatLevel::ALL
            .into_iter()
            .map(|l| level_presentation(l).color)
            .collect();
        assert_eq!(colors.len(), ThreatLevel::ALL.len());
    }

    #[test]
    fn only_critical_pulses() {
        for level in ThreatLevel::ALL {
            assert_eq!(level_presentation(level).pulse, level == ThreatLevel::Critical);
        }
    }

    #[test]
    fn labels_are_uppercase_tier_names() {
        for level in ThreatLevel::ALL {
            assert_eq!(level_presentation(level).label, level.as_str().to_uppercase());
        }
        for tier in ScoreTier::ALL {
            assert_eq!(tier_presentation(tier).label, tier.as_str().to_uppercase());
        }
    }
}
