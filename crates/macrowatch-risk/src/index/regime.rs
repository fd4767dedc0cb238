//! Stress regimes and their strategy recommendations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Strategy reported for a label that is not a known regime.
pub const FALLBACK_STRATEGY: &str = "No strategy";

/// Band of the composite stress index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StressLevel {
    /// Index below -1
    VeryLow,
    /// Index in [-1, 0)
    Low,
    /// Index in [0, 1)
    Moderate,
    /// Index in [1, 2)
    Elevated,
    /// Index of 2 or more
    Critical,
}

impl StressLevel {
    /// All regimes from calmest to most stressed.
    pub const ALL: [Self; 5] = [
        Self::VeryLow,
        Self::Low,
        Self::Moderate,
        Self::Elevated,
        Self::Critical,
    ];

    /// Band an index value. A value exactly on a boundary takes the higher band.
    pub fn classify(index: f64) -> Self {
        if index >= 2.0 {
            Self::Critical
        } else if index >= 1.0 {
            Self::Elevated
        } else if index >= 0.0 {
            Self::Moderate
        } else if index >= -1.0 {
            Self::Low
        } else {
            Self::VeryLow
        }
    }

    /// Label used in tables and reports.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::VeryLow => "VERY LOW",
            Self::Low => "LOW",
            Self::Moderate => "MODERATE",
            Self::Elevated => "ELEVATED",
            Self::Critical => "CRITICAL",
        }
    }

    /// Positioning recommendation for the regime.
    pub const fn strategy(&self) -> &'static str {
        match self {
            Self::VeryLow => "Pro-Growth regime: Favor Equities, Tech, Small Caps",
            Self::Low => "Stable regime: Maintain balanced equity exposure",
            Self::Moderate => "Rising stress: Rotate into Quality sectors",
            Self::Elevated => "Tightening: Consider Utilities, Value",
            Self::Critical => "Defensive: Increase Cash, Bonds, Gold",
        }
    }
}

impl fmt::Display for StressLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for StressLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.label() == s.trim())
            .ok_or_else(|| format!("unknown stress level {:?}", s))
    }
}

/// Strategy for a stress label, or [`FALLBACK_STRATEGY`] when the label is
/// not recognised.
pub fn strategy_for_label(label: &str) -> &'static str {
    label
        .parse::<StressLevel>()
        .map_or(FALLBACK_STRATEGY, |level| level.strategy())
}
