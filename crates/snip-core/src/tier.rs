//! # Loyalty Tiers
//!
//! The closed set of tiers and the single table that maps each tier to its
//! visit threshold and display attributes.
//!
//! ## Tier Ladder
//! ```text
//! visits:   0 ─────── 5 ─────── 10 ─────────────── 20 ─────────────► ∞
//!           │ Bronze  │  Silver  │       Gold        │    Platinum
//! ```
//!
//! Tier is a pure function of cumulative visits, so it never goes down.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

// =============================================================================
// Tier
// =============================================================================

/// Ordinal loyalty level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Tier {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

/// Threshold and display attributes for one tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierInfo {
    pub tier: Tier,
    /// Visits needed to enter this tier.
    pub min_visits: u32,
    /// Badge background colour class.
    pub badge_color: &'static str,
    /// Text colour class.
    pub text_color: &'static str,
}

/// Every tier, lowest first. The only place thresholds are defined.
pub const TIER_TABLE: [TierInfo; 4] = [
    TierInfo {
        tier: Tier::Bronze,
        min_visits: 0,
        badge_color: "bg-orange-100",
        text_color: "text-orange-700",
    },
    TierInfo {
        tier: Tier::Silver,
        min_visits: 5,
        badge_color: "bg-gray-100",
        text_color: "text-gray-700",
    },
    TierInfo {
        tier: Tier::Gold,
        min_visits: 10,
        badge_color: "bg-yellow-100",
        text_color: "text-yellow-700",
    },
    TierInfo {
        tier: Tier::Platinum,
        min_visits: 20,
        badge_color: "bg-purple-100",
        text_color: "text-purple-700",
    },
];

impl Tier {
    /// All tiers, lowest first.
    pub const ALL: [Tier; 4] = [Tier::Bronze, Tier::Silver, Tier::Gold, Tier::Platinum];

    /// Tier earned by a cumulative visit count.
    ///
    /// ```rust
    /// use snip_core::tier::Tier;
    ///
    /// assert_eq!(Tier::for_visits(4), Tier::Bronze);
    /// assert_eq!(Tier::for_visits(5), Tier::Silver);
    /// assert_eq!(Tier::for_visits(20), Tier::Platinum);
    /// ```
    pub fn for_visits(visits: u32) -> Tier {
        TIER_TABLE
            .iter()
            .rev()
            .find(|info| visits >= info.min_visits)
            .map(|info| info.tier)
            .unwrap_or(Tier::Bronze)
    }

    /// Table row for this tier.
    pub fn info(self) -> &'static TierInfo {
        &TIER_TABLE[self.index()]
    }

    /// Visits needed to enter this tier.
    pub fn min_visits(self) -> u32 {
        self.info().min_visits
    }

    /// The tier above this one, `None` for Platinum.
    pub fn next(self) -> Option<Tier> {
        TIER_TABLE.get(self.index() + 1).map(|info| info.tier)
    }

    /// Visit count at which this tier is left behind, `None` for Platinum.
    pub fn upper_threshold(self) -> Option<u32> {
        self.next().map(Tier::min_visits)
    }

    /// Display name.
    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Bronze => "Bronze",
            Tier::Silver => "Silver",
            Tier::Gold => "Gold",
            Tier::Platinum => "Platinum",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl Default for Tier {
    fn default() -> Self {
        Tier::Bronze
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tier::ALL
            .into_iter()
            .find(|tier| tier.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown tier '{}'", s))
    }
}

/// Free-function form of [`Tier::for_visits`].
pub fn tier_for_visits(visits: u32) -> Tier {
    Tier::for_visits(visits)
}

// =============================================================================
// Progress
// =============================================================================

/// How far a customer is through their current tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TierProgress {
    pub current: Tier,
    pub next: Option<Tier>,
    /// Visits still needed for `next`; zero at Platinum.
    pub visits_needed: u32,
    /// visits / upper threshold, as a percentage capped at 100.
    pub percent: u8,
}

impl TierProgress {
    /// Progress for a visit count.
    pub fn for_visits(visits: u32) -> Self {
        let current = Tier::for_visits(visits);
        match current.upper_threshold() {
            Some(threshold) => {
                let percent = (u64::from(visits) * 100 / u64::from(threshold)).min(100) as u8;
                TierProgress {
                    current,
                    next: current.next(),
                    visits_needed: threshold.saturating_sub(visits),
                    percent,
                }
            }
            None => TierProgress {
                current,
                next: None,
                visits_needed: 0,
                percent: 100,
            },
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries_are_exact() {
        assert_eq!(Tier::for_visits(0), Tier::Bronze);
        assert_eq!(Tier::for_visits(4), Tier::Bronze);
        assert_eq!(Tier::for_visits(5), Tier::Silver);
        assert_eq!(Tier::for_visits(9), Tier::Silver);
        assert_eq!(Tier::for_visits(10), Tier::Gold);
        assert_eq!(Tier::for_visits(19), Tier::Gold);
        assert_eq!(Tier::for_visits(20), Tier::Platinum);
        assert_eq!(Tier::for_visits(u32::MAX), Tier::Platinum);
    }

    #[test]
    fn test_monotonic_in_visits() {
        let mut previous = Tier::for_visits(0);
        for visits in 1..=100 {
            let tier = tier_for_visits(visits);
            assert!(tier >= previous, "tier dropped at {} visits", visits);
            previous = tier;
        }
    }

    #[test]
    fn test_table_matches_enum_order() {
        for (index, info) in TIER_TABLE.iter().enumerate() {
            assert_eq!(info.tier, Tier::ALL[index]);
        }
        assert!(TIER_TABLE.windows(2).all(|w| w[0].min_visits < w[1].min_visits));
    }

    #[test]
    fn test_next_and_threshold() {
        assert_eq!(Tier::Bronze.next(), Some(Tier::Silver));
        assert_eq!(Tier::Gold.upper_threshold(), Some(20));
        assert_eq!(Tier::Platinum.next(), None);
        assert_eq!(Tier::Platinum.upper_threshold(), None);
    }

    #[test]
    fn test_progress() {
        let p = TierProgress::for_visits(3);
        assert_eq!(p.current, Tier::Bronze);
        assert_eq!(p.next, Some(Tier::Silver));
        assert_eq!(p.visits_needed, 2);
        assert_eq!(p.percent, 60);

        let p = TierProgress::for_visits(12);
        assert_eq!(p.next, Some(Tier::Platinum));
        assert_eq!(p.visits_needed, 8);
        assert_eq!(p.percent, 60);

        let p = TierProgress::for_visits(25);
        assert_eq!(p.next, None);
        assert_eq!(p.percent, 100);
    }

    #[test]
    fn test_parse_tier() {
        assert_eq!("gold".parse::<Tier>().unwrap(), Tier::Gold);
        assert!("diamond".parse::<Tier>().is_err());
    }
}
