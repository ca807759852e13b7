//! Tier participation policy
//!
//! Pure functions deciding which tiers an operation touches. The cache manager
//! calls these on every request; nothing here performs I/O.

use std::fmt;

use crate::options::CacheMode;

/// One of the two cache tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    /// In-process, fast
    L1,
    /// Networked, shared
    L2,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::L1 => "L1",
            Self::L2 => "L2",
        })
    }
}

/// Which tiers an operation should touch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierTargets {
    pub l1: bool,
    pub l2: bool,
}

impl TierTargets {
    #[must_use]
    pub fn is_empty(self) -> bool {
        !self.l1 && !self.l2
    }

    #[must_use]
    pub fn contains(self, tier: Tier) -> bool {
        match tier {
            Tier::L1 => self.l1,
            Tier::L2 => self.l2,
        }
    }

    /// Targeted tiers in read order (L1 first)
    pub fn iter(self) -> impl Iterator<Item = Tier> {
        [Tier::L1, Tier::L2]
            .into_iter()
            .filter(move |tier| self.contains(*tier))
    }
}

/// Default participation for a mode
#[must_use]
pub fn mode_defaults(mode: CacheMode) -> TierTargets {
    match mode {
        CacheMode::BothLevels => TierTargets { l1: true, l2: true },
        CacheMode::L1Only => TierTargets { l1: true, l2: false },
        CacheMode::L2Only => TierTargets { l1: false, l2: true },
    }
}

/// Mode defaults with per-call overrides applied on top. A set flag always
/// replaces the mode's choice for that tier.
#[must_use]
pub fn resolve_targets(
    mode: CacheMode,
    override_l1: Option<bool>,
    override_l2: Option<bool>,
) -> TierTargets {
    let defaults = mode_defaults(mode);
    TierTargets {
        l1: override_l1.unwrap_or(defaults.l1),
        l2: override_l2.unwrap_or(defaults.l2),
    }
}

/// Whether an L2 hit should be copied into L1.
///
/// Only in `BothLevels`, only when L1 took part in the read, and never when the
/// caller set an explicit L1 override for this call. The caller still has to
/// check that L1 is configured.
#[must_use]
pub fn should_warm(mode: CacheMode, targets: TierTargets, override_l1: Option<bool>) -> bool {
    targets.l1 && mode == CacheMode::BothLevels && override_l1.is_none()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_defaults_table() {
        assert_eq!(mode_defaults(CacheMode::BothLevels), TierTargets { l1: true, l2: true });
        assert_eq!(mode_defaults(CacheMode::L1Only), TierTargets { l1: true, l2: false });
        assert_eq!(mode_defaults(CacheMode::L2Only), TierTargets { l1: false, l2: true });
    }

    #[test]
    fn overrides_replace_defaults() {
        let t = resolve_targets(CacheMode::BothLevels, Some(true), Some(false));
        assert_eq!(t, TierTargets { l1: true, l2: false });

        let t = resolve_targets(CacheMode::L1Only, None, Some(true));
        assert_eq!(t, TierTargets { l1: true, l2: true });

        let t = resolve_targets(CacheMode::L2Only, Some(true), None);
        assert_eq!(t, TierTargets { l1: true, l2: true });

        let t = resolve_targets(CacheMode::BothLevels, Some(false), Some(false));
        assert!(t.is_empty());
    }

    #[test]
    fn unset_overrides_keep_mode() {
        for mode in [CacheMode::BothLevels, CacheMode::L1Only, CacheMode::L2Only] {
            assert_eq!(resolve_targets(mode, None, None), mode_defaults(mode));
        }
    }

    #[test]
    fn warmup_rules() {
        let both = TierTargets { l1: true, l2: true };
        assert!(should_warm(CacheMode::BothLevels, both, None));
        // explicit per-call choice is never second-guessed
        assert!(!should_warm(CacheMode::BothLevels, both, Some(true)));
        assert!(!should_warm(CacheMode::L2Only, both, None));
        assert!(!should_warm(
            CacheMode::BothLevels,
            TierTargets { l1: false, l2: true },
            None
        ));
    }

    #[test]
    fn iter_is_read_order() {
        let tiers: Vec<_> = TierTargets { l1: true, l2: true }.iter().collect();
        assert_eq!(tiers, vec![Tier::L1, Tier::L2]);
        let tiers: Vec<_> = TierTargets { l1: false, l2: true }.iter().collect();
        assert_eq!(tiers, vec![Tier::L2]);
    }
}
