//! Combo multiplier
//!
//! Consecutive correct keystrokes raise the multiplier through four tiers.
//! Any wrong key drops it straight back to 1.

use serde::{Deserialize, Serialize};

/// Streak needed to enter tiers 2, 3 and 4
pub const MULTIPLIER_THRESHOLDS: [u32; 3] = [30, 75, 135];

/// Highest multiplier
pub const MAX_MULTIPLIER: u32 = 4;

/// Multiplier state reported to the HUD
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MultiplierInfo {
    pub multiplier: u32,
    pub multiplier_changed: bool,
    /// Fraction of the current tier completed, in [0, 1]
    pub progress: f32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComboMultiplier {
    streak: u32,
}

impl ComboMultiplier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn multiplier(&self) -> u32 {
        tier_for_streak(self.streak)
    }

    pub fn progress(&self) -> f32 {
        progress_for_streak(self.streak)
    }

    pub fn record_correct(&mut self) -> MultiplierInfo {
        let before = self.multiplier();
        self.streak = self.streak.saturating_add(1);
        let multiplier = self.multiplier();
        MultiplierInfo {
            multiplier,
            multiplier_changed: multiplier != before,
            progress: self.progress(),
        }
    }

    /// Wrong key, or a key that matched no asteroid
    pub fn record_incorrect_or_miss(&mut self) -> MultiplierInfo {
        let before = self.multiplier();
        self.streak = 0;
        MultiplierInfo {
            multiplier: 1,
            multiplier_changed: before != 1,
            progress: 0.0,
        }
    }
}

/// Tier index (1..=4) for a streak
pub fn tier_for_streak(streak: u32) -> u32 {
    let tier = 1 + MULTIPLIER_THRESHOLDS.iter().filter(|&&t| streak >= t).count() as u32;
    tier.min(MAX_MULTIPLIER)
}

/// Progress through the current tier.
///
/// Tier widths are 30, 45 and 60. Tier 4 keeps measuring from 75 with a width
/// of 60, so it is already saturated on entry.
pub fn progress_for_streak(streak: u32) -> f32 {
    let [t2, t3, t4] = MULTIPLIER_THRESHOLDS;
    let (start, width) = if streak < t2 {
        (0, t2)
    } else if streak < t3 {
        (t2, t3 - t2)
    } else {
        // Tiers 3 and 4 share the same window
        (t3, t4 - t3)
    };
    ((streak - start) as f32 / width as f32).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn combo_at(streak: u32) -> ComboMultiplier {
        let mut combo = ComboMultiplier::new();
        for _ in 0..streak {
            combo.record_correct();
        }
        combo
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(tier_for_streak(0), 1);
        assert_eq!(tier_for_streak(29), 1);
        assert_eq!(tier_for_streak(30), 2);
        assert_eq!(tier_for_streak(74), 2);
        assert_eq!(tier_for_streak(75), 3);
        assert_eq!(tier_for_streak(134), 3);
        assert_eq!(tier_for_streak(135), 4);
        assert_eq!(tier_for_streak(u32::MAX), MAX_MULTIPLIER);
    }

    #[test]
    fn test_promotion_to_tier_two() {
        let mut combo = combo_at(28);
        let info = combo.record_correct();
        assert_eq!(info.multiplier, 1);
        assert!(!info.multiplier_changed);
        assert!((info.progress - 29.0 / 30.0).abs() < 1e-6);

        let info = combo.record_correct();
        assert_eq!(info.multiplier, 2);
        assert!(info.multiplier_changed);
        assert_eq!(info.progress, 0.0);
    }

    #[test]
    fn test_progress_widths() {
        assert!((progress_for_streak(45) - 15.0 / 45.0).abs() < 1e-6);
        assert!((progress_for_streak(105) - 0.5).abs() < 1e-6);
        assert_eq!(progress_for_streak(135), 1.0);
        assert_eq!(progress_for_streak(500), 1.0);
    }

    #[test]
    fn test_reset() {
        let mut combo = combo_at(80);
        assert_eq!(combo.multiplier(), 3);
        let info = combo.record_incorrect_or_miss();
        assert_eq!(info.multiplier, 1);
        assert!(info.multiplier_changed);
        assert_eq!(info.progress, 0.0);
        assert_eq!(combo.streak(), 0);

        let info = combo.record_incorrect_or_miss();
        assert!(!info.multiplier_changed);
    }
}
