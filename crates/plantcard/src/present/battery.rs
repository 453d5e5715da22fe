//! Battery indicator in the card header.

use serde::Serialize;

use super::ColorToken;
use crate::host::EntityState;

/// One row of a battery tier table: levels at or above `threshold` get this look.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BatteryTier {
    pub threshold: f64,
    pub icon: &'static str,
    pub color: ColorToken,
    pub label: &'static str,
}

const fn tier(
    threshold: f64,
    icon: &'static str,
    color: ColorToken,
    label: &'static str,
) -> BatteryTier {
    BatteryTier {
        threshold,
        icon,
        color,
        label,
    }
}

/// Battery tiers, highest first.
pub static BATTERY_TIERS: [BatteryTier; 11] = [
    tier(91.0, "mdi:battery", ColorToken::Success, "Full"),
    tier(81.0, "mdi:battery-90", ColorToken::Success, "Good"),
    tier(71.0, "mdi:battery-80", ColorToken::Success, "Good"),
    tier(61.0, "mdi:battery-70", ColorToken::Success, "Good"),
    tier(51.0, "mdi:battery-60", ColorToken::Success, "Good"),
    tier(41.0, "mdi:battery-50", ColorToken::Success, "Medium"),
    tier(31.0, "mdi:battery-40", ColorToken::Success, "Medium"),
    tier(21.0, "mdi:battery-30", ColorToken::Warning, "Low"),
    tier(11.0, "mdi:battery-20", ColorToken::Warning, "Low"),
    tier(6.0, "mdi:battery-10", ColorToken::Error, "Very Low"),
    tier(0.0, "mdi:battery-alert", ColorToken::Error, "Critical"),
];

/// Used for levels below every tier, and for levels that are not numbers.
pub static UNKNOWN_BATTERY_TIER: BatteryTier = tier(
    f64::NEG_INFINITY,
    "mdi:battery-alert-variant-outline",
    ColorToken::Error,
    "Unknown",
);

/// Find the first tier in `tiers` whose threshold `level` reaches. `tiers` must be sorted
/// highest threshold first.
pub fn battery_tier_in(tiers: &[BatteryTier], level: Option<f64>) -> &BatteryTier {
    let Some(level) = level.filter(|l| !l.is_nan()) else {
        return &UNKNOWN_BATTERY_TIER;
    };
    tiers
        .iter()
        .find(|tier| level >= tier.threshold)
        .unwrap_or(&UNKNOWN_BATTERY_TIER)
}

pub fn battery_tier(level: Option<f64>) -> &'static BatteryTier {
    battery_tier_in(&BATTERY_TIERS, level)
}

/// What the header shows for a low battery.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatteryDisplay {
    pub entity_id: String,
    pub icon: &'static str,
    pub color: ColorToken,
    pub label: &'static str,
    pub tooltip: String,
}

/// Battery indicator for `state`, or `None` when the battery is above `threshold`.
///
/// A threshold of 0 never shows the indicator. Levels are whole percentages; a level that is
/// not a number is always shown, as "Unknown".
pub fn battery_display(
    entity_id: &str,
    state: &EntityState,
    threshold: u8,
) -> Option<BatteryDisplay> {
    let level = state.numeric().map(f64::trunc);
    if threshold == 0 || level.is_some_and(|l| l > f64::from(threshold)) {
        return None;
    }

    let tier = battery_tier(level);
    let shown = match level {
        Some(level) => level.to_string(),
        None => state.state.clone(),
    };

    Some(BatteryDisplay {
        entity_id: entity_id.to_string(),
        icon: tier.icon,
        color: tier.color,
        label: tier.label,
        tooltip: format!("Battery: {}%\nStatus: {}", shown, tier.label),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries() {
        let cases = [
            (100.0, "mdi:battery", "Full"),
            (91.0, "mdi:battery", "Full"),
            (90.0, "mdi:battery-90", "Good"),
            (51.0, "mdi:battery-60", "Good"),
            (50.0, "mdi:battery-50", "Medium"),
            (31.0, "mdi:battery-40", "Medium"),
            (30.0, "mdi:battery-30", "Low"),
            (11.0, "mdi:battery-20", "Low"),
            (10.0, "mdi:battery-10", "Very Low"),
            (6.0, "mdi:battery-10", "Very Low"),
            (5.0, "mdi:battery-alert", "Critical"),
            (0.0, "mdi:battery-alert", "Critical"),
            (-1.0, "mdi:battery-alert-variant-outline", "Unknown"),
        ];
        for (level, icon, label) in cases {
            let tier = battery_tier(Some(level));
            assert_eq!((tier.icon, tier.label), (icon, label), "level {level}");
        }
        assert_eq!(battery_tier(None).label, "Unknown");
        assert_eq!(battery_tier(Some(f64::NAN)).label, "Unknown");
    }

    #[test]
    fn test_severity_never_decreases_as_level_drops() {
        let mut previous = 0;
        for level in (-5..=100).rev() {
            let tier = battery_tier(Some(f64::from(level)));
            let severity = tier.color.severity();
            assert!(severity >= previous, "level {level}");
            previous = severity;
        }
    }

    #[test]
    fn test_every_level_has_a_tier() {
        for level in 0..=100 {
            assert_ne!(battery_tier(Some(f64::from(level))).label, "Unknown");
        }
    }

    #[test]
    fn test_custom_table() {
        let tiers = [
            tier(50.0, "mdi:battery", ColorToken::Success, "Fine"),
            tier(0.0, "mdi:battery-alert", ColorToken::Error, "Charge me"),
        ];
        assert_eq!(battery_tier_in(&tiers, Some(60.0)).label, "Fine");
        assert_eq!(battery_tier_in(&tiers, Some(20.0)).label, "Charge me");
        assert_eq!(battery_tier_in(&[], Some(20.0)).label, "Unknown");
    }

    #[test]
    fn test_battery_display_threshold() {
        let state = EntityState::new("9");
        let display = battery_display("sensor.ficus_battery", &state, 10).unwrap();
        assert_eq!(display.icon, "mdi:battery-10");
        assert_eq!(display.color, ColorToken::Error);
        insta::assert_snapshot!(display.tooltip, @r"
        Battery: 9%
        Status: Very Low
        ");

        assert_eq!(battery_display("sensor.ficus_battery", &EntityState::new("11"), 10), None);
        assert_eq!(battery_display("sensor.ficus_battery", &state, 0), None);
        assert!(battery_display("sensor.ficus_battery", &EntityState::new("100"), 100).is_some());
    }

    #[test]
    fn test_battery_display_truncates_and_handles_garbage() {
        let display = battery_display("b", &EntityState::new("10.9"), 10).unwrap();
        assert_eq!(display.tooltip, "Battery: 10%\nStatus: Very Low");

        let display = battery_display("b", &EntityState::new("unavailable"), 10).unwrap();
        assert_eq!(display.label, "Unknown");
        assert_eq!(display.icon, "mdi:battery-alert-variant-outline");
        assert_eq!(display.tooltip, "Battery: unavailable%\nStatus: Unknown");
    }
}
