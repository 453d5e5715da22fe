use std::str::FromStr;

use serde::Serialize;
use strum::AsRefStr;
use strum::Display;
use strum::EnumIter;
use strum::EnumString;

/// How a reading compares to the plant's preferred range, as reported by a status entity.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MeasurementStatus {
    #[default]
    NoData,
    TooLow,
    Low,
    Perfect,
    High,
    TooHigh,
}

/// Overall plant health, shown as the color of the card title.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PlantStatus {
    Deleted,
    DoingGreat,
    NeedAttention,
    #[default]
    NoSensor,
}

/// Theme color a card element is drawn in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorToken {
    Success,
    Warning,
    Error,
    Disabled,
    Text,
    Primary,
}

/// Style class of a sensor meter bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MeterClass {
    Good,
    Warning,
    Bad,
    Unavailable,
}

/// Replace underscores with spaces, e.g. `too_low` -> `too low`.
pub(crate) fn humanize(state: &str) -> String {
    state.replace('_', " ")
}

impl MeasurementStatus {
    /// Parse a status entity state. Anything unrecognized counts as no data.
    pub fn from_state(state: &str) -> Self {
        Self::from_str(state).unwrap_or_default()
    }

    pub fn color(self) -> ColorToken {
        match self {
            MeasurementStatus::NoData => ColorToken::Disabled,
            MeasurementStatus::TooLow | MeasurementStatus::TooHigh => ColorToken::Error,
            MeasurementStatus::Low | MeasurementStatus::High => ColorToken::Warning,
            MeasurementStatus::Perfect => ColorToken::Success,
        }
    }

    /// `too_low` -> `too low`
    pub fn label(self) -> String {
        humanize(self.as_ref())
    }
}

impl PlantStatus {
    /// Parse a plant status entity state. Anything unrecognized counts as no sensor.
    pub fn from_state(state: &str) -> Self {
        Self::from_str(state).unwrap_or_default()
    }

    pub fn color(self) -> ColorToken {
        match self {
            PlantStatus::Deleted => ColorToken::Text,
            PlantStatus::DoingGreat => ColorToken::Success,
            PlantStatus::NeedAttention => ColorToken::Warning,
            PlantStatus::NoSensor => ColorToken::Disabled,
        }
    }
}

impl ColorToken {
    /// The CSS value for this color: a theme variable with a fallback.
    pub fn css(self) -> &'static str {
        match self {
            ColorToken::Success => "var(--success-color, #4CAF50)",
            ColorToken::Warning => "var(--warning-color, #FFC107)",
            ColorToken::Error => "var(--error-color, #F44336)",
            ColorToken::Disabled => "var(--disabled-text-color, gray)",
            ColorToken::Text => "var(--text-color, white)",
            ColorToken::Primary => "var(--primary-text-color, white)",
        }
    }

    /// Ordering for "how alarming is this color". Neutral colors rank lowest.
    pub fn severity(self) -> u8 {
        match self {
            ColorToken::Success => 1,
            ColorToken::Warning => 2,
            ColorToken::Error => 3,
            ColorToken::Disabled | ColorToken::Text | ColorToken::Primary => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_measurement_status_from_state() {
        assert_eq!(MeasurementStatus::from_state("too_low"), MeasurementStatus::TooLow);
        assert_eq!(MeasurementStatus::from_state("perfect"), MeasurementStatus::Perfect);
        assert_eq!(MeasurementStatus::from_state("unavailable"), MeasurementStatus::NoData);
        assert_eq!(MeasurementStatus::from_state(""), MeasurementStatus::NoData);
    }

    #[test]
    fn test_measurement_colors() {
        let colors: Vec<(String, &str)> = MeasurementStatus::iter()
            .map(|s| (s.to_string(), s.color().css()))
            .collect();
        insta::assert_debug_snapshot!(colors, @r#"
        [
            (
                "no_data",
                "var(--disabled-text-color, gray)",
            ),
            (
                "too_low",
                "var(--error-color, #F44336)",
            ),
            (
                "low",
                "var(--warning-color, #FFC107)",
            ),
            (
                "perfect",
                "var(--success-color, #4CAF50)",
            ),
            (
                "high",
                "var(--warning-color, #FFC107)",
            ),
            (
                "too_high",
                "var(--error-color, #F44336)",
            ),
        ]
        "#);
    }

    #[test]
    fn test_plant_status() {
        assert_eq!(PlantStatus::from_state("doing_great").color(), ColorToken::Success);
        assert_eq!(PlantStatus::from_state("need_attention").color(), ColorToken::Warning);
        assert_eq!(PlantStatus::from_state("deleted").color(), ColorToken::Text);
        assert_eq!(PlantStatus::from_state("unknown"), PlantStatus::NoSensor);
        assert_eq!(PlantStatus::NoSensor.color().css(), "var(--disabled-text-color, gray)");
    }

    #[test]
    fn test_labels() {
        assert_eq!(MeasurementStatus::TooHigh.label(), "too high");
        assert_eq!(MeasurementStatus::NoData.label(), "no data");
        assert_eq!(MeterClass::Unavailable.to_string(), "unavailable");
    }
}
