use serde::Serialize;

use super::MeasurementStatus;
use super::MeterClass;
use crate::config::SensorType;

/// Range of values a sensor's meter spans.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SensorRange {
    pub min: f64,
    pub max: f64,
}

impl SensorRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Position of `value` in the range as a percentage, clamped to 0..=100.
    pub fn percentage(&self, value: f64) -> f64 {
        if self.max <= self.min {
            return 0.0;
        }
        ((value - self.min) / (self.max - self.min) * 100.0).clamp(0.0, 100.0)
    }
}

/// Fill and style of a meter bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MeterState {
    /// 0 to 100
    pub fill: f64,
    pub class: MeterClass,
}

impl MeterState {
    pub const UNAVAILABLE: MeterState = MeterState {
        fill: 0.0,
        class: MeterClass::Unavailable,
    };
}

/// Meter for a reading.
///
/// The class always follows `status`. With a numeric reading and a range the fill is the
/// reading's position in the range, otherwise it is a fixed value per status. Without a
/// status the meter is empty.
pub fn meter_state(
    range: Option<SensorRange>,
    reading: Option<f64>,
    status: MeasurementStatus,
) -> MeterState {
    let (fixed, class) = match status {
        MeasurementStatus::TooLow => (10.0, MeterClass::Bad),
        MeasurementStatus::Low => (30.0, MeterClass::Warning),
        MeasurementStatus::Perfect => (50.0, MeterClass::Good),
        MeasurementStatus::High => (70.0, MeterClass::Warning),
        MeasurementStatus::TooHigh => (90.0, MeterClass::Bad),
        MeasurementStatus::NoData => return MeterState::UNAVAILABLE,
    };

    let fill = match (range, reading) {
        (Some(range), Some(value)) => range.percentage(value),
        _ => fixed,
    };
    MeterState { fill, class }
}

/// Fixed presentation of one kind of sensor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorSettings {
    pub icon: &'static str,
    pub range: Option<SensorRange>,
}

pub const BATTERY_SETTINGS: SensorSettings = SensorSettings {
    icon: "mdi:battery",
    range: Some(SensorRange::new(0.0, 100.0)),
};

impl SensorType {
    pub fn settings(self) -> SensorSettings {
        match self {
            SensorType::Light => SensorSettings {
                icon: "mdi:white-balance-sunny",
                range: None,
            },
            SensorType::Moisture => SensorSettings {
                icon: "mdi:water",
                range: Some(SensorRange::new(0.0, 100.0)),
            },
            SensorType::Temperature => SensorSettings {
                icon: "mdi:thermometer",
                range: Some(SensorRange::new(0.0, 50.0)),
            },
            SensorType::Salinity => SensorSettings {
                icon: "mdi:water-percent",
                range: None,
            },
            SensorType::Nutrition => SensorSettings {
                icon: "mdi:emoticon-poop",
                range: None,
            },
        }
    }

    /// Name used in tooltips, e.g. "Moisture".
    pub fn display_name(self) -> String {
        let name = self.to_string();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_only_meters() {
        let cases = [
            (MeasurementStatus::TooLow, 10.0, MeterClass::Bad),
            (MeasurementStatus::Low, 30.0, MeterClass::Warning),
            (MeasurementStatus::Perfect, 50.0, MeterClass::Good),
            (MeasurementStatus::High, 70.0, MeterClass::Warning),
            (MeasurementStatus::TooHigh, 90.0, MeterClass::Bad),
            (MeasurementStatus::NoData, 0.0, MeterClass::Unavailable),
        ];
        for (status, fill, class) in cases {
            assert_eq!(meter_state(None, None, status), MeterState { fill, class });
            // A reading without a range does not move the bar
            assert_eq!(meter_state(None, Some(1234.0), status), MeterState { fill, class });
        }
    }

    #[test]
    fn test_ranged_meter_is_linear() {
        let range = SensorType::Temperature.settings().range;
        let meter = meter_state(range, Some(25.0), MeasurementStatus::High);
        assert_eq!(meter.fill, 50.0);
        assert_eq!(meter.class, MeterClass::Warning);

        assert_eq!(meter_state(range, Some(-10.0), MeasurementStatus::TooLow).fill, 0.0);
        assert_eq!(meter_state(range, Some(80.0), MeasurementStatus::TooHigh).fill, 100.0);
        assert_eq!(meter_state(range, Some(12.5), MeasurementStatus::Low).fill, 25.0);
    }

    #[test]
    fn test_ranged_meter_without_status_is_unavailable() {
        let range = SensorType::Moisture.settings().range;
        assert_eq!(
            meter_state(range, Some(40.0), MeasurementStatus::NoData),
            MeterState::UNAVAILABLE
        );
    }

    #[test]
    fn test_degenerate_range() {
        assert_eq!(SensorRange::new(5.0, 5.0).percentage(5.0), 0.0);
    }

    #[test]
    fn test_settings() {
        assert_eq!(SensorType::Light.settings().icon, "mdi:white-balance-sunny");
        assert_eq!(SensorType::Salinity.settings().range, None);
        assert_eq!(BATTERY_SETTINGS.range, Some(SensorRange::new(0.0, 100.0)));
        assert_eq!(SensorType::Moisture.display_name(), "Moisture");
    }
}
