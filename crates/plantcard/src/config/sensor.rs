use serde::Deserialize;
use serde::Serialize;
use strum::AsRefStr;
use strum::Display;
use strum::EnumIter;
use strum::EnumString;

/// The sensors a card can show in its grid. Battery is shown in the header instead.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SensorType {
    Light,
    Moisture,
    Temperature,
    Salinity,
    Nutrition,
}

impl SensorType {
    /// Flat config key toggling this sensor, e.g. `show_light`.
    pub fn show_key(self) -> String {
        format!("show_{}", self)
    }

    /// Flat config key holding this sensor's position, e.g. `light_order`.
    pub fn order_key(self) -> String {
        format!("{}_order", self)
    }

    /// Legacy key superseded by `<type>_order`.
    pub fn priority_key(self) -> String {
        format!("{}_priority", self)
    }

    /// Legacy key superseded by `<type>_order`.
    pub fn position_key(self) -> String {
        format!("{}_position", self)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DisplayMode {
    #[default]
    Full,
    Compact,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_config_keys() {
        assert_eq!(SensorType::Light.show_key(), "show_light");
        assert_eq!(SensorType::Nutrition.order_key(), "nutrition_order");
        assert_eq!(SensorType::Salinity.priority_key(), "salinity_priority");
        assert_eq!(SensorType::Moisture.position_key(), "moisture_position");
    }

    #[test]
    fn test_sensor_type_names() {
        let names: Vec<String> = SensorType::iter().map(|s| s.to_string()).collect();
        assert_eq!(
            names,
            vec!["light", "moisture", "temperature", "salinity", "nutrition"]
        );
        assert_eq!(SensorType::from_str("salinity").unwrap(), SensorType::Salinity);
        assert!(SensorType::from_str("battery").is_err());
    }

    #[test]
    fn test_display_mode() {
        assert_eq!(DisplayMode::default(), DisplayMode::Full);
        assert_eq!(DisplayMode::from_str("compact").unwrap(), DisplayMode::Compact);
        assert_eq!(
            serde_json::to_string(&DisplayMode::Compact).unwrap(),
            r#""compact""#
        );
    }
}
