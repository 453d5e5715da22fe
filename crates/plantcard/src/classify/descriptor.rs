use std::fmt;

use serde::Deserialize;
use serde::Serialize;

/// Sensor device class, matching the Home Assistant sensor device classes the card cares about.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DeviceClass {
    Battery,
    Conductivity,
    Date,
    Enum,
    Illuminance,
    Moisture,
    Temperature,
    Timestamp,
    /// A device class the card does not classify on
    Unknown(String),
}

impl DeviceClass {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Battery => "battery",
            Self::Conductivity => "conductivity",
            Self::Date => "date",
            Self::Enum => "enum",
            Self::Illuminance => "illuminance",
            Self::Moisture => "moisture",
            Self::Temperature => "temperature",
            Self::Timestamp => "timestamp",
            Self::Unknown(s) => s,
        }
    }
}

impl fmt::Display for DeviceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for DeviceClass {
    fn from(s: String) -> Self {
        match s.as_str() {
            "battery" => Self::Battery,
            "conductivity" => Self::Conductivity,
            "date" => Self::Date,
            "enum" => Self::Enum,
            "illuminance" => Self::Illuminance,
            "moisture" => Self::Moisture,
            "temperature" => Self::Temperature,
            "timestamp" => Self::Timestamp,
            _ => Self::Unknown(s),
        }
    }
}

impl From<&str> for DeviceClass {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<DeviceClass> for String {
    fn from(class: DeviceClass) -> Self {
        class.as_str().to_string()
    }
}

/// Everything the classifier needs to know about one entity of the bound device.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EntityDescriptor {
    /// Entity ID (e.g., "sensor.ficus_moisture")
    pub entity_id: String,

    pub device_class: Option<DeviceClass>,

    pub unit_of_measurement: Option<String>,

    /// Only meaningful for enum-class entities
    pub translation_key: Option<String>,
}

impl EntityDescriptor {
    pub fn new(entity_id: impl Into<String>) -> Self {
        Self {
            entity_id: entity_id.into(),
            ..Default::default()
        }
    }

    pub fn with_device_class(mut self, class: impl Into<DeviceClass>) -> Self {
        self.device_class = Some(class.into());
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit_of_measurement = Some(unit.into());
        self
    }

    pub fn with_translation_key(mut self, key: impl Into<String>) -> Self {
        self.translation_key = Some(key.into());
        self
    }
}
