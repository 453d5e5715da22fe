use serde::Deserialize;
use serde::Serialize;

/// Deserialize a field that can be a string, boolean, or number.
///
/// Home Assistant always reports entity states as strings, but hand-written
/// snapshots and some integrations emit bare numbers (`"state": 42`). This
/// helper accepts any scalar and converts it to a string.
fn deserialize_string_or_scalar<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de;

    struct StringOrScalar;

    impl<'de> de::Visitor<'de> for StringOrScalar {
        type Value = String;

        fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            f.write_str("string, boolean, number, or null")
        }

        fn visit_none<E>(self) -> Result<Self::Value, E> {
            Ok(UNKNOWN_STATE.to_string())
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E> {
            Ok(UNKNOWN_STATE.to_string())
        }

        fn visit_bool<E>(self, v: bool) -> Result<Self::Value, E> {
            Ok(v.to_string())
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E> {
            Ok(v.to_string())
        }

        fn visit_string<E>(self, v: String) -> Result<Self::Value, E> {
            Ok(v)
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E> {
            Ok(v.to_string())
        }

        fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E> {
            Ok(v.to_string())
        }
    }

    deserializer.deserialize_any(StringOrScalar)
}

/// State string Home Assistant uses when an entity has no value.
pub const UNKNOWN_STATE: &str = "unknown";

/// Current state of one entity as pushed by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityState {
    /// Raw state string (e.g. "42", "perfect", "2024-01-15")
    #[serde(default = "unknown_state", deserialize_with = "deserialize_string_or_scalar")]
    pub state: String,

    #[serde(default)]
    pub attributes: EntityAttributes,
}

fn unknown_state() -> String {
    UNKNOWN_STATE.to_string()
}

/// The subset of state attributes the card reads. Everything else is kept in `extra`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EntityAttributes {
    pub unit_of_measurement: Option<String>,

    pub device_class: Option<String>,

    pub entity_picture: Option<String>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl EntityState {
    pub fn new(state: impl Into<String>) -> Self {
        Self {
            state: state.into(),
            attributes: EntityAttributes::default(),
        }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.attributes.unit_of_measurement = Some(unit.into());
        self
    }

    pub fn with_device_class(mut self, device_class: impl Into<String>) -> Self {
        self.attributes.device_class = Some(device_class.into());
        self
    }

    pub fn with_picture(mut self, picture: impl Into<String>) -> Self {
        self.attributes.entity_picture = Some(picture.into());
        self
    }

    /// Parse the state as a number. `None` for "unknown", "unavailable" and friends.
    pub fn numeric(&self) -> Option<f64> {
        self.state.trim().parse::<f64>().ok().filter(|v| v.is_finite())
    }

    /// Unit of measurement, or the empty string when the entity has none.
    pub fn unit(&self) -> &str {
        self.attributes.unit_of_measurement.as_deref().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_accepts_numbers() {
        let state: EntityState = serde_json::from_str(r#"{"state": 42}"#).unwrap();
        assert_eq!(state.state, "42");
        assert_eq!(state.numeric(), Some(42.0));

        let state: EntityState = serde_json::from_str(r#"{"state": 21.5}"#).unwrap();
        assert_eq!(state.state, "21.5");
    }

    #[test]
    fn test_state_null_is_unknown() {
        let state: EntityState = serde_json::from_str(r#"{"state": null}"#).unwrap();
        assert_eq!(state.state, UNKNOWN_STATE);
        assert_eq!(state.numeric(), None);

        let state: EntityState = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(state.state, UNKNOWN_STATE);
    }

    #[test]
    fn test_attributes_keep_unknown_keys() {
        let state: EntityState = serde_json::from_str(
            r#"{
                "state": "55",
                "attributes": {
                    "unit_of_measurement": "%",
                    "device_class": "moisture",
                    "friendly_name": "Ficus"
                }
            }"#,
        )
        .unwrap();
        assert_eq!(state.unit(), "%");
        assert_eq!(state.attributes.device_class.as_deref(), Some("moisture"));
        assert_eq!(
            state.attributes.extra.get("friendly_name"),
            Some(&serde_json::json!("Ficus"))
        );
    }

    #[test]
    fn test_non_numeric_state() {
        assert_eq!(EntityState::new("unavailable").numeric(), None);
        assert_eq!(EntityState::new(" 7 ").numeric(), Some(7.0));
        assert_eq!(EntityState::new("NaN").numeric(), None);
    }
}
