//! Card config schema versions and the upgrade chain between them.
//!
//! The card has been configured three ways over its life:
//!
//! - **Legacy**: `<type>_priority` / `<type>_position` ordering plus retired options
//!   (`display_options`, `show_ec`, `sensor_order`).
//! - **Flat**: `show_<type>` booleans with string `<type>_order` values.
//! - **Listed**: an explicit ordered `sensors` list of `{type, enabled}` entries.
//!
//! Each version upgrades to the next with one function; the last step produces the
//! canonical [`CardConfig`]. Problems are repaired and reported as diagnostics.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde_json::Map;
use serde_json::Value;
use strum::IntoEnumIterator;
use tracing::debug;

use super::card::default_slot;
use super::card::CardConfig;
use super::diagnostics::Diagnostic;
use super::diagnostics::Warning;
use super::DisplayMode;
use super::SensorType;
use crate::CardError;

/// Options that no longer have any meaning.
const RETIRED_KEYS: [&str; 3] = ["display_options", "show_ec", "sensor_order"];

const SENSORS_KEY: &str = "sensors";

/// A card config as the host stored it, in whichever schema version it was written.
#[derive(Debug, Clone, PartialEq)]
pub enum RawCardConfig {
    Legacy(Map<String, Value>),
    Flat(FlatConfig),
    Listed(ListedConfig),
}

/// Options shared by every schema version, not yet validated.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CommonFields {
    pub device_id: Option<Value>,
    pub title: Option<Value>,
    pub display_mode: Option<Value>,
    pub battery_threshold: Option<Value>,

    /// Keys the card does not interpret, passed through to the canonical config
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlatConfig {
    pub common: CommonFields,
    /// `show_<type>` per sensor
    pub show: BTreeMap<SensorType, Value>,
    /// `<type>_order` per sensor
    pub order: BTreeMap<SensorType, Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListedConfig {
    pub common: CommonFields,
    pub sensors: Vec<ListedSensor>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ListedSensor {
    pub sensor_type: SensorType,
    pub enabled: bool,
    pub order: Option<i64>,
}

fn is_legacy_key(key: &str) -> bool {
    RETIRED_KEYS.contains(&key) || key.contains("_priority") || key.contains("_position")
}

fn is_flat_sensor_key(key: &str) -> bool {
    SensorType::iter().any(|s| key == s.show_key() || key == s.order_key())
}

impl RawCardConfig {
    /// Identify the schema version of a raw config object.
    pub fn from_value(raw: &Value, diagnostics: &mut Vec<Diagnostic>) -> Result<Self, CardError> {
        let map = match raw {
            Value::Object(map) => map.clone(),
            Value::Null => return Err(CardError::InvalidConfig("config is missing".to_string())),
            other => {
                return Err(CardError::InvalidConfig(format!(
                    "expected an object, found {}",
                    json_type_name(other)
                )))
            }
        };

        let config = if map.contains_key(SENSORS_KEY) {
            RawCardConfig::Listed(ListedConfig::from_map(map, diagnostics))
        } else if map.keys().any(|k| is_legacy_key(k)) {
            RawCardConfig::Legacy(map)
        } else {
            RawCardConfig::Flat(FlatConfig::from_map(map))
        };

        Ok(config)
    }

    pub fn version_name(&self) -> &'static str {
        match self {
            RawCardConfig::Legacy(_) => "legacy",
            RawCardConfig::Flat(_) => "flat",
            RawCardConfig::Listed(_) => "listed",
        }
    }

    /// Upgrade one schema version. `Listed` is the newest raw version and is returned as is.
    pub fn upgrade(self, diagnostics: &mut Vec<Diagnostic>) -> Self {
        match self {
            RawCardConfig::Legacy(map) => RawCardConfig::Flat(upgrade_legacy(map, diagnostics)),
            RawCardConfig::Flat(flat) => RawCardConfig::Listed(upgrade_flat(flat, diagnostics)),
            listed @ RawCardConfig::Listed(_) => listed,
        }
    }

    /// Run the whole upgrade chain and produce the canonical config.
    pub fn into_current(self, diagnostics: &mut Vec<Diagnostic>) -> CardConfig {
        let mut raw = self;
        loop {
            debug!("Upgrading {} card config", raw.version_name());
            match raw {
                RawCardConfig::Listed(listed) => return finish(listed, diagnostics),
                other => raw = other.upgrade(diagnostics),
            }
        }
    }
}

impl CommonFields {
    /// Take the shared options out of `map`, leaving the rest as pass-through keys.
    fn take(map: &mut Map<String, Value>) -> Self {
        Self {
            device_id: map.remove("device_id"),
            title: map.remove("title"),
            display_mode: map.remove("display_mode"),
            battery_threshold: map.remove("battery_threshold"),
            extra: BTreeMap::new(),
        }
    }
}

impl FlatConfig {
    fn from_map(mut map: Map<String, Value>) -> Self {
        let mut common = CommonFields::take(&mut map);
        let mut show = BTreeMap::new();
        let mut order = BTreeMap::new();

        for sensor in SensorType::iter() {
            if let Some(value) = map.remove(&sensor.show_key()) {
                show.insert(sensor, value);
            }
            if let Some(value) = map.remove(&sensor.order_key()) {
                order.insert(sensor, value);
            }
        }

        common.extra = map.into_iter().collect();
        Self {
            common,
            show,
            order,
        }
    }
}

impl ListedConfig {
    fn from_map(mut map: Map<String, Value>, diagnostics: &mut Vec<Diagnostic>) -> Self {
        let mut common = CommonFields::take(&mut map);
        let raw_sensors = map.remove(SENSORS_KEY).unwrap_or(Value::Null);

        // The list supersedes every older way of ordering sensors
        let superseded: Vec<String> = map
            .keys()
            .filter(|k| is_legacy_key(k) || is_flat_sensor_key(k))
            .cloned()
            .collect();
        for key in superseded {
            map.remove(&key);
            diagnostics.push(Diagnostic::Warning(Warning::DeprecatedKey { key }));
        }

        let sensors = match raw_sensors {
            Value::Array(entries) => entries
                .iter()
                .enumerate()
                .filter_map(|(index, entry)| parse_listed_sensor(index, entry, diagnostics))
                .collect(),
            other => {
                diagnostics.push(Diagnostic::invalid_value(
                    SENSORS_KEY,
                    format!("expected a list, found {}", json_type_name(&other)),
                ));
                default_listed_sensors()
            }
        };

        common.extra = map.into_iter().collect();
        Self { common, sensors }
    }
}

fn parse_listed_sensor(
    index: usize,
    entry: &Value,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<ListedSensor> {
    let field = format!("{}[{}]", SENSORS_KEY, index);

    let Some(object) = entry.as_object() else {
        diagnostics.push(Diagnostic::invalid_value(
            field,
            format!("expected an object, found {}", json_type_name(entry)),
        ));
        return None;
    };

    let Some(name) = object.get("type").and_then(Value::as_str) else {
        diagnostics.push(Diagnostic::invalid_value(field, "missing sensor 'type'"));
        return None;
    };

    let Ok(sensor_type) = SensorType::from_str(name) else {
        diagnostics.push(Diagnostic::Warning(Warning::UnknownSensor {
            name: name.to_string(),
        }));
        return None;
    };

    let enabled = match object.get("enabled").or_else(|| object.get("isEnabled")) {
        None => true,
        Some(value) => parse_bool(value).unwrap_or_else(|| {
            diagnostics.push(Diagnostic::invalid_value(
                format!("{}.enabled", field),
                format!("expected true or false, found {}", value),
            ));
            true
        }),
    };

    let order = match object.get("order") {
        None | Some(Value::Null) => None,
        Some(value) => parse_order(value).or_else(|| {
            diagnostics.push(Diagnostic::invalid_value(
                format!("{}.order", field),
                format!("expected a number, found {}", value),
            ));
            None
        }),
    };

    Some(ListedSensor {
        sensor_type,
        enabled,
        order,
    })
}

fn default_listed_sensors() -> Vec<ListedSensor> {
    CardConfig::default()
        .sensors()
        .iter()
        .map(|slot| ListedSensor {
            sensor_type: slot.sensor_type,
            enabled: slot.enabled,
            order: Some(slot.order as i64),
        })
        .collect()
}

/// Legacy -> Flat: drop retired options and carry `<type>_priority` (preferred) or
/// `<type>_position` over to `<type>_order`.
fn upgrade_legacy(mut map: Map<String, Value>, diagnostics: &mut Vec<Diagnostic>) -> FlatConfig {
    for sensor in SensorType::iter() {
        let order_key = sensor.order_key();
        let legacy = [sensor.priority_key(), sensor.position_key()]
            .into_iter()
            .find(|key| map.get(key).is_some_and(|v| !v.is_null()));

        if let Some(from) = legacy {
            if let Some(value) = map.get(&from) {
                map.insert(order_key.clone(), Value::String(coerce_to_string(value)));
                diagnostics.push(Diagnostic::Warning(Warning::LegacyKeyMigrated {
                    from,
                    to: order_key,
                }));
            }
        }
    }

    let retired: Vec<String> = map.keys().filter(|k| is_legacy_key(k)).cloned().collect();
    for key in retired {
        map.remove(&key);
        // Migrated keys were already reported
        let migrated = diagnostics.iter().any(|d| {
            matches!(
                d,
                Diagnostic::Warning(Warning::LegacyKeyMigrated { from, .. }) if *from == key
            )
        });
        if !migrated {
            diagnostics.push(Diagnostic::Warning(Warning::DeprecatedKey { key }));
        }
    }

    FlatConfig::from_map(map)
}

/// Flat -> Listed: sort sensors on their order value, ties broken by type name.
fn upgrade_flat(flat: FlatConfig, diagnostics: &mut Vec<Diagnostic>) -> ListedConfig {
    let mut sensors: Vec<ListedSensor> = SensorType::iter()
        .map(|sensor| {
            let default = default_slot(sensor);

            let enabled = match flat.show.get(&sensor) {
                None | Some(Value::Null) => default.enabled,
                Some(value) => parse_bool(value).unwrap_or_else(|| {
                    diagnostics.push(Diagnostic::invalid_value(
                        sensor.show_key(),
                        format!("expected true or false, found {}", value),
                    ));
                    default.enabled
                }),
            };

            let order = match flat.order.get(&sensor) {
                None | Some(Value::Null) => default.order as i64,
                Some(value) => parse_order(value).unwrap_or_else(|| {
                    diagnostics.push(Diagnostic::invalid_value(
                        sensor.order_key(),
                        format!("expected a number, found {}", value),
                    ));
                    default.order as i64
                }),
            };

            ListedSensor {
                sensor_type: sensor,
                enabled,
                order: Some(order),
            }
        })
        .collect();

    sort_listed(&mut sensors);

    ListedConfig {
        common: flat.common,
        sensors,
    }
}

/// Sort on explicit order (list position when absent), then type name.
fn sort_listed(sensors: &mut [ListedSensor]) {
    let mut indexed: Vec<(usize, ListedSensor)> = sensors.iter().copied().enumerate().collect();
    indexed.sort_by(|(ia, a), (ib, b)| {
        let key_a = a.order.unwrap_or(*ia as i64 + 1);
        let key_b = b.order.unwrap_or(*ib as i64 + 1);
        key_a
            .cmp(&key_b)
            .then_with(|| a.sensor_type.as_ref().cmp(b.sensor_type.as_ref()))
    });
    for (slot, (_, sensor)) in sensors.iter_mut().zip(indexed) {
        *slot = sensor;
    }
}

/// Listed -> canonical config.
fn finish(mut listed: ListedConfig, diagnostics: &mut Vec<Diagnostic>) -> CardConfig {
    let mut seen = Vec::new();
    listed.sensors.retain(|sensor| {
        if seen.contains(&sensor.sensor_type) {
            diagnostics.push(Diagnostic::Warning(Warning::DuplicateSensor {
                sensor: sensor.sensor_type,
            }));
            return false;
        }
        seen.push(sensor.sensor_type);
        true
    });
    sort_listed(&mut listed.sensors);

    let common = listed.common;
    let mut config = CardConfig::default()
        .with_device(string_field("device_id", common.device_id, diagnostics))
        .with_title(string_field("title", common.title, diagnostics))
        .with_display_mode(display_mode_field(common.display_mode, diagnostics))
        .with_battery_threshold(threshold_field(common.battery_threshold, diagnostics))
        .with_ordered_sensors(
            listed
                .sensors
                .iter()
                .map(|s| (s.sensor_type, s.enabled))
                .collect(),
        );
    config.extra = common.extra;

    if config.ensure_any_enabled() {
        diagnostics.push(Diagnostic::Warning(Warning::NoSensorsEnabled));
    }

    config
}

fn string_field(field: &str, value: Option<Value>, diagnostics: &mut Vec<Diagnostic>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => {
            diagnostics.push(Diagnostic::invalid_value(
                field,
                format!("expected a string, found {}", json_type_name(&other)),
            ));
            String::new()
        }
    }
}

fn display_mode_field(value: Option<Value>, diagnostics: &mut Vec<Diagnostic>) -> DisplayMode {
    let Some(value) = value.filter(|v| !v.is_null()) else {
        return DisplayMode::default();
    };

    match value.as_str().map(DisplayMode::from_str) {
        Some(Ok(mode)) => mode,
        _ => {
            diagnostics.push(Diagnostic::invalid_value(
                "display_mode",
                format!("expected \"full\" or \"compact\", found {}", value),
            ));
            DisplayMode::default()
        }
    }
}

fn threshold_field(value: Option<Value>, diagnostics: &mut Vec<Diagnostic>) -> u8 {
    let default = CardConfig::default().battery_threshold;
    match value {
        None | Some(Value::Null) => default,
        Some(value) => match parse_number(&value) {
            Some(n) => n.round().clamp(0.0, 100.0) as u8,
            None => {
                diagnostics.push(Diagnostic::invalid_value(
                    "battery_threshold",
                    format!("expected a number from 0 to 100, found {}", value),
                ));
                default
            }
        },
    }
}

fn parse_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
}

fn parse_order(value: &Value) -> Option<i64> {
    parse_number(value).map(|n| n.round() as i64)
}

fn parse_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) if s == "true" => Some(true),
        Value::String(s) if s == "false" => Some(false),
        _ => None,
    }
}

/// String form of a legacy order value: `3` and `"3"` both become `"3"`.
fn coerce_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
